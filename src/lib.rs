#![forbid(unsafe_code)]

// Planning poker load test library - simulated players against the game service over HTTP and WebSocket

pub mod client;
pub mod config;
pub mod harness;
pub mod metrics;
pub mod session;
