#![forbid(unsafe_code)]

// Client module - HTTP and realtime clients for the planning poker service

pub mod http;
pub mod protocol;
pub mod realtime;
pub mod types;

#[cfg(test)]
pub(crate) mod fake;

use async_trait::async_trait;

pub use http::HttpGameApi;
pub use protocol::{
    CreateGameRequest, CreateGameResponse, JoinGameRequest, RealtimeMessage, VoteRequest,
};
pub use realtime::{WsConnection, WsConnector};
pub use types::{ApiError, ApiResponse, RealtimeError, SUCCESS_STATUS};

/// REST surface of the game service.
///
/// A returned `Ok` means the service answered; whether it answered with
/// success is carried in [`ApiResponse::status`].
#[async_trait]
pub trait GameApi: Send + Sync {
    /// POST /api/games
    async fn create_game(
        &self,
        request: &CreateGameRequest,
    ) -> Result<ApiResponse<CreateGameResponse>, ApiError>;

    /// POST /api/games/{game_id}/join
    async fn join_game(
        &self,
        game_id: &str,
        request: &JoinGameRequest,
    ) -> Result<ApiResponse, ApiError>;

    /// POST /api/games/{game_id}/vote
    async fn submit_vote(
        &self,
        game_id: &str,
        request: &VoteRequest,
    ) -> Result<ApiResponse, ApiError>;

    /// GET /api/games/{game_id}
    async fn get_game_state(&self, game_id: &str) -> Result<ApiResponse, ApiError>;
}

/// Opens realtime channels to the game service.
#[async_trait]
pub trait RealtimeConnector: Send + Sync {
    type Connection: RealtimeConnection;

    async fn connect(&self) -> Result<Self::Connection, RealtimeError>;
}

/// An open realtime channel. Inbound traffic is never read.
#[async_trait]
pub trait RealtimeConnection: Send {
    async fn send(&mut self, message: &RealtimeMessage) -> Result<(), RealtimeError>;

    async fn close(&mut self) -> Result<(), RealtimeError>;
}
