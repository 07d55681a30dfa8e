#![forbid(unsafe_code)]

// Action outcome counters: lock-free AtomicU64 per action, shared by every session.

use crate::session::{Action, ActionOutcome};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering::Relaxed};
use std::time::Duration;

const ACTIONS: usize = Action::ALL.len();

/// Success/failure/skip counts for every handler, across all sessions.
pub struct ActionCounters {
    succeeded: [AtomicU64; ACTIONS],
    failed: [AtomicU64; ACTIONS],
    skipped: [AtomicU64; ACTIONS],
}

impl ActionCounters {
    pub fn new() -> Self {
        Self {
            succeeded: std::array::from_fn(|_| AtomicU64::new(0)),
            failed: std::array::from_fn(|_| AtomicU64::new(0)),
            skipped: std::array::from_fn(|_| AtomicU64::new(0)),
        }
    }

    pub fn record(&self, action: Action, outcome: ActionOutcome) {
        let i = index(action);
        let counter = match outcome {
            ActionOutcome::Succeeded => &self.succeeded[i],
            ActionOutcome::Failed => &self.failed[i],
            ActionOutcome::Skipped => &self.skipped[i],
        };
        counter.fetch_add(1, Relaxed);
    }

    pub fn stats(&self, action: Action) -> ActionStats {
        let i = index(action);
        ActionStats {
            succeeded: self.succeeded[i].load(Relaxed),
            failed: self.failed[i].load(Relaxed),
            skipped: self.skipped[i].load(Relaxed),
        }
    }

    /// Snapshot for reporting. Safe to call while sessions are still running.
    pub fn summary(&self, users: usize, elapsed: Duration) -> LoadSummary {
        let actions: BTreeMap<String, ActionStats> = Action::ALL
            .iter()
            .map(|&action| (action.label().to_string(), self.stats(action)))
            .collect();

        let total_attempts = actions.values().map(ActionStats::attempts).sum();
        let total_failures = actions.values().map(|s| s.failed).sum();

        LoadSummary {
            users,
            duration_ms: elapsed.as_millis() as u64,
            actions,
            total_attempts,
            total_failures,
        }
    }
}

impl Default for ActionCounters {
    fn default() -> Self {
        Self::new()
    }
}

fn index(action: Action) -> usize {
    match action {
        Action::CreateGame => 0,
        Action::JoinGame => 1,
        Action::SubmitVote => 2,
        Action::GetGameState => 3,
        Action::ConnectRealtime => 4,
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionStats {
    pub succeeded: u64,
    pub failed: u64,
    /// Runs whose precondition did not hold; no request was made
    pub skipped: u64,
}

impl ActionStats {
    /// Runs that reached the network.
    pub fn attempts(&self) -> u64 {
        self.succeeded + self.failed
    }
}

/// End-of-run report
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadSummary {
    pub users: usize,
    pub duration_ms: u64,
    pub actions: BTreeMap<String, ActionStats>,
    pub total_attempts: u64,
    pub total_failures: u64,
}

impl LoadSummary {
    pub fn print_summary(&self) {
        println!("\n=== Load Test Summary ===");
        println!("Users: {}", self.users);
        println!(
            "Duration: {} ms ({:.2} s)",
            self.duration_ms,
            self.duration_ms as f64 / 1000.0
        );
        println!("\nActions:");
        println!(
            "  {:<18} {:>10} {:>10} {:>10}",
            "action", "ok", "failed", "skipped"
        );
        for (action, stats) in &self.actions {
            println!(
                "  {:<18} {:>10} {:>10} {:>10}",
                action, stats.succeeded, stats.failed, stats.skipped
            );
        }
        println!("\nTotal Attempts: {}", self.total_attempts);
        let failure_rate = if self.total_attempts > 0 {
            format!(
                "{:.1}%",
                self.total_failures as f64 / self.total_attempts as f64 * 100.0
            )
        } else {
            "N/A".to_string()
        };
        println!("Total Failures: {} ({})", self.total_failures, failure_rate);
        println!("========================\n");
    }

    pub fn write_json(&self, path: &Path) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}
