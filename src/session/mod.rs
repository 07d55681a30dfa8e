#![forbid(unsafe_code)]

// Session module - one simulated planning poker player

pub mod state;
pub mod tasks;

use crate::client::{
    CreateGameRequest, GameApi, JoinGameRequest, RealtimeConnection, RealtimeConnector,
    RealtimeError, RealtimeMessage, VoteRequest,
};
use crate::metrics::ActionCounters;
use rand::Rng;
use std::sync::Arc;
use tracing::{debug, warn};

pub use state::{SessionState, AVATAR_URL};
pub use tasks::{Task, TaskWeights};

/// Estimation cards a player may vote.
pub const VOTE_VALUES: [u32; 6] = [1, 2, 3, 5, 8, 13];
/// Confidence percentages a player may attach to a vote.
pub const CONFIDENCE_LEVELS: [u32; 5] = [60, 70, 80, 90, 100];
pub const MAX_PLAYERS: u32 = 5;
pub const TIMER_DURATION_SECS: u32 = 300;

/// Every handler, including the chained realtime connect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    CreateGame,
    JoinGame,
    SubmitVote,
    GetGameState,
    ConnectRealtime,
}

impl Action {
    pub const ALL: [Action; 5] = [
        Action::CreateGame,
        Action::JoinGame,
        Action::SubmitVote,
        Action::GetGameState,
        Action::ConnectRealtime,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Action::CreateGame => "create_game",
            Action::JoinGame => "join_game",
            Action::SubmitVote => "submit_vote",
            Action::GetGameState => "get_game_state",
            Action::ConnectRealtime => "connect_realtime",
        }
    }
}

/// What a handler did. `Skipped` means its precondition did not hold and no
/// network call was made.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    Skipped,
    Succeeded,
    Failed,
}

/// A simulated player.
///
/// Handlers take `&mut self`, so a session never runs two of them at once.
/// Chained calls (create → join → connect) are awaited in order.
pub struct PlayerSession<A, C: RealtimeConnector, R> {
    state: SessionState<C::Connection>,
    api: Arc<A>,
    connector: Arc<C>,
    rng: R,
    counters: Arc<ActionCounters>,
}

impl<A, C, R> PlayerSession<A, C, R>
where
    A: GameApi,
    C: RealtimeConnector,
    R: Rng + Send,
{
    pub fn new(api: Arc<A>, connector: Arc<C>, rng: R, counters: Arc<ActionCounters>) -> Self {
        Self::with_state(SessionState::new(), api, connector, rng, counters)
    }

    pub fn with_state(
        state: SessionState<C::Connection>,
        api: Arc<A>,
        connector: Arc<C>,
        rng: R,
        counters: Arc<ActionCounters>,
    ) -> Self {
        Self {
            state,
            api,
            connector,
            rng,
            counters,
        }
    }

    pub fn state(&self) -> &SessionState<C::Connection> {
        &self.state
    }

    /// Runs one scheduled task.
    pub async fn run(&mut self, task: Task) -> ActionOutcome {
        match task {
            Task::CreateGame => self.create_game().await,
            Task::JoinGame => self.join_game().await,
            Task::SubmitVote => self.submit_vote().await,
            Task::GetGameState => self.get_game_state().await,
        }
    }

    /// Creates a game when not already in one, then joins it.
    pub async fn create_game(&mut self) -> ActionOutcome {
        if self.state.in_game() {
            return self.record(Action::CreateGame, ActionOutcome::Skipped);
        }

        let request = CreateGameRequest {
            max_players: MAX_PLAYERS,
            timer_duration: TIMER_DURATION_SECS,
        };
        let game_id = match self.api.create_game(&request).await {
            Ok(response) if response.is_success() => match response.body {
                Some(body) if !body.id.is_empty() => body.id,
                _ => {
                    debug!("{}: Create game returned no usable id", self.state.player_name);
                    return self.record(Action::CreateGame, ActionOutcome::Failed);
                }
            },
            Ok(response) => {
                debug!(
                    "{}: Create game rejected with status {}",
                    self.state.player_name, response.status
                );
                return self.record(Action::CreateGame, ActionOutcome::Failed);
            }
            Err(e) => {
                debug!("{}: Create game failed: {}", self.state.player_name, e);
                return self.record(Action::CreateGame, ActionOutcome::Failed);
            }
        };

        debug!("{}: Created game {}", self.state.player_name, game_id);
        self.state.game_id = Some(game_id);
        self.record(Action::CreateGame, ActionOutcome::Succeeded);

        self.join_game().await;
        ActionOutcome::Succeeded
    }

    /// Joins the current game, then opens the realtime channel.
    ///
    /// A failed join leaves `game_id` untouched.
    pub async fn join_game(&mut self) -> ActionOutcome {
        let Some(game_id) = self.state.game_id.clone() else {
            return self.record(Action::JoinGame, ActionOutcome::Skipped);
        };

        let request = JoinGameRequest {
            name: self.state.player_name.clone(),
            avatar_url: self.state.avatar_url.clone(),
        };
        match self.api.join_game(&game_id, &request).await {
            Ok(response) if response.is_success() => {
                debug!("{}: Joined game {}", self.state.player_name, game_id);
            }
            Ok(response) => {
                debug!(
                    "{}: Join {} rejected with status {}",
                    self.state.player_name, game_id, response.status
                );
                return self.record(Action::JoinGame, ActionOutcome::Failed);
            }
            Err(e) => {
                debug!("{}: Join {} failed: {}", self.state.player_name, game_id, e);
                return self.record(Action::JoinGame, ActionOutcome::Failed);
            }
        }
        self.record(Action::JoinGame, ActionOutcome::Succeeded);

        self.connect_realtime().await;
        ActionOutcome::Succeeded
    }

    /// Casts a random vote. Any failure drops the game.
    pub async fn submit_vote(&mut self) -> ActionOutcome {
        let Some(game_id) = self.state.game_id.clone() else {
            return self.record(Action::SubmitVote, ActionOutcome::Skipped);
        };

        let request = VoteRequest {
            player_id: self.state.player_id.clone(),
            value: VOTE_VALUES[self.rng.gen_range(0..VOTE_VALUES.len())],
            confidence: CONFIDENCE_LEVELS[self.rng.gen_range(0..CONFIDENCE_LEVELS.len())],
        };
        let accepted = match self.api.submit_vote(&game_id, &request).await {
            Ok(response) => {
                if !response.is_success() {
                    debug!(
                        "{}: Vote in {} rejected with status {}",
                        self.state.player_name, game_id, response.status
                    );
                }
                response.is_success()
            }
            Err(e) => {
                debug!("{}: Vote in {} failed: {}", self.state.player_name, game_id, e);
                false
            }
        };

        if accepted {
            self.record(Action::SubmitVote, ActionOutcome::Succeeded)
        } else {
            self.state.game_id = None;
            self.record(Action::SubmitVote, ActionOutcome::Failed)
        }
    }

    /// Polls the game. The reply is only counted, never inspected.
    pub async fn get_game_state(&mut self) -> ActionOutcome {
        let Some(game_id) = self.state.game_id.as_deref() else {
            return self.record(Action::GetGameState, ActionOutcome::Skipped);
        };

        let outcome = match self.api.get_game_state(game_id).await {
            Ok(response) if response.is_success() => ActionOutcome::Succeeded,
            _ => ActionOutcome::Failed,
        };
        self.record(Action::GetGameState, outcome)
    }

    /// Opens the realtime channel and announces the game, unless already open.
    pub async fn connect_realtime(&mut self) -> ActionOutcome {
        if self.state.is_connected() {
            return self.record(Action::ConnectRealtime, ActionOutcome::Skipped);
        }
        let Some(game_id) = self.state.game_id.clone() else {
            return self.record(Action::ConnectRealtime, ActionOutcome::Skipped);
        };

        match open_channel(self.connector.as_ref(), game_id).await {
            Ok(connection) => {
                self.state.realtime = Some(connection);
                self.record(Action::ConnectRealtime, ActionOutcome::Succeeded)
            }
            Err(e) => {
                warn!("{}: WebSocket connection failed: {}", self.state.player_name, e);
                self.state.realtime = None;
                self.record(Action::ConnectRealtime, ActionOutcome::Failed)
            }
        }
    }

    /// Session end: closes the realtime channel if one is open.
    pub async fn teardown(&mut self) {
        if let Some(mut connection) = self.state.realtime.take() {
            if let Err(e) = connection.close().await {
                debug!("{}: Closing realtime channel: {}", self.state.player_name, e);
            }
        }
    }

    fn record(&self, action: Action, outcome: ActionOutcome) -> ActionOutcome {
        self.counters.record(action, outcome);
        outcome
    }
}

async fn open_channel<C: RealtimeConnector>(
    connector: &C,
    game_id: String,
) -> Result<C::Connection, RealtimeError> {
    let mut connection = connector.connect().await?;
    connection.send(&RealtimeMessage::Join { game_id }).await?;
    Ok(connection)
}
