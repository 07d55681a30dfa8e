#![forbid(unsafe_code)]

// In-memory GameApi and RealtimeConnector doubles that record every call

use super::protocol::{
    CreateGameRequest, CreateGameResponse, JoinGameRequest, RealtimeMessage, VoteRequest,
};
use super::types::{ApiError, ApiResponse, RealtimeError, SUCCESS_STATUS};
use super::{GameApi, RealtimeConnection, RealtimeConnector};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiCall {
    Create(CreateGameRequest),
    Join { game_id: String, request: JoinGameRequest },
    Vote { game_id: String, request: VoteRequest },
    GetState { game_id: String },
}

/// `None` replies simulate an unreachable service.
pub struct FakeGameApi {
    pub created_id: String,
    pub create_reply: Option<u16>,
    pub join_reply: Option<u16>,
    pub vote_reply: Option<u16>,
    pub state_reply: Option<u16>,
    calls: Mutex<Vec<ApiCall>>,
}

impl FakeGameApi {
    pub fn new() -> Self {
        Self {
            created_id: "G1".to_string(),
            create_reply: Some(SUCCESS_STATUS),
            join_reply: Some(SUCCESS_STATUS),
            vote_reply: Some(SUCCESS_STATUS),
            state_reply: Some(SUCCESS_STATUS),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<ApiCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn votes(&self) -> Vec<VoteRequest> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                ApiCall::Vote { request, .. } => Some(request),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: ApiCall) {
        self.calls.lock().unwrap().push(call);
    }

    fn reply(status: Option<u16>) -> Result<ApiResponse, ApiError> {
        status
            .map(ApiResponse::status_only)
            .ok_or_else(|| ApiError::Transport("connection refused".to_string()))
    }
}

#[async_trait]
impl GameApi for FakeGameApi {
    async fn create_game(
        &self,
        request: &CreateGameRequest,
    ) -> Result<ApiResponse<CreateGameResponse>, ApiError> {
        self.record(ApiCall::Create(request.clone()));
        match self.create_reply {
            Some(SUCCESS_STATUS) => Ok(ApiResponse::with_body(
                SUCCESS_STATUS,
                CreateGameResponse {
                    id: self.created_id.clone(),
                },
            )),
            Some(status) => Ok(ApiResponse::status_only(status)),
            None => Err(ApiError::Transport("connection refused".to_string())),
        }
    }

    async fn join_game(
        &self,
        game_id: &str,
        request: &JoinGameRequest,
    ) -> Result<ApiResponse, ApiError> {
        self.record(ApiCall::Join {
            game_id: game_id.to_string(),
            request: request.clone(),
        });
        Self::reply(self.join_reply)
    }

    async fn submit_vote(
        &self,
        game_id: &str,
        request: &VoteRequest,
    ) -> Result<ApiResponse, ApiError> {
        self.record(ApiCall::Vote {
            game_id: game_id.to_string(),
            request: request.clone(),
        });
        Self::reply(self.vote_reply)
    }

    async fn get_game_state(&self, game_id: &str) -> Result<ApiResponse, ApiError> {
        self.record(ApiCall::GetState {
            game_id: game_id.to_string(),
        });
        Self::reply(self.state_reply)
    }
}

#[derive(Debug, Default)]
pub struct RealtimeLog {
    pub connects: usize,
    pub sent: Vec<RealtimeMessage>,
    pub closes: usize,
}

#[derive(Default)]
pub struct FakeConnector {
    pub fail_connect: bool,
    pub fail_send: bool,
    log: Arc<Mutex<RealtimeLog>>,
}

impl FakeConnector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn connects(&self) -> usize {
        self.log.lock().unwrap().connects
    }

    pub fn closes(&self) -> usize {
        self.log.lock().unwrap().closes
    }

    pub fn sent(&self) -> Vec<RealtimeMessage> {
        self.log.lock().unwrap().sent.clone()
    }
}

pub struct FakeConnection {
    fail_send: bool,
    log: Arc<Mutex<RealtimeLog>>,
}

#[async_trait]
impl RealtimeConnector for FakeConnector {
    type Connection = FakeConnection;

    async fn connect(&self) -> Result<FakeConnection, RealtimeError> {
        self.log.lock().unwrap().connects += 1;
        if self.fail_connect {
            return Err(RealtimeError::Connect("handshake rejected".to_string()));
        }
        Ok(FakeConnection {
            fail_send: self.fail_send,
            log: self.log.clone(),
        })
    }
}

#[async_trait]
impl RealtimeConnection for FakeConnection {
    async fn send(&mut self, message: &RealtimeMessage) -> Result<(), RealtimeError> {
        if self.fail_send {
            return Err(RealtimeError::Send("broken pipe".to_string()));
        }
        self.log.lock().unwrap().sent.push(message.clone());
        Ok(())
    }

    async fn close(&mut self) -> Result<(), RealtimeError> {
        self.log.lock().unwrap().closes += 1;
        Ok(())
    }
}
