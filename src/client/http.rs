#![forbid(unsafe_code)]

// REST client for the game service, backed by reqwest

use super::protocol::{CreateGameRequest, CreateGameResponse, JoinGameRequest, VoteRequest};
use super::types::{ApiError, ApiResponse, SUCCESS_STATUS};
use super::GameApi;
use async_trait::async_trait;
use std::time::Duration;
use url::Url;

/// `GameApi` over HTTP. Cheap to share: one connection pool for all users.
#[derive(Debug, Clone)]
pub struct HttpGameApi {
    client: reqwest::Client,
    base: Url,
}

impl HttpGameApi {
    /// Builds a client whose every request is bounded by `timeout`.
    pub fn new(base: Url, timeout: Duration) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base })
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.base.join(path)?)
    }

    fn game_endpoint(&self, game_id: &str, action: Option<&str>) -> Result<Url, ApiError> {
        let mut url = self.endpoint("/api/games")?;
        // path_segments_mut only fails on cannot-be-a-base URLs, which join() never yields here
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.push(game_id);
            if let Some(action) = action {
                segments.push(action);
            }
        }
        Ok(url)
    }
}

#[async_trait]
impl GameApi for HttpGameApi {
    async fn create_game(
        &self,
        request: &CreateGameRequest,
    ) -> Result<ApiResponse<CreateGameResponse>, ApiError> {
        let response = self
            .client
            .post(self.endpoint("/api/games")?)
            .json(request)
            .send()
            .await?;

        let status = response.status().as_u16();
        if status != SUCCESS_STATUS {
            return Ok(ApiResponse::status_only(status));
        }

        let body = response.json::<CreateGameResponse>().await?;
        Ok(ApiResponse::with_body(status, body))
    }

    async fn join_game(
        &self,
        game_id: &str,
        request: &JoinGameRequest,
    ) -> Result<ApiResponse, ApiError> {
        let response = self
            .client
            .post(self.game_endpoint(game_id, Some("join"))?)
            .json(request)
            .send()
            .await?;
        Ok(ApiResponse::status_only(response.status().as_u16()))
    }

    async fn submit_vote(
        &self,
        game_id: &str,
        request: &VoteRequest,
    ) -> Result<ApiResponse, ApiError> {
        let response = self
            .client
            .post(self.game_endpoint(game_id, Some("vote"))?)
            .json(request)
            .send()
            .await?;
        Ok(ApiResponse::status_only(response.status().as_u16()))
    }

    async fn get_game_state(&self, game_id: &str) -> Result<ApiResponse, ApiError> {
        let response = self
            .client
            .get(self.game_endpoint(game_id, None)?)
            .send()
            .await?;
        Ok(ApiResponse::status_only(response.status().as_u16()))
    }
}
