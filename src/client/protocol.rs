#![forbid(unsafe_code)]

// Wire format - request bodies for the REST API and realtime channel frames

use serde::{Deserialize, Serialize};

/// Body of POST /api/games
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGameRequest {
    pub max_players: u32,
    /// Round timer in seconds
    pub timer_duration: u32,
}

/// Successful reply to POST /api/games. Other fields of the game are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateGameResponse {
    pub id: String,
}

/// Body of POST /api/games/{gameId}/join
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinGameRequest {
    pub name: String,
    pub avatar_url: String,
}

/// Body of POST /api/games/{gameId}/vote
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteRequest {
    pub player_id: String,
    pub value: u32,
    pub confidence: u32,
}

/// Client-to-server realtime frames
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum RealtimeMessage {
    /// Subscribe to a game's updates; must be the first frame on the channel
    #[serde(rename_all = "camelCase")]
    Join { game_id: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_join_frame_shape() {
        let frame = RealtimeMessage::Join {
            game_id: "G1".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&frame).unwrap(),
            json!({ "type": "join", "gameId": "G1" })
        );
    }

    #[test]
    fn test_request_bodies_use_camel_case() {
        let create = CreateGameRequest {
            max_players: 5,
            timer_duration: 300,
        };
        assert_eq!(
            serde_json::to_value(&create).unwrap(),
            json!({ "maxPlayers": 5, "timerDuration": 300 })
        );

        let join = JoinGameRequest {
            name: "Perf-1234abcd".to_string(),
            avatar_url: "https://example.com/a.svg".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&join).unwrap(),
            json!({ "name": "Perf-1234abcd", "avatarUrl": "https://example.com/a.svg" })
        );

        let vote = VoteRequest {
            player_id: "p".to_string(),
            value: 8,
            confidence: 90,
        };
        assert_eq!(
            serde_json::to_value(&vote).unwrap(),
            json!({ "playerId": "p", "value": 8, "confidence": 90 })
        );
    }

    #[test]
    fn test_create_response_ignores_extra_fields() {
        let body = json!({
            "id": "abc",
            "maxPlayers": 5,
            "players": [],
            "status": "waiting"
        });
        let parsed: CreateGameResponse = serde_json::from_value(body).unwrap();
        assert_eq!(parsed.id, "abc");
    }
}
