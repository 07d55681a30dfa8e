#![forbid(unsafe_code)]

// Schedulable player actions and their declared selection weights

use serde::{Deserialize, Serialize};

/// Actions a scheduler may pick. Opening the realtime channel is not one of
/// them: it only follows a successful join.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Task {
    CreateGame,
    JoinGame,
    SubmitVote,
    GetGameState,
}

impl Task {
    /// Fixed order shared with [`TaskWeights::as_array`].
    pub const ALL: [Task; 4] = [
        Task::CreateGame,
        Task::JoinGame,
        Task::SubmitVote,
        Task::GetGameState,
    ];
}

/// Relative selection weights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskWeights {
    pub create_game: u32,
    pub join_game: u32,
    pub submit_vote: u32,
    pub get_game_state: u32,
}

impl Default for TaskWeights {
    fn default() -> Self {
        Self {
            create_game: 1,
            join_game: 3,
            submit_vote: 5,
            get_game_state: 2,
        }
    }
}

impl TaskWeights {
    pub fn as_array(&self) -> [u32; 4] {
        [
            self.create_game,
            self.join_game,
            self.submit_vote,
            self.get_game_state,
        ]
    }

    pub fn total(&self) -> u64 {
        self.as_array().iter().map(|&w| u64::from(w)).sum()
    }

    /// Parses `create,join,vote,state`, e.g. `1,3,5,2`.
    pub fn parse(s: &str) -> Option<Self> {
        let parts: Vec<u32> = s
            .split(',')
            .map(|p| p.trim().parse().ok())
            .collect::<Option<_>>()?;
        match parts.as_slice() {
            [create_game, join_game, submit_vote, get_game_state] => Some(Self {
                create_game: *create_game,
                join_game: *join_game,
                submit_vote: *submit_vote,
                get_game_state: *get_game_state,
            }),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights() {
        assert_eq!(TaskWeights::default().as_array(), [1, 3, 5, 2]);
        assert_eq!(TaskWeights::default().total(), 11);
    }

    #[test]
    fn test_parse_weights() {
        let w = TaskWeights::parse("0, 1,2 ,3").unwrap();
        assert_eq!(w.as_array(), [0, 1, 2, 3]);
        assert!(TaskWeights::parse("1,2,3").is_none());
        assert!(TaskWeights::parse("1,2,3,4,5").is_none());
        assert!(TaskWeights::parse("1,x,3,4").is_none());
        assert!(TaskWeights::parse("").is_none());
    }
}
