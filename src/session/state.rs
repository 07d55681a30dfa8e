#![forbid(unsafe_code)]

// Per-user session state

use uuid::Uuid;

/// Static avatar every simulated player presents.
pub const AVATAR_URL: &str = "https://api.dicebear.com/7.x/personas/svg?seed=exec1";

const NAME_PREFIX: &str = "Perf-";
const NAME_ID_CHARS: usize = 8;

/// State owned by exactly one simulated player.
///
/// `game_id == None` means "not in a game". `realtime` is the open channel,
/// if any; it is only ever replaced by taking it out to close it.
#[derive(Debug)]
pub struct SessionState<C> {
    pub player_id: String,
    pub player_name: String,
    pub avatar_url: String,
    pub game_id: Option<String>,
    pub realtime: Option<C>,
}

impl<C> SessionState<C> {
    /// Fresh state with a random v4 player id.
    pub fn new() -> Self {
        Self::with_player_id(Uuid::new_v4().to_string())
    }

    pub fn with_player_id(player_id: String) -> Self {
        let player_name = player_name_for(&player_id);
        Self {
            player_id,
            player_name,
            avatar_url: AVATAR_URL.to_string(),
            game_id: None,
            realtime: None,
        }
    }

    pub fn in_game(&self) -> bool {
        self.game_id.is_some()
    }

    pub fn is_connected(&self) -> bool {
        self.realtime.is_some()
    }
}

impl<C> Default for SessionState<C> {
    fn default() -> Self {
        Self::new()
    }
}

fn player_name_for(player_id: &str) -> String {
    let prefix: String = player_id.chars().take(NAME_ID_CHARS).collect();
    format!("{NAME_PREFIX}{prefix}")
}
