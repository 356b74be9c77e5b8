use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::ProtocolError;

/// One of the fixed player slots a game process reports scores for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PlayerId {
    #[serde(rename = "player_1")]
    Player1,
    #[serde(rename = "player_2")]
    Player2,
}

impl PlayerId {
    /// Every recognized player, in wire order.
    pub const ALL: [PlayerId; 2] = [PlayerId::Player1, PlayerId::Player2];

    pub fn as_str(self) -> &'static str {
        match self {
            PlayerId::Player1 => "player_1",
            PlayerId::Player2 => "player_2",
        }
    }

    /// Exact, case-sensitive match against the wire spelling.
    pub fn parse(s: &str) -> Option<PlayerId> {
        PlayerId::ALL.into_iter().find(|p| p.as_str() == s)
    }
}

impl FromStr for PlayerId {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PlayerId::parse(s).ok_or_else(|| ProtocolError::UnknownPlayer(s.to_string()))
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
