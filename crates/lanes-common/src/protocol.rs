//! Text messages exchanged with the relay.
//!
//! Game processes send one `"<player_id>:<score>"` line per TCP connection.
//! Persistent channels carry plain text frames: clients may send `"reset"`,
//! the relay answers every channel with `"reset_acknowledged"` and pushes
//! JSON score snapshots.

use crate::player::PlayerId;

/// Channel message a client sends to request a game reset.
pub const RESET_REQUEST: &str = "reset";

/// Channel message the relay fans out after a reset request.
pub const RESET_ACKNOWLEDGED: &str = "reset_acknowledged";

/// Why an inbound message was dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Unrecognized {
    /// Ingest text with no `:` separator.
    MissingSeparator,
    /// Ingest text naming a player outside the fixed roster.
    UnknownPlayer(String),
    /// Channel text other than a reset request.
    UnknownCommand,
}

/// A decoded ingest line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestMessage {
    ScoreUpdate { player: PlayerId, score: String },
    Unrecognized(Unrecognized),
}

impl IngestMessage {
    /// Parse one ingest line. Surrounding whitespace is ignored and the text
    /// is split on the first colon; the score is kept verbatim.
    pub fn parse(text: &str) -> IngestMessage {
        let Some((player, score)) = text.trim().split_once(':') else {
            return IngestMessage::Unrecognized(Unrecognized::MissingSeparator);
        };

        match PlayerId::parse(player) {
            Some(player) => IngestMessage::ScoreUpdate {
                player,
                score: score.to_string(),
            },
            None => IngestMessage::Unrecognized(Unrecognized::UnknownPlayer(player.to_string())),
        }
    }
}

/// A decoded inbound channel frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelMessage {
    ResetRequest,
    Unrecognized(Unrecognized),
}

impl ChannelMessage {
    pub fn parse(text: &str) -> ChannelMessage {
        if text == RESET_REQUEST {
            ChannelMessage::ResetRequest
        } else {
            ChannelMessage::Unrecognized(Unrecognized::UnknownCommand)
        }
    }
}

/// Build the ingest line a game process sends for `player`.
pub fn encode_score_update(player: PlayerId, score: &str) -> String {
    format!("{player}:{score}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_score_update() {
        assert_eq!(
            IngestMessage::parse("player_1:42"),
            IngestMessage::ScoreUpdate {
                player: PlayerId::Player1,
                score: "42".into(),
            }
        );
    }

    #[test]
    fn trims_surrounding_whitespace() {
        assert_eq!(
            IngestMessage::parse("  player_2:7\r\n"),
            IngestMessage::ScoreUpdate {
                player: PlayerId::Player2,
                score: "7".into(),
            }
        );
    }

    #[test]
    fn splits_on_first_colon_only() {
        assert_eq!(
            IngestMessage::parse("player_1:5:6"),
            IngestMessage::ScoreUpdate {
                player: PlayerId::Player1,
                score: "5:6".into(),
            }
        );
    }

    #[test]
    fn missing_colon_is_unrecognized() {
        assert_eq!(
            IngestMessage::parse("player_1 5"),
            IngestMessage::Unrecognized(Unrecognized::MissingSeparator)
        );
        assert_eq!(
            IngestMessage::parse(""),
            IngestMessage::Unrecognized(Unrecognized::MissingSeparator)
        );
    }

    #[test]
    fn unknown_player_is_unrecognized() {
        assert_eq!(
            IngestMessage::parse("unknown_id:5"),
            IngestMessage::Unrecognized(Unrecognized::UnknownPlayer("unknown_id".into()))
        );
        // Literal placeholder some game builds send before a slot is assigned.
        assert_eq!(
            IngestMessage::parse("player_id:3"),
            IngestMessage::Unrecognized(Unrecognized::UnknownPlayer("player_id".into()))
        );
    }

    #[test]
    fn score_is_not_validated() {
        assert_eq!(
            IngestMessage::parse("player_2:"),
            IngestMessage::ScoreUpdate {
                player: PlayerId::Player2,
                score: String::new(),
            }
        );
    }

    #[test]
    fn channel_reset_is_exact_match() {
        assert_eq!(ChannelMessage::parse("reset"), ChannelMessage::ResetRequest);
        assert_eq!(
            ChannelMessage::parse("RESET"),
            ChannelMessage::Unrecognized(Unrecognized::UnknownCommand)
        );
        assert_eq!(
            ChannelMessage::parse("reset please"),
            ChannelMessage::Unrecognized(Unrecognized::UnknownCommand)
        );
    }

    #[test]
    fn encoded_update_parses_back() {
        let line = encode_score_update(PlayerId::Player2, "13");
        assert_eq!(line, "player_2:13");
        assert!(matches!(
            IngestMessage::parse(&line),
            IngestMessage::ScoreUpdate { player: PlayerId::Player2, .. }
        ));
    }
}
