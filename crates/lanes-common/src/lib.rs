//! Types shared by the score relay and the game clients that feed it.

pub mod errors;
pub mod player;
pub mod protocol;

pub use errors::{ConfigError, ProtocolError, RelayError};
pub use player::PlayerId;
pub use protocol::{
    encode_score_update, ChannelMessage, IngestMessage, Unrecognized, RESET_ACKNOWLEDGED,
    RESET_REQUEST,
};
