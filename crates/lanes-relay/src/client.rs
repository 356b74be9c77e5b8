//! Game-side helper for the ingest protocol.

use lanes_common::{encode_score_update, PlayerId};
use tokio::io::AsyncWriteExt;
use tokio::net::{TcpStream, ToSocketAddrs};

/// Deliver one score update the way a game process does: connect, write
/// the line, close. The relay never replies, so success only means the
/// bytes were handed to the OS.
pub async fn send_score<A: ToSocketAddrs>(
    addr: A,
    player: PlayerId,
    score: &str,
) -> std::io::Result<()> {
    let mut stream = TcpStream::connect(addr).await?;
    stream
        .write_all(encode_score_update(player, score).as_bytes())
        .await?;
    stream.shutdown().await?;
    Ok(())
}

/// Send raw bytes to the ingest port. Useful for checking how the relay
/// treats malformed input.
pub async fn send_raw<A: ToSocketAddrs>(addr: A, payload: &[u8]) -> std::io::Result<()> {
    let mut stream = TcpStream::connect(addr).await?;
    stream.write_all(payload).await?;
    stream.shutdown().await?;
    Ok(())
}
