//! Duplex session loop.
//!
//! A session reads frames from any stream, dispatches each text frame through
//! the shared [`McpServer`] and writes responses to any sink. The WebSocket
//! endpoint plugs the socket halves in; tests plug in channels.

use axum::extract::ws::Message;
use futures::{Sink, SinkExt, Stream, StreamExt};
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::mcp::server::McpServer;

/// An inbound transport frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    Text(String),
    Binary(Vec<u8>),
    /// Transport-level ping/pong, answered by the transport itself.
    Control,
    Close,
}

impl From<Message> for Frame {
    fn from(msg: Message) -> Self {
        match msg {
            Message::Text(text) => Frame::Text(text.as_str().to_owned()),
            Message::Binary(bytes) => Frame::Binary(bytes.to_vec()),
            Message::Ping(_) | Message::Pong(_) => Frame::Control,
            Message::Close(_) => Frame::Close,
        }
    }
}

/// Run one duplex session until the peer closes or a frame cannot be handled.
///
/// Messages are handled strictly one at a time, so responses leave in the
/// order requests arrived. The connection is registered for the lifetime of
/// the call. Text that is not JSON and binary frames end the session with an
/// error; JSON with mistyped fields is answered and the session continues.
pub async fn run_session<S, K>(server: &McpServer, inbound: S, outbound: K) -> Result<()>
where
    S: Stream<Item = Result<Frame>>,
    K: Sink<String, Error = Error>,
{
    futures::pin_mut!(inbound);
    futures::pin_mut!(outbound);

    let guard = server.connections().register();
    server.metrics().inc_connections();
    info!("MCP client connected: {}", guard.id());

    while let Some(frame) = inbound.next().await {
        match frame? {
            Frame::Text(text) => {
                let reply = server.handle_text(&text).await.map_err(|e| {
                    warn!("Dropping connection {}: {}", guard.id(), e);
                    e
                })?;
                if let Some(reply) = reply {
                    outbound.send(reply).await?;
                }
            }
            Frame::Binary(bytes) => {
                return Err(Error::Transport(format!(
                    "unexpected binary frame ({} bytes)",
                    bytes.len()
                )));
            }
            Frame::Control => debug!("Control frame on {}", guard.id()),
            Frame::Close => break,
        }
    }

    info!("MCP client disconnected: {}", guard.id());
    Ok(())
}
