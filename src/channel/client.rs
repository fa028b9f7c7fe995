use std::time::Duration;

use futures::{SinkExt, StreamExt};
use serde_json::Value;
use tokio::{
    net::TcpStream,
    sync::{mpsc, watch},
    task::JoinHandle,
};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};
use url::Url;

use crate::channel::protocol::{ClientMessage, ServerMessage};

/// Capped, linearly growing reconnect delays: attempt `n` waits `base_delay * n`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReconnectPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay: Duration::from_millis(2000),
        }
    }
}

impl ReconnectPolicy {
    /// Delay before reconnect attempt `attempt` (1-based), or `None` once attempts run out.
    pub fn delay_for(&self, attempt: u32) -> Option<Duration> {
        (1..=self.max_attempts)
            .contains(&attempt)
            .then(|| self.base_delay * attempt)
    }
}

/// Connection state shown by the status indicator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConnectionStatus {
    Connecting,
    Connected,
    Reconnecting { attempt: u32, max_attempts: u32 },
    /// Attempts exhausted. Loaded visualizations stay playable.
    GaveUp,
}

/// Sending side of a running channel. Cheap to clone.
#[derive(Clone, Debug)]
pub struct ChannelHandle {
    outgoing: mpsc::UnboundedSender<ClientMessage>,
    status: watch::Receiver<ConnectionStatus>,
}

impl ChannelHandle {
    /// Queue `msg` for the socket. Returns false, dropping the message, while disconnected.
    pub fn send(&self, msg: ClientMessage) -> bool {
        let status = *self.status.borrow();
        if status != ConnectionStatus::Connected {
            tracing::warn!(?status, "not connected, dropping message");
            return false;
        }
        self.outgoing.send(msg).is_ok()
    }

    pub fn request_visualization(&self, request: impl Into<String>, context: Option<Value>) -> bool {
        self.send(ClientMessage::VisualizationRequest {
            request: request.into(),
            context,
        })
    }

    pub fn status(&self) -> ConnectionStatus {
        *self.status.borrow()
    }

    pub fn status_watch(&self) -> watch::Receiver<ConnectionStatus> {
        self.status.clone()
    }
}

/// Reconnecting WebSocket client for the visualization backend.
#[derive(Clone, Debug)]
pub struct ChannelClient {
    url: Url,
    policy: ReconnectPolicy,
}

enum PumpExit {
    /// Socket closed or failed; try to reconnect.
    Lost,
    /// Every handle or the inbound receiver is gone.
    Shutdown,
}

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

impl ChannelClient {
    pub fn new(url: Url, policy: ReconnectPolicy) -> Self {
        Self { url, policy }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Start the connection task.
    ///
    /// Server messages arrive on the returned receiver. The task ends when every handle and
    /// the receiver are dropped, or when reconnect attempts run out.
    pub fn spawn(
        self,
    ) -> (
        ChannelHandle,
        mpsc::UnboundedReceiver<ServerMessage>,
        JoinHandle<()>,
    ) {
        let (out_tx, out_rx) = mpsc::unbounded_channel();
        let (in_tx, in_rx) = mpsc::unbounded_channel();
        let (status_tx, status_rx) = watch::channel(ConnectionStatus::Connecting);
        let task = tokio::spawn(self.run(out_rx, in_tx, status_tx));
        let handle = ChannelHandle {
            outgoing: out_tx,
            status: status_rx,
        };
        (handle, in_rx, task)
    }

    #[tracing::instrument(level = "info", skip_all, fields(url = %self.url))]
    async fn run(
        self,
        mut outgoing: mpsc::UnboundedReceiver<ClientMessage>,
        inbound: mpsc::UnboundedSender<ServerMessage>,
        status: watch::Sender<ConnectionStatus>,
    ) {
        let mut attempt = 0;
        loop {
            match connect_async(self.url.as_str()).await {
                Ok((socket, _)) => {
                    attempt = 0;
                    // Anything queued against the previous socket is stale.
                    while outgoing.try_recv().is_ok() {}
                    status.send_replace(ConnectionStatus::Connected);
                    tracing::info!("connected");
                    match pump(socket, &mut outgoing, &inbound).await {
                        PumpExit::Shutdown => return,
                        PumpExit::Lost => tracing::warn!("connection closed"),
                    }
                }
                Err(error) => tracing::warn!(%error, "connect failed"),
            }

            attempt += 1;
            let Some(delay) = self.policy.delay_for(attempt) else {
                tracing::warn!(attempts = self.policy.max_attempts, "giving up on channel");
                status.send_replace(ConnectionStatus::GaveUp);
                return;
            };
            status.send_replace(ConnectionStatus::Reconnecting {
                attempt,
                max_attempts: self.policy.max_attempts,
            });
            tracing::info!(attempt, max = self.policy.max_attempts, ?delay, "reconnecting");
            tokio::time::sleep(delay).await;
        }
    }
}

async fn pump(
    socket: Socket,
    outgoing: &mut mpsc::UnboundedReceiver<ClientMessage>,
    inbound: &mpsc::UnboundedSender<ServerMessage>,
) -> PumpExit {
    let (mut sink, mut stream) = socket.split();
    loop {
        tokio::select! {
            msg = outgoing.recv() => {
                let Some(msg) = msg else {
                    let _ = sink.close().await;
                    return PumpExit::Shutdown;
                };
                let text = match serde_json::to_string(&msg) {
                    Ok(text) => text,
                    Err(error) => {
                        tracing::warn!(%error, "failed to encode message");
                        continue;
                    }
                };
                if let Err(error) = sink.send(Message::text(text)).await {
                    tracing::warn!(%error, "send failed");
                    return PumpExit::Lost;
                }
            }
            frame = stream.next() => match frame {
                Some(Ok(Message::Text(text))) => {
                    match serde_json::from_str::<ServerMessage>(text.as_str()) {
                        Ok(msg) => {
                            tracing::debug!(kind = msg.kind(), "received");
                            if inbound.send(msg).is_err() {
                                let _ = sink.close().await;
                                return PumpExit::Shutdown;
                            }
                        }
                        Err(error) => tracing::warn!(%error, "ignoring unrecognized server message"),
                    }
                }
                Some(Ok(Message::Close(_))) | None => return PumpExit::Lost,
                Some(Ok(_)) => {}
                Some(Err(error)) => {
                    tracing::warn!(%error, "socket error");
                    return PumpExit::Lost;
                }
            },
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/channel/client.rs"]
mod tests;
