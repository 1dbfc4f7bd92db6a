use crate::stream::Stream;
use crate::{Error, Result};
use commonware_codec::{DecodeExt, Encode};
use futures_util::{SinkExt, StreamExt};
use rand::{rngs::StdRng, Rng, RngCore, SeedableRng};
use std::time::Duration;
use tablestream_types::{LobbyList, Request, Snapshot};
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{info, warn};
use url::Url;

/// Retry behavior for idempotent HTTP queries.
#[derive(Clone, Debug)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: Duration::from_millis(250),
            max_backoff: Duration::from_secs(2),
        }
    }
}

/// Entry point for talking to a game server: lobby queries over HTTP and the
/// persistent table connection over websocket.
pub struct Client {
    pub(crate) http_client: reqwest::Client,
    pub base_url: Url,
    retry_policy: RetryPolicy,
}

impl Client {
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url)?;
        match base_url.scheme() {
            "http" | "https" => {}
            scheme => return Err(Error::InvalidScheme(scheme.to_string())),
        }
        Ok(Self {
            http_client: reqwest::Client::new(),
            base_url,
            retry_policy: RetryPolicy::default(),
        })
    }

    pub fn with_retry_policy(mut self, retry_policy: RetryPolicy) -> Self {
        self.retry_policy = retry_policy;
        self
    }

    /// List joinable lobbies.
    pub async fn lobbies(&self) -> Result<LobbyList> {
        let url = self.base_url.join("lobbies")?;
        let response = self.get_with_retry(url).await?;
        let bytes = response.bytes().await?;
        LobbyList::decode(bytes.as_ref()).map_err(Error::InvalidData)
    }

    pub(crate) async fn get_with_retry(&self, url: Url) -> Result<reqwest::Response> {
        let mut rng = StdRng::from_entropy();
        let mut backoff = self.retry_policy.initial_backoff;
        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.http_client.get(url.clone()).send().await {
                Ok(response) if response.status().is_success() => return Ok(response),
                Ok(response) => {
                    let status = response.status();
                    if attempt >= self.retry_policy.max_attempts || !retryable(status) {
                        return Err(Error::Failed(status));
                    }
                    warn!(%url, %status, attempt, "query failed; retrying");
                }
                Err(err) => {
                    if attempt >= self.retry_policy.max_attempts {
                        return Err(err.into());
                    }
                    warn!(%url, error = %err, attempt, "query errored; retrying");
                }
            }
            tokio::time::sleep(jittered_backoff(&mut rng, backoff)).await;
            backoff = (backoff * 2).min(self.retry_policy.max_backoff);
        }
    }

    /// Open the persistent table connection for a participant.
    ///
    /// Returns the inbound snapshot stream paired with the outbound command
    /// sink. Sends are fire-and-forget and unordered relative to inbound
    /// snapshots; the server replies only through snapshot pushes.
    pub async fn connect(&self, lobby_id: u64, player_id: u64) -> Result<Table> {
        let mut ws_url = self.base_url.join("table")?;
        let scheme = if self.base_url.scheme() == "https" {
            "wss"
        } else {
            "ws"
        };
        ws_url
            .set_scheme(scheme)
            .map_err(|_| Error::InvalidScheme(scheme.to_string()))?;
        ws_url
            .query_pairs_mut()
            .append_pair("lobby_id", &lobby_id.to_string())
            .append_pair("player_id", &player_id.to_string());

        info!(url = %ws_url, "connecting to table");
        let (ws, _) = connect_async(ws_url.as_str()).await?;
        let (mut sink, frames) = ws.split();

        let (sender, mut outbound) = mpsc::unbounded_channel::<Request>();
        let writer = tokio::spawn(async move {
            while let Some(request) = outbound.recv().await {
                let frame = Message::Binary(request.encode().to_vec());
                if sink.send(frame).await.is_err() {
                    break;
                }
            }
        });

        Ok(Table {
            snapshots: Stream::new(frames),
            commands: Commands { sender },
            writer,
        })
    }
}

fn retryable(status: reqwest::StatusCode) -> bool {
    status == reqwest::StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

// "Equal jitter": delay lands in [backoff/2, backoff].
fn jittered_backoff(rng: &mut impl RngCore, backoff: Duration) -> Duration {
    let backoff_ms = backoff.as_millis() as u64;
    if backoff_ms <= 1 {
        return backoff;
    }
    let half_ms = backoff_ms / 2;
    let jitter_ms = rng.gen_range(0..=half_ms);
    Duration::from_millis(half_ms.saturating_add(jitter_ms))
}

/// Fire-and-forget sender for outbound requests.
#[derive(Clone)]
pub struct Commands {
    sender: mpsc::UnboundedSender<Request>,
}

impl Commands {
    pub fn send(&self, request: Request) -> Result<()> {
        self.sender
            .send(request)
            .map_err(|_| Error::ConnectionClosed)
    }
}

/// A live table connection.
pub struct Table {
    pub snapshots: Stream<Snapshot>,
    pub commands: Commands,
    writer: tokio::task::JoinHandle<()>,
}

impl Drop for Table {
    fn drop(&mut self) {
        self.writer.abort();
    }
}
