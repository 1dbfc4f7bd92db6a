use crate::{Error, Result};
use commonware_codec::ReadExt;
use futures_util::{Stream as FutStream, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::{self, Message};
use tracing::{debug, error, trace, warn};

const DEFAULT_CHANNEL_CAPACITY: usize = 256;

/// Stream of typed messages decoded from binary websocket frames.
///
/// A frame that fails to decode is surfaced as an `Err` without closing the
/// stream, so one malformed push never stalls the ones behind it. Trailing
/// bytes after a successful decode are tolerated: a newer server may append
/// fields this build does not know about.
///
/// Dropping the stream aborts the reader task, which closes the underlying
/// half of the connection.
pub struct Stream<T: ReadExt + Send + Sync + 'static> {
    receiver: mpsc::Receiver<Result<T>>,
    _handle: tokio::task::JoinHandle<()>,
}

impl<T: ReadExt + Send + Sync + 'static> Drop for Stream<T> {
    fn drop(&mut self) {
        self._handle.abort();
    }
}

impl<T: ReadExt + Send + Sync + 'static> Stream<T> {
    pub(crate) fn new<S>(frames: S) -> Self
    where
        S: FutStream<Item = std::result::Result<Message, tungstenite::Error>>
            + Send
            + Unpin
            + 'static,
    {
        let (tx, rx) = mpsc::channel(DEFAULT_CHANNEL_CAPACITY);
        let handle = Self::spawn_reader(frames, tx);
        Self {
            receiver: rx,
            _handle: handle,
        }
    }

    fn spawn_reader<S>(mut frames: S, tx: mpsc::Sender<Result<T>>) -> tokio::task::JoinHandle<()>
    where
        S: FutStream<Item = std::result::Result<Message, tungstenite::Error>>
            + Send
            + Unpin
            + 'static,
    {
        tokio::spawn(async move {
            let message_type = std::any::type_name::<T>();
            while let Some(frame) = frames.next().await {
                match frame {
                    Ok(Message::Binary(data)) => {
                        let initial_len = data.len();
                        trace!(message_type, len = initial_len, "received websocket frame");
                        let mut buf = data.as_slice();
                        match T::read(&mut buf) {
                            Ok(value) => {
                                let remaining = buf.len();
                                if remaining != 0 {
                                    debug!(
                                        message_type,
                                        len = initial_len,
                                        remaining,
                                        "decoded websocket frame with trailing bytes"
                                    );
                                }
                                if tx.send(Ok(value)).await.is_err() {
                                    break; // Receiver dropped
                                }
                            }
                            Err(e) => {
                                let remaining = buf.len();
                                let consumed = initial_len.saturating_sub(remaining);
                                warn!(
                                    message_type,
                                    len = initial_len,
                                    consumed,
                                    remaining,
                                    error = %e,
                                    "failed to decode websocket frame"
                                );
                                if tx.send(Err(Error::InvalidData(e))).await.is_err() {
                                    break;
                                }
                            }
                        }
                    }
                    Ok(Message::Close(_)) => {
                        debug!("websocket closed");
                        let _ = tx.send(Err(Error::ConnectionClosed)).await;
                        break;
                    }
                    Ok(_) => {} // Ignore pings, pongs, and text frames
                    Err(e) => {
                        error!("websocket error: {}", e);
                        let _ = tx.send(Err(e.into())).await;
                        break;
                    }
                }
            }
        })
    }

    /// Receive the next decoded message.
    pub async fn next(&mut self) -> Option<Result<T>> {
        self.receiver.recv().await
    }
}

impl<T: ReadExt + Send + Sync + 'static> FutStream for Stream<T> {
    type Item = Result<T>;

    fn poll_next(
        mut self: std::pin::Pin<&mut Self>,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Option<Self::Item>> {
        self.receiver.poll_recv(cx)
    }
}
