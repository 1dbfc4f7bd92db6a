pub mod client;
pub mod history;
pub mod reconcile;
pub mod seating;
pub mod stream;

pub use client::{Client, Commands, RetryPolicy, Table};
pub use history::BetHistory;
pub use reconcile::{Pacing, Reconciler, TableView};
pub use seating::rotate_seats;
pub use stream::Stream;

use thiserror::Error;

/// Error type for client operations.
#[derive(Error, Debug)]
pub enum Error {
    #[error("reqwest error: {0}")]
    Reqwest(#[from] reqwest::Error),
    #[error("tungstenite error: {0}")]
    Tungstenite(#[from] tokio_tungstenite::tungstenite::Error),
    #[error("request failed: {0}")]
    Failed(reqwest::StatusCode),
    #[error("invalid data: {0}")]
    InvalidData(#[from] commonware_codec::Error),
    #[error("connection closed")]
    ConnectionClosed,
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),
    #[error("invalid URL scheme: {0} (expected http or https)")]
    InvalidScheme(String),
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        extract::ws::{Message as WsMessage, WebSocket, WebSocketUpgrade},
        extract::State as AxumState,
        http::StatusCode as AxumStatusCode,
        response::IntoResponse,
        routing::get,
        Router,
    };
    use commonware_codec::{DecodeExt, Encode};
    use std::net::SocketAddr;
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };
    use std::time::Duration;
    use tablestream_types::{
        ActionKind, ActionRecord, Card, GameName, GameStatus, Lobby, LobbyKind, LobbyList, Player,
        Rank, Request, ShowdownOutcome, Snapshot, Street, StreetStatus, Suit, Winner,
    };
    use tokio::sync::mpsc;
    use tokio::time::sleep;

    async fn serve_router(router: Router) -> (String, tokio::task::JoinHandle<()>) {
        let addr = SocketAddr::from(([127, 0, 0, 1], 0));
        let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
        let actual_addr = listener.local_addr().unwrap();
        let base_url = format!("http://{actual_addr}");

        let handle = tokio::spawn(async move {
            axum::serve(listener, router.into_make_service())
                .await
                .unwrap();
        });

        sleep(Duration::from_millis(50)).await;
        (base_url, handle)
    }

    fn card(rank: Rank) -> Card {
        Card::new(rank, Suit::Spades)
    }

    fn player(id: u64, bank: u64) -> Player {
        Player {
            id,
            name: format!("p{id}"),
            country: "US".to_string(),
            bank,
            action: None,
            cards: None,
        }
    }

    fn flop_snapshot(board_cards: usize) -> Snapshot {
        let cards = [card(Rank::Two), card(Rank::Five), card(Rank::Nine)][..board_cards].to_vec();
        Snapshot {
            player_id: 1,
            hole_cards: None,
            current_player_id: Some(2),
            button_id: Some(1),
            small_blind_id: Some(1),
            big_blind_id: Some(2),
            lobby_id: 7,
            street: Some(Street {
                status: StreetStatus::Flop,
                cards,
            }),
            status: GameStatus::Active,
            players: vec![player(1, 1_000), player(2, 800)],
            showdown: None,
            amount_to_call: 0,
            min_raise: 0,
            can_raise: true,
            actions: Vec::new(),
        }
    }

    fn showdown_snapshot() -> Snapshot {
        let final_board = vec![
            card(Rank::Two),
            card(Rank::Five),
            card(Rank::Nine),
            card(Rank::Jack),
            card(Rank::King),
        ];
        let mut state = flop_snapshot(3);
        state.street = Some(Street {
            status: StreetStatus::River,
            cards: final_board.clone(),
        });
        state.actions = vec![ActionRecord {
            player_id: 2,
            street: StreetStatus::Flop,
            kind: ActionKind::Call,
            bet: 200,
        }];
        state.showdown = Some(ShowdownOutcome {
            board: Street {
                status: StreetStatus::River,
                cards: final_board,
            },
            winners: vec![Winner {
                player_id: 1,
                amount: 500,
            }],
            revealed: Vec::new(),
            fast_forwarded: true,
        });
        state
    }

    fn sample_lobbies() -> LobbyList {
        LobbyList {
            lobbies: vec![Lobby {
                id: 7,
                name: "main".to_string(),
                author_id: 1,
                players_registered: 3,
                kind: LobbyKind::Cash,
                game: GameName::Holdem,
            }],
        }
    }

    #[derive(Clone)]
    struct WsState {
        frames: Vec<Vec<u8>>,
        inbound: mpsc::UnboundedSender<Vec<u8>>,
    }

    async fn ws_handler(
        ws: WebSocketUpgrade,
        AxumState(state): AxumState<WsState>,
    ) -> impl IntoResponse {
        ws.on_upgrade(move |socket| handle_socket(socket, state))
    }

    async fn handle_socket(mut socket: WebSocket, state: WsState) {
        for frame in state.frames {
            if socket.send(WsMessage::Binary(frame)).await.is_err() {
                return;
            }
        }
        while let Some(Ok(message)) = socket.recv().await {
            if let WsMessage::Binary(data) = message {
                if state.inbound.send(data).is_err() {
                    return;
                }
            }
        }
    }

    #[test]
    fn client_rejects_unsupported_scheme() {
        let result = Client::new("ftp://example.com");
        assert!(matches!(result, Err(Error::InvalidScheme(_))));
        assert!(Client::new("http://localhost:7878").is_ok());
        assert!(Client::new("https://localhost:7878").is_ok());
    }

    #[tokio::test]
    async fn lobbies_decodes_binary_listing() {
        let encoded = sample_lobbies().encode().to_vec();
        let router = Router::new()
            .route(
                "/lobbies",
                get(|AxumState(body): AxumState<Vec<u8>>| async move { body }),
            )
            .with_state(encoded);
        let (base_url, handle) = serve_router(router).await;

        let client = Client::new(&base_url).unwrap();
        let list = client.lobbies().await.unwrap();
        assert_eq!(list, sample_lobbies());

        handle.abort();
    }

    #[tokio::test]
    async fn lobbies_retries_retryable_statuses() {
        let counter = Arc::new(AtomicUsize::new(0));
        let encoded = sample_lobbies().encode().to_vec();
        let router = Router::new()
            .route(
                "/lobbies",
                get(
                    |AxumState((counter, body)): AxumState<(Arc<AtomicUsize>, Vec<u8>)>| async move {
                        let attempt = counter.fetch_add(1, Ordering::SeqCst);
                        if attempt < 2 {
                            AxumStatusCode::SERVICE_UNAVAILABLE.into_response()
                        } else {
                            body.into_response()
                        }
                    },
                ),
            )
            .with_state((counter.clone(), encoded));
        let (base_url, handle) = serve_router(router).await;

        let client = Client::new(&base_url).unwrap().with_retry_policy(RetryPolicy {
            max_attempts: 3,
            initial_backoff: Duration::ZERO,
            max_backoff: Duration::ZERO,
        });
        let list = client.lobbies().await.unwrap();
        assert_eq!(list, sample_lobbies());
        assert_eq!(counter.load(Ordering::SeqCst), 3);

        handle.abort();
    }

    #[tokio::test]
    async fn lobbies_gives_up_after_max_attempts() {
        let counter = Arc::new(AtomicUsize::new(0));
        let router = Router::new()
            .route(
                "/lobbies",
                get(|AxumState(counter): AxumState<Arc<AtomicUsize>>| async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    AxumStatusCode::SERVICE_UNAVAILABLE
                }),
            )
            .with_state(counter.clone());
        let (base_url, handle) = serve_router(router).await;

        let client = Client::new(&base_url).unwrap().with_retry_policy(RetryPolicy {
            max_attempts: 2,
            initial_backoff: Duration::ZERO,
            max_backoff: Duration::ZERO,
        });
        let err = client.lobbies().await.expect_err("should give up");
        assert!(matches!(
            err,
            Error::Failed(status) if status == reqwest::StatusCode::SERVICE_UNAVAILABLE
        ));
        assert_eq!(counter.load(Ordering::SeqCst), 2);

        handle.abort();
    }

    #[tokio::test]
    async fn snapshot_stream_survives_malformed_frames() {
        let first = flop_snapshot(3);
        let second = showdown_snapshot();
        let frames = vec![
            first.encode().to_vec(),
            b"not a snapshot".to_vec(),
            second.encode().to_vec(),
        ];
        let (inbound_tx, mut inbound_rx) = mpsc::unbounded_channel();
        let state = WsState {
            frames,
            inbound: inbound_tx,
        };
        let router = Router::new().route("/table", get(ws_handler)).with_state(state);
        let (base_url, handle) = serve_router(router).await;

        let client = Client::new(&base_url).unwrap();
        let mut table = client.connect(7, 1).await.unwrap();

        table
            .commands
            .send(Request::JoinLobby {
                lobby_id: 7,
                player_id: 1,
            })
            .unwrap();

        let decoded = table.snapshots.next().await.unwrap().unwrap();
        assert_eq!(decoded, first);

        let err = table.snapshots.next().await.unwrap();
        assert!(matches!(err, Err(Error::InvalidData(_))));

        let decoded = table.snapshots.next().await.unwrap().unwrap();
        assert_eq!(decoded, second);

        let raw = inbound_rx.recv().await.unwrap();
        let request = Request::decode(raw.as_slice()).unwrap();
        assert_eq!(
            request,
            Request::JoinLobby {
                lobby_id: 7,
                player_id: 1,
            }
        );

        handle.abort();
    }

    #[tokio::test]
    async fn snapshot_stream_tolerates_trailing_bytes() {
        let first = flop_snapshot(3);
        let mut grown = first.encode().to_vec();
        grown.extend_from_slice(&[0xab, 0xcd, 0xef]);
        let (inbound_tx, _inbound_rx) = mpsc::unbounded_channel();
        let state = WsState {
            frames: vec![grown],
            inbound: inbound_tx,
        };
        let router = Router::new().route("/table", get(ws_handler)).with_state(state);
        let (base_url, handle) = serve_router(router).await;

        let client = Client::new(&base_url).unwrap();
        let mut table = client.connect(7, 1).await.unwrap();
        let decoded = table.snapshots.next().await.unwrap().unwrap();
        assert_eq!(decoded, first);

        handle.abort();
    }

    #[tokio::test]
    async fn decoded_snapshots_drive_the_reconciler_end_to_end() {
        let first = flop_snapshot(2);
        let second = showdown_snapshot();
        let (inbound_tx, _inbound_rx) = mpsc::unbounded_channel();
        let state = WsState {
            frames: vec![first.encode().to_vec(), second.encode().to_vec()],
            inbound: inbound_tx,
        };
        let router = Router::new().route("/table", get(ws_handler)).with_state(state);
        let (base_url, handle) = serve_router(router).await;

        let client = Client::new(&base_url).unwrap();
        let mut table = client.connect(7, 1).await.unwrap();

        let (views_tx, mut views_rx) = mpsc::unbounded_channel();
        let reconciler = Reconciler::new(
            views_tx,
            Pacing {
                reveal: Duration::from_millis(1),
                settle: Duration::from_millis(1),
            },
        );

        for _ in 0..2 {
            let snapshot = table.snapshots.next().await.unwrap().unwrap();
            assert!(reconciler.submit(snapshot));
        }

        // Direct apply, interim, three reveals, settled.
        let mut board_lengths = Vec::new();
        for _ in 0..6 {
            let view = views_rx.recv().await.unwrap();
            board_lengths.push(view.board.len());
        }
        assert_eq!(board_lengths, vec![2, 2, 3, 4, 5, 5]);

        handle.abort();
    }
}
