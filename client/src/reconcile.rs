use crate::history::BetHistory;
use crate::seating::rotate_seats;
use serde::Serialize;
use std::time::Duration;
use tablestream_types::{Card, Player, PlayerAction, Snapshot};
use tokio::sync::mpsc;
use tokio::time::sleep;
use tracing::{debug, warn};

/// Delays used when playing back a fast-forwarded showdown.
#[derive(Clone, Copy, Debug)]
pub struct Pacing {
    /// Pause before each board card is revealed.
    pub reveal: Duration,
    /// Hold on the full board before snapping to the concluded state.
    pub settle: Duration,
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            reveal: Duration::from_millis(1_000),
            settle: Duration::from_millis(3_000),
        }
    }
}

impl Pacing {
    /// Defaults with `TABLE_REVEAL_MS` / `TABLE_SETTLE_MS` overrides.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            reveal: read_ms("TABLE_REVEAL_MS", defaults.reveal),
            settle: read_ms("TABLE_SETTLE_MS", defaults.settle),
        }
    }
}

fn read_ms(key: &str, fallback: Duration) -> Duration {
    std::env::var(key)
        .ok()
        .and_then(|raw| raw.parse::<u64>().ok())
        .map(Duration::from_millis)
        .unwrap_or(fallback)
}

/// What the presentation layer renders: seats rotated around the local
/// participant, the board as currently visible, the derived bet history, and
/// the raw snapshot the view was built from.
#[derive(Clone, Debug, Serialize)]
pub struct TableView {
    pub players: Vec<Player>,
    pub board: Vec<Card>,
    pub bets: BetHistory,
    pub snapshot: Snapshot,
}

/// Serializes snapshot application.
///
/// Snapshots are processed strictly in submission order, one at a time. A
/// snapshot's entire effect, including the multi-second reveal tail of a
/// fast-forwarded showdown, is published before the next snapshot is started,
/// no matter how quickly submissions arrive. Dropping the handle aborts the
/// worker mid-sleep if necessary: no timer leaks and nothing is published
/// after teardown.
pub struct Reconciler {
    submissions: mpsc::UnboundedSender<Snapshot>,
    worker: tokio::task::JoinHandle<()>,
}

impl Reconciler {
    pub fn new(views: mpsc::UnboundedSender<TableView>, pacing: Pacing) -> Self {
        let (submissions, queue) = mpsc::unbounded_channel();
        let worker = tokio::spawn(run(queue, views, pacing));
        Self {
            submissions,
            worker,
        }
    }

    /// Queue a snapshot for processing. Returns false once the worker has
    /// stopped, which only happens when the view receiver went away.
    pub fn submit(&self, snapshot: Snapshot) -> bool {
        self.submissions.send(snapshot).is_ok()
    }
}

impl Drop for Reconciler {
    fn drop(&mut self) {
        self.worker.abort();
    }
}

async fn run(
    mut queue: mpsc::UnboundedReceiver<Snapshot>,
    views: mpsc::UnboundedSender<TableView>,
    pacing: Pacing,
) {
    let mut prev: Option<Snapshot> = None;
    while let Some(next) = queue.recv().await {
        if !process(prev.as_ref(), &next, &views, &pacing).await {
            debug!("view receiver dropped; stopping reconciliation");
            return;
        }
        prev = Some(next);
    }
}

/// Apply one snapshot. Returns false when publishing fails.
async fn process(
    prev: Option<&Snapshot>,
    next: &Snapshot,
    views: &mpsc::UnboundedSender<TableView>,
    pacing: &Pacing,
) -> bool {
    let bets = BetHistory::recompute(next);
    let fast_forwarded = next
        .showdown
        .as_ref()
        .map_or(false, |outcome| outcome.fast_forwarded);

    match prev {
        Some(prev) if fast_forwarded => replay_showdown(prev, next, bets, views, pacing).await,
        _ => {
            // Direct application: the very first snapshot, and any update the
            // server did not fast-forward, snap straight to the new state.
            let view = TableView {
                players: rotate_seats(&next.players, next.player_id, next.hole_cards),
                board: next.board().to_vec(),
                bets,
                snapshot: next.clone(),
            };
            views.send(view).is_ok()
        }
    }
}

/// Play back a fast-forwarded showdown.
///
/// The server never emitted a snapshot for the final action that closed the
/// betting, so it is reconstructed onto the previous seat list first; the
/// remaining board cards are then revealed one at a time before the view
/// settles on the new snapshot's own state.
async fn replay_showdown(
    prev: &Snapshot,
    next: &Snapshot,
    bets: BetHistory,
    views: &mpsc::UnboundedSender<TableView>,
    pacing: &Pacing,
) -> bool {
    let mut seats = prev.players.clone();
    let mut board = prev.board().to_vec();

    // Before the first street there is no betting to reconstruct.
    if prev.street.is_some() {
        if let Some(last) = next.actions.last() {
            match seats.iter_mut().find(|seat| seat.id == last.player_id) {
                Some(seat) => {
                    seat.action = Some(PlayerAction {
                        kind: last.kind,
                        bet: last.bet,
                    });
                    if last.kind.commits_chips() {
                        seat.bank = seat.bank.saturating_sub(last.bet);
                    }
                }
                // A dropped intermediate snapshot can leave the actor unknown
                // to us; the reveal still runs, only the patch is skipped.
                None => warn!(
                    player_id = last.player_id,
                    "last actor missing from previous snapshot; skipping action patch"
                ),
            }
        }
    }

    let rotated = rotate_seats(&seats, prev.player_id, prev.hole_cards);

    if prev.street.is_some() {
        let interim = TableView {
            players: rotated.clone(),
            board: board.clone(),
            bets: bets.clone(),
            snapshot: next.clone(),
        };
        if views.send(interim).is_err() {
            return false;
        }
    }

    if let Some(outcome) = &next.showdown {
        // A final board no longer than what is already visible reveals
        // nothing; skip() keeps the loop from ever running backwards.
        for card in outcome.board.cards.iter().skip(board.len()) {
            sleep(pacing.reveal).await;
            board.push(*card);
            let view = TableView {
                players: rotated.clone(),
                board: board.clone(),
                bets: bets.clone(),
                snapshot: next.clone(),
            };
            if views.send(view).is_err() {
                return false;
            }
        }
    }

    sleep(pacing.settle).await;

    let settled = TableView {
        players: rotate_seats(&next.players, next.player_id, next.hole_cards),
        board: next.board().to_vec(),
        bets,
        snapshot: next.clone(),
    };
    views.send(settled).is_ok()
}
