use serde::Serialize;
use std::collections::HashMap;
use tablestream_types::game::STREET_COUNT;
use tablestream_types::{Snapshot, StreetStatus};

/// Per-(player, street) wager totals derived from a snapshot's action
/// history, plus the pot carried over from earlier streets.
///
/// Rebuilt wholesale from every snapshot: it is a pure function of the
/// authoritative action history and never of a previously published value,
/// so client accounting cannot drift from the server's.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct BetHistory {
    stacks: HashMap<u64, [u64; STREET_COUNT]>,
    carried_pot: u64,
}

impl BetHistory {
    /// Rebuild from the snapshot's action history.
    pub fn recompute(snapshot: &Snapshot) -> Self {
        let mut stacks: HashMap<u64, [u64; STREET_COUNT]> = HashMap::new();
        for action in &snapshot.actions {
            let streets = stacks.entry(action.player_id).or_default();
            streets[action.street.index()] += action.bet;
        }

        let mut carried_pot = 0;
        if let Some(current) = snapshot.street_status() {
            carried_pot = stacks
                .values()
                .map(|streets| streets[..current.index()].iter().sum::<u64>())
                .sum();
        }

        // Once the server has fast-forwarded the hand to showdown the
        // per-street piles are no longer live bets; only the carried pot is
        // shown at the table.
        let fast_forwarded = snapshot
            .showdown
            .as_ref()
            .map_or(false, |outcome| outcome.fast_forwarded);
        if fast_forwarded {
            stacks.clear();
        }

        Self {
            stacks,
            carried_pot,
        }
    }

    /// Total wagered by `player_id` on `street` during the current hand.
    pub fn street_total(&self, player_id: u64, street: StreetStatus) -> u64 {
        self.stacks
            .get(&player_id)
            .map_or(0, |streets| streets[street.index()])
    }

    /// Chips swept into the pot on streets earlier than the snapshot's
    /// current one, displayed as a single stack rather than per-player piles.
    pub fn carried_pot(&self) -> u64 {
        self.carried_pot
    }

    /// True when no per-street wagers are recorded.
    pub fn is_empty(&self) -> bool {
        self.stacks.is_empty()
    }
}
