use tablestream_types::{HoleCards, Player};

/// Rotate `players` so the local participant sits at index 0 while everyone
/// else keeps their relative clockwise order, wrapping around the end of the
/// list.
///
/// The participant's private `hole_cards` ride at the top level of the
/// snapshot, not inside the player list, so they are stamped onto the rotated
/// first entry here. A list that does not contain `local_id` yields an empty
/// list, which callers surface as a "not ready" view rather than an error.
pub fn rotate_seats(
    players: &[Player],
    local_id: u64,
    hole_cards: Option<HoleCards>,
) -> Vec<Player> {
    let Some(index) = players.iter().position(|player| player.id == local_id) else {
        return Vec::new();
    };

    let mut seats = Vec::with_capacity(players.len());
    seats.extend_from_slice(&players[index..]);
    seats.extend_from_slice(&players[..index]);

    if let Some(cards) = hole_cards {
        seats[0].cards = Some(cards);
    }

    seats
}
