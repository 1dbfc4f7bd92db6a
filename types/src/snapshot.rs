use crate::cards::HoleCards;
use crate::game::{
    ActionRecord, GameStatus, ShowdownOutcome, Street, StreetStatus, MAX_TABLE_PLAYERS,
};
use crate::player::Player;
use bytes::{Buf, BufMut};
use commonware_codec::{EncodeSize, Error, Read, ReadExt, ReadRangeExt, Write};
use serde::Serialize;

/// Maximum number of action-history entries in one hand.
pub const MAX_ACTION_HISTORY: usize = 512;

/// One authoritative, self-describing state of the hand, pushed by the
/// server after every change. Tailored to the receiving participant:
/// `player_id` names the recipient and `hole_cards` carries only their
/// private pair.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    pub player_id: u64,
    pub hole_cards: Option<HoleCards>,
    pub current_player_id: Option<u64>,
    pub button_id: Option<u64>,
    pub small_blind_id: Option<u64>,
    pub big_blind_id: Option<u64>,
    pub lobby_id: u64,
    pub street: Option<Street>,
    pub status: GameStatus,
    pub players: Vec<Player>,
    pub showdown: Option<ShowdownOutcome>,
    pub amount_to_call: u64,
    pub min_raise: u64,
    pub can_raise: bool,
    pub actions: Vec<ActionRecord>,
}

impl Snapshot {
    /// Board cards visible in this snapshot, empty before the hand starts.
    pub fn board(&self) -> &[crate::cards::Card] {
        self.street
            .as_ref()
            .map_or(&[], |street| street.cards.as_slice())
    }

    /// The betting round this snapshot is on, if the hand has started.
    pub fn street_status(&self) -> Option<StreetStatus> {
        self.street.as_ref().map(|street| street.status)
    }
}

impl Write for Snapshot {
    fn write(&self, writer: &mut impl BufMut) {
        self.player_id.write(writer);
        self.hole_cards.write(writer);
        self.current_player_id.write(writer);
        self.button_id.write(writer);
        self.small_blind_id.write(writer);
        self.big_blind_id.write(writer);
        self.lobby_id.write(writer);
        self.street.write(writer);
        self.status.write(writer);
        self.players.write(writer);
        self.showdown.write(writer);
        self.amount_to_call.write(writer);
        self.min_raise.write(writer);
        self.can_raise.write(writer);
        self.actions.write(writer);
    }
}

impl Read for Snapshot {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        Ok(Self {
            player_id: u64::read(reader)?,
            hole_cards: Option::<HoleCards>::read(reader)?,
            current_player_id: Option::<u64>::read(reader)?,
            button_id: Option::<u64>::read(reader)?,
            small_blind_id: Option::<u64>::read(reader)?,
            big_blind_id: Option::<u64>::read(reader)?,
            lobby_id: u64::read(reader)?,
            street: Option::<Street>::read(reader)?,
            status: GameStatus::read(reader)?,
            players: Vec::<Player>::read_range(reader, 0..=MAX_TABLE_PLAYERS)?,
            showdown: Option::<ShowdownOutcome>::read(reader)?,
            amount_to_call: u64::read(reader)?,
            min_raise: u64::read(reader)?,
            can_raise: bool::read(reader)?,
            actions: Vec::<ActionRecord>::read_range(reader, 0..=MAX_ACTION_HISTORY)?,
        })
    }
}

impl EncodeSize for Snapshot {
    fn encode_size(&self) -> usize {
        self.player_id.encode_size()
            + self.hole_cards.encode_size()
            + self.current_player_id.encode_size()
            + self.button_id.encode_size()
            + self.small_blind_id.encode_size()
            + self.big_blind_id.encode_size()
            + self.lobby_id.encode_size()
            + self.street.encode_size()
            + self.status.encode_size()
            + self.players.encode_size()
            + self.showdown.encode_size()
            + self.amount_to_call.encode_size()
            + self.min_raise.encode_size()
            + self.can_raise.encode_size()
            + self.actions.encode_size()
    }
}
