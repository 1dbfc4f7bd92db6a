use crate::cards::{Card, HoleCards};
use bytes::{Buf, BufMut};
use commonware_codec::{EncodeSize, Error, FixedSize, Read, ReadExt, ReadRangeExt, Write};
use serde::Serialize;

/// Number of betting rounds in a hand.
pub const STREET_COUNT: usize = 4;

/// Maximum number of community cards on the board.
pub const MAX_BOARD_CARDS: usize = 5;

/// Maximum number of seats at a table.
pub const MAX_TABLE_PLAYERS: usize = 10;

/// The betting round a hand is on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[repr(u8)]
pub enum StreetStatus {
    Preflop = 0,
    Flop = 1,
    Turn = 2,
    River = 3,
}

impl StreetStatus {
    /// Ordinal of this street, 0-based.
    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl Write for StreetStatus {
    fn write(&self, writer: &mut impl BufMut) {
        (*self as u8).write(writer);
    }
}

impl Read for StreetStatus {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        let value = u8::read(reader)?;
        match value {
            0 => Ok(Self::Preflop),
            1 => Ok(Self::Flop),
            2 => Ok(Self::Turn),
            3 => Ok(Self::River),
            i => Err(Error::InvalidEnum(i)),
        }
    }
}

impl FixedSize for StreetStatus {
    const SIZE: usize = 1;
}

/// The current betting round and the board cards revealed so far.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Street {
    pub status: StreetStatus,
    pub cards: Vec<Card>,
}

impl Write for Street {
    fn write(&self, writer: &mut impl BufMut) {
        self.status.write(writer);
        self.cards.write(writer);
    }
}

impl Read for Street {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        Ok(Self {
            status: StreetStatus::read(reader)?,
            cards: Vec::<Card>::read_range(reader, 0..=MAX_BOARD_CARDS)?,
        })
    }
}

impl EncodeSize for Street {
    fn encode_size(&self) -> usize {
        self.status.encode_size() + self.cards.encode_size()
    }
}

/// Coarse lifecycle of the table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[repr(u8)]
pub enum GameStatus {
    Pause = 0,
    None = 1,
    Active = 2,
}

impl Write for GameStatus {
    fn write(&self, writer: &mut impl BufMut) {
        (*self as u8).write(writer);
    }
}

impl Read for GameStatus {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        let value = u8::read(reader)?;
        match value {
            0 => Ok(Self::Pause),
            1 => Ok(Self::None),
            2 => Ok(Self::Active),
            i => Err(Error::InvalidEnum(i)),
        }
    }
}

impl FixedSize for GameStatus {
    const SIZE: usize = 1;
}

/// What a player did on their turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[repr(u8)]
pub enum ActionKind {
    Fold = 0,
    Call = 1,
    Raise = 2,
    Check = 3,
}

impl ActionKind {
    /// True if the action moves chips from the player's bank to the pot.
    pub fn commits_chips(&self) -> bool {
        matches!(self, Self::Call | Self::Raise)
    }
}

impl Write for ActionKind {
    fn write(&self, writer: &mut impl BufMut) {
        (*self as u8).write(writer);
    }
}

impl Read for ActionKind {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        let value = u8::read(reader)?;
        match value {
            0 => Ok(Self::Fold),
            1 => Ok(Self::Call),
            2 => Ok(Self::Raise),
            3 => Ok(Self::Check),
            i => Err(Error::InvalidEnum(i)),
        }
    }
}

impl FixedSize for ActionKind {
    const SIZE: usize = 1;
}

/// A player's most recent action and the amount wagered by it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct PlayerAction {
    pub kind: ActionKind,
    pub bet: u64,
}

impl Write for PlayerAction {
    fn write(&self, writer: &mut impl BufMut) {
        self.kind.write(writer);
        self.bet.write(writer);
    }
}

impl Read for PlayerAction {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        Ok(Self {
            kind: ActionKind::read(reader)?,
            bet: u64::read(reader)?,
        })
    }
}

impl EncodeSize for PlayerAction {
    fn encode_size(&self) -> usize {
        self.kind.encode_size() + self.bet.encode_size()
    }
}

/// One entry of the hand's action history. The server appends monotonically
/// and every snapshot carries the complete history for the hand.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ActionRecord {
    pub player_id: u64,
    pub street: StreetStatus,
    pub kind: ActionKind,
    pub bet: u64,
}

impl Write for ActionRecord {
    fn write(&self, writer: &mut impl BufMut) {
        self.player_id.write(writer);
        self.street.write(writer);
        self.kind.write(writer);
        self.bet.write(writer);
    }
}

impl Read for ActionRecord {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        Ok(Self {
            player_id: u64::read(reader)?,
            street: StreetStatus::read(reader)?,
            kind: ActionKind::read(reader)?,
            bet: u64::read(reader)?,
        })
    }
}

impl EncodeSize for ActionRecord {
    fn encode_size(&self) -> usize {
        self.player_id.encode_size()
            + self.street.encode_size()
            + self.kind.encode_size()
            + self.bet.encode_size()
    }
}

/// A pot share awarded at showdown.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Winner {
    pub player_id: u64,
    pub amount: u64,
}

impl Write for Winner {
    fn write(&self, writer: &mut impl BufMut) {
        self.player_id.write(writer);
        self.amount.write(writer);
    }
}

impl Read for Winner {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        Ok(Self {
            player_id: u64::read(reader)?,
            amount: u64::read(reader)?,
        })
    }
}

impl EncodeSize for Winner {
    fn encode_size(&self) -> usize {
        self.player_id.encode_size() + self.amount.encode_size()
    }
}

/// Hole cards revealed for one player at showdown.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct PlayerCards {
    pub player_id: u64,
    pub cards: HoleCards,
}

impl Write for PlayerCards {
    fn write(&self, writer: &mut impl BufMut) {
        self.player_id.write(writer);
        self.cards.write(writer);
    }
}

impl Read for PlayerCards {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        Ok(Self {
            player_id: u64::read(reader)?,
            cards: HoleCards::read(reader)?,
        })
    }
}

impl EncodeSize for PlayerCards {
    fn encode_size(&self) -> usize {
        self.player_id.encode_size() + self.cards.encode_size()
    }
}

/// How a concluded hand resolved.
///
/// `fast_forwarded` is set when the server advanced through the remaining
/// betting rounds without per-street client interaction (everyone committed),
/// in which case `board` holds the final board the hand reached.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ShowdownOutcome {
    pub board: Street,
    pub winners: Vec<Winner>,
    pub revealed: Vec<PlayerCards>,
    pub fast_forwarded: bool,
}

impl Write for ShowdownOutcome {
    fn write(&self, writer: &mut impl BufMut) {
        self.board.write(writer);
        self.winners.write(writer);
        self.revealed.write(writer);
        self.fast_forwarded.write(writer);
    }
}

impl Read for ShowdownOutcome {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        Ok(Self {
            board: Street::read(reader)?,
            winners: Vec::<Winner>::read_range(reader, 0..=MAX_TABLE_PLAYERS)?,
            revealed: Vec::<PlayerCards>::read_range(reader, 0..=MAX_TABLE_PLAYERS)?,
            fast_forwarded: bool::read(reader)?,
        })
    }
}

impl EncodeSize for ShowdownOutcome {
    fn encode_size(&self) -> usize {
        self.board.encode_size()
            + self.winners.encode_size()
            + self.revealed.encode_size()
            + self.fast_forwarded.encode_size()
    }
}
