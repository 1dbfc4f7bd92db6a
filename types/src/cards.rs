use bytes::{Buf, BufMut};
use commonware_codec::{Error, FixedSize, Read, ReadExt, Write};
use serde::Serialize;

/// Card rank, deuce through ace.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[repr(u8)]
pub enum Rank {
    Two = 0,
    Three = 1,
    Four = 2,
    Five = 3,
    Six = 4,
    Seven = 5,
    Eight = 6,
    Nine = 7,
    Ten = 8,
    Jack = 9,
    Queen = 10,
    King = 11,
    Ace = 12,
}

impl Rank {
    /// One-character symbol used in hand notation ("2".."9", "T", "J", "Q", "K", "A").
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Two => "2",
            Self::Three => "3",
            Self::Four => "4",
            Self::Five => "5",
            Self::Six => "6",
            Self::Seven => "7",
            Self::Eight => "8",
            Self::Nine => "9",
            Self::Ten => "T",
            Self::Jack => "J",
            Self::Queen => "Q",
            Self::King => "K",
            Self::Ace => "A",
        }
    }
}

impl Write for Rank {
    fn write(&self, writer: &mut impl BufMut) {
        (*self as u8).write(writer);
    }
}

impl Read for Rank {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        let value = u8::read(reader)?;
        match value {
            0 => Ok(Self::Two),
            1 => Ok(Self::Three),
            2 => Ok(Self::Four),
            3 => Ok(Self::Five),
            4 => Ok(Self::Six),
            5 => Ok(Self::Seven),
            6 => Ok(Self::Eight),
            7 => Ok(Self::Nine),
            8 => Ok(Self::Ten),
            9 => Ok(Self::Jack),
            10 => Ok(Self::Queen),
            11 => Ok(Self::King),
            12 => Ok(Self::Ace),
            i => Err(Error::InvalidEnum(i)),
        }
    }
}

impl FixedSize for Rank {
    const SIZE: usize = 1;
}

/// Card suit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[repr(u8)]
pub enum Suit {
    Clubs = 0,
    Spades = 1,
    Hearts = 2,
    Diamonds = 3,
}

impl Suit {
    /// One-character symbol used in hand notation.
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Clubs => "c",
            Self::Spades => "s",
            Self::Hearts => "h",
            Self::Diamonds => "d",
        }
    }
}

impl Write for Suit {
    fn write(&self, writer: &mut impl BufMut) {
        (*self as u8).write(writer);
    }
}

impl Read for Suit {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        let value = u8::read(reader)?;
        match value {
            0 => Ok(Self::Clubs),
            1 => Ok(Self::Spades),
            2 => Ok(Self::Hearts),
            3 => Ok(Self::Diamonds),
            i => Err(Error::InvalidEnum(i)),
        }
    }
}

impl FixedSize for Suit {
    const SIZE: usize = 1;
}

/// A single playing card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Card {
    pub rank: Rank,
    pub suit: Suit,
}

impl Card {
    pub fn new(rank: Rank, suit: Suit) -> Self {
        Self { rank, suit }
    }
}

impl std::fmt::Display for Card {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.rank.symbol(), self.suit.symbol())
    }
}

impl Write for Card {
    fn write(&self, writer: &mut impl BufMut) {
        self.rank.write(writer);
        self.suit.write(writer);
    }
}

impl Read for Card {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        Ok(Self {
            rank: Rank::read(reader)?,
            suit: Suit::read(reader)?,
        })
    }
}

impl FixedSize for Card {
    const SIZE: usize = Rank::SIZE + Suit::SIZE;
}

/// A player's two private cards.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct HoleCards {
    pub first: Card,
    pub second: Card,
}

impl Write for HoleCards {
    fn write(&self, writer: &mut impl BufMut) {
        self.first.write(writer);
        self.second.write(writer);
    }
}

impl Read for HoleCards {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        Ok(Self {
            first: Card::read(reader)?,
            second: Card::read(reader)?,
        })
    }
}

impl FixedSize for HoleCards {
    const SIZE: usize = Card::SIZE * 2;
}
