use crate::cards::HoleCards;
use crate::codec::{read_string, string_encode_size, write_string};
use crate::game::PlayerAction;
use bytes::{Buf, BufMut};
use commonware_codec::{EncodeSize, Error, Read, ReadExt, Write};
use serde::Serialize;

/// Maximum display-name length.
pub const MAX_NAME_LENGTH: usize = 32;

/// Maximum country-code length.
pub const MAX_COUNTRY_LENGTH: usize = 8;

/// One seat at the table as the server reports it.
///
/// `cards` is populated only for the local participant or once revealed at
/// showdown; everyone else's stay hidden.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Player {
    pub id: u64,
    pub name: String,
    pub country: String,
    pub bank: u64,
    pub action: Option<PlayerAction>,
    pub cards: Option<HoleCards>,
}

impl Write for Player {
    fn write(&self, writer: &mut impl BufMut) {
        self.id.write(writer);
        write_string(&self.name, writer);
        write_string(&self.country, writer);
        self.bank.write(writer);
        self.action.write(writer);
        self.cards.write(writer);
    }
}

impl Read for Player {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        Ok(Self {
            id: u64::read(reader)?,
            name: read_string(reader, MAX_NAME_LENGTH)?,
            country: read_string(reader, MAX_COUNTRY_LENGTH)?,
            bank: u64::read(reader)?,
            action: Option::<PlayerAction>::read(reader)?,
            cards: Option::<HoleCards>::read(reader)?,
        })
    }
}

impl EncodeSize for Player {
    fn encode_size(&self) -> usize {
        self.id.encode_size()
            + string_encode_size(&self.name)
            + string_encode_size(&self.country)
            + self.bank.encode_size()
            + self.action.encode_size()
            + self.cards.encode_size()
    }
}
