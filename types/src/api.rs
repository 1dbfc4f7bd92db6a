use crate::codec::{read_string, string_encode_size, write_string};
use crate::game::PlayerAction;
use bytes::{Buf, BufMut};
use commonware_codec::{EncodeSize, Error, FixedSize, Read, ReadExt, ReadRangeExt, Write};
use serde::Serialize;

/// Maximum lobby-name length.
pub const MAX_LOBBY_NAME_LENGTH: usize = 64;

/// Maximum bot-model identifier length.
pub const MAX_MODEL_LENGTH: usize = 64;

/// Maximum number of lobbies returned by a listing query.
pub const MAX_LOBBIES: usize = 256;

/// Which poker variant a lobby runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[repr(u8)]
pub enum GameName {
    Holdem = 0,
}

impl Write for GameName {
    fn write(&self, writer: &mut impl BufMut) {
        (*self as u8).write(writer);
    }
}

impl Read for GameName {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        let value = u8::read(reader)?;
        match value {
            0 => Ok(Self::Holdem),
            i => Err(Error::InvalidEnum(i)),
        }
    }
}

impl FixedSize for GameName {
    const SIZE: usize = 1;
}

/// Whether a lobby plays for a prize pool or for cash.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[repr(u8)]
pub enum LobbyKind {
    Tournament = 0,
    Cash = 1,
}

impl Write for LobbyKind {
    fn write(&self, writer: &mut impl BufMut) {
        (*self as u8).write(writer);
    }
}

impl Read for LobbyKind {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        let value = u8::read(reader)?;
        match value {
            0 => Ok(Self::Tournament),
            1 => Ok(Self::Cash),
            i => Err(Error::InvalidEnum(i)),
        }
    }
}

impl FixedSize for LobbyKind {
    const SIZE: usize = 1;
}

/// Requests a client sends to the game server.
///
/// All are fire-and-forget: the server answers with snapshot pushes, never
/// with a direct reply on this channel.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum Request {
    /// A betting decision for the hand in progress.
    /// Binary: [0] [lobbyId:u64] [playerId:u64] [kind:u8] [bet:u64]
    Action {
        lobby_id: u64,
        player_id: u64,
        action: PlayerAction,
    },

    /// Take a seat in a lobby.
    /// Binary: [1] [lobbyId:u64] [playerId:u64]
    JoinLobby { lobby_id: u64, player_id: u64 },

    /// Open a new lobby.
    /// Binary: [2] [nameLen:u32] [name...] [game:u8] [kind:u8] [authorId:u64]
    CreateLobby {
        name: String,
        game: GameName,
        kind: LobbyKind,
        author_id: u64,
    },

    /// Begin dealing hands in a lobby.
    /// Binary: [3] [lobbyId:u64] [playerId:u64]
    StartGame { lobby_id: u64, player_id: u64 },

    /// Seat a server-side bot backed by the named model.
    /// Binary: [4] [lobbyId:u64] [modelLen:u32] [model...]
    SpawnBot { lobby_id: u64, model: String },
}

impl Write for Request {
    fn write(&self, writer: &mut impl BufMut) {
        match self {
            Request::Action {
                lobby_id,
                player_id,
                action,
            } => {
                0u8.write(writer);
                lobby_id.write(writer);
                player_id.write(writer);
                action.write(writer);
            }
            Request::JoinLobby {
                lobby_id,
                player_id,
            } => {
                1u8.write(writer);
                lobby_id.write(writer);
                player_id.write(writer);
            }
            Request::CreateLobby {
                name,
                game,
                kind,
                author_id,
            } => {
                2u8.write(writer);
                write_string(name, writer);
                game.write(writer);
                kind.write(writer);
                author_id.write(writer);
            }
            Request::StartGame {
                lobby_id,
                player_id,
            } => {
                3u8.write(writer);
                lobby_id.write(writer);
                player_id.write(writer);
            }
            Request::SpawnBot { lobby_id, model } => {
                4u8.write(writer);
                lobby_id.write(writer);
                write_string(model, writer);
            }
        }
    }
}

impl Read for Request {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        let kind = u8::read(reader)?;
        match kind {
            0 => Ok(Request::Action {
                lobby_id: u64::read(reader)?,
                player_id: u64::read(reader)?,
                action: PlayerAction::read(reader)?,
            }),
            1 => Ok(Request::JoinLobby {
                lobby_id: u64::read(reader)?,
                player_id: u64::read(reader)?,
            }),
            2 => Ok(Request::CreateLobby {
                name: read_string(reader, MAX_LOBBY_NAME_LENGTH)?,
                game: GameName::read(reader)?,
                kind: LobbyKind::read(reader)?,
                author_id: u64::read(reader)?,
            }),
            3 => Ok(Request::StartGame {
                lobby_id: u64::read(reader)?,
                player_id: u64::read(reader)?,
            }),
            4 => Ok(Request::SpawnBot {
                lobby_id: u64::read(reader)?,
                model: read_string(reader, MAX_MODEL_LENGTH)?,
            }),
            i => Err(Error::InvalidEnum(i)),
        }
    }
}

impl EncodeSize for Request {
    fn encode_size(&self) -> usize {
        1 + match self {
            Request::Action {
                lobby_id,
                player_id,
                action,
            } => lobby_id.encode_size() + player_id.encode_size() + action.encode_size(),
            Request::JoinLobby {
                lobby_id,
                player_id,
            } => lobby_id.encode_size() + player_id.encode_size(),
            Request::CreateLobby {
                name,
                game,
                kind,
                author_id,
            } => {
                string_encode_size(name)
                    + game.encode_size()
                    + kind.encode_size()
                    + author_id.encode_size()
            }
            Request::StartGame {
                lobby_id,
                player_id,
            } => lobby_id.encode_size() + player_id.encode_size(),
            Request::SpawnBot { lobby_id, model } => {
                lobby_id.encode_size() + string_encode_size(model)
            }
        }
    }
}

/// A joinable table as reported by the lobby listing query.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Lobby {
    pub id: u64,
    pub name: String,
    pub author_id: u64,
    pub players_registered: u32,
    pub kind: LobbyKind,
    pub game: GameName,
}

impl Write for Lobby {
    fn write(&self, writer: &mut impl BufMut) {
        self.id.write(writer);
        write_string(&self.name, writer);
        self.author_id.write(writer);
        self.players_registered.write(writer);
        self.kind.write(writer);
        self.game.write(writer);
    }
}

impl Read for Lobby {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        Ok(Self {
            id: u64::read(reader)?,
            name: read_string(reader, MAX_LOBBY_NAME_LENGTH)?,
            author_id: u64::read(reader)?,
            players_registered: u32::read(reader)?,
            kind: LobbyKind::read(reader)?,
            game: GameName::read(reader)?,
        })
    }
}

impl EncodeSize for Lobby {
    fn encode_size(&self) -> usize {
        self.id.encode_size()
            + string_encode_size(&self.name)
            + self.author_id.encode_size()
            + self.players_registered.encode_size()
            + self.kind.encode_size()
            + self.game.encode_size()
    }
}

/// Response of the lobby listing query.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LobbyList {
    pub lobbies: Vec<Lobby>,
}

impl Write for LobbyList {
    fn write(&self, writer: &mut impl BufMut) {
        self.lobbies.write(writer);
    }
}

impl Read for LobbyList {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        Ok(Self {
            lobbies: Vec::<Lobby>::read_range(reader, 0..=MAX_LOBBIES)?,
        })
    }
}

impl EncodeSize for LobbyList {
    fn encode_size(&self) -> usize {
        self.lobbies.encode_size()
    }
}
