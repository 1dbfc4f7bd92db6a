pub mod api;
pub mod cards;
pub mod codec;
pub mod game;
pub mod player;
pub mod snapshot;

pub use api::{GameName, Lobby, LobbyKind, LobbyList, Request};
pub use cards::{Card, HoleCards, Rank, Suit};
pub use game::{
    ActionKind, ActionRecord, GameStatus, PlayerAction, PlayerCards, ShowdownOutcome, Street,
    StreetStatus, Winner,
};
pub use player::Player;
pub use snapshot::Snapshot;
