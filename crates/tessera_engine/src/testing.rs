//! Shared schema for unit tests.

use tessera_foundation::EntityId;

#[derive(Clone, Debug, PartialEq)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Health(pub i64);

#[derive(Clone, Debug, PartialEq)]
pub struct Player;

tessera_foundation::component_schema! {
    pub enum Game: GameKey {
        Position(Position),
        Health(Health),
        Player(Player),
    }
}

pub fn id(name: &str) -> EntityId {
    EntityId::from(name)
}

pub fn pos(x: i32, y: i32) -> Position {
    Position { x, y }
}
