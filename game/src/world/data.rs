use crate::world::stats::Stats;
use coord_2d::Coord;
use entity_table::{declare_entity_module, Entity};
use serde::{Deserialize, Serialize};

declare_entity_module! {
    components {
        player: (),
        tile: Tile,
        location: Location,
        blocks_movement: (),
        monster: MonsterType,
        item: Item,
        stairs_down: (),
        health: Meter,
        stats: Stats,
    }
}
pub use components::{Components, EntityData};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub enum Tile {
    Player,
    Orc,
    Troll,
    StairsDown,
    Item(Item),
}

/// Where an entity is. Only entities on the map have a coordinate; the
/// others are somewhere inside another entity's inventory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Location {
    OnMap(Coord),
    CarriedBy(Entity),
    EquippedBy(Entity),
}

impl Location {
    pub fn coord(&self) -> Option<Coord> {
        match self {
            Self::OnMap(coord) => Some(*coord),
            Self::CarriedBy(_) | Self::EquippedBy(_) => None,
        }
    }

    pub fn holder(&self) -> Option<Entity> {
        match self {
            Self::OnMap(_) => None,
            Self::CarriedBy(entity) | Self::EquippedBy(entity) => Some(*entity),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Meter {
    current: u32,
    max: u32,
}

impl Meter {
    pub fn new(current: u32, max: u32) -> Self {
        Self { current, max }
    }
    pub fn new_full(max: u32) -> Self {
        Self::new(max, max)
    }
    pub fn current(&self) -> u32 {
        self.current
    }
    pub fn max(&self) -> u32 {
        self.max
    }
    pub fn set_current(&mut self, to: u32) {
        self.current = to.min(self.max);
    }
    pub fn decrease(&mut self, by: u32) {
        self.current = self.current.saturating_sub(by);
    }
    pub fn increase(&mut self, by: u32) {
        self.set_current(self.current.saturating_add(by));
    }
    pub fn set_max(&mut self, to: u32) {
        self.max = to;
        self.set_current(self.current);
    }
    pub fn is_full(&self) -> bool {
        self.current == self.max
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MonsterType {
    Orc,
    Troll,
}

impl MonsterType {
    pub fn tile(self) -> Tile {
        match self {
            Self::Orc => Tile::Orc,
            Self::Troll => Tile::Troll,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Item {
    HealingPotion,
    ConfusionScroll,
    LightningScroll,
    FireballScroll,
    Sword,
    Shield,
}
