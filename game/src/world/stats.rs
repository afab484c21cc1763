use crate::world::data::{Item, MonsterType};
use serde::{Deserialize, Serialize};
use std::ops::Add;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub max_hp: u32,
    pub defense: i32,
    pub power: i32,
}

impl Add for Stats {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        Self {
            max_hp: self.max_hp + other.max_hp,
            defense: self.defense + other.defense,
            power: self.power + other.power,
        }
    }
}

pub const PLAYER_BASE_STATS: Stats = Stats {
    max_hp: 30,
    defense: 2,
    power: 5,
};

impl MonsterType {
    pub fn base_stats(self) -> Stats {
        match self {
            Self::Orc => Stats {
                max_hp: 10,
                defense: 0,
                power: 3,
            },
            Self::Troll => Stats {
                max_hp: 16,
                defense: 1,
                power: 4,
            },
        }
    }
}

impl Item {
    /// The bonus granted while the item is equipped. `None` for items that
    /// can't be equipped.
    pub fn equipment_bonus(self) -> Option<Stats> {
        match self {
            Self::Sword => Some(Stats {
                power: 3,
                ..Default::default()
            }),
            Self::Shield => Some(Stats {
                defense: 1,
                ..Default::default()
            }),
            Self::HealingPotion
            | Self::ConfusionScroll
            | Self::LightningScroll
            | Self::FireballScroll => None,
        }
    }
}

pub fn effective_stats<I: IntoIterator<Item = Stats>>(base: Stats, bonuses: I) -> Stats {
    bonuses.into_iter().fold(base, Add::add)
}
