use crate::{
    world::{
        data::{EntityData, Item, Location, Meter, MonsterType, Tile},
        stats::PLAYER_BASE_STATS,
        World,
    },
    Entity,
};
use coord_2d::Coord;
use entity_table::entity_data;

pub fn make_player() -> EntityData {
    entity_data! {
        player: (),
        tile: Tile::Player,
        blocks_movement: (),
        health: Meter::new_full(PLAYER_BASE_STATS.max_hp),
        stats: PLAYER_BASE_STATS,
    }
}

impl World {
    pub fn insert_entity_data(&mut self, location: Location, entity_data: EntityData) -> Entity {
        let entity = self.entity_allocator.alloc();
        self.components.insert_entity_data(entity, entity_data);
        self.components.location.insert(entity, location);
        entity
    }

    pub fn move_entity_to(&mut self, entity: Entity, location: Location) {
        self.components.location.insert(entity, location);
    }

    pub fn spawn_monster(&mut self, coord: Coord, monster_type: MonsterType) -> Entity {
        let stats = monster_type.base_stats();
        self.insert_entity_data(
            Location::OnMap(coord),
            entity_data! {
                tile: monster_type.tile(),
                monster: monster_type,
                blocks_movement: (),
                health: Meter::new_full(stats.max_hp),
                stats: stats,
            },
        )
    }

    pub fn spawn_item(&mut self, coord: Coord, item: Item) -> Entity {
        self.insert_entity_data(
            Location::OnMap(coord),
            entity_data! {
                tile: Tile::Item(item),
                item: item,
            },
        )
    }

    pub fn spawn_stairs_down(&mut self, coord: Coord) -> Entity {
        self.insert_entity_data(
            Location::OnMap(coord),
            entity_data! {
                tile: Tile::StairsDown,
                stairs_down: (),
            },
        )
    }
}
