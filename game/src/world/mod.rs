use entity_table::{Entity, EntityAllocator};
use serde::{Deserialize, Serialize};

pub mod data;
use data::{Components, EntityData};

pub mod spawn;
pub mod stats;

mod query;

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct World {
    pub entity_allocator: EntityAllocator,
    pub components: Components,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn remove_entity(&mut self, entity: Entity) -> EntityData {
        self.entity_allocator.free(entity);
        self.components.remove_entity_data(entity)
    }
}
