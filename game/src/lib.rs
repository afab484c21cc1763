pub use direction::CardinalDirection;
pub use entity_table::{entity_data, Entity};
pub use grid_2d::{Coord, Grid, Size};
pub use procgen::{
    edge::{Edge, EdgeState},
    rooms::RoomId,
    Connectivity, GenerationConfig,
};
use rand::{Rng, SeedableRng};
use rand_isaac::Isaac64Rng;
use serde::{Deserialize, Serialize};

pub mod map;
pub mod population;
mod world;

pub use map::{GameMap, MapError, Room};
use world::data::EntityData;
pub use world::{
    data::{Item, Location, Meter, MonsterType, Tile},
    stats::Stats,
    World,
};

#[derive(Debug, Clone, Copy)]
pub struct Omniscient;

/// What happens to a door once someone has walked through it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DoorPolicy {
    #[default]
    StayOpen,
    CloseBehind,
}

#[derive(Debug, Clone, Copy)]
pub struct Config {
    pub generation: GenerationConfig,
    pub door_policy: DoorPolicy,
    pub omniscient: Option<Omniscient>,
}
impl Config {
    pub const OMNISCIENT: Option<Omniscient> = Some(Omniscient);
}
impl Default for Config {
    fn default() -> Self {
        Self {
            generation: GenerationConfig::default(),
            door_policy: DoorPolicy::default(),
            omniscient: None,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub enum Message {
    Wait,
    OpenDoor,
    CloseDoor,
    Get(Item),
    Equip(Item),
    Descend { dungeon_level: u32 },
    ActionError(ActionError),
}

#[derive(Clone, Copy, Debug)]
pub enum Input {
    Walk(CardinalDirection),
    Wait,
    Get,
    Descend,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActionError {
    InvalidMove,
    NothingToGet,
    NoStairsHere,
}

/// How an item in the player's inventory is held, so it can be restored
/// after the player changes level.
#[derive(Clone, Copy)]
enum Held {
    Carried,
    Equipped,
}

const MAX_GENERATION_ATTEMPTS: usize = 100;

#[derive(Serialize, Deserialize)]
struct Level {
    map: GameMap,
    world: World,
}

impl Level {
    /// Generates maps until one has a room. If `config` keeps producing empty
    /// maps, its post-passes are dropped so the first seeded room survives.
    fn generate_map<R: Rng>(
        dungeon_level: u32,
        config: &GenerationConfig,
        rng: &mut R,
    ) -> (GameMap, RoomId, Coord) {
        let fallback = GenerationConfig {
            num_rooms: config.num_rooms.max(1),
            min_room_area: None,
            connectivity: Connectivity::Unchecked,
            ..*config
        };
        let mut attempt = 0;
        loop {
            let config = if attempt < MAX_GENERATION_ATTEMPTS {
                config
            } else {
                &fallback
            };
            let map = GameMap::generate(dungeon_level, config, rng);
            if let Some((id, centre)) = map.first_room().map(|room| (room.id, room.centre)) {
                return (map, id, centre);
            }
            attempt += 1;
            if attempt == MAX_GENERATION_ATTEMPTS {
                log::warn!(
                    "no rooms after {} attempts, generating without post-passes",
                    MAX_GENERATION_ATTEMPTS
                );
            }
        }
    }

    /// Builds a level and inserts the player at the centre of its first room.
    /// Returns the level along with the player's new entity.
    fn generate<R: Rng>(
        dungeon_level: u32,
        player_data: EntityData,
        inventory: Vec<(Held, EntityData)>,
        config: &GenerationConfig,
        rng: &mut R,
    ) -> (Self, Entity) {
        let (map, first_room_id, player_coord) = Self::generate_map(dungeon_level, config, rng);
        let mut world = World::new();
        let stairs_coord = map.last_room().map_or(player_coord, |room| room.centre);
        let player_entity = world.insert_entity_data(Location::OnMap(player_coord), player_data);
        for (held, entity_data) in inventory {
            let location = match held {
                Held::Carried => Location::CarriedBy(player_entity),
                Held::Equipped => Location::EquippedBy(player_entity),
            };
            world.insert_entity_data(location, entity_data);
        }
        world.spawn_stairs_down(stairs_coord);
        for room in map.rooms().filter(|room| room.id != first_room_id) {
            if let Err(e) = population::populate_room(&mut world, &room.tiles, dungeon_level, rng) {
                log::error!("failed to populate {:?}: {}", room.id, e);
            }
        }
        let mut level = Self { map, world };
        level.map.set_explored(player_coord);
        log::debug!(
            "generated dungeon level {} with {} rooms",
            dungeon_level,
            level.map.rooms().count()
        );
        (level, player_entity)
    }
}

#[derive(Serialize, Deserialize)]
pub struct Game {
    level: Level,
    rng: Isaac64Rng,
    player_entity: Entity,
    message_log: Vec<Message>,
    door_policy: DoorPolicy,
    generation: GenerationConfig,
    omniscient: bool,
}

impl Game {
    pub fn new<R: Rng>(config: &Config, base_rng: &mut R) -> Self {
        let mut rng = Isaac64Rng::seed_from_u64(base_rng.gen());
        let (level, player_entity) = Level::generate(
            1,
            world::spawn::make_player(),
            Vec::new(),
            &config.generation,
            &mut rng,
        );
        Self {
            level,
            rng,
            player_entity,
            message_log: Vec::new(),
            door_policy: config.door_policy,
            generation: config.generation,
            omniscient: config.omniscient.is_some(),
        }
    }

    pub fn map(&self) -> &GameMap {
        &self.level.map
    }

    pub fn world(&self) -> &World {
        &self.level.world
    }

    pub fn dungeon_level(&self) -> u32 {
        self.level.map.dungeon_level()
    }

    pub fn player_entity(&self) -> Entity {
        self.player_entity
    }

    pub fn message_log(&self) -> &[Message] {
        &self.message_log
    }

    /// Returns the coordinate of the player character
    pub fn player_coord(&self) -> Coord {
        self.level
            .world
            .entity_coord(self.player_entity)
            .expect("player does not have coord")
    }

    pub fn player_health(&self) -> Option<Meter> {
        self.level
            .world
            .components
            .health
            .get(self.player_entity)
            .copied()
    }

    pub fn player_stats(&self) -> Option<Stats> {
        self.level.world.effective_stats(self.player_entity)
    }

    pub fn player_can_see(&self, coord: Coord) -> bool {
        if self.omniscient {
            return true;
        }
        match self.level.map.is_visible(self.player_coord(), coord) {
            Ok(visible) => visible,
            Err(e) => {
                log::error!("{}", e);
                false
            }
        }
    }

    pub fn handle_input(&mut self, input: Input) -> Result<(), ActionError> {
        let result = match input {
            Input::Walk(direction) => self.player_walk(direction),
            Input::Wait => {
                self.message_log.push(Message::Wait);
                Ok(())
            }
            Input::Get => self.player_get_item(),
            Input::Descend => self.player_descend(),
        };
        if let Err(action_error) = result {
            self.message_log.push(Message::ActionError(action_error));
        }
        result
    }

    fn player_walk(&mut self, direction: CardinalDirection) -> Result<(), ActionError> {
        let player_coord = self.player_coord();
        let new_player_coord = player_coord + direction.coord();
        let map = &mut self.level.map;
        if !new_player_coord.is_valid(map.size()) {
            return Err(ActionError::InvalidMove);
        }
        let edge = Edge::between(player_coord, new_player_coord);
        match edge.and_then(|edge| map.edge_state(edge).map(|state| (edge, state))) {
            Some((edge, EdgeState::ClosedDoor)) => {
                // bumping into a closed door opens it instead of moving
                if let Err(e) = map.open_door(edge) {
                    log::error!("{}", e);
                    return Err(ActionError::InvalidMove);
                }
                self.message_log.push(Message::OpenDoor);
                return Ok(());
            }
            Some((_, EdgeState::Wall)) => return Err(ActionError::InvalidMove),
            Some((_, EdgeState::OpenDoor)) | None => (),
        }
        if !map.can_move(player_coord, new_player_coord) {
            return Err(ActionError::InvalidMove);
        }
        if self
            .level
            .world
            .blocking_entity_at(new_player_coord)
            .is_some()
        {
            return Err(ActionError::InvalidMove);
        }
        self.level
            .world
            .move_entity_to(self.player_entity, Location::OnMap(new_player_coord));
        self.level.map.set_explored(new_player_coord);
        if self.door_policy == DoorPolicy::CloseBehind {
            if let Some(edge) = edge {
                if self.level.map.edge_state(edge) == Some(EdgeState::OpenDoor) {
                    if let Err(e) = self.level.map.close_door(edge) {
                        log::error!("{}", e);
                    } else {
                        self.message_log.push(Message::CloseDoor);
                    }
                }
            }
        }
        Ok(())
    }

    /// Picks up the first item under the player. Equipment goes straight to
    /// the player's equipped slots.
    fn player_get_item(&mut self) -> Result<(), ActionError> {
        let player_coord = self.player_coord();
        let world = &mut self.level.world;
        if !world.is_occupied_by_item(player_coord) {
            return Err(ActionError::NothingToGet);
        }
        let (entity, item) = world
            .entities_at(player_coord)
            .find_map(|entity| {
                world
                    .components
                    .item
                    .get(entity)
                    .map(|&item| (entity, item))
            })
            .ok_or(ActionError::NothingToGet)?;
        if item.equipment_bonus().is_some() {
            world.move_entity_to(entity, Location::EquippedBy(self.player_entity));
            self.message_log.push(Message::Equip(item));
        } else {
            world.move_entity_to(entity, Location::CarriedBy(self.player_entity));
            self.message_log.push(Message::Get(item));
        }
        Ok(())
    }

    fn player_descend(&mut self) -> Result<(), ActionError> {
        if self.level.world.stairs_down_coord() != Some(self.player_coord()) {
            return Err(ActionError::NoStairsHere);
        }
        self.go_to_next_level();
        self.message_log.push(Message::Descend {
            dungeon_level: self.dungeon_level(),
        });
        Ok(())
    }

    /// Replaces the current level with a freshly generated one a level
    /// deeper. Only the player and the player's inventory survive.
    pub fn go_to_next_level(&mut self) {
        let dungeon_level = self.dungeon_level() + 1;
        let world = &mut self.level.world;
        let inventory = world
            .inventory_of(self.player_entity)
            .into_iter()
            .filter_map(|entity| {
                let held = match world.components.location.get(entity)? {
                    Location::CarriedBy(_) => Held::Carried,
                    Location::EquippedBy(_) => Held::Equipped,
                    Location::OnMap(_) => return None,
                };
                Some((held, world.remove_entity(entity)))
            })
            .collect::<Vec<_>>();
        let player_data = world.remove_entity(self.player_entity);
        let (level, player_entity) = Level::generate(
            dungeon_level,
            player_data,
            inventory,
            &self.generation,
            &mut self.rng,
        );
        self.level = level;
        self.player_entity = player_entity;
        self.heal_player_on_descent();
        log::info!("descended to dungeon level {}", dungeon_level);
    }

    fn heal_player_on_descent(&mut self) {
        let Some(max_hp) = self.player_stats().map(|stats| stats.max_hp) else {
            return;
        };
        if let Some(health) = self.level.world.components.health.get_mut(self.player_entity) {
            health.set_max(max_hp);
            health.increase(max_hp / 2);
        }
    }
}
