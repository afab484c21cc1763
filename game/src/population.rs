use crate::{
    map::MapError,
    world::{
        data::{Item, MonsterType},
        World,
    },
};
use coord_2d::Coord;
use rand::{seq::SliceRandom, Rng};

/// Sorted `(dungeon_level, value)` pairs. Each value holds from its level
/// until the next entry's level.
pub type LevelTable = &'static [(u32, u32)];

const MAX_MONSTERS_PER_ROOM: LevelTable = &[(1, 2), (4, 3), (6, 5)];
const MAX_ITEMS_PER_ROOM: LevelTable = &[(1, 1), (4, 2)];

const MONSTER_CHANCES: &[(MonsterType, LevelTable)] = &[
    (MonsterType::Orc, &[(1, 80)]),
    (MonsterType::Troll, &[(3, 15), (5, 30), (7, 60)]),
];

const ITEM_CHANCES: &[(Item, LevelTable)] = &[
    (Item::HealingPotion, &[(1, 35)]),
    (Item::ConfusionScroll, &[(2, 10)]),
    (Item::LightningScroll, &[(4, 25)]),
    (Item::Sword, &[(4, 5)]),
    (Item::FireballScroll, &[(6, 25)]),
    (Item::Shield, &[(8, 15)]),
];

/// The value of the entry with the greatest level not exceeding
/// `dungeon_level`, or 0 if `dungeon_level` precedes every entry.
pub fn from_dungeon_level(table: &[(u32, u32)], dungeon_level: u32) -> u32 {
    table
        .iter()
        .rev()
        .find(|&&(level, _)| level <= dungeon_level)
        .map_or(0, |&(_, value)| value)
}

fn choose_weighted<T: Copy, R: Rng>(
    chances: &[(T, LevelTable)],
    dungeon_level: u32,
    rng: &mut R,
) -> Option<T> {
    chances
        .choose_weighted(rng, |&(_, table)| from_dungeon_level(table, dungeon_level))
        .ok()
        .map(|&(choice, _)| choice)
}

pub fn choose_monster<R: Rng>(dungeon_level: u32, rng: &mut R) -> Option<MonsterType> {
    choose_weighted(MONSTER_CHANCES, dungeon_level, rng)
}

pub fn choose_item<R: Rng>(dungeon_level: u32, rng: &mut R) -> Option<Item> {
    choose_weighted(ITEM_CHANCES, dungeon_level, rng)
}

/// Scatter monsters then items over `tiles`. A draw that lands on an
/// occupied tile is dropped rather than moved elsewhere, so a room may end
/// up with fewer spawns than were drawn.
pub fn populate_room<R: Rng>(
    world: &mut World,
    tiles: &[Coord],
    dungeon_level: u32,
    rng: &mut R,
) -> Result<(), MapError> {
    if tiles.is_empty() {
        return Err(MapError::EmptyRoom);
    }
    let num_monsters = rng.gen_range(0..=from_dungeon_level(MAX_MONSTERS_PER_ROOM, dungeon_level));
    for _ in 0..num_monsters {
        let Some(&coord) = tiles.choose(rng) else {
            break;
        };
        let Some(monster_type) = choose_monster(dungeon_level, rng) else {
            continue;
        };
        if world.blocking_entity_at(coord).is_none() {
            world.spawn_monster(coord, monster_type);
        } else {
            log::trace!("skipping {:?} at occupied {:?}", monster_type, coord);
        }
    }
    let num_items = rng.gen_range(0..=from_dungeon_level(MAX_ITEMS_PER_ROOM, dungeon_level));
    for _ in 0..num_items {
        let Some(&coord) = tiles.choose(rng) else {
            break;
        };
        let Some(item) = choose_item(dungeon_level, rng) else {
            continue;
        };
        if world.entities_at(coord).next().is_none() {
            world.spawn_item(coord, item);
        } else {
            log::trace!("skipping {:?} at occupied {:?}", item, coord);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::data::Location;
    use rand::SeedableRng;
    use rand_isaac::Isaac64Rng;

    #[test]
    fn step_function_lookup() {
        let table = &[(1, 2), (4, 3), (6, 5)];
        assert_eq!(from_dungeon_level(table, 0), 0);
        assert_eq!(from_dungeon_level(table, 1), 2);
        assert_eq!(from_dungeon_level(table, 3), 2);
        assert_eq!(from_dungeon_level(table, 4), 3);
        assert_eq!(from_dungeon_level(table, 5), 3);
        assert_eq!(from_dungeon_level(table, 100), 5);
        assert_eq!(from_dungeon_level(&[], 7), 0);
    }

    #[test]
    fn shallow_levels_only_have_orcs_and_potions() {
        let mut rng = Isaac64Rng::seed_from_u64(0);
        for _ in 0..200 {
            assert_eq!(choose_monster(1, &mut rng), Some(MonsterType::Orc));
            assert_eq!(choose_item(1, &mut rng), Some(Item::HealingPotion));
        }
    }

    #[test]
    fn nothing_to_choose_before_the_first_level() {
        let mut rng = Isaac64Rng::seed_from_u64(0);
        assert_eq!(choose_monster(0, &mut rng), None);
        assert_eq!(choose_item(0, &mut rng), None);
    }

    #[test]
    fn deep_levels_reach_every_entry() {
        let mut rng = Isaac64Rng::seed_from_u64(1);
        let mut trolls = 0;
        let mut shields = 0;
        for _ in 0..1000 {
            if choose_monster(8, &mut rng) == Some(MonsterType::Troll) {
                trolls += 1;
            }
            if choose_item(8, &mut rng) == Some(Item::Shield) {
                shields += 1;
            }
        }
        assert!(trolls > 0);
        assert!(shields > 0);
    }

    #[test]
    fn empty_room_is_an_error() {
        let mut world = World::new();
        let mut rng = Isaac64Rng::seed_from_u64(0);
        assert_eq!(
            populate_room(&mut world, &[], 1, &mut rng),
            Err(MapError::EmptyRoom)
        );
    }

    #[test]
    fn single_tile_room_never_stacks_entities() {
        let coord = Coord::new(4, 4);
        for seed in 0..64 {
            let mut world = World::new();
            let mut rng = Isaac64Rng::seed_from_u64(seed);
            populate_room(&mut world, &[coord], 8, &mut rng).unwrap();
            let here: Vec<_> = world.entities_at(coord).collect();
            assert!(here.len() <= 2);
            let monsters = here
                .iter()
                .filter(|&&e| world.components.monster.contains(e))
                .count();
            let items = here
                .iter()
                .filter(|&&e| world.components.item.contains(e))
                .count();
            assert!(monsters <= 1);
            assert!(items <= 1);
            // an item is only placed on an empty tile, so it never shares with a monster
            assert!(monsters + items <= 1);
        }
    }

    #[test]
    fn spawns_stay_inside_the_room() {
        let tiles: Vec<Coord> = (0..4)
            .flat_map(|y| (0..5).map(move |x| Coord::new(x + 10, y + 10)))
            .collect();
        let mut world = World::new();
        let mut rng = Isaac64Rng::seed_from_u64(42);
        for _ in 0..20 {
            populate_room(&mut world, &tiles, 6, &mut rng).unwrap();
        }
        for (_, location) in world.components.location.iter() {
            match location {
                Location::OnMap(coord) => assert!(tiles.contains(coord)),
                other => panic!("unexpected location {:?}", other),
            }
        }
    }
}
