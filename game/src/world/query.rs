use crate::world::{
    data::{Item, Location},
    stats::{effective_stats, Stats},
    World,
};
use coord_2d::Coord;
use entity_table::Entity;

impl World {
    pub fn entity_coord(&self, entity: Entity) -> Option<Coord> {
        self.components
            .location
            .get(entity)
            .and_then(Location::coord)
    }

    /// Entities on the map at `coord`, in ascending entity order.
    pub fn entities_at(&self, coord: Coord) -> impl '_ + Iterator<Item = Entity> {
        self.components
            .location
            .iter()
            .filter(move |(_, location)| **location == Location::OnMap(coord))
            .map(|(entity, _)| entity)
    }

    pub fn blocking_entity_at(&self, coord: Coord) -> Option<Entity> {
        self.entities_at(coord)
            .find(|&entity| self.components.blocks_movement.contains(entity))
    }

    pub fn is_occupied_by_item(&self, coord: Coord) -> bool {
        self.entities_at(coord)
            .any(|entity| self.components.item.contains(entity))
    }

    pub fn stairs_down_coord(&self) -> Option<Coord> {
        self.components
            .stairs_down
            .entities()
            .next()
            .and_then(|entity| self.entity_coord(entity))
    }

    pub fn carried_by(&self, holder: Entity) -> impl '_ + Iterator<Item = (Entity, Item)> {
        self.held_matching(move |location| location == Location::CarriedBy(holder))
    }

    pub fn equipped_by(&self, holder: Entity) -> impl '_ + Iterator<Item = (Entity, Item)> {
        self.held_matching(move |location| location == Location::EquippedBy(holder))
    }

    fn held_matching<F>(&self, f: F) -> impl '_ + Iterator<Item = (Entity, Item)>
    where
        F: 'static + Fn(Location) -> bool,
    {
        self.components.item.iter().filter_map(move |(entity, &item)| {
            let &location = self.components.location.get(entity)?;
            if f(location) {
                Some((entity, item))
            } else {
                None
            }
        })
    }

    /// Everything the holder has, carried or equipped.
    pub fn inventory_of(&self, holder: Entity) -> Vec<Entity> {
        self.components
            .location
            .iter()
            .filter(|(_, location)| location.holder() == Some(holder))
            .map(|(entity, _)| entity)
            .collect()
    }

    /// Base stats of `entity` plus the bonuses of everything it has equipped.
    pub fn effective_stats(&self, entity: Entity) -> Option<Stats> {
        let &base = self.components.stats.get(entity)?;
        let bonuses = self
            .equipped_by(entity)
            .filter_map(|(_, item)| item.equipment_bonus());
        Some(effective_stats(base, bonuses))
    }
}

#[cfg(test)]
mod tests {
    use crate::world::{
        data::{Item, Location, MonsterType},
        spawn::make_player,
        World,
    };
    use coord_2d::Coord;

    #[test]
    fn entities_at_only_sees_the_map() {
        let mut world = World::new();
        let coord = Coord::new(3, 4);
        let player = world.insert_entity_data(Location::OnMap(coord), make_player());
        let potion = world.spawn_item(coord, Item::HealingPotion);
        let carried = world.spawn_item(coord, Item::Sword);
        world.move_entity_to(carried, Location::CarriedBy(player));
        let at: Vec<_> = world.entities_at(coord).collect();
        assert!(at.contains(&player));
        assert!(at.contains(&potion));
        assert!(!at.contains(&carried));
        assert_eq!(world.entity_coord(carried), None);
        assert_eq!(world.blocking_entity_at(coord), Some(player));
        assert!(world.is_occupied_by_item(coord));
    }

    #[test]
    fn equipped_items_raise_effective_stats() {
        let mut world = World::new();
        let player = world.insert_entity_data(Location::OnMap(Coord::new(0, 0)), make_player());
        let sword = world.spawn_item(Coord::new(1, 0), Item::Sword);
        let shield = world.spawn_item(Coord::new(1, 0), Item::Shield);
        world.move_entity_to(sword, Location::EquippedBy(player));
        world.move_entity_to(shield, Location::CarriedBy(player));
        let stats = world.effective_stats(player).unwrap();
        assert_eq!(stats.power, 8);
        assert_eq!(stats.defense, 2);
        assert_eq!(world.inventory_of(player).len(), 2);
        assert_eq!(world.carried_by(player).count(), 1);
        assert_eq!(world.equipped_by(player).count(), 1);
    }

    #[test]
    fn monsters_block_and_items_do_not() {
        let mut world = World::new();
        let orc = world.spawn_monster(Coord::new(2, 2), MonsterType::Orc);
        world.spawn_item(Coord::new(3, 2), Item::Shield);
        assert_eq!(world.blocking_entity_at(Coord::new(2, 2)), Some(orc));
        assert_eq!(world.blocking_entity_at(Coord::new(3, 2)), None);
        assert_eq!(world.components.health.get(orc).unwrap().max(), 10);
    }
}
