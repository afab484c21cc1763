use crate::{edge::EdgeState, rooms::RoomId, Layout};
use std::collections::{BTreeSet, VecDeque};

impl Layout {
    /// Groups rooms that can reach each other through doors. Components are
    /// returned in order of their lowest room id.
    pub fn connected_components(&self) -> Vec<BTreeSet<RoomId>> {
        let mut seen = BTreeSet::new();
        let mut components = Vec::new();
        for room in self.room_grid.rooms() {
            if !seen.insert(room.id) {
                continue;
            }
            let mut component = BTreeSet::new();
            component.insert(room.id);
            let mut queue = VecDeque::new();
            queue.push_back(room.id);
            while let Some(id) = queue.pop_front() {
                for adjacency in self.walls.adjacencies_of(id) {
                    if seen.insert(adjacency.room) {
                        component.insert(adjacency.room);
                        queue.push_back(adjacency.room);
                    }
                }
            }
            components.push(component);
        }
        components
    }

    /// Keeps the largest component of the room graph and dissolves every
    /// other room, turning its doors back into walls. On a tie the component
    /// with the lowest room id wins.
    pub fn retain_largest_component(&mut self) {
        let mut components = self.connected_components();
        let largest_index = components
            .iter()
            .enumerate()
            .fold(None, |best: Option<(usize, usize)>, (index, component)| {
                match best {
                    Some((_, best_len)) if best_len >= component.len() => best,
                    _ => Some((index, component.len())),
                }
            })
            .map(|(index, _)| index);
        let Some(largest_index) = largest_index else {
            return;
        };
        components.swap_remove(largest_index);
        let mut num_dissolved = 0;
        for id in components.into_iter().flatten() {
            if let Some(adjacencies) = self.walls.adjacencies.remove(&id) {
                for adjacency in adjacencies {
                    self.walls.edges.set(adjacency.door, Some(EdgeState::Wall));
                }
            }
            self.room_grid.dissolve(id);
            num_dissolved += 1;
        }
        log::debug!(
            "dissolved {} rooms outside the largest connected component",
            num_dissolved
        );
    }
}
