use crate::{
    edge::{Edge, EdgeGrid, EdgeState, Side},
    rooms::{RoomGrid, RoomId},
};
use coord_2d::Size;
use rand::{seq::SliceRandom, Rng};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One side of a door, as seen from the room on the other side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Adjacency {
    pub room: RoomId,
    pub door: Edge,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Walls {
    pub edges: EdgeGrid,
    pub adjacencies: BTreeMap<RoomId, Vec<Adjacency>>,
}

impl Walls {
    /// Puts a wall on every edge whose two sides belong to different rooms
    /// (the outside of the map and unclaimed tiles count as "no room"), then
    /// turns one randomly chosen wall between each pair of touching rooms
    /// into a closed door.
    pub fn build<R: Rng>(room_grid: &RoomGrid, rng: &mut R) -> Self {
        let map_size = room_grid.size();
        let mut edges = EdgeGrid::new(map_size);
        let mut door_candidates: BTreeMap<(RoomId, RoomId), Vec<Edge>> = BTreeMap::new();
        let edge_grid_size = Size::new(map_size.width() + 1, map_size.height() + 1);
        for coord in edge_grid_size.coord_iter_row_major() {
            for side in [Side::North, Side::West] {
                let edge = Edge { coord, side };
                let (a, b) = edge.tiles();
                let room_a = room_grid.room_id_at(a);
                let room_b = room_grid.room_id_at(b);
                if room_a == room_b {
                    continue;
                }
                edges.set(edge, Some(EdgeState::Wall));
                if let (Some(room_a), Some(room_b)) = (room_a, room_b) {
                    door_candidates
                        .entry((room_a.min(room_b), room_a.max(room_b)))
                        .or_default()
                        .push(edge);
                }
            }
        }
        let mut adjacencies: BTreeMap<RoomId, Vec<Adjacency>> = BTreeMap::new();
        for ((room_a, room_b), candidates) in door_candidates {
            if let Some(&door) = candidates.choose(rng) {
                edges.set(door, Some(EdgeState::ClosedDoor));
                adjacencies.entry(room_a).or_default().push(Adjacency {
                    room: room_b,
                    door,
                });
                adjacencies.entry(room_b).or_default().push(Adjacency {
                    room: room_a,
                    door,
                });
            }
        }
        log::debug!(
            "carved {} doors between {} rooms",
            edges.doors().count(),
            adjacencies.len()
        );
        Self { edges, adjacencies }
    }

    pub fn adjacencies_of(&self, room: RoomId) -> &[Adjacency] {
        self.adjacencies
            .get(&room)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}
