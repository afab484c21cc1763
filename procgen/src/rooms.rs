use coord_2d::{Coord, Size};
use direction::CardinalDirection;
use grid_2d::Grid;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RoomId(pub u32);

/// The size a room tries to grow to. Collisions with earlier rooms and the
/// edge of the map can leave it smaller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Footprint {
    pub width: u32,
    pub height: u32,
}

const CORRIDOR_PROBABILITY: f64 = 0.05;
const BIG_ROOM: Footprint = Footprint::new(15, 15);

impl Footprint {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Rooms late in the generation order are big. Everything else is a
    /// small room or, occasionally, a corridor.
    pub fn choose<R: Rng>(index: usize, num_rooms: usize, rng: &mut R) -> Self {
        let roll = rng.gen::<f64>();
        if roll < CORRIDOR_PROBABILITY {
            Self::new(rng.gen_range(6..=16), 1)
        } else if roll < CORRIDOR_PROBABILITY * 2.0 {
            Self::new(1, rng.gen_range(6..=16))
        } else if index * 10 < num_rooms * 9 {
            Self::new(rng.gen_range(2..=8), rng.gen_range(2..=8))
        } else {
            BIG_ROOM
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrownRoom {
    pub id: RoomId,
    pub centre: Coord,
    /// In the order they were claimed, so the centre comes first.
    pub tiles: Vec<Coord>,
}

/// Which room owns each tile of the map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomGrid {
    ownership: Grid<Option<RoomId>>,
    rooms: BTreeMap<RoomId, GrownRoom>,
}

struct Extent {
    left: i32,
    right: i32,
    top: i32,
    bottom: i32,
}

impl RoomGrid {
    pub fn new(size: Size) -> Self {
        Self {
            ownership: Grid::new_copy(size, None),
            rooms: BTreeMap::new(),
        }
    }

    pub fn size(&self) -> Size {
        self.ownership.size()
    }

    /// The room owning a tile. Tiles outside the map belong to no room.
    pub fn room_id_at(&self, coord: Coord) -> Option<RoomId> {
        self.ownership.get(coord).copied().flatten()
    }

    pub fn room(&self, id: RoomId) -> Option<&GrownRoom> {
        self.rooms.get(&id)
    }

    pub fn rooms(&self) -> impl '_ + Iterator<Item = &GrownRoom> {
        self.rooms.values()
    }

    pub fn num_rooms(&self) -> usize {
        self.rooms.len()
    }

    /// Seeds `num_rooms` rooms and grows each in turn. A room whose seed
    /// lands on a tile claimed by an earlier room is dropped.
    pub fn generate<R: Rng>(size: Size, num_rooms: usize, rng: &mut R) -> Self {
        let mut room_grid = Self::new(size);
        let seeds = (0..num_rooms)
            .map(|_| {
                Coord::new(
                    rng.gen_range(0..size.width() as i32),
                    rng.gen_range(0..size.height() as i32),
                )
            })
            .collect::<Vec<_>>();
        let mut num_collisions = 0;
        for (index, centre) in seeds.into_iter().enumerate() {
            let footprint = Footprint::choose(index, num_rooms, rng);
            if !room_grid.grow_room(RoomId(index as u32), centre, footprint) {
                num_collisions += 1;
            }
        }
        log::debug!(
            "grew {} rooms from {} seeds ({} seeds collided)",
            room_grid.num_rooms(),
            num_rooms,
            num_collisions
        );
        room_grid
    }

    /// Grows a room outwards from `centre` one ring at a time. Returns false
    /// without claiming anything if the centre is already taken.
    pub fn grow_room(&mut self, id: RoomId, centre: Coord, footprint: Footprint) -> bool {
        match self.ownership.get_mut(centre) {
            Some(owner @ None) => *owner = Some(id),
            _ => return false,
        }
        let mut tiles = vec![centre];
        let width = footprint.width as i32;
        let height = footprint.height as i32;
        let last_x = self.ownership.width() as i32 - 1;
        let last_y = self.ownership.height() as i32 - 1;
        let mut extent = Extent {
            left: centre.x,
            right: centre.x,
            top: centre.y,
            bottom: centre.y,
        };
        use CardinalDirection::*;
        for distance in 1..=(width.max(height) / 2) {
            if distance <= width / 2 && extent.left > 0 {
                extent.left -= 1;
                let x = extent.left;
                let column = (extent.top..=extent.bottom).map(|y| Coord::new(x, y));
                self.claim_line(id, column, East, &mut tiles);
            }
            if distance <= (width - 1) / 2 && extent.right < last_x {
                extent.right += 1;
                let x = extent.right;
                let column = (extent.top..=extent.bottom).map(|y| Coord::new(x, y));
                self.claim_line(id, column, West, &mut tiles);
            }
            if distance <= height / 2 && extent.top > 0 {
                extent.top -= 1;
                let y = extent.top;
                let row = (extent.left..=extent.right).map(|x| Coord::new(x, y));
                self.claim_line(id, row, South, &mut tiles);
            }
            if distance <= (height - 1) / 2 && extent.bottom < last_y {
                extent.bottom += 1;
                let y = extent.bottom;
                let row = (extent.left..=extent.right).map(|x| Coord::new(x, y));
                self.claim_line(id, row, North, &mut tiles);
            }
        }
        self.rooms.insert(id, GrownRoom { id, centre, tiles });
        true
    }

    // A tile is only claimed if the tile towards the room's centre already
    // belongs to the room, so rooms never leak through diagonal gaps.
    fn claim_line<I: Iterator<Item = Coord>>(
        &mut self,
        id: RoomId,
        line: I,
        inward: CardinalDirection,
        tiles: &mut Vec<Coord>,
    ) {
        for coord in line {
            if self.room_id_at(coord + inward.coord()) != Some(id) {
                continue;
            }
            if let Some(owner @ None) = self.ownership.get_mut(coord) {
                *owner = Some(id);
                tiles.push(coord);
            }
        }
    }

    /// Releases every tile of a room. Returns the removed room.
    pub fn dissolve(&mut self, id: RoomId) -> Option<GrownRoom> {
        let room = self.rooms.remove(&id)?;
        for &coord in &room.tiles {
            *self.ownership.get_checked_mut(coord) = None;
        }
        Some(room)
    }

    /// Dissolves rooms with fewer than `min_area` tiles. Returns the ids of
    /// the dissolved rooms.
    pub fn dissolve_smaller_than(&mut self, min_area: usize) -> Vec<RoomId> {
        let small = self
            .rooms
            .values()
            .filter(|room| room.tiles.len() < min_area)
            .map(|room| room.id)
            .collect::<Vec<_>>();
        for &id in &small {
            self.dissolve(id);
        }
        small
    }
}
