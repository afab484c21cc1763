use coord_2d::{Coord, Size};
use grid_2d::Grid;
use procgen::{
    edge::{Edge, EdgeGrid, EdgeState},
    rooms::RoomId,
    walls::Adjacency,
    GenerationConfig, Layout,
};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MapError {
    #[error("{0:?} is not part of any room")]
    NotInRoom(Coord),
    #[error("{0:?} is not a door")]
    NotADoor(Edge),
    #[error("room has no tiles to populate")]
    EmptyRoom,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub id: RoomId,
    pub centre: Coord,
    pub tiles: Vec<Coord>,
    /// One entry per door. A pair of rooms joined by several doors has
    /// several entries.
    pub adjacencies: Vec<Adjacency>,
    pub explored: bool,
}

/// A single dungeon level: which room each tile belongs to, the walls and
/// doors between tiles, and the rooms themselves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameMap {
    dungeon_level: u32,
    room_ids: Grid<Option<RoomId>>,
    edges: EdgeGrid,
    rooms: BTreeMap<RoomId, Room>,
}

impl GameMap {
    pub fn generate<R: Rng>(dungeon_level: u32, config: &GenerationConfig, rng: &mut R) -> Self {
        let layout = Layout::generate(config, rng);
        Self::from_layout(dungeon_level, layout)
    }

    pub fn from_layout(dungeon_level: u32, layout: Layout) -> Self {
        let Layout { room_grid, walls } = layout;
        let mut room_ids = Grid::new_copy(room_grid.size(), None);
        let mut adjacencies = walls.adjacencies;
        let rooms = room_grid
            .rooms()
            .map(|room| {
                for &coord in &room.tiles {
                    *room_ids.get_checked_mut(coord) = Some(room.id);
                }
                let room = Room {
                    id: room.id,
                    centre: room.centre,
                    tiles: room.tiles.clone(),
                    adjacencies: adjacencies.remove(&room.id).unwrap_or_default(),
                    explored: false,
                };
                (room.id, room)
            })
            .collect();
        Self {
            dungeon_level,
            room_ids,
            edges: walls.edges,
            rooms,
        }
    }

    pub fn dungeon_level(&self) -> u32 {
        self.dungeon_level
    }

    pub fn size(&self) -> Size {
        self.room_ids.size()
    }

    pub fn room_id_at(&self, coord: Coord) -> Option<RoomId> {
        self.room_ids.get(coord).copied().flatten()
    }

    pub fn room(&self, id: RoomId) -> Option<&Room> {
        self.rooms.get(&id)
    }

    pub fn room_at(&self, coord: Coord) -> Option<&Room> {
        self.room_id_at(coord).and_then(|id| self.room(id))
    }

    /// Rooms in generation order.
    pub fn rooms(&self) -> impl '_ + Iterator<Item = &Room> {
        self.rooms.values()
    }

    pub fn first_room(&self) -> Option<&Room> {
        self.rooms.values().next()
    }

    pub fn last_room(&self) -> Option<&Room> {
        self.rooms.values().next_back()
    }

    pub fn edge_state(&self, edge: Edge) -> Option<EdgeState> {
        self.edges.get(edge)
    }

    /// What separates two adjacent tiles. `None` if there is nothing between
    /// them or they aren't adjacent.
    pub fn edge_state_between(&self, a: Coord, b: Coord) -> Option<EdgeState> {
        Edge::between(a, b).and_then(|edge| self.edge_state(edge))
    }

    pub fn doors(&self) -> impl '_ + Iterator<Item = (Edge, EdgeState)> {
        self.edges.doors()
    }

    /// Everything in a room is visible from anywhere else in the room.
    /// Another room is only visible while standing right next to an open
    /// door leading into it, on either side of the door.
    pub fn is_visible(&self, from: Coord, to: Coord) -> Result<bool, MapError> {
        let from_room = self.room_id_at(from).ok_or(MapError::NotInRoom(from))?;
        let to_room = match self.room_id_at(to) {
            Some(to_room) => to_room,
            None => return Ok(false),
        };
        if from_room == to_room {
            return Ok(true);
        }
        let through_open_door = Edge::around(from).into_iter().any(|edge| {
            self.edge_state(edge) == Some(EdgeState::OpenDoor)
                && edge
                    .other_side(from)
                    .and_then(|beyond| self.room_id_at(beyond))
                    == Some(to_room)
        });
        Ok(through_open_door)
    }

    pub fn is_explored(&self, coord: Coord) -> bool {
        self.room_at(coord).map_or(false, |room| room.explored)
    }

    /// Marks the whole room containing `coord` as explored. Does nothing
    /// outside of rooms.
    pub fn set_explored(&mut self, coord: Coord) {
        if let Some(id) = self.room_id_at(coord) {
            if let Some(room) = self.rooms.get_mut(&id) {
                room.explored = true;
            }
        }
    }

    /// Diagonal steps are never legal.
    pub fn can_move(&self, from: Coord, to: Coord) -> bool {
        if !from.is_valid(self.size()) || !to.is_valid(self.size()) {
            return false;
        }
        match Edge::between(from, to) {
            None => false,
            Some(edge) => matches!(self.edge_state(edge), None | Some(EdgeState::OpenDoor)),
        }
    }

    pub fn open_door(&mut self, edge: Edge) -> Result<(), MapError> {
        self.set_door(edge, EdgeState::OpenDoor)
    }

    pub fn close_door(&mut self, edge: Edge) -> Result<(), MapError> {
        self.set_door(edge, EdgeState::ClosedDoor)
    }

    fn set_door(&mut self, edge: Edge, state: EdgeState) -> Result<(), MapError> {
        match self.edges.get(edge) {
            Some(current) if current.is_door() => {
                self.edges.set(edge, Some(state));
                Ok(())
            }
            _ => Err(MapError::NotADoor(edge)),
        }
    }

    pub fn render<F: Fn(Coord) -> char>(&self, tile_char: F) -> String {
        self.edges.render(tile_char)
    }
}
