//! Thin walls between tiles.
//!
//! Each tile owns the wall on its north side and the wall on its west side.
//! The south wall of a tile is the north wall of the tile below it, and the
//! east wall is the west wall of the tile to its right, so every wall has
//! exactly one address.

use coord_2d::{Coord, Size};
use direction::CardinalDirection;
use grid_2d::Grid;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Side {
    North,
    West,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    pub coord: Coord,
    pub side: Side,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdgeState {
    Wall,
    ClosedDoor,
    OpenDoor,
}

impl EdgeState {
    pub fn is_door(self) -> bool {
        matches!(self, Self::ClosedDoor | Self::OpenDoor)
    }
}

impl Edge {
    pub const fn north(coord: Coord) -> Self {
        Self {
            coord,
            side: Side::North,
        }
    }

    pub const fn west(coord: Coord) -> Self {
        Self {
            coord,
            side: Side::West,
        }
    }

    /// The wall between two orthogonally adjacent tiles. Returns `None` for
    /// the same tile, diagonal neighbours, and tiles further apart.
    pub fn between(a: Coord, b: Coord) -> Option<Self> {
        match b - a {
            Coord { x: 0, y: -1 } => Some(Self::north(a)),
            Coord { x: 0, y: 1 } => Some(Self::north(b)),
            Coord { x: -1, y: 0 } => Some(Self::west(a)),
            Coord { x: 1, y: 0 } => Some(Self::west(b)),
            _ => None,
        }
    }

    /// The four walls touching a tile, in north, west, south, east order.
    pub fn around(coord: Coord) -> [Self; 4] {
        [
            Self::north(coord),
            Self::west(coord),
            Self::north(coord + CardinalDirection::South.coord()),
            Self::west(coord + CardinalDirection::East.coord()),
        ]
    }

    /// The two tiles separated by this wall. The north or west one comes first.
    pub fn tiles(&self) -> (Coord, Coord) {
        let before = match self.side {
            Side::North => self.coord + CardinalDirection::North.coord(),
            Side::West => self.coord + CardinalDirection::West.coord(),
        };
        (before, self.coord)
    }

    pub fn other_side(&self, coord: Coord) -> Option<Coord> {
        let (a, b) = self.tiles();
        if coord == a {
            Some(b)
        } else if coord == b {
            Some(a)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
struct EdgeCell {
    north: Option<EdgeState>,
    west: Option<EdgeState>,
}

/// Wall and door states for every edge of a map. The backing grid is one
/// cell larger than the map in each dimension so the south and east
/// boundaries of the map have somewhere to live.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeGrid {
    cells: Grid<EdgeCell>,
}

impl EdgeGrid {
    pub fn new(map_size: Size) -> Self {
        Self {
            cells: Grid::new_copy(
                Size::new(map_size.width() + 1, map_size.height() + 1),
                EdgeCell::default(),
            ),
        }
    }

    pub fn get(&self, edge: Edge) -> Option<EdgeState> {
        let cell = self.cells.get(edge.coord)?;
        match edge.side {
            Side::North => cell.north,
            Side::West => cell.west,
        }
    }

    /// Panics if the edge lies outside the map.
    pub fn set(&mut self, edge: Edge, state: Option<EdgeState>) {
        let cell = self.cells.get_checked_mut(edge.coord);
        match edge.side {
            Side::North => cell.north = state,
            Side::West => cell.west = state,
        }
    }

    /// Every edge holding a wall or door, in row-major order.
    pub fn iter(&self) -> impl '_ + Iterator<Item = (Edge, EdgeState)> {
        self.cells.enumerate().flat_map(|(coord, cell)| {
            let north = cell.north.map(|state| (Edge::north(coord), state));
            let west = cell.west.map(|state| (Edge::west(coord), state));
            north.into_iter().chain(west)
        })
    }

    pub fn doors(&self) -> impl '_ + Iterator<Item = (Edge, EdgeState)> {
        self.iter().filter(|(_, state)| state.is_door())
    }

    /// Draws the map at double resolution so walls get their own characters.
    /// `tile_char` decides what each map tile looks like.
    pub fn render<F: Fn(Coord) -> char>(&self, tile_char: F) -> String {
        let width = self.cells.width() as i32 - 1;
        let height = self.cells.height() as i32 - 1;
        let edge_char = |edge: Edge| match self.get(edge) {
            None => ' ',
            Some(EdgeState::Wall) => '#',
            Some(EdgeState::ClosedDoor) => '+',
            Some(EdgeState::OpenDoor) => '\'',
        };
        let mut out = String::new();
        for y in 0..=height {
            for x in 0..=width {
                let coord = Coord::new(x, y);
                let corner = [
                    Edge::north(coord),
                    Edge::west(coord),
                    Edge::north(coord + CardinalDirection::West.coord()),
                    Edge::west(coord + CardinalDirection::North.coord()),
                ]
                .into_iter()
                .any(|edge| self.get(edge).is_some());
                out.push(if corner { '#' } else { ' ' });
                if x < width {
                    out.push(edge_char(Edge::north(coord)));
                }
            }
            out.push('\n');
            if y < height {
                for x in 0..=width {
                    let coord = Coord::new(x, y);
                    out.push(edge_char(Edge::west(coord)));
                    if x < width {
                        out.push(tile_char(coord));
                    }
                }
                out.push('\n');
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn between_uses_the_south_or_east_tile_as_anchor() {
        let a = Coord::new(3, 4);
        assert_eq!(Edge::between(a, Coord::new(3, 3)), Some(Edge::north(a)));
        assert_eq!(
            Edge::between(a, Coord::new(3, 5)),
            Some(Edge::north(Coord::new(3, 5)))
        );
        assert_eq!(Edge::between(a, Coord::new(2, 4)), Some(Edge::west(a)));
        assert_eq!(
            Edge::between(a, Coord::new(4, 4)),
            Some(Edge::west(Coord::new(4, 4)))
        );
    }

    #[test]
    fn no_edge_between_diagonal_or_identical_tiles() {
        let a = Coord::new(3, 4);
        assert_eq!(Edge::between(a, a), None);
        assert_eq!(Edge::between(a, Coord::new(4, 5)), None);
        assert_eq!(Edge::between(a, Coord::new(2, 3)), None);
        assert_eq!(Edge::between(a, Coord::new(5, 4)), None);
    }

    #[test]
    fn around_matches_between_each_neighbour() {
        let centre = Coord::new(1, 1);
        let around = Edge::around(centre);
        let expected = [
            CardinalDirection::North,
            CardinalDirection::West,
            CardinalDirection::South,
            CardinalDirection::East,
        ]
        .map(|d| Edge::between(centre, centre + d.coord()).unwrap());
        assert_eq!(around, expected);
        for edge in around {
            assert!(edge.other_side(centre).is_some());
        }
    }

    #[test]
    fn edge_grid_covers_the_south_and_east_boundary() {
        let mut edges = EdgeGrid::new(Size::new(3, 2));
        let south_of_corner = Edge::between(Coord::new(2, 1), Coord::new(2, 2)).unwrap();
        let east_of_corner = Edge::between(Coord::new(2, 1), Coord::new(3, 1)).unwrap();
        edges.set(south_of_corner, Some(EdgeState::Wall));
        edges.set(east_of_corner, Some(EdgeState::ClosedDoor));
        assert_eq!(edges.get(south_of_corner), Some(EdgeState::Wall));
        assert_eq!(edges.get(east_of_corner), Some(EdgeState::ClosedDoor));
        assert_eq!(edges.iter().count(), 2);
        assert_eq!(edges.doors().count(), 1);
        assert_eq!(edges.get(Edge::north(Coord::new(10, 10))), None);
    }

    proptest! {
        #[test]
        fn between_is_symmetric(x in -50i32..50, y in -50i32..50, dx in -2i32..=2, dy in -2i32..=2) {
            let a = Coord::new(x, y);
            let b = Coord::new(x + dx, y + dy);
            let ab = Edge::between(a, b);
            prop_assert_eq!(ab, Edge::between(b, a));
            let adjacent = dx.abs() + dy.abs() == 1;
            prop_assert_eq!(ab.is_some(), adjacent);
            if let Some(edge) = ab {
                let (first, second) = edge.tiles();
                prop_assert!((first == a && second == b) || (first == b && second == a));
            }
        }
    }
}
