use coord_2d::{Coord, Size};
use rand::Rng;
use serde::{Deserialize, Serialize};

mod connectivity;
pub mod edge;
pub mod rooms;
pub mod walls;

use rooms::RoomGrid;
use walls::Walls;

pub const MAP_WIDTH: u32 = 40;
pub const MAP_HEIGHT: u32 = 30;
pub const NUM_ROOMS: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Connectivity {
    /// Rooms that no door leads to are left where they are.
    Unchecked,
    /// Only the largest group of rooms joined by doors is kept.
    LargestComponent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationConfig {
    pub size: Size,
    pub num_rooms: usize,
    /// Rooms with fewer tiles than this are removed before walls are built.
    pub min_room_area: Option<usize>,
    pub connectivity: Connectivity,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            size: Size::new(MAP_WIDTH, MAP_HEIGHT),
            num_rooms: NUM_ROOMS,
            min_room_area: None,
            connectivity: Connectivity::Unchecked,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layout {
    pub room_grid: RoomGrid,
    pub walls: Walls,
}

impl Layout {
    pub fn generate<R: Rng>(config: &GenerationConfig, rng: &mut R) -> Self {
        let mut room_grid = RoomGrid::generate(config.size, config.num_rooms, rng);
        if let Some(min_room_area) = config.min_room_area {
            let dissolved = room_grid.dissolve_smaller_than(min_room_area);
            log::debug!(
                "dissolved {} rooms smaller than {} tiles",
                dissolved.len(),
                min_room_area
            );
        }
        let walls = Walls::build(&room_grid, rng);
        let mut layout = Self { room_grid, walls };
        if config.connectivity == Connectivity::LargestComponent {
            layout.retain_largest_component();
        }
        layout
    }

    pub fn render<F: Fn(Coord) -> char>(&self, tile_char: F) -> String {
        self.walls.edges.render(tile_char)
    }

    pub fn print(&self) {
        print!(
            "{}",
            self.render(|coord| {
                if self.room_grid.room_id_at(coord).is_some() {
                    '.'
                } else {
                    ' '
                }
            })
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edge::{Edge, EdgeState};
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_isaac::Isaac64Rng;

    fn generate(seed: u64, config: &GenerationConfig) -> Layout {
        Layout::generate(config, &mut Isaac64Rng::seed_from_u64(seed))
    }

    fn check_consistency(layout: &Layout) {
        let size = layout.room_grid.size();
        let edge_grid_size = Size::new(size.width() + 1, size.height() + 1);
        for coord in edge_grid_size.coord_iter_row_major() {
            for edge in [Edge::north(coord), Edge::west(coord)] {
                let (a, b) = edge.tiles();
                let room_a = layout.room_grid.room_id_at(a);
                let room_b = layout.room_grid.room_id_at(b);
                match layout.walls.edges.get(edge) {
                    None => assert_eq!(room_a, room_b, "open edge between rooms: {:?}", edge),
                    Some(EdgeState::Wall) => {
                        assert!(room_a != room_b || room_a.is_none(), "{:?}", edge)
                    }
                    Some(EdgeState::ClosedDoor) | Some(EdgeState::OpenDoor) => {
                        let room_a = room_a.expect("door without a room");
                        let room_b = room_b.expect("door without a room");
                        assert_ne!(room_a, room_b);
                        let forward = layout.walls.adjacencies_of(room_a);
                        let backward = layout.walls.adjacencies_of(room_b);
                        assert!(forward
                            .iter()
                            .any(|adj| adj.room == room_b && adj.door == edge));
                        assert!(backward
                            .iter()
                            .any(|adj| adj.room == room_a && adj.door == edge));
                    }
                }
            }
        }
        for (door, _) in layout.walls.edges.doors() {
            let (a, b) = door.tiles();
            let listed_by = layout
                .walls
                .adjacencies
                .iter()
                .filter(|(_, adjacencies)| adjacencies.iter().any(|adj| adj.door == door))
                .map(|(&id, _)| Some(id))
                .collect::<Vec<_>>();
            let mut expected = vec![layout.room_grid.room_id_at(a), layout.room_grid.room_id_at(b)];
            expected.sort();
            assert_eq!(listed_by, expected, "door {:?} listed by the wrong rooms", door);
        }
        for (&id, adjacencies) in &layout.walls.adjacencies {
            assert!(layout.room_grid.room(id).is_some());
            for adjacency in adjacencies {
                assert!(layout.room_grid.room(adjacency.room).is_some());
                assert_eq!(
                    layout.walls.edges.get(adjacency.door),
                    Some(EdgeState::ClosedDoor)
                );
            }
        }
    }

    #[test]
    fn same_seed_gives_identical_layouts() {
        let config = GenerationConfig::default();
        assert_eq!(generate(1234, &config), generate(1234, &config));
        assert_ne!(generate(1234, &config), generate(1235, &config));
    }

    #[test]
    fn default_layout_is_consistent() {
        let layout = generate(42, &GenerationConfig::default());
        assert!(layout.room_grid.num_rooms() > 0);
        check_consistency(&layout);
    }

    #[test]
    fn min_room_area_removes_slivers() {
        let config = GenerationConfig {
            min_room_area: Some(4),
            ..Default::default()
        };
        let layout = generate(42, &config);
        assert!(layout.room_grid.rooms().all(|room| room.tiles.len() >= 4));
        check_consistency(&layout);
    }

    #[test]
    fn largest_component_leaves_a_single_component() {
        let config = GenerationConfig {
            connectivity: Connectivity::LargestComponent,
            ..Default::default()
        };
        let layout = generate(42, &config);
        assert_eq!(layout.connected_components().len(), 1);
        check_consistency(&layout);
    }

    #[test]
    fn render_has_one_line_per_wall_row_and_tile_row() {
        let config = GenerationConfig {
            size: Size::new(6, 4),
            num_rooms: 3,
            ..Default::default()
        };
        let layout = generate(5, &config);
        let text = layout.render(|_| '.');
        let lines = text.lines().collect::<Vec<_>>();
        assert_eq!(lines.len(), 9);
        assert!(lines.iter().all(|line| line.chars().count() == 13));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(24))]

        #[test]
        fn generated_layouts_are_consistent(seed in any::<u64>()) {
            check_consistency(&generate(seed, &GenerationConfig::default()));
        }
    }
}
