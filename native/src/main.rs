use game::{Config, Connectivity, Coord, DoorPolicy, Game, GenerationConfig, Item, Tile};
use rand::{Rng, SeedableRng};
use rand_isaac::Isaac64Rng;

struct Args {
    rng_seed: Option<u64>,
    depth: Option<u32>,
    min_room_area: Option<usize>,
    connected: bool,
    close_doors: bool,
    omniscient: bool,
}

impl Args {
    fn parser() -> impl meap::Parser<Item = Self> {
        meap::let_map! {
            let {
                rng_seed = opt_opt::<u64, _>("INT", 'r').name("rng-seed").desc("rng seed to generate the dungeon from");
                depth = opt_opt::<u32, _>("INT", 'd').name("depth").desc("dungeon level to descend to before printing");
                min_room_area = opt_opt::<usize, _>("INT", 'm').name("min-room-area").desc("remove rooms with fewer tiles than this");
                connected = flag("connected").desc("only keep the largest group of rooms joined by doors");
                close_doors = flag("close-doors").desc("doors close behind the player");
                omniscient = flag("omniscient").desc("show the whole level rather than what the player knows");
            } in {
                Self {
                    rng_seed,
                    depth,
                    min_room_area,
                    connected,
                    close_doors,
                    omniscient,
                }
            }
        }
    }

    fn config(&self) -> Config {
        Config {
            generation: GenerationConfig {
                min_room_area: self.min_room_area,
                connectivity: if self.connected {
                    Connectivity::LargestComponent
                } else {
                    Connectivity::Unchecked
                },
                ..Default::default()
            },
            door_policy: if self.close_doors {
                DoorPolicy::CloseBehind
            } else {
                DoorPolicy::StayOpen
            },
            omniscient: if self.omniscient {
                Config::OMNISCIENT
            } else {
                None
            },
        }
    }
}

fn entity_char(tile: Tile) -> char {
    match tile {
        Tile::Player => '@',
        Tile::Orc => 'o',
        Tile::Troll => 'T',
        Tile::StairsDown => '>',
        Tile::Item(Item::HealingPotion) => '!',
        Tile::Item(Item::ConfusionScroll | Item::LightningScroll | Item::FireballScroll) => '?',
        Tile::Item(Item::Sword) => '/',
        Tile::Item(Item::Shield) => '[',
    }
}

/// Characters are drawn over items, and items over stairs.
fn tile_priority(tile: Tile) -> u8 {
    match tile {
        Tile::Player | Tile::Orc | Tile::Troll => 2,
        Tile::Item(_) => 1,
        Tile::StairsDown => 0,
    }
}

fn tile_char(game: &Game, coord: Coord) -> char {
    let map = game.map();
    if map.room_id_at(coord).is_none() {
        return ' ';
    }
    if !(game.player_can_see(coord) || map.is_explored(coord)) {
        return ' ';
    }
    let world = game.world();
    world
        .entities_at(coord)
        .filter_map(|entity| world.components.tile.get(entity).copied())
        .max_by_key(|&tile| tile_priority(tile))
        .map_or('.', entity_char)
}

fn main() {
    use meap::Parser;
    env_logger::init();
    let args = Args::parser().with_help_default().parse_env_or_exit();
    let rng_seed = args
        .rng_seed
        .unwrap_or_else(|| Isaac64Rng::from_entropy().gen());
    println!("RNG Seed: {}", rng_seed);
    let mut rng = Isaac64Rng::seed_from_u64(rng_seed);
    let mut game = Game::new(&args.config(), &mut rng);
    let depth = args.depth.unwrap_or(1);
    while game.dungeon_level() < depth {
        game.go_to_next_level();
    }
    print!("{}", game.map().render(|coord| tile_char(&game, coord)));
    if let Some(health) = game.player_health() {
        println!(
            "Dungeon level: {}  HP: {}/{}",
            game.dungeon_level(),
            health.current(),
            health.max()
        );
    }
}
