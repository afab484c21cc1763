use procgen::{GenerationConfig, Layout};
use rand::{rngs::StdRng, Rng, SeedableRng};

fn main() {
    let mut rng1 = StdRng::from_entropy();
    let rng_seed = rng1.gen::<u64>();
    println!("Rng seed: {}", rng_seed);
    let mut rng = StdRng::seed_from_u64(rng_seed);
    let layout = Layout::generate(&GenerationConfig::default(), &mut rng);
    layout.print();
}
