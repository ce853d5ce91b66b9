//! Seeded noise texture sampling.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// One speck of a noise texture, relative to the current origin
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NoiseSample {
    pub x: f64,
    pub y: f64,
    pub size: f64,
    pub alpha: f64,
}

/// Draw `count` samples scattered within `radius` of the origin.
/// The same seed always yields the same samples.
pub fn sample(seed: u64, count: usize, radius: f64) -> Vec<NoiseSample> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            let angle = rng.gen_range(0.0..std::f64::consts::TAU);
            let distance = radius * rng.gen::<f64>().sqrt();
            NoiseSample {
                x: distance * angle.cos(),
                y: distance * angle.sin(),
                size: rng.gen_range(0.5..2.0),
                alpha: rng.gen_range(0.2..1.0),
            }
        })
        .collect()
}
