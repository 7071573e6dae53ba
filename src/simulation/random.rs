use rand::{rngs::StdRng, Rng, SeedableRng};

/// Source of uniform samples in `[0, 1)` driving the drift noise.
#[cfg_attr(test, mockall::automock)]
pub trait RandomSource: Send {
    fn uniform(&mut self) -> f64;
}

/// `StdRng`-backed source; seeded for reproducible sessions, entropy otherwise.
pub struct SeededRandom {
    rng: StdRng,
}

impl SeededRandom {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { rng }
    }
}

impl RandomSource for SeededRandom {
    fn uniform(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }
}

/// Always returns the same value. `ConstantRandom(0.5)` removes all noise.
#[derive(Debug, Clone, Copy)]
pub struct ConstantRandom(pub f64);

impl RandomSource for ConstantRandom {
    fn uniform(&mut self) -> f64 {
        self.0
    }
}
