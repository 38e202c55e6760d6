use rand::{rngs::StdRng, Rng, SeedableRng};

/// Source of uniform randomness for draws and celebration effects.
pub trait IndexSource {
    /// Uniform index in `0..len`. Callers never pass zero.
    fn index(&mut self, len: usize) -> usize;
    /// Uniform value in `[0, 1)`.
    fn unit(&mut self) -> f64;

    fn range(&mut self, min: f64, max: f64) -> f64 {
        min + (max - min) * self.unit()
    }
}

#[derive(Debug, Clone)]
pub struct RngState {
    seed: u64,
    rng: StdRng,
}

impl RngState {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            seed,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self::from_seed(rand::random())
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl IndexSource for RngState {
    fn index(&mut self, len: usize) -> usize {
        if len <= 1 {
            return 0;
        }
        self.rng.gen_range(0..len)
    }

    fn unit(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }
}

/// Replays fixed picks in order, wrapping around when exhausted.
#[derive(Debug, Clone, Default)]
pub struct ScriptedSource {
    indices: Vec<usize>,
    units: Vec<f64>,
    next_index: usize,
    next_unit: usize,
}

impl ScriptedSource {
    pub fn new(indices: Vec<usize>) -> Self {
        Self {
            indices,
            ..Self::default()
        }
    }

    pub fn with_units(mut self, units: Vec<f64>) -> Self {
        self.units = units;
        self
    }
}

impl IndexSource for ScriptedSource {
    fn index(&mut self, len: usize) -> usize {
        if self.indices.is_empty() || len == 0 {
            return 0;
        }
        let value = self.indices[self.next_index % self.indices.len()];
        self.next_index += 1;
        value % len
    }

    fn unit(&mut self) -> f64 {
        if self.units.is_empty() {
            return 0.0;
        }
        let value = self.units[self.next_unit % self.units.len()];
        self.next_unit += 1;
        value.clamp(0.0, 1.0 - f64::EPSILON)
    }
}
