use crate::{IndexSource, ParticleConfig};
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Randomized starting parameters of one sparkle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParticleSeed {
    pub x: f64,
    pub y: f64,
    pub angle: f64,
    pub speed: f64,
    pub size: f64,
    pub lifetime_ms: f64,
}

impl ParticleSeed {
    pub fn random<R>(viewport: Viewport, config: &ParticleConfig, rng: &mut R) -> Self
    where
        R: IndexSource + ?Sized,
    {
        let size = rng.range(config.size[0], config.size[1]);
        let x = rng.range(0.0, viewport.width);
        let y = rng.range(0.0, viewport.height);
        let angle = rng.range(0.0, TAU);
        let speed = rng.range(config.speed[0], config.speed[1]);
        let lifetime_ms = rng.range(config.lifetime_ms[0], config.lifetime_ms[1]).max(1.0);
        Self {
            x,
            y,
            angle,
            speed,
            size,
            lifetime_ms,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleFrame {
    pub x: f64,
    pub y: f64,
    pub size: f64,
    pub opacity: f64,
    pub scale: f64,
}

/// A sparkle moving in a straight line while shrinking to nothing.
#[derive(Debug, Clone)]
pub struct Particle {
    seed: ParticleSeed,
    age_ms: f64,
    alive: bool,
}

impl Particle {
    pub fn new(seed: ParticleSeed) -> Self {
        Self {
            seed,
            age_ms: 0.0,
            alive: true,
        }
    }

    pub fn seed(&self) -> &ParticleSeed {
        &self.seed
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn progress(&self) -> f64 {
        self.age_ms / self.seed.lifetime_ms
    }

    /// Ages the particle. The first frame whose progress reaches 1 removes it.
    pub fn advance(&mut self, dt_ms: f64) -> Option<ParticleFrame> {
        if !self.alive {
            return None;
        }
        self.age_ms += dt_ms;
        if self.progress() >= 1.0 {
            self.alive = false;
            return None;
        }
        self.frame()
    }

    pub fn frame(&self) -> Option<ParticleFrame> {
        if !self.alive {
            return None;
        }
        let progress = self.progress();
        let distance = self.seed.speed * progress;
        let scale = 1.0 - progress;
        Some(ParticleFrame {
            x: self.seed.x + self.seed.angle.cos() * distance,
            y: self.seed.y + self.seed.angle.sin() * distance,
            size: self.seed.size,
            opacity: scale,
            scale,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct ParticleField {
    particles: Vec<Particle>,
}

impl ParticleField {
    pub fn from_seeds(seeds: &[ParticleSeed]) -> Self {
        Self {
            particles: seeds.iter().copied().map(Particle::new).collect(),
        }
    }

    pub fn advance(&mut self, dt_ms: f64) {
        for particle in &mut self.particles {
            particle.advance(dt_ms);
        }
    }

    pub fn frames(&self) -> Vec<ParticleFrame> {
        self.particles.iter().filter_map(Particle::frame).collect()
    }

    pub fn live_count(&self) -> usize {
        self.particles.iter().filter(|p| p.is_alive()).count()
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }
}
