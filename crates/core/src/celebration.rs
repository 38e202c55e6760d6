//! Overlay, banner and sparkle sequence played for the two highest rarities.
//!
//! Each celebration walks `Idle -> FlashIn -> Hold -> FlashOut -> Removed`.
//! `FlashIn` has no duration of its own: it is the instant the overlay and
//! banner are told to appear, and `Hold` is measured from that instant.

use crate::{
    CelebrationConfig, CelebrationTiming, Element, ElementId, IndexSource, ParticleField,
    ParticleFrame, ParticleSeed, Surface, Viewport,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CelebrationTier {
    /// SSR: longer sequence with sparkles.
    Top,
    /// SR: overlay and banner only.
    Second,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CelebrationPhase {
    Idle,
    FlashIn,
    Hold,
    FlashOut,
    Removed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Transition {
    pub from: CelebrationPhase,
    pub to: CelebrationPhase,
    pub at_ms: u64,
}

/// Everything needed to replay a celebration, randomness already resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CelebrationPlan {
    pub tier: CelebrationTier,
    pub timing: CelebrationTiming,
    pub overlay_fade_ms: u64,
    pub particles: Vec<ParticleSeed>,
}

impl CelebrationPlan {
    pub fn new<R>(
        tier: CelebrationTier,
        config: &CelebrationConfig,
        viewport: Viewport,
        rng: &mut R,
    ) -> Self
    where
        R: IndexSource + ?Sized,
    {
        let timing = config.timing(tier).clone();
        let particles = if timing.particles {
            (0..config.particle.count)
                .map(|_| ParticleSeed::random(viewport, &config.particle, rng))
                .collect()
        } else {
            Vec::new()
        };
        Self {
            tier,
            timing,
            overlay_fade_ms: config.overlay_fade_ms,
            particles,
        }
    }

    pub fn flash_in_at(&self) -> u64 {
        self.timing.start_delay_ms
    }

    pub fn flash_out_at(&self) -> u64 {
        self.flash_in_at() + self.timing.hold_ms
    }

    pub fn removed_at(&self) -> u64 {
        self.flash_out_at() + self.timing.flash_out_ms
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CelebrationFrame {
    pub phase: CelebrationPhase,
    pub overlay_opacity: f64,
    pub banner_scale: f64,
    pub particles: Vec<ParticleFrame>,
}

#[derive(Debug)]
pub struct Celebration {
    plan: CelebrationPlan,
    phase: CelebrationPhase,
    elapsed_ms: u64,
    overlay: Option<ElementId>,
    banner: Option<ElementId>,
    particle_layer: Option<ElementId>,
    particles: ParticleField,
}

impl Celebration {
    pub fn start(plan: CelebrationPlan, surface: &mut dyn Surface) -> Self {
        let accent = plan.timing.accent;
        let overlay = surface.attach(Element::Overlay {
            tier: plan.tier,
            accent,
        });
        let particle_layer = if plan.particles.is_empty() {
            None
        } else {
            Some(surface.attach(Element::ParticleLayer { tier: plan.tier }))
        };
        let banner = surface.attach(Element::Banner {
            tier: plan.tier,
            text: plan.timing.banner_text.clone(),
            accent,
        });
        let particles = ParticleField::from_seeds(&plan.particles);
        tracing::debug!(tier = ?plan.tier, particles = particles.len(), "celebration started");
        Self {
            plan,
            phase: CelebrationPhase::Idle,
            elapsed_ms: 0,
            overlay: Some(overlay),
            banner: Some(banner),
            particle_layer,
            particles,
        }
    }

    pub fn tier(&self) -> CelebrationTier {
        self.plan.tier
    }

    pub fn plan(&self) -> &CelebrationPlan {
        &self.plan
    }

    pub fn phase(&self) -> CelebrationPhase {
        self.phase
    }

    pub fn is_finished(&self) -> bool {
        self.phase == CelebrationPhase::Removed
    }

    pub fn live_particles(&self) -> usize {
        self.particles.live_count()
    }

    /// Advances the clock and walks every boundary crossed, in order.
    pub fn tick(&mut self, dt_ms: u64, surface: &mut dyn Surface) -> Vec<Transition> {
        let mut transitions = Vec::new();
        if self.is_finished() {
            return transitions;
        }
        self.elapsed_ms = self.elapsed_ms.saturating_add(dt_ms);
        self.particles.advance(dt_ms as f64);
        while let Some((next, at_ms)) = self.next_boundary() {
            if self.elapsed_ms < at_ms {
                break;
            }
            transitions.push(Transition {
                from: self.phase,
                to: next,
                at_ms,
            });
            self.phase = next;
            if next == CelebrationPhase::Removed {
                self.teardown(surface);
            }
        }
        transitions
    }

    /// Detaches everything still attached, particles included.
    pub fn teardown(&mut self, surface: &mut dyn Surface) {
        for id in [
            self.overlay.take(),
            self.banner.take(),
            self.particle_layer.take(),
        ]
        .into_iter()
        .flatten()
        {
            surface.detach(id);
        }
        self.particles.clear();
        self.phase = CelebrationPhase::Removed;
    }

    pub fn frame(&self) -> CelebrationFrame {
        let fade = self.plan.overlay_fade_ms;
        let pop = self.plan.timing.banner_pop_ms;
        let (overlay_opacity, banner_scale) = match self.phase {
            CelebrationPhase::Idle | CelebrationPhase::Removed => (0.0, 0.0),
            CelebrationPhase::FlashIn | CelebrationPhase::Hold => {
                let since = self.elapsed_ms.saturating_sub(self.plan.flash_in_at());
                (ramp(since, fade), ramp(since, pop))
            }
            CelebrationPhase::FlashOut => {
                let since = self.elapsed_ms.saturating_sub(self.plan.flash_out_at());
                (1.0 - ramp(since, fade), 1.0 - ramp(since, pop))
            }
        };
        CelebrationFrame {
            phase: self.phase,
            overlay_opacity,
            banner_scale,
            particles: self.particles.frames(),
        }
    }

    fn next_boundary(&self) -> Option<(CelebrationPhase, u64)> {
        match self.phase {
            CelebrationPhase::Idle => Some((CelebrationPhase::FlashIn, self.plan.flash_in_at())),
            CelebrationPhase::FlashIn => Some((CelebrationPhase::Hold, self.plan.flash_in_at())),
            CelebrationPhase::Hold => Some((CelebrationPhase::FlashOut, self.plan.flash_out_at())),
            CelebrationPhase::FlashOut => {
                Some((CelebrationPhase::Removed, self.plan.removed_at()))
            }
            CelebrationPhase::Removed => None,
        }
    }
}

/// Linear 0..1 progress of a transition lasting `duration_ms`.
pub fn ramp(elapsed_ms: u64, duration_ms: u64) -> f64 {
    if duration_ms == 0 {
        return 1.0;
    }
    (elapsed_ms as f64 / duration_ms as f64).clamp(0.0, 1.0)
}
