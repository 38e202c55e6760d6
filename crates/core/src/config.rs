use crate::CelebrationTier;
use serde::{Deserialize, Deserializer, Serialize};

pub const PLACEHOLDER_AVATAR: &str = "https://via.placeholder.com/300x300?text=No+Image";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GachaConfig {
    pub card: CardConfig,
    pub entrance: EntranceConfig,
    pub celebration: CelebrationConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CardConfig {
    pub placeholder_avatar: String,
}

impl Default for CardConfig {
    fn default() -> Self {
        Self {
            placeholder_avatar: PLACEHOLDER_AVATAR.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntranceConfig {
    pub delay_ms: u64,
    pub duration_ms: u64,
    pub offset: f64,
}

impl Default for EntranceConfig {
    fn default() -> Self {
        Self {
            delay_ms: 0,
            duration_ms: 500,
            offset: 50.0,
        }
    }
}

/// Durations for one celebration tier, in milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CelebrationTiming {
    pub start_delay_ms: u64,
    pub hold_ms: u64,
    pub flash_out_ms: u64,
    pub banner_pop_ms: u64,
    pub banner_text: String,
    pub accent: (u8, u8, u8),
    pub particles: bool,
}

impl CelebrationTiming {
    pub fn top() -> Self {
        Self {
            start_delay_ms: 10,
            hold_ms: 1000,
            flash_out_ms: 500,
            banner_pop_ms: 500,
            banner_text: "SSR GET!!".to_string(),
            accent: (255, 215, 0),
            particles: true,
        }
    }

    pub fn second() -> Self {
        Self {
            start_delay_ms: 10,
            hold_ms: 800,
            flash_out_ms: 300,
            banner_pop_ms: 400,
            banner_text: "SR!".to_string(),
            accent: (192, 192, 192),
            particles: false,
        }
    }

    pub fn total_ms(&self) -> u64 {
        self.start_delay_ms + self.hold_ms + self.flash_out_ms
    }
}

/// Fields a config file may set for one tier. Unset fields keep the tier default.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct TimingOverride {
    start_delay_ms: Option<u64>,
    hold_ms: Option<u64>,
    flash_out_ms: Option<u64>,
    banner_pop_ms: Option<u64>,
    banner_text: Option<String>,
    accent: Option<(u8, u8, u8)>,
    particles: Option<bool>,
}

impl TimingOverride {
    fn apply(self, base: CelebrationTiming) -> CelebrationTiming {
        CelebrationTiming {
            start_delay_ms: self.start_delay_ms.unwrap_or(base.start_delay_ms),
            hold_ms: self.hold_ms.unwrap_or(base.hold_ms),
            flash_out_ms: self.flash_out_ms.unwrap_or(base.flash_out_ms),
            banner_pop_ms: self.banner_pop_ms.unwrap_or(base.banner_pop_ms),
            banner_text: self.banner_text.unwrap_or(base.banner_text),
            accent: self.accent.unwrap_or(base.accent),
            particles: self.particles.unwrap_or(base.particles),
        }
    }
}

fn top_timing<'de, D: Deserializer<'de>>(deserializer: D) -> Result<CelebrationTiming, D::Error> {
    TimingOverride::deserialize(deserializer).map(|value| value.apply(CelebrationTiming::top()))
}

fn second_timing<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<CelebrationTiming, D::Error> {
    TimingOverride::deserialize(deserializer).map(|value| value.apply(CelebrationTiming::second()))
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleConfig {
    pub count: usize,
    pub speed: [f64; 2],
    pub size: [f64; 2],
    pub lifetime_ms: [f64; 2],
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            count: 20,
            speed: [50.0, 150.0],
            size: [5.0, 20.0],
            lifetime_ms: [1000.0, 2000.0],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CelebrationConfig {
    #[serde(deserialize_with = "top_timing")]
    pub top: CelebrationTiming,
    #[serde(deserialize_with = "second_timing")]
    pub second: CelebrationTiming,
    pub overlay_fade_ms: u64,
    pub particle: ParticleConfig,
}

impl Default for CelebrationConfig {
    fn default() -> Self {
        Self {
            top: CelebrationTiming::top(),
            second: CelebrationTiming::second(),
            overlay_fade_ms: 300,
            particle: ParticleConfig::default(),
        }
    }
}

impl CelebrationConfig {
    pub fn timing(&self, tier: CelebrationTier) -> &CelebrationTiming {
        match tier {
            CelebrationTier::Top => &self.top,
            CelebrationTier::Second => &self.second,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_keeps_defaults() {
        let raw = r#"{"card": {"placeholder_avatar": "img/none.png"}, "celebration": {"overlay_fade_ms": 120}}"#;
        let config: GachaConfig = serde_json::from_str(raw).expect("parse config");
        assert_eq!(config.card.placeholder_avatar, "img/none.png");
        assert_eq!(config.celebration.overlay_fade_ms, 120);
        assert_eq!(config.celebration.top.hold_ms, 1000);
        assert_eq!(config.celebration.second.flash_out_ms, 300);
        assert_eq!(config.celebration.particle.count, 20);
        assert_eq!(config.entrance.offset, 50.0);
    }

    #[test]
    fn partial_tier_override_keeps_tier_defaults() {
        let raw = r#"{"celebration": {"top": {"hold_ms": 1200}, "second": {"banner_text": "SR!!"}}}"#;
        let config: GachaConfig = serde_json::from_str(raw).expect("parse config");
        let top = &config.celebration.top;
        assert_eq!(top.hold_ms, 1200);
        assert_eq!(top.flash_out_ms, 500);
        assert_eq!(top.banner_text, "SSR GET!!");
        assert!(top.particles);
        let second = &config.celebration.second;
        assert_eq!(second.banner_text, "SR!!");
        assert_eq!(second.hold_ms, 800);
        assert!(!second.particles);
    }

    #[test]
    fn tier_totals() {
        let config = CelebrationConfig::default();
        assert_eq!(config.timing(CelebrationTier::Top).total_ms(), 1510);
        assert_eq!(config.timing(CelebrationTier::Second).total_ms(), 1110);
        assert!(config.timing(CelebrationTier::Top).particles);
        assert!(!config.timing(CelebrationTier::Second).particles);
    }
}
