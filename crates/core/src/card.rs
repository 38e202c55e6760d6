use crate::{CardConfig, EntranceConfig, Rarity, ScholarRecord};
use serde::{Deserialize, Serialize};

/// Display-ready projection of a scholar. Tags and sources are not shown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardView {
    pub id: String,
    pub rarity: Rarity,
    pub frame_class: String,
    pub rarity_class: String,
    pub background: Option<String>,
    pub avatar: String,
    pub avatar_is_placeholder: bool,
    pub alt: String,
    pub name_ja: String,
    pub name_en: String,
    pub affiliation: String,
    pub contribution: String,
    pub trivia: String,
}

pub fn render_card(record: &ScholarRecord, config: &CardConfig) -> CardView {
    let code = record.rarity.code();
    let background = match record.rarity {
        Rarity::SSR | Rarity::SR => Some(format!("background-{code}")),
        Rarity::N | Rarity::R => None,
    };
    let (avatar, avatar_is_placeholder) = match record.avatar() {
        Some(path) => (path.to_string(), false),
        None => (config.placeholder_avatar.clone(), true),
    };
    CardView {
        id: record.id.clone(),
        rarity: record.rarity,
        frame_class: format!("rarity-frame-{code}"),
        rarity_class: format!("rarity-{code}"),
        background,
        avatar,
        avatar_is_placeholder,
        alt: record.name.ja.clone(),
        name_ja: record.name.ja.clone(),
        name_en: record.name.en.clone(),
        affiliation: record.affiliation.clone(),
        contribution: record.contribution.text.clone(),
        trivia: record.trivia.clone(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntranceFrame {
    pub opacity: f64,
    pub offset: f64,
}

/// Fade-and-slide-up reveal played when a card is inserted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardEntrance {
    config: EntranceConfig,
}

impl CardEntrance {
    pub fn new(config: EntranceConfig) -> Self {
        Self { config }
    }

    pub fn frame(&self, elapsed_ms: u64) -> EntranceFrame {
        let progress = if elapsed_ms < self.config.delay_ms {
            0.0
        } else {
            crate::ramp(elapsed_ms - self.config.delay_ms, self.config.duration_ms)
        };
        EntranceFrame {
            opacity: progress,
            offset: self.config.offset * (1.0 - progress),
        }
    }

    pub fn is_done(&self, elapsed_ms: u64) -> bool {
        elapsed_ms >= self.config.delay_ms + self.config.duration_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Contribution, LocalizedName};

    fn record(rarity: Rarity, avatar: Option<&str>) -> ScholarRecord {
        ScholarRecord {
            id: "noether".to_string(),
            name: LocalizedName {
                ja: "エミー・ネーター".to_string(),
                en: "Emmy Noether".to_string(),
            },
            affiliation: "Göttingen".to_string(),
            rarity,
            tags: vec!["math".to_string()],
            contribution: Contribution {
                text: "Noether's theorem".to_string(),
                source: String::new(),
            },
            trivia: "Lectured under Hilbert's name.".to_string(),
            trivia_source: String::new(),
            sources: Vec::new(),
            avatar: avatar.map(str::to_string),
            created_at: None,
        }
    }

    #[test]
    fn missing_avatar_uses_placeholder() {
        let config = CardConfig::default();
        let view = render_card(&record(Rarity::R, None), &config);
        assert_eq!(view.avatar, crate::PLACEHOLDER_AVATAR);
        assert!(view.avatar_is_placeholder);
        let view = render_card(&record(Rarity::R, Some("img/noether.png")), &config);
        assert_eq!(view.avatar, "img/noether.png");
        assert!(!view.avatar_is_placeholder);
    }

    #[test]
    fn background_only_for_top_two_tiers() {
        let config = CardConfig::default();
        let ssr = render_card(&record(Rarity::SSR, None), &config);
        assert_eq!(ssr.background.as_deref(), Some("background-SSR"));
        assert_eq!(ssr.frame_class, "rarity-frame-SSR");
        let sr = render_card(&record(Rarity::SR, None), &config);
        assert_eq!(sr.background.as_deref(), Some("background-SR"));
        assert_eq!(render_card(&record(Rarity::R, None), &config).background, None);
        assert_eq!(render_card(&record(Rarity::N, None), &config).background, None);
    }

    #[test]
    fn render_is_pure() {
        let config = CardConfig::default();
        let source = record(Rarity::SSR, Some("a.png"));
        let first = render_card(&source, &config);
        let second = render_card(&source, &config);
        assert_eq!(first, second);
        assert_eq!(first.name_en, "Emmy Noether");
        assert_eq!(first.contribution, "Noether's theorem");
        assert_eq!(first.alt, first.name_ja);
    }

    #[test]
    fn entrance_slides_up_and_fades_in() {
        let entrance = CardEntrance::new(EntranceConfig::default());
        let start = entrance.frame(0);
        assert_eq!(start.opacity, 0.0);
        assert_eq!(start.offset, 50.0);
        let mid = entrance.frame(250);
        assert!((mid.opacity - 0.5).abs() < 1e-9);
        assert!((mid.offset - 25.0).abs() < 1e-9);
        let end = entrance.frame(900);
        assert_eq!(end.opacity, 1.0);
        assert_eq!(end.offset, 0.0);
        assert!(entrance.is_done(500));
    }
}
