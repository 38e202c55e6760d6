use anyhow::Result;
use gacha_core::{
    CardEntrance, Celebration, DrawError, Event, EventBus, GachaSession, LayerStack, Pull,
    RngState, Viewport,
};
use gacha_data::{load_gacha_config, load_scholars_or_empty, normalize_locale};
use std::collections::VecDeque;
use std::path::Path;

const MAX_EVENT_LOG: usize = 200;
/// Nominal pixel size of one terminal cell, so particle speeds read the same as on a page.
pub const CELL_WIDTH: f64 = 8.0;
pub const CELL_HEIGHT: f64 = 16.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiLocale {
    JaJp,
    EnUs,
}

impl UiLocale {
    pub fn from_opt(value: Option<&str>) -> Self {
        let normalized = normalize_locale(value);
        if normalized == "en_US" {
            Self::EnUs
        } else {
            Self::JaJp
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Self::JaJp => "ja_JP",
            Self::EnUs => "en_US",
        }
    }

    pub fn text<'a>(self, en: &'a str, ja: &'a str) -> &'a str {
        if matches!(self, Self::JaJp) {
            ja
        } else {
            en
        }
    }
}

pub struct App {
    pub locale: UiLocale,
    pub seed: u64,
    pub session: GachaSession,
    pub events: EventBus,
    pub surface: LayerStack,
    pub celebrations: Vec<Celebration>,
    pub current: Option<Pull>,
    pub entrance: CardEntrance,
    pub entrance_elapsed_ms: u64,
    pub viewport: Viewport,
    pub event_log: VecDeque<String>,
    pub status_line: String,
    pub notice: Option<String>,
    pub show_help: bool,
    pub should_quit: bool,
}

impl App {
    pub fn bootstrap(locale: UiLocale, seed: u64, data_path: &Path) -> Result<Self> {
        let assets_dir = data_path.parent().unwrap_or_else(|| Path::new("."));
        let config = load_gacha_config(assets_dir)?;
        let dataset = load_scholars_or_empty(data_path);
        tracing::info!(
            seed,
            locale = locale.code(),
            path = %data_path.display(),
            scholars = dataset.len(),
            "starting session"
        );
        let entrance = CardEntrance::new(config.entrance);
        let mut events = EventBus::default();
        events.push(Event::DatasetLoaded {
            count: dataset.len(),
        });
        let session = GachaSession::new(dataset, config, RngState::from_seed(seed));
        let mut app = Self {
            locale,
            seed,
            session,
            events,
            surface: LayerStack::new(),
            celebrations: Vec::new(),
            current: None,
            entrance,
            entrance_elapsed_ms: 0,
            viewport: Viewport::new(80.0 * CELL_WIDTH, 24.0 * CELL_HEIGHT),
            event_log: VecDeque::new(),
            status_line: locale.text("ready", "準備完了").to_string(),
            notice: None,
            show_help: false,
            should_quit: false,
        };
        app.flush_events();
        Ok(app)
    }

    pub fn set_terminal_size(&mut self, cols: u16, rows: u16) {
        self.viewport = Viewport::new(cols as f64 * CELL_WIDTH, rows as f64 * CELL_HEIGHT);
    }

    /// Draw, show the card, then start a celebration if the rarity earns one.
    pub fn pull(&mut self) {
        match self.session.pull(&mut self.events) {
            Ok(pull) => {
                if let Some(celebration) = self.session.celebrate(
                    &pull,
                    self.viewport,
                    &mut self.surface,
                    &mut self.events,
                ) {
                    self.celebrations.push(celebration);
                }
                self.status_line = format!(
                    "{} {} ({})",
                    self.locale.text("Drew", "獲得:"),
                    pull.record.display_name(),
                    pull.record.rarity
                );
                self.current = Some(pull);
                self.entrance_elapsed_ms = 0;
            }
            Err(DrawError::NoMatchingCategory(tag)) => {
                self.current = None;
                self.notice = Some(match self.locale {
                    UiLocale::JaJp => format!("{tag}のカテゴリに該当する学者がいません。"),
                    UiLocale::EnUs => format!("No scholars in category {tag}."),
                });
            }
            Err(DrawError::EmptyDataset) => self.current = None,
        }
        self.flush_events();
    }

    pub fn cycle_filter(&mut self, forward: bool) {
        self.session.cycle_filter(forward, &mut self.events);
        self.flush_events();
    }

    pub fn reset_history(&mut self) {
        self.session.reset_history(&mut self.events);
        self.status_line = self.locale.text("history cleared", "履歴をリセット").to_string();
        self.flush_events();
    }

    pub fn on_tick(&mut self, dt_ms: u64) {
        self.entrance_elapsed_ms = self.entrance_elapsed_ms.saturating_add(dt_ms);
        for celebration in &mut self.celebrations {
            celebration.tick(dt_ms, &mut self.surface);
        }
        self.celebrations.retain(|celebration| !celebration.is_finished());
    }

    pub fn filter_label(&self) -> String {
        if self.session.filter().label() == gacha_core::ALL_FILTER {
            self.locale.text("all", "すべて").to_string()
        } else {
            self.session.filter().label().to_string()
        }
    }

    fn flush_events(&mut self) {
        let drained: Vec<_> = self.events.drain().collect();
        for event in drained {
            self.push_event_line(format_event(self.locale, &event));
        }
    }

    fn push_event_line(&mut self, line: String) {
        if self.event_log.len() >= MAX_EVENT_LOG {
            let _ = self.event_log.pop_front();
        }
        self.event_log.push_back(line);
    }
}

fn format_event(locale: UiLocale, event: &Event) -> String {
    match event {
        Event::DatasetLoaded { count } => format!(
            "{} {count}",
            locale.text("scholars loaded:", "学者データ読込:")
        ),
        Event::FilterChanged { filter } => {
            format!("{} {filter}", locale.text("filter ->", "フィルター ->"))
        }
        Event::HistoryReset { filter } => format!(
            "{} ({filter})",
            locale.text("history reset", "履歴リセット")
        ),
        Event::Drawn {
            id,
            rarity,
            drawn,
            eligible,
        } => format!("[{rarity}] {id} {drawn}/{eligible}"),
        Event::NoMatchingCategory { filter } => format!(
            "{} {filter}",
            locale.text("no scholars in", "該当なし:")
        ),
        Event::CelebrationStarted { tier } => format!(
            "{} {tier:?}",
            locale.text("celebration", "演出")
        ),
    }
}
