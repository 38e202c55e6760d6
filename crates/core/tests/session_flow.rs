use gacha_core::{
    ActiveFilter, CelebrationTier, Contribution, DrawError, Event, EventBus, GachaConfig,
    GachaSession, LayerStack, LocalizedName, Rarity, ScholarRecord, ScriptedSource, Viewport,
};

fn scholar(id: &str, rarity: Rarity, tags: &[&str]) -> ScholarRecord {
    ScholarRecord {
        id: id.to_string(),
        name: LocalizedName {
            ja: String::new(),
            en: id.to_string(),
        },
        affiliation: "Somewhere".to_string(),
        rarity,
        tags: tags.iter().map(|tag| tag.to_string()).collect(),
        contribution: Contribution::default(),
        trivia: String::new(),
        trivia_source: String::new(),
        sources: Vec::new(),
        avatar: None,
        created_at: None,
    }
}

fn session() -> GachaSession<ScriptedSource> {
    let dataset = vec![
        scholar("curie", Rarity::SSR, &["chemistry", "physics"]),
        scholar("hilbert", Rarity::SR, &["math"]),
        scholar("gauss", Rarity::R, &["math"]),
    ];
    GachaSession::new(
        dataset,
        GachaConfig::default(),
        ScriptedSource::new(vec![0]).with_units(vec![0.5]),
    )
}

#[test]
fn pull_renders_card_and_reports_tier() {
    let mut session = session();
    let mut events = EventBus::default();
    let pull = session.pull(&mut events).expect("pull");
    assert_eq!(pull.record.id, "curie");
    assert_eq!(pull.card.frame_class, "rarity-frame-SSR");
    assert_eq!(pull.celebration, Some(CelebrationTier::Top));
    let drained: Vec<_> = events.drain().collect();
    assert!(matches!(
        drained.as_slice(),
        [Event::Drawn { id, drawn: 1, eligible: 3, .. }] if id == "curie"
    ));
}

#[test]
fn unmatched_filter_emits_notice_event() {
    let mut session = session();
    let mut events = EventBus::default();
    session.set_filter(ActiveFilter::parse("biology"), &mut events);
    let err = session.pull(&mut events).expect_err("no biology");
    assert_eq!(err, DrawError::NoMatchingCategory("biology".to_string()));
    assert!(session.history().is_empty());
    let drained: Vec<_> = events.drain().collect();
    assert!(matches!(drained.last(), Some(Event::NoMatchingCategory { .. })));
}

#[test]
fn empty_session_is_silent() {
    let mut session = GachaSession::new(
        Vec::new(),
        GachaConfig::default(),
        ScriptedSource::default(),
    );
    let mut events = EventBus::default();
    assert_eq!(session.pull(&mut events).expect_err("empty"), DrawError::EmptyDataset);
    assert!(events.is_empty());
}

#[test]
fn reset_event_fires_when_filter_exhausted() {
    let mut session = session();
    let mut events = EventBus::default();
    session.set_filter(ActiveFilter::parse("math"), &mut events);
    session.pull(&mut events).expect("first");
    session.pull(&mut events).expect("second");
    let _ = events.drain().count();
    let third = session.pull(&mut events).expect("third");
    assert!(third.history_reset);
    assert_eq!(session.history().len(), 1);
    let drained: Vec<_> = events.drain().collect();
    assert!(matches!(drained.first(), Some(Event::HistoryReset { .. })));
}

#[test]
fn cycle_filter_walks_dataset_tags() {
    let mut session = session();
    let mut events = EventBus::default();
    assert_eq!(session.tags(), ["chemistry", "math", "physics"]);
    session.cycle_filter(true, &mut events);
    assert_eq!(session.filter(), &ActiveFilter::parse("chemistry"));
    assert_eq!(session.eligible_count(), 1);
    session.cycle_filter(false, &mut events);
    assert_eq!(session.filter(), &ActiveFilter::All);
}

#[test]
fn celebrate_only_for_top_two_tiers() {
    let mut session = session();
    let mut events = EventBus::default();
    let mut surface = LayerStack::new();
    let viewport = Viewport::new(800.0, 600.0);

    let curie = session.pull(&mut events).expect("curie");
    let celebration = session
        .celebrate(&curie, viewport, &mut surface, &mut events)
        .expect("ssr celebrates");
    assert_eq!(celebration.tier(), CelebrationTier::Top);
    assert_eq!(celebration.plan().particles.len(), 20);

    session.pull(&mut events).expect("hilbert");
    let gauss = session.pull(&mut events).expect("gauss");
    assert_eq!(gauss.record.rarity, Rarity::R);
    assert!(session
        .celebrate(&gauss, viewport, &mut surface, &mut events)
        .is_none());
    assert_eq!(surface.len(), 3);
}

#[test]
fn replacing_dataset_clears_history() {
    let mut session = session();
    let mut events = EventBus::default();
    session.pull(&mut events).expect("pull");
    session.replace_dataset(vec![scholar("noether", Rarity::SR, &["math"])], &mut events);
    assert!(session.history().is_empty());
    assert!(session.find("noether").is_some());
    assert!(session.find("curie").is_none());
}
