use gacha_core::{
    draw, ActiveFilter, Contribution, DrawError, DrawHistory, LocalizedName, Rarity, RngState,
    ScholarRecord, ScriptedSource,
};
use std::collections::HashSet;

fn scholar(id: &str, rarity: Rarity, tags: &[&str]) -> ScholarRecord {
    ScholarRecord {
        id: id.to_string(),
        name: LocalizedName {
            ja: format!("{id}-ja"),
            en: format!("{id}-en"),
        },
        affiliation: String::new(),
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

fn three_scholars() -> Vec<ScholarRecord> {
    vec![
        scholar("1", Rarity::R, &["math"]),
        scholar("2", Rarity::SSR, &["chemistry"]),
        scholar("3", Rarity::SR, &["math"]),
    ]
}

#[test]
fn empty_dataset_never_draws() {
    let mut history = DrawHistory::new();
    let mut rng = RngState::from_seed(1);
    for filter in [ActiveFilter::All, ActiveFilter::parse("physics")] {
        let err = draw(&[], &filter, &mut history, &mut rng).expect_err("empty");
        assert_eq!(err, DrawError::EmptyDataset);
    }
    assert!(history.is_empty());
}

#[test]
fn unmatched_category_leaves_history_untouched() {
    let dataset = three_scholars();
    let mut history = DrawHistory::new();
    history.insert("1");
    let mut rng = RngState::from_seed(1);
    let err = draw(&dataset, &ActiveFilter::parse("physics"), &mut history, &mut rng)
        .expect_err("no physics");
    assert_eq!(err, DrawError::NoMatchingCategory("physics".to_string()));
    assert_eq!(history.ids(), ["1".to_string()]);
}

#[test]
fn scripted_scenario_covers_all_then_resets() {
    let dataset = three_scholars();
    let mut history = DrawHistory::new();
    let mut rng = ScriptedSource::new(vec![0]);
    let mut seen = Vec::new();
    for _ in 0..3 {
        let outcome = draw(&dataset, &ActiveFilter::All, &mut history, &mut rng).expect("draw");
        assert!(!outcome.history_reset);
        seen.push(outcome.record.id.clone());
    }
    assert_eq!(seen, ["1", "2", "3"]);

    let fourth = draw(&dataset, &ActiveFilter::All, &mut history, &mut rng).expect("draw");
    assert!(fourth.history_reset);
    assert!(["1", "2", "3"].contains(&fourth.record.id.as_str()));
    assert_eq!(history.len(), 1);
    assert_eq!(history.last(), Some(fourth.record.id.as_str()));
}

#[test]
fn no_repeats_before_full_coverage() {
    let dataset: Vec<_> = (0..25)
        .map(|idx| scholar(&format!("s{idx}"), Rarity::N, &[]))
        .collect();
    for seed in [3_u64, 17, 0xC0FFEE] {
        let mut history = DrawHistory::new();
        let mut rng = RngState::from_seed(seed);
        let mut seen = HashSet::new();
        for _ in 0..dataset.len() {
            let outcome = draw(&dataset, &ActiveFilter::All, &mut history, &mut rng).expect("draw");
            assert!(seen.insert(outcome.record.id.clone()), "repeat before coverage");
        }
        assert_eq!(seen.len(), dataset.len());

        let next = draw(&dataset, &ActiveFilter::All, &mut history, &mut rng).expect("draw");
        assert!(next.history_reset);
        assert_eq!(history.len(), 1);
    }
}

#[test]
fn filtered_draws_only_return_tagged_records() {
    let dataset = three_scholars();
    let mut history = DrawHistory::new();
    let mut rng = RngState::from_seed(9);
    let filter = ActiveFilter::parse("math");
    let mut seen = HashSet::new();
    for _ in 0..2 {
        let outcome = draw(&dataset, &filter, &mut history, &mut rng).expect("draw");
        assert!(outcome.record.has_tag("math"));
        seen.insert(outcome.record.id.clone());
    }
    assert_eq!(seen, HashSet::from(["1".to_string(), "3".to_string()]));

    let third = draw(&dataset, &filter, &mut history, &mut rng).expect("draw");
    assert!(third.history_reset);
    assert!(third.record.has_tag("math"));
    assert_eq!(history.len(), 1);
}

#[test]
fn reset_only_considers_active_filter() {
    let dataset = three_scholars();
    let mut history = DrawHistory::new();
    history.insert("2");
    let mut rng = ScriptedSource::new(vec![0]);
    let outcome = draw(&dataset, &ActiveFilter::parse("chemistry"), &mut history, &mut rng)
        .expect("draw");
    assert!(outcome.history_reset);
    assert_eq!(outcome.record.id, "2");
    assert_eq!(history.ids(), ["2".to_string()]);
}
