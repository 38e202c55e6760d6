//! Spreadsheet import: `rarity,name,link[,extra]` rows into draft records.

use anyhow::Context;
use chrono::{Datelike, NaiveDate};
use gacha_core::{Contribution, LocalizedName, Rarity, ScholarRecord};
use std::collections::HashSet;
use std::io;
use std::path::Path;

pub fn import_csv_file(
    path: &Path,
    existing: &mut HashSet<String>,
    today: NaiveDate,
) -> anyhow::Result<Vec<ScholarRecord>> {
    let file = std::fs::File::open(path).with_context(|| format!("open {}", path.display()))?;
    import_csv(file, existing, today).with_context(|| format!("import {}", path.display()))
}

/// Converts rows to records with empty text fields, skipping blank names.
/// Each record gets exactly one `sources` entry, blank when the row has no link.
///
/// A first row whose rarity column is not numeric is treated as a header.
/// Generated ids are added to `existing`.
pub fn import_csv<R: io::Read>(
    reader: R,
    existing: &mut HashSet<String>,
    today: NaiveDate,
) -> anyhow::Result<Vec<ScholarRecord>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);
    let created_at = today.format("%Y-%m-%d").to_string();
    let mut records = Vec::new();
    for (row, result) in rdr.records().enumerate() {
        let row_data = result.with_context(|| format!("read row {}", row + 1))?;
        let rarity_field = row_data.get(0).unwrap_or("");
        let level = rarity_field.parse::<f64>().ok();
        if row == 0 && level.is_none() {
            continue;
        }
        let name = row_data.get(1).unwrap_or("").trim();
        if name.is_empty() {
            continue;
        }
        let link = row_data.get(2).unwrap_or("").trim().to_string();
        let id = unique_id(name, today.year(), existing);
        existing.insert(id.clone());
        records.push(ScholarRecord {
            id,
            name: LocalizedName {
                ja: name.to_string(),
                en: String::new(),
            },
            affiliation: String::new(),
            rarity: Rarity::from_level(level.map(|value| value as i64).unwrap_or(1)),
            tags: Vec::new(),
            contribution: Contribution {
                text: String::new(),
                source: link.clone(),
            },
            trivia: String::new(),
            trivia_source: String::new(),
            sources: vec![link],
            avatar: None,
            created_at: Some(created_at.clone()),
        });
    }
    tracing::info!(count = records.len(), "imported scholar rows");
    Ok(records)
}

fn unique_id(name: &str, year: i32, existing: &HashSet<String>) -> String {
    let stem = name
        .split_whitespace()
        .next()
        .map(str::to_lowercase)
        .unwrap_or_else(|| "unknown".to_string());
    let base = format!("{stem}{year}");
    let mut candidate = base.clone();
    let mut counter = 1;
    while existing.contains(&candidate) {
        candidate = format!("{base}_{counter}");
        counter += 1;
    }
    candidate
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 4, 1).expect("date")
    }

    #[test]
    fn imports_rows_with_header() {
        let body = "rarity,name,link,image_link\n\
                    4,Marie Curie,https://example.org/curie,\n\
                    2,,https://example.org/blank,\n\
                    x,Ada Lovelace,,\n";
        let mut existing = HashSet::new();
        let records = import_csv(body.as_bytes(), &mut existing, today()).expect("import");
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, "marie2026");
        assert_eq!(records[0].rarity, Rarity::SSR);
        assert_eq!(records[0].contribution.source, "https://example.org/curie");
        assert_eq!(records[0].sources, vec!["https://example.org/curie".to_string()]);
        assert_eq!(records[0].created_at.as_deref(), Some("2026-04-01"));
        assert_eq!(records[1].rarity, Rarity::N);
        assert_eq!(records[1].sources, vec![String::new()]);
        assert!(existing.contains("ada2026"));
    }

    #[test]
    fn headerless_file_keeps_first_row() {
        let body = "3,Emmy Noether,https://example.org/noether\n";
        let records = import_csv(body.as_bytes(), &mut HashSet::new(), today()).expect("import");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].rarity, Rarity::SR);
        assert_eq!(records[0].name.ja, "Emmy Noether");
    }

    #[test]
    fn colliding_ids_get_suffixes() {
        let mut existing = HashSet::from(["emmy2026".to_string()]);
        let body = "3,Emmy Noether,\n1,Emmy Other,\n";
        let records = import_csv(body.as_bytes(), &mut existing, today()).expect("import");
        let ids: Vec<_> = records.iter().map(|record| record.id.as_str()).collect();
        assert_eq!(ids, ["emmy2026_1", "emmy2026_2"]);
    }
}
