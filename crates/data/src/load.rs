use anyhow::{bail, Context};
use gacha_core::{GachaConfig, ScholarRecord};
use serde::de::DeserializeOwned;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

pub const SCHOLARS_FILE: &str = "scholars.json";
pub const CONFIG_FILE: &str = "gacha.json";

pub fn load_scholars(path: &Path) -> anyhow::Result<Vec<ScholarRecord>> {
    let records: Vec<ScholarRecord> = load_json(path)?;
    validate_unique_ids(&records).with_context(|| format!("validate {}", path.display()))?;
    Ok(records)
}

/// Loads the dataset, logging failures and falling back to no records.
pub fn load_scholars_or_empty(path: &Path) -> Vec<ScholarRecord> {
    match load_scholars(path) {
        Ok(records) => {
            tracing::info!(count = records.len(), path = %path.display(), "loaded scholar data");
            records
        }
        Err(err) => {
            tracing::error!(path = %path.display(), "failed to load scholar data: {err:#}");
            Vec::new()
        }
    }
}

/// Reads `gacha.json` from `dir`, or defaults when it is absent.
pub fn load_gacha_config(dir: &Path) -> anyhow::Result<GachaConfig> {
    let path = dir.join(CONFIG_FILE);
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no config file, using defaults");
        return Ok(GachaConfig::default());
    }
    load_json(&path)
}

pub fn validate_unique_ids(records: &[ScholarRecord]) -> anyhow::Result<()> {
    let mut seen = HashSet::with_capacity(records.len());
    for record in records {
        if record.id.trim().is_empty() {
            bail!("scholar with empty id ({})", record.display_name());
        }
        if !seen.insert(record.id.as_str()) {
            bail!("duplicate scholar id {}", record.id);
        }
    }
    Ok(())
}

pub fn save_scholars(path: &Path, records: &[ScholarRecord]) -> anyhow::Result<()> {
    let body = serde_json::to_string_pretty(records).context("serialize scholars")?;
    fs::write(path, body).with_context(|| format!("write {}", path.display()))
}

pub fn normalize_locale(locale: Option<&str>) -> String {
    let raw = locale.unwrap_or("ja_JP").trim();
    if raw.is_empty() {
        return "ja_JP".to_string();
    }
    let lowered = raw.replace('-', "_").to_ascii_lowercase();
    match lowered.as_str() {
        "ja" | "ja_jp" | "jp" => "ja_JP".to_string(),
        "en" | "en_us" => "en_US".to_string(),
        _ => raw.replace('-', "_"),
    }
}

fn load_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> anyhow::Result<T> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let value = serde_json::from_str(&raw).with_context(|| format!("parse {}", path.display()))?;
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    const SAMPLE: &str = r#"[
      {"id": "a", "name": {"ja": "甲", "en": "A"}, "rarity": "N"},
      {"id": "b", "name": {"ja": "乙", "en": "B"}, "rarity": "SSR", "tags": ["physics"]}
    ]"#;

    #[test]
    fn loads_valid_dataset() {
        let file = unique_temp_file("ok");
        fs::write(&file, SAMPLE).expect("write");
        let records = load_scholars(&file).expect("load");
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].tags, vec!["physics".to_string()]);
        let _ = fs::remove_file(file);
    }

    #[test]
    fn rejects_duplicate_ids() {
        let file = unique_temp_file("dup");
        let body = r#"[
          {"id": "a", "name": {"en": "A"}, "rarity": "N"},
          {"id": "a", "name": {"en": "A2"}, "rarity": "R"}
        ]"#;
        fs::write(&file, body).expect("write");
        let err = load_scholars(&file).expect_err("duplicate");
        assert!(format!("{err:#}").contains("duplicate scholar id a"));
        let _ = fs::remove_file(file);
    }

    #[test]
    fn missing_or_broken_file_yields_empty_dataset() {
        let missing = unique_temp_file("missing");
        assert!(load_scholars_or_empty(&missing).is_empty());
        let broken = unique_temp_file("broken");
        fs::write(&broken, "{not json").expect("write");
        assert!(load_scholars_or_empty(&broken).is_empty());
        let _ = fs::remove_file(broken);
    }

    #[test]
    fn config_defaults_when_absent() {
        let dir = std::env::temp_dir().join(format!("gacha_cfg_absent_{}", std::process::id()));
        let config = load_gacha_config(&dir).expect("defaults");
        assert_eq!(config, GachaConfig::default());
    }

    #[test]
    fn config_file_with_partial_tier_loads() {
        let dir = unique_temp_file("cfg_dir").with_extension("");
        fs::create_dir_all(&dir).expect("mkdir");
        fs::write(
            dir.join(CONFIG_FILE),
            r#"{"celebration": {"top": {"hold_ms": 1200}}}"#,
        )
        .expect("write");
        let config = load_gacha_config(&dir).expect("load config");
        assert_eq!(config.celebration.top.hold_ms, 1200);
        assert_eq!(config.celebration.top.total_ms(), 1710);
        assert_eq!(config.celebration.second, GachaConfig::default().celebration.second);
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn save_then_load_keeps_records() {
        let file = unique_temp_file("save");
        fs::write(&file, SAMPLE).expect("write");
        let records = load_scholars(&file).expect("load");
        save_scholars(&file, &records).expect("save");
        assert_eq!(load_scholars(&file).expect("reload"), records);
        let _ = fs::remove_file(file);
    }

    #[test]
    fn normalizes_locale_aliases() {
        assert_eq!(normalize_locale(None), "ja_JP");
        assert_eq!(normalize_locale(Some("en-US")), "en_US");
        assert_eq!(normalize_locale(Some("JA")), "ja_JP");
        assert_eq!(normalize_locale(Some(" ")), "ja_JP");
    }

    fn unique_temp_file(tag: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "gacha_data_load_test_{tag}_{}_{}.json",
            std::process::id(),
            nanos
        ))
    }
}
