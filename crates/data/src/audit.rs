use gacha_core::ScholarRecord;
use serde::Serialize;

/// A record missing text that the card would display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditFinding {
    pub id: String,
    pub name: String,
    pub missing_contribution: bool,
    pub missing_trivia: bool,
}

impl AuditFinding {
    pub fn describe(&self) -> String {
        let mut missing = Vec::new();
        if self.missing_contribution {
            missing.push("contribution");
        }
        if self.missing_trivia {
            missing.push("trivia");
        }
        format!("{} - missing {}", self.name, missing.join(", "))
    }
}

pub fn audit_scholars(records: &[ScholarRecord]) -> Vec<AuditFinding> {
    records
        .iter()
        .filter_map(|record| {
            let missing_contribution = record.contribution.text.trim().is_empty();
            let missing_trivia = record.trivia.trim().is_empty();
            if !missing_contribution && !missing_trivia {
                return None;
            }
            let name = if record.name.ja.trim().is_empty() {
                record.id.clone()
            } else {
                record.name.ja.clone()
            };
            Some(AuditFinding {
                id: record.id.clone(),
                name,
                missing_contribution,
                missing_trivia,
            })
        })
        .collect()
}
