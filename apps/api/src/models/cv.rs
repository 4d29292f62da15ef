//! Canonical CV schema — the single output contract of the parsing pipeline.
//!
//! Every extraction strategy (local heuristics, remote providers, Ollama)
//! funnels into this shape through the normalizer. Optional fields are
//! `None` when unknown, never empty strings, so "not found" stays
//! distinguishable from "found but blank". Sequences are empty, never null.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Personal {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub linkedin: Option<String>,
    pub github: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub title: Option<String>,
    pub summary: Option<String>,
}

/// Disjoint partition of the raw skill list: every upstream skill string
/// lands in exactly one bucket.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Skills {
    #[serde(default)]
    pub technical: Vec<String>,
    #[serde(default)]
    pub soft: Vec<String>,
}

/// Dates are free-form (`YYYY`, `YYYY-MM`, or the literal `Present`) and
/// stored verbatim — no parsing or validation happens in the core.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExperienceItem {
    pub company: Option<String>,
    pub role: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EducationItem {
    pub school: Option<String>,
    pub degree: Option<String>,
    pub field: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub location: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LanguageItem {
    pub name: Option<String>,
    pub level: Option<String>,
}

/// The full canonical document returned to clients. Constructed once per
/// request, immutable after construction, serialized and discarded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CvSchema {
    #[serde(default)]
    pub personal: Personal,
    #[serde(default)]
    pub profile: Profile,
    #[serde(default)]
    pub skills: Skills,
    #[serde(default)]
    pub experience: Vec<ExperienceItem>,
    #[serde(default)]
    pub education: Vec<EducationItem>,
    #[serde(default)]
    pub languages: Vec<LanguageItem>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_schema_serializes_with_all_keys() {
        let cv = CvSchema::default();
        let value = serde_json::to_value(&cv).unwrap();
        for key in [
            "personal",
            "profile",
            "skills",
            "experience",
            "education",
            "languages",
        ] {
            assert!(value.get(key).is_some(), "missing key {key}");
        }
        assert!(value["personal"]["full_name"].is_null());
        assert_eq!(value["skills"]["technical"], serde_json::json!([]));
        assert_eq!(value["experience"], serde_json::json!([]));
    }

    #[test]
    fn test_schema_roundtrip() {
        let cv = CvSchema {
            personal: Personal {
                full_name: Some("Jane Doe".to_string()),
                email: Some("jane@example.com".to_string()),
                ..Personal::default()
            },
            experience: vec![ExperienceItem {
                company: Some("ACME Corp".to_string()),
                role: Some("Backend Engineer".to_string()),
                start_date: Some("2021-01".to_string()),
                end_date: Some("Present".to_string()),
                ..ExperienceItem::default()
            }],
            ..CvSchema::default()
        };
        let json = serde_json::to_string(&cv).unwrap();
        let back: CvSchema = serde_json::from_str(&json).unwrap();
        assert_eq!(cv, back);
    }
}
