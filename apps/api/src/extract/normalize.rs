//! Schema normalizer — the universal funnel. Accepts a loosely-structured
//! payload from any extraction strategy (local heuristics, a remote
//! provider, or the local model) and produces the canonical schema.
//!
//! Field resolution walks an explicit alias list per field and takes the
//! first non-empty string; wrong-typed and missing values fall through. The
//! public entry point never fails: a payload of an unexpected shape
//! collapses to an all-empty schema at a single named boundary, with the
//! offending payload logged for diagnosis.

use serde_json::{Map, Value};
use thiserror::Error;
use tracing::error;

use crate::models::cv::{
    CvSchema, EducationItem, ExperienceItem, LanguageItem, Personal, Profile, Skills,
};

/// Why normalization fell back to the empty schema.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NormalizeError {
    #[error("payload is not a JSON object (found {found})")]
    NotAnObject { found: &'static str },
}

/// Soft-skill phrases. A skill containing any of these, case-insensitively,
/// is classified soft; everything else is technical.
const SOFT_SKILL_KEYWORDS: &[&str] = &[
    "communication",
    "teamwork",
    "leadership",
    "problem solving",
    "creativity",
    "adaptability",
    "time management",
    "collaboration",
    "negotiation",
    "presentation",
    "analytical",
    "critical thinking",
];

/// Total entry point: always returns a complete schema. A malformed upstream
/// payload yields an empty-but-valid document rather than an error.
pub fn normalize(payload: &Value) -> CvSchema {
    match try_normalize(payload) {
        Ok(cv) => cv,
        Err(e) => {
            error!(payload = %payload, "Failed to normalize extraction payload: {e}");
            CvSchema::default()
        }
    }
}

/// Fallible normalization. The only rejection is a payload (or wrapper
/// value) that is not a JSON object; per-field problems degrade to absent
/// fields instead.
pub fn try_normalize(payload: &Value) -> Result<CvSchema, NormalizeError> {
    let data = unwrap_payload(payload)?;

    Ok(CvSchema {
        personal: normalize_personal(data),
        profile: normalize_profile(data),
        skills: normalize_skills(data),
        experience: normalize_experience(data),
        education: normalize_education(data),
        languages: normalize_languages(data),
    })
}

/// Some providers wrap the real fields in an `extraction` or `data`
/// envelope, occasionally twice. A wrapper key whose value is not an object
/// is a malformed payload.
fn unwrap_payload(payload: &Value) -> Result<&Map<String, Value>, NormalizeError> {
    let outer = payload.as_object().ok_or_else(|| not_an_object(payload))?;

    let unwrapped = match outer.get("extraction").or_else(|| outer.get("data")) {
        Some(inner) => inner.as_object().ok_or_else(|| not_an_object(inner))?,
        None => outer,
    };

    match unwrapped.get("extraction") {
        Some(inner) => inner.as_object().ok_or_else(|| not_an_object(inner)),
        None => Ok(unwrapped),
    }
}

fn not_an_object(value: &Value) -> NormalizeError {
    NormalizeError::NotAnObject {
        found: json_type(value),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// First non-empty string among `keys`, in priority order. Empty strings
/// count as absent, preserving the "never empty string" invariant.
fn first_str(obj: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| {
        obj.get(*key)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(String::from)
    })
}

fn object_field<'a>(obj: &'a Map<String, Value>, key: &str) -> Option<&'a Map<String, Value>> {
    obj.get(key).and_then(Value::as_object)
}

/// A field that should be a list but isn't coerces to empty.
fn list_field<'a>(obj: &'a Map<String, Value>, key: &str) -> &'a [Value] {
    obj.get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

fn normalize_personal(data: &Map<String, Value>) -> Personal {
    let Some(personal) = object_field(data, "personal") else {
        return Personal::default();
    };
    Personal {
        full_name: first_str(personal, &["full_name"]),
        email: first_str(personal, &["email"]),
        phone: first_str(personal, &["phone"]),
        address: first_str(personal, &["address"]),
        linkedin: first_str(personal, &["linkedin"]),
        github: first_str(personal, &["github"]),
    }
}

fn normalize_profile(data: &Map<String, Value>) -> Profile {
    let profile = object_field(data, "profile");
    Profile {
        // Some providers put title/summary at the top level instead.
        title: profile
            .and_then(|p| first_str(p, &["title"]))
            .or_else(|| first_str(data, &["title"])),
        summary: profile
            .and_then(|p| first_str(p, &["summary"]))
            .or_else(|| first_str(data, &["summary", "objective"])),
    }
}

fn normalize_experience(data: &Map<String, Value>) -> Vec<ExperienceItem> {
    list_field(data, "experience")
        .iter()
        .filter_map(Value::as_object) // non-object items are dropped
        .map(|exp| ExperienceItem {
            company: first_str(exp, &["company"]),
            role: first_str(exp, &["role", "position", "title"]),
            start_date: first_str(exp, &["start_date", "start"]),
            end_date: first_str(exp, &["end_date", "end"]),
            description: first_str(exp, &["description"]),
            location: first_str(exp, &["location"]),
        })
        .collect()
}

fn normalize_education(data: &Map<String, Value>) -> Vec<EducationItem> {
    list_field(data, "education")
        .iter()
        .filter_map(Value::as_object)
        .map(|edu| EducationItem {
            school: first_str(edu, &["school", "institution", "university"]),
            degree: first_str(edu, &["degree"]),
            field: first_str(edu, &["field", "major"]),
            start_date: first_str(edu, &["start_date", "start"]),
            end_date: first_str(edu, &["end_date", "end"]),
            location: first_str(edu, &["location"]),
        })
        .collect()
}

fn normalize_languages(data: &Map<String, Value>) -> Vec<LanguageItem> {
    list_field(data, "languages")
        .iter()
        .map(|lang| match lang {
            Value::Object(obj) => LanguageItem {
                name: first_str(obj, &["name", "language"]),
                level: first_str(obj, &["level", "proficiency"]),
            },
            // Bare strings (and other scalars) become a name-only entry.
            Value::String(s) => LanguageItem {
                name: Some(s.clone()).filter(|s| !s.is_empty()),
                level: None,
            },
            Value::Null => LanguageItem::default(),
            other => LanguageItem {
                name: Some(other.to_string()),
                level: None,
            },
        })
        .collect()
}

fn normalize_skills(data: &Map<String, Value>) -> Skills {
    let mut technical = Vec::new();
    let mut soft = Vec::new();

    for skill in raw_skill_list(data.get("skills")) {
        if is_soft_skill(&skill) {
            soft.push(skill);
        } else {
            technical.push(skill);
        }
    }

    Skills { technical, soft }
}

/// Accepts a comma-separated string, a flat list, or the canonical
/// `{technical, soft}` object — the latter so an already-canonical document
/// survives re-normalization (classification is content-deterministic, so
/// reclassifying technical ++ soft reproduces the same partition). Anything
/// else coerces to an empty list.
fn raw_skill_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::String(s)) => s
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect(),
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(String::from)
            .collect(),
        Some(Value::Object(obj)) => ["technical", "soft"]
            .into_iter()
            .flat_map(|key| list_field(obj, key).iter().filter_map(Value::as_str))
            .map(String::from)
            .collect(),
        _ => Vec::new(),
    }
}

fn is_soft_skill(skill: &str) -> bool {
    let lower = skill.to_lowercase();
    SOFT_SKILL_KEYWORDS.iter().any(|kw| lower.contains(kw))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_object_yields_empty_schema() {
        let cv = normalize(&json!({}));
        assert_eq!(cv, CvSchema::default());
    }

    #[test]
    fn test_non_object_payload_falls_back_to_empty_schema() {
        for payload in [json!(null), json!("garbage"), json!(42), json!([1, 2])] {
            let cv = normalize(&payload);
            assert_eq!(cv, CvSchema::default());
        }
    }

    #[test]
    fn test_fallback_reason_is_named() {
        let err = try_normalize(&json!("garbage")).unwrap_err();
        assert_eq!(err, NormalizeError::NotAnObject { found: "string" });

        let err = try_normalize(&json!({ "extraction": [1, 2] })).unwrap_err();
        assert_eq!(err, NormalizeError::NotAnObject { found: "array" });
    }

    #[test]
    fn test_unwraps_extraction_envelope() {
        let cv = normalize(&json!({
            "extraction": { "personal": { "email": "a@b.co" } }
        }));
        assert_eq!(cv.personal.email.as_deref(), Some("a@b.co"));
    }

    #[test]
    fn test_unwraps_data_envelope() {
        let cv = normalize(&json!({
            "data": { "personal": { "email": "a@b.co" } }
        }));
        assert_eq!(cv.personal.email.as_deref(), Some("a@b.co"));
    }

    #[test]
    fn test_unwraps_double_extraction_envelope() {
        let cv = normalize(&json!({
            "extraction": { "extraction": { "personal": { "email": "a@b.co" } } }
        }));
        assert_eq!(cv.personal.email.as_deref(), Some("a@b.co"));
    }

    #[test]
    fn test_alias_priority_first_wins() {
        let cv = normalize(&json!({
            "experience": [{ "start_date": "2020", "start": "1999" }]
        }));
        assert_eq!(cv.experience[0].start_date.as_deref(), Some("2020"));
    }

    #[test]
    fn test_role_alias_chain() {
        let cv = normalize(&json!({
            "experience": [
                { "position": "Engineer" },
                { "title": "Analyst" },
                { "role": "Manager", "position": "ignored" }
            ]
        }));
        assert_eq!(cv.experience[0].role.as_deref(), Some("Engineer"));
        assert_eq!(cv.experience[1].role.as_deref(), Some("Analyst"));
        assert_eq!(cv.experience[2].role.as_deref(), Some("Manager"));
    }

    #[test]
    fn test_school_and_field_aliases() {
        let cv = normalize(&json!({
            "education": [
                { "institution": "MIT", "major": "CS" },
                { "university": "ENS", "field": "Math", "major": "ignored" }
            ]
        }));
        assert_eq!(cv.education[0].school.as_deref(), Some("MIT"));
        assert_eq!(cv.education[0].field.as_deref(), Some("CS"));
        assert_eq!(cv.education[1].school.as_deref(), Some("ENS"));
        assert_eq!(cv.education[1].field.as_deref(), Some("Math"));
    }

    #[test]
    fn test_empty_string_treated_as_absent() {
        let cv = normalize(&json!({
            "experience": [{ "role": "", "position": "Engineer" }],
            "personal": { "email": "" }
        }));
        assert_eq!(cv.experience[0].role.as_deref(), Some("Engineer"));
        assert_eq!(cv.personal.email, None);
    }

    #[test]
    fn test_profile_falls_back_to_top_level() {
        let cv = normalize(&json!({
            "title": "Data Scientist",
            "objective": "Build things that matter"
        }));
        assert_eq!(cv.profile.title.as_deref(), Some("Data Scientist"));
        assert_eq!(cv.profile.summary.as_deref(), Some("Build things that matter"));
    }

    #[test]
    fn test_profile_nested_wins_over_top_level() {
        let cv = normalize(&json!({
            "profile": { "title": "Nested", "summary": "Nested summary" },
            "title": "Top",
            "summary": "Top summary"
        }));
        assert_eq!(cv.profile.title.as_deref(), Some("Nested"));
        assert_eq!(cv.profile.summary.as_deref(), Some("Nested summary"));
    }

    #[test]
    fn test_experience_not_a_list_coerces_to_empty() {
        let cv = normalize(&json!({ "experience": "not a list" }));
        assert!(cv.experience.is_empty());
    }

    #[test]
    fn test_non_object_experience_items_dropped() {
        let cv = normalize(&json!({
            "experience": [{ "company": "A" }, "garbage", { "role": "B" }]
        }));
        assert_eq!(cv.experience.len(), 2);
        assert_eq!(cv.experience[0].company.as_deref(), Some("A"));
        assert_eq!(cv.experience[1].role.as_deref(), Some("B"));
    }

    #[test]
    fn test_language_aliases_and_string_coercion() {
        let cv = normalize(&json!({
            "languages": [
                { "language": "French", "proficiency": "Native" },
                { "name": "English", "level": "C1" },
                "Spanish"
            ]
        }));
        assert_eq!(cv.languages.len(), 3);
        assert_eq!(cv.languages[0].name.as_deref(), Some("French"));
        assert_eq!(cv.languages[0].level.as_deref(), Some("Native"));
        assert_eq!(cv.languages[1].name.as_deref(), Some("English"));
        assert_eq!(cv.languages[2].name.as_deref(), Some("Spanish"));
        assert_eq!(cv.languages[2].level, None);
    }

    #[test]
    fn test_languages_not_a_list_coerces_to_empty() {
        let cv = normalize(&json!({ "languages": { "name": "French" } }));
        assert!(cv.languages.is_empty());
    }

    #[test]
    fn test_skills_comma_string_split_and_trimmed() {
        let cv = normalize(&json!({ "skills": "Rust,  Python , Teamwork" }));
        assert_eq!(cv.skills.technical, vec!["Rust", "Python"]);
        assert_eq!(cv.skills.soft, vec!["Teamwork"]);
    }

    #[test]
    fn test_skill_partition_is_disjoint_and_complete() {
        let input = vec![
            "Rust",
            "Team Leadership",
            "Docker",
            "Communication skills",
            "Critical Thinking",
            "SQL",
        ];
        let cv = normalize(&json!({ "skills": input.clone() }));

        assert_eq!(cv.skills.technical, vec!["Rust", "Docker", "SQL"]);
        assert_eq!(
            cv.skills.soft,
            vec!["Team Leadership", "Communication skills", "Critical Thinking"]
        );
        // Union preserves every input skill exactly once.
        assert_eq!(
            cv.skills.technical.len() + cv.skills.soft.len(),
            input.len()
        );
        assert!(cv.skills.technical.iter().all(|s| !cv.skills.soft.contains(s)));
    }

    #[test]
    fn test_skills_wrong_type_coerces_to_empty() {
        let cv = normalize(&json!({ "skills": 42 }));
        assert!(cv.skills.technical.is_empty());
        assert!(cv.skills.soft.is_empty());
    }

    #[test]
    fn test_skills_list_drops_non_string_items() {
        let cv = normalize(&json!({ "skills": ["Rust", 5, null, "Teamwork"] }));
        assert_eq!(cv.skills.technical, vec!["Rust"]);
        assert_eq!(cv.skills.soft, vec!["Teamwork"]);
    }

    #[test]
    fn test_totality_on_hostile_payload() {
        // Wrong types everywhere — must still produce a complete schema.
        let cv = normalize(&json!({
            "personal": "not an object",
            "profile": 7,
            "experience": { "company": "A" },
            "education": null,
            "skills": { "unexpected": true },
            "languages": "French"
        }));
        assert_eq!(cv, CvSchema::default());
    }

    #[test]
    fn test_idempotence_on_canonical_payload() {
        let first = normalize(&json!({
            "personal": { "full_name": "Jane Doe", "email": "jane@example.com" },
            "profile": { "title": "Engineer", "summary": "Builds systems." },
            "skills": ["Rust", "Leadership"],
            "experience": [{
                "company": "ACME",
                "role": "Backend Engineer",
                "start_date": "2021-01",
                "end_date": "Present"
            }],
            "education": [{ "school": "ENS", "degree": "MSc", "field": "CS" }],
            "languages": [{ "name": "French", "level": "Native" }]
        }));

        let as_payload = serde_json::to_value(&first).unwrap();
        let second = normalize(&as_payload);
        assert_eq!(first, second);
    }

    #[test]
    fn test_dates_stored_verbatim() {
        let cv = normalize(&json!({
            "experience": [{ "start_date": "2021-01", "end_date": "Present" }],
            "education": [{ "start": "2018", "end": "2020" }]
        }));
        assert_eq!(cv.experience[0].start_date.as_deref(), Some("2021-01"));
        assert_eq!(cv.experience[0].end_date.as_deref(), Some("Present"));
        assert_eq!(cv.education[0].start_date.as_deref(), Some("2018"));
        assert_eq!(cv.education[0].end_date.as_deref(), Some("2020"));
    }

    #[test]
    fn test_heuristic_draft_normalizes_cleanly() {
        let draft = crate::extract::heuristics::extract_draft(
            "Jane Doe\nSoftware Engineer\njane@example.com\n\nExperience\nAcme Corp - Backend Engineer\n\nEducation\nBachelor of Science\n\nSkills\nRust, Docker",
        );
        let cv = normalize(&draft);
        assert_eq!(cv.personal.full_name.as_deref(), Some("Jane Doe"));
        assert_eq!(cv.personal.email.as_deref(), Some("jane@example.com"));
        assert_eq!(cv.experience.len(), 1);
        assert_eq!(cv.experience[0].company.as_deref(), Some("Acme Corp"));
        assert!(!cv.skills.technical.is_empty());
        assert!(cv.languages.is_empty());
    }
}
