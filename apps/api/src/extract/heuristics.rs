//! Heuristic text extractor — builds a best-effort draft from raw document
//! text using pattern matching only. No network or model calls.
//!
//! Every field heuristic is independent: a pattern that fails to match
//! leaves its field absent and never aborts the document. The output is a
//! loosely-typed draft that still goes through the normalizer, exactly like
//! a remote provider response would.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{json, Map, Value};
use tracing::info;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b").unwrap());

// International and local phone shapes. Deliberately loose — candidates are
// filtered by digit count afterwards.
static PHONE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:\+?\d{1,3}[-.\s]?)?\(?\d{1,4}\)?[-.\s]?\d{1,4}[-.\s]?\d{1,9}").unwrap()
});

static LINKEDIN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)linkedin\.com/(?:in|pub)/([A-Za-z0-9-]+)").unwrap());

static GITHUB_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)github\.com/([A-Za-z0-9-]+)").unwrap());

// `Company - Role` shape: capitalized phrase, optional company suffix, a
// dash variant, then a capitalized role phrase. Phrases stay on one line so
// a heading above the entry cannot bleed into the company name.
static COMPANY_ROLE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"([A-Z][a-zA-Z &]+(?:Inc|LLC|Ltd|Corp)?)\s*[-–—]\s*([A-Z][a-zA-Z ]+)").unwrap()
});

static DEGREE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"((?i:Bachelor|Master|PhD|Doctorate|Diploma|Certificate))\s+(?i:of|in)?\s*([A-Z][a-zA-Z ]+)")
        .unwrap()
});

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Reference vocabulary of common technical terms, matched case-insensitively
/// as substrings against the whole document. Present terms are collected in
/// vocabulary order, not document order.
const SKILL_VOCABULARY: &[&str] = &[
    "Python",
    "Java",
    "JavaScript",
    "TypeScript",
    "C++",
    "C#",
    "PHP",
    "Ruby",
    "Go",
    "Rust",
    "React",
    "Angular",
    "Vue",
    "Node.js",
    "Express",
    "Django",
    "Flask",
    "FastAPI",
    "Spring",
    "SQL",
    "MySQL",
    "PostgreSQL",
    "MongoDB",
    "Redis",
    "Docker",
    "Kubernetes",
    "AWS",
    "Azure",
    "Git",
    "Linux",
    "Windows",
    "HTML",
    "CSS",
    "SASS",
    "Bootstrap",
    "Tailwind",
    "Machine Learning",
    "AI",
    "TensorFlow",
    "PyTorch",
    "Data Science",
    "Analytics",
];

const MAX_SKILLS: usize = 20;

// Section heading keywords in priority order — the first keyword that occurs
// anywhere in the document wins, regardless of position.
const EXPERIENCE_HEADINGS: &[&str] = &[
    "experience",
    "work experience",
    "employment",
    "career",
    "professional experience",
];
const EXPERIENCE_BOUNDARIES: &[&str] = &["education", "skills", "projects"];

const EDUCATION_HEADINGS: &[&str] = &["education", "academic", "university", "degree", "diploma"];
const EDUCATION_BOUNDARIES: &[&str] = &["experience", "skills", "projects"];

const SUMMARY_HEADINGS: &[&str] = &["summary", "profile", "about", "objective", "overview"];
const SUMMARY_BOUNDARIES: &[&str] = &["experience", "education", "skills"];

const TITLE_KEYWORDS: &[&str] = &[
    "developer",
    "engineer",
    "manager",
    "analyst",
    "designer",
    "consultant",
    "specialist",
];

/// Runs every field heuristic over the extracted text and assembles the
/// draft payload with keys `personal`, `profile`, `experience`, `education`,
/// `skills`, `languages`.
pub fn extract_draft(text: &str) -> Value {
    // ASCII lowering keeps byte offsets aligned with the original text, so
    // section spans found on the lowered copy can slice the original.
    let lower = text.to_ascii_lowercase();

    let mut personal = Map::new();
    insert_opt(&mut personal, "email", find_email(text));
    insert_opt(&mut personal, "phone", find_phone(text));
    insert_opt(&mut personal, "linkedin", find_linkedin(text));
    insert_opt(&mut personal, "github", find_github(text));
    insert_opt(&mut personal, "full_name", find_name(text));

    let mut profile = Map::new();
    insert_opt(&mut profile, "summary", find_summary(text, &lower));
    insert_opt(&mut profile, "title", find_title(text));

    let experience = find_experience(text, &lower);
    let education = find_education(text, &lower);
    let skills = find_skills(&lower);

    info!(
        experiences = experience.len(),
        educations = education.len(),
        skills = skills.len(),
        "Local extraction completed"
    );

    json!({
        "personal": personal,
        "profile": profile,
        "experience": experience,
        "education": education,
        "skills": skills,
        "languages": [],
    })
}

fn insert_opt(map: &mut Map<String, Value>, key: &str, value: Option<String>) {
    if let Some(v) = value {
        map.insert(key.to_string(), Value::String(v));
    }
}

/// First RFC-like email in document order.
fn find_email(text: &str) -> Option<String> {
    EMAIL_RE.find(text).map(|m| m.as_str().to_string())
}

/// First phone-shaped substring with at least 8 digits once separators are
/// stripped. Earlier matches win.
fn find_phone(text: &str) -> Option<String> {
    PHONE_RE
        .find_iter(text)
        .map(|m| m.as_str().trim())
        .find(|candidate| candidate.chars().filter(char::is_ascii_digit).count() >= 8)
        .map(str::to_string)
}

/// Matches `linkedin.com/in/<handle>` or `linkedin.com/pub/<handle>` and
/// reconstructs a canonical URL, discarding scheme/subdomain variation.
fn find_linkedin(text: &str) -> Option<String> {
    LINKEDIN_RE
        .captures(text)
        .map(|caps| format!("https://linkedin.com/in/{}", &caps[1]))
}

fn find_github(text: &str) -> Option<String> {
    GITHUB_RE
        .captures(text)
        .map(|caps| format!("https://github.com/{}", &caps[1]))
}

/// The full name is assumed to sit near the top: the first line among the
/// first ten that is between 4 and 49 chars and contains no email, no
/// phone-shaped substring, and no "http" token.
fn find_name(text: &str) -> Option<String> {
    for line in text.lines().take(10) {
        let line = line.trim();
        let len = line.chars().count();
        if len > 3
            && len < 50
            && !EMAIL_RE.is_match(line)
            && !PHONE_RE.is_match(line)
            && !line.to_ascii_lowercase().contains("http")
        {
            return Some(line.to_string());
        }
    }
    None
}

/// Vocabulary terms present anywhere in the lowered text, in vocabulary
/// order, capped at [`MAX_SKILLS`].
fn find_skills(lower: &str) -> Vec<String> {
    SKILL_VOCABULARY
        .iter()
        .filter(|skill| lower.contains(&skill.to_ascii_lowercase()))
        .take(MAX_SKILLS)
        .map(|s| s.to_string())
        .collect()
}

/// Captures a "heading keyword, greedy-to-next-boundary" span.
///
/// The heading is picked by scanning `headings` in priority order and taking
/// the first keyword that occurs at all; the span then runs from that
/// keyword to the earliest boundary keyword occurring after it, or to the
/// end of the document. Returns the span (heading included) and the heading
/// that matched.
fn section_span<'a>(
    text: &'a str,
    lower: &str,
    headings: &[&'static str],
    boundaries: &[&str],
) -> Option<(&'a str, &'static str)> {
    let (start, heading) = headings
        .iter()
        .find_map(|h| lower.find(h).map(|pos| (pos, *h)))?;

    let after = start + heading.len();
    let end = boundaries
        .iter()
        .filter_map(|b| lower[after..].find(b).map(|pos| after + pos))
        .min()
        .unwrap_or(text.len());

    Some((&text[start..end], heading))
}

/// `Company - Role` entries inside the experience section. Only company and
/// role are populated; dates and descriptions are out of reach for this
/// heuristic.
fn find_experience(text: &str, lower: &str) -> Vec<Value> {
    let Some((section, _)) = section_span(text, lower, EXPERIENCE_HEADINGS, EXPERIENCE_BOUNDARIES)
    else {
        return Vec::new();
    };

    COMPANY_ROLE_RE
        .captures_iter(section)
        .filter_map(|caps| {
            let company = caps[1].trim().to_string();
            let role = caps[2].trim().to_string();
            (company.len() > 2 && role.len() > 2)
                .then(|| json!({ "company": company, "role": role }))
        })
        .collect()
}

/// Degree-name entries inside the education section. The field of study is
/// folded into the degree string.
fn find_education(text: &str, lower: &str) -> Vec<Value> {
    let Some((section, _)) = section_span(text, lower, EDUCATION_HEADINGS, EDUCATION_BOUNDARIES)
    else {
        return Vec::new();
    };

    DEGREE_RE
        .captures_iter(section)
        .map(|caps| {
            let degree = format!("{} {}", &caps[1], &caps[2]);
            json!({ "degree": degree.trim() })
        })
        .collect()
}

/// Profile summary: the captured span minus its heading keyword, whitespace
/// runs collapsed, kept only when the result lands between 21 and 499 chars.
fn find_summary(text: &str, lower: &str) -> Option<String> {
    let (section, heading) = section_span(text, lower, SUMMARY_HEADINGS, SUMMARY_BOUNDARIES)?;

    let body = section[heading.len()..].trim();
    let collapsed = WHITESPACE_RE.replace_all(body, " ");
    let collapsed = collapsed.trim();

    let len = collapsed.chars().count();
    if len > 20 && len < 500 {
        Some(collapsed.chars().take(500).collect())
    } else {
        None
    }
}

/// First of the top five lines mentioning a job-title keyword, verbatim.
fn find_title(text: &str) -> Option<String> {
    text.lines().take(5).find_map(|line| {
        let line_lower = line.to_ascii_lowercase();
        TITLE_KEYWORDS
            .iter()
            .any(|kw| line_lower.contains(kw))
            .then(|| line.trim().to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_CV: &str = "\
Jane Doe
Senior Software Engineer
Paris, France
Contact: jane.doe@example.com | +33 6 12 34 56 78
https://www.linkedin.com/in/janedoe | github.com/janedoe

Summary
Backend engineer with eight years of experience building APIs in Python and Rust.

Experience
Acme Corp - Backend Engineer
Globex Inc - Senior Developer

Education
Bachelor of Science
Master of Computer Science

Skills
Python, Rust, Docker, PostgreSQL
";

    #[test]
    fn test_email_first_match_wins() {
        let draft = extract_draft("Contact: jane.doe@example.com and other text");
        assert_eq!(
            draft["personal"]["email"].as_str(),
            Some("jane.doe@example.com")
        );
    }

    #[test]
    fn test_phone_requires_eight_digits() {
        let draft = extract_draft("call 123-4567 office\nreal one +33 6 12 34 56 78\n");
        let phone = draft["personal"]["phone"].as_str().unwrap();
        let digits = phone.chars().filter(char::is_ascii_digit).count();
        assert!(digits >= 8, "got {phone}");
    }

    #[test]
    fn test_phone_absent_when_no_candidate() {
        let draft = extract_draft("no numbers here at all");
        assert!(draft["personal"].get("phone").is_none());
    }

    #[test]
    fn test_linkedin_url_reconstructed() {
        let draft = extract_draft("see https://www.linkedin.com/in/janedoe for details");
        assert_eq!(
            draft["personal"]["linkedin"].as_str(),
            Some("https://linkedin.com/in/janedoe")
        );
    }

    #[test]
    fn test_linkedin_pub_variant_canonicalized_to_in() {
        let draft = extract_draft("profile at linkedin.com/pub/jdoe-42");
        assert_eq!(
            draft["personal"]["linkedin"].as_str(),
            Some("https://linkedin.com/in/jdoe-42")
        );
    }

    #[test]
    fn test_github_url_reconstructed() {
        let draft = extract_draft("code at GITHUB.COM/janedoe somewhere");
        assert_eq!(
            draft["personal"]["github"].as_str(),
            Some("https://github.com/janedoe")
        );
    }

    #[test]
    fn test_name_is_first_plausible_line() {
        let draft = extract_draft(SAMPLE_CV);
        assert_eq!(draft["personal"]["full_name"].as_str(), Some("Jane Doe"));
    }

    #[test]
    fn test_name_rejects_three_char_line() {
        // Exactly 3 chars is below the exclusive lower bound.
        let draft = extract_draft("Jay\nMary Major\nrest of the document");
        assert_eq!(draft["personal"]["full_name"].as_str(), Some("Mary Major"));
    }

    #[test]
    fn test_name_rejects_fifty_one_char_line() {
        let long_line = "A".repeat(51);
        let text = format!("{long_line}\nMary Major\nrest");
        let draft = extract_draft(&text);
        assert_eq!(draft["personal"]["full_name"].as_str(), Some("Mary Major"));
    }

    #[test]
    fn test_name_rejects_email_phone_and_url_lines() {
        let text = "jane@example.com\n+33 6 12 34 56 78\nhttp://example.com\nJane Doe\n";
        let draft = extract_draft(text);
        assert_eq!(draft["personal"]["full_name"].as_str(), Some("Jane Doe"));
    }

    #[test]
    fn test_name_only_searches_first_ten_lines() {
        let text = format!("{}Jane Doe\n", "contact@example.com\n".repeat(10));
        let draft = extract_draft(&text);
        assert!(draft["personal"].get("full_name").is_none());
    }

    #[test]
    fn test_skills_in_vocabulary_order() {
        let draft = extract_draft("I write Rust and Python, deployed with Docker.");
        let skills: Vec<&str> = draft["skills"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap())
            .collect();
        // Vocabulary order, not document order.
        assert_eq!(skills, vec!["Python", "Rust", "Docker"]);
    }

    #[test]
    fn test_skills_capped_at_twenty() {
        let text = SKILL_VOCABULARY.join(" ");
        let draft = extract_draft(&text);
        assert_eq!(draft["skills"].as_array().unwrap().len(), MAX_SKILLS);
    }

    #[test]
    fn test_section_boundary_between_experience_and_education() {
        let text = "Experience\nFoo Corp - Manager\nEducation\nBachelor of Science";
        let draft = extract_draft(text);

        let experience = draft["experience"].as_array().unwrap();
        assert_eq!(experience.len(), 1);
        assert_eq!(experience[0]["company"].as_str(), Some("Foo Corp"));
        assert_eq!(experience[0]["role"].as_str(), Some("Manager"));

        let education = draft["education"].as_array().unwrap();
        assert_eq!(education.len(), 1);
        let degree = education[0]["degree"].as_str().unwrap();
        assert!(degree.contains("Bachelor") && degree.contains("Science"));
    }

    #[test]
    fn test_experience_entries_in_document_order() {
        let draft = extract_draft(SAMPLE_CV);
        let experience = draft["experience"].as_array().unwrap();
        assert_eq!(experience.len(), 2);
        assert_eq!(experience[0]["company"].as_str(), Some("Acme Corp"));
        assert_eq!(experience[1]["company"].as_str(), Some("Globex Inc"));
        assert_eq!(experience[1]["role"].as_str(), Some("Senior Developer"));
    }

    #[test]
    fn test_experience_rejects_short_company_or_role() {
        let text = "Experience\nAB - Manager\nFoo Corp - QA\n";
        let draft = extract_draft(text);
        assert_eq!(draft["experience"].as_array().unwrap().len(), 0);
    }

    #[test]
    fn test_missing_experience_heading_degrades_to_empty() {
        let draft = extract_draft("Jane Doe\nBachelor of Science\n");
        assert_eq!(draft["experience"].as_array().unwrap().len(), 0);
    }

    #[test]
    fn test_education_degree_folds_field() {
        let draft = extract_draft(SAMPLE_CV);
        let education = draft["education"].as_array().unwrap();
        assert_eq!(education.len(), 2);
        let second = education[1]["degree"].as_str().unwrap();
        assert!(second.contains("Master") && second.contains("Computer Science"));
    }

    #[test]
    fn test_summary_stripped_and_collapsed() {
        let draft = extract_draft(SAMPLE_CV);
        let summary = draft["profile"]["summary"].as_str().unwrap();
        assert!(summary.starts_with("Backend engineer"));
        assert!(!summary.contains('\n'));
        assert!(summary.len() < 500);
    }

    #[test]
    fn test_summary_dropped_when_too_short() {
        let draft = extract_draft("Summary\nToo brief.\nExperience\n");
        assert!(draft["profile"].get("summary").is_none());
    }

    #[test]
    fn test_title_from_first_five_lines() {
        let draft = extract_draft(SAMPLE_CV);
        assert_eq!(
            draft["profile"]["title"].as_str(),
            Some("Senior Software Engineer")
        );
    }

    #[test]
    fn test_title_ignored_when_below_sixth_line() {
        let text = "Jane Doe\na\nb\nc\nd\nSoftware Engineer\n";
        let draft = extract_draft(text);
        assert!(draft["profile"].get("title").is_none());
    }

    #[test]
    fn test_draft_always_has_all_top_level_keys() {
        let draft = extract_draft("");
        for key in [
            "personal",
            "profile",
            "experience",
            "education",
            "skills",
            "languages",
        ] {
            assert!(draft.get(key).is_some(), "missing key {key}");
        }
        assert_eq!(draft["languages"].as_array().unwrap().len(), 0);
    }
}
