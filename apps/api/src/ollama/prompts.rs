//! Prompt construction for the CV extraction call.

use std::borrow::Cow;

/// Inputs longer than this are truncated to keep generation latency sane.
const MAX_PROMPT_TEXT: usize = 6000;
/// Head of the document: header and experience usually live here.
const HEAD_LEN: usize = 4000;
/// Tail of the document: education and skills usually live here.
const TAIL_LEN: usize = 2000;
const TRUNCATION_MARKER: &str = "\n\n[... text truncated ...]\n\n";

/// Canonical schema example embedded in the prompt so the model mirrors the
/// exact output shape.
const SCHEMA_EXAMPLE: &str = r#"{
  "personal": {
    "full_name": "string",
    "email": "string",
    "phone": "string",
    "address": "string",
    "linkedin": "string",
    "github": "string"
  },
  "profile": {
    "title": "string",
    "summary": "string"
  },
  "skills": {
    "technical": ["string"],
    "soft": ["string"]
  },
  "experience": [
    {
      "company": "string",
      "role": "string",
      "start_date": "string",
      "end_date": "string",
      "description": "string",
      "location": "string"
    }
  ],
  "education": [
    {
      "school": "string",
      "degree": "string",
      "field": "string",
      "start_date": "string",
      "end_date": "string",
      "location": "string"
    }
  ],
  "languages": [
    {
      "name": "string",
      "level": "string"
    }
  ]
}"#;

/// Builds the full extraction prompt around the (possibly truncated) text.
pub fn build_parse_prompt(pdf_text: &str) -> String {
    let text = truncate_for_prompt(pdf_text);

    format!(
        "You are an expert at extracting information from CVs. Analyze the \
         following CV and extract ALL information precisely and completely.\n\n\
         Return ONLY valid JSON with this exact structure:\n\n{SCHEMA_EXAMPLE}\n\n\
         DETAILED INSTRUCTIONS:\n\
         1. PERSONAL:\n\
         - full_name: complete name (first + last)\n\
         - email: full email address if present\n\
         - phone: phone number with country code if present\n\
         - address: full address\n\
         - linkedin: complete LinkedIn URL (starts with https://)\n\
         - github: complete GitHub URL (starts with https://)\n\n\
         2. PROFILE:\n\
         - title: professional title (e.g. \"Full Stack Developer\", \"Data Scientist\")\n\
         - summary: professional summary or career objective (2-3 sentences)\n\n\
         3. SKILLS:\n\
         - technical: every technical skill (languages, frameworks, tools)\n\
         - soft: soft skills (communication, leadership, etc.)\n\n\
         4. EXPERIENCE:\n\
         - Extract EVERY work experience\n\
         - company: full company name\n\
         - role: exact job title\n\
         - start_date: start date (YYYY-MM or YYYY)\n\
         - end_date: end date, or \"Present\" if ongoing (YYYY-MM or YYYY)\n\
         - description: detailed description of responsibilities and achievements\n\
         - location: work location (city, country)\n\n\
         5. EDUCATION:\n\
         - Extract EVERY degree\n\
         - school: full institution name\n\
         - degree: degree obtained (e.g. \"Master\", \"Bachelor\")\n\
         - field: field of study (e.g. \"Computer Science\")\n\
         - start_date / end_date: YYYY-MM or YYYY, or \"Present\" if ongoing\n\
         - location: institution location\n\n\
         6. LANGUAGES:\n\
         - Extract EVERY language with its level (A1, A2, B1, B2, C1, C2, Native)\n\n\
         IMPORTANT RULES:\n\
         - Return ONLY valid JSON, with no text before or after\n\
         - Use null for missing fields (never empty strings)\n\
         - For dates use YYYY-MM when the month is known, otherwise YYYY\n\
         - Extract full descriptions, not just keywords\n\
         - Be precise with company and institution names\n\
         - If a piece of information is unclear, use null rather than guessing\n\n\
         CV:\n{text}\n\n\
         Return only the JSON, with no explanation or extra text:"
    )
}

/// Long documents keep the head (header, experience) and the tail
/// (education, skills) around a truncation marker.
fn truncate_for_prompt(text: &str) -> Cow<'_, str> {
    let total = text.chars().count();
    if total <= MAX_PROMPT_TEXT {
        return Cow::Borrowed(text);
    }

    let head: String = text.chars().take(HEAD_LEN).collect();
    let tail: String = text.chars().skip(total - TAIL_LEN).collect();
    Cow::Owned(format!("{head}{TRUNCATION_MARKER}{tail}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_text_passes_through_untruncated() {
        let text = "short resume text";
        let prompt = build_parse_prompt(text);
        assert!(prompt.contains(text));
        assert!(!prompt.contains(TRUNCATION_MARKER.trim()));
    }

    #[test]
    fn test_long_text_keeps_head_and_tail() {
        let text = format!("HEAD{}TAIL", "x".repeat(7000));
        let truncated = truncate_for_prompt(&text);
        assert!(truncated.starts_with("HEAD"));
        assert!(truncated.ends_with("TAIL"));
        assert!(truncated.contains("[... text truncated ...]"));
        // 4000 head + 2000 tail + marker
        assert!(truncated.chars().count() < 6100);
    }

    #[test]
    fn test_prompt_embeds_schema_example() {
        let prompt = build_parse_prompt("text");
        assert!(prompt.contains("\"technical\": [\"string\"]"));
        assert!(prompt.contains("\"languages\""));
    }
}
