//! Extraction of tags and a summary from free-text model output
//!
//! The model is asked to answer in the form
//!
//! ```text
//! Tags: tag1, tag2, tag3
//! Summary: A brief summary of the message.
//! ```
//!
//! Parsing is line-oriented and best-effort. A line whose prefix matches
//! `tags:` or `summary:` (ASCII case-insensitive) sets the corresponding
//! field; when several lines match, the last one wins.

/// Tags that express how urgent a message is
pub const URGENCY_TAGS: [&str; 2] = ["urgent", "low_urgency"];

/// Tag appended when the model produced no urgency tag
pub const DEFAULT_URGENCY_TAG: &str = "low_urgency";

const TAGS_PREFIX: &str = "tags:";
const SUMMARY_PREFIX: &str = "summary:";

/// Tags and summary as read from model text, before validation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedCompletion {
    pub tags: Vec<String>,
    pub summary: String,
}

impl ParsedCompletion {
    /// Both fields are non-empty
    pub fn is_complete(&self) -> bool {
        !self.tags.is_empty() && !self.summary.is_empty()
    }
}

/// Parse model output into tags and a summary.
pub fn parse_completion(text: &str) -> ParsedCompletion {
    let mut parsed = ParsedCompletion::default();

    for line in text.trim().lines() {
        if let Some(rest) = strip_prefix_ignore_case(line, TAGS_PREFIX) {
            parsed.tags = rest
                .split(',')
                .map(|tag| tag.replace('\'', "").trim().to_string())
                .filter(|tag| !tag.is_empty())
                .collect();
        } else if let Some(rest) = strip_prefix_ignore_case(line, SUMMARY_PREFIX) {
            parsed.summary = rest.trim().to_string();
        }
    }

    parsed
}

/// Append [`DEFAULT_URGENCY_TAG`] unless some tag already names an urgency.
pub fn apply_urgency_default(tags: &mut Vec<String>) {
    let has_urgency = tags
        .iter()
        .any(|tag| URGENCY_TAGS.iter().any(|u| tag.eq_ignore_ascii_case(u)));
    if !has_urgency {
        tags.push(DEFAULT_URGENCY_TAG.to_string());
    }
}

/// Parse model output and apply the urgency default in one step.
pub fn extract_tags_and_summary(text: &str) -> ParsedCompletion {
    let mut parsed = parse_completion(text);
    apply_urgency_default(&mut parsed.tags);
    parsed
}

fn strip_prefix_ignore_case<'a>(line: &'a str, prefix: &str) -> Option<&'a str> {
    let head = line.get(..prefix.len())?;
    if head.eq_ignore_ascii_case(prefix) {
        Some(&line[prefix.len()..])
    } else {
        None
    }
}
