//! Utilities for extracting JSON from generator responses.
//!
//! Text generators often wrap JSON in markdown code blocks or surround it with
//! explanatory prose. These helpers pull the JSON out before parsing.

use storycraft_error::{GenerationError, StorycraftResult};

/// Extract JSON from a response that may contain markdown or extra text.
///
/// Strategies, in order:
/// 1. Markdown code blocks: ```json ... ``` (or an unlabeled fence)
/// 2. Whichever balanced structure, `{ ... }` or `[ ... ]`, starts first
///
/// # Errors
///
/// Returns an unparseable-content error if no JSON is found.
///
/// # Examples
///
/// ```
/// use storycraft_pipeline::extract_json;
///
/// let response = "Here is your scenario:\n```json\n{\"genre\": \"Ambient\"}\n```\n";
/// assert_eq!(extract_json(response).unwrap(), "{\"genre\": \"Ambient\"}");
/// ```
pub fn extract_json(response: &str) -> StorycraftResult<String> {
    if let Some(json) = extract_from_code_block(response) {
        return Ok(json);
    }

    let bracket_pos = response.find('[');
    let brace_pos = response.find('{');
    let array_first = match (bracket_pos, brace_pos) {
        (Some(b), Some(c)) => b < c,
        (Some(_), None) => true,
        _ => false,
    };

    let (first, second) = if array_first {
        (('[', ']'), ('{', '}'))
    } else {
        (('{', '}'), ('[', ']'))
    };
    if let Some(json) = extract_balanced(response, first.0, first.1)
        .or_else(|| extract_balanced(response, second.0, second.1))
    {
        return Ok(json);
    }

    tracing::error!(
        response_length = response.len(),
        "No JSON found in generator response"
    );
    Err(GenerationError::unparseable(
        "text",
        format!("no JSON found in response (length: {})", response.len()),
    )
    .into())
}

/// Content of the first markdown code fence.
///
/// A fence without a closing marker (a truncated response) yields everything
/// after the opening marker.
fn extract_from_code_block(response: &str) -> Option<String> {
    let start = response.find("```")?;
    let after_marker = start + 3;
    let content_start = response[after_marker..]
        .find('\n')
        .map(|n| after_marker + n + 1)
        .unwrap_or(after_marker);

    let content = match response[content_start..].find("```") {
        Some(end) => &response[content_start..content_start + end],
        None => &response[content_start..],
    };
    let content = content.trim();
    (!content.is_empty()).then(|| content.to_string())
}

/// Content between balanced delimiters, skipping delimiters inside strings.
fn extract_balanced(response: &str, open: char, close: char) -> Option<String> {
    let start = response.find(open)?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escape_next = false;

    for (i, ch) in response[start..].char_indices() {
        if escape_next {
            escape_next = false;
            continue;
        }
        match ch {
            '\\' if in_string => escape_next = true,
            '"' => in_string = !in_string,
            c if c == open && !in_string => depth += 1,
            c if c == close && !in_string => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(response[start..start + i + ch.len_utf8()].to_string());
                }
            }
            _ => {}
        }
    }
    None
}

/// Parse JSON text into `T`.
///
/// # Errors
///
/// Returns an unparseable-content error naming the first 100 characters.
pub fn parse_json<T>(json_str: &str) -> StorycraftResult<T>
where
    T: serde::de::DeserializeOwned,
{
    serde_json::from_str(json_str).map_err(|e| {
        let preview: String = json_str.chars().take(100).collect();
        tracing::error!(error = %e, json_preview = %preview, "JSON parsing failed");
        GenerationError::unparseable("text", format!("{} (JSON: {}...)", e, preview)).into()
    })
}
