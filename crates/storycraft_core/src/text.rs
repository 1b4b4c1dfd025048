//! Lenient deserializers for generator-produced fields.

use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum TextOrLines {
    Text(String),
    Lines(Vec<String>),
}

/// Accept either a string or a list of sentences, joining the latter with spaces.
pub(crate) fn text_or_lines<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<TextOrLines>::deserialize(deserializer)? {
        Some(TextOrLines::Text(text)) => text,
        Some(TextOrLines::Lines(lines)) => lines
            .iter()
            .map(|line| line.trim())
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join(" "),
        None => String::new(),
    })
}

/// Deserialize a list of names, dropping blanks and duplicates while keeping first-seen order.
pub(crate) fn unique_names<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let names = Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(dedup_names(names))
}

pub(crate) fn dedup_names(names: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut unique: Vec<String> = Vec::new();
    for name in names {
        let name = name.trim().to_string();
        if !name.is_empty() && !unique.contains(&name) {
            unique.push(name);
        }
    }
    unique
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Holder {
        #[serde(default, deserialize_with = "text_or_lines")]
        description: String,
        #[serde(default, deserialize_with = "unique_names")]
        names: Vec<String>,
    }

    #[test]
    fn test_description_lines_are_joined() {
        let holder: Holder =
            serde_json::from_str(r#"{"description": ["A woman in her 30s.", " ", "Grey suit."]}"#)
                .unwrap();
        assert_eq!(holder.description, "A woman in her 30s. Grey suit.");
    }

    #[test]
    fn test_names_deduplicated_in_order() {
        let holder: Holder =
            serde_json::from_str(r#"{"names": ["Eva", "Max", "Eva", ""]}"#).unwrap();
        assert_eq!(holder.names, vec!["Eva", "Max"]);
        assert!(holder.description.is_empty());
    }

    #[test]
    fn test_null_description_is_empty() {
        let holder: Holder = serde_json::from_str(r#"{"description": null}"#).unwrap();
        assert!(holder.description.is_empty());
    }
}
