//! Bucket URI scheme.

use crate::AssetCategory;

/// Builds and parses asset URIs of the form `{bucket}/{category}/{filename}`.
///
/// Failures are represented by the sentinel `{bucket}/error.{ext}`.
///
/// # Examples
///
/// ```
/// use storycraft_storage::{AssetCategory, AssetNamer};
///
/// let namer = AssetNamer::new("gs://bucket/out/");
/// assert_eq!(namer.uri(AssetCategory::Music, "abc.mp3"), "gs://bucket/out/music/abc.mp3");
/// assert_eq!(namer.error_uri_for(AssetCategory::VideoClips), "gs://bucket/out/error.mp4");
/// assert!(AssetNamer::is_error_uri("gs://bucket/out/error.png"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AssetNamer {
    bucket: String,
}

impl AssetNamer {
    /// Create a namer for a bucket prefix. A trailing slash is ignored.
    pub fn new(bucket: impl Into<String>) -> Self {
        let bucket = bucket.into();
        Self {
            bucket: bucket.trim_end_matches('/').to_string(),
        }
    }

    /// Bucket prefix without trailing slash.
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// URI of a file within a category.
    pub fn uri(&self, category: AssetCategory, filename: &str) -> String {
        format!("{}/{}/{}", self.bucket, category, filename)
    }

    /// Sentinel URI for a failed asset with the given extension.
    pub fn error_uri(&self, extension: &str) -> String {
        format!("{}/error.{}", self.bucket, extension)
    }

    /// Sentinel URI for a failed asset of a category.
    pub fn error_uri_for(&self, category: AssetCategory) -> String {
        self.error_uri(category.extension())
    }

    /// Whether a URI is a failure sentinel.
    pub fn is_error_uri(uri: &str) -> bool {
        uri.rsplit('/')
            .next()
            .is_some_and(|name| matches!(name, "error.png" | "error.mp3" | "error.mp4"))
    }

    /// Split a URI of this bucket into category and file name.
    pub fn parse<'a>(&self, uri: &'a str) -> Option<(AssetCategory, &'a str)> {
        let rest = uri.strip_prefix(self.bucket.as_str())?.strip_prefix('/')?;
        let (category, filename) = rest.split_once('/')?;
        if filename.is_empty() || filename.contains('/') || filename.contains("..") {
            return None;
        }
        Some((category.parse().ok()?, filename))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_round_trips_uri() {
        let namer = AssetNamer::new("gs://bucket");
        let uri = namer.uri(AssetCategory::SceneKeyframes, "ff00.png");
        assert_eq!(
            namer.parse(&uri),
            Some((AssetCategory::SceneKeyframes, "ff00.png"))
        );
    }

    #[test]
    fn test_parse_rejects_foreign_and_malformed() {
        let namer = AssetNamer::new("gs://bucket");
        assert_eq!(namer.parse("gs://other/music/a.mp3"), None);
        assert_eq!(namer.parse("gs://bucket/unknown/a.mp3"), None);
        assert_eq!(namer.parse("gs://bucket/music/../a.mp3"), None);
        assert_eq!(namer.parse("gs://bucket/error.mp4"), None);
    }

    #[test]
    fn test_sentinels() {
        assert!(AssetNamer::is_error_uri("gs://bucket/error.mp3"));
        assert!(!AssetNamer::is_error_uri("gs://bucket/music/error.wav"));
        assert!(!AssetNamer::is_error_uri(""));
    }
}
