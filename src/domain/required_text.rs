use unicode_segmentation::UnicodeSegmentation;

/// Free text entered through a form: trimmed, non-empty, bounded, no control characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequiredText(String);

impl RequiredText {
    pub const DEFAULT_MAX_GRAPHEMES: usize = 256;

    pub fn parse(field: &str, s: String) -> Result<RequiredText, String> {
        Self::parse_bounded(field, s, Self::DEFAULT_MAX_GRAPHEMES)
    }

    pub fn parse_bounded(field: &str, s: String, max: usize) -> Result<RequiredText, String> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(format!("{} must not be empty.", field));
        }
        if trimmed.graphemes(true).count() > max {
            return Err(format!("{} must be at most {} characters.", field, max));
        }
        if trimmed.chars().any(|c| c.is_control() && c != '\n') {
            return Err(format!("{} contains control characters.", field));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Parses an optional field, treating blank input as absent.
    pub fn parse_optional(field: &str, s: Option<String>) -> Result<Option<RequiredText>, String> {
        match s {
            Some(value) if !value.trim().is_empty() => Self::parse(field, value).map(Some),
            _ => Ok(None),
        }
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl AsRef<str> for RequiredText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
