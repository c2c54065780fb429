use unicode_segmentation::UnicodeSegmentation;

const MIN_GRAPHEMES: usize = 3;
const MAX_GRAPHEMES: usize = 32;

#[derive(Debug, Clone)]
pub struct Username(String);

impl Username {
    /// Usernames are 3 to 32 graphemes with no whitespace or markup characters.
    pub fn parse(s: String) -> Result<Username, String> {
        let length = s.graphemes(true).count();
        let is_too_short = length < MIN_GRAPHEMES;
        let is_too_long = length > MAX_GRAPHEMES;

        let forbidden_characters = ['/', '(', ')', '"', '<', '>', '\\', '{', '}', '@'];
        let contains_forbidden_characters = s
            .chars()
            .any(|g| g.is_whitespace() || g.is_control() || forbidden_characters.contains(&g));

        if is_too_short || is_too_long || contains_forbidden_characters {
            Err(format!("{} is not a valid username.", s))
        } else {
            Ok(Self(s))
        }
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
