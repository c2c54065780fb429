use crate::domain::RequiredText;

const MAX_TITLE: usize = 120;
const MAX_MESSAGE: usize = 2000;

#[derive(Debug)]
pub struct NotificationContent {
    pub title: RequiredText,
    pub message: RequiredText,
}

impl NotificationContent {
    pub fn parse(title: String, message: String) -> Result<NotificationContent, String> {
        Ok(Self {
            title: RequiredText::parse_bounded("Title", title, MAX_TITLE)?,
            message: RequiredText::parse_bounded("Message", message, MAX_MESSAGE)?,
        })
    }
}
