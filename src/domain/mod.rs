mod new_account;
mod notification_content;
mod password;
mod required_text;
mod role;
mod ticket_price;
mod user_email;
mod username;

pub use new_account::*;
pub use notification_content::*;
pub use password::*;
pub use required_text::*;
pub use role::*;
pub use ticket_price::*;
pub use user_email::*;
pub use username::*;
