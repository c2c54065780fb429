mod authenticated_user;
mod session;

pub use authenticated_user::*;
pub use session::*;
