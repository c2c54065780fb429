mod fundraiser;
mod notification;
mod school;
mod session;
mod student;
mod ticket;
mod user;

pub use fundraiser::*;
pub use notification::*;
pub use school::*;
pub use session::*;
pub use student::*;
pub use ticket::*;
pub use user::*;
