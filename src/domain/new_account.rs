use crate::domain::{Password, RequiredText, Role, UserEmail, Username};

/// Role-specific details captured at registration.
#[derive(Debug)]
pub enum AccountProfile {
    School {
        name: RequiredText,
        admin_name: RequiredText,
        address: Option<RequiredText>,
    },
    Student {
        school_id: i32,
    },
}

#[derive(Debug)]
pub struct NewAccount {
    pub email: UserEmail,
    pub username: Username,
    pub password: Password,
    pub profile: AccountProfile,
}

impl NewAccount {
    pub fn role(&self) -> Role {
        match self.profile {
            AccountProfile::School { .. } => Role::School,
            AccountProfile::Student { .. } => Role::Student,
        }
    }
}
