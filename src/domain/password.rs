use secrecy::{ExposeSecret, Secret};

const MIN_LENGTH: usize = 8;
const MAX_LENGTH: usize = 128;

#[derive(Debug)]
pub struct Password(Secret<String>);

impl Password {
    pub fn parse(s: Secret<String>) -> Result<Password, String> {
        let length = s.expose_secret().chars().count();
        if length < MIN_LENGTH {
            Err(format!(
                "Passwords must be at least {} characters long.",
                MIN_LENGTH
            ))
        } else if length > MAX_LENGTH {
            Err(format!(
                "Passwords must be at most {} characters long.",
                MAX_LENGTH
            ))
        } else {
            Ok(Self(s))
        }
    }
}

impl ExposeSecret<String> for Password {
    fn expose_secret(&self) -> &String {
        self.0.expose_secret()
    }
}
