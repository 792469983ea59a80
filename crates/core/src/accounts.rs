/// Username and password as submitted by a signup or login form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    /// Trim the username and require both fields.
    pub fn new(username: &str, password: &str) -> Result<Self, String> {
        let username = username.trim();

        if username.is_empty() {
            return Err("Username is required".to_string());
        }

        if password.is_empty() {
            return Err("Password is required".to_string());
        }

        Ok(Self {
            username: username.to_string(),
            password: password.to_string(),
        })
    }
}
