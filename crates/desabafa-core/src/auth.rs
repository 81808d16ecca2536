//! Credential handling: password hashing port and input normalization.

/// Minimum accepted password length, in characters.
pub const MIN_PASSWORD_LEN: usize = 8;

/// Password hashing port. Implemented with Argon2 in desabafa-infra.
pub trait PasswordHasher: Send + Sync {
    /// Hash a password into a self-describing (PHC) string.
    fn hash(&self, password: &str) -> Result<String, String>;

    /// Check a password against a stored hash. Malformed hashes never verify.
    fn verify(&self, password: &str, hash: &str) -> bool;
}

/// Trim and lowercase an email, then check its basic shape.
pub fn normalize_email(raw: &str) -> Result<String, String> {
    let email = raw.trim().to_lowercase();
    if email.is_empty() {
        return Err("email is required".to_string());
    }
    if email.len() > 254 || email.chars().any(char::is_whitespace) {
        return Err("email is malformed".to_string());
    }
    match email.split_once('@') {
        Some((local, domain))
            if !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.') =>
        {
            Ok(email)
        }
        _ => Err("email is malformed".to_string()),
    }
}

pub fn validate_password(password: &str) -> Result<(), String> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        ));
    }
    Ok(())
}
