//! Cryptographic operations for Desabafa.
//!
//! - `password`: Argon2id password hashing in PHC string format

pub mod password;

pub use password::Argon2PasswordHasher;
