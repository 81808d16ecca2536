//! Persona listing types.

use serde::{Deserialize, Serialize};

/// Public view of a persona.
///
/// `name` and `description` are derived from the persona key and its
/// instructions; the full instructions are never exposed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonaSummary {
    pub id: String,
    pub name: String,
    pub greeting: String,
    pub description: String,
}
