//! Persona registry.
//!
//! An immutable, process-wide catalog of therapist personas built on first
//! use. Lookups of unknown keys resolve to the default persona so a session
//! can always produce a reply.

mod prompts;

use std::collections::BTreeMap;
use std::sync::LazyLock;

use desabafa_types::llm::DecodingParams;
use desabafa_types::persona::PersonaSummary;

/// Persona used when a key is missing or unknown.
pub const DEFAULT_PERSONA: &str = "psicologo";

/// Decoding parameters for every conversational reply.
pub const REPLY_PARAMS: DecodingParams = DecodingParams {
    max_tokens: 200,
    temperature: 0.8,
    presence_penalty: 0.1,
    frequency_penalty: 0.1,
};

/// Leading phrase stripped from the first instruction line to build a
/// description.
const SELF_INTRODUCTION: &str = "Você é ";

/// A therapist persona: fixed instructions plus an opening greeting.
#[derive(Debug, Clone)]
pub struct Persona {
    pub id: &'static str,
    pub instructions: &'static str,
    pub greeting: &'static str,
    pub params: DecodingParams,
}

impl Persona {
    /// Key with separators replaced by spaces, each word title-cased.
    pub fn display_name(&self) -> String {
        self.id
            .split('_')
            .filter(|w| !w.is_empty())
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => {
                        first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                    }
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// First instruction line without the self-introduction phrase.
    pub fn description(&self) -> String {
        let first_line = self.instructions.lines().next().unwrap_or_default().trim();
        first_line
            .strip_prefix(SELF_INTRODUCTION)
            .unwrap_or(first_line)
            .to_string()
    }

    pub fn summary(&self) -> PersonaSummary {
        PersonaSummary {
            id: self.id.to_string(),
            name: self.display_name(),
            greeting: self.greeting.to_string(),
            description: self.description(),
        }
    }
}

/// Keyed, read-only persona catalog.
#[derive(Debug)]
pub struct PersonaRegistry {
    personas: BTreeMap<&'static str, Persona>,
    default: &'static str,
}

static REGISTRY: LazyLock<PersonaRegistry> = LazyLock::new(PersonaRegistry::builtin);

impl PersonaRegistry {
    /// The process-wide registry.
    pub fn global() -> &'static PersonaRegistry {
        &REGISTRY
    }

    fn builtin() -> Self {
        let personas = [
            (prompts::PSICOLOGO_ID, prompts::PSICOLOGO, prompts::PSICOLOGO_GREETING),
            (prompts::COACH_ID, prompts::COACH, prompts::COACH_GREETING),
            (
                prompts::CONSELHEIRO_ID,
                prompts::CONSELHEIRO,
                prompts::CONSELHEIRO_GREETING,
            ),
        ]
        .into_iter()
        .map(|(id, instructions, greeting)| {
            (
                id,
                Persona {
                    id,
                    instructions,
                    greeting,
                    params: REPLY_PARAMS,
                },
            )
        })
        .collect();

        Self {
            personas,
            default: DEFAULT_PERSONA,
        }
    }

    pub fn get(&self, id: &str) -> Option<&Persona> {
        self.personas.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.personas.contains_key(id)
    }

    /// Look up a persona, falling back to the default for unknown keys.
    pub fn resolve(&self, id: &str) -> &Persona {
        self.get(id.trim()).unwrap_or_else(|| self.default_persona())
    }

    pub fn default_persona(&self) -> &Persona {
        // The default key is always one of the builtin entries.
        &self.personas[self.default]
    }

    /// All personas with derived display names and descriptions.
    pub fn list(&self) -> Vec<PersonaSummary> {
        self.personas.values().map(Persona::summary).collect()
    }
}
