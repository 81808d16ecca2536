//! Conversation window builder.
//!
//! Turns a persona, the recent persisted history, and the incoming user text
//! into the ordered role-tagged turns sent to the generation backend.

use desabafa_types::chat::{ChatMessage, Sender};
use desabafa_types::llm::Message;

use crate::persona::Persona;

/// Most recent persisted messages included in a reply window.
pub const WINDOW_SIZE: usize = 10;

/// Build the turns for one reply.
///
/// Order: persona instructions, the persona greeting (only when the session
/// has no history yet), the last [`WINDOW_SIZE`] messages oldest first, then
/// `incoming` as the final user turn. `history` must be ordered oldest first;
/// anything older than the window is dropped here.
pub fn build_window(persona: &Persona, history: &[ChatMessage], incoming: &str) -> Vec<Message> {
    let start = history.len().saturating_sub(WINDOW_SIZE);
    let recent = &history[start..];

    let mut turns = Vec::with_capacity(recent.len() + 3);
    turns.push(Message::system(persona.instructions));

    if history.is_empty() {
        // Not persisted; only establishes the persona's voice.
        turns.push(Message::assistant(persona.greeting));
    }

    turns.extend(recent.iter().map(|msg| match msg.sender {
        Sender::User => Message::user(msg.content.clone()),
        Sender::Ai => Message::assistant(msg.content.clone()),
    }));

    turns.push(Message::user(incoming));
    turns
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use desabafa_types::chat::MessageKind;
    use desabafa_types::llm::MessageRole;
    use uuid::Uuid;

    use crate::persona::PersonaRegistry;

    fn history(n: usize) -> Vec<ChatMessage> {
        let session_id = Uuid::now_v7();
        let base = Utc::now();
        (0..n)
            .map(|i| ChatMessage {
                id: Uuid::now_v7(),
                session_id,
                sender: if i % 2 == 0 { Sender::User } else { Sender::Ai },
                content: format!("msg {i}"),
                kind: MessageKind::Text,
                audio_url: None,
                voice: None,
                tokens_used: 0,
                created_at: base + Duration::milliseconds(i as i64),
            })
            .collect()
    }

    #[test]
    fn test_cold_start_injects_greeting() {
        let persona = PersonaRegistry::global().resolve("coach");
        let turns = build_window(persona, &[], "oi");

        assert_eq!(turns.len(), 3);
        assert_eq!(turns[0].role, MessageRole::System);
        assert_eq!(turns[0].content, persona.instructions);
        assert_eq!(turns[1].role, MessageRole::Assistant);
        assert_eq!(turns[1].content, persona.greeting);
        assert_eq!(turns[2], Message::user("oi"));
    }

    #[test]
    fn test_window_keeps_last_ten_in_order() {
        let persona = PersonaRegistry::global().resolve("psicologo");
        let turns = build_window(persona, &history(15), "nova mensagem");

        // system + 10 history + incoming, no greeting
        assert_eq!(turns.len(), 12);
        assert_eq!(turns[0].role, MessageRole::System);
        assert!(!turns.iter().any(|t| t.content == persona.greeting));

        let contents: Vec<&str> = turns[1..11].iter().map(|t| t.content.as_str()).collect();
        let expected: Vec<String> = (5..15).map(|i| format!("msg {i}")).collect();
        assert_eq!(contents, expected);

        assert_eq!(turns[11], Message::user("nova mensagem"));
    }

    #[test]
    fn test_sender_maps_to_role() {
        let persona = PersonaRegistry::global().default_persona();
        let turns = build_window(persona, &history(2), "x");
        assert_eq!(turns[1].role, MessageRole::User);
        assert_eq!(turns[2].role, MessageRole::Assistant);
    }

    #[test]
    fn test_short_history_is_kept_whole() {
        let persona = PersonaRegistry::global().default_persona();
        let turns = build_window(persona, &history(3), "x");
        assert_eq!(turns.len(), 5);
    }

    #[test]
    fn test_unknown_persona_still_builds_window() {
        let persona = PersonaRegistry::global().resolve("nao_existe");
        let turns = build_window(persona, &[], "olá");
        assert_eq!(turns[0].content, PersonaRegistry::global().default_persona().instructions);
        assert_eq!(turns.len(), 3);
    }
}
