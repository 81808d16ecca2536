//! Session summary prompt.
//!
//! The summary is a single non-conversational completion over the whole
//! transcript with low randomness.

use desabafa_types::chat::{ChatMessage, Sender};
use desabafa_types::llm::{DecodingParams, Message};

pub const SUMMARY_PARAMS: DecodingParams = DecodingParams {
    max_tokens: 300,
    temperature: 0.3,
    presence_penalty: 0.0,
    frequency_penalty: 0.0,
};

const SUMMARY_INSTRUCTIONS: &str = "\
Crie um resumo que inclua:
1. Principais temas abordados
2. Estado emocional do usuário
3. Insights importantes
4. Progresso observado
5. Sugestões para próximas sessões

Mantenha um tom profissional, empático e confidencial.";

/// Render the transcript as `Usuário:` / `Terapeuta:` lines.
pub fn format_transcript(messages: &[ChatMessage]) -> String {
    messages
        .iter()
        .map(|msg| {
            let speaker = match msg.sender {
                Sender::User => "Usuário",
                Sender::Ai => "Terapeuta",
            };
            format!("{speaker}: {}", msg.content)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Build the single user turn asking for a summary of `messages`.
pub fn summary_prompt(messages: &[ChatMessage]) -> Vec<Message> {
    let transcript = format_transcript(messages);
    vec![Message::user(format!(
        "Analise esta sessão de terapia e crie um resumo profissional e empático:\n\n\
         {transcript}\n\n{SUMMARY_INSTRUCTIONS}"
    ))]
}
