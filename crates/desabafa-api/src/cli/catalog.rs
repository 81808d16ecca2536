//! Persona and voice listings.

use anyhow::Result;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};

use crate::state::AppState;

fn new_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(
        headers
            .iter()
            .map(|h| Cell::new(h).fg(Color::White))
            .collect::<Vec<_>>(),
    );
    table
}

/// List personas as a table or JSON.
pub fn list_personas(state: &AppState, json: bool) -> Result<()> {
    let personas = state.conversation_service.personas();

    if json {
        println!("{}", serde_json::to_string_pretty(&personas)?);
        return Ok(());
    }

    let mut table = new_table(&["Id", "Name", "Description"]);
    for persona in &personas {
        table.add_row(vec![
            Cell::new(&persona.id).fg(Color::Cyan),
            Cell::new(&persona.name),
            Cell::new(&persona.description),
        ]);
    }
    println!("{table}");
    Ok(())
}

/// List synthesis voices as a table or JSON.
pub fn list_voices(state: &AppState, json: bool) -> Result<()> {
    let voices = state.conversation_service.voices();

    if json {
        println!("{}", serde_json::to_string_pretty(&voices)?);
        return Ok(());
    }

    let mut table = new_table(&["Voice", "Description", "Default"]);
    for voice in &voices {
        let default = if voice.is_default {
            Cell::new("●").fg(Color::Green)
        } else {
            Cell::new("")
        };
        table.add_row(vec![
            Cell::new(voice.id.as_str()).fg(Color::Cyan),
            Cell::new(&voice.description),
            default,
        ]);
    }
    println!("{table}");
    Ok(())
}
