//! System status dashboard command.

use anyhow::Result;
use console::style;

use crate::state::AppState;

/// Display data directory, configured models, API key presence, and store
/// counts.
pub async fn status(state: &AppState, json: bool) -> Result<()> {
    let counts = state.db_pool.counts().await?;
    let settings = state.conversation_service.settings();
    let config = &state.config;

    if json {
        let status = serde_json::json!({
            "version": env!("CARGO_PKG_VERSION"),
            "data_dir": state.data_dir.display().to_string(),
            "api_key_configured": state.api_key_configured,
            "models": {
                "chat": settings.model,
                "synthesis": settings.synthesis_model,
                "transcription": settings.transcription_model,
            },
            "server": {
                "host": config.server.host,
                "port": config.server.port,
            },
            "store": {
                "users": counts.users,
                "sessions": counts.sessions,
                "messages": counts.messages,
            },
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    println!();
    println!("  {} Desabafa v{}", style("💬").bold(), env!("CARGO_PKG_VERSION"));
    println!();

    println!("  {}", style("── Store ──").dim());
    println!("  Users:    {}", style(counts.users).bold());
    println!("  Sessions: {}", style(counts.sessions).bold());
    println!("  Messages: {}", style(counts.messages).bold());
    println!();

    println!("  {}", style("── Models ──").dim());
    println!("  Chat:          {}", style(&settings.model).cyan());
    println!("  Synthesis:     {}", style(&settings.synthesis_model).cyan());
    println!("  Transcription: {}", style(&settings.transcription_model).cyan());
    let key = if state.api_key_configured {
        style("configured").green()
    } else {
        style("missing (set OPENAI_API_KEY)").yellow()
    };
    println!("  API key:       {key}");
    println!();

    println!("  {}", style("── System ──").dim());
    println!("  Data dir: {}", style(state.data_dir.display()).dim());
    println!("  Database: {}", style("SQLite (WAL mode)").dim());
    println!(
        "  Listen:   {}",
        style(format!("{}:{}", config.server.host, config.server.port)).dim()
    );
    println!();

    Ok(())
}
