//! `counsel models` — List models available on the Ollama server.

use counsel_client::OllamaClient;
use counsel_config::AppConfig;
use counsel_core::Backend;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let client = OllamaClient::new(&config.endpoint, config.timeout_secs);

    let models = client.list_models().await?;
    if models.is_empty() {
        println!("No models installed. Pull one with `ollama pull <model>`.");
        return Ok(());
    }

    println!("Models on {}:", config.endpoint);
    for model in models {
        match config.default_model.as_deref() {
            Some(default) if default == model => println!("  {model} (default)"),
            _ => println!("  {model}"),
        }
    }
    Ok(())
}
