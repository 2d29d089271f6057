//! `counsel doctor` — Diagnose configuration and server health.

use counsel_client::OllamaClient;
use counsel_config::AppConfig;
use counsel_core::Backend;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    println!("🩺 Counsel Doctor — System Diagnostics");
    println!("======================================\n");

    let mut issues = 0;

    // Check config
    let config_path = AppConfig::config_dir().join("config.toml");
    let config = if config_path.exists() {
        match AppConfig::load() {
            Ok(config) => {
                println!("  ✅ Config file valid");
                config
            }
            Err(e) => {
                println!("  ❌ Config file invalid: {e}");
                issues += 1;
                AppConfig::default()
            }
        }
    } else {
        println!("  ⚠️  No config file — run `counsel onboard` (using defaults)");
        AppConfig::default()
    };

    if config.default_model.is_some() {
        println!("  ✅ Default model configured");
    } else {
        println!("  ⚠️  No default model — set default_model or pass --model");
        issues += 1;
    }

    // Check the Ollama server
    let client = OllamaClient::new(&config.endpoint, config.timeout_secs);
    match client.health_check().await {
        Ok(true) => {
            println!("  ✅ Ollama reachable at {}", config.endpoint);
            match client.list_models().await {
                Ok(models) if models.is_empty() => {
                    println!("  ⚠️  No models installed — run `ollama pull <model>`");
                    issues += 1;
                }
                Ok(models) => println!("  ✅ {} model(s) installed", models.len()),
                Err(e) => {
                    println!("  ❌ Could not list models: {e}");
                    issues += 1;
                }
            }
        }
        Ok(false) | Err(_) => {
            println!(
                "  ❌ Ollama not reachable at {} — is `ollama serve` running?",
                config.endpoint
            );
            issues += 1;
        }
    }

    // Summary
    println!();
    if issues == 0 {
        println!("  🎉 All checks passed!");
    } else {
        println!("  ⚠️  {issues} issue(s) found. See above for details.");
    }

    Ok(())
}
