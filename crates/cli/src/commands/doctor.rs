//! `reelforge doctor` — Diagnose configuration and provider health.

use reelforge_config::StudioConfig;
use reelforge_core::provider::CompletionProvider;
use reelforge_providers::OpenAiCompatProvider;

pub async fn run() -> anyhow::Result<()> {
    println!("🩺 Reelforge Doctor");
    println!("===================\n");

    let mut issues = 0;

    let config_path = StudioConfig::config_dir().join("config.toml");
    let config = if config_path.exists() {
        match StudioConfig::load() {
            Ok(config) => {
                println!("  ✅ Config file valid ({})", config_path.display());
                Some(config)
            }
            Err(e) => {
                println!("  ❌ Config file invalid: {e}");
                issues += 1;
                None
            }
        }
    } else {
        // Env-only setups are fine; load() applies the env overrides.
        println!("  ℹ️  No config file at {}, using defaults", config_path.display());
        StudioConfig::load().ok()
    };

    if let Some(config) = config {
        if config.completion.api_key.is_some() {
            println!("  ✅ Completion API key configured");

            match OpenAiCompatProvider::from_config(&config.completion) {
                Ok(provider) => match provider.health_check().await {
                    Ok(true) => println!("  ✅ Completion endpoint reachable"),
                    Ok(false) => {
                        println!("  ⚠️  Completion endpoint responded with an error");
                        issues += 1;
                    }
                    Err(e) => {
                        println!("  ❌ Completion endpoint unreachable: {e}");
                        issues += 1;
                    }
                },
                Err(e) => {
                    println!("  ❌ Completion provider misconfigured: {e}");
                    issues += 1;
                }
            }
        } else {
            println!("  ⚠️  No completion API key — set REELFORGE_API_KEY or completion.api_key");
            issues += 1;
        }

        if config.generation.api_key.is_some() {
            println!("  ✅ Generation API key configured");
        } else {
            println!("  ⚠️  No generation API key — generation tools will fail");
            issues += 1;
        }

        println!(
            "  ℹ️  Store: {} | Gateway: {}:{}",
            config.store.database, config.gateway.host, config.gateway.port
        );
    }

    println!();
    if issues == 0 {
        println!("  🎉 All checks passed!");
    } else {
        println!("  ⚠️  {issues} issue(s) found. See above for details.");
    }

    Ok(())
}
