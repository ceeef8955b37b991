//! `popguard config` subcommands.

use std::path::Path;

use anyhow::Result;
use popguard_config::{Config, ShowFormat};

use crate::config_bridge;
use crate::theme::Theme;

/// Print the resolved configuration, followed by the fields that differ from
/// the built-in defaults and where they came from.
pub(crate) fn show_config(explicit: Option<&Path>, format: &str) -> Result<()> {
    let format: ShowFormat = format.parse()?;
    let resolved = Config::load(explicit)?;

    println!("{}", resolved.render(format)?);

    if format == ShowFormat::Toml {
        let overridden = resolved.overridden_fields();
        if !overridden.is_empty() {
            println!("{}", Theme::separator());
            for (field, layer) in overridden {
                println!("# {}", Theme::kv(field, &layer.to_string()));
            }
        }
        for file in &resolved.loaded_files {
            println!("{}", Theme::dimmed(&format!("# loaded {file}")));
        }
    }

    Ok(())
}

/// Load and validate the configuration, including the conversion into an
/// engine policy.
pub(crate) fn validate_config(explicit: Option<&Path>) -> Result<()> {
    match Config::load(explicit) {
        Ok(resolved) => {
            config_bridge::to_policy_config(&resolved.config)?;
            if resolved.loaded_files.is_empty() {
                println!("{}", Theme::success("Configuration valid (defaults only)"));
            } else {
                for file in &resolved.loaded_files {
                    println!("{}", Theme::success(&format!("{file} is valid")));
                }
            }
            Ok(())
        },
        Err(e) => {
            eprintln!("{}", Theme::error(&e.to_string()));
            Err(e.into())
        },
    }
}
