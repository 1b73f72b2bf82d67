//! Configuration commands (`folio config show|get|set`)

use owo_colors::OwoColorize;
use serde_json::json;

use super::CommandOutput;
use crate::cli::OutputOptions;
use crate::config::{Config, VALID_KEYS};
use crate::error::Result;

/// Show current configuration
pub fn cmd_config_show(output: OutputOptions) -> Result<()> {
    let config = Config::load()?;

    let mut json_output = serde_json::Map::new();
    let mut text_output = String::new();
    for key in VALID_KEYS {
        let value = config.get(key)?;
        text_output.push_str(&format!("{}: {}\n", key.cyan(), value));
        json_output.insert(key.to_string(), json!(value));
    }

    let roles: Vec<String> = config
        .permission_table()
        .roles()
        .map(|(role, _)| role.to_string())
        .collect();
    text_output.push_str(&format!("{}: {}\n", "roles".cyan(), roles.join(", ")));
    json_output.insert("roles".to_string(), json!(roles));

    let path = Config::config_path()?;
    text_output.push('\n');
    text_output.push_str(
        &format!("Config file: {}", path.display())
            .dimmed()
            .to_string(),
    );
    json_output.insert("config_path".to_string(), json!(path));

    CommandOutput::new(json_output.into())
        .with_text(text_output)
        .print(output)
}

pub fn cmd_config_get(key: &str, output: OutputOptions) -> Result<()> {
    let value = Config::load()?.get(key)?;
    CommandOutput::new(json!({
        "key": key,
        "value": value,
    }))
    .with_text(value)
    .print(output)
}

/// Set a configuration value
pub fn cmd_config_set(key: &str, value: &str, output: OutputOptions) -> Result<()> {
    let mut config = Config::load_file()?;
    config.set(key, value)?;
    config.save()?;

    CommandOutput::new(json!({
        "action": "config_set",
        "key": key,
        "value": value,
        "success": true,
    }))
    .with_text(format!("Set {} to {}", key.cyan(), value))
    .print(output)
}
