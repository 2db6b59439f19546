use boutique_core::{AppConfig, LoadOptions};

use super::CommandResult;

pub fn run() -> CommandResult {
    match AppConfig::load(LoadOptions::default()) {
        Ok(config) => CommandResult::payload("config", &config),
        Err(error) => CommandResult::failure("config", "invalid_config", error.to_string()),
    }
}
