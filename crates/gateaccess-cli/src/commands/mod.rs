pub mod config;
pub mod generate;
pub mod locations;

use gateaccess_core::{Config, NameQuoting, Strategy};

/// Command-line flags take precedence over the config file
pub fn apply_overrides(config: &mut Config, strategy: Option<Strategy>, escape_quotes: bool) {
    if let Some(strategy) = strategy {
        config.strategy = strategy;
    }
    if escape_quotes {
        config.client_name_quoting = NameQuoting::Escaped;
    }
}
