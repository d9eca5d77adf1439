//! Config command handler

use crate::args::ConfigSubcommand;
use crate::commands::fail;
use gpa_insight::config::Config;
use std::io::{self, Write};

/// Dispatch config subcommands
pub fn run(subcommand: Option<ConfigSubcommand>, config: &mut Config, defaults: &Config) {
    match subcommand {
        None => handle_config_get(config, None),
        Some(ConfigSubcommand::Get { key }) => handle_config_get(config, key),
        Some(ConfigSubcommand::Set { key, value }) => handle_config_set(config, &key, &value),
        Some(ConfigSubcommand::Unset { key }) => handle_config_unset(config, defaults, &key),
        Some(ConfigSubcommand::Reset) => handle_config_reset(),
    }
}

/// Handle the config get subcommand
pub fn handle_config_get(config: &Config, key: Option<String>) {
    if let Some(k) = key {
        match config.get(&k) {
            Some(value) => println!("{value}"),
            None => {
                eprintln!("Unknown config key: '{k}'");
                eprintln!("Known keys: {}", Config::KEYS.join(", "));
            }
        }
    } else {
        println!("\n=== Configuration ===\n");
        print!("{config}");
        println!("\nConfig file: {}", Config::get_config_file_path().display());
    }
}

/// Handle the config set subcommand
///
/// A new `scale_file` is loaded and validated before it is saved.
pub fn handle_config_set(config: &mut Config, key: &str, value: &str) {
    if let Err(e) = config.set(key, value) {
        fail("Config set failed", &e);
    }

    if matches!(key, "scale_file" | "scale-file") {
        match config.grading_scale() {
            Ok(scale) => println!("✓ Grading scale loaded ({} grades)", scale.len()),
            Err(e) => fail("Config set failed", &format!("Invalid grading scale: {e}")),
        }
    }

    if let Err(e) = config.save() {
        fail("Config save failed", &format!("Failed to save config: {e}"));
    }

    println!("✓ Set {key} = {value}");
}

/// Handle the config unset subcommand
pub fn handle_config_unset(config: &mut Config, defaults: &Config, key: &str) {
    if let Err(e) = config.unset(key, defaults) {
        fail("Config unset failed", &e);
    }

    if let Err(e) = config.save() {
        fail("Config save failed", &format!("Failed to save config: {e}"));
    }

    let value = config.get(key).unwrap_or_default();
    println!("✓ Reset {key} to default ({value:?})");
}

/// Handle the config reset subcommand
pub fn handle_config_reset() {
    if !Config::get_config_file_path().exists() {
        println!("✓ Config is already at defaults");
        return;
    }

    print!("Reset all gpainsight settings to defaults? (y/n): ");
    io::stdout().flush().ok();

    let mut response = String::new();
    io::stdin().read_line(&mut response).ok();
    let response = response.trim();

    if response.eq_ignore_ascii_case("y") || response.eq_ignore_ascii_case("yes") {
        if let Err(e) = Config::reset() {
            fail("Config reset failed", &format!("Failed to remove config file: {e}"));
        }
        println!("✓ Config reset to defaults");
    } else {
        println!("✗ Reset cancelled");
    }
}
