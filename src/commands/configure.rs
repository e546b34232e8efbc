// Configuration operations

use crate::cli::ConfigCommands;
use crate::config::{Config, DATA_DIR_ENV};
use crate::utils;
use crate::utils::error::AppResult;

pub fn handle_config_command(mut config: Config, command: Option<ConfigCommands>) -> AppResult<()> {
    match command {
        Some(ConfigCommands::Show) => handle_show_command(&config),
        Some(ConfigCommands::Open) => handle_open_command(&config),
        Some(ConfigCommands::Reset) => handle_reset_command(&mut config),
        None => handle_config_help(),
    }
}

fn handle_show_command(config: &Config) -> AppResult<()> {
    println!("⚙️  Chalobus Configuration");
    println!("=========================");

    println!("General:");
    println!("  Data dir: {}", config.general.data_dir.display());
    if std::env::var(DATA_DIR_ENV).is_ok() {
        println!("    (overridden by {})", DATA_DIR_ENV);
    }
    println!("  Default filter: {}", config.general.default_filter);
    println!("  Language: {}", config.general.language.locale_tag());
    println!("  Color: {}", config.general.color);
    println!("  Seed sample buses: {}", config.general.seed_sample_buses);
    println!("  Editor: {}", config.general.editor);
    match &config.general.dictation_cmd {
        Some(cmd) => println!("  Dictation command: {}", cmd),
        None => println!("  Dictation command: (voice input disabled)"),
    }

    Ok(())
}

fn handle_config_help() -> AppResult<()> {
    println!("⚙️  Configuration Management");
    println!("==========================");
    println!("Available configuration commands:");
    println!("  chalobus config show    - Show current configuration");
    println!("  chalobus config open    - Open configuration file in editor");
    println!("  chalobus config reset   - Reset configuration to defaults");
    println!();
    println!(
        "Configuration file location: {}",
        Config::config_file_path().display()
    );
    Ok(())
}

fn handle_open_command(config: &Config) -> AppResult<()> {
    Config::ensure_config_exists()?;

    println!("Opening configuration file in editor...");
    let config_path = Config::config_file_path();
    println!("File: {}", config_path.display());

    utils::edit_file_direct(&config_path, Some(&config.general.editor))
}

fn handle_reset_command(config: &mut Config) -> AppResult<()> {
    if utils::prompt_yes_no(
        "Are you sure you want to reset configuration to defaults? This will overwrite your current settings.",
    )? {
        *config = Config::default();
        config.save()?;
        println!("✓ Configuration reset to defaults!");
    } else {
        println!("Reset cancelled.");
    }
    Ok(())
}
