// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration file loading with override support
//!
//! Three tiers, later ones winning:
//! 1. TOML file (base values)
//! 2. Environment variables (runtime overrides)
//! 3. CLI arguments (explicit user overrides)

use crate::validation::validate_config;
use crate::{ConfigError, ConfigResult, GlifConfig};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// File name searched for when no path is given
pub const CONFIG_FILE_NAME: &str = "glif_configuration.toml";

/// Find the GLIF configuration file
///
/// Search order:
/// 1. `GLIF_CONFIG_PATH` environment variable
/// 2. Current working directory
/// 3. Up to five parent directories
///
/// # Errors
///
/// Returns `ConfigError::FileNotFound` if no config file is found in any location
pub fn find_config_file() -> ConfigResult<PathBuf> {
    if let Ok(env_path) = env::var("GLIF_CONFIG_PATH") {
        let path = PathBuf::from(env_path);
        if path.exists() {
            return Ok(path);
        }
        return Err(ConfigError::FileNotFound(format!(
            "Config file specified by GLIF_CONFIG_PATH not found: {}",
            path.display()
        )));
    }

    let mut search_paths = Vec::new();
    if let Ok(cwd) = env::current_dir() {
        for dir in cwd.ancestors().take(6) {
            search_paths.push(dir.join(CONFIG_FILE_NAME));
        }
    }

    if let Some(found) = search_paths.iter().find(|p| p.exists()) {
        return Ok(found.clone());
    }

    let search_list = search_paths
        .iter()
        .map(|p| format!("  - {}", p.display()))
        .collect::<Vec<_>>()
        .join("\n");

    Err(ConfigError::FileNotFound(format!(
        "GLIF configuration file '{}' not found in any of these locations:\n{}\n\nSet GLIF_CONFIG_PATH environment variable to specify custom location.",
        CONFIG_FILE_NAME, search_list
    )))
}

/// Load, override and validate the configuration
///
/// # Arguments
///
/// * `config_path` - Optional path to config file. If `None`, will search for config file.
/// * `cli_args` - Optional CLI argument overrides
///
/// # Errors
///
/// Returns error if the file is missing, contains invalid TOML, an override
/// cannot be parsed, or the result fails validation
pub fn load_config(
    config_path: Option<&Path>,
    cli_args: Option<&HashMap<String, String>>,
) -> ConfigResult<GlifConfig> {
    let config_file = match config_path {
        Some(path) => path.to_path_buf(),
        None => find_config_file()?,
    };

    let content = fs::read_to_string(&config_file)?;
    let mut config: GlifConfig = toml::from_str(&content)?;

    apply_environment_overrides(&mut config)?;
    if let Some(cli) = cli_args {
        apply_cli_overrides(&mut config, cli)?;
    }

    validate_config(&config)?;
    Ok(config)
}

fn parse_number<T: std::str::FromStr>(source: &str, value: &str) -> ConfigResult<T> {
    value
        .trim()
        .parse::<T>()
        .map_err(|_| ConfigError::InvalidValue(format!("{} = '{}' is not a number", source, value)))
}

/// Apply environment variable overrides to configuration
///
/// Supported environment variables:
/// - `GLIF_RESOLUTION_MS` -> `simulation.resolution_ms`
/// - `GLIF_DURATION_MS` -> `simulation.duration_ms`
/// - `GLIF_MODEL` -> `neuron.model`
/// - `GLIF_DYNAMICS_METHOD` -> `neuron.dynamics_method`
/// - `GLIF_LOG_LEVEL` -> `logging.level`
pub fn apply_environment_overrides(config: &mut GlifConfig) -> ConfigResult<()> {
    if let Ok(value) = env::var("GLIF_RESOLUTION_MS") {
        config.simulation.resolution_ms = parse_number("GLIF_RESOLUTION_MS", &value)?;
    }
    if let Ok(value) = env::var("GLIF_DURATION_MS") {
        config.simulation.duration_ms = parse_number("GLIF_DURATION_MS", &value)?;
    }
    if let Ok(value) = env::var("GLIF_MODEL") {
        config.neuron.model = value;
    }
    if let Ok(value) = env::var("GLIF_DYNAMICS_METHOD") {
        config.neuron.dynamics_method = Some(value);
    }
    if let Ok(value) = env::var("GLIF_LOG_LEVEL") {
        config.logging.level = value;
    }
    Ok(())
}

/// Apply CLI argument overrides to configuration
///
/// # Arguments
///
/// * `config` - Configuration to modify
/// * `cli_args` - Map of overrides (e.g., `{"model": "glif_lif_psc", "duration_ms": "500"}`)
pub fn apply_cli_overrides(
    config: &mut GlifConfig,
    cli_args: &HashMap<String, String>,
) -> ConfigResult<()> {
    if let Some(value) = cli_args.get("resolution_ms") {
        config.simulation.resolution_ms = parse_number("resolution_ms", value)?;
    }
    if let Some(value) = cli_args.get("duration_ms") {
        config.simulation.duration_ms = parse_number("duration_ms", value)?;
    }
    if let Some(value) = cli_args.get("model") {
        config.neuron.model = value.clone();
    }
    if let Some(value) = cli_args.get("dynamics_method") {
        config.neuron.dynamics_method = Some(value.clone());
    }
    if let Some(value) = cli_args.get("log_level") {
        config.logging.level = value.clone();
    }
    if let Some(value) = cli_args.get("constant_current") {
        config.stimulus.constant_current = parse_number("constant_current", value)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use std::sync::Mutex;
    use tempfile::tempdir;

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    const OVERRIDE_VARS: [&str; 5] = [
        "GLIF_RESOLUTION_MS",
        "GLIF_DURATION_MS",
        "GLIF_MODEL",
        "GLIF_DYNAMICS_METHOD",
        "GLIF_LOG_LEVEL",
    ];

    /// Clears the override variables and restores them on drop
    struct SavedEnv(Vec<(&'static str, Option<String>)>);

    impl SavedEnv {
        fn clear() -> Self {
            let saved = OVERRIDE_VARS
                .iter()
                .map(|&name| {
                    let value = env::var(name).ok();
                    env::remove_var(name);
                    (name, value)
                })
                .collect();
            Self(saved)
        }
    }

    impl Drop for SavedEnv {
        fn drop(&mut self) {
            for (name, value) in &self.0 {
                match value {
                    Some(v) => env::set_var(name, v),
                    None => env::remove_var(name),
                }
            }
        }
    }

    #[test]
    fn test_find_config_file_env_var() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("custom_config.toml");
        File::create(&config_path).unwrap();

        env::set_var("GLIF_CONFIG_PATH", config_path.to_str().unwrap());
        let result = find_config_file();
        env::remove_var("GLIF_CONFIG_PATH");

        assert_eq!(result.unwrap(), config_path);
    }

    #[test]
    fn test_find_config_file_env_var_missing() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("absent.toml");

        env::set_var("GLIF_CONFIG_PATH", config_path.to_str().unwrap());
        let result = find_config_file();
        env::remove_var("GLIF_CONFIG_PATH");

        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_load_minimal_config() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        let _saved = SavedEnv::clear();
        let dir = tempdir().unwrap();
        let config_path = dir.path().join(CONFIG_FILE_NAME);

        let mut file = File::create(&config_path).unwrap();
        writeln!(file, "[simulation]").unwrap();
        writeln!(file, "resolution_ms = 0.05").unwrap();
        writeln!(file, "[neuron]").unwrap();
        writeln!(file, "model = \"glif_lif_psc\"").unwrap();
        writeln!(file, "threshold = -50.0").unwrap();

        let config = load_config(Some(&config_path), None).unwrap();

        assert_eq!(config.simulation.resolution_ms, 0.05);
        assert_eq!(config.neuron.model, "glif_lif_psc");
        assert_eq!(config.neuron.threshold, Some(-50.0));
        assert_eq!(config.simulation.min_delay_steps, 10);
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        let _saved = SavedEnv::clear();
        let dir = tempdir().unwrap();
        let config_path = dir.path().join(CONFIG_FILE_NAME);

        fs::write(&config_path, "[neuron]\nmodel = \"izhikevich\"\n").unwrap();
        assert!(matches!(
            load_config(Some(&config_path), None),
            Err(ConfigError::ValidationError(_))
        ));

        fs::write(&config_path, "[neuron\n").unwrap();
        assert!(matches!(
            load_config(Some(&config_path), None),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_environment_overrides() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        let _saved = SavedEnv::clear();
        let mut config = GlifConfig::default();

        env::set_var("GLIF_MODEL", "glif_lif_psc");
        env::set_var("GLIF_DURATION_MS", "250");
        apply_environment_overrides(&mut config).unwrap();

        assert_eq!(config.neuron.model, "glif_lif_psc");
        assert_eq!(config.simulation.duration_ms, 250.0);

        env::set_var("GLIF_RESOLUTION_MS", "fast");
        assert!(matches!(
            apply_environment_overrides(&mut config),
            Err(ConfigError::InvalidValue(_))
        ));
    }

    #[test]
    fn test_cli_overrides() {
        let mut config = GlifConfig::default();
        let mut cli_args = HashMap::new();
        cli_args.insert("dynamics_method".to_string(), "linear_exact".to_string());
        cli_args.insert("constant_current".to_string(), "1500".to_string());

        apply_cli_overrides(&mut config, &cli_args).unwrap();

        assert_eq!(config.neuron.dynamics_method.as_deref(), Some("linear_exact"));
        assert_eq!(config.stimulus.constant_current, 1500.0);
    }

    #[test]
    fn test_override_precedence() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        let _saved = SavedEnv::clear();
        let dir = tempdir().unwrap();
        let config_path = dir.path().join(CONFIG_FILE_NAME);

        let mut file = File::create(&config_path).unwrap();
        writeln!(file, "[simulation]").unwrap();
        writeln!(file, "duration_ms = 10.0").unwrap();
        writeln!(file, "[logging]").unwrap();
        writeln!(file, "level = \"warn\"").unwrap();

        env::set_var("GLIF_DURATION_MS", "20");
        env::set_var("GLIF_LOG_LEVEL", "debug");

        let mut cli_args = HashMap::new();
        cli_args.insert("duration_ms".to_string(), "30".to_string());

        let config = load_config(Some(&config_path), Some(&cli_args)).unwrap();

        // CLI wins for duration, env wins for log level (no CLI override)
        assert_eq!(config.simulation.duration_ms, 30.0);
        assert_eq!(config.logging.level, "debug");
    }
}
