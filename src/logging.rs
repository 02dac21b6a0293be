use std::collections::HashMap;
use std::fs::OpenOptions;
use log::{debug, info, LevelFilter};
use serde::{Deserialize, Serialize};
use env_logger::{Builder, Target, WriteStyle};
use std::io::Write;

/// Available logging subsystems in the jukebox
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoggingSubsystem {
    /// Main application logging
    #[serde(rename = "main")]
    Main,
    /// Player backends and the status reconciler
    #[serde(rename = "players")]
    Players,
    /// Retry, clock and formatting helpers
    #[serde(rename = "helpers")]
    Helpers,
    /// Configuration loading and parsing
    #[serde(rename = "config")]
    Config,
    /// Third-party dependencies
    #[serde(rename = "deps")]
    Dependencies,
}

impl LoggingSubsystem {
    /// Get the module prefix for this subsystem
    pub fn module_prefix(&self) -> &'static str {
        match self {
            LoggingSubsystem::Main => "jukebox",
            LoggingSubsystem::Players => "jukebox::players",
            LoggingSubsystem::Helpers => "jukebox::helpers",
            LoggingSubsystem::Config => "jukebox::config",
            LoggingSubsystem::Dependencies => "mpd",
        }
    }

    /// Get all available subsystems
    pub fn all() -> Vec<LoggingSubsystem> {
        vec![
            LoggingSubsystem::Main,
            LoggingSubsystem::Players,
            LoggingSubsystem::Helpers,
            LoggingSubsystem::Config,
            LoggingSubsystem::Dependencies,
        ]
    }

    fn parse(name: &str) -> Option<LoggingSubsystem> {
        match name.to_lowercase().as_str() {
            "main" => Some(LoggingSubsystem::Main),
            "players" => Some(LoggingSubsystem::Players),
            "helpers" => Some(LoggingSubsystem::Helpers),
            "config" => Some(LoggingSubsystem::Config),
            "deps" | "dependencies" => Some(LoggingSubsystem::Dependencies),
            _ => None,
        }
    }
}

/// Logging configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Global log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Target for log output (stdout, stderr, file)
    #[serde(default = "default_target")]
    pub target: String,

    /// Log file path (when target is "file")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,

    /// Whether to include timestamps
    #[serde(default = "default_timestamps")]
    pub timestamps: bool,

    /// Whether to use colored output
    #[serde(default = "default_colors")]
    pub colors: bool,

    /// Subsystem-specific log levels
    #[serde(default)]
    pub subsystems: HashMap<String, String>,

    /// Whether to include module paths in log output
    #[serde(default)]
    pub include_module_path: bool,

    /// Whether to include line numbers in log output
    #[serde(default)]
    pub include_line_numbers: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_target() -> String {
    "stderr".to_string()
}

fn default_timestamps() -> bool {
    true
}

fn default_colors() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: default_log_level(),
            target: default_target(),
            file_path: None,
            timestamps: default_timestamps(),
            colors: default_colors(),
            subsystems: HashMap::new(),
            include_module_path: false,
            include_line_numbers: false,
        }
    }
}

impl LoggingConfig {
    /// Convert string log level to LevelFilter
    fn parse_log_level(level: &str) -> LevelFilter {
        match level.to_lowercase().as_str() {
            "off" => LevelFilter::Off,
            "error" => LevelFilter::Error,
            "warn" => LevelFilter::Warn,
            "info" => LevelFilter::Info,
            "debug" => LevelFilter::Debug,
            "trace" => LevelFilter::Trace,
            _ => {
                eprintln!("Warning: Unknown log level '{}', defaulting to 'info'", level);
                LevelFilter::Info
            }
        }
    }

    /// Build the filter string in `RUST_LOG` syntax
    pub fn build_filter_string(&self) -> String {
        let mut filter_parts = vec![self.level.clone()];

        let mut subsystems: Vec<_> = self.subsystems.iter().collect();
        subsystems.sort();
        for (subsystem_name, level) in subsystems {
            for prefix in Self::module_prefixes(subsystem_name) {
                filter_parts.push(format!("{}={}", prefix, level));
            }
        }

        filter_parts.join(",")
    }

    /// Module prefixes for a subsystem name, unknown names are used as module paths
    fn module_prefixes(name: &str) -> Vec<String> {
        match LoggingSubsystem::parse(name) {
            Some(subsystem) => subsystem.module_prefix()
                .split(',')
                .map(|p| p.trim().to_string())
                .collect(),
            None => vec![name.to_string()],
        }
    }

    /// Initialize the logger with this configuration
    pub fn initialize_logger(&self) -> Result<(), String> {
        let filter_string = self.build_filter_string();

        let mut builder = Builder::new();
        builder.filter(None, Self::parse_log_level(&self.level));

        for (subsystem_name, level) in &self.subsystems {
            let level_filter = Self::parse_log_level(level);
            for prefix in Self::module_prefixes(subsystem_name) {
                builder.filter(Some(prefix.as_str()), level_filter);
            }
        }

        // RUST_LOG wins over the file
        builder.parse_env("RUST_LOG");

        let write_style = if self.colors {
            WriteStyle::Auto
        } else {
            WriteStyle::Never
        };
        builder.write_style(write_style);

        match self.target.to_lowercase().as_str() {
            "stdout" => {
                builder.target(Target::Stdout);
            }
            "stderr" => {
                builder.target(Target::Stderr);
            }
            "file" => {
                let file_path = self.file_path.as_ref()
                    .ok_or_else(|| "File target specified but no file_path provided".to_string())?;
                let file = OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(file_path)
                    .map_err(|e| format!("Failed to open log file {}: {}", file_path, e))?;
                builder.target(Target::Pipe(Box::new(file)));
                builder.write_style(WriteStyle::Never);
            }
            _ => {
                return Err(format!("Unknown logging target: {}", self.target));
            }
        }

        let include_module_path = self.include_module_path;
        let include_line_numbers = self.include_line_numbers;
        let timestamps = self.timestamps;

        builder.format(move |buf, record| {
            let mut output = String::new();

            if timestamps {
                output.push_str(&format!("[{}] ", chrono::Local::now().format("%Y-%m-%d %H:%M:%S")));
            }

            output.push_str(&format!("[{}] ", record.level()));

            if include_module_path {
                if let Some(module) = record.module_path() {
                    output.push_str(&format!("[{}] ", module));
                }
            }

            if include_line_numbers {
                if let (Some(file), Some(line)) = (record.file(), record.line()) {
                    output.push_str(&format!("[{}:{}] ", file, line));
                }
            }

            output.push_str(&format!("{}", record.args()));

            writeln!(buf, "{}", output)
        });

        builder.try_init()
            .map_err(|e| format!("Failed to initialize logger: {}", e))?;

        debug!("Logging initialized with filter: {}", filter_string);
        Ok(())
    }
}

/// Initialize logging from an optional config section and the command line flags
pub fn initialize_logging_with_flags(config: Option<LoggingConfig>, debug_mode: bool, verbose_mode: bool) -> Result<(), String> {
    let mut config = config.unwrap_or_default();

    if debug_mode || verbose_mode {
        config.level = "debug".to_string();
    }

    config.initialize_logger()?;

    if debug_mode {
        info!("Debug mode enabled via command line");
    } else if verbose_mode {
        info!("Verbose mode enabled via command line");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LoggingConfig::default();
        assert_eq!(config.level, "info");
        assert_eq!(config.target, "stderr");
        assert_eq!(config.build_filter_string(), "info");
    }

    #[test]
    fn test_filter_string_expands_subsystems() {
        let mut config = LoggingConfig::default();
        config.subsystems.insert("players".to_string(), "trace".to_string());
        config.subsystems.insert("some::module".to_string(), "warn".to_string());
        assert_eq!(
            config.build_filter_string(),
            "info,jukebox::players=trace,some::module=warn"
        );
    }

    #[test]
    fn test_parse_partial_json() {
        let config: LoggingConfig = serde_json::from_str(r#"{ "level": "debug", "target": "stdout" }"#).unwrap();
        assert_eq!(config.level, "debug");
        assert!(config.timestamps);
        assert!(!config.include_module_path);
    }

    #[test]
    fn test_all_subsystems_have_prefixes() {
        for subsystem in LoggingSubsystem::all() {
            assert!(!subsystem.module_prefix().is_empty());
        }
        assert_eq!(LoggingSubsystem::parse("DEPS"), Some(LoggingSubsystem::Dependencies));
    }

    #[test]
    fn test_file_target_requires_path() {
        let config = LoggingConfig {
            target: "file".to_string(),
            ..Default::default()
        };
        assert!(config.initialize_logger().is_err());
    }
}
