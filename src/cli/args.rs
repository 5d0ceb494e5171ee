//! CLI argument definitions for `MindMap Explorer`

use clap::{builder::BoolishValueParser, Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use mindmap_explorer::config::ConfigOverrides;
use mindmap_explorer::logger::Level;

/// CLI log level argument
///
/// Represents log levels that can be passed via CLI arguments. Converts to lowercase
/// strings for config storage and to `logger::Level` for runtime use.
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum LogLevelArg {
    /// Error-level logging
    Error,
    /// Warning-level logging
    Warn,
    /// Info-level logging
    Info,
    /// Debug-level logging
    Debug,
}

impl From<LogLevelArg> for Level {
    fn from(arg: LogLevelArg) -> Self {
        match arg {
            LogLevelArg::Error => Self::Error,
            LogLevelArg::Warn => Self::Warn,
            LogLevelArg::Info => Self::Info,
            LogLevelArg::Debug => Self::Debug,
        }
    }
}

impl std::fmt::Display for LogLevelArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let as_str = match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
        };
        write!(f, "{as_str}")
    }
}

#[derive(Debug, Subcommand)]
pub enum ConfigSubcommand {
    /// Display configuration values.
    ///
    /// If a KEY is provided, displays only that configuration value.
    /// If no KEY is provided, displays all configuration values.
    Get {
        /// Optional configuration key to display (e.g., `level`, `model`, `ai.cooldown_ms`)
        #[arg(value_name = "KEY")]
        key: Option<String>,
    },
    /// Set a configuration value.
    Set {
        /// Configuration key to set
        #[arg(value_name = "KEY")]
        key: String,
        /// Value to set
        #[arg(value_name = "VALUE")]
        value: String,
    },
    /// Unset a configuration value.
    Unset {
        /// Configuration key to unset
        #[arg(value_name = "KEY")]
        key: String,
    },
    /// Reset configuration to defaults (requires confirmation).
    Reset,
}

/// Where a command reads its tree from
#[derive(Debug, Clone, Default, Args)]
pub struct TreeSource {
    /// Catalog topic id (defaults to the built-in Spring topic)
    #[arg(long, value_name = "ID", conflicts_with = "tree")]
    pub topic: Option<String>,

    /// Path to a tree JSON file
    #[arg(long, value_name = "FILE")]
    pub tree: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage configuration.
    ///
    /// If no subcommand is provided, displays all configuration values.
    Config {
        #[command(subcommand)]
        subcommand: Option<ConfigSubcommand>,
    },
    /// List the topic catalog.
    Topics,
    /// Lay out a mind map and render one frame.
    ///
    /// With `--events`, replays a JSON array of input events through the
    /// interaction controller first and prints every activated node.
    Render {
        #[command(flatten)]
        source: TreeSource,

        /// Output format: svg, html, or mermaid (mmd)
        #[arg(short, long, value_name = "FORMAT", default_value = "svg")]
        format: String,

        /// Output file path (optional; defaults to config `output_dir`)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Viewport width in pixels
        #[arg(long, value_name = "PX", default_value_t = 1024.0)]
        width: f64,

        /// Viewport height in pixels
        #[arg(long, value_name = "PX", default_value_t = 768.0)]
        height: f64,

        /// JSON file with input events to replay before rendering
        #[arg(long, value_name = "FILE")]
        events: Option<PathBuf>,
    },
    /// Search leaf names of a mind map.
    Search {
        /// Case-insensitive substring to look for
        #[arg(value_name = "QUERY")]
        query: String,

        /// Open one of the matches as if it were clicked and explain it
        #[arg(long, value_name = "NAME")]
        select: Option<String>,

        #[command(flatten)]
        source: TreeSource,
    },
    /// Ask the AI model to explain a node.
    Explain {
        /// Node name, e.g. `@RestController`
        #[arg(value_name = "NAME")]
        name: String,
    },
    /// Generate mind maps from free-text topics with the AI model.
    ///
    /// Requests are spaced by the configured cooldown.
    Generate {
        /// One or more topics to generate
        #[arg(value_name = "QUERY", num_args = 1.., required = true)]
        queries: Vec<String>,

        /// Tree JSON output path (single query only; defaults to config `output_dir`)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Also render each generated map in this format (svg, html, mermaid)
        #[arg(long, value_name = "FORMAT")]
        render: Option<String>,
    },
    /// Print the navigation guide.
    Guide,
}

#[derive(Parser, Debug)]
#[command(
    name = "mindmap",
    about = "Mind map layout, rendering and exploration",
    version = env!("CARGO_PKG_VERSION")
)]
pub struct Cli {
    /// Set the runtime log level (error|warn|info|debug). Falls back to config if omitted.
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevelArg>,

    /// Enable verbose output (runtime only)
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// Enable debug-level logging and runtime debug flag (shorthand)
    #[arg(long = "debug")]
    pub debug_flag: bool,

    /// Write runtime logs to a file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    // --- Config overrides ---
    /// Override config logging level (stored in config file)
    #[arg(long = "config-level", value_enum)]
    pub config_level: Option<LogLevelArg>,

    /// Override config log file path
    #[arg(long = "config-log-file", value_name = "PATH")]
    pub config_log_file: Option<PathBuf>,

    /// Override config verbose flag (true/false)
    #[arg(long = "config-verbose", value_parser = BoolishValueParser::new())]
    pub config_verbose: Option<bool>,

    /// API key for the generative model
    #[arg(long = "api-key", value_name = "KEY", env = "GEMINI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Override the generative model name
    #[arg(long, value_name = "MODEL")]
    pub model: Option<String>,

    /// Override config output directory
    #[arg(long = "out-dir", value_name = "DIR")]
    pub out_dir: Option<PathBuf>,

    /// Subcommand to execute.
    /// A subcommand is required to run the CLI.
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Convert CLI flags into config overrides
    ///
    /// Transforms CLI arguments into a `ConfigOverrides` struct that can be applied to
    /// the loaded configuration.
    ///
    /// # Returns
    /// A `ConfigOverrides` struct with values from CLI flags, where `None` means no override.
    pub fn to_config_overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            level: self.config_level.map(|lvl| lvl.to_string()),
            file: self
                .config_log_file
                .as_ref()
                .map(|p| p.to_string_lossy().to_string()),
            verbose: self.config_verbose,
            api_key: self.api_key.clone(),
            model: self.model.clone(),
            output_dir: self
                .out_dir
                .as_ref()
                .map(|p| p.to_string_lossy().to_string()),
        }
    }
}
