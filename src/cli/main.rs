//! Command-line interface entry point for `MindMap Explorer`

mod args;
mod commands;

use args::{Cli, Command};
use clap::Parser;
use mindmap_explorer::config::Config;
use mindmap_explorer::info;
use mindmap_explorer::logger::{enable_debug, enable_verbose, init_file_logging, set_level, Level};

fn main() {
    let args = Cli::parse();

    // Load configuration once at startup and apply CLI overrides to it
    let mut config = Config::load();
    let defaults = Config::from_defaults();
    config.apply_overrides(&args.to_config_overrides());

    // CLI flag overrides config logging.level; fallback warn
    let effective_level = args
        .log_level
        .map(std::convert::Into::into)
        .or_else(|| Level::parse(&config.logging.level))
        .unwrap_or(Level::Warn);

    let mut level = effective_level;
    if args.debug_flag || level == Level::Debug {
        level = Level::Debug;
        enable_debug();
    }

    let verbose = args.verbose || config.logging.verbose;
    if verbose {
        enable_verbose();
    }
    set_level(level);

    // File logging: CLI flag wins, otherwise config logging.file if set
    let config_log_path: Option<std::path::PathBuf> = if config.logging.file.is_empty() {
        None
    } else {
        Some(std::path::PathBuf::from(&config.logging.file))
    };

    if let Some(log_path) = args.log_file.as_ref().or(config_log_path.as_ref()) {
        let display_path = log_path.to_string_lossy();
        if init_file_logging(log_path) {
            if verbose {
                eprintln!("✓ File logging initialized at: {display_path}");
            } else {
                info!("File logging initialized at: {display_path}");
            }
        } else {
            eprintln!("✗ Failed to initialize file logging at: {display_path}");
        }
    }

    let result = match args.command {
        Command::Config { subcommand } => commands::config::run(subcommand, &mut config, &defaults),
        Command::Topics => commands::topics::run(),
        Command::Render {
            source,
            format,
            output,
            width,
            height,
            events,
        } => commands::render::run(
            &commands::render::RenderRequest {
                source: &source,
                format: &format,
                output: output.as_deref(),
                width,
                height,
                events: events.as_deref(),
            },
            &config,
        ),
        Command::Search {
            query,
            select,
            source,
        } => commands::search::run(&query, select.as_deref(), &source, &config),
        Command::Explain { name } => commands::explain::run(&name, &config),
        Command::Generate {
            queries,
            output,
            render,
        } => commands::generate::run(&queries, output.as_deref(), render.as_deref(), &config),
        Command::Guide => {
            commands::guide::run();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{e}");
        std::process::exit(1);
    }
}
