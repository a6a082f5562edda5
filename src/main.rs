mod api;
mod cli;
mod commands;
mod config;
mod models;
mod output;
mod platform;
mod query;

use anyhow::Result;
use chrono::Utc;
use clap::Parser;

use api::types::UsersQuery;
use api::GongClient;
use cli::args::{Cli, Commands};
use cli::context::RunContext;
use config::Config;

fn main() -> Result<()> {
    setup_broken_pipe_handling();
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let ctx = RunContext::from_args(cli.json, cli.utc);

    // Inputs are validated before credentials are loaded or anything is sent.
    let output = match &cli.command {
        Commands::Calls { dates } => {
            let filter =
                commands::calls::build_filter(dates, &[], &[], None, Utc::now(), &ctx.tz)?;
            commands::calls::list(&connect(&cli)?, &filter, &ctx)?
        }

        Commands::Search {
            dates,
            users,
            calls,
            filter,
        } => {
            let filter = commands::calls::build_filter(
                dates,
                users,
                calls,
                filter.as_deref(),
                Utc::now(),
                &ctx.tz,
            )?;
            commands::calls::search(&connect(&cli)?, &filter, &ctx)?
        }

        Commands::Call { ids } => {
            commands::call::validate_call_ids(ids)?;
            commands::call::show(&connect(&cli)?, ids, &ctx)?
        }

        Commands::Transcript { ids } => {
            commands::call::validate_call_ids(ids)?;
            commands::transcript::show(&connect(&cli)?, ids, &ctx)?
        }

        Commands::Users {
            cursor,
            include_avatars,
        } => {
            let query = UsersQuery {
                cursor: cursor.clone(),
                include_avatars: include_avatars.then_some(true),
            };
            commands::users::list(&connect(&cli)?, &query, &ctx)?
        }

        Commands::Render {
            kind,
            input,
            parties,
        } => {
            let raw = commands::render::read_payload(input.as_deref())?;
            let parties = parties
                .as_deref()
                .map(|p| commands::render::read_payload(Some(p)))
                .transpose()?;
            commands::render::render(*kind, raw, parties, &ctx)?
        }

        Commands::Validate { filter } => commands::validate::run(filter.as_deref())?,
    };

    println!("{}", output);
    Ok(())
}

/// Load credentials and build the HTTP client.
fn connect(cli: &Cli) -> Result<GongClient> {
    let config = Config::load(cli.base_url.as_deref(), cli.config.as_deref())?;
    Ok(GongClient::new(
        &config.access_key,
        &config.access_key_secret,
        &config.base_url,
    )?)
}

/// Initialize logging based on the `--verbose` flag or `GONGMD_LOG` env var.
///
/// - `GONGMD_LOG` env var: full filter control (e.g. `GONGMD_LOG=gongmd::api=trace`)
/// - `--verbose`: sets `gongmd` crate to `Debug` level
/// - Otherwise: `Warn` level only (effectively silent)
fn init_logging(verbose: bool) {
    let env_var = std::env::var("GONGMD_LOG").ok();

    let mut builder = env_logger::Builder::new();
    builder.format_target(true);
    builder.format_module_path(false);

    if let Some(ref filter) = env_var {
        builder.parse_filters(filter);
    } else if verbose {
        builder.filter_module("gongmd", log::LevelFilter::Debug);
    } else {
        builder.filter_level(log::LevelFilter::Warn);
    }

    builder.init();
}

/// Handle broken pipe gracefully instead of panicking.
///
/// When output is piped to a process that exits early (e.g., `gongmd users | head -1`),
/// Rust's `println!` panics because the runtime sets SIGPIPE to SIG_IGN. This function:
/// - On Unix: resets SIGPIPE to default behavior so the OS terminates the process cleanly
/// - On all platforms: installs a panic hook that exits silently on stdout pipe failures,
///   as a fallback (and the primary handler on Windows where there's no SIGPIPE)
fn setup_broken_pipe_handling() {
    #[cfg(unix)]
    unsafe {
        // SIGPIPE = 13, SIG_DFL = 0 (POSIX constants, stable across all Unix platforms)
        unsafe extern "C" {
            fn signal(sig: i32, handler: usize) -> usize;
        }
        signal(13, 0);
    }

    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let msg = info
            .payload()
            .downcast_ref::<String>()
            .map(|s| s.as_str())
            .or_else(|| info.payload().downcast_ref::<&str>().copied())
            .unwrap_or("");

        if msg.contains("failed printing to stdout") {
            std::process::exit(0);
        }

        default_hook(info);
    }));
}
