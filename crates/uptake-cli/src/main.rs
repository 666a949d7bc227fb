//! Uptake CLI - acceptance-rate analytics for coupon offer data.

mod cli;
mod commands;
mod output;

use clap::Parser;
use cli::{Cli, Commands};
use commands::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Log to stderr; `RUST_LOG` wins over `--verbose`.
fn init_logging(verbose: bool) {
    let default = if verbose { "uptake=debug" } else { "warn" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = Context::from_cli(&cli).and_then(|ctx| match cli.command {
        Commands::Quality {
            file,
            require,
            warn,
            error,
        } => commands::quality::run(&ctx, file, require, warn, error),

        Commands::Summary { file } => commands::summary::run(&ctx, file),

        Commands::Rates {
            file,
            group_by,
            order,
            sort_rate,
        } => commands::rates::run(&ctx, file, group_by, order, sort_rate),

        Commands::Compare {
            file,
            conditions,
            between,
        } => commands::compare::run(&ctx, file, conditions, between),

        Commands::Buckets {
            file,
            column,
            buckets,
        } => commands::buckets::run(&ctx, file, column, buckets),

        Commands::Time {
            file,
            coupon,
            by_coupon,
        } => commands::time::run(&ctx, file, coupon, by_coupon),

        Commands::Crosstab {
            file,
            rows,
            columns,
            order,
            long,
        } => commands::crosstab::run(&ctx, file, rows, columns, order, long),

        Commands::Encode { file, output } => commands::encode::run(&ctx, file, output),

        Commands::Missing {
            file,
            strategy,
            threshold,
            fill,
            output,
        } => commands::missing::run(&ctx, file, strategy, threshold, fill, output),

        Commands::Profile { file, coupon } => commands::profile::run(&ctx, file, coupon),
    });

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
