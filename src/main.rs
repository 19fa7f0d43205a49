use clap::Parser;
use tracing_subscriber::EnvFilter;

use snipptor_admin::cli::render::Output;
use snipptor_admin::cli::{self, AppContext, Cli, Commands};
use snipptor_admin::errors::AdminError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = match (cli.global.quiet, cli.global.verbose) {
        (true, _) => "warn",
        (false, 0) => "info",
        (false, 1) => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(!cli.global.no_color)
        .with_writer(std::io::stderr)
        .init();

    if cli.global.no_color {
        console::set_colors_enabled(false);
        console::set_colors_enabled_stderr(false);
    }

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        if let Some(detail) = e.problem().and_then(|p| p.summary()) {
            eprintln!("  {}", detail);
        }
        std::process::exit(exit_code(&e));
    }
}

async fn run(cli: Cli) -> Result<(), AdminError> {
    let global = cli.global;
    match cli.command {
        // Config commands must work even when the config does not load
        Commands::Config { action } => {
            let output = Output { json: global.json, quiet: global.quiet };
            cli::settings::handle_config(&global, output, action).await
        }
        Commands::Shell => {
            let ctx = AppContext::from_args(&global).await?;
            cli::shell::run(&ctx, &global).await
        }
        command => {
            let ctx = AppContext::from_args(&global).await?;
            cli::dispatch(&ctx, &global, command).await
        }
    }
}

fn exit_code(error: &AdminError) -> i32 {
    match error {
        AdminError::Config(_) => 2,
        AdminError::Validation(_) | AdminError::ReadOnly(_) => 3,
        AdminError::NotFound { .. } => 4,
        AdminError::Status { status: 404, .. } => 4,
        _ => 1,
    }
}
