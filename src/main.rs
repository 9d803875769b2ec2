use clap::Parser;
use portscout::cli::Args;
use portscout::config::Settings;
use portscout::output;
use std::io;
use tracing_subscriber::EnvFilter;

/// Log to stderr; `RUST_LOG` wins over the verbosity flag.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "warn,portscout=debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

async fn run(args: Args) -> anyhow::Result<()> {
    let settings = Settings::load(args.config.as_deref())?;
    let mut stdout = io::stdout();
    args.execute(&settings, &mut stdout).await?;
    Ok(())
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);

    if let Err(e) = run(args).await {
        output::print_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}
