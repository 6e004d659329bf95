use clap::Parser;
use milton_lens_core::{CoreCliArgs, execute_analysis_flow, style};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli_args = CoreCliArgs::parse();

    // RUST_LOG wins; --verbose only raises the default
    let default_level = if cli_args.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = execute_analysis_flow(cli_args) {
        eprintln!(
            "{} {}",
            style("milton-lens failed:").red().bold(),
            style(format!("{e:#}")).red()
        );
        std::process::exit(1);
    }
}
