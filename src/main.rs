use clap::Parser;
use metalca::cli::{commands, Cli, Commands};
use metalca::types::config::Config;
use metalca::MetalcaResult;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> MetalcaResult<()> {
    let cli = Cli::parse();

    // Load configuration first (no logging yet)
    let config = if cli.config.exists() {
        Config::load(&cli.config).unwrap_or_else(|e| {
            eprintln!("Invalid configuration at {}: {}", cli.config.display(), e);
            Config::default_config()
        })
    } else {
        Config::load_or_default()
    };

    // CLI flags take precedence over config
    let log_level = if cli.quiet {
        "error".to_string()
    } else if cli.verbose {
        "debug".to_string()
    } else {
        config.general.log_level.clone()
    };

    let filter = EnvFilter::from_default_env().add_directive(
        format!("metalca={}", log_level)
            .parse()
            .unwrap_or_else(|_| "metalca=info".parse().expect("fallback directive is valid")),
    );

    // stdout is reserved for command output and the tool server channel
    let json_logs = config.general.log_format.eq_ignore_ascii_case("json");
    let json_layer = json_logs.then(|| fmt::layer().json().with_writer(std::io::stderr));
    let text_layer = (!json_logs).then(|| fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(json_layer)
        .with(text_layer)
        .with(filter)
        .init();

    tracing::debug!("Configuration loaded from: {}", cli.config.display());

    match cli.command {
        Commands::Init { path } => commands::init(path)?,
        Commands::Serve => commands::serve(&config).await?,
        Commands::Score { input } => commands::score(&input, &config)?,
        Commands::Stages { input } => commands::stages(&input, &config)?,
        Commands::Analyze { input } => commands::analyze(&input, &config).await?,
        Commands::Predict { input } => commands::predict(&input, &config).await?,
        Commands::Simulate { input } => commands::simulate(&input, &config)?,
        Commands::Version => commands::version(),
    }

    Ok(())
}
