use clap::Parser;
use quakemap::config::toml_config::TomlConfig;
use quakemap::domain::ports::ConfigProvider;
use quakemap::utils::{logger, validation::Validate};
use quakemap::{generate_legend, LocalStorage, MapEngine, MapPipeline};

#[derive(Parser)]
#[command(name = "toml-map")]
#[command(about = "Builds an earthquake map document from a TOML configuration")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "quakemap.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    log_json: bool,

    /// Override monitoring setting from config
    #[arg(long)]
    monitor: Option<bool>,

    /// Show the configuration and legend without fetching anything
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // RUST_LOG still wins over the configured level
    let log_level = peek_log_level(&args.config);
    if args.log_json {
        logger::init_json_logger(args.verbose, log_level.as_deref());
    } else {
        logger::init_cli_logger(args.verbose, log_level.as_deref());
    }

    tracing::info!("🚀 Starting TOML-based map builder");
    tracing::info!("📁 Loading configuration from: {}", args.config);

    // 載入 TOML 配置
    let config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    tracing::info!("✅ Configuration loaded and validated successfully");
    display_config_summary(&config);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No actual processing will occur");
        perform_dry_run()?;
        return Ok(());
    }

    let monitor_enabled = args.monitor.unwrap_or_else(|| config.monitoring_enabled());
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    let storage = LocalStorage::new(config.output_path().to_string());
    let pipeline = MapPipeline::new(storage, config);
    let engine = MapEngine::new_with_monitoring(pipeline, monitor_enabled);

    match engine.run().await {
        Ok(output_path) => {
            tracing::info!("✅ Map build completed successfully!");
            println!("✅ Map build completed successfully!");
            println!("📁 Output saved to: {}", output_path);
        }
        Err(e) => {
            tracing::error!(
                "❌ Map build failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

            let exit_code = e.severity().exit_code();
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}

/// The subscriber is installed before the config is validated, so read the
/// log level on its own first.
fn peek_log_level(path: &str) -> Option<String> {
    TomlConfig::from_file(path)
        .ok()?
        .log_level()
        .map(str::to_string)
}

fn display_config_summary(config: &TomlConfig) {
    let view = config.map_view();
    tracing::info!("📋 Configuration Summary:");
    tracing::info!("  Map: {}", config.map.name);
    if let Some(description) = &config.map.description {
        tracing::info!("  Description: {}", description);
    }
    tracing::info!("  Earthquakes: {}", config.quake_endpoint());
    match config.plates_source() {
        Some(plates) => tracing::info!("  Tectonic plates: {}", plates),
        None => tracing::info!("  Tectonic plates: (none, basic map)"),
    }
    tracing::info!(
        "  View: center [{}, {}], zoom {}",
        view.center.latitude(),
        view.center.longitude(),
        view.zoom
    );
    tracing::info!("  Output path: {}", config.output_path());
    tracing::info!("  Output formats: {:?}", config.output_formats());
    if let Some(archive) = config.compression_filename() {
        tracing::info!("  Compressed into: {}", archive);
    }
    tracing::info!("  Invalid features: {:?}", config.invalid_feature_policy());
}

fn perform_dry_run() -> anyhow::Result<()> {
    println!("Depth legend:");
    for entry in generate_legend()? {
        println!("  {:>8}  {}", entry.label, entry.color);
    }
    println!("🔍 Dry run completed - no data was fetched");
    Ok(())
}
