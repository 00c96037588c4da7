use clap::Parser;
use fx_summary::core::ConfigProvider;
use fx_summary::utils::error::{ErrorSeverity, FxError};
use fx_summary::utils::{logger, validation::Validate};
use fx_summary::{server, AppState, CliConfig, TomlConfig};
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.json_logs {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("🚀 Starting fx-summary service");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    // 載入配置：指定 --config 時以 TOML 檔案為準
    let config: Box<dyn ConfigProvider> = match &cli.config {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path);
            match TomlConfig::from_file(path).and_then(|c| c.validate().map(|_| c)) {
                Ok(config) => Box::new(config),
                Err(e) => exit_with(&e),
            }
        }
        None => {
            if let Err(e) = cli.validate() {
                exit_with(&e);
            }
            Box::new(cli.clone())
        }
    };

    let host: IpAddr = match config.host().parse() {
        Ok(ip) => ip,
        Err(_) => exit_with(&FxError::InvalidConfigValueError {
            field: "server.host".to_string(),
            value: config.host().to_string(),
            reason: "Host must be an IP address".to_string(),
        }),
    };
    let addr = SocketAddr::new(host, config.port());

    let state = match AppState::from_config(config.as_ref()) {
        Ok(state) => Arc::new(state),
        Err(e) => exit_with(&e),
    };
    tracing::info!(
        "FX client initialized for {} (cache TTL {:?}, upstream timeout {:?}, fallback {})",
        state.pair,
        config.cache_ttl(),
        config.upstream_timeout(),
        config.fallback_path()
    );

    server::run_server(state, addr, shutdown_signal()).await?;

    tracing::info!("✅ fx-summary stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

fn exit_with(e: &FxError) -> ! {
    tracing::error!(
        "❌ Startup failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    let exit_code = match e.severity() {
        ErrorSeverity::Critical => 3,
        _ => 1,
    };
    std::process::exit(exit_code);
}
