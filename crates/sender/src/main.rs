//! # gmetric
//!
//! Envia uma única métrica para o Ganglia (gmond) via UDP.
//!
//! ## Uso
//! ```bash
//! gmetric -n temperature -v 28 -t int8 -u Celsius -x 30 -d 360
//! gmetric -n load -v 0.5 -t float 239.2.11.71 8649 3   # multicast, TTL 3
//! gmetric -H -S 192.168.0.1:myswitch                    # heartbeat falso
//! ```

mod cli;

use clap::Parser;
use cli::Cli;
use gmetric_core::config::{AppConfig, ConfigError};
use gmetric_core::{Transport, TransportError, ValidationError};
use std::process::ExitCode;
use tracing::{error, info};

/// Erros do executável.
#[derive(Debug, thiserror::Error)]
enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Configuração inválida: {}", .0.join("; "))]
    InvalidConfig(Vec<String>),

    #[error("Métrica inválida: {0}")]
    Metric(#[from] ValidationError),

    #[error(transparent)]
    Transport(#[from] TransportError),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // ── Logging ──
    let filter = if cli.debug {
        tracing_subscriber::EnvFilter::new("debug")
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into())
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), AppError> {
    // ── Carregar config ──
    let config = AppConfig::load(&cli.config_path())?;
    let errors = config.validate();
    if !errors.is_empty() {
        return Err(AppError::InvalidConfig(errors));
    }

    let metric = cli.build_metric(&config.defaults)?;

    // ── Socket UDP ──
    let (host, port, ttl) = cli.destination(&config);
    let mut transport = Transport::new(&host, port, ttl)?;
    if !config.sender.local_host.is_empty() {
        transport = transport.with_local_host(config.sender.local_host.clone());
    }

    let result = transport.open().and_then(|()| transport.send(&metric));
    transport.close();
    result?;

    info!(
        "→ {} = {} enviado para {}",
        metric.wire_name(),
        metric.value(),
        transport.destination()
    );
    Ok(())
}
