//! Configuração via TOML.
//!
//! Tudo é opcional: um arquivo parcial (ou ausente) cai nos padrões.

use crate::transport::{DEFAULT_HOST, DEFAULT_PORT, DEFAULT_TTL};
use crate::types::Slope;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

/// Erros ao ler ou gravar o arquivo.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Erro ao ler {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Erro ao parsear {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Erro ao gravar {path}: {reason}")]
    Write { path: PathBuf, reason: String },
}

/// Destino dos datagramas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SenderConfig {
    /// Host ou IP do gmond (unicast ou grupo multicast)
    pub host: String,
    /// Porta UDP
    pub port: u32,
    /// TTL para destinos multicast
    pub multicast_ttl: u32,
    /// Hostname de origem (vazio = hostname do sistema)
    pub local_host: String,
}

impl Default for SenderConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.into(),
            port: u32::from(DEFAULT_PORT),
            multicast_ttl: DEFAULT_TTL,
            local_host: String::new(),
        }
    }
}

/// Valores usados quando a linha de comando não informa.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricDefaults {
    pub units: String,
    pub slope: Slope,
    pub tmax: i64,
    pub dmax: i64,
    pub cluster: String,
}

impl Default for MetricDefaults {
    fn default() -> Self {
        Self {
            units: String::new(),
            slope: Slope::Both,
            tmax: 60,
            dmax: 0,
            cluster: String::new(),
        }
    }
}

/// Configuração raiz.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub sender: SenderConfig,
    pub defaults: MetricDefaults,
}

impl AppConfig {
    /// Carrega de um arquivo TOML; arquivo ausente devolve o padrão.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            info!("Usando configuração padrão");
            return Ok(AppConfig::default());
        }

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = toml::from_str::<AppConfig>(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        info!("Configuração carregada de {}", path.display());
        Ok(config)
    }

    /// Salva em arquivo TOML.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let write_error = |reason: String| ConfigError::Write {
            path: path.to_path_buf(),
            reason,
        };
        let content = toml::to_string_pretty(self).map_err(|e| write_error(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| write_error(e.to_string()))?;
        info!("Configuração salva em {}", path.display());
        Ok(())
    }

    /// `gmetric.toml` ao lado do executável.
    pub fn default_path() -> PathBuf {
        let exe_dir = std::env::current_exe()
            .map(|p| p.parent().unwrap_or(Path::new(".")).to_path_buf())
            .unwrap_or_else(|_| PathBuf::from("."));
        exe_dir.join("gmetric.toml")
    }

    /// Valida a configuração e retorna lista de erros.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.sender.host.is_empty() {
            errors.push("Host de destino não pode ser vazio".into());
        }
        if !(1..=65535).contains(&self.sender.port) {
            errors.push(format!("Porta inválida: {} (1–65535)", self.sender.port));
        }
        if !(1..=255).contains(&self.sender.multicast_ttl) {
            errors.push(format!(
                "TTL multicast inválido: {} (1–255)",
                self.sender.multicast_ttl
            ));
        }
        if self.sender.local_host.contains('"') {
            errors.push("Hostname local não pode conter aspas".into());
        }
        for (field, value) in [("tmax", self.defaults.tmax), ("dmax", self.defaults.dmax)] {
            if value < 0 || value > i64::from(u32::MAX) {
                errors.push(format!("{field} fora do intervalo: {value}"));
            }
        }
        for (field, value) in [("units", &self.defaults.units), ("cluster", &self.defaults.cluster)] {
            if value.contains('"') {
                errors.push(format!("{field} não pode conter aspas"));
            }
        }

        errors
    }
}
