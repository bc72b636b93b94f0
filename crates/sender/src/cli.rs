//! Argumentos de linha de comando e montagem da métrica.

use clap::Parser;
use gmetric_core::config::{AppConfig, MetricDefaults};
use gmetric_core::{Metric, Slope, ValidationError, ValueType};
use std::path::PathBuf;

/// Envia uma métrica para o Ganglia (gmond) via UDP.
#[derive(Parser, Debug)]
#[command(name = "gmetric")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Envia um heartbeat falso (exige --spoof)
    #[arg(short = 'H', long, requires = "spoof")]
    pub heartbeat: bool,

    /// Nome da métrica
    #[arg(short, long, required_unless_present = "heartbeat")]
    pub name: Option<String>,

    /// Valor da métrica
    #[arg(short, long, required_unless_present = "heartbeat", allow_hyphen_values = true)]
    pub value: Option<String>,

    /// Tipo do valor
    #[arg(
        short = 't',
        long = "type",
        required_unless_present = "heartbeat",
        value_parser = parse_type,
    )]
    pub value_type: Option<ValueType>,

    /// Unidade do valor, ex: Kilobytes, Celsius
    #[arg(short, long)]
    pub units: Option<String>,

    /// zero | positive | negative | both
    #[arg(short, long, value_parser = parse_slope)]
    pub slope: Option<Slope>,

    /// Tempo máximo em segundos entre chamadas
    #[arg(short = 'x', long, allow_negative_numbers = true)]
    pub tmax: Option<i64>,

    /// Tempo de vida da métrica em segundos (0 = infinito)
    #[arg(short, long, allow_negative_numbers = true)]
    pub dmax: Option<i64>,

    /// IP e nome do host/dispositivo falsificado (ip:alias)
    #[arg(short = 'S', long)]
    pub spoof: Option<String>,

    /// Grupos da métrica (separados por vírgula)
    #[arg(short, long, value_delimiter = ',')]
    pub group: Vec<String>,

    /// Cluster da métrica
    #[arg(short = 'C', long)]
    pub cluster: Option<String>,

    /// Descrição da métrica
    #[arg(short = 'D', long)]
    pub desc: Option<String>,

    /// Título da métrica
    #[arg(short = 'T', long)]
    pub title: Option<String>,

    /// Log de debug (buffers codificados)
    #[arg(short = 'X', long)]
    pub debug: bool,

    /// Arquivo de configuração (padrão: gmetric.toml ao lado do executável)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Endereço de destino
    #[arg(value_name = "destination-address")]
    pub destination_address: Option<String>,

    /// Porta de destino
    #[arg(value_name = "destination-port")]
    pub destination_port: Option<u32>,

    /// TTL para endereços multicast
    #[arg(value_name = "multicast-ttl", value_parser = clap::value_parser!(u32).range(1..20))]
    pub multicast_ttl: Option<u32>,
}

fn parse_type(s: &str) -> Result<ValueType, ValidationError> {
    s.parse()
}

/// A linha de comando só aceita os quatro slopes clássicos.
fn parse_slope(s: &str) -> Result<Slope, ValidationError> {
    match s.parse::<Slope>()? {
        slope @ (Slope::Zero | Slope::Positive | Slope::Negative | Slope::Both) => Ok(slope),
        _ => Err(ValidationError::UnknownSlope(s.to_string())),
    }
}

impl Cli {
    pub fn config_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(AppConfig::default_path)
    }

    /// Destino final: argumentos posicionais sobrepõem o arquivo.
    pub fn destination(&self, config: &AppConfig) -> (String, u32, u32) {
        (
            self.destination_address
                .clone()
                .unwrap_or_else(|| config.sender.host.clone()),
            self.destination_port.unwrap_or(config.sender.port),
            self.multicast_ttl.unwrap_or(config.sender.multicast_ttl),
        )
    }

    /// Monta a métrica a partir dos argumentos.
    pub fn build_metric(&self, defaults: &MetricDefaults) -> Result<Metric, ValidationError> {
        let mut metric = Metric::new();

        if self.heartbeat {
            metric.set_heartbeat();
        } else {
            metric.set_name(self.name.clone().unwrap_or_default())?;
            metric.set_type(self.value_type.unwrap_or_default());
            metric.set_value(self.value.clone().unwrap_or_default())?;
            metric.set_units(self.units.clone().unwrap_or_else(|| defaults.units.clone()))?;
            metric.set_slope(self.slope.unwrap_or(defaults.slope));
            metric.set_tmax(self.tmax.unwrap_or(defaults.tmax))?;
            metric.set_dmax(self.dmax.unwrap_or(defaults.dmax))?;
        }

        metric.set_cluster(
            self.cluster
                .clone()
                .or_else(|| Some(defaults.cluster.clone())),
        )?;
        metric.set_description(self.desc.clone())?;
        metric.set_title(self.title.clone())?;
        metric.set_group(Some(self.group.clone()))?;
        metric.set_spoof_host(self.spoof.clone())?;

        Ok(metric)
    }
}
