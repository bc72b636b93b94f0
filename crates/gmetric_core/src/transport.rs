//! Transporte UDP: dois datagramas por métrica (metadata, depois valor).
//!
//! UDP não tem confirmação: se só um dos datagramas chegar, o gmond
//! precisa lidar com isso. Nada aqui reenvia.
//!
//! `send` recebe `&mut self`, então o par metadata/valor de um envio não
//! se intercala com outro. Para compartilhar entre threads use
//! `Mutex<Transport>`.

use crate::metric::{Metric, ValidationError};
use crate::protocol::{encode_metadata, encode_value};
use std::io;
use std::net::{Ipv4Addr, SocketAddr, ToSocketAddrs, UdpSocket};
use tracing::{debug, info, warn};

/// Porta padrão do gmond.
pub const DEFAULT_PORT: u16 = 8649;

/// Destino padrão.
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// TTL multicast padrão.
pub const DEFAULT_TTL: u32 = 1;

/// Hostname usado quando o sistema não informa um.
const FALLBACK_HOSTNAME: &str = "localhost";

/// Erros do transporte.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("Porta inválida: {0} (1–65535)")]
    InvalidPort(u32),

    #[error("Falha ao resolver {host}: {source}")]
    HostResolution {
        host: String,
        #[source]
        source: io::Error,
    },

    #[error("spoof heartbeat exige spoof host")]
    InconsistentSpoofState,

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Erro de socket: {0}")]
    Io(#[from] io::Error),
}

/// Busca o hostname local uma única vez.
fn lookup_local_host() -> String {
    match sysinfo::System::host_name() {
        Some(name) if !name.is_empty() => name,
        _ => {
            warn!("Hostname local indisponível, usando {FALLBACK_HOSTNAME:?}");
            FALLBACK_HOSTNAME.to_string()
        }
    }
}

/// Resolve o destino para o primeiro endereço IPv4.
fn resolve(host: &str, port: u16) -> Result<SocketAddr, TransportError> {
    let resolution_error = |source: io::Error| TransportError::HostResolution {
        host: host.to_string(),
        source,
    };
    (host, port)
        .to_socket_addrs()
        .map_err(resolution_error)?
        .find(SocketAddr::is_ipv4)
        .ok_or_else(|| {
            resolution_error(io::Error::new(
                io::ErrorKind::NotFound,
                "nenhum endereço IPv4",
            ))
        })
}

/// Emissor de métricas para um gmond.
#[derive(Debug)]
pub struct Transport {
    destination: SocketAddr,
    multicast_ttl: u32,
    local_host: String,
    socket: Option<UdpSocket>,
}

impl Transport {
    /// Valida a porta e resolve o destino. Não cria o socket.
    pub fn new(host: &str, port: u32, multicast_ttl: u32) -> Result<Self, TransportError> {
        let port = u16::try_from(port)
            .ok()
            .filter(|p| *p != 0)
            .ok_or(TransportError::InvalidPort(port))?;
        let destination = resolve(host, port)?;
        debug!("Destino {host}:{port} resolvido para {destination}");

        Ok(Self {
            destination,
            multicast_ttl,
            local_host: lookup_local_host(),
            socket: None,
        })
    }

    /// `127.0.0.1:8649`, TTL 1.
    pub fn default_destination() -> Result<Self, TransportError> {
        Self::new(DEFAULT_HOST, u32::from(DEFAULT_PORT), DEFAULT_TTL)
    }

    /// Substitui o hostname de origem usado quando a métrica não tem spoof.
    pub fn with_local_host(mut self, local_host: impl Into<String>) -> Self {
        self.local_host = local_host.into();
        self
    }

    pub fn destination(&self) -> SocketAddr {
        self.destination
    }

    pub fn local_host(&self) -> &str {
        &self.local_host
    }

    pub fn is_open(&self) -> bool {
        self.socket.is_some()
    }

    /// Cria o socket. Chamar com o socket já aberto não faz nada.
    pub fn open(&mut self) -> Result<(), TransportError> {
        if self.socket.is_some() {
            return Ok(());
        }

        let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0))?;
        if self.destination.ip().is_multicast() {
            socket.set_multicast_ttl_v4(self.multicast_ttl)?;
            info!(
                "Socket multicast → {} (TTL {})",
                self.destination, self.multicast_ttl
            );
        } else {
            info!("Socket unicast → {}", self.destination);
        }

        self.socket = Some(socket);
        Ok(())
    }

    /// Envia a métrica: metadata primeiro, valor depois.
    ///
    /// Abre o socket se necessário. Falha sem tocar na rede se a métrica
    /// estiver em modo heartbeat sem spoof host.
    pub fn send(&mut self, metric: &Metric) -> Result<(), TransportError> {
        if metric.spoof_heartbeat() && !metric.is_spoofed() {
            return Err(TransportError::InconsistentSpoofState);
        }
        metric.validate()?;

        let metadata = encode_metadata(metric, &self.local_host);
        let value = encode_value(metric, &self.local_host);
        debug!("=== metadata === {:02x?}", &metadata[..]);
        debug!("=== value === {:02x?}", &value[..]);

        if self.socket.is_none() {
            self.open()?;
        }
        let socket = self
            .socket
            .as_ref()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotConnected, "socket fechado"))?;

        let sent = socket.send_to(&metadata, self.destination)?;
        debug!("→ metadata {sent} bytes para {}", self.destination);
        let sent = socket.send_to(&value, self.destination)?;
        debug!("→ valor {sent} bytes para {}", self.destination);

        Ok(())
    }

    /// Libera o socket. Idempotente.
    pub fn close(&mut self) {
        if self.socket.take().is_some() {
            info!("Socket para {} fechado", self.destination);
        }
    }
}

impl Drop for Transport {
    fn drop(&mut self) {
        self.close();
    }
}

// ──────────────────────────────────────────────
// Testes
// ──────────────────────────────────────────────
