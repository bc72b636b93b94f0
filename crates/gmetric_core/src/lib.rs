//! # gmetric core
//!
//! Envio de uma métrica para o Ganglia (gmond) no formato gmetric:
//! um registro de metadata seguido de um registro de valor, ambos em
//! XDR, cada um num datagrama UDP.
//!
//! ## Módulos
//! - [`types`] – Tipo do valor e slope
//! - [`metric`] – Descritor da métrica com validação por campo
//! - [`xdr`] – Empacotador XDR
//! - [`protocol`] – Codificação dos registros de metadata e valor
//! - [`transport`] – Socket UDP (unicast ou multicast)
//! - [`config`] – Configuração via TOML

pub mod config;
pub mod metric;
pub mod protocol;
pub mod transport;
pub mod types;
pub mod xdr;

// Re-exports convenientes
pub use config::AppConfig;
pub use metric::{Metric, ValidationError};
pub use protocol::{encode_metadata, encode_value};
pub use transport::{Transport, TransportError};
pub use types::{Slope, ValueType};
