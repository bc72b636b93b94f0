//! Descritor de métrica (uma amostra) com validação por campo.
//!
//! Cada setter valida o valor antes de gravar: se a validação falha o
//! campo mantém o valor anterior e o erro volta para quem chamou.
//!
//! O tipo não carrega lock. Se o mesmo descritor for compartilhado entre
//! threads, quem chama deve envolvê-lo num `Mutex`.

use crate::types::{Slope, ValueType};

/// Nome fixo da métrica de heartbeat.
pub const HEARTBEAT_NAME: &str = "heartbeat";

/// Erros de validação de campo.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Campo `{field}` não pode conter aspas duplas")]
    ContainsQuote { field: &'static str },

    #[error("Campo `{field}` não pode ser negativo: {value}")]
    NegativeInterval { field: &'static str, value: i64 },

    #[error("Campo `{field}` excede o limite de 32 bits: {value}")]
    IntervalOverflow { field: &'static str, value: i64 },

    #[error("Spoof host inválido: {0:?} (formato esperado ip:alias)")]
    MalformedSpoofHost(String),

    #[error("Tipo não suportado: {0}")]
    UnknownType(String),

    #[error("Slope não suportado: {0}")]
    UnknownSlope(String),
}

fn check_quote(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.contains('"') {
        return Err(ValidationError::ContainsQuote { field });
    }
    Ok(())
}

fn check_interval(field: &'static str, value: i64) -> Result<u32, ValidationError> {
    if value < 0 {
        return Err(ValidationError::NegativeInterval { field, value });
    }
    u32::try_from(value).map_err(|_| ValidationError::IntervalOverflow { field, value })
}

fn check_spoof_host(value: &str) -> Result<(), ValidationError> {
    check_quote("spoof_host", value)?;
    match value.split_once(':') {
        Some((ip, alias)) if !ip.is_empty() && !alias.is_empty() => Ok(()),
        _ => Err(ValidationError::MalformedSpoofHost(value.to_string())),
    }
}

/// String vazia em campo opcional equivale a "não definido".
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Uma amostra de métrica pronta para ser codificada.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Metric {
    name: String,
    value: String,
    value_type: ValueType,
    units: String,
    slope: Slope,
    tmax: u32,
    dmax: u32,
    cluster: Option<String>,
    description: Option<String>,
    title: Option<String>,
    group: Option<Vec<String>>,
    spoof_host: Option<String>,
    spoof_heartbeat: bool,
}

impl Default for Metric {
    fn default() -> Self {
        Self {
            name: String::new(),
            value: String::new(),
            value_type: ValueType::String,
            units: String::new(),
            slope: Slope::Both,
            tmax: 60,
            dmax: 0,
            cluster: None,
            description: None,
            title: None,
            group: None,
            spoof_host: None,
            spoof_heartbeat: false,
        }
    }
}

impl Metric {
    pub fn new() -> Self {
        Self::default()
    }

    // ──────────────────────────────────────────
    // Campos de valor
    // ──────────────────────────────────────────

    pub fn set_name(&mut self, name: impl Into<String>) -> Result<(), ValidationError> {
        let name = name.into();
        check_quote("name", &name)?;
        self.name = name;
        Ok(())
    }

    /// Valor já formatado pelo chamador; sempre viaja como string.
    pub fn set_value(&mut self, value: impl Into<String>) -> Result<(), ValidationError> {
        let value = value.into();
        check_quote("value", &value)?;
        self.value = value;
        Ok(())
    }

    pub fn set_units(&mut self, units: impl Into<String>) -> Result<(), ValidationError> {
        let units = units.into();
        check_quote("units", &units)?;
        self.units = units;
        Ok(())
    }

    pub fn set_type(&mut self, value_type: ValueType) {
        self.value_type = value_type;
    }

    pub fn set_slope(&mut self, slope: Slope) {
        self.slope = slope;
    }

    /// Segundos máximos entre atualizações.
    pub fn set_tmax(&mut self, tmax: i64) -> Result<(), ValidationError> {
        self.tmax = check_interval("tmax", tmax)?;
        Ok(())
    }

    /// Tempo de vida em segundos (0 = nunca expira).
    pub fn set_dmax(&mut self, dmax: i64) -> Result<(), ValidationError> {
        self.dmax = check_interval("dmax", dmax)?;
        Ok(())
    }

    // ──────────────────────────────────────────
    // Metadata opcional
    // ──────────────────────────────────────────

    pub fn set_cluster(&mut self, cluster: Option<String>) -> Result<(), ValidationError> {
        if let Some(c) = &cluster {
            check_quote("cluster", c)?;
        }
        self.cluster = non_empty(cluster);
        Ok(())
    }

    pub fn set_description(&mut self, description: Option<String>) -> Result<(), ValidationError> {
        if let Some(d) = &description {
            check_quote("description", d)?;
        }
        self.description = non_empty(description);
        Ok(())
    }

    pub fn set_title(&mut self, title: Option<String>) -> Result<(), ValidationError> {
        if let Some(t) = &title {
            check_quote("title", t)?;
        }
        self.title = non_empty(title);
        Ok(())
    }

    /// Grupos na ordem do chamador; cada um vira um par `GROUP` no fio.
    pub fn set_group(&mut self, group: Option<Vec<String>>) -> Result<(), ValidationError> {
        if let Some(items) = &group {
            for item in items {
                check_quote("group", item)?;
            }
        }
        self.group = group.filter(|g| !g.is_empty());
        Ok(())
    }

    /// `"<ip>:<alias>"`, ambas as partes não vazias.
    pub fn set_spoof_host(&mut self, spoof_host: Option<String>) -> Result<(), ValidationError> {
        let spoof_host = non_empty(spoof_host);
        if let Some(host) = &spoof_host {
            check_spoof_host(host)?;
        }
        self.spoof_host = spoof_host;
        Ok(())
    }

    /// Só é conferido contra `spoof_host` na hora do envio.
    pub fn set_spoof_heartbeat(&mut self, spoof_heartbeat: bool) {
        self.spoof_heartbeat = spoof_heartbeat;
    }

    /// Transforma o descritor num heartbeat (sobrescreve os campos de valor).
    pub fn set_heartbeat(&mut self) {
        self.name = HEARTBEAT_NAME.to_string();
        self.value_type = ValueType::Uint32;
        self.value = "0".to_string();
        self.units = String::new();
        self.slope = Slope::Zero;
        self.tmax = 0;
        self.dmax = 0;
        self.spoof_heartbeat = true;
    }

    /// Revalida todos os campos.
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_quote("name", &self.name)?;
        check_quote("value", &self.value)?;
        check_quote("units", &self.units)?;
        for (field, v) in [
            ("cluster", &self.cluster),
            ("description", &self.description),
            ("title", &self.title),
        ] {
            if let Some(v) = v {
                check_quote(field, v)?;
            }
        }
        for item in self.group.iter().flatten() {
            check_quote("group", item)?;
        }
        if let Some(host) = &self.spoof_host {
            check_spoof_host(host)?;
        }
        Ok(())
    }

    // ──────────────────────────────────────────
    // Leitura
    // ──────────────────────────────────────────

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn value_type(&self) -> ValueType {
        self.value_type
    }

    pub fn units(&self) -> &str {
        &self.units
    }

    pub fn slope(&self) -> Slope {
        self.slope
    }

    pub fn tmax(&self) -> u32 {
        self.tmax
    }

    pub fn dmax(&self) -> u32 {
        self.dmax
    }

    pub fn cluster(&self) -> Option<&str> {
        self.cluster.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn group(&self) -> Option<&[String]> {
        self.group.as_deref()
    }

    pub fn spoof_host(&self) -> Option<&str> {
        self.spoof_host.as_deref()
    }

    pub fn spoof_heartbeat(&self) -> bool {
        self.spoof_heartbeat
    }

    /// Nome que vai para o fio: `"heartbeat"` em modo heartbeat.
    pub fn wire_name(&self) -> &str {
        if self.spoof_heartbeat {
            HEARTBEAT_NAME
        } else {
            &self.name
        }
    }

    pub fn is_spoofed(&self) -> bool {
        self.spoof_host.is_some()
    }

    /// Host de origem: o spoof host se definido, senão o hostname local.
    pub fn origin_host<'a>(&'a self, local_host: &'a str) -> &'a str {
        self.spoof_host.as_deref().unwrap_or(local_host)
    }
}

// ──────────────────────────────────────────────
// Testes
// ──────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let m = Metric::new();
        assert_eq!(m.name(), "");
        assert_eq!(m.value_type(), ValueType::String);
        assert_eq!(m.slope(), Slope::Both);
        assert_eq!(m.tmax(), 60);
        assert_eq!(m.dmax(), 0);
        assert!(m.cluster().is_none());
        assert!(m.group().is_none());
        assert!(!m.spoof_heartbeat());
        assert!(!m.is_spoofed());
    }

    #[test]
    fn quote_rejected_and_old_value_kept() {
        let mut m = Metric::new();
        m.set_name("temperature").unwrap();
        m.set_units("Celsius").unwrap();

        assert_eq!(
            m.set_name("temp\"x"),
            Err(ValidationError::ContainsQuote { field: "name" })
        );
        assert!(m.set_value("\"28\"").is_err());
        assert!(m.set_units("C\"").is_err());
        assert!(m.set_title(Some("a\"b".into())).is_err());
        assert!(m.set_cluster(Some("\"".into())).is_err());
        assert!(m.set_description(Some("x\"".into())).is_err());

        assert_eq!(m.name(), "temperature");
        assert_eq!(m.value(), "");
        assert_eq!(m.units(), "Celsius");
        assert!(m.title().is_none());
    }

    #[test]
    fn group_with_quote_is_rejected_whole() {
        let mut m = Metric::new();
        m.set_group(Some(vec!["env".into()])).unwrap();
        let err = m.set_group(Some(vec!["ok".into(), "bad\"".into()]));
        assert_eq!(err, Err(ValidationError::ContainsQuote { field: "group" }));
        assert_eq!(m.group(), Some(&["env".to_string()][..]));
    }

    #[test]
    fn negative_intervals_rejected() {
        let mut m = Metric::new();
        m.set_tmax(30).unwrap();
        assert_eq!(
            m.set_tmax(-1),
            Err(ValidationError::NegativeInterval { field: "tmax", value: -1 })
        );
        assert!(m.set_dmax(-360).is_err());
        assert!(matches!(
            m.set_dmax(i64::from(u32::MAX) + 1),
            Err(ValidationError::IntervalOverflow { .. })
        ));
        assert_eq!(m.tmax(), 30);
        assert_eq!(m.dmax(), 0);
    }

    #[test]
    fn spoof_host_format() {
        let mut m = Metric::new();
        m.set_spoof_host(Some("192.168.0.1:myswitch".into())).unwrap();
        assert!(m.is_spoofed());

        for bad in ["myswitch", ":myswitch", "192.168.0.1:", ":", "1.2.3.4:a\"b"] {
            assert!(m.set_spoof_host(Some(bad.into())).is_err(), "{bad} deveria falhar");
        }
        assert_eq!(m.spoof_host(), Some("192.168.0.1:myswitch"));

        m.set_spoof_host(None).unwrap();
        assert!(!m.is_spoofed());
    }

    #[test]
    fn empty_optionals_are_unset() {
        let mut m = Metric::new();
        m.set_cluster(Some(String::new())).unwrap();
        m.set_spoof_host(Some(String::new())).unwrap();
        m.set_group(Some(vec![])).unwrap();
        assert!(m.cluster().is_none());
        assert!(m.spoof_host().is_none());
        assert!(m.group().is_none());
    }

    #[test]
    fn heartbeat_overrides_value_fields() {
        let mut m = Metric::new();
        m.set_name("voltage").unwrap();
        m.set_value("220").unwrap();
        m.set_units("V").unwrap();
        m.set_type(ValueType::Double);
        m.set_slope(Slope::Positive);
        m.set_tmax(30).unwrap();
        m.set_dmax(120).unwrap();

        m.set_heartbeat();

        assert_eq!(m.name(), "heartbeat");
        assert_eq!(m.value(), "0");
        assert_eq!(m.units(), "");
        assert_eq!(m.value_type(), ValueType::Uint32);
        assert_eq!(m.slope(), Slope::Zero);
        assert_eq!(m.tmax(), 0);
        assert_eq!(m.dmax(), 0);
        assert!(m.spoof_heartbeat());
    }

    #[test]
    fn heartbeat_is_one_shot() {
        let mut m = Metric::new();
        m.set_heartbeat();
        m.set_tmax(90).unwrap();
        assert_eq!(m.tmax(), 90);
        // o nome no fio continua fixo enquanto o flag estiver ligado
        m.set_name("other").unwrap();
        assert_eq!(m.wire_name(), "heartbeat");
    }

    #[test]
    fn origin_host_prefers_spoof() {
        let mut m = Metric::new();
        assert_eq!(m.origin_host("node01"), "node01");
        m.set_spoof_host(Some("10.0.0.9:sw1".into())).unwrap();
        assert_eq!(m.origin_host("node01"), "10.0.0.9:sw1");
    }

    #[test]
    fn validate_accepts_built_metric() {
        let mut m = Metric::new();
        m.set_name("load").unwrap();
        m.set_group(Some(vec!["a".into(), "b".into()])).unwrap();
        m.set_spoof_host(Some("1.2.3.4:h".into())).unwrap();
        assert!(m.validate().is_ok());
    }
}
