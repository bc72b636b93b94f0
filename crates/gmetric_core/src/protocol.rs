//! Codificação dos dois registros gmetric enviados ao gmond.
//!
//! Metadata (`128`):
//!
//! ```text
//! ┌─────┬──────┬──────┬────────┬──────┬──────┬───────┬───────┬──────┬──────┬───────┬──────────────┐
//! │ 128 │ host │ name │ spoof? │ type │ name │ units │ slope │ tmax │ dmax │ extra │ (key, value)…│
//! └─────┴──────┴──────┴────────┴──────┴──────┴───────┴───────┴──────┴──────┴───────┴──────────────┘
//! ```
//!
//! Valor (`133`):
//!
//! ```text
//! ┌─────┬──────┬──────┬────────┬──────┬───────┐
//! │ 133 │ host │ name │ spoof? │ "%s" │ value │
//! └─────┴──────┴──────┴────────┴──────┴───────┘
//! ```
//!
//! O nome aparece duas vezes na metadata; o parser do gmond espera isso.

use crate::metric::Metric;
use crate::xdr::XdrPacker;
use bytes::Bytes;

/// Tag do registro de metadata completa.
pub const GMETADATA_FULL: i32 = 128;

/// Tag do registro de valor em formato string (128 + 5).
pub const GMETRIC_STRING: i32 = GMETADATA_FULL + 5;

/// Formato fixo do slot de valor.
pub const VALUE_FORMAT: &str = "%s";

/// Chaves da metadata extra, na ordem em que são emitidas.
pub const KEY_CLUSTER: &str = "CLUSTER";
pub const KEY_DESC: &str = "DESC";
pub const KEY_TITLE: &str = "TITLE";
pub const KEY_GROUP: &str = "GROUP";
pub const KEY_SPOOF_HOST: &str = "SPOOF_HOST";
pub const KEY_SPOOF_HEARTBEAT: &str = "SPOOF_HEARTBEAT";

/// Pares `(chave, valor)` de metadata extra, na ordem do fio.
pub fn extra_metadata(metric: &Metric) -> Vec<(&'static str, &str)> {
    let mut extra = Vec::new();
    if let Some(cluster) = metric.cluster() {
        extra.push((KEY_CLUSTER, cluster));
    }
    if let Some(desc) = metric.description() {
        extra.push((KEY_DESC, desc));
    }
    if let Some(title) = metric.title() {
        extra.push((KEY_TITLE, title));
    }
    for group in metric.group().unwrap_or_default() {
        extra.push((KEY_GROUP, group.as_str()));
    }
    if let Some(spoof) = metric.spoof_host() {
        extra.push((KEY_SPOOF_HOST, spoof));
    }
    if metric.spoof_heartbeat() {
        extra.push((KEY_SPOOF_HEARTBEAT, "yes"));
    }
    extra
}

/// Cabeçalho comum aos dois registros.
fn pack_header(pack: &mut XdrPacker, tag: i32, metric: &Metric, local_host: &str) {
    pack.pack_int(tag);
    pack.pack_string(metric.origin_host(local_host));
    pack.pack_string(metric.wire_name());
    pack.pack_bool(metric.is_spoofed());
}

/// Codifica o registro de metadata.
///
/// `local_host` só é usado quando a métrica não tem spoof host.
pub fn encode_metadata(metric: &Metric, local_host: &str) -> Bytes {
    let mut pack = XdrPacker::with_capacity(128);
    pack_header(&mut pack, GMETADATA_FULL, metric, local_host);

    pack.pack_string(metric.value_type().as_str());
    pack.pack_string(metric.wire_name());
    pack.pack_string(metric.units());
    pack.pack_uint(metric.slope().ordinal());
    pack.pack_uint(metric.tmax());
    pack.pack_uint(metric.dmax());

    let extra = extra_metadata(metric);
    pack.pack_uint(extra.len() as u32);
    for (key, value) in extra {
        pack.pack_string(key);
        pack.pack_string(value);
    }

    pack.finish()
}

/// Codifica o registro de valor. O valor sempre segue como `%s`.
pub fn encode_value(metric: &Metric, local_host: &str) -> Bytes {
    let mut pack = XdrPacker::with_capacity(64);
    pack_header(&mut pack, GMETRIC_STRING, metric, local_host);
    pack.pack_string(VALUE_FORMAT);
    pack.pack_string(metric.value());
    pack.finish()
}

// ──────────────────────────────────────────────
// Testes
// ──────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Slope, ValueType};
    use crate::xdr::reader::XdrReader;

    /// Metadata decodificada pelo leitor de referência.
    #[derive(Debug, PartialEq)]
    struct DecodedMetadata {
        host: String,
        name: String,
        spoofed: bool,
        value_type: String,
        units: String,
        slope: u32,
        tmax: u32,
        dmax: u32,
        extra: Vec<(String, String)>,
    }

    fn decode_metadata(buf: &[u8]) -> DecodedMetadata {
        let mut r = XdrReader::new(buf);
        assert_eq!(r.int(), GMETADATA_FULL);
        let host = r.string();
        let name = r.string();
        let spoofed = r.bool();
        let value_type = r.string();
        assert_eq!(r.string(), name, "nome repetido deve ser idêntico");
        let units = r.string();
        let slope = r.uint();
        let tmax = r.uint();
        let dmax = r.uint();
        let count = r.uint();
        let extra = (0..count).map(|_| (r.string(), r.string())).collect();
        assert!(r.is_done(), "bytes sobrando no registro");
        DecodedMetadata {
            host,
            name,
            spoofed,
            value_type,
            units,
            slope,
            tmax,
            dmax,
            extra,
        }
    }

    fn decode_value(buf: &[u8]) -> (String, String, bool, String, String) {
        let mut r = XdrReader::new(buf);
        assert_eq!(r.int(), GMETRIC_STRING);
        let out = (r.string(), r.string(), r.bool(), r.string(), r.string());
        assert!(r.is_done());
        out
    }

    fn temperature() -> Metric {
        let mut m = Metric::new();
        m.set_name("temperature").unwrap();
        m.set_type(ValueType::Int8);
        m.set_value("28").unwrap();
        m.set_units("Celsius").unwrap();
        m.set_slope(Slope::Both);
        m.set_tmax(30).unwrap();
        m.set_dmax(360).unwrap();
        m
    }

    #[test]
    fn plain_metric_metadata() {
        let meta = decode_metadata(&encode_metadata(&temperature(), "node01"));
        assert_eq!(
            meta,
            DecodedMetadata {
                host: "node01".into(),
                name: "temperature".into(),
                spoofed: false,
                value_type: "int8".into(),
                units: "Celsius".into(),
                slope: 3,
                tmax: 30,
                dmax: 360,
                extra: vec![],
            }
        );
    }

    #[test]
    fn plain_metric_value() {
        let (host, name, spoofed, format, value) =
            decode_value(&encode_value(&temperature(), "node01"));
        assert_eq!(host, "node01");
        assert_eq!(name, "temperature");
        assert!(!spoofed);
        assert_eq!(format, "%s");
        assert_eq!(value, "28");
    }

    #[test]
    fn metadata_bytes_are_exact() {
        let mut m = Metric::new();
        m.set_name("a").unwrap();
        let buf = encode_metadata(&m, "h");
        #[rustfmt::skip]
        let expected: Vec<u8> = vec![
            0, 0, 0, 128,
            0, 0, 0, 1, b'h', 0, 0, 0,
            0, 0, 0, 1, b'a', 0, 0, 0,
            0, 0, 0, 0,
            0, 0, 0, 6, b's', b't', b'r', b'i', b'n', b'g', 0, 0,
            0, 0, 0, 1, b'a', 0, 0, 0,
            0, 0, 0, 0,
            0, 0, 0, 3,
            0, 0, 0, 60,
            0, 0, 0, 0,
            0, 0, 0, 0,
        ];
        assert_eq!(&buf[..], &expected[..]);
    }

    #[test]
    fn value_bytes_are_exact() {
        let mut m = Metric::new();
        m.set_name("a").unwrap();
        m.set_value("28").unwrap();
        let buf = encode_value(&m, "h");
        #[rustfmt::skip]
        let expected: Vec<u8> = vec![
            0, 0, 0, 133,
            0, 0, 0, 1, b'h', 0, 0, 0,
            0, 0, 0, 1, b'a', 0, 0, 0,
            0, 0, 0, 0,
            0, 0, 0, 2, b'%', b's', 0, 0,
            0, 0, 0, 2, b'2', b'8', 0, 0,
        ];
        assert_eq!(&buf[..], &expected[..]);
    }

    #[test]
    fn extra_metadata_order_and_count() {
        let mut m = temperature();
        m.set_title(Some("Temp".into())).unwrap();
        m.set_group(Some(vec!["env".into(), "hw".into(), "rack1".into()]))
            .unwrap();
        m.set_description(Some("Ambient".into())).unwrap();
        m.set_cluster(Some("lab".into())).unwrap();
        m.set_spoof_host(Some("10.1.1.1:sensor".into())).unwrap();

        let meta = decode_metadata(&encode_metadata(&m, "node01"));
        assert_eq!(meta.host, "10.1.1.1:sensor");
        assert!(meta.spoofed);
        let pairs: Vec<(&str, &str)> = meta
            .extra
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("CLUSTER", "lab"),
                ("DESC", "Ambient"),
                ("TITLE", "Temp"),
                ("GROUP", "env"),
                ("GROUP", "hw"),
                ("GROUP", "rack1"),
                ("SPOOF_HOST", "10.1.1.1:sensor"),
            ]
        );
    }

    #[test]
    fn heartbeat_metadata_is_fixed() {
        let mut m = temperature();
        m.set_cluster(Some("lab".into())).unwrap();
        m.set_heartbeat();
        m.set_spoof_host(Some("192.168.0.1:myswitch".into())).unwrap();

        let meta = decode_metadata(&encode_metadata(&m, "node01"));
        assert_eq!(meta.name, "heartbeat");
        assert_eq!(meta.value_type, "uint32");
        assert_eq!(meta.units, "");
        assert_eq!((meta.slope, meta.tmax, meta.dmax), (0, 0, 0));
        assert_eq!(meta.host, "192.168.0.1:myswitch");
        assert_eq!(
            meta.extra.last(),
            Some(&("SPOOF_HEARTBEAT".to_string(), "yes".to_string()))
        );
        assert_eq!(meta.extra.len(), 3);

        let (_, name, spoofed, _, value) = decode_value(&encode_value(&m, "node01"));
        assert_eq!(name, "heartbeat");
        assert!(spoofed);
        assert_eq!(value, "0");
    }

    #[test]
    fn buffers_are_word_aligned() {
        let mut m = temperature();
        m.set_description(Some("odd".into())).unwrap();
        assert_eq!(encode_metadata(&m, "abcde").len() % 4, 0);
        assert_eq!(encode_value(&m, "abcde").len() % 4, 0);
    }
}
