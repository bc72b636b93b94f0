//! Primitivas XDR (RFC 4506) usadas pelo gmetric.
//!
//! ```text
//! int/uint/bool  → 4 bytes big-endian
//! string         → uint32 tamanho + bytes UTF-8 + zeros até múltiplo de 4
//! ```

use bytes::{BufMut, Bytes, BytesMut};

/// Unidade de alinhamento XDR.
const XDR_UNIT: usize = 4;

fn padding(len: usize) -> usize {
    (XDR_UNIT - len % XDR_UNIT) % XDR_UNIT
}

/// Empacotador XDR só de escrita.
#[derive(Debug, Default)]
pub struct XdrPacker {
    buf: BytesMut,
}

impl XdrPacker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: BytesMut::with_capacity(capacity),
        }
    }

    pub fn pack_int(&mut self, value: i32) {
        self.buf.put_i32(value);
    }

    pub fn pack_uint(&mut self, value: u32) {
        self.buf.put_u32(value);
    }

    pub fn pack_bool(&mut self, value: bool) {
        self.buf.put_u32(u32::from(value));
    }

    /// Strings maiores que `u32::MAX` não cabem num datagrama UDP,
    /// então o tamanho é truncado sem checagem.
    pub fn pack_string(&mut self, value: &str) {
        let bytes = value.as_bytes();
        self.buf.put_u32(bytes.len() as u32);
        self.buf.put_slice(bytes);
        self.buf.put_bytes(0, padding(bytes.len()));
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Congela o buffer.
    pub fn finish(self) -> Bytes {
        self.buf.freeze()
    }
}

// ──────────────────────────────────────────────
// Leitor (apenas testes)
// ──────────────────────────────────────────────
