//! Enumerações do protocolo gmetric: tipo do valor e slope.
//!
//! O tipo viaja no pacote de metadata como string minúscula (`"uint32"`),
//! o slope viaja como o ordinal do enum (0–5).

use crate::metric::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ──────────────────────────────────────────────
// Tipo do valor
// ──────────────────────────────────────────────

/// Tipo declarado do valor. Só afeta a interpretação no gmond.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    #[default]
    String,
    Int8,
    Uint8,
    Int16,
    Uint16,
    Int32,
    Uint32,
    Float,
    Double,
}

impl ValueType {
    /// Todos os tipos, na ordem do protocolo.
    pub const ALL: [ValueType; 9] = [
        ValueType::String,
        ValueType::Int8,
        ValueType::Uint8,
        ValueType::Int16,
        ValueType::Uint16,
        ValueType::Int32,
        ValueType::Uint32,
        ValueType::Float,
        ValueType::Double,
    ];

    /// Tag enviada no pacote de metadata.
    pub fn as_str(self) -> &'static str {
        match self {
            ValueType::String => "string",
            ValueType::Int8 => "int8",
            ValueType::Uint8 => "uint8",
            ValueType::Int16 => "int16",
            ValueType::Uint16 => "uint16",
            ValueType::Int32 => "int32",
            ValueType::Uint32 => "uint32",
            ValueType::Float => "float",
            ValueType::Double => "double",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ValueType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ValueType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ValidationError::UnknownType(s.to_string()))
    }
}

// ──────────────────────────────────────────────
// Slope
// ──────────────────────────────────────────────

/// Tendência esperada da métrica. O valor no fio é o discriminante.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u32)]
pub enum Slope {
    Zero = 0,
    Positive = 1,
    Negative = 2,
    #[default]
    Both = 3,
    Unspecified = 4,
    Derivative = 5,
}

impl Slope {
    pub const ALL: [Slope; 6] = [
        Slope::Zero,
        Slope::Positive,
        Slope::Negative,
        Slope::Both,
        Slope::Unspecified,
        Slope::Derivative,
    ];

    /// Ordinal enviado como `uint32`.
    pub fn ordinal(self) -> u32 {
        self as u32
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Slope::Zero => "zero",
            Slope::Positive => "positive",
            Slope::Negative => "negative",
            Slope::Both => "both",
            Slope::Unspecified => "unspecified",
            Slope::Derivative => "derivative",
        }
    }
}

impl fmt::Display for Slope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Aceita o nome em qualquer caixa (`"BOTH"`, `"both"`).
impl FromStr for Slope {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Slope::ALL
            .into_iter()
            .find(|slope| slope.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ValidationError::UnknownSlope(s.to_string()))
    }
}

// ──────────────────────────────────────────────
// Testes
// ──────────────────────────────────────────────
