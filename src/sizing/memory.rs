//! Memory quantity parsing and rounding
//!
//! Memory strings follow the JVM/YARN convention: a decimal coefficient
//! followed by an optional single-letter binary unit (`b`, `k`, `m`, `g`,
//! `t`, case-insensitive). Rounding produces the coarse megabyte values
//! that cluster resource managers schedule cleanly.

use crate::error::{Result, SparkConfError};
use serde::{Deserialize, Serialize};

/// Bytes in one mebibyte
pub const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Binary memory unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MemoryUnit {
    /// Bytes
    #[default]
    Byte,
    /// Kibibytes (1024)
    Kilo,
    /// Mebibytes (1024^2)
    Mega,
    /// Gibibytes (1024^3)
    Giga,
    /// Tebibytes (1024^4)
    Tera,
}

impl MemoryUnit {
    /// Map a unit letter to its unit, ignoring case
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            'b' => Some(Self::Byte),
            'k' => Some(Self::Kilo),
            'm' => Some(Self::Mega),
            'g' => Some(Self::Giga),
            't' => Some(Self::Tera),
            _ => None,
        }
    }

    /// Number of bytes in one unit
    pub fn multiplier(&self) -> f64 {
        match self {
            Self::Byte => 1.0,
            Self::Kilo => 1024.0,
            Self::Mega => 1024.0 * 1024.0,
            Self::Giga => 1024.0 * 1024.0 * 1024.0,
            Self::Tera => 1024.0 * 1024.0 * 1024.0 * 1024.0,
        }
    }

    /// Canonical suffix letter
    pub fn suffix(&self) -> &'static str {
        match self {
            Self::Byte => "B",
            Self::Kilo => "K",
            Self::Mega => "M",
            Self::Giga => "G",
            Self::Tera => "T",
        }
    }
}

/// Parse a memory string such as `64G`, `512m` or `100` into bytes.
///
/// A missing suffix means bytes. The first unit letter in the string
/// splits it: everything before it is the coefficient. A trailing `B` or
/// `iB` after a non-byte unit is tolerated (`64GB`, `512MiB`).
pub fn parse_memory(text: &str) -> Result<f64> {
    parse_memory_with_default_unit(text, MemoryUnit::Byte)
}

/// Parse a memory string, using `default_unit` when no suffix is present.
///
/// Schedulers such as Slurm report bare numbers in megabytes.
pub fn parse_memory_with_default_unit(text: &str, default_unit: MemoryUnit) -> Result<f64> {
    let trimmed = text.trim();

    if trimmed.is_empty() {
        return Err(SparkConfError::invalid_memory(text, "empty memory string"));
    }

    let unit_pos = trimmed
        .char_indices()
        .find_map(|(idx, c)| MemoryUnit::from_char(c).map(|unit| (idx, c, unit)));

    let (coef_str, unit) = match unit_pos {
        Some((idx, c, unit)) => {
            let rest = &trimmed[idx + c.len_utf8()..];
            let rest_ok = rest.is_empty()
                || (unit != MemoryUnit::Byte
                    && (rest.eq_ignore_ascii_case("b") || rest.eq_ignore_ascii_case("ib")));
            if !rest_ok {
                return Err(SparkConfError::invalid_memory(
                    text,
                    format!("unexpected text '{}' after unit", rest),
                ));
            }
            (&trimmed[..idx], unit)
        }
        None => (trimmed, default_unit),
    };

    let coef_str = coef_str.trim();
    if coef_str.is_empty() {
        return Err(SparkConfError::invalid_memory(text, "missing numeric coefficient"));
    }

    let coef: f64 = coef_str.parse().map_err(|_| {
        SparkConfError::invalid_memory(
            text,
            format!("unrecognized unit or invalid number '{}'", coef_str),
        )
    })?;

    if !coef.is_finite() {
        return Err(SparkConfError::invalid_memory(text, "coefficient is not finite"));
    }
    if coef < 0.0 {
        return Err(SparkConfError::invalid_memory(text, "coefficient is negative"));
    }

    let bytes = coef * unit.multiplier();
    if !bytes.is_finite() {
        return Err(SparkConfError::invalid_memory(text, "memory quantity out of range"));
    }

    Ok(bytes)
}

/// Rounding step, in megabytes, for a quantity of `mem_in_mb` megabytes
pub fn clean_megabyte_step(mem_in_mb: f64) -> f64 {
    if mem_in_mb > 4096.0 {
        1024.0
    } else if mem_in_mb > 2048.0 {
        512.0
    } else if mem_in_mb > 1024.0 {
        256.0
    } else {
        128.0
    }
}

/// Round a byte quantity down to a clean megabyte value.
///
/// Larger quantities snap to coarser steps (1024, 512, 256 or 128 MB).
/// Negative or NaN input yields 0.
pub fn round_to_clean_megabytes(bytes: f64) -> u64 {
    let mem_in_mb = bytes / BYTES_PER_MB;
    let step = clean_megabyte_step(mem_in_mb);

    // The outer floor discards float residue left by the multiplication.
    ((mem_in_mb / step).floor() * step).floor() as u64
}
