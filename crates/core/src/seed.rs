//! Seed values and the string hash that folds them into generator state.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A level seed as a player or a generator supplies it.
///
/// Numbers are hashed through their shortest decimal text, so a seed drawn
/// from a running stream (always a fraction) reproduces the same level as
/// typing that fraction in by hand.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Seed {
    Integer(i64),
    Number(f64),
    Text(String),
}

impl Seed {
    /// Interprets user input: integers first, then finite decimals, then text.
    pub fn parse(raw: &str) -> Seed {
        let trimmed = raw.trim();
        if let Ok(value) = trimmed.parse::<i64>() {
            return Seed::Integer(value);
        }
        match trimmed.parse::<f64>() {
            Ok(value) if value.is_finite() && !trimmed.is_empty() => Seed::Number(value),
            _ => Seed::Text(raw.to_string()),
        }
    }

    /// The text fed to [`Mash`].
    pub fn hash_text(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Seed::Integer(value) => write!(f, "{value}"),
            Seed::Number(value) => f.write_str(&number_text(*value)),
            Seed::Text(text) => f.write_str(text),
        }
    }
}

impl From<i64> for Seed {
    fn from(value: i64) -> Self {
        Seed::Integer(value)
    }
}

impl From<i32> for Seed {
    fn from(value: i32) -> Self {
        Seed::Integer(i64::from(value))
    }
}

impl From<u32> for Seed {
    fn from(value: u32) -> Self {
        Seed::Integer(i64::from(value))
    }
}

impl From<u64> for Seed {
    fn from(value: u64) -> Self {
        match i64::try_from(value) {
            Ok(value) => Seed::Integer(value),
            Err(_) => Seed::Number(value as f64),
        }
    }
}

impl From<f64> for Seed {
    fn from(value: f64) -> Self {
        Seed::Number(value)
    }
}

impl From<&str> for Seed {
    fn from(value: &str) -> Self {
        Seed::Text(value.to_string())
    }
}

impl From<String> for Seed {
    fn from(value: String) -> Self {
        Seed::Text(value)
    }
}

/// Shortest round-trip decimal text of `value`, switching to exponent
/// notation below `1e-6` and from `1e21` upward, with an explicit `+` on
/// positive exponents.
pub fn number_text(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }
    let magnitude = value.abs();
    if (1e-6..1e21).contains(&magnitude) {
        return format!("{value}");
    }
    let exponent_form = format!("{value:e}");
    match exponent_form.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{mantissa}e+{exponent}")
        }
        _ => exponent_form,
    }
}

const MASH_START: f64 = 4_022_871_197.0;
const TWO_POW_32: f64 = 4_294_967_296.0;
const TWO_POW_NEG_32: f64 = 2.328_306_436_538_696_3e-10;

/// Stateful string hash. Each call mixes the UTF-16 units of its input into
/// the running state and returns a fraction in `[0, 1)`.
#[derive(Clone, Debug)]
pub struct Mash {
    n: f64,
}

impl Default for Mash {
    fn default() -> Self {
        Self::new()
    }
}

impl Mash {
    pub fn new() -> Self {
        Self { n: MASH_START }
    }

    pub fn hash(&mut self, data: &str) -> f64 {
        let mut n = self.n;
        for unit in data.encode_utf16() {
            n += f64::from(unit);
            let mut h = 0.025_196_032_824_169_38 * n;
            n = to_uint32(h);
            h -= n;
            h *= n;
            n = to_uint32(h);
            h -= n;
            n += h * TWO_POW_32;
        }
        self.n = n;
        to_uint32(n) * TWO_POW_NEG_32
    }
}

fn to_uint32(value: f64) -> f64 {
    value.trunc().rem_euclid(TWO_POW_32)
}
