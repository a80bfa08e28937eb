//! Contestant records as handed over by the roster
//!
//! The engine only reads these. Stats stay loosely typed so that whatever the
//! roster produced (numbers, numeric strings, junk, nothing) reaches the stat
//! model, which is the single place that decides what a bad value means.

use serde::{Deserialize, Serialize};

/// A raw stat as it came out of the roster
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StatValue {
    Number(f64),
    Text(String),
}

impl StatValue {
    /// Integer reading of the value, `None` if there is no leading integer.
    ///
    /// Numbers truncate toward zero. Text accepts surrounding whitespace, an
    /// optional sign and then reads digits until the first non-digit, so
    /// `"45abc"` is 45 and `"abc"` is nothing.
    pub fn parse_int(&self) -> Option<i64> {
        match self {
            StatValue::Number(n) if n.is_finite() => Some(n.trunc() as i64),
            StatValue::Number(_) => None,
            StatValue::Text(s) => parse_leading_int(s),
        }
    }
}

impl From<i64> for StatValue {
    fn from(value: i64) -> Self {
        StatValue::Number(value as f64)
    }
}

impl From<&str> for StatValue {
    fn from(value: &str) -> Self {
        StatValue::Text(value.to_string())
    }
}

fn parse_leading_int(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = digits
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    // Saturate absurdly long digit runs; the stat model clamps anyway
    let magnitude = digits[..end].parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -magnitude } else { magnitude })
}

/// The six raw stats, any of which may be missing
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawStats {
    #[serde(default, rename = "HP", alias = "hp")]
    pub hp: Option<StatValue>,
    #[serde(default, rename = "ATK", alias = "atk")]
    pub atk: Option<StatValue>,
    #[serde(default, rename = "DEF", alias = "def")]
    pub def: Option<StatValue>,
    #[serde(default, rename = "SPATK", alias = "spatk")]
    pub spatk: Option<StatValue>,
    #[serde(default, rename = "SPDEF", alias = "spdef")]
    pub spdef: Option<StatValue>,
    #[serde(default, rename = "SPD", alias = "spd")]
    pub spd: Option<StatValue>,
}

impl RawStats {
    /// All six stats as plain integers (HP, ATK, DEF, SPATK, SPDEF, SPD)
    pub fn from_values(values: [i64; 6]) -> Self {
        let [hp, atk, def, spatk, spdef, spd] = values.map(|v| Some(StatValue::from(v)));
        Self {
            hp,
            atk,
            def,
            spatk,
            spdef,
            spd,
        }
    }
}

/// A pool entry: identity, display name, type tag(s) and raw stats
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contestant {
    pub id: u32,
    pub name: String,
    /// One or two tags separated by `/`, e.g. `"fire/flying"`
    #[serde(default, rename = "type")]
    pub type_tag: String,
    #[serde(default)]
    pub stats: RawStats,
}

impl Contestant {
    pub fn new(id: u32, name: impl Into<String>, type_tag: impl Into<String>, stats: RawStats) -> Self {
        Self {
            id,
            name: name.into(),
            type_tag: type_tag.into(),
            stats,
        }
    }
}
