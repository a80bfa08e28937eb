//! Stat model: raw roster stats to bounded battle stats

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::contestant::{RawStats, StatValue};

/// The six battle stats, each in [1, 255]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleStats {
    pub hp: u32,
    pub atk: u32,
    pub def: u32,
    pub spatk: u32,
    pub spdef: u32,
    pub spd: u32,
}

impl Default for BattleStats {
    fn default() -> Self {
        Self {
            hp: DEFAULT_STAT,
            atk: DEFAULT_STAT,
            def: DEFAULT_STAT,
            spatk: DEFAULT_STAT,
            spdef: DEFAULT_STAT,
            spd: DEFAULT_STAT,
        }
    }
}

impl BattleStats {
    pub fn new(hp: u32, atk: u32, def: u32, spatk: u32, spdef: u32, spd: u32) -> Self {
        Self {
            hp: clamp_stat(hp as i64),
            atk: clamp_stat(atk as i64),
            def: clamp_stat(def as i64),
            spatk: clamp_stat(spatk as i64),
            spdef: clamp_stat(spdef as i64),
            spd: clamp_stat(spd as i64),
        }
    }
}

#[inline]
fn clamp_stat(value: i64) -> u32 {
    value.clamp(STAT_MIN as i64, STAT_MAX as i64) as u32
}

fn stat_or_default(value: Option<&StatValue>) -> u32 {
    let parsed = value
        .and_then(StatValue::parse_int)
        .unwrap_or(DEFAULT_STAT as i64);
    clamp_stat(parsed)
}

/// Normalize raw stats. Missing or unparsable fields become 60, then every
/// field is clamped to [1, 255].
pub fn derive_battle_stats(raw: &RawStats) -> BattleStats {
    BattleStats {
        hp: stat_or_default(raw.hp.as_ref()),
        atk: stat_or_default(raw.atk.as_ref()),
        def: stat_or_default(raw.def.as_ref()),
        spatk: stat_or_default(raw.spatk.as_ref()),
        spdef: stat_or_default(raw.spdef.as_ref()),
        spd: stat_or_default(raw.spd.as_ref()),
    }
}

/// `round(clamp(80, HP*2 + (DEF+SPDEF)*0.6, 420))`
pub fn compute_max_hp(stats: &BattleStats) -> u32 {
    let raw = stats.hp as f32 * MAX_HP_HP_WEIGHT
        + (stats.def + stats.spdef) as f32 * MAX_HP_DEFENSE_WEIGHT;
    raw.clamp(MAX_HP_FLOOR, MAX_HP_CEIL).round() as u32
}
