//! Collision damage
//!
//! A turn-based RPG damage curve retuned for an arcade collision game: a
//! fixed level and a larger divisor keep a typical fight around 6-12 hits
//! while still letting strong attackers punch through.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::stats::BattleStats;

/// Which attack/defense pair a collision uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttackMode {
    /// ATK vs DEF
    Physical,
    /// SPATK vs SPDEF
    Special,
}

/// Attack stat, defense stat and mode for one attacker hitting one defender.
///
/// Special is used only when SPATK strictly beats ATK. Called on every
/// collision; it only reads immutable stats so the answer never changes
/// within a battle.
pub fn select_attack(attacker: &BattleStats, defender: &BattleStats) -> (AttackMode, u32, u32) {
    if attacker.spatk > attacker.atk {
        (AttackMode::Special, attacker.spatk, defender.spdef)
    } else {
        (AttackMode::Physical, attacker.atk, defender.def)
    }
}

/// `floor(2 * level / 5) + 2`
#[inline]
pub fn level_factor(level: u32) -> f32 {
    ((2 * level) / 5 + 2) as f32
}

/// Damage before the random roll
pub fn base_damage(power: f32, atk: u32, def: u32) -> f32 {
    let power = power.max(0.0);
    let ratio = atk.max(1) as f32 / def.max(1) as f32;
    level_factor(BATTLE_LEVEL) * power * ratio / DAMAGE_DIVISOR + 2.0
}

/// Roll collision damage: base damage times a uniform [0.90, 1.10) variance,
/// floored, never below 1.
pub fn collision_damage<R: Rng + ?Sized>(power: f32, atk: u32, def: u32, rng: &mut R) -> u32 {
    let variance =
        DAMAGE_VARIANCE_MIN + rng.random::<f32>() * (DAMAGE_VARIANCE_MAX - DAMAGE_VARIANCE_MIN);
    let damage = (base_damage(power, atk, def) * variance).floor();
    (damage as u32).max(1)
}

/// Apply a type multiplier to rolled damage, keeping the 1-damage floor
#[inline]
pub fn apply_multiplier(damage: u32, multiplier: f32) -> u32 {
    ((damage as f32 * multiplier).floor() as u32).max(1)
}
