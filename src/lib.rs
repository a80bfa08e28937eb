//! Wheel Clash - elimination wheel battle engine
//!
//! Core modules:
//! - `sim`: Battle simulation (physics, collisions, per-frame step)
//! - `engine`: Battle state machine driven by the host one frame at a time
//! - `stats`, `types`, `damage`: Combat math
//! - `tournament`: Elimination driver that feeds the engine from a pool
//! - `tuning`: Data-driven battle balance

pub mod contestant;
pub mod damage;
pub mod engine;
pub mod roster;
pub mod sim;
pub mod stats;
pub mod tournament;
pub mod tuning;
pub mod types;

pub use contestant::{Contestant, RawStats, StatValue};
pub use engine::{BattleEngine, BattleOutcome, BattleSummary};
pub use sim::{Arena, BattleEvent, BattlePhase, Fighter, Side};
pub use stats::{BattleStats, compute_max_hp, derive_battle_stats};
pub use tournament::{Tournament, TournamentError};
pub use tuning::BattleTuning;
pub use types::{ElementType, best_multiplier, best_multiplier_for_tags, parse_types, type_multiplier};

use glam::Vec2;

/// Battle configuration constants
pub mod consts {
    /// Notional level fed into the damage curve
    pub const BATTLE_LEVEL: u32 = 35;
    /// Damage curve divisor (tuned so fights last ~6-12 hits)
    pub const DAMAGE_DIVISOR: f32 = 65.0;
    /// Random damage roll bounds
    pub const DAMAGE_VARIANCE_MIN: f32 = 0.90;
    pub const DAMAGE_VARIANCE_MAX: f32 = 1.10;

    /// Fallback for missing or unparsable raw stats
    pub const DEFAULT_STAT: u32 = 60;
    pub const STAT_MIN: u32 = 1;
    pub const STAT_MAX: u32 = 255;

    /// Max HP bounds
    pub const MAX_HP_FLOOR: f32 = 80.0;
    pub const MAX_HP_CEIL: f32 = 420.0;
    pub const MAX_HP_HP_WEIGHT: f32 = 2.0;
    pub const MAX_HP_DEFENSE_WEIGHT: f32 = 0.60;

    /// Body-body restitution (unit masses)
    pub const RESTITUTION: f32 = 0.99;
    /// Minimum battle time between two damaging collisions
    pub const HIT_COOLDOWN_MS: f32 = 220.0;
    /// Fairness floor: nobody faints before this many hits
    pub const MIN_HITS_TO_END: u32 = 5;

    /// Largest deviation of B's launch heading from A's opposite (radians)
    pub const HEADING_JITTER: f32 = 0.15;
    /// Battle time without a qualifying hit before both fighters are relaunched
    pub const STALL_TIMEOUT_MS: f32 = 8000.0;

    /// Fighter radius as a fraction of the arena's short side
    pub const RADIUS_FRACTION: f32 = 0.09;
    /// SPD to px/ms
    pub const SPEED_SCALE: f32 = 0.0045;
    pub const SPEED_STAT_MIN: f32 = 35.0;
    pub const SPEED_STAT_MAX: f32 = 140.0;

    /// Normal relative speed (px/ms) to move power
    pub const POWER_SCALE: f32 = 180.0;
    pub const POWER_MIN: f32 = 18.0;
    pub const POWER_MAX: f32 = 120.0;

    /// Largest frame delta integrated in one step (frame hitches)
    pub const MAX_FRAME_DT_MS: f32 = 34.0;

    /// Arena wall inset, in CSS pixels (scaled by device pixel ratio)
    pub const WALL_PADDING: f32 = 14.0;
    /// Spawn inset, in CSS pixels (scaled by device pixel ratio)
    pub const SPAWN_PADDING: f32 = 18.0;
}

/// Unit vector for an angle in radians
#[inline]
pub fn heading(theta: f32) -> Vec2 {
    Vec2::new(theta.cos(), theta.sin())
}

/// Clamp that never propagates NaN (NaN maps to `min`)
#[inline]
pub fn clamp_finite(value: f32, min: f32, max: f32) -> f32 {
    if value.is_nan() {
        min
    } else {
        value.clamp(min, max)
    }
}
