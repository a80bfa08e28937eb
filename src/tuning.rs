//! Battle balance knobs
//!
//! Loaded from an optional JSON file; anything left out keeps its default.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Errors while loading tuning
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to read tuning file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed tuning: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid tuning value `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Physics and pacing parameters for a battle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BattleTuning {
    /// Minimum battle time between two damaging collisions (ms)
    pub hit_cooldown_ms: f32,
    /// Nobody faints before this many qualifying hits
    pub min_hits_to_end: u32,
    /// Body-body restitution
    pub restitution: f32,
    /// Max random deviation of B's heading from the exact opposite of A's (radians)
    pub heading_jitter: f32,
    /// Relaunch both fighters on fresh headings after this long without a hit (ms)
    pub stall_timeout_ms: f32,
    /// Fighter radius as a fraction of the arena's short side
    pub radius_fraction: f32,
    /// SPD to px/ms
    pub speed_scale: f32,
    /// SPD clamp before scaling
    pub speed_stat_min: f32,
    pub speed_stat_max: f32,
    /// Normal relative speed to power
    pub power_scale: f32,
    pub power_min: f32,
    pub power_max: f32,
    /// Largest dt integrated per step (ms)
    pub max_frame_dt_ms: f32,
    /// Wall inset in CSS pixels
    pub wall_padding: f32,
    /// Spawn inset in CSS pixels
    pub spawn_padding: f32,
}

impl Default for BattleTuning {
    fn default() -> Self {
        Self {
            hit_cooldown_ms: HIT_COOLDOWN_MS,
            min_hits_to_end: MIN_HITS_TO_END,
            restitution: RESTITUTION,
            heading_jitter: HEADING_JITTER,
            stall_timeout_ms: STALL_TIMEOUT_MS,
            radius_fraction: RADIUS_FRACTION,
            speed_scale: SPEED_SCALE,
            speed_stat_min: SPEED_STAT_MIN,
            speed_stat_max: SPEED_STAT_MAX,
            power_scale: POWER_SCALE,
            power_min: POWER_MIN,
            power_max: POWER_MAX,
            max_frame_dt_ms: MAX_FRAME_DT_MS,
            wall_padding: WALL_PADDING,
            spawn_padding: SPAWN_PADDING,
        }
    }
}

impl BattleTuning {
    /// Parse tuning from JSON and validate it
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Self = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load tuning from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| TuningError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded battle tuning from {}", path.display());
        Ok(tuning)
    }

    /// Reject values that would break the physics or the fairness floor
    pub fn validate(&self) -> Result<(), TuningError> {
        fn positive(field: &'static str, v: f32) -> Result<(), TuningError> {
            if v.is_finite() && v > 0.0 {
                Ok(())
            } else {
                Err(TuningError::Invalid {
                    field,
                    reason: format!("must be a positive number, got {v}"),
                })
            }
        }

        if !(self.hit_cooldown_ms.is_finite() && self.hit_cooldown_ms >= 0.0) {
            return Err(TuningError::Invalid {
                field: "hit_cooldown_ms",
                reason: format!("must be >= 0, got {}", self.hit_cooldown_ms),
            });
        }
        if !(0.0..=1.0).contains(&self.restitution) {
            return Err(TuningError::Invalid {
                field: "restitution",
                reason: format!("must be within [0, 1], got {}", self.restitution),
            });
        }
        if !(self.heading_jitter.is_finite() && (0.0..=std::f32::consts::PI).contains(&self.heading_jitter)) {
            return Err(TuningError::Invalid {
                field: "heading_jitter",
                reason: format!("must be within [0, pi], got {}", self.heading_jitter),
            });
        }
        positive("stall_timeout_ms", self.stall_timeout_ms)?;
        positive("radius_fraction", self.radius_fraction)?;
        positive("speed_scale", self.speed_scale)?;
        positive("speed_stat_min", self.speed_stat_min)?;
        positive("power_scale", self.power_scale)?;
        positive("max_frame_dt_ms", self.max_frame_dt_ms)?;
        if self.speed_stat_min > self.speed_stat_max {
            return Err(TuningError::Invalid {
                field: "speed_stat_max",
                reason: "must not be below speed_stat_min".into(),
            });
        }
        if !(self.power_min >= 0.0 && self.power_min <= self.power_max) {
            return Err(TuningError::Invalid {
                field: "power_max",
                reason: "power range must satisfy 0 <= power_min <= power_max".into(),
            });
        }
        if !(self.wall_padding >= 0.0 && self.spawn_padding >= 0.0) {
            return Err(TuningError::Invalid {
                field: "wall_padding",
                reason: "paddings must be >= 0".into(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_consts() {
        let t = BattleTuning::default();
        assert_eq!(t.hit_cooldown_ms, 220.0);
        assert_eq!(t.min_hits_to_end, 5);
        assert_eq!(t.restitution, 0.99);
        assert!(t.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let t = BattleTuning::from_json(r#"{ "min_hits_to_end": 3, "restitution": 1.0 }"#).unwrap();
        assert_eq!(t.min_hits_to_end, 3);
        assert_eq!(t.restitution, 1.0);
        assert_eq!(t.hit_cooldown_ms, HIT_COOLDOWN_MS);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = BattleTuning::from_json(r#"{ "restitution": 1.5 }"#).unwrap_err();
        assert!(matches!(err, TuningError::Invalid { field: "restitution", .. }));

        let err = BattleTuning::from_json(r#"{ "speed_stat_min": 200 }"#).unwrap_err();
        assert!(matches!(err, TuningError::Invalid { field: "speed_stat_max", .. }));

        let err = BattleTuning::from_json(r#"{ "stall_timeout_ms": 0 }"#).unwrap_err();
        assert!(matches!(err, TuningError::Invalid { field: "stall_timeout_ms", .. }));

        let err = BattleTuning::from_json(r#"{ "heading_jitter": -0.1 }"#).unwrap_err();
        assert!(matches!(err, TuningError::Invalid { field: "heading_jitter", .. }));

        let err = BattleTuning::from_json("{ not json").unwrap_err();
        assert!(matches!(err, TuningError::Parse(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = BattleTuning::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, TuningError::Io { .. }));
    }
}
