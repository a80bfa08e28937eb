//! Battle state and core simulation types
//!
//! Everything one battle session mutates lives here and is owned by that
//! session alone.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::contestant::Contestant;
use crate::damage::AttackMode;
use crate::stats::{BattleStats, compute_max_hp, derive_battle_stats};
use crate::tuning::BattleTuning;
use crate::types::{ElementType, parse_types};
use crate::{clamp_finite, heading};

/// Drawing surface the battle happens on, in device pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arena {
    pub width: f32,
    pub height: f32,
    /// Device pixel ratio; scales the paddings
    pub pixel_ratio: f32,
}

impl Arena {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            pixel_ratio: 1.0,
        }
    }

    pub fn with_pixel_ratio(mut self, pixel_ratio: f32) -> Self {
        self.pixel_ratio = pixel_ratio;
        self
    }

    /// Radius every fighter gets for a battle started in this arena
    pub fn fighter_radius(&self, tuning: &BattleTuning) -> f32 {
        self.width.min(self.height).max(0.0) * tuning.radius_fraction
    }

    /// Inner padded rectangle the walls enclose
    pub fn bounds(&self, tuning: &BattleTuning) -> Bounds {
        let pad = tuning.wall_padding * self.pixel_ratio;
        Bounds {
            min: Vec2::splat(pad),
            max: Vec2::new(self.width - pad, self.height - pad),
        }
    }

    fn spawn_padding(&self, tuning: &BattleTuning) -> f32 {
        tuning.spawn_padding * self.pixel_ratio
    }
}

/// Axis-aligned wall rectangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Vec2,
    pub max: Vec2,
}

/// Which of the two combatants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    A,
    B,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::A, Side::B];

    pub fn index(self) -> usize {
        match self {
            Side::A => 0,
            Side::B => 1,
        }
    }

    pub fn other(self) -> Side {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }
}

/// Arena wall
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Wall {
    Left,
    Right,
    Top,
    Bottom,
}

/// One combatant's physical and combat state for a single battle
#[derive(Debug, Clone)]
pub struct Fighter {
    /// The pool entry this fighter decorates; handed back when the battle ends
    pub contestant: Contestant,
    pub pos: Vec2,
    /// px/ms
    pub vel: Vec2,
    pub radius: f32,
    pub hp: u32,
    pub max_hp: u32,
    pub stats: BattleStats,
    pub types: Vec<ElementType>,
}

impl Fighter {
    pub fn new(contestant: Contestant, pos: Vec2, vel: Vec2, radius: f32) -> Self {
        let stats = derive_battle_stats(&contestant.stats);
        let max_hp = compute_max_hp(&stats);
        let types = parse_types(&contestant.type_tag);
        Self {
            contestant,
            pos,
            vel,
            radius,
            hp: max_hp,
            max_hp,
            stats,
            types,
        }
    }

    pub fn name(&self) -> &str {
        &self.contestant.name
    }

    pub fn is_fainted(&self) -> bool {
        self.hp == 0
    }

    /// Remaining health in [0, 1] for health bars
    pub fn hp_fraction(&self) -> f32 {
        self.hp as f32 / self.max_hp.max(1) as f32
    }
}

/// Damage one side took from one qualifying collision
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SideDamage {
    pub damage: u32,
    /// Type multiplier of the opponent's attack against this side
    pub multiplier: f32,
    /// How the opponent attacked
    pub mode: AttackMode,
    pub hp_after: u32,
}

/// Everything resolved on one qualifying collision
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImpactReport {
    /// 1-based hit number within the battle
    pub hit: u32,
    pub power: f32,
    pub to_a: SideDamage,
    pub to_b: SideDamage,
}

/// Advisory signals for presentation (sound, flashes, banners)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BattleEvent {
    /// A fighter bounced off a wall (no damage)
    WallBounce { side: Side, wall: Wall },
    /// A qualifying collision was resolved
    Impact(ImpactReport),
    /// Nobody scored for too long; both fighters got fresh headings
    Relaunch { hits: u32 },
    /// The battle reached its terminal state
    Ended {
        winner: Side,
        winner_name: String,
        loser_name: String,
        hits: u32,
    },
}

/// Lifecycle of a battle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BattlePhase {
    /// No session
    Idle,
    /// Frames are being simulated
    Running,
    /// Terminal: outcome reported, no more frames
    Ended,
}

/// One running battle
#[derive(Debug, Clone)]
pub struct BattleState<R = Pcg32> {
    /// Side A at index 0, side B at index 1
    pub fighters: [Fighter; 2],
    /// Qualifying collisions so far
    pub hit_count: u32,
    /// Simulated battle time (sum of clamped frame deltas, ms)
    pub clock_ms: f32,
    /// Battle time of the last qualifying collision
    pub last_hit_at: Option<f32>,
    /// Battle time of the last launch (0 for the opening one)
    pub last_launch_at: f32,
    pub phase: BattlePhase,
    /// Set once the phase is `Ended`
    pub winner: Option<Side>,
    /// Events produced since the owner last drained them
    pub events: Vec<BattleEvent>,
    pub tuning: BattleTuning,
    pub(crate) rng: R,
}

impl<R: Rng> BattleState<R> {
    /// Place both fighters symmetrically and launch them on opposite headings
    pub fn new(a: Contestant, b: Contestant, arena: &Arena, tuning: BattleTuning, mut rng: R) -> Self {
        let radius = arena.fighter_radius(&tuning);
        let pad = arena.spawn_padding(&tuning);

        let inset_x = pad + radius + arena.width * 0.25;
        let spawn_y = pad + radius + arena.height * 0.5;
        let pos_a = Vec2::new(inset_x, spawn_y);
        let pos_b = Vec2::new(arena.width - inset_x, spawn_y);

        // B heads roughly opposite A; the jitter breaks the mirror symmetry
        // that can otherwise lock both fighters into paths that never meet
        let theta = rng.random::<f32>() * std::f32::consts::TAU;
        let jitter = (rng.random::<f32>() * 2.0 - 1.0) * tuning.heading_jitter;

        let mut fighter_a = Fighter::new(a, pos_a, Vec2::ZERO, radius);
        let mut fighter_b = Fighter::new(b, pos_b, Vec2::ZERO, radius);
        fighter_a.vel = heading(theta) * launch_speed(&fighter_a.stats, &tuning);
        fighter_b.vel = heading(theta + std::f32::consts::PI + jitter) * launch_speed(&fighter_b.stats, &tuning);

        Self {
            fighters: [fighter_a, fighter_b],
            hit_count: 0,
            clock_ms: 0.0,
            last_hit_at: None,
            last_launch_at: 0.0,
            phase: BattlePhase::Running,
            winner: None,
            events: Vec::new(),
            tuning,
            rng,
        }
    }

    /// Send both fighters off on independent random headings at their launch speed
    pub fn relaunch(&mut self) {
        for fighter in &mut self.fighters {
            let theta = self.rng.random::<f32>() * std::f32::consts::TAU;
            fighter.vel = heading(theta) * launch_speed(&fighter.stats, &self.tuning);
        }
        self.last_launch_at = self.clock_ms;
        self.events.push(BattleEvent::Relaunch { hits: self.hit_count });
    }
}

impl<R> BattleState<R> {
    pub fn fighter(&self, side: Side) -> &Fighter {
        &self.fighters[side.index()]
    }

    pub fn fighter_mut(&mut self, side: Side) -> &mut Fighter {
        &mut self.fighters[side.index()]
    }

    /// True when neither a hit nor a launch happened within the stall timeout
    pub fn is_stalled(&self) -> bool {
        let last_activity = self.last_hit_at.unwrap_or(0.0).max(self.last_launch_at);
        self.clock_ms - last_activity >= self.tuning.stall_timeout_ms
    }

    /// True once the hit cooldown has elapsed (always true before the first hit)
    pub fn hit_ready(&self) -> bool {
        match self.last_hit_at {
            None => true,
            Some(t) => self.clock_ms - t >= self.tuning.hit_cooldown_ms,
        }
    }
}

/// Launch speed in px/ms from the SPD stat
pub fn launch_speed(stats: &BattleStats, tuning: &BattleTuning) -> f32 {
    clamp_finite(stats.spd as f32, tuning.speed_stat_min, tuning.speed_stat_max) * tuning.speed_scale
}
