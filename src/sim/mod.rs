//! Battle simulation module
//!
//! Physics and combat for a single battle. The host calls [`tick`] once per
//! rendered frame; nothing in here schedules itself or reads a clock.
//! - Randomness comes only from the injected generator on [`BattleState`]
//! - Side A always resolves before side B

pub mod collision;
pub mod state;
pub mod tick;

pub use collision::{Contact, apply_impulse, circle_overlap, reflect_walls, resolve_fighter_collision};
pub use state::{
    Arena, BattleEvent, BattlePhase, BattleState, Bounds, Fighter, ImpactReport, Side, SideDamage,
    Wall, launch_speed,
};
pub use tick::{collision_power, tick};
