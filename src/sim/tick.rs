//! Per-frame battle step
//!
//! Integrates motion, bounces fighters off the walls and each other, turns
//! qualifying collisions into damage and detects the end of the battle.

use glam::Vec2;
use rand::Rng;

use super::collision::{reflect_walls, resolve_fighter_collision};
use super::state::{
    Arena, BattleEvent, BattlePhase, BattleState, Fighter, ImpactReport, Side, SideDamage,
};
use crate::clamp_finite;
use crate::damage::{apply_multiplier, collision_damage, select_attack};
use crate::types::best_multiplier;

/// Advance a running battle by `dt_ms` of host time.
///
/// Does nothing unless the battle is running, so a late frame for a finished
/// or cancelled battle cannot touch its state.
pub fn tick<R: Rng>(state: &mut BattleState<R>, arena: &Arena, dt_ms: f32) {
    if state.phase != BattlePhase::Running {
        return;
    }

    let dt = clamp_finite(dt_ms, 0.0, state.tuning.max_frame_dt_ms);
    state.clock_ms += dt;

    let bounds = arena.bounds(&state.tuning);
    for side in Side::BOTH {
        let fighter = &mut state.fighters[side.index()];
        fighter.pos += fighter.vel * dt;
        let walls = reflect_walls(&mut fighter.pos, &mut fighter.vel, fighter.radius, &bounds);
        state
            .events
            .extend(walls.into_iter().map(|wall| BattleEvent::WallBounce { side, wall }));
    }

    let restitution = state.tuning.restitution;
    let [a, b] = &mut state.fighters;
    if let Some(contact) = resolve_fighter_collision(a, b, restitution) {
        if state.hit_ready() {
            state.last_hit_at = Some(state.clock_ms);
            state.hit_count += 1;
            resolve_impact(state, contact.normal);
        }
    }

    if state.is_stalled() {
        log::debug!(
            "no hit for {:.0} ms after {} hits, relaunching",
            state.tuning.stall_timeout_ms,
            state.hit_count
        );
        state.relaunch();
    }

    check_finished(state);
}

/// Collision power from the normal component of the relative velocity
pub fn collision_power<R>(state: &BattleState<R>, normal: Vec2) -> f32 {
    let [a, b] = &state.fighters;
    let rel_speed = (b.vel - a.vel).dot(normal).abs();
    let t = &state.tuning;
    clamp_finite(rel_speed * t.power_scale, t.power_min, t.power_max)
}

/// Roll and apply damage to both sides at once
fn resolve_impact<R: Rng>(state: &mut BattleState<R>, normal: Vec2) {
    let power = collision_power(state, normal);

    let (to_a, to_b) = {
        let [a, b] = &state.fighters;
        let to_a = roll_damage(b, a, power, &mut state.rng);
        let to_b = roll_damage(a, b, power, &mut state.rng);
        (to_a, to_b)
    };

    let floor_active = state.hit_count < state.tuning.min_hits_to_end;
    let [a, b] = &mut state.fighters;
    let before = [a.hp, b.hp];
    a.hp = a.hp.saturating_sub(to_a.damage);
    b.hp = b.hp.saturating_sub(to_b.damage);

    if floor_active {
        a.hp = a.hp.max(1);
        b.hp = b.hp.max(1);
    } else if a.hp == 0 && b.hp == 0 {
        // Double knockout: whoever was overkilled by less hangs on
        let overkill_a = to_a.damage - before[0];
        let overkill_b = to_b.damage - before[1];
        if overkill_a <= overkill_b {
            a.hp = 1;
        } else {
            b.hp = 1;
        }
    }

    let report = ImpactReport {
        hit: state.hit_count,
        power,
        to_a: SideDamage {
            hp_after: a.hp,
            ..to_a
        },
        to_b: SideDamage {
            hp_after: b.hp,
            ..to_b
        },
    };
    log::debug!(
        "hit {}: power {:.1}, {} takes {} (x{}), {} takes {} (x{})",
        report.hit,
        power,
        a.name(),
        to_a.damage,
        to_a.multiplier,
        b.name(),
        to_b.damage,
        to_b.multiplier,
    );
    state.events.push(BattleEvent::Impact(report));
}

/// Damage `attacker` deals to `defender` for one collision
fn roll_damage<R: Rng>(attacker: &Fighter, defender: &Fighter, power: f32, rng: &mut R) -> SideDamage {
    let (mode, atk, def) = select_attack(&attacker.stats, &defender.stats);
    let multiplier = best_multiplier(&attacker.types, &defender.types);
    let damage = apply_multiplier(collision_damage(power, atk, def, rng), multiplier);
    SideDamage {
        damage,
        multiplier,
        mode,
        hp_after: defender.hp,
    }
}

/// Enter `Ended` once the fairness floor is met and somebody fainted
fn check_finished<R>(state: &mut BattleState<R>) {
    if state.hit_count < state.tuning.min_hits_to_end {
        return;
    }
    let [a, b] = &state.fighters;
    if !(a.is_fainted() || b.is_fainted()) {
        return;
    }

    let winner = if a.hp > 0 { Side::A } else { Side::B };
    let loser = winner.other();
    state.phase = BattlePhase::Ended;
    state.winner = Some(winner);
    state.events.push(BattleEvent::Ended {
        winner,
        winner_name: state.fighter(winner).name().to_string(),
        loser_name: state.fighter(loser).name().to_string(),
        hits: state.hit_count,
    });
}
