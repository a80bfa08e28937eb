//! Battle state machine
//!
//! `Idle -> Running -> Ended`, driven entirely by the host: it calls
//! [`BattleEngine::step`] once per frame and the engine stays passive in
//! between. A session owns both contestants while it runs and hands them back
//! through the completion callback (or through [`BattleEngine::stop`]).

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::contestant::Contestant;
use crate::sim::{Arena, BattleEvent, BattlePhase, BattleState, Fighter, Side, tick};
use crate::tuning::BattleTuning;

/// Completion callback, fired at most once per session
pub type OnBattleEnd = Box<dyn FnOnce(BattleOutcome)>;

/// Final result of a battle. Owns both contestants again.
#[derive(Debug, Clone)]
pub struct BattleOutcome {
    pub winner: Fighter,
    pub loser: Fighter,
    pub winner_side: Side,
    pub hits: u32,
    pub elapsed_ms: f32,
}

impl BattleOutcome {
    /// Hand the contestants back as (winner, loser)
    pub fn into_contestants(self) -> (Contestant, Contestant) {
        (self.winner.contestant, self.loser.contestant)
    }
}

/// What is left to look at once a session has been discarded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleSummary {
    pub winner_name: String,
    pub loser_name: String,
    pub winner_hp: u32,
    pub winner_max_hp: u32,
    pub loser_hp: u32,
    pub hits: u32,
    pub elapsed_ms: f32,
}

/// Per-frame render data for one fighter
#[derive(Debug, Clone, PartialEq)]
pub struct FighterView<'a> {
    pub name: &'a str,
    pub pos: Vec2,
    pub radius: f32,
    pub hp: u32,
    pub max_hp: u32,
    /// Health bar fill in [0, 1]
    pub hp_fraction: f32,
}

struct Session<R> {
    state: BattleState<R>,
    on_end: Option<OnBattleEnd>,
}

/// Runs at most one battle at a time
pub struct BattleEngine<R = Pcg32> {
    session: Option<Session<R>>,
    phase: BattlePhase,
    tuning: BattleTuning,
    events: Vec<BattleEvent>,
    last_summary: Option<BattleSummary>,
}

impl<R> Default for BattleEngine<R> {
    fn default() -> Self {
        Self::with_tuning(BattleTuning::default())
    }
}

impl BattleEngine<Pcg32> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with a generator seeded from a fixed value (reproducible)
    pub fn start_seeded<F>(&mut self, a: Contestant, b: Contestant, arena: &Arena, seed: u64, on_end: F)
    where
        F: FnOnce(BattleOutcome) + 'static,
    {
        self.start(a, b, arena, Pcg32::seed_from_u64(seed), on_end);
    }

    /// Start with a generator seeded from the thread RNG
    pub fn start_unseeded<F>(&mut self, a: Contestant, b: Contestant, arena: &Arena, on_end: F)
    where
        F: FnOnce(BattleOutcome) + 'static,
    {
        self.start(a, b, arena, Pcg32::from_rng(&mut rand::rng()), on_end);
    }
}

impl<R> BattleEngine<R> {
    pub fn with_tuning(tuning: BattleTuning) -> Self {
        Self {
            session: None,
            phase: BattlePhase::Idle,
            tuning,
            events: Vec::new(),
            last_summary: None,
        }
    }

    pub fn tuning(&self) -> &BattleTuning {
        &self.tuning
    }

    /// Applies to the next `start`; a running battle keeps its tuning
    pub fn set_tuning(&mut self, tuning: BattleTuning) {
        self.tuning = tuning;
    }

    pub fn phase(&self) -> BattlePhase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == BattlePhase::Running
    }

    /// Fighters of the running session (A, B)
    pub fn fighters(&self) -> Option<&[Fighter; 2]> {
        self.session.as_ref().map(|s| &s.state.fighters)
    }

    /// Position, radius and health of both fighters for drawing
    pub fn render_state(&self) -> Option<[FighterView<'_>; 2]> {
        self.fighters().map(|fighters| {
            fighters.each_ref().map(|f| FighterView {
                name: f.name(),
                pos: f.pos,
                radius: f.radius,
                hp: f.hp,
                max_hp: f.max_hp,
                hp_fraction: f.hp_fraction(),
            })
        })
    }

    /// Qualifying hits in the running session
    pub fn hit_count(&self) -> Option<u32> {
        self.session.as_ref().map(|s| s.state.hit_count)
    }

    /// Take all events produced since the last drain
    pub fn drain_events(&mut self) -> Vec<BattleEvent> {
        std::mem::take(&mut self.events)
    }

    /// Result of the most recent completed battle
    pub fn last_summary(&self) -> Option<&BattleSummary> {
        self.last_summary.as_ref()
    }

    /// Cancel the running battle without firing its callback.
    ///
    /// Returns the fighters as they were after the last computed frame so the
    /// caller gets its contestants back. A no-op when nothing is running.
    pub fn stop(&mut self) -> Option<[Fighter; 2]> {
        let session = self.session.take()?;
        self.phase = BattlePhase::Idle;
        let [a, b] = session.state.fighters;
        log::info!("Battle cancelled: {} vs {}", a.name(), b.name());
        Some([a, b])
    }
}

impl<R: Rng> BattleEngine<R> {
    /// Start a battle between two distinct contestants.
    ///
    /// Any battle still running is cancelled first and its contestants are
    /// dropped; call [`stop`](Self::stop) beforehand to keep them.
    pub fn start<F>(&mut self, a: Contestant, b: Contestant, arena: &Arena, rng: R, on_end: F)
    where
        F: FnOnce(BattleOutcome) + 'static,
    {
        if let Some([old_a, old_b]) = self.stop() {
            log::warn!(
                "Starting a new battle discarded {} and {}",
                old_a.name(),
                old_b.name()
            );
        }
        self.events.clear();

        let state = BattleState::new(a, b, arena, self.tuning.clone(), rng);
        {
            let [fa, fb] = &state.fighters;
            log::info!(
                "Battle start: {} ({}/{} HP) vs {} ({}/{} HP)",
                fa.name(),
                fa.hp,
                fa.max_hp,
                fb.name(),
                fb.hp,
                fb.max_hp
            );
        }

        self.session = Some(Session {
            state,
            on_end: Some(Box::new(on_end)),
        });
        self.phase = BattlePhase::Running;
    }

    /// Advance the running battle by one frame of `dt_ms` host time.
    ///
    /// Arena dimensions are re-read every frame so resizes move the walls.
    /// Calling this when nothing is running does nothing.
    pub fn step(&mut self, dt_ms: f32, arena: &Arena) {
        if self.phase != BattlePhase::Running {
            return;
        }
        let Some(session) = self.session.as_mut() else {
            return;
        };

        tick(&mut session.state, arena, dt_ms);
        self.events.append(&mut session.state.events);

        if session.state.phase == BattlePhase::Ended {
            self.finish();
        }
    }

    /// Discard the ended session and report its outcome exactly once
    fn finish(&mut self) {
        let Some(session) = self.session.take() else {
            return;
        };
        self.phase = BattlePhase::Ended;

        let Session { state, on_end } = session;
        let winner_side = state.winner.unwrap_or(Side::A);
        let hits = state.hit_count;
        let elapsed_ms = state.clock_ms;
        let [a, b] = state.fighters;
        let (winner, loser) = match winner_side {
            Side::A => (a, b),
            Side::B => (b, a),
        };

        let summary = BattleSummary {
            winner_name: winner.name().to_string(),
            loser_name: loser.name().to_string(),
            winner_hp: winner.hp,
            winner_max_hp: winner.max_hp,
            loser_hp: loser.hp,
            hits,
            elapsed_ms,
        };
        log::info!(
            "Battle over after {} hits: {} beats {} ({}/{} HP left)",
            hits,
            summary.winner_name,
            summary.loser_name,
            summary.winner_hp,
            summary.winner_max_hp
        );
        self.last_summary = Some(summary);

        if let Some(on_end) = on_end {
            on_end(BattleOutcome {
                winner,
                loser,
                winner_side,
                hits,
                elapsed_ms,
            });
        }
    }
}
