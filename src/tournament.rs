//! Elimination driver
//!
//! Owns the contestant pool. Each round it pulls two distinct contestants
//! out of the pool, hands them to the battle engine, puts the winner back and
//! drops the loser, until a single champion is left.

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::contestant::Contestant;
use crate::engine::{BattleEngine, BattleOutcome};
use crate::sim::{Arena, BattleEvent};
use crate::tuning::BattleTuning;

/// Default frame time for headless runs (60 Hz)
pub const DEFAULT_FRAME_MS: f32 = 1000.0 / 60.0;
/// Ten simulated minutes at 60 Hz
pub const DEFAULT_MAX_FRAMES: u32 = 60 * 60 * 10;
/// Unfinished battles in a row before `run_to_champion` gives up
pub const DEFAULT_MAX_STALLS: u32 = 16;

#[derive(Debug, Error, PartialEq)]
pub enum TournamentError {
    #[error("a battle needs two contestants, the pool has {0}")]
    NotEnoughContestants(usize),
    #[error("contestant id {0} appears more than once")]
    DuplicateId(u32),
    #[error("battle between {a} and {b} did not finish within {frames} frames")]
    Unfinished { a: String, b: String, frames: u32 },
}

/// Two contestants pulled from the pool, about to fight
#[derive(Debug, Clone)]
pub struct Matchup {
    pub a: Contestant,
    pub b: Contestant,
}

/// Record of one finished battle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub round: u32,
    pub winner_id: u32,
    pub winner_name: String,
    pub loser_id: u32,
    pub loser_name: String,
    pub winner_hp: u32,
    pub winner_max_hp: u32,
    pub hits: u32,
    pub wall_bounces: u32,
    pub frames: u32,
}

/// Elimination wheel over an owned contestant pool
pub struct Tournament<R = Pcg32> {
    pool: Vec<Contestant>,
    eliminated: Vec<Contestant>,
    history: Vec<MatchRecord>,
    stalled_matches: u32,
    engine: BattleEngine<Pcg32>,
    rng: R,
    pub arena: Arena,
    pub frame_ms: f32,
    pub max_frames: u32,
    pub max_stalls: u32,
}

impl<R: Rng> Tournament<R> {
    /// Build a tournament; ids must be unique across the pool
    pub fn new(pool: Vec<Contestant>, arena: Arena, rng: R) -> Result<Self, TournamentError> {
        check_unique_ids(&pool)?;
        Ok(Self {
            pool,
            eliminated: Vec::new(),
            history: Vec::new(),
            stalled_matches: 0,
            engine: BattleEngine::new(),
            rng,
            arena,
            frame_ms: DEFAULT_FRAME_MS,
            max_frames: DEFAULT_MAX_FRAMES,
            max_stalls: DEFAULT_MAX_STALLS,
        })
    }

    pub fn with_tuning(mut self, tuning: BattleTuning) -> Self {
        self.engine.set_tuning(tuning);
        self
    }

    pub fn pool(&self) -> &[Contestant] {
        &self.pool
    }

    /// Losers, in the order they went out
    pub fn eliminated(&self) -> &[Contestant] {
        &self.eliminated
    }

    pub fn history(&self) -> &[MatchRecord] {
        &self.history
    }

    /// Battles that hit `max_frames` and were put back on the wheel
    pub fn stalled_matches(&self) -> u32 {
        self.stalled_matches
    }

    /// Add a late entry to the pool
    pub fn enter(&mut self, contestant: Contestant) -> Result<(), TournamentError> {
        if self.pool.iter().any(|c| c.id == contestant.id) {
            return Err(TournamentError::DuplicateId(contestant.id));
        }
        self.pool.push(contestant);
        Ok(())
    }

    /// Pull two distinct random contestants out of the pool
    pub fn spin(&mut self) -> Result<Matchup, TournamentError> {
        if self.pool.len() < 2 {
            return Err(TournamentError::NotEnoughContestants(self.pool.len()));
        }
        let first = self.rng.random_range(0..self.pool.len());
        let a = self.pool.remove(first);
        let second = self.rng.random_range(0..self.pool.len());
        let b = self.pool.remove(second);
        log::info!("Wheel picked {} vs {}", a.name, b.name);
        Ok(Matchup { a, b })
    }

    /// Fight one matchup to the end. The winner goes back into the pool.
    ///
    /// If the battle does not finish within `max_frames` it is cancelled and
    /// both contestants are returned to the pool.
    pub fn run_match(&mut self, matchup: Matchup) -> Result<MatchRecord, TournamentError> {
        let Matchup { a, b } = matchup;
        if a.id == b.id {
            // Put the single entry back rather than lose it
            self.pool.push(a);
            return Err(TournamentError::DuplicateId(b.id));
        }

        let slot: Rc<RefCell<Option<BattleOutcome>>> = Rc::new(RefCell::new(None));
        let sink = Rc::clone(&slot);
        let battle_rng = Pcg32::from_rng(&mut self.rng);
        self.engine.start(a, b, &self.arena, battle_rng, move |outcome| {
            *sink.borrow_mut() = Some(outcome);
        });

        let mut wall_bounces = 0;
        let mut frames = 0;
        while frames < self.max_frames {
            self.engine.step(self.frame_ms, &self.arena);
            frames += 1;
            wall_bounces += self
                .engine
                .drain_events()
                .iter()
                .filter(|e| matches!(e, BattleEvent::WallBounce { .. }))
                .count() as u32;

            let Some(outcome) = slot.borrow_mut().take() else {
                continue;
            };

            let record = MatchRecord {
                round: self.history.len() as u32 + 1,
                winner_id: outcome.winner.contestant.id,
                winner_name: outcome.winner.name().to_string(),
                loser_id: outcome.loser.contestant.id,
                loser_name: outcome.loser.name().to_string(),
                winner_hp: outcome.winner.hp,
                winner_max_hp: outcome.winner.max_hp,
                hits: outcome.hits,
                wall_bounces,
                frames,
            };
            let (winner, loser) = outcome.into_contestants();
            log::info!("{} is eliminated, {} returns to the wheel", loser.name, winner.name);
            self.pool.push(winner);
            self.eliminated.push(loser);
            self.history.push(record.clone());
            return Ok(record);
        }

        let (a_name, b_name) = match self.engine.stop() {
            Some([fa, fb]) => {
                let names = (fa.name().to_string(), fb.name().to_string());
                self.pool.push(fa.contestant);
                self.pool.push(fb.contestant);
                names
            }
            None => Default::default(),
        };
        log::warn!("{a_name} vs {b_name} timed out after {frames} frames");
        Err(TournamentError::Unfinished {
            a: a_name,
            b: b_name,
            frames,
        })
    }

    /// Spin and fight until one contestant is left, then hand it over.
    ///
    /// An unfinished battle puts both contestants back and the wheel spins
    /// again. Only `max_stalls` unfinished battles in a row abort the run.
    pub fn run_to_champion(&mut self) -> Result<Contestant, TournamentError> {
        if self.pool.is_empty() {
            return Err(TournamentError::NotEnoughContestants(0));
        }
        let mut stalls_in_a_row = 0;
        while self.pool.len() > 1 {
            let matchup = self.spin()?;
            match self.run_match(matchup) {
                Ok(_) => stalls_in_a_row = 0,
                Err(TournamentError::Unfinished { a, b, frames }) => {
                    self.stalled_matches += 1;
                    stalls_in_a_row += 1;
                    if stalls_in_a_row >= self.max_stalls {
                        return Err(TournamentError::Unfinished { a, b, frames });
                    }
                    log::info!("{a} vs {b} stalled, spinning again");
                }
                Err(err) => return Err(err),
            }
        }
        let champion = self.pool.remove(0);
        log::info!("Champion: {}", champion.name);
        Ok(champion)
    }
}

fn check_unique_ids(pool: &[Contestant]) -> Result<(), TournamentError> {
    let mut seen = HashSet::with_capacity(pool.len());
    for c in pool {
        if !seen.insert(c.id) {
            return Err(TournamentError::DuplicateId(c.id));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contestant::RawStats;

    fn mon(id: u32) -> Contestant {
        Contestant::new(id, format!("mon-{id}"), "normal", RawStats::default())
    }

    fn tournament(ids: &[u32], seed: u64) -> Tournament {
        Tournament::new(
            ids.iter().copied().map(mon).collect(),
            Arena::new(640.0, 480.0),
            Pcg32::seed_from_u64(seed),
        )
        .unwrap()
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let err = Tournament::new(vec![mon(1), mon(2), mon(1)], Arena::new(640.0, 480.0), Pcg32::seed_from_u64(0))
            .err()
            .unwrap();
        assert_eq!(err, TournamentError::DuplicateId(1));

        let mut t = tournament(&[1, 2], 0);
        assert_eq!(t.enter(mon(2)), Err(TournamentError::DuplicateId(2)));
        assert!(t.enter(mon(3)).is_ok());
    }

    #[test]
    fn test_spin_needs_two() {
        let mut t = tournament(&[7], 1);
        assert_eq!(t.spin().err(), Some(TournamentError::NotEnoughContestants(1)));
        assert_eq!(t.pool().len(), 1);
    }

    #[test]
    fn test_spin_pulls_two_distinct() {
        let mut t = tournament(&[1, 2, 3, 4], 2);
        let m = t.spin().unwrap();
        assert_ne!(m.a.id, m.b.id);
        assert_eq!(t.pool().len(), 2);
        assert!(t.pool().iter().all(|c| c.id != m.a.id && c.id != m.b.id));
    }

    #[test]
    fn test_run_match_returns_winner_to_pool() {
        let mut t = tournament(&[1, 2, 3], 3);
        let m = t.spin().unwrap();
        let ids = [m.a.id, m.b.id];
        let record = t.run_match(m).unwrap();

        assert_eq!(t.pool().len(), 2);
        assert!(ids.contains(&record.winner_id));
        assert!(ids.contains(&record.loser_id));
        assert!(t.pool().iter().any(|c| c.id == record.winner_id));
        assert!(t.pool().iter().all(|c| c.id != record.loser_id));
        assert_eq!(t.eliminated().len(), 1);
        assert_eq!(t.eliminated()[0].id, record.loser_id);
        assert!(record.hits >= 5);
        assert_eq!(t.history().len(), 1);
    }

    #[test]
    fn test_timeout_returns_both() {
        let mut t = tournament(&[1, 2], 4);
        t.max_frames = 3;
        let m = t.spin().unwrap();
        let err = t.run_match(m).unwrap_err();
        assert!(matches!(err, TournamentError::Unfinished { frames: 3, .. }));
        assert_eq!(t.pool().len(), 2);
        assert!(t.history().is_empty());
        assert!(t.eliminated().is_empty());
    }

    #[test]
    fn test_run_to_champion() {
        let mut t = tournament(&[1, 2, 3, 4, 5], 5);
        let champion = t.run_to_champion().unwrap();
        assert!(t.pool().is_empty());
        assert_eq!(t.history().len(), 4);
        assert_eq!(t.eliminated().len(), 4);
        assert_eq!(t.history().last().unwrap().winner_id, champion.id);
    }

    /// Bulwarks can barely scratch each other: a bulwark-vs-bulwark battle
    /// needs 156 hits, far more than a short frame budget allows
    fn bulwark(id: u32, type_tag: &str) -> Contestant {
        Contestant::new(id, format!("bulwark-{id}"), type_tag, RawStats::from_values([1, 1, 255, 1, 1, 140]))
    }

    fn striker(id: u32) -> Contestant {
        Contestant::new(id, "striker", "", RawStats::from_values([255, 1, 255, 255, 255, 140]))
    }

    #[test]
    fn test_stalled_pairings_are_respun() {
        let mut stalls = 0;
        for seed in 0..24 {
            let pool = vec![bulwark(1, "normal"), bulwark(2, "ghost"), striker(3)];
            let mut t = Tournament::new(pool, Arena::new(400.0, 400.0), Pcg32::seed_from_u64(seed)).unwrap();
            // 30 s of battle time: enough for the striker, never for two bulwarks
            t.max_frames = 1800;

            let champion = t.run_to_champion().unwrap();
            assert_eq!(champion.id, 3, "seed {seed}");
            assert_eq!(t.eliminated().len(), 2);
            assert_eq!(t.history().len(), 2);
            stalls += t.stalled_matches();
        }
        assert!(stalls > 0);
    }

    #[test]
    fn test_too_many_stalls_in_a_row_aborts() {
        let mut t = tournament(&[1, 2, 3], 9);
        // Five hits need at least 880 ms of battle time; 50 frames is ~833 ms
        t.max_frames = 50;
        t.max_stalls = 3;

        let err = t.run_to_champion().unwrap_err();
        assert!(matches!(err, TournamentError::Unfinished { frames: 50, .. }));
        assert_eq!(t.stalled_matches(), 3);
        assert_eq!(t.pool().len(), 3);
        assert!(t.history().is_empty());
    }

    #[test]
    fn test_empty_pool_has_no_champion() {
        let mut t = tournament(&[], 6);
        assert_eq!(t.run_to_champion().err(), Some(TournamentError::NotEnoughContestants(0)));
    }
}
