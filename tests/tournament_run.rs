//! Elimination runs over the bundled sample roster

use std::collections::HashSet;

use rand::SeedableRng;
use rand_pcg::Pcg32;
use wheel_clash::roster::load_roster;
use wheel_clash::{Arena, BattleTuning, Tournament, TournamentError};

fn sample_roster() -> Vec<wheel_clash::Contestant> {
    load_roster(concat!(env!("CARGO_MANIFEST_DIR"), "/data/roster.json")).unwrap()
}

#[test]
fn sample_roster_loads() {
    let roster = sample_roster();
    assert_eq!(roster.len(), 8);
    let ids: HashSet<u32> = roster.iter().map(|c| c.id).collect();
    assert_eq!(ids.len(), 8);
    // String-typed stats parse like numbers
    let snorlax = roster.iter().find(|c| c.name == "Snorlax").unwrap();
    assert_eq!(wheel_clash::derive_battle_stats(&snorlax.stats).hp, 160);
}

#[test]
fn every_contestant_is_accounted_for() {
    let roster = sample_roster();
    let all_ids: HashSet<u32> = roster.iter().map(|c| c.id).collect();

    let mut tournament = Tournament::new(roster, Arena::new(960.0, 540.0), Pcg32::seed_from_u64(2024)).unwrap();
    let champion = tournament.run_to_champion().unwrap();

    assert_eq!(tournament.history().len(), 7);
    assert_eq!(tournament.eliminated().len(), 7);
    assert!(tournament.pool().is_empty());

    let mut seen: HashSet<u32> = tournament.eliminated().iter().map(|c| c.id).collect();
    assert!(seen.insert(champion.id), "champion was also eliminated");
    assert_eq!(seen, all_ids);

    for (index, record) in tournament.history().iter().enumerate() {
        assert_eq!(record.round as usize, index + 1);
        assert!(record.hits >= 5);
        assert!(record.winner_hp > 0 && record.winner_hp <= record.winner_max_hp);
        assert_ne!(record.winner_id, record.loser_id);
    }
}

#[test]
fn same_seed_same_bracket() {
    let run = |seed| {
        let mut t = Tournament::new(sample_roster(), Arena::new(800.0, 600.0), Pcg32::seed_from_u64(seed)).unwrap();
        let champion = t.run_to_champion().unwrap();
        (champion.id, t.history().to_vec())
    };
    assert_eq!(run(7), run(7));
}

#[test]
fn custom_tuning_reaches_the_engine() {
    let tuning = BattleTuning {
        min_hits_to_end: 8,
        ..BattleTuning::default()
    };
    let mut t = Tournament::new(sample_roster(), Arena::new(800.0, 600.0), Pcg32::seed_from_u64(11))
        .unwrap()
        .with_tuning(tuning);
    t.run_to_champion().unwrap();
    assert!(t.history().iter().all(|r| r.hits >= 8));
}

#[test]
fn lone_contestant_cannot_battle() {
    let mut roster = sample_roster();
    roster.truncate(1);
    let mut t = Tournament::new(roster, Arena::new(800.0, 600.0), Pcg32::seed_from_u64(0)).unwrap();
    assert_eq!(t.spin().err(), Some(TournamentError::NotEnoughContestants(1)));
    // A single entry is already the champion
    assert_eq!(t.run_to_champion().unwrap().name, "Bulbasaur");
}

#[test]
fn evenly_matched_pools_always_crown_a_champion() {
    for seed in 0..40 {
        let pool = (1..=8)
            .map(|id| wheel_clash::Contestant::new(id, format!("m{id}"), "normal", wheel_clash::RawStats::from_values([60; 6])))
            .collect();
        let mut t = Tournament::new(pool, Arena::new(800.0, 600.0), Pcg32::seed_from_u64(seed)).unwrap();
        let champion = t.run_to_champion().unwrap_or_else(|err| panic!("seed {seed}: {err}"));
        assert_eq!(t.history().len(), 7);
        assert_eq!(t.eliminated().len(), 7);
        assert!((1..=8).contains(&champion.id));
    }
}
