//! Wheel Clash entry point
//!
//! Headless elimination run: loads a roster, spins the wheel and simulates
//! every battle frame by frame until a champion is left.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use wheel_clash::roster::load_roster;
use wheel_clash::{Arena, BattleTuning, Tournament};

#[derive(Debug, Parser)]
#[command(name = "wheel-clash", about = "Run an elimination wheel of arcade battles")]
struct Args {
    /// JSON roster file
    roster: PathBuf,

    /// Seed for the wheel and every battle (random if omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// JSON file overriding battle tuning
    #[arg(long)]
    tuning: Option<PathBuf>,

    /// Arena width in device pixels
    #[arg(long, default_value_t = 800.0)]
    width: f32,

    /// Arena height in device pixels
    #[arg(long, default_value_t = 600.0)]
    height: f32,

    /// Device pixel ratio
    #[arg(long, default_value_t = 1.0)]
    pixel_ratio: f32,

    /// Simulated frame time in milliseconds
    #[arg(long, default_value_t = wheel_clash::tournament::DEFAULT_FRAME_MS)]
    frame_ms: f32,

    /// Give up on a battle after this many frames
    #[arg(long, default_value_t = wheel_clash::tournament::DEFAULT_MAX_FRAMES)]
    max_frames: u32,

    /// Give up after this many unfinished battles in a row
    #[arg(long, default_value_t = wheel_clash::tournament::DEFAULT_MAX_STALLS)]
    max_stalls: u32,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let tuning = match &args.tuning {
        Some(path) => BattleTuning::load(path)?,
        None => BattleTuning::default(),
    };
    let roster = load_roster(&args.roster)?;

    let seed = args.seed.unwrap_or_else(rand::random);
    log::info!("Wheel Clash starting (seed {seed}, {} contestants)", roster.len());

    let arena = Arena::new(args.width, args.height).with_pixel_ratio(args.pixel_ratio);
    let mut tournament = Tournament::new(roster, arena, Pcg32::seed_from_u64(seed))
        .context("invalid roster")?
        .with_tuning(tuning);
    tournament.frame_ms = args.frame_ms;
    tournament.max_frames = args.max_frames;
    tournament.max_stalls = args.max_stalls;

    let champion = tournament.run_to_champion().context("tournament aborted")?;

    for record in tournament.history() {
        println!(
            "Round {:>3}: {} beat {} in {} hits ({}/{} HP left)",
            record.round,
            record.winner_name,
            record.loser_name,
            record.hits,
            record.winner_hp,
            record.winner_max_hp
        );
    }
    if tournament.stalled_matches() > 0 {
        println!("{} battles stalled and were spun again", tournament.stalled_matches());
    }
    println!("Champion: {} (seed {seed})", champion.name);

    Ok(())
}
