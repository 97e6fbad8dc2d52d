//! Command-line run of a full tournament.
//! Run with: cargo run --bin simulate [roster.json|roster.csv]
//! Env: ROSTER (roster path if no argument), SIM_SEED (u64 for a reproducible run),
//! SNAPSHOT_OUT (write the JSON snapshot here), plus the SIM_* settings read by
//! `SimConfig::from_env`.

use std::error::Error;
use world_cup_sim::{
    build_tournament, entropy_rng, fallback_roster, load_roster, seeded_rng, simulate_tournament,
    snapshot_json, LogSink, SimConfig,
};

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = SimConfig::from_env();
    let roster = match std::env::args().nth(1).or_else(|| std::env::var("ROSTER").ok()) {
        Some(path) => load_roster(path)?,
        None => {
            log::info!("No roster given, using built-in teams");
            fallback_roster()
        }
    };
    let mut rng = match std::env::var("SIM_SEED").ok().and_then(|s| s.parse::<u64>().ok()) {
        Some(seed) => {
            log::info!("Using seed {}", seed);
            seeded_rng(seed)
        }
        None => entropy_rng(),
    };

    let mut sink = LogSink::from_config(&config);
    let mut tournament = build_tournament(&roster, config)?;
    let champion = simulate_tournament(&mut tournament, &mut rng, &mut sink)?;
    println!("\nChampion: {}", tournament.team(champion)?.name);

    if let Ok(out) = std::env::var("SNAPSHOT_OUT") {
        std::fs::write(&out, snapshot_json(&tournament)?)?;
        log::info!("Snapshot written to {}", out);
    }
    Ok(())
}
