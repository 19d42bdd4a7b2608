//! HashGuess Game Server
//!
//! Commit-reveal guessing game server. Secrets are sealed into hash
//! commitments before the first guess; every round resolution reveals the
//! secret and nonce so the client can verify nothing moved.

use tracing::{info, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use hashguess::{
    core::rng::DeterministicRng,
    game::{
        config::GameConfig,
        engine::{reset, start, submit_guess},
        projection::{outcome_message, start_message, GameView},
        state::GameState,
    },
    network::server::{GameServer, ServerConfig},
    FixedNonceClock, VERSION,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::default().add_directive(Level::INFO.into()));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("HashGuess Server v{}", VERSION);

    if std::env::args().any(|a| a == "demo") {
        demo_game()?;
        return Ok(());
    }

    let config = ServerConfig::from_env();
    let server = GameServer::new(config);
    server.run().await?;

    Ok(())
}

/// Demo function to exercise the engine end to end.
fn demo_game() -> anyhow::Result<()> {
    info!("=== Starting Demo Game ===");

    let config = GameConfig::new(10, 3)?;
    let rng_seed = 12345u64;
    let mut rng = DeterministicRng::new(rng_seed);
    let mut clock = FixedNonceClock::new(1_700_000_000_000_000);
    let mut state = GameState::new();

    info!("RNG Seed: {}", rng_seed);
    info!("Config: range={}, rounds={}", config.range, config.rounds);

    start(&mut state, config, &mut rng, &mut clock)?;
    info!("{}", start_message());

    for row in &GameView::of(&state).history {
        info!("Commitment #{}: {}", row.index + 1, row.hash);
    }

    // Scripted guesses, deliberately mixed
    let guesses = ["4", "7", "abc", "2"];
    for raw in guesses {
        match submit_guess(&mut state, raw) {
            Ok(outcome) => {
                info!("Guess {:>3}: {}", raw, outcome_message(&outcome));
                info!(
                    "  revealed secret={} nonce={} score={}/{}",
                    outcome.secret, outcome.nonce, outcome.score, outcome.rounds
                );
            }
            Err(e) => info!("Guess {:>3}: rejected ({})", raw, e),
        }
    }

    // Audit the revealed rounds against their commitments
    info!("=== Auditing Reveals ===");
    let mut verified = 0;
    for round in &state.rounds {
        let recomputed = hashguess::commit_hash(round.commitment.secret, &round.commitment.nonce);
        let ok = recomputed == round.commitment.hash;
        info!(
            "Round secret={} nonce={} hash={} verified={}",
            round.commitment.secret, round.commitment.nonce, round.commitment.hash, ok
        );
        if ok {
            verified += 1;
        }
    }
    info!("{}/{} commitments verified", verified, state.rounds.len());

    // Verify determinism by replaying with the same seed and clock
    info!("=== Verifying Determinism ===");
    let mut replay_rng = DeterministicRng::new(rng_seed);
    let mut replay_clock = FixedNonceClock::new(1_700_000_000_000_000);
    let mut replay_state = GameState::new();
    start(&mut replay_state, config, &mut replay_rng, &mut replay_clock)?;
    for raw in guesses {
        let _ = submit_guess(&mut replay_state, raw);
    }

    if replay_state == state {
        info!("DETERMINISM VERIFIED: Replay matches!");
    } else {
        info!("DETERMINISM FAILURE: Replay diverged!");
    }

    reset(&mut replay_state);
    info!("Reset: phase={:?}", GameView::of(&replay_state).phase);

    Ok(())
}
