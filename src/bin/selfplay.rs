use checkers::observation::Observation;
use checkers::{GameController, Outcome, RulesConfig};
use rand::rngs::StdRng;
use rand::seq::IteratorRandom;
use rand::SeedableRng;
use tracing_subscriber::EnvFilter;

const MAX_HALFMOVES: u32 = 400;

/// Plays uniformly random legal games through the observation/action API.
///
/// Usage: selfplay [games] [seed] [rules.json]
fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let mut args = std::env::args().skip(1);
    let games: usize = args.next().and_then(|s| s.parse().ok()).unwrap_or(10);
    let seed: u64 = args.next().and_then(|s| s.parse().ok()).unwrap_or(0);
    let config = match args.next() {
        Some(path) => match RulesConfig::load(&path) {
            Ok(config) => config,
            Err(err) => {
                tracing::error!(%path, "could not load rules: {err}");
                std::process::exit(1);
            }
        },
        None => RulesConfig::default(),
    };

    let mut rng = StdRng::seed_from_u64(seed);
    let (mut red, mut white, mut draws, mut unfinished) = (0, 0, 0, 0);

    for game_no in 0..games {
        let mut game = GameController::with_config(config.clone());
        let mut plies = 0;
        while !game.outcome().is_over() && plies < MAX_HALFMOVES {
            let obs = Observation::of(&game);
            let Some(action) = obs.legal_action_indices().choose(&mut rng) else {
                break;
            };
            match game.step(action) {
                Ok(true) => plies += 1,
                Ok(false) => {
                    tracing::error!(action, "mask offered an illegal action");
                    break;
                }
                Err(err) => {
                    tracing::error!("{err}");
                    break;
                }
            }
        }

        let outcome = game.outcome();
        match outcome {
            Outcome::Win(checkers::Color::Red) => red += 1,
            Outcome::Win(checkers::Color::White) => white += 1,
            Outcome::Draw(_) => draws += 1,
            Outcome::Playing => unfinished += 1,
        }
        tracing::info!(game = game_no + 1, plies, %outcome, "finished");
    }

    println!("{games} games: Red {red}, White {white}, draws {draws}, unfinished {unfinished}");
}
