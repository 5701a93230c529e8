//! Headless runner: plays an idle-mode session and reports how it went
//!
//! Usage: battle-arena [seed] [seconds] [--difficulty <casual|normal|hard>] [--json]
//!
//! Set `BATTLE_ARENA_TUNING` to a JSON file to override balance values.
//! With `--json` every presentation effect is printed as one JSON line.

use battle_arena::sim::{self, Effect, GamePhase, TickInput};
use battle_arena::{Difficulty, Tuning};

/// 60 Hz host frame
const FRAME_MS: u32 = 16;

struct Options {
    seed: u64,
    seconds: u32,
    difficulty: Option<Difficulty>,
    json: bool,
}

fn parse_args() -> Options {
    let mut options = Options {
        seed: 12345,
        seconds: 120,
        difficulty: None,
        json: false,
    };
    let mut positional = 0;
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--json" => options.json = true,
            "--difficulty" => {
                let name = args.next().unwrap_or_default();
                options.difficulty = Difficulty::from_str(&name);
                if options.difficulty.is_none() {
                    log::warn!("Unknown difficulty '{}', keeping tuning value", name);
                }
            }
            other => {
                match positional {
                    0 => options.seed = other.parse().unwrap_or(options.seed),
                    1 => options.seconds = other.parse().unwrap_or(options.seconds),
                    _ => log::warn!("Ignoring extra argument '{}'", other),
                }
                positional += 1;
            }
        }
    }
    options
}

fn emit(effects: &[Effect], json: bool) {
    if !json {
        return;
    }
    for effect in effects {
        match serde_json::to_string(effect) {
            Ok(line) => println!("{}", line),
            Err(e) => log::warn!("Cannot serialize effect: {}", e),
        }
    }
}

fn main() {
    #[cfg(not(target_arch = "wasm32"))]
    env_logger::init();

    let options = parse_args();
    let mut tuning = match std::env::var("BATTLE_ARENA_TUNING") {
        Ok(path) => Tuning::load(path),
        Err(_) => Tuning::default(),
    };
    if let Some(difficulty) = options.difficulty {
        tuning.apply_difficulty(difficulty);
    }

    log::info!(
        "Battle Arena (headless) starting: seed {}, {}s, {}",
        options.seed,
        options.seconds,
        tuning.difficulty.as_str()
    );

    let (mut state, effects) = sim::start(options.seed, tuning);
    emit(&effects, options.json);

    let input = TickInput {
        idle_mode: true,
        ..Default::default()
    };
    let frames = options.seconds as u64 * 1000 / FRAME_MS as u64;
    let mut frames_run = 0;
    for _ in 0..frames {
        let effects = sim::tick(&mut state, &input, FRAME_MS);
        emit(&effects, options.json);
        frames_run += 1;
        if state.phase == GamePhase::GameOver {
            break;
        }
    }

    let summary = format!(
        "seed {} | {:.1}s | level {} | kills {} | health {} | damage {} | speed {} | shots {} | {:?}",
        state.seed,
        (frames_run * FRAME_MS as u64) as f32 / 1000.0,
        state.level,
        state.kills,
        state.player.health.max(0),
        state.player.damage,
        state.player.speed,
        state.player.base_shots,
        state.phase
    );
    log::info!("{}", summary);
    if !options.json {
        println!("{}", summary);
    }
}
