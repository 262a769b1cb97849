//! Dice Roller entry point
//!
//! The browser build is driven from JavaScript through `platform::web`. The
//! native binary runs headless rolls and prints the outcomes.

#[cfg(not(target_arch = "wasm32"))]
mod cli {
    use std::path::PathBuf;

    use dice_roller::{DiceSim, Settings};

    /// Frames allowed per roll before giving up (one minute at 60 fps)
    const MAX_ROLL_FRAMES: u32 = 3600;

    const USAGE: &str = "usage: dice-roller [--seed N] [--rolls N] [--speed X] [--fps N] [--config FILE]";

    struct Args {
        seed: Option<u64>,
        rolls: u32,
        speed: Option<String>,
        fps: f32,
        config: Option<PathBuf>,
    }

    fn parse_args() -> Result<Args, String> {
        let mut args = Args {
            seed: None,
            rolls: 1,
            speed: None,
            fps: 60.0,
            config: None,
        };
        let mut iter = std::env::args().skip(1);
        while let Some(flag) = iter.next() {
            if flag == "--help" || flag == "-h" {
                return Err(USAGE.to_string());
            }
            let value = iter
                .next()
                .ok_or_else(|| format!("missing value for {flag}\n{USAGE}"))?;
            match flag.as_str() {
                "--seed" => args.seed = Some(value.parse().map_err(|_| format!("bad seed: {value}"))?),
                "--rolls" => args.rolls = value.parse().map_err(|_| format!("bad roll count: {value}"))?,
                "--speed" => args.speed = Some(value),
                "--fps" => {
                    args.fps = value
                        .parse::<f32>()
                        .ok()
                        .filter(|fps| fps.is_finite() && *fps > 0.0)
                        .ok_or_else(|| format!("bad fps: {value}"))?
                }
                "--config" => args.config = Some(PathBuf::from(value)),
                _ => return Err(format!("unknown flag {flag}\n{USAGE}")),
            }
        }
        Ok(args)
    }

    pub fn run() -> Result<(), String> {
        let args = parse_args()?;

        let mut settings = match &args.config {
            Some(path) => Settings::load(path).map_err(|e| format!("{}: {e}", path.display()))?,
            None => Settings::default(),
        };
        if args.seed.is_some() {
            settings.seed = args.seed;
        }

        let mut sim = DiceSim::from_settings(&settings).map_err(|e| e.to_string())?;
        if let Some(raw) = &args.speed {
            sim.set_speed(raw);
        }
        log::info!("seed {} speed {}", sim.seed, sim.speed_label());

        let frame_dt = 1.0 / args.fps;
        for n in 1..=args.rolls {
            let start = sim.frames();
            match sim.run_roll(frame_dt, MAX_ROLL_FRAMES) {
                Some(value) => println!("roll {n}: {value} ({} frames)", sim.frames() - start),
                None => println!("roll {n}: did not settle within {MAX_ROLL_FRAMES} frames"),
            }
        }

        let history = sim.history();
        if history.total() > 1 {
            println!("\n{} rolls (seed {})", history.total(), sim.seed);
            for value in 1..=6 {
                println!(
                    "  {value}: {:>4}  {:>5.1}%",
                    history.count(value),
                    history.frequency(value) * 100.0
                );
            }
        }
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    if let Err(message) = cli::run() {
        eprintln!("{message}");
        std::process::exit(2);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is platform::web::start, this is just to satisfy the compiler
}
