use anyhow::{Context, Result};
use backpack_common::snapshot::MemorySnapshot;
use backpack_engine::assets::AssetHandles;
use backpack_engine::config::EngineConfig;
use backpack_engine::engine::{CompletionReport, SolutionReport};
use backpack_engine::Engine;
use log::{info, warn};
use nalgebra::Vector2;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

#[derive(Clone, Debug)]
struct Config {
    config_file: PathBuf,
    output_file: PathBuf,
    memory_file: Option<PathBuf>,
    script_file: Option<PathBuf>,
}

fn parse_args() -> Result<Config> {
    use clap::{App, Arg};
    let matches = App::new("Backpack packer")
        .version(env!("CARGO_PKG_VERSION"))
        .author(clap::crate_authors!())
        .about("Replays a packing session against a container configuration")
        .arg(
            Arg::with_name("MEMORY")
                .long("memory")
                .value_name("MEMORY")
                .help("Memory snapshot from an earlier session, replaces the one in CONFIG"),
        )
        .arg(
            Arg::with_name("SCRIPT")
                .long("script")
                .value_name("SCRIPT")
                .help("JSON list of pointer, rotate, resize and reset steps"),
        )
        .arg(
            Arg::with_name("CONFIG")
                .help("Engine configuration, as JSON")
                .index(1)
                .required(true),
        )
        .arg(
            Arg::with_name("OUTPUT")
                .help("Output file location")
                .index(2)
                .required(true),
        )
        .get_matches();

    Ok(Config {
        config_file: PathBuf::from(
            matches
                .value_of_os("CONFIG")
                .ok_or_else(|| -> ! { unreachable!() })?,
        ),
        output_file: PathBuf::from(
            matches
                .value_of_os("OUTPUT")
                .ok_or_else(|| -> ! { unreachable!() })?,
        ),
        memory_file: matches.value_of_os("MEMORY").map(PathBuf::from),
        script_file: matches.value_of_os("SCRIPT").map(PathBuf::from),
    })
}

/// One scripted input. Positions are screen pixels, as a host would report them.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
enum Step {
    Down { x: f32, y: f32 },
    Move { x: f32, y: f32 },
    Up { x: f32, y: f32 },
    Rotate,
    Resize { width: f32, height: f32 },
    /// Advance the session clock, letting pending resizes settle
    Wait { ms: u64 },
    Reset,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Output {
    completion: CompletionReport,
    solution: SolutionReport,
}

fn replay<H>(engine: &mut Engine<H>, steps: &[Step], start: Instant) -> Result<()> {
    let mut now = start;

    for (i, step) in steps.iter().enumerate() {
        match *step {
            Step::Down { x, y } => {
                engine
                    .pointer_down(Vector2::new(x, y))
                    .with_context(|| format!("Step {}: press at ({}, {})", i, x, y))?;
            }
            Step::Move { x, y } => engine.pointer_move(Vector2::new(x, y)),
            Step::Up { x, y } => {
                let outcome = engine
                    .pointer_up(Vector2::new(x, y))
                    .with_context(|| format!("Step {}: release at ({}, {})", i, x, y))?;
                info!("Step {}: {:?}", i, outcome);
            }
            Step::Rotate => {
                if !engine.rotate()? {
                    warn!("Step {}: nothing rotated", i);
                }
            }
            Step::Resize { width, height } => engine.resize(width, height, now),
            Step::Wait { ms } => {
                now += Duration::from_millis(ms);
                engine.tick(now);
            }
            Step::Reset => engine.reset(),
        }
    }

    Ok(())
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path, what: &str) -> Result<T> {
    let inf = std::fs::File::open(path)
        .with_context(|| format!("Opening {} {}", what, path.display()))?;
    serde_json::from_reader(std::io::BufReader::new(inf))
        .with_context(|| format!("Parsing {} {}", what, path.display()))
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let config = parse_args()?;

    let mut engine_config: EngineConfig = read_json(&config.config_file, "configuration")?;
    if let Some(ref path) = config.memory_file {
        let memory: MemorySnapshot = read_json(path, "memory")?;
        engine_config.memory = Some(memory);
    }
    let steps: Vec<Step> = match config.script_file {
        Some(ref path) => read_json(path, "script")?,
        None => Vec::new(),
    };

    // No rendering here, so there are no asset handles to hand over
    let mut engine: Engine<()> = Engine::start(engine_config, AssetHandles::new())?;
    replay(&mut engine, &steps, Instant::now())?;

    let output = Output {
        solution: engine.validate_solution(),
        completion: engine.complete(),
    };
    info!(
        "Packed {} of {} items, score {}",
        output.completion.total_packed, output.completion.total_available, output.solution.score
    );

    {
        let outf = std::fs::File::create(&config.output_file)
            .with_context(|| format!("Creating {}", config.output_file.display()))?;

        serde_json::ser::to_writer_pretty(outf, &output)?;
    }

    Ok(())
}
