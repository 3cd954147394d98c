//! Headless simulator for the spin engine.
//!
//! Examples:
//!   wheelspin-cli spin --entries alice,bob,carol --seed 7
//!   wheelspin-cli spin --entries a,b --fps 30 --duration 3 --trace
//!   wheelspin-cli curve show
//!   wheelspin-cli curve add 0.3 0.9
//!   wheelspin-cli curve remove 2
//!   wheelspin-cli render --entries a,b,c --rotation 45
//!
//! Settings live in the platform data dir (`settings.json`); override with
//! `--settings <path>`. Logs go to stderr, filtered by `RUST_LOG` (default `info`).

mod paths;

use std::path::{Path, PathBuf};
use std::process;

use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use wheelspin::curve::ControlPoint;
use wheelspin::fmt::fmt_degrees;
use wheelspin::prelude::*;
use wheelspin::recording::DrawCommand;

use paths::AppPaths;

const DEFAULT_FPS: f64 = 60.0;

#[derive(Debug, Serialize)]
struct SpinOutcome {
    index: usize,
    label: String,
    rotation_deg: f64,
    frames: u64,
    seed: u64,
}

#[derive(Debug, Serialize)]
struct FrameTrace<'a> {
    frame: u64,
    t_ms: f64,
    rotation_deg: f64,
    progress: f64,
    index: Option<usize>,
    label: Option<&'a str>,
}

fn usage() -> ! {
    eprintln!("wheelspin-cli (headless prize wheel simulator)");
    eprintln!("Usage: wheelspin-cli [--settings path] <command> [args]\n");
    eprintln!("Commands:");
    eprintln!("  spin --entries a,b,c [--seed N] [--fps F] [--duration S] [--trace]");
    eprintln!("                              Run one spin and print the outcome as JSON");
    eprintln!("  curve show                  Print the speed curve");
    eprintln!("  curve reset                 Restore the default curve");
    eprintln!("  curve add <time> <speed>    Add a control point (values in 0..1)");
    eprintln!("  curve remove <index>        Remove an interior control point");
    eprintln!("  render --entries a,b,c [--rotation R] [--size WxH]");
    eprintln!("                              Print the recorded draw commands of one frame");
    eprintln!("  paths                       Show data directory and settings file path");
    process::exit(1);
}

fn fail(msg: &str) -> ! {
    eprintln!("{}", msg);
    process::exit(1);
}

fn parse_args() -> (Option<PathBuf>, Vec<String>) {
    let mut args: Vec<String> = std::env::args().skip(1).collect();
    if args.is_empty() {
        usage();
    }

    let mut settings = None;
    if args.len() >= 2 && args[0] == "--settings" {
        settings = Some(PathBuf::from(&args[1]));
        args.drain(0..2);
    }

    if args.is_empty() {
        usage();
    }

    (settings, args)
}

/// Remove `--name value` from `args` and return the value.
fn take_opt(args: &mut Vec<String>, name: &str) -> Option<String> {
    let pos = args.iter().position(|a| a == name)?;
    if pos + 1 >= args.len() {
        fail(&format!("{name} needs a value"));
    }
    let value = args.remove(pos + 1);
    args.remove(pos);
    Some(value)
}

fn take_flag(args: &mut Vec<String>, name: &str) -> bool {
    match args.iter().position(|a| a == name) {
        Some(pos) => {
            args.remove(pos);
            true
        }
        None => false,
    }
}

fn parse_num<T: std::str::FromStr>(raw: &str, what: &str) -> T {
    raw.parse()
        .unwrap_or_else(|_| fail(&format!("{what} must be a number, got '{raw}'")))
}

fn parse_entries(raw: &str) -> Vec<WheelEntry> {
    let labels: Vec<&str> = raw.split(',').map(str::trim).filter(|s| !s.is_empty()).collect();
    if labels.is_empty() {
        fail("--entries needs at least one label");
    }
    entries_from_labels(labels)
}

fn settings_path(explicit: Option<PathBuf>) -> PathBuf {
    explicit.unwrap_or_else(|| match AppPaths::new() {
        Ok(p) => p.settings_file(),
        Err(e) => fail(&e),
    })
}

fn load_settings(path: &Path) -> SpinSettings {
    if !path.exists() {
        return SpinSettings::default();
    }
    match SpinSettings::load(path) {
        Ok(s) => s,
        Err(e) => {
            warn!(path = %path.display(), "ignoring unreadable settings: {e}");
            SpinSettings::default()
        }
    }
}

fn save_settings(path: &Path, settings: &SpinSettings) {
    if let Err(e) = settings.save(path) {
        fail(&format!("failed to save {}: {e}", path.display()));
    }
    info!(path = %path.display(), "settings saved");
}

fn clock_seed() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(1)
}

fn cmd_spin(mut args: Vec<String>, settings: SpinSettings) {
    let entries = parse_entries(&take_opt(&mut args, "--entries").unwrap_or_else(|| usage()));
    let seed = take_opt(&mut args, "--seed").map_or_else(clock_seed, |s| parse_num(&s, "seed"));
    let fps: f64 = take_opt(&mut args, "--fps").map_or(DEFAULT_FPS, |s| parse_num(&s, "fps"));
    if !(fps > 0.0 && fps <= 1000.0) {
        fail("fps must be in (0, 1000]");
    }
    let duration = take_opt(&mut args, "--duration").map(|s| parse_num::<f64>(&s, "duration"));
    let trace = take_flag(&mut args, "--trace");
    if let Some(extra) = args.first() {
        fail(&format!("unexpected argument '{extra}'"));
    }

    let mut engine = SpinEngine::new(settings);
    if let Some(d) = duration {
        engine.set_duration_s(d);
    }
    engine.set_entries(entries);

    let mut rng = Prng::new(seed);
    if let Err(e) = engine.spin(0.0, &mut rng) {
        fail(&e.to_string());
    }

    let dt = 1000.0 / fps;
    let mut frames = 0u64;
    let mut now = 0.0;
    let done = loop {
        frames += 1;
        now += dt;
        let report = engine.frame(now);
        if trace {
            let current = report.reading.map(|r| &engine.entries()[r.index]);
            let line = FrameTrace {
                frame: frames,
                t_ms: now,
                rotation_deg: report.rotation_deg,
                progress: report.progress.unwrap_or(1.0),
                index: report.reading.map(|r| r.index),
                label: current.map(|e| e.label.as_str()),
            };
            match serde_json::to_string(&line) {
                Ok(s) => println!("{s}"),
                Err(e) => fail(&format!("serialize: {e}")),
            }
        }
        if let Some(done) = report.completed {
            break done;
        }
    };

    let outcome = SpinOutcome {
        index: done.index,
        label: done.label,
        rotation_deg: engine.rotation_deg(),
        frames,
        seed,
    };
    match serde_json::to_string_pretty(&outcome) {
        Ok(s) => println!("{s}"),
        Err(e) => fail(&format!("serialize: {e}")),
    }
}

fn print_curve(settings: &SpinSettings) {
    let curve = &settings.curve;
    println!("duration={}s points={}", settings.duration_s, curve.len());
    for (i, p) in curve.points().iter().enumerate() {
        let pin = if curve.is_pinned(i) { " (pinned)" } else { "" };
        println!("  [{i}] time={:.3} speed={:.3}{pin}", p.time, p.speed);
    }
    let quarters: Vec<String> = [0.25, 0.5, 0.75]
        .iter()
        .map(|&t| format!("{t}:{:.3}", curve.normalized_position_at(t)))
        .collect();
    println!("area={:.4} position {}", curve.total_area(), quarters.join(" "));
}

fn cmd_curve(args: &[String], path: &Path, mut settings: SpinSettings) {
    let sub = args.first().map(String::as_str).unwrap_or_else(|| usage());
    match sub {
        "show" => print_curve(&settings),
        "reset" => {
            settings.curve.reset();
            save_settings(path, &settings);
            print_curve(&settings);
        }
        "add" => {
            if args.len() < 3 {
                usage();
            }
            let time: f64 = parse_num(&args[1], "time");
            let speed: f64 = parse_num(&args[2], "speed");
            if !(0.0..=1.0).contains(&time) || !(0.0..=1.0).contains(&speed) {
                fail("time and speed must be in 0..1");
            }
            let index = settings.curve.insert(ControlPoint::new(time, speed));
            info!(index, time, speed, "control point added");
            save_settings(path, &settings);
            print_curve(&settings);
        }
        "remove" => {
            if args.len() < 2 {
                usage();
            }
            let index: usize = parse_num(&args[1], "index");
            if !settings.curve.remove(index) {
                fail("only interior points can be removed");
            }
            save_settings(path, &settings);
            print_curve(&settings);
        }
        _ => fail("curve command must be show|reset|add|remove"),
    }
}

fn cmd_render(mut args: Vec<String>) {
    let entries = parse_entries(&take_opt(&mut args, "--entries").unwrap_or_else(|| usage()));
    let rotation: f64 = take_opt(&mut args, "--rotation").map_or(0.0, |s| parse_num(&s, "rotation"));
    let (w, h) = match take_opt(&mut args, "--size") {
        Some(s) => {
            let (w, h) = s.split_once('x').unwrap_or_else(|| fail("--size must be WxH"));
            (parse_num::<f64>(w, "width"), parse_num::<f64>(h, "height"))
        }
        None => (800.0, 500.0),
    };

    let mut renderer: WheelRenderer<RecordingSurface> = WheelRenderer::new(w, h);
    renderer.set_entries(&entries);
    let mut target = RecordingSurface::new(w, h);
    let stats = match renderer.render(&mut target, rotation) {
        Ok(s) => s,
        Err(e) => fail(&e.to_string()),
    };

    if let Some(layer) = renderer.cache_layer() {
        println!("cache pass: {} commands", layer.commands().len());
    }
    println!("frame pass: {} commands", target.commands().len());
    for cmd in target.commands() {
        match cmd {
            DrawCommand::Text { text, at, .. } => {
                println!("  text {:?} at ({:.1}, {:.1})", text, at.x, at.y)
            }
            DrawCommand::Layer { rotation_deg, .. } => {
                println!("  layer rotated {}", fmt_degrees(*rotation_deg))
            }
            other => println!("  {}", other.kind()),
        }
    }
    if let Some(r) = stats.reading {
        println!(
            "pointer: index={} label={:?} progress={:.3}",
            r.index, entries[r.index].label, r.segment_progress
        );
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let (explicit_settings, mut args) = parse_args();
    let cmd = args.remove(0);

    match cmd.as_str() {
        "spin" => {
            let path = settings_path(explicit_settings);
            cmd_spin(args, load_settings(&path));
        }
        "curve" => {
            let path = settings_path(explicit_settings);
            let settings = load_settings(&path);
            cmd_curve(&args, &path, settings);
        }
        "render" => cmd_render(args),
        "paths" => {
            let paths = AppPaths::new().unwrap_or_else(|e| fail(&e));
            println!("Data directory: {}", paths.data_dir().display());
            println!("Settings file: {}", paths.settings_file().display());
        }
        _ => usage(),
    }
}
