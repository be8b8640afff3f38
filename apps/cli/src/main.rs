#![deny(warnings)]

//! Headless driver: replays a JSON-lines command script against a simulated
//! clock and prints the final pet snapshot.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use pet_core::{validate_config, PetConfig};
use pet_runtime::{Clock, Command, ManualClock, Outcome, PetController, SystemClock};
use persistence::{FileStore, Store};
use serde::Deserialize;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const STEP_MS: i64 = 100;
const USAGE: &str = "usage: pet-cli [--config path] [--state-dir dir] [--script file] [--seconds n] [--seed n]";

struct Args {
    config: Option<PathBuf>,
    state_dir: PathBuf,
    script: Option<PathBuf>,
    seconds: u64,
    seed: Option<u64>,
}

fn parse_args() -> Result<Args> {
    let mut args = Args {
        config: None,
        state_dir: PathBuf::from(".tartaruguinha"),
        script: None,
        seconds: 0,
        seed: None,
    };
    let mut it = std::env::args().skip(1);
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--config" => args.config = it.next().map(PathBuf::from),
            "--state-dir" => {
                args.state_dir = it.next().map(PathBuf::from).context("--state-dir needs a value")?
            }
            "--script" => args.script = it.next().map(PathBuf::from),
            "--seconds" => {
                args.seconds = it
                    .next()
                    .and_then(|s| s.parse().ok())
                    .context("--seconds needs a number")?
            }
            "--seed" => args.seed = it.next().and_then(|s| s.parse().ok()),
            "-h" | "--help" => {
                println!("{USAGE}");
                std::process::exit(0);
            }
            other => bail!("unknown argument {other:?}\n{USAGE}"),
        }
    }
    Ok(args)
}

/// YAML config from `path`; a missing file means defaults.
fn load_config(path: Option<&Path>) -> Result<PetConfig> {
    let cfg = match path {
        Some(p) if p.exists() => {
            let text =
                fs::read_to_string(p).with_context(|| format!("reading {}", p.display()))?;
            serde_yaml::from_str(&text).with_context(|| format!("parsing {}", p.display()))?
        }
        Some(p) => {
            warn!(path = %p.display(), "config file not found, using defaults");
            PetConfig::default()
        }
        None => PetConfig::default(),
    };
    validate_config(&cfg)?;
    Ok(cfg)
}

/// One script line: a command plus an optional delay before it.
#[derive(Debug, Deserialize)]
struct ScriptLine {
    #[serde(default)]
    after_ms: u64,
    #[serde(flatten)]
    cmd: Command,
}

fn parse_script(text: &str) -> Result<Vec<ScriptLine>> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| {
            let line = line.trim();
            !line.is_empty() && !line.starts_with('#')
        })
        .map(|(i, line)| {
            serde_json::from_str(line).with_context(|| format!("script line {}", i + 1))
        })
        .collect()
}

fn report(outcome: &Outcome) {
    for notice in &outcome.notices {
        info!(emote = notice.emote.glyph(), "{}", notice.text);
    }
    if let Some(rejection) = &outcome.rejected {
        warn!(%rejection, "command rejected");
    }
}

/// Move the clock forward in small steps, pumping the timers after each.
fn run_for<S: Store>(ctl: &mut PetController<S, ManualClock>, clock: &ManualClock, ms: u64) {
    let mut left = i64::try_from(ms).unwrap_or(i64::MAX);
    while left > 0 {
        let step = left.min(STEP_MS);
        clock.advance_ms(step);
        report(&ctl.pump());
        left -= step;
    }
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args = parse_args()?;
    let mut cfg = load_config(args.config.as_deref())?;
    if args.seed.is_some() {
        cfg.rng_seed = args.seed;
    }
    let script = match &args.script {
        Some(p) => parse_script(
            &fs::read_to_string(p).with_context(|| format!("reading {}", p.display()))?,
        )?,
        None => Vec::new(),
    };
    info!(
        state_dir = %args.state_dir.display(),
        commands = script.len(),
        seconds = args.seconds,
        "starting pet-cli"
    );

    let store = FileStore::open(&args.state_dir)
        .with_context(|| format!("opening {}", args.state_dir.display()))?;
    let clock = ManualClock::new(SystemClock.now_ms());
    let mut ctl = PetController::start(store, clock.clone(), cfg);

    for line in script {
        run_for(&mut ctl, &clock, line.after_ms);
        report(&ctl.dispatch(line.cmd));
    }
    run_for(&mut ctl, &clock, args.seconds.saturating_mul(1_000));

    println!("{}", serde_json::to_string_pretty(&ctl.snapshot())?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn script_lines_carry_optional_delays() {
        let text = "# warm up\n{\"cmd\":\"pet\"}\n\n{\"cmd\":\"buy\",\"item\":\"Sabonete\",\"after_ms\":1500}\n";
        let lines = parse_script(text).unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].after_ms, 0);
        assert_eq!(lines[0].cmd, Command::Pet);
        assert_eq!(lines[1].after_ms, 1_500);
        assert_eq!(
            lines[1].cmd,
            Command::Buy {
                item: "Sabonete".into()
            }
        );
    }

    #[test]
    fn bad_script_line_reports_its_number() {
        let err = parse_script("{\"cmd\":\"pet\"}\n{\"cmd\":\"fly\"}").unwrap_err();
        assert!(format!("{err:#}").contains("script line 2"));
    }

    #[test]
    fn yaml_config_overrides_defaults() {
        let cfg: PetConfig =
            serde_yaml::from_str("timing:\n  autosave_ms: 5000\nrng_seed: 9\n").unwrap();
        assert_eq!(cfg.timing.autosave_ms, 5_000);
        assert_eq!(cfg.timing.tick_ms, 1_000);
        assert_eq!(cfg.rng_seed, Some(9));
        assert!(validate_config(&cfg).is_ok());
    }

    #[test]
    fn missing_config_file_means_defaults() {
        let cfg = load_config(Some(Path::new("/definitely/not/here.yaml"))).unwrap();
        assert_eq!(cfg, PetConfig::default());
    }
}
