mod config;
mod output;

use std::env;
use std::path::PathBuf;
use std::process;
use std::str::FromStr;

use clap::{Parser, Subcommand};
use log::LevelFilter;
use ringplan_core::render::Renderer;
use ringplan_core::{Generator, Options, Plan, TimeOfDay};
use thiserror::Error;

use crate::config::{Config, ConfigError};
use crate::output::TableRenderer;

#[derive(Debug, Parser)]
#[clap(version, about)]
pub struct Args {
    /// Path to a TOML config file.
    #[clap(short, long)]
    config: Option<PathBuf>,
    /// Overrides the log level of the config and `RUST_LOG`.
    #[clap(long)]
    log_level: Option<LevelFilter>,
    /// Print JSON instead of tables.
    #[clap(long)]
    json: bool,
    #[clap(short, long)]
    rings: Option<u32>,
    #[clap(short = 'n', long)]
    competitors: Option<u32>,
    /// Average duration of a match in minutes.
    #[clap(short, long)]
    match_minutes: Option<u32>,
    /// Start of the competition as HH:MM.
    #[clap(long)]
    start: Option<TimeOfDay>,
    /// End of the competition as HH:MM.
    #[clap(long)]
    end: Option<TimeOfDay>,
    #[clap(long)]
    min_group_size: Option<u32>,
    #[clap(long)]
    max_group_size: Option<u32>,
    /// Moves a match onto another ring after scheduling, as MATCH_ID=RING.
    #[clap(long = "ring-override")]
    ring_overrides: Vec<RingOverride>,
    #[clap(subcommand)]
    command: Command,
}

impl Args {
    /// Applies all options given on the command line onto `options`.
    fn apply(&self, options: &mut Options) {
        if let Some(rings) = self.rings {
            options.rings = rings;
        }

        if let Some(competitors) = self.competitors {
            options.competitors = competitors;
        }

        if let Some(match_minutes) = self.match_minutes {
            options.match_minutes = match_minutes;
        }

        if let Some(start) = self.start {
            options.start = start;
        }

        if let Some(end) = self.end {
            options.end = end;
        }

        if let Some(min) = self.min_group_size {
            options.min_group_size = min;
        }

        if let Some(max) = self.max_group_size {
            options.max_group_size = max;
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Prints the time window and the match capacity.
    Capacity,
    /// Builds and schedules the single elimination bracket.
    Bracket,
    /// Builds and schedules the group stage and play-off.
    Groups,
    /// Builds and schedules both plans.
    Generate,
}

impl Command {
    pub fn run(&self, args: &Args, options: Options) -> Result<String, Error> {
        let generator = Generator::new(options)?;

        match self {
            Self::Capacity => {
                if args.json {
                    return Ok(serde_json::to_string_pretty(generator.capacity())?);
                }

                let mut renderer = TableRenderer::new();
                renderer.capacity(generator.capacity());
                Ok(renderer.finish())
            }
            Self::Bracket | Self::Groups => {
                let mut plan = match self {
                    Self::Bracket => generator.bracket()?,
                    _ => generator.groups()?,
                };

                apply_overrides(&mut [&mut plan], &args.ring_overrides)?;

                if args.json {
                    return Ok(serde_json::to_string_pretty(&plan)?);
                }

                let mut renderer = TableRenderer::new();
                renderer.render(&plan);
                Ok(renderer.finish())
            }
            Self::Generate => {
                let mut generation = generator.generate()?;

                apply_overrides(
                    &mut [&mut generation.bracket, &mut generation.group],
                    &args.ring_overrides,
                )?;

                if args.json {
                    return Ok(serde_json::to_string_pretty(&generation)?);
                }

                let mut renderer = TableRenderer::new();
                renderer.capacity(&generation.capacity);
                renderer.blank();
                renderer.render(&generation.bracket);
                renderer.blank();
                renderer.render(&generation.group);
                Ok(renderer.finish())
            }
        }
    }
}

/// A ring override in the form `MATCH_ID=RING`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RingOverride {
    pub id: String,
    pub ring: u32,
}

impl FromStr for RingOverride {
    type Err = ParseOverrideError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (id, ring) = s
            .split_once('=')
            .ok_or_else(|| ParseOverrideError::MissingSeparator(s.to_owned()))?;

        let ring = ring
            .trim()
            .parse()
            .map_err(|_| ParseOverrideError::InvalidRing(ring.to_owned()))?;

        Ok(Self {
            id: id.trim().to_owned(),
            ring,
        })
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ParseOverrideError {
    #[error("expected MATCH_ID=RING, found {0:?}")]
    MissingSeparator(String),
    #[error("invalid ring {0:?}")]
    InvalidRing(String),
}

/// Applies `overrides` to every plan that contains the match. An override for a match that
/// exists in none of the plans is an error.
fn apply_overrides(plans: &mut [&mut Plan], overrides: &[RingOverride]) -> Result<(), Error> {
    for ov in overrides {
        let mut found = false;

        for plan in plans.iter_mut() {
            match plan.override_ring(&ov.id, ov.ring) {
                Ok(()) => found = true,
                Err(ringplan_core::Error::UnknownMatch(_)) => (),
                Err(err) => return Err(err.into()),
            }
        }

        if !found {
            return Err(ringplan_core::Error::UnknownMatch(ov.id.clone()).into());
        }
    }

    Ok(())
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Core(#[from] ringplan_core::Error),
    #[error("failed to load config: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

fn init_logger(config: &Config, args: &Args) {
    let mut builder = pretty_env_logger::formatted_builder();
    builder.filter_level(config.loglevel);

    if let Ok(filters) = env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }

    if let Some(level) = args.log_level {
        builder.filter_level(level);
    }

    builder.init();
}

fn load_config(args: &Args) -> Result<Config, Error> {
    let config = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };

    Ok(config.with_environment())
}

fn main() {
    let args = Args::parse();

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{}", err);
            process::exit(1);
        }
    };

    init_logger(&config, &args);

    let mut options = config.options;
    args.apply(&mut options);

    log::debug!("Using options: {:?}", options);

    match args.command.run(&args, options) {
        Ok(output) => print!("{}", output),
        Err(err) => {
            eprintln!("{}", err);
            process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use ringplan_core::{Generator, Options};

    use super::{apply_overrides, Args, Error, ParseOverrideError, RingOverride};

    #[test]
    fn test_ring_override_parse() {
        assert_eq!(
            "KO_31=2".parse::<RingOverride>(),
            Ok(RingOverride {
                id: String::from("KO_31"),
                ring: 2
            })
        );
        assert_eq!(
            "KO_31".parse::<RingOverride>(),
            Err(ParseOverrideError::MissingSeparator(String::from("KO_31")))
        );
        assert_eq!(
            "KO_31=x".parse::<RingOverride>(),
            Err(ParseOverrideError::InvalidRing(String::from("x")))
        );
    }

    #[test]
    fn test_args_apply() {
        let args = Args::parse_from([
            "ringplan",
            "--rings",
            "2",
            "-n",
            "13",
            "--end",
            "10:30",
            "--ring-override",
            "G_1=2",
            "groups",
        ]);

        let mut options = Options::default();
        args.apply(&mut options);

        assert_eq!(options.rings, 2);
        assert_eq!(options.competitors, 13);
        assert_eq!(options.end.to_string(), "10:30");
        assert_eq!(options.match_minutes, Options::default().match_minutes);
        assert_eq!(args.ring_overrides.len(), 1);
    }

    #[test]
    fn test_apply_overrides() {
        let generator = Generator::new(Options::default()).unwrap();
        let mut bracket = generator.bracket().unwrap();
        let mut group = generator.groups().unwrap();

        let overrides = [
            RingOverride {
                id: String::from("KO_1"),
                ring: 4,
            },
            RingOverride {
                id: String::from("G_1"),
                ring: 3,
            },
        ];
        apply_overrides(&mut [&mut bracket, &mut group], &overrides).unwrap();

        assert_eq!(bracket.get("KO_1").unwrap().ring, 4);
        assert_eq!(group.get("G_1").unwrap().ring, 3);

        let unknown = [RingOverride {
            id: String::from("X_1"),
            ring: 1,
        }];
        assert!(matches!(
            apply_overrides(&mut [&mut bracket], &unknown),
            Err(Error::Core(ringplan_core::Error::UnknownMatch(_)))
        ));
    }
}
