use argh::FromArgs;
use chrono::{DateTime, Utc};

use crate::common::types::*;
use crate::common::color::*;


/// Default settings file
fn default_settings_file() -> String {
    "./settings.yaml".to_string()
}

/// Default route name
fn default_route_name() -> String {
    "Unnamed route".to_string()
}

/// Parses RFC 3339 timestamps
fn parse_timestamp(value: &str) -> Result<Timestamp, String> {
    DateTime::parse_from_rfc3339(value)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|err| format!("Invalid timestamp '{}': {}", value, err))
}

/// Top-level commands
#[derive(FromArgs, PartialEq, Debug)]
pub struct TopLevelCommands {
    /// settings file (default: ./settings.yaml)
    #[argh(option, default = "default_settings_file()")]
    pub settings: String,

    /// log debug output to stderr
    #[argh(switch, short = 'v')]
    pub verbose: bool,

    #[argh(subcommand)]
    pub inner_enum: MySubCommandEnum,
}

#[derive(FromArgs, PartialEq, Debug)]
#[argh(subcommand)]
pub enum MySubCommandEnum {
    SubCommandDecode(CLIArgsDecode),
    SubCommandEncode(CLIArgsEncode),
    SubCommandRoute(CLIArgsRoute),
    SubCommandSimplify(CLIArgsSimplify),
    SubCommandColorize(CLIArgsColorize),
}

/// Decode a polyline into `lat lng` lines
#[derive(FromArgs, PartialEq, Debug)]
#[argh(subcommand, name = "decode")]
pub struct CLIArgsDecode {
    /// encoded polyline
    #[argh(positional)]
    pub polyline: String,
}

/// Encode `lat lng` lines into a polyline
#[derive(FromArgs, PartialEq, Debug)]
#[argh(subcommand, name = "encode")]
pub struct CLIArgsEncode {
    /// file with `lat lng` lines
    #[argh(positional)]
    pub file: String,
}

/// Build route statistics from an activity stream
#[derive(FromArgs, PartialEq, Debug)]
#[argh(subcommand, name = "route")]
pub struct CLIArgsRoute {
    /// file with `lat lng [elevation [elapsed]]` lines
    #[argh(positional)]
    pub file: String,

    /// route name
    #[argh(option, default = "default_route_name()")]
    pub name: String,

    /// activity start time (RFC 3339)
    #[argh(option, from_str_fn(parse_timestamp))]
    pub start_time: Timestamp,

    /// elevation gain reported by the activity source, in meters
    #[argh(option)]
    pub elevation_gain: Option<Meters>,

    /// activity duration in seconds (default: 0)
    #[argh(option, default = "0.0")]
    pub duration: Seconds,

    /// distance reported by the activity source, in meters (default: computed)
    #[argh(option)]
    pub distance: Option<Meters>,

    /// fail when the stream has no points
    #[argh(switch)]
    pub require_points: bool,
}

/// Simplify a path of `lng lat [elevation]` lines
#[derive(FromArgs, PartialEq, Debug)]
#[argh(subcommand, name = "simplify")]
pub struct CLIArgsSimplify {
    /// file with `lng lat [elevation]` lines
    #[argh(positional)]
    pub file: String,

    /// distortion tolerance in coordinate units
    #[argh(option)]
    pub tolerance: Option<Coord>,

    /// target number of points (searches for a tolerance)
    #[argh(option)]
    pub target_count: Option<usize>,

    /// binary search refinements for --target-count
    #[argh(option)]
    pub max_iterations: Option<usize>,
}

/// Color mesh vertices of `elevation [clipped]` lines
#[derive(FromArgs, PartialEq, Debug)]
#[argh(subcommand, name = "colorize")]
pub struct CLIArgsColorize {
    /// file with `elevation [clipped]` lines, clipped being 0 or 1
    #[argh(positional)]
    pub file: String,

    /// gradient preset (terrain, alpine, desert, ocean, grayscale)
    #[argh(option, from_str_fn(get_gradient_preset))]
    pub gradient: Option<GradientPreset>,

    /// smoothness in [0, 1]
    #[argh(option)]
    pub smoothness: Option<f64>,
}
