//! # routesculpt tool
//!
//! Turns GPS routes into simplified paths and colored terrain data
//! for map art and 3d printing.

use std::io::{stdout, BufWriter, Write};
use std::process::ExitCode;
use tracing::{debug, info};

use routesculpt::common::args::*;
use routesculpt::common::args::MySubCommandEnum::*;
use routesculpt::common::settings::*;
use routesculpt::common::types::*;
use routesculpt::common::util::*;
use routesculpt::input::polyline;
use routesculpt::input::stream::*;
use routesculpt::model::route::normalize;
use routesculpt::model::simplify::{simplify, simplify_to_count};
use routesculpt::model::terrain::colorize;


/// Writes lines to stdout
fn write_lines(lines: impl IntoIterator<Item = String>) -> Result<(), String> {
    let mut out = BufWriter::new(stdout().lock());
    for line in lines {
        writeln!(out, "{}", line).map_err(|err| format!("Can't write output: {}", err))?;
    }
    out.flush().map_err(|err| format!("Can't flush output: {}", err))
}

fn read_rows(filepath: &str, min_columns: usize, max_columns: usize) -> Result<Vec<Row>, String> {
    let file_content = read_lines(filepath)?;
    parse_rows(&file_content, min_columns, max_columns)
        .map_err(|err| format!("{}: {}", filepath, err))
}

fn run_route(args: &CLIArgsRoute) -> Result<(), String> {
    let stream = ActivityStream::load(&args.file)?;
    let summary = ActivitySummary {
        name: args.name.clone(),
        start_time: args.start_time,
        elevation_gain: args.elevation_gain,
        duration: args.duration,
        distance: args.distance,
    };
    let route = normalize(&summary, &stream, args.require_points).map_err(|err| err.to_string())?;
    info!(points = route.points().len(), "route normalized");
    write_lines([route.to_string()])
}

fn run_simplify(settings: &Settings, args: &CLIArgsSimplify) -> Result<(), String> {
    let SimplifySettings {tolerance, target_count, max_iterations} = settings.simplify_settings(args)?;
    let points: Vec<GeoPoint> = read_rows(&args.file, 2, 3)?
        .iter()
        .map(|row| match row.as_slice() {
            [lng, lat, h] => GeoPoint::with_elevation(*lng, *lat, *h),
            _ => GeoPoint::new(row[0], row[1]),
        })
        .collect();

    let simplified = match target_count {
        Some(n) => simplify_to_count(&points, n, max_iterations),
        None => simplify(&points, tolerance),
    };
    info!(input = points.len(), output = simplified.len(), "path simplified");

    write_lines(simplified.iter().map(|p| match p.elevation {
        Some(h) => format!("{} {} {}", p.longitude, p.latitude, h),
        None => format!("{} {}", p.longitude, p.latitude),
    }))
}

fn run_colorize(settings: &Settings, args: &CLIArgsColorize) -> Result<(), String> {
    let ColorizeSettings {gradient, smoothness, fallback_color} = settings.colorize_settings(args)?;
    let rows = read_rows(&args.file, 1, 2)?;
    let elevations: Vec<Height> = rows.iter().map(|row| row[0]).collect();
    let clipped_mask: Vec<bool> = rows.iter().map(|row| row.get(1).is_some_and(|c| *c!=0.0)).collect();

    let colors = colorize(&elevations, &clipped_mask, &gradient, smoothness, fallback_color);
    info!(vertices = colors.len(), "vertices colored");

    write_lines((0..colors.len()).filter_map(|i| colors.vertex(i)).map(|rgb| rgb.to_string()))
}

/// Runs the selected subcommand
fn run(tl_commands: &TopLevelCommands) -> Result<(), String> {
    let settings = Settings::load(&tl_commands.settings)?;
    debug!(settings = %tl_commands.settings, "settings loaded");

    match &tl_commands.inner_enum {
        SubCommandDecode(args) => {
            let points = polyline::decode(&args.polyline).map_err(|err| err.to_string())?;
            write_lines(points.iter().map(|(lat, lng)| format!("{} {}", lat, lng)))
        },
        SubCommandEncode(args) => {
            let points: Vec<LatLng> = read_rows(&args.file, 2, 2)?
                .iter()
                .map(|row| (row[0], row[1]))
                .collect();
            write_lines([polyline::encode(&points)])
        },
        SubCommandRoute(args) => run_route(args),
        SubCommandSimplify(args) => run_simplify(&settings, args),
        SubCommandColorize(args) => run_colorize(&settings, args),
    }
}

fn main() -> ExitCode {
    let tl_commands: TopLevelCommands = argh::from_env();

    let level = if tl_commands.verbose {tracing::Level::DEBUG} else {tracing::Level::INFO};
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    match run(&tl_commands) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}
