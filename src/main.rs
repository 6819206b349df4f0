use std::any::Any;
use std::env;
use std::panic::{self, AssertUnwindSafe};

use anyhow::{anyhow, Context, Result};
use log::{info, warn};
use winit::event_loop::EventLoop;

use prism_viewer::mesh::{self, check_half_length};
use prism_viewer::{DrawMode, PrismApp, PrismMesh, TransformController, WindowInitError};

const USAGE: &str = "Usage: prism-viewer <sides> [--half-length <h>] [--caps-only] [--summary-only]";
const DEFAULT_HALF_LENGTH: f32 = 0.5;
const SUMMARY_RIM_POINTS: u32 = 4;

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err:?}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let Some(options) = CliOptions::parse(env::args().skip(1))? else {
        println!("{USAGE}");
        return Ok(());
    };

    let half_length = check_half_length(options.half_length)?;
    let (mesh, mode) = if options.caps_only {
        (
            mesh::cap_polygon(options.sides)?,
            DrawMode::CapsOnly { half_length },
        )
    } else {
        (mesh::prism(options.sides, half_length)?, DrawMode::Solid)
    };
    print_summary(&mesh, mode);

    if options.summary_only {
        return Ok(());
    }

    match run_interactive(mesh, mode) {
        Ok(()) => Ok(()),
        Err(err) if err.downcast_ref::<WindowInitError>().is_some() => {
            eprintln!(
                "{err}. Falling back to --summary-only mode (set DISPLAY or WAYLAND_DISPLAY to enable rendering)."
            );
            Ok(())
        }
        Err(err) => Err(err),
    }
}

fn run_interactive(mesh: PrismMesh, mode: DrawMode) -> Result<()> {
    let default_hook = panic::take_hook();
    panic::set_hook(Box::new(|_| {}));
    let event_loop = panic::catch_unwind(AssertUnwindSafe(EventLoop::new));
    panic::set_hook(default_hook);
    let event_loop = event_loop
        .map_err(|panic| WindowInitError::new("event loop", panic_message(panic)))?
        .map_err(|err| WindowInitError::new("event loop", err))?;

    info!("opening viewer window");
    let mut app = PrismApp::new(mesh, mode, TransformController::default());
    event_loop
        .run_app(&mut app)
        .context("event loop terminated abnormally")?;

    match app.take_error() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

fn panic_message(panic: Box<dyn Any + Send>) -> String {
    match panic.downcast::<String>() {
        Ok(msg) => *msg,
        Err(panic) => match panic.downcast::<&'static str>() {
            Ok(msg) => (*msg).to_string(),
            Err(_) => "unknown panic".into(),
        },
    }
}

fn print_summary(mesh: &PrismMesh, mode: DrawMode) {
    match mode {
        DrawMode::Solid => println!(
            "Generated {}-sided prism (half length {:.2}): {} triangles, {} vertices",
            mesh.sides(),
            mesh.half_length(),
            mesh.triangle_count(),
            mesh.vertex_count()
        ),
        DrawMode::CapsOnly { half_length } => println!(
            "Generated {}-sided cap polygon drawn at z = +/-{:.2}: {} triangles, {} vertices",
            mesh.sides(),
            half_length,
            mesh.triangle_count(),
            mesh.vertex_count()
        ),
    }
    // the first triangles are (center, rim i, rim i + 1) in both layouts
    for (index, triangle) in mesh
        .triangles()
        .iter()
        .take(SUMMARY_RIM_POINTS.min(mesh.sides()) as usize)
        .enumerate()
    {
        let rim = triangle.0[1].position;
        println!(
            " - rim {index}: ({:.2}, {:.2})",
            tidy_zero(rim.x),
            tidy_zero(rim.y)
        );
    }
}

/// Keeps values like `cos(90°)` from printing as `-0.00`.
fn tidy_zero(value: f32) -> f32 {
    if value.abs() < 0.005 {
        0.0
    } else {
        value
    }
}

struct CliOptions {
    sides: u32,
    half_length: f32,
    caps_only: bool,
    summary_only: bool,
}

impl CliOptions {
    /// Returns `Ok(None)` when usage should be printed instead of running.
    fn parse(mut args: impl Iterator<Item = String>) -> Result<Option<Self>> {
        let mut sides = None;
        let mut extra_positional = false;
        let mut half_length = DEFAULT_HALF_LENGTH;
        let mut caps_only = false;
        let mut summary_only = false;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--caps-only" => caps_only = true,
                "--summary-only" => summary_only = true,
                "--half-length" => {
                    let value = args
                        .next()
                        .ok_or_else(|| anyhow!("--half-length expects a value"))?;
                    half_length = value
                        .parse::<f32>()
                        .with_context(|| format!("invalid half length {value:?}"))?;
                }
                "-h" | "--help" => return Ok(None),
                other if other.starts_with("--") => {
                    return Err(anyhow!(
                        "Unknown argument: {other}. Expected --half-length, --caps-only or --summary-only"
                    ));
                }
                other if sides.is_none() => {
                    let count = other
                        .parse::<i64>()
                        .with_context(|| format!("invalid side count {other:?}"))?;
                    sides = Some(mesh::side_count(count)?);
                }
                other => {
                    warn!("unexpected extra argument {other:?}");
                    extra_positional = true;
                }
            }
        }

        if extra_positional {
            return Ok(None);
        }
        Ok(sides.map(|sides| Self {
            sides,
            half_length,
            caps_only,
            summary_only,
        }))
    }
}
