/// TECH3D Terminal Demo - Animated "TECH" block letters
///
/// Controls:
///   - SPACE: Start/stop animation, R: Reset
///   - 1/2/3 or P: Forward, reverse or manual path
///   - X/Y/Z: Rotation axis for the scripted stages
///   - [ ]: Letter spacing, ; ': Extrusion depth, , .: Speed
///   - M: Cycle color mode
///   - Manual path: WASD/E rotate, arrows move, +/- scale, Home recenters
///   - Q/ESC: Quit
///
/// Logging goes to stderr; run with `RUST_LOG=debug 2>tech3d.log` to keep
/// it out of the picture.
use clap::Parser;
use std::io;
use tech3d_core::{Axis, ColorMode, InputEvent, Path, ProjectionMode, Rgba, SceneConfig};
use tech3d_terminal::{Command, TerminalApp};

#[derive(Parser, Debug)]
#[command(version, about = "Extruded TECH letters in the terminal")]
struct Args {
    /// Animation speed (degrees per frame while rotating)
    #[arg(long)]
    speed: Option<f32>,

    /// Extrusion depth of the letters
    #[arg(long)]
    depth: Option<f32>,

    /// Gap between letters
    #[arg(long)]
    spacing: Option<f32>,

    /// Animation path: 1/forward, 2/reverse, 3/manual
    #[arg(long, default_value = "forward")]
    path: Path,

    /// Rotation axis for the scripted stages
    #[arg(long, default_value = "y")]
    axis: Axis,

    /// Single color for every letter, as #rrggbb
    #[arg(long)]
    color: Option<Rgba>,

    /// Use a perspective camera instead of the orthographic box
    #[arg(long)]
    perspective: bool,

    /// Start animating immediately
    #[arg(long)]
    play: bool,
}

fn main() -> io::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut config = SceneConfig::default();
    if let Some(speed) = args.speed {
        config.speed.default = config.speed.clamp(speed);
    }
    if let Some(depth) = args.depth {
        config.depth.default = config.depth.clamp(depth);
    }
    if let Some(spacing) = args.spacing {
        config.spacing.default = config.spacing.clamp(spacing);
    }
    if args.perspective {
        config.projection = ProjectionMode::Perspective;
    }
    log::info!("starting with {:?}", config);

    let mut app = TerminalApp::new(config)?;
    app.apply(Command::Input(InputEvent::SelectPath(args.path)));
    app.apply(Command::Input(InputEvent::SelectAxis(args.axis)));
    if let Some(color) = args.color {
        app.apply(Command::Input(InputEvent::SetSingleColor(color)));
        app.apply(Command::Input(InputEvent::SetColorMode(ColorMode::Single)));
    }
    if args.play {
        app.apply(Command::Input(InputEvent::ToggleAnimation));
    }

    app.run()?;

    println!("Thank you for using TECH3D Terminal!");
    Ok(())
}
