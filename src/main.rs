//! overlay-replay - replay recorded editor gestures and cut events.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use overlay_core::{load_script, BlockRender, EditorEvent, SessionSnapshot};

/// Replay an overlay editor session and print the resulting canvas state.
#[derive(Parser, Debug)]
#[command(name = "overlay-replay")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Replay script (JSON)
    #[arg(short, long)]
    input: PathBuf,

    /// Mount the viewport at this size before the scripted events, e.g. 1600x900
    #[arg(long, value_parser = parse_viewport)]
    viewport: Option<(f64, f64)>,

    /// Render the cut visualizer this many milliseconds after replay start
    #[arg(long, default_value = "0")]
    at_ms: u64,

    /// Output state as JSON
    #[arg(long)]
    json: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn parse_viewport(value: &str) -> std::result::Result<(f64, f64), String> {
    let (width, height) = value
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{}'", value))?;
    let width: f64 = width
        .trim()
        .parse()
        .map_err(|_| format!("invalid width '{}'", width))?;
    let height: f64 = height
        .trim()
        .parse()
        .map_err(|_| format!("invalid height '{}'", height))?;
    if width <= 0.0 || height <= 0.0 {
        return Err(format!("viewport must be positive, got {}x{}", width, height));
    }
    Ok((width, height))
}

fn default_log_level(verbose: bool) -> &'static str {
    if verbose {
        "debug"
    } else {
        "info"
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging; RUST_LOG wins over the verbose flag
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_log_level(args.verbose)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    info!("Replaying: {}", args.input.display());

    let mut script = load_script(&args.input)
        .with_context(|| format!("Failed to load {}", args.input.display()))?;

    if let Some((width, height)) = args.viewport {
        script.events.insert(0, EditorEvent::Mount { width, height });
    }

    if !script
        .events
        .iter()
        .any(|event| matches!(event, EditorEvent::Mount { .. }))
    {
        warn!("Script never mounts the viewport; initial zoom will not be applied");
    }

    let (session, handled) = script.run_session();
    let ignored = script.events.len() - handled;
    if ignored > 0 {
        info!("{} event(s) ignored", ignored);
    }

    let start = Instant::now();
    let at = Duration::from_millis(args.at_ms);
    let (visualizer, stats) = script.run_cuts(start, at);
    if stats.rejected > 0 {
        warn!("{} cut event(s) rejected", stats.rejected);
    }
    let blocks = visualizer.render(start + at);

    let snapshot = session.snapshot();
    if args.json {
        let output = serde_json::json!({
            "session": snapshot,
            "grid": visualizer.grid(),
            "cuts": stats,
            "blocks": blocks,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print_summary(&snapshot, &blocks, args.at_ms);
    }

    Ok(())
}

fn print_summary(snapshot: &SessionSnapshot, blocks: &[BlockRender], at_ms: u64) {
    let t = snapshot.transform;
    println!("Canvas:    {}", snapshot.canvas.summary());
    println!(
        "Viewport:  ({:.1}, {:.1}) at {}",
        t.position_x,
        t.position_y,
        t.zoom_percent()
    );
    match snapshot.saved_position {
        Some(saved) => println!("Saved:     ({:.1}, {:.1})", saved.x, saved.y),
        None => println!("Saved:     none"),
    }
    println!(
        "State:     {:?}{}{}{}",
        snapshot.init_state,
        if snapshot.resizing { ", resizing" } else { "" },
        if snapshot.editing { ", editing" } else { "" },
        if snapshot.fullscreen { ", fullscreen" } else { "" },
    );

    println!("Blocks at {} ms: {}", at_ms, blocks.len());
    for block in blocks {
        println!(
            "  ({}, {}) {:?} {:?} opacity {:.2} color {}",
            block.row,
            block.column,
            block.quality,
            block.direction,
            block.opacity,
            block.colors.note
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_viewport() {
        assert_eq!(parse_viewport("1600x900"), Ok((1600.0, 900.0)));
        assert_eq!(parse_viewport("800X600"), Ok((800.0, 600.0)));
        assert!(parse_viewport("1600").is_err());
        assert!(parse_viewport("0x900").is_err());
        assert!(parse_viewport("axb").is_err());
    }

    #[test]
    fn test_default_log_level() {
        assert_eq!(default_log_level(true), "debug");
        assert_eq!(default_log_level(false), "info");
    }

    #[test]
    fn test_args_parse() {
        let args = Args::try_parse_from([
            "overlay-replay",
            "--input",
            "session.json",
            "--viewport",
            "1280x720",
            "--at-ms",
            "150",
        ])
        .unwrap();
        assert_eq!(args.viewport, Some((1280.0, 720.0)));
        assert_eq!(args.at_ms, 150);
        assert!(!args.json);
    }
}
