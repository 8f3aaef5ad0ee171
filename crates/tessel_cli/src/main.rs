//! Tessel CLI
//!
//! Render, position and simulate canvas elements headlessly.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::cell::Cell;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use tessel_animation::{AnimationPhase, RecordingPlayer};
use tessel_core::{
    HostNode, ManualNode, ManualWindow, NodeRef, Rect, ScrollEvent, TimerScheduler,
};
use tessel_element::{
    resolve_position, DisplayMode, ElementCallbacks, ElementConfig, ElementView, Environment,
    InteractionFlags,
};

mod document;

use document::ElementDocument;

/// Simulated frame length between scroll steps
const FRAME_MS: u64 = 16;

#[derive(Parser)]
#[command(name = "tessel")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Tessel canvas element tools", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Mount an element and print its rendered view as JSON
    Render {
        /// Element document (JSON)
        document: PathBuf,

        /// Display mode (desktop, tablet, mobile)
        #[arg(short, long, default_value = "desktop")]
        display: String,

        /// Render in editing mode
        #[arg(short, long)]
        editing: bool,

        /// Render as selected (editing only)
        #[arg(long)]
        selected: bool,

        /// Render as focused (editing only)
        #[arg(long)]
        focused: bool,

        /// Element configuration (TOML)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Print the resolved position style of an element
    Position {
        /// Element document (JSON)
        document: PathBuf,

        /// Display mode (desktop, tablet, mobile)
        #[arg(short, long, default_value = "desktop")]
        display: String,
    },

    /// Scroll an element into view and report when it animates
    Simulate {
        /// Element document (JSON)
        document: PathBuf,

        /// Initial top of the element relative to the viewport
        #[arg(long, default_value = "1200")]
        start_top: f32,

        /// Pixels scrolled per step
        #[arg(long, default_value = "100")]
        step: f32,

        /// Viewport outer height
        #[arg(long, default_value = "800")]
        viewport: f32,

        /// Element configuration (TOML)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging; RUST_LOG applies unless -v is given
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    match cli.command {
        Commands::Render {
            document,
            display,
            editing,
            selected,
            focused,
            config,
        } => {
            let flags = InteractionFlags {
                editing,
                selected,
                focused,
                ..Default::default()
            };
            cmd_render(&document, &display, flags, config.as_deref())
        }

        Commands::Position { document, display } => cmd_position(&document, &display),

        Commands::Simulate {
            document,
            start_top,
            step,
            viewport,
            config,
        } => cmd_simulate(&document, start_top, step, viewport, config.as_deref()),
    }
}

fn load_config(path: Option<&Path>) -> Result<ElementConfig> {
    match path {
        Some(path) => Ok(ElementConfig::load(path)?),
        None => Ok(ElementConfig::default()),
    }
}

fn check_display(display_mode: &str) {
    if display_mode.parse::<DisplayMode>().is_err() {
        warn!("Unknown display mode '{}', position will be empty", display_mode);
    }
}

fn cmd_render(
    path: &Path,
    display_mode: &str,
    flags: InteractionFlags,
    config: Option<&Path>,
) -> Result<()> {
    let document = ElementDocument::load(path)?;
    let config = load_config(config)?;
    check_display(display_mode);

    let scheduler = TimerScheduler::new();
    let env = Environment::new(
        scheduler.handle(),
        Rc::new(ManualWindow::new(800.0)),
        Rc::new(RecordingPlayer::new()),
    )
    .with_config(config);

    let node = NodeRef::new(ManualNode::new(
        document.element.id.clone(),
        Rect::new(0.0, 0.0, document.height, 0.0),
    ));
    let view = ElementView::mount(
        document.props(display_mode, flags),
        ElementCallbacks::new(),
        node.clone(),
        &env,
    );
    // The host reports the tag node once it exists
    view.capture_ref(node);

    info!("Rendering {} ({})", document.element.id, display_mode);
    println!("{}", serde_json::to_string_pretty(&view.render())?);
    Ok(())
}

fn cmd_position(path: &Path, display_mode: &str) -> Result<()> {
    let document = ElementDocument::load(path)?;
    check_display(display_mode);

    let patch = resolve_position(&document.element, display_mode);
    println!("{}", serde_json::to_string_pretty(&patch)?);
    Ok(())
}

fn cmd_simulate(
    path: &Path,
    start_top: f32,
    step: f32,
    viewport: f32,
    config: Option<&Path>,
) -> Result<()> {
    let document = ElementDocument::load(path)?;
    let config = load_config(config)?;

    if step <= 0.0 {
        anyhow::bail!("Step must be positive, got {}", step);
    }
    let Some(animation) = document.animation.clone() else {
        anyhow::bail!("Element '{}' has no animation to simulate", document.element.id);
    };

    let scheduler = TimerScheduler::new();
    let player = Rc::new(RecordingPlayer::new());
    let env = Environment::new(
        scheduler.handle(),
        Rc::new(ManualWindow::new(viewport)),
        player.clone(),
    )
    .with_config(config);

    let node = Rc::new(ManualNode::new(
        document.element.id.clone(),
        Rect::new(start_top, 0.0, start_top + document.height, 0.0),
    ));

    let entered_at = Rc::new(Cell::new(None::<u64>));
    let started_at = Rc::new(Cell::new(None::<u64>));
    let callbacks = {
        let entered_at = Rc::clone(&entered_at);
        let started_at = Rc::clone(&started_at);
        let enter_clock = scheduler.handle();
        let start_clock = scheduler.handle();
        ElementCallbacks::new()
            .on_enter_screen(move || entered_at.set(Some(enter_clock.now_ms())))
            .on_start_animation(move || started_at.set(Some(start_clock.now_ms())))
    };

    let view = ElementView::mount(
        document.props("desktop", InteractionFlags::default()),
        callbacks,
        NodeRef::from_rc(node.clone()),
        &env,
    );

    let mut scroll_y = 0.0;
    while view.is_watching_viewport() && node.bounding_rect().bottom >= 0.0 {
        node.scroll_by(step);
        scroll_y += step;
        env.scroll.publish(&ScrollEvent { scroll_y });
        scheduler.advance(FRAME_MS);
    }
    scheduler.advance(animation.delay);

    match entered_at.get() {
        Some(at) => info!("Entered viewport at {}ms (scrolled {}px)", at, scroll_y),
        None => warn!("Element never entered the viewport"),
    }
    match (started_at.get(), player.last()) {
        (Some(at), Some(record)) => info!(
            "Animation started at {}ms: {:?} for {}ms",
            at, record.effect, record.options.duration
        ),
        _ => warn!("Animation did not start"),
    }

    println!(
        "{}",
        serde_json::json!({
            "element": document.element.id,
            "entered_at_ms": entered_at.get(),
            "started_at_ms": started_at.get(),
            "scrolled_px": scroll_y,
            "playbacks": player.count(),
            "triggered": view.animation_phase() == AnimationPhase::Triggered,
        })
    );

    view.unmount();
    Ok(())
}
