//! Terminal host for the overlay effects.
//!
//! Reads simulated host notifications and `/erfx` commands from stdin, runs
//! the animation at ~60 fps into an offscreen frame, and plays cues through
//! the default audio device.
//!
//! Run with: cargo run -p erfx-cli -- --assets ./assets

mod logging;
mod repl;

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use clap::Parser;
use erfx_core::audio::{AudioPlayer, NullPlayer, RodioPlayer};
use erfx_core::config::{ConfigStore, FileConfigStore, resolve_asset_dir};
use erfx_core::probes::FlagProbe;
use erfx_core::router::TokioScheduler;
use erfx_core::service::{ServiceDeps, TriggerService};
use erfx_core::SystemClock;
use erfx_overlay::SkiaOverlayRenderer;
use erfx_types::formatting::format_volume;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::JoinHandle;

use crate::repl::Input;

/// Frame interval of the render loop
const FRAME_INTERVAL: Duration = Duration::from_millis(16);

#[derive(Parser)]
#[command(version, about = "Elden Ring style overlay effects driven from stdin")]
struct Args {
    /// Directory holding the textures and sound cues
    #[arg(short, long)]
    assets: Option<PathBuf>,

    /// Settings file (defaults to the platform config directory)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Run without an audio device
    #[arg(long)]
    mute: bool,

    #[arg(long, default_value_t = 1280)]
    width: u32,

    #[arg(long, default_value_t = 720)]
    height: u32,
}

type SharedRenderer = Arc<Mutex<SkiaOverlayRenderer>>;

fn lock(renderer: &SharedRenderer) -> MutexGuard<'_, SkiaOverlayRenderer> {
    renderer.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[tokio::main]
async fn main() -> Result<(), String> {
    let args = Args::parse();
    let _log_guard = logging::init_logging();

    let config: Arc<dyn ConfigStore> = match &args.config {
        Some(path) => Arc::new(FileConfigStore::open_path(path)),
        None => Arc::new(FileConfigStore::open_default()),
    };

    let asset_dir = resolve_asset_dir(args.assets.as_deref());
    match &asset_dir {
        Some(dir) => tracing::info!(dir = %dir.display(), "Using asset directory"),
        None => tracing::warn!("No asset directory found, running without textures or sounds"),
    }

    let volume = config.settings().effective_volume();
    let audio = build_player(args.mute, asset_dir.as_deref(), volume);
    let sfx = FlagProbe::new(true);

    let service = Arc::new(TriggerService::new(ServiceDeps {
        config,
        audio,
        clock: Arc::new(SystemClock),
        scheduler: Arc::new(TokioScheduler::new(tokio::runtime::Handle::current())),
        sfx_probe: Arc::new(sfx.clone()),
    }));
    service.apply_settings();

    let mut renderer =
        SkiaOverlayRenderer::new(args.width, args.height).map_err(|e| e.to_string())?;
    if let Some(dir) = &asset_dir {
        renderer.load_assets(dir);
    }
    let renderer: SharedRenderer = Arc::new(Mutex::new(renderer));
    let frame_task = spawn_frame_loop(Arc::clone(&service), Arc::clone(&renderer));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.map_err(|e| e.to_string())? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match repl::parse_line(line) {
            Ok(Input::Exit) => break,
            Ok(input) => respond(input, &service, &sfx, &renderer),
            Err(err) => println!("{err}"),
        }
    }

    frame_task.abort();
    Ok(())
}

fn build_player(mute: bool, asset_dir: Option<&Path>, volume: f32) -> Arc<dyn AudioPlayer> {
    if mute {
        return Arc::new(NullPlayer::new());
    }

    match RodioPlayer::new(volume) {
        Ok(player) => {
            if let Some(dir) = asset_dir {
                player.load_cues(dir);
            }
            Arc::new(player)
        }
        Err(e) => {
            tracing::error!(error = %e, "Audio unavailable, continuing muted");
            Arc::new(NullPlayer::new())
        }
    }
}

fn spawn_frame_loop(service: Arc<TriggerService>, renderer: SharedRenderer) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(FRAME_INTERVAL);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        loop {
            interval.tick().await;
            service.draw(&mut *lock(&renderer));
        }
    })
}

fn respond(input: Input, service: &TriggerService, sfx: &FlagProbe, renderer: &SharedRenderer) {
    match input {
        Input::Chat(args) => {
            let reply = service.on_command(&args);
            if reply.is_error {
                println!("error: {}", reply.text);
            } else {
                println!("{}", reply.text);
            }
            if reply.open_settings {
                print_settings(service);
            }
        }
        Input::Host(event) => {
            for outcome in service.on_host_event(&event) {
                if outcome.is_empty() {
                    continue;
                }
                println!(
                    "overlay: {:?}, cue: {:?}{}",
                    outcome.animation,
                    outcome.audio,
                    if outcome.scheduled { " (scheduled)" } else { "" }
                );
            }
        }
        Input::Sfx(enabled) => {
            sfx.set(enabled);
            println!("Host SFX {}", if enabled { "on" } else { "off" });
        }
        Input::Snapshot(path) => match lock(renderer).pixmap().save_png(&path) {
            Ok(()) => println!("Saved frame to {}", path.display()),
            Err(e) => println!("error: failed to save frame: {e}"),
        },
        Input::Exit => {}
    }
}

/// Text stand-in for the settings window
fn print_settings(service: &TriggerService) {
    let settings = service.config().settings();
    let t = &settings.triggers;
    println!("  volume:            {}", format_volume(settings.volume));
    println!("  death:             {} ({})", t.show_death, t.death_sfx.label());
    println!("  enemy felled:      {}", t.show_enemy_felled);
    println!("  craft failed:      {}", t.show_craft_failed);
    println!("  combat intro:      {} ({:?})", t.show_combat_intro, t.combat_intro_policy);
    println!("  debug:             {}", settings.debug);
}
