use jukebox::config::JukeboxConfig;
use jukebox::data::{ChangeEvent, PlaybackState, PlayerCommand};
use jukebox::logging::initialize_logging_with_flags;
use jukebox::players::StatusReconciler;
use clap::Parser;
use crossbeam::channel::{self, Receiver, Sender, TryRecvError};
use log::{debug, error, info, warn};
use std::io::{self, Read};
use std::path::PathBuf;
use std::process;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Delay between two iterations of the main loop
const LOOP_DELAY: Duration = Duration::from_millis(50);

#[derive(Parser, Debug)]
#[command(name = "jukebox", version, about = "Headless MPD now-playing monitor with keyboard control")]
struct Args {
    /// Path to the JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// MPD host, overrides the configuration file
    #[arg(long)]
    host: Option<String>,

    /// MPD port, overrides the configuration file
    #[arg(long)]
    port: Option<u16>,

    /// Minimum milliseconds between status polls
    #[arg(long)]
    interval_ms: Option<u64>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

/// Keyboard input forwarded to the polling loop
#[derive(Debug, Clone, Copy)]
enum Input {
    PlayPause,
    Command(PlayerCommand),
}

fn load_config(args: &Args) -> JukeboxConfig {
    let mut config = match &args.config {
        Some(path) => match JukeboxConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Could not load configuration: {}", e);
                process::exit(1);
            }
        },
        None => JukeboxConfig::default(),
    };

    if let Some(host) = &args.host {
        config.mpd.host = host.clone();
    }
    if let Some(port) = args.port {
        config.mpd.port = port;
    }
    if let Some(interval) = args.interval_ms {
        config.mpd.poll_interval_ms = interval;
    }
    config
}

fn spawn_keyboard_handler(sender: Sender<Input>, running: Arc<AtomicBool>) {
    thread::spawn(move || {
        println!("Keyboard controls active:");
        println!("  Space: Play/Pause");
        println!("  s: Stop");
        println!("  n: Next track");
        println!("  p: Previous track");
        println!("  Ctrl+C: Exit");

        let mut stdin = io::stdin();
        let mut buffer = [0; 1];

        while running.load(Ordering::SeqCst) {
            if stdin.read_exact(&mut buffer).is_err() {
                // stdin closed, keep the monitor running without controls
                thread::sleep(Duration::from_millis(100));
                continue;
            }

            let input = match buffer[0] {
                b' ' => Input::PlayPause,
                b's' | b'S' => Input::Command(PlayerCommand::Stop),
                b'n' | b'N' => Input::Command(PlayerCommand::Next),
                b'p' | b'P' => Input::Command(PlayerCommand::Previous),
                _ => continue,
            };

            debug!("Key input: {:?}", input);
            if sender.send(input).is_err() {
                break;
            }
        }

        debug!("Keyboard handler thread exiting");
    });
}

fn handle_input(reconciler: &mut StatusReconciler, input: Input) {
    let command = match input {
        Input::PlayPause => {
            if reconciler.get_playback_state() == PlaybackState::Playing {
                PlayerCommand::Pause
            } else {
                PlayerCommand::Play
            }
        },
        Input::Command(command) => command,
    };

    if let Err(e) = reconciler.send_command(command) {
        warn!("{}", e);
    }
}

fn log_events(reconciler: &mut StatusReconciler) {
    while let Some(event) = reconciler.pop_event() {
        match event {
            ChangeEvent::TrackChanged => {
                let radio = reconciler.is_radio();
                let now_playing = reconciler.now_playing();
                if radio {
                    info!("Radio: {} from {}", now_playing, now_playing.source_path);
                } else {
                    info!("Track: {}", now_playing);
                }
            },
            ChangeEvent::AlbumChanged => info!("Album: {}", reconciler.now_playing().album),
            ChangeEvent::TimeElapsed => {
                let now_playing = reconciler.now_playing();
                debug!("Time: {} / {} ({}%)",
                    now_playing.elapsed_display(),
                    now_playing.total_display(),
                    now_playing.percent_elapsed());
            },
            ChangeEvent::PlaybackStateChanged => info!("State: {}", reconciler.playback_state()),
        }
    }
}

fn run(reconciler: &mut StatusReconciler, inputs: Receiver<Input>, running: Arc<AtomicBool>) {
    while running.load(Ordering::SeqCst) {
        loop {
            match inputs.try_recv() {
                Ok(input) => handle_input(reconciler, input),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }

        if let Err(e) = reconciler.poll() {
            warn!("Status update failed: {}", e);
        }
        log_events(reconciler);

        thread::sleep(LOOP_DELAY);
    }
}

fn main() {
    let args = Args::parse();
    let config = load_config(&args);

    if let Err(e) = initialize_logging_with_flags(config.logging.clone(), args.debug, args.verbose) {
        eprintln!("Could not initialize logging: {}", e);
        process::exit(1);
    }

    info!("Jukebox starting");

    let mpd = &config.mpd;
    let mut reconciler = StatusReconciler::with_tcp(mpd.reconciler_config());
    if let Err(e) = reconciler.connect(&mpd.host, mpd.port) {
        error!("{}", e);
        eprintln!(
            "Couldn't connect to the mpd server {} on port {}! Check the configuration or check if the server is running 'systemctl status mpd'.",
            mpd.host, mpd.port
        );
        process::exit(1);
    }

    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        println!("\nReceived Ctrl+C, shutting down...");
        r.store(false, Ordering::SeqCst);
    }) {
        error!("Error setting Ctrl+C handler: {}", e);
        process::exit(1);
    }

    let (sender, receiver) = channel::unbounded();
    spawn_keyboard_handler(sender, running.clone());

    info!("Polling MPD every {:?}. Press Ctrl+C to exit.", reconciler.poll_interval());
    run(&mut reconciler, receiver, running);

    reconciler.disconnect();
    info!("Exiting application");
}
