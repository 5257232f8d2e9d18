use clap::{CommandFactory, FromArgMatches, Parser};
use std::io::BufRead;
use std::path::PathBuf;
use std::process;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use tracing::{error, info, Level};
use virtual_mouse::action::{Dispatcher, LogDispatcher};
use virtual_mouse::config::Config;
use virtual_mouse::error::{VirtualMouseError, VmResult};
use virtual_mouse::session::Session;
use virtual_mouse::source::{
    first_success, DetectorProcess, JsonLinesSource, LandmarkSource, SyntheticSource,
};
use virtual_mouse::trace::TraceWriter;

mod reports;

#[derive(Parser, Debug)]
#[command(author, version, about = "Control the mouse with hand gestures", long_about = None)]
struct Cli {
    #[command(flatten)]
    config: Config,

    /// JSON config file; explicit flags override its values
    #[arg(long = "config", value_name = "JSON")]
    config_file: Option<PathBuf>,

    /// Recorded JSON-lines landmarks, or `-` for stdin
    #[arg(long, value_name = "FILE")]
    source: Option<String>,

    /// Detector command; `{camera}` is replaced by each camera index in turn
    #[arg(long, value_name = "COMMAND")]
    detector: Option<String>,

    /// Run the scripted demo instead of a camera
    #[arg(long, default_value_t = false)]
    demo: bool,

    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Log actions instead of moving the real mouse
    #[arg(long, default_value_t = false)]
    dry_run: bool,

    /// Write one CSV row per frame
    #[arg(long, value_name = "CSV")]
    trace: Option<PathBuf>,

    #[arg(long, default_value_t = false)]
    debug: bool,
}

fn main() {
    let matches = Cli::command().get_matches();
    let cli = Cli::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    tracing_subscriber::fmt()
        .with_max_level(if cli.debug { Level::DEBUG } else { Level::INFO })
        .with_writer(std::io::stderr)
        .init();

    info!("🚀 Initializing Virtual Mouse...");

    let config = resolve_config(&cli, &matches).unwrap_or_else(|e| fatal("Invalid configuration", e));
    let source = open_source(&cli, &config).unwrap_or_else(|e| fatal("No landmark source", e));
    let dispatcher = build_dispatcher(&cli, &config).unwrap_or_else(|e| fatal("No mouse backend", e));

    let mut session = Session::new(&config, source, dispatcher);
    if let Some(path) = &cli.trace {
        match TraceWriter::create(path) {
            Ok(trace) => {
                info!("📝 Tracing frames to {}", path.display());
                session = session.with_trace(trace);
            }
            Err(e) => fatal("Cannot open trace file", e),
        }
    }

    reports::print_gesture_guide(&config);

    // Landmarks on stdin leave no room for a quit key.
    if cli.source.as_deref() != Some("-") {
        spawn_quit_watcher(session.stop_handle());
        println!("Type 'q' + Enter to quit.");
    }

    match session.run() {
        Ok(stats) => reports::print_session_summary(&stats),
        Err(e) => {
            reports::print_session_summary(session.stats());
            fatal("Session aborted", e);
        }
    }
}

fn resolve_config(cli: &Cli, matches: &clap::ArgMatches) -> VmResult<Config> {
    let config = match &cli.config_file {
        Some(path) => {
            info!("📂 Loading config: {}", path.display());
            let mut file_config = Config::load_from_file(path)?;
            file_config.merge_from_cli(&cli.config, matches);
            file_config
        }
        None => cli.config.clone(),
    };
    config.validate()?;
    Ok(config)
}

fn open_source(cli: &Cli, config: &Config) -> VmResult<Box<dyn LandmarkSource>> {
    let frame = config.camera.frame_size();

    if cli.demo {
        info!("🎬 Running scripted demo (seed {})", cli.seed);
        return Ok(Box::new(SyntheticSource::demo(cli.seed)));
    }

    if let Some(path) = cli.source.as_deref() {
        if path == "-" {
            let stdin = std::io::stdin().lock();
            return Ok(Box::new(JsonLinesSource::new(stdin, frame).with_label("stdin")));
        }
        return Ok(Box::new(JsonLinesSource::open(path, frame)?));
    }

    if let Some(template) = cli.detector.as_deref() {
        let cameras = config.camera.get_camera_priorities()?;
        let detector = first_success(&cameras, |&camera| {
            DetectorProcess::spawn(template, camera, frame)
        })?;
        return Ok(Box::new(detector));
    }

    Err(VirtualMouseError::Acquisition(
        "pass --detector, --source or --demo".to_string(),
    ))
}

fn build_dispatcher(cli: &Cli, config: &Config) -> VmResult<Box<dyn Dispatcher>> {
    if cli.dry_run {
        info!("🧪 Dry run: actions are logged, not injected");
        return Ok(Box::new(LogDispatcher));
    }

    #[cfg(feature = "enigo")]
    {
        let dispatcher = virtual_mouse::action::EnigoDispatcher::new(config.scroll.wheel_scale)?;
        Ok(Box::new(dispatcher))
    }

    #[cfg(not(feature = "enigo"))]
    {
        let _ = config;
        tracing::warn!("⚠️  Built without the `enigo` feature: actions are only logged");
        Ok(Box::new(LogDispatcher))
    }
}

fn spawn_quit_watcher(stop: Arc<AtomicBool>) {
    thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if line.trim().eq_ignore_ascii_case("q") {
                info!("🛑 Quit requested");
                stop.store(true, Ordering::Relaxed);
                break;
            }
        }
    });
}

fn fatal(context: &str, e: VirtualMouseError) -> ! {
    error!("❌ {}: {}", context, e);
    process::exit(1);
}
