use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tracing::{debug, error, info, warn};

mod app_metrics;
mod config;
mod display_controller;
mod display_state;
mod event_reader;
mod heading_monitor;
mod position_monitor;
mod settings_store;
mod web;

use app_metrics::{AppMetrics, MetricsLogger};
use config::Config;
use display_controller::{CommandEffect, DisplayController, Input};
use display_state::DisplaySnapshot;
use settings_store::{load_or_default, CalibrationStore, JsonFileStore};

const METRICS_INTERVAL: Duration = Duration::from_secs(60);
const INPUT_QUEUE: usize = 256;

// ========== Logging Setup ==========

fn init_logging(log_config: &config::LogConfig) -> Result<(), Box<dyn Error>> {
    use tracing_appender::rolling;
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    std::fs::create_dir_all(&log_config.directory)?;

    let file_appender = rolling::daily(&log_config.directory, &log_config.file_prefix);

    let timer = || {
        fmt::time::OffsetTime::local_rfc_3339().unwrap_or_else(|_| {
            fmt::time::OffsetTime::new(time::UtcOffset::UTC, time::format_description::well_known::Rfc3339)
        })
    };

    let file_layer = fmt::layer()
        .with_writer(file_appender)
        .with_ansi(false)
        .with_timer(timer());

    let console_layer = fmt::layer().with_writer(std::io::stdout).with_timer(timer());

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_config.level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .init();

    Ok(())
}

fn print_help() {
    println!("Compassi heading display");
    println!();
    println!("USAGE:");
    println!("    compassi [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    --replay <FILE>                      Replay recorded sensor events instead of listening on UDP");
    println!("    --validate-config, --validate, -v    Validate configuration and exit");
    println!("    --help, -h                           Show this help message");
    println!();
    println!("Configuration file: config.json (in current directory)");
}

// ========== Main Application ==========

fn main() -> Result<(), Box<dyn Error>> {
    let args: Vec<String> = std::env::args().collect();

    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_help();
        std::process::exit(0);
    }

    let validate_only = args
        .iter()
        .any(|a| a == "--validate-config" || a == "--validate" || a == "-v");

    let replay_override = match args.iter().position(|a| a == "--replay") {
        Some(index) => match args.get(index + 1) {
            Some(file) => Some(file.clone()),
            None => {
                eprintln!("--replay needs a file argument");
                std::process::exit(2);
            }
        },
        None => None,
    };

    let mut config = match Config::from_file("config.json") {
        Ok(cfg) => {
            if validate_only {
                println!("✓ Configuration validation successful");
                println!("  Sensor input: {}", describe_input(&cfg));
                println!(
                    "  Web server: {}",
                    if cfg.web.enabled { format!("port {}", cfg.web.port) } else { "disabled".to_string() }
                );
                println!("  Calibration file: {}", cfg.calibration.settings_path);
                println!("  Initial coordinate format: {}", cfg.display.coordinate_format.label());
                std::process::exit(0);
            }
            cfg
        }
        Err(e) => {
            if validate_only {
                eprintln!("✗ Configuration validation failed: {}", e);
                std::process::exit(1);
            }
            eprintln!("Warning: Could not load config.json: {}", e);
            eprintln!("Using default configuration");
            Config::default()
        }
    };

    if replay_override.is_some() {
        config.input.replay_file = replay_override;
    }

    init_logging(&config.logging)?;
    info!("Compassi starting...");
    info!("Sensor input: {}", describe_input(&config));

    // the display pipeline runs on one thread; blocking file writes go to
    // the runtime's blocking pool
    let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;
    runtime.block_on(run(config))
}

fn describe_input(config: &Config) -> String {
    match &config.input.replay_file {
        Some(file) => format!("replay {} every {} ms", file, config.input.replay_interval_ms),
        None => format!("udp://{}", config.input.udp_listen),
    }
}

async fn run(config: Config) -> Result<(), Box<dyn Error>> {
    let file_store = JsonFileStore::new(&config.calibration.settings_path);
    let settings = load_or_default(&file_store);
    info!("Calibration from {}: {}", file_store.path().display(), settings);
    let store: Arc<dyn CalibrationStore> = Arc::new(file_store);

    let mut controller = DisplayController::new(settings, config.display.coordinate_format);
    controller.start(config.display.require_orientation_permission);

    let (tx, rx) = mpsc::channel(INPUT_QUEUE);
    let (snapshot_tx, snapshot_rx) = watch::channel(controller.snapshot());

    match config.input.replay_file.clone() {
        Some(file) => {
            let tx = tx.clone();
            let interval = config.input.replay_interval();
            tokio::spawn(async move {
                if let Err(e) = event_reader::replay_events(PathBuf::from(&file), interval, tx).await {
                    error!("Replay of {} failed: {}", file, e);
                }
            });
        }
        None => {
            let tx = tx.clone();
            let listen = config.input.udp_listen.clone();
            tokio::spawn(async move {
                if let Err(e) = event_reader::read_udp_events(listen, tx).await {
                    error!("UDP sensor input failed: {}", e);
                }
            });
        }
    }

    if config.web.enabled {
        let state = web::AppState {
            snapshot: snapshot_rx,
            commands: tx.clone(),
        };
        let port = config.web.port;
        let static_dir = config.web.static_dir.clone();
        tokio::spawn(async move {
            if let Err(e) = web::start_web_server(state, port, static_dir).await {
                error!("Web server stopped: {}", e);
            }
        });
    } else {
        info!("Web server disabled");
    }

    // only the readers and the web server keep the queue open
    drop(tx);

    run_pipeline(controller, rx, snapshot_tx, store).await;
    info!("Compassi stopped");
    Ok(())
}

/// Single consumer of all inputs. Owns the controller, publishes a snapshot
/// after every change and hands calibration writes to the blocking pool.
async fn run_pipeline(
    mut controller: DisplayController,
    mut rx: mpsc::Receiver<Input>,
    snapshot_tx: watch::Sender<DisplaySnapshot>,
    store: Arc<dyn CalibrationStore>,
) {
    let mut metrics = AppMetrics::new();
    let mut metrics_logger = MetricsLogger::new(METRICS_INTERVAL);
    let (store_result_tx, mut store_result_rx) = mpsc::unbounded_channel::<bool>();

    let mut ticker = tokio::time::interval(METRICS_INTERVAL);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            input = rx.recv() => {
                let Some(input) = input else {
                    info!("All sensor inputs closed");
                    break;
                };
                match input {
                    Input::Event(event) => {
                        let outcome = controller.handle_event(&event);
                        debug!("{} event: {:?}", event.name(), outcome);
                        metrics.record(&event, outcome);
                    }
                    Input::Malformed(e) => {
                        debug!("Malformed sensor event: {}", e);
                        metrics.decode_errors += 1;
                        continue;
                    }
                    Input::Command { command, reply } => {
                        if let CommandEffect::Persist(settings) = controller.handle_request(command, reply) {
                            let store = Arc::clone(&store);
                            let result_tx = store_result_tx.clone();
                            tokio::spawn(async move {
                                let ok = match tokio::task::spawn_blocking(move || store.save(&settings)).await {
                                    Ok(Ok(())) => {
                                        info!("Calibration saved: {}", settings);
                                        true
                                    }
                                    Ok(Err(e)) => {
                                        warn!("Failed to save calibration: {}", e);
                                        false
                                    }
                                    Err(e) => {
                                        warn!("Calibration save task failed: {}", e);
                                        false
                                    }
                                };
                                let _ = result_tx.send(ok);
                            });
                        }
                    }
                }
                snapshot_tx.send_replace(controller.snapshot());
            }
            Some(ok) = store_result_rx.recv() => {
                if !ok {
                    metrics.store_errors += 1;
                }
            }
            _ = ticker.tick() => {
                metrics_logger.check_and_log(&mut metrics);
            }
        }
    }

    controller.shutdown();
    snapshot_tx.send_replace(controller.snapshot());
    info!("Final calibration: {}", controller.calibration());
    metrics.log();
}
