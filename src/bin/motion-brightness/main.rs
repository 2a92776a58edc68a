mod args;

use std::{
    env,
    path::{Path, PathBuf},
    process::ExitCode,
    sync::atomic::Ordering,
    time::Duration,
};

use anyhow::{Context as _, Result, anyhow};
use args::Args;
use clap::Parser as _;
use motion_display::{
    clock::SystemClock,
    display::{ActuatorConfig, DisplayConfig, launch},
    gpio::RaspberryPiBank,
    logging, shutdown,
};
use tracing::{error, info};

const BRIGHTNESS_SCRIPT_NAME: &str = "brightness.sh";
const DEFAULT_LOG_FILE_NAME: &str = "motion_detector.log";

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(e) = run().await {
        eprintln!("{e:#}");
        return ExitCode::from(1);
    }

    ExitCode::from(0)
}

async fn run() -> Result<()> {
    let args = Args::parse();

    let log_file = args.log_file.clone().or_else(default_log_file);
    logging::init(log_file.as_deref()).context("failed to set up logging")?;

    let program = match args.brightness_script.clone() {
        Some(path) => path,
        None => default_brightness_script().context("failed to locate brightness script")?,
    };

    log_startup(&args, &program, log_file.as_deref());

    let config = DisplayConfig {
        idle_timeout: Duration::from_secs(args.timeout),
        on_value: args.on_value,
        off_value: args.off_value,
        heartbeat_every: args.heartbeat_every,
        poll_interval: Duration::from_millis(args.poll_interval_ms),
    };
    let actuator = ActuatorConfig {
        program,
        sudo: !args.no_sudo,
    };
    let pin = args.pin;

    let stop = shutdown::stop_on_signal();

    tokio::task::spawn_blocking(move || -> Result<()> {
        let clock = SystemClock;
        let mut monitor = launch(config, &actuator, RaspberryPiBank::new, pin, &clock)
            .inspect_err(|e| error!(error = %e, "Initialization failed"))?;

        let result = monitor.run(&clock, &stop);
        match &result {
            Ok(()) if stop.load(Ordering::Acquire) => info!("Program ended by user"),
            Ok(()) => {}
            Err(e) => error!(error = %e, "Unexpected error"),
        }

        // Restores the screen and releases the pin.
        drop(monitor);

        result.context("motion monitoring failed")
    })
    .await
    .context("monitor task panicked")?
}

fn log_startup(args: &Args, program: &Path, log_file: Option<&Path>) {
    let user = env::var("USER").unwrap_or_else(|_| "unknown".to_owned());
    let executable = env::current_exe()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|_| "unknown".to_owned());
    let log_file = log_file
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "none".to_owned());

    info!("{}", "=".repeat(50));
    info!("Motion Detector started");
    info!("Process ID: {}", std::process::id());
    info!("Started by user: {user}");
    info!("Running from: {executable}");
    info!("Timeout: {} seconds", args.timeout);
    info!("ON brightness: {}", args.on_value);
    info!("OFF brightness: {}", args.off_value);
    info!("Log file: {log_file}");
    info!("PIR sensor pin: {}", args.pin);
    info!("Brightness script: {}", program.display());
}

fn default_log_file() -> Option<PathBuf> {
    env::var_os("HOME").map(|home| PathBuf::from(home).join(DEFAULT_LOG_FILE_NAME))
}

fn default_brightness_script() -> Result<PathBuf> {
    let exe = env::current_exe().context("failed to resolve current executable")?;
    let dir = exe
        .parent()
        .ok_or_else(|| anyhow!("executable has no parent directory: {}", exe.display()))?;

    Ok(dir.join(BRIGHTNESS_SCRIPT_NAME))
}
