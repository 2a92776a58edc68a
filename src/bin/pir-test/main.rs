mod args;
mod prompt;

use std::{
    io::{self, Write as _},
    process::ExitCode,
    sync::atomic::{AtomicBool, Ordering},
    time::Duration,
};

use anyhow::{Context as _, Result};
use args::{Args, Strategy};
use clap::Parser as _;
use motion_display::{
    clock::SystemClock,
    gpio::{PinBank, RaspberryPiBank, SensorPin},
    logging,
    scan::{PinScanResult, PinTest, ScanConfig, scan_concurrent, scan_sequential, test_pin},
    shutdown,
};

use crate::prompt::confirm;

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(e) = run().await {
        eprintln!("Error: {e:#}");
        return ExitCode::from(1);
    }

    ExitCode::from(0)
}

async fn run() -> Result<()> {
    let args = Args::parse();
    logging::init(None).context("failed to set up logging")?;

    let stop = shutdown::stop_on_signal();

    tokio::task::spawn_blocking(move || diagnose(&args, &stop))
        .await
        .context("diagnostic task panicked")?
}

fn diagnose(args: &Args, stop: &AtomicBool) -> Result<()> {
    println!("PIR Sensor Test Utility");
    println!("This utility will help you verify your PIR motion sensor connection.\n");

    let bank = RaspberryPiBank::new().context("failed to initialize GPIO")?;
    let clock = SystemClock;

    println!("Testing the default pin ({})...", args.pin);
    println!("Move in front of the PIR sensor now!");
    let default_result = check_pin(&bank, &clock, args.pin, PinTest::DEFAULT_PIN_CHECK, stop);

    if default_result > 0 {
        println!("\nSuccess! PIR sensor is working on {}.", args.pin);
        println!("Detected {default_result} movements during the test.");
        println!("Your motion detection setup is configured correctly.");
        return Ok(());
    }
    if interrupted(stop) {
        return Ok(());
    }

    println!("\nNo motion detected on the default {}.", args.pin);
    if !confirm(
        "Would you like to scan all GPIO pins to find your PIR sensor?",
        args.yes,
    )? {
        println!("\nTest completed. Please check your PIR sensor connection and try again.");
        return Ok(());
    }

    let config = ScanConfig {
        duration: Duration::from_secs(args.duration),
        window: Duration::from_secs(args.window),
        ..ScanConfig::default()
    };
    let result = match args.strategy {
        Strategy::Concurrent => {
            println!("\nMonitoring all available GPIO pins simultaneously...");
            println!("Move in front of the PIR sensor now!");
            println!("This will run for {} seconds.\n", args.duration);

            let result = scan_concurrent(&bank, &clock, &config, stop, print_remaining);
            println!("\n");
            result
        }
        Strategy::Sequential => {
            println!("\nTesting each GPIO pin for {} seconds...", args.window);
            println!("Keep moving in front of the PIR sensor!\n");
            scan_sequential(&bank, &clock, &config, stop)
        }
    };

    if stop.load(Ordering::Acquire) {
        println!("Scan interrupted, results are partial.");
    }
    report_unusable(&result);

    let Some((best_pin, best_count)) = result.best() else {
        println!("No motion detected on any GPIO pin.");
        println!("Please check that:");
        println!("1. The PIR sensor is properly powered (connected to 5V and GND)");
        println!("2. The data/output pin of the sensor is connected to a GPIO pin");
        println!("3. The sensor might have a warm-up or initialization period");
        return Ok(());
    };

    report_ranking(&result, &config, args.strategy);

    println!("\nRecommendation:");
    println!("The most likely connection is {best_pin} with {best_count} detections.");
    if best_pin != args.pin {
        println!("\nTo use this pin instead of {}:", args.pin);
        println!("  motion-brightness --pin {}", best_pin.bcm());
        println!("or set MOTION_PIN={} in the service environment.", best_pin.bcm());
    }

    if interrupted(stop)
        || !confirm(
            &format!("Would you like to test {best_pin} for a longer duration to confirm?"),
            args.yes,
        )?
    {
        return Ok(());
    }

    let secs = PinTest::CONFIRMATION.as_secs();
    println!("\nTesting {best_pin} for {secs} seconds...");
    let confirmation = check_pin(&bank, &clock, best_pin, PinTest::CONFIRMATION, stop);
    if confirmation > PinTest::CONFIRMATION_THRESHOLD {
        println!("\nConfirmed! {best_pin} is receiving PIR sensor input.");
        if best_pin != args.pin {
            println!("Remember to start motion-brightness with --pin {}.", best_pin.bcm());
        }
    } else {
        println!("\nInconclusive. Please check your connections and try again.");
    }

    Ok(())
}

/// Runs the single-pin routine; a pin that cannot be claimed or read counts as zero.
fn check_pin<B: PinBank>(
    bank: &B,
    clock: &SystemClock,
    pin: SensorPin,
    duration: Duration,
    stop: &AtomicBool,
) -> u32 {
    let test = PinTest::for_duration(duration);
    let outcome = bank
        .claim(pin)
        .and_then(|mut source| test_pin(&mut source, clock, &test, stop));

    match outcome {
        Ok(n) => n,
        Err(e) => {
            println!("Could not test {pin}: {e}");
            println!("Hint: {}", e.hint());
            0
        }
    }
}

fn interrupted(stop: &AtomicBool) -> bool {
    let interrupted = stop.load(Ordering::Acquire);
    if interrupted {
        println!("\nTest interrupted by user.");
    }
    interrupted
}

fn print_remaining(remaining: Duration) {
    let secs = remaining.as_secs_f64().ceil() as u64;
    print!("\rTime remaining: {:02}:{:02}", secs / 60, secs % 60);
    let _ = io::stdout().flush();
}

fn report_unusable(result: &PinScanResult) {
    for (pin, error, hint) in result.unusable() {
        println!("{pin}: unusable ({error}). {hint}.");
    }
}

fn report_ranking(result: &PinScanResult, config: &ScanConfig, strategy: Strategy) {
    println!("Results: Found potential PIR sensor connections!");
    for (pin, count) in result.ranked() {
        println!("{pin}: {count} detections");
    }

    if strategy == Strategy::Sequential {
        let likely = result.likely(config.likely_threshold);
        if !likely.is_empty() {
            let pins: Vec<String> = likely.iter().map(ToString::to_string).collect();
            println!("Likely connected: {}", pins.join(", "));
        }
    }
}
