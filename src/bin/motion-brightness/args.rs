use std::path::PathBuf;

use clap::Parser;
use motion_display::gpio::SensorPin;

/// Motion-activated screen brightness controller
#[derive(Debug, Parser)]
pub struct Args {
    /// Time with no motion before turning off the screen
    #[arg(long, env = "MOTION_TIMEOUT", default_value_t = 120, value_name = "SECONDS")]
    pub timeout: u64,

    /// Brightness value when turning on
    #[arg(long, env = "MOTION_ON_VALUE", default_value = "255")]
    pub on_value: String,

    /// Brightness value when turning off
    #[arg(long, env = "MOTION_OFF_VALUE", default_value = "0")]
    pub off_value: String,

    /// Path to log file [default: ~/motion_detector.log]
    #[arg(long, env = "MOTION_LOG_FILE")]
    pub log_file: Option<PathBuf>,

    /// BCM number of the PIR sensor pin
    #[arg(long, env = "MOTION_PIN", default_value = "24")]
    pub pin: SensorPin,

    /// Brightness script [default: brightness.sh next to this executable]
    #[arg(long, env = "MOTION_BRIGHTNESS_SCRIPT")]
    pub brightness_script: Option<PathBuf>,

    /// Run the brightness script directly instead of through sudo
    #[arg(long)]
    pub no_sudo: bool,

    /// Log a heartbeat every N detections while the screen is already on (0 disables)
    #[arg(long, default_value_t = 100, value_name = "N")]
    pub heartbeat_every: u64,

    #[arg(long, default_value_t = 200, value_name = "MS")]
    pub poll_interval_ms: u64,
}
