use clap::{Parser, ValueEnum};
use motion_display::gpio::SensorPin;

/// PIR sensor wiring test: checks the configured pin, then finds the pin the sensor is on
#[derive(Debug, Parser)]
pub struct Args {
    /// Pin the motion daemon is configured with
    #[arg(long, env = "MOTION_PIN", default_value = "24")]
    pub pin: SensorPin,

    #[arg(long, value_enum, default_value_t = Strategy::Concurrent)]
    pub strategy: Strategy,

    /// Concurrent scan duration
    #[arg(long, default_value_t = 20, value_name = "SECONDS")]
    pub duration: u64,

    /// Per-pin window of a sequential scan
    #[arg(long, default_value_t = 2, value_name = "SECONDS")]
    pub window: u64,

    /// Answer yes to every prompt
    #[arg(long, short)]
    pub yes: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Strategy {
    /// Watch all pins at once for rising edges
    Concurrent,
    /// Test one pin after another
    Sequential,
}
