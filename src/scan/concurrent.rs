use std::{
    sync::atomic::{AtomicBool, Ordering},
    thread,
    time::Duration,
};

use tracing::{info, warn};

use crate::{
    clock::Clock,
    gpio::{PinBank, SignalSource},
    scan::{PinScanResult, PinStatus, ScanConfig},
};

/// Monitors every pin at once for `config.duration`, counting rising edges.
///
/// Pins are claimed up front; each claimed pin gets its own thread, which owns the line and
/// is the only writer of that pin's result slot. `on_progress` receives the remaining time
/// roughly every `config.progress_every`. Setting `interrupt` stops all workers early and the
/// partial counts are returned.
pub fn scan_concurrent<B, C, F>(
    bank: &B,
    clock: &C,
    config: &ScanConfig,
    interrupt: &AtomicBool,
    mut on_progress: F,
) -> PinScanResult
where
    B: PinBank,
    C: Clock,
    F: FnMut(Duration),
{
    let mut slots = Vec::with_capacity(config.pins.len());
    let mut sources = Vec::with_capacity(config.pins.len());
    for &pin in &config.pins {
        match bank.claim(pin) {
            Ok(source) => {
                slots.push((pin, PinStatus::Detections(0)));
                sources.push(Some(source));
            }
            Err(e) => {
                warn!(%pin, error = %e, hint = e.hint(), "Could not monitor {pin}");
                slots.push((pin, PinStatus::unusable(&e)));
                sources.push(None);
            }
        }
    }

    let stop = AtomicBool::new(false);
    let interval = config.sample_interval;

    thread::scope(|scope| {
        for ((_, slot), source) in slots.iter_mut().zip(sources) {
            let Some(mut source) = source else {
                continue;
            };
            let stop = &stop;
            scope.spawn(move || monitor_edges(&mut source, clock, interval, stop, slot));
        }

        let start = clock.now();
        loop {
            let elapsed = clock.now().saturating_duration_since(start);
            if elapsed >= config.duration {
                break;
            }
            if interrupt.load(Ordering::Acquire) {
                warn!("Scan interrupted, stopping all monitors");
                break;
            }

            let remaining = config.duration - elapsed;
            on_progress(remaining);
            clock.sleep(remaining.min(config.progress_every));
        }

        stop.store(true, Ordering::Release);
    });

    info!("Monitoring complete!");
    slots.into_iter().collect()
}

fn monitor_edges<S: SignalSource, C: Clock>(
    source: &mut S,
    clock: &C,
    interval: Duration,
    stop: &AtomicBool,
    slot: &mut PinStatus,
) {
    let pin = source.pin();
    let mut last = match source.read() {
        Ok(level) => level,
        Err(e) => {
            warn!(%pin, error = %e, hint = e.hint(), "Error monitoring {pin}");
            *slot = PinStatus::unusable(&e);
            return;
        }
    };

    let mut detections = 0;
    while !stop.load(Ordering::Acquire) {
        let current = match source.read() {
            Ok(level) => level,
            Err(e) => {
                warn!(%pin, error = %e, hint = e.hint(), "Error monitoring {pin}");
                *slot = PinStatus::unusable(&e);
                return;
            }
        };

        if current && !last {
            detections += 1;
            *slot = PinStatus::Detections(detections);
            info!(%pin, detection = detections, "Motion detected on {pin}!");
        }

        last = current;
        clock.sleep(interval);
    }
}
