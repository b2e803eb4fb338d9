//! Obstacle-triggered tilt sampling loop.

pub mod shutdown;

pub use shutdown::ShutdownSignal;

use std::io::Write;
use std::thread;
use std::time::Duration;

use log::{debug, info, warn};

use crate::sensors::{Accelerometer, ObstacleInput, SensorError};
use crate::storage::{JsonLogStore, StoreError};
use crate::types::{LogEntry, TiltAngles, TiltLog};
use crate::utils::ctime_now;

const NOTHING_DETECTED: &str = "No hay nada";

/// 采样循环错误
#[derive(Debug, thiserror::Error)]
pub enum SamplerError {
    #[error("sensor read failed: {0}")]
    Sensor(#[from] SensorError),
    #[error("failed to persist log: {0}")]
    Store(#[from] StoreError),
    #[error("failed to write status line: {0}")]
    Console(#[from] std::io::Error),
}

/// Result of a single loop iteration.
#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    Detected(LogEntry),
    Clear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub iterations: u64,
    pub detections: usize,
}

/// Owns both sensors, the in-memory log and its file mirror.
pub struct Sampler<P, A, W> {
    obstacle: P,
    accelerometer: A,
    console: W,
    store: JsonLogStore,
    log: TiltLog,
    detection_delay: Duration,
    iterations: u64,
}

impl<P, A, W> Sampler<P, A, W>
where
    P: ObstacleInput,
    A: Accelerometer,
    W: Write,
{
    pub fn new(obstacle: P, accelerometer: A, console: W, store: JsonLogStore, detection_delay: Duration) -> Self {
        Self {
            obstacle,
            accelerometer,
            console,
            store,
            log: TiltLog::new(),
            detection_delay,
            iterations: 0,
        }
    }

    /// Samples both sensors once and records a tilt entry if an obstacle is present.
    ///
    /// On detection the status line is printed, the loop blocks for the
    /// detection delay, the entry is appended and the whole log is rewritten
    /// to disk. Otherwise only the "nothing detected" line is printed.
    pub fn step(&mut self) -> Result<StepOutcome, SamplerError> {
        let state = self.obstacle.read()?;
        let reading = self.accelerometer.acceleration()?;
        self.iterations += 1;

        if !state.is_asserted() {
            writeln!(self.console, "{}", NOTHING_DETECTED)?;
            self.console.flush()?;
            return Ok(StepOutcome::Clear);
        }

        let angles = TiltAngles::from_reading(&reading);
        if !angles.is_finite() {
            warn!("Degenerate reading {:?} produced non-finite tilt {:?}", reading, angles);
        }
        let timestamp = ctime_now();

        writeln!(
            self.console,
            "Hora a la que se obtuvo: {} - X : {:?} Y : {:?} Z : {:?}",
            timestamp, angles.theta_x, angles.theta_y, angles.theta_z
        )?;
        self.console.flush()?;

        if !self.detection_delay.is_zero() {
            thread::sleep(self.detection_delay);
        }

        let entry = LogEntry::new(timestamp, angles);
        self.log.append(entry.clone());
        self.store.save(&self.log)?;
        debug!("Logged detection #{} from {:?}", self.log.len(), reading);

        Ok(StepOutcome::Detected(entry))
    }

    /// Runs until `shutdown` is triggered or an iteration fails.
    pub fn run(&mut self, shutdown: &ShutdownSignal) -> Result<RunSummary, SamplerError> {
        info!("Sampling started, log file: {}", self.store.path().display());

        while !shutdown.is_triggered() {
            self.step()?;
        }

        let summary = self.summary();
        info!(
            "Sampling stopped after {} iterations, {} detections",
            summary.iterations, summary.detections
        );
        Ok(summary)
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            iterations: self.iterations,
            detections: self.log.len(),
        }
    }
}
