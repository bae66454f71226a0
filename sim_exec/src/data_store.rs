//! # Data Store

use log::warn;
use serde::Serialize;
use util::archive::{ArchiveError, Archived, Archiver};

use crate::{
    lap::LapCounter,
    pipeline::{Pipeline, TickOutput},
    pursuit_ctrl::ControllerConfig,
    vehicle::{StartPose, Vehicle, VehicleState},
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Global data store for the executable.
pub struct DataStore {
    // Tick management
    /// Number of ticks the pipeline has run since the last reset
    pub num_ticks: u64,

    /// Number of ticks the pipeline has run in total
    pub total_ticks: u64,

    /// Session elapsed time at the start of the tick, wall clock
    pub elapsed_s: f64,

    // Run control
    pub paused: bool,
    pub stop_requested: bool,

    // Pipeline and its state
    pub pipeline: Pipeline,
    pub start_pose: StartPose,
    pub vehicle: Vehicle,
    pub laps: LapCounter,

    /// Report of the latest tick
    pub tick_report: Option<TickReport>,

    arch_tick_report: Archiver,
}

/// Telemetry recorded every tick.
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct TickReport {
    pub tick: u64,
    pub elapsed_s: f64,
    pub x: f64,
    pub y: f64,
    pub heading_deg: f64,
    pub steering_angle_deg: f64,
    pub speed: f64,
    pub lane_estimate: f64,
    pub rows_detected: usize,
    pub laps: u32,
    pub look_ahead_x: f64,
    pub look_ahead_y: f64,
}

/// Summary of a run, saved on exit.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub ticks_run: u64,
    pub laps: u32,
    pub final_state: VehicleState,
    pub config: ControllerConfig,
}

// ---------------------------------------------------------------------------
// IMPLS
// ---------------------------------------------------------------------------

impl DataStore {
    pub fn new(pipeline: Pipeline, start_pose: StartPose, laps: LapCounter) -> Self {
        let vehicle = pipeline.spawn(start_pose);

        Self {
            num_ticks: 0,
            total_ticks: 0,
            elapsed_s: 0.0,
            paused: false,
            stop_requested: false,
            pipeline,
            start_pose,
            vehicle,
            laps,
            tick_report: None,
            arch_tick_report: Archiver::default(),
        }
    }

    /// Set the archiver for the tick reports.
    pub fn set_archiver(&mut self, archiver: Archiver) {
        self.arch_tick_report = archiver;
    }

    /// Perform actions required at the start of a tick.
    pub fn tick_start(&mut self) {
        self.tick_report = None;

        self.elapsed_s = util::session::get_elapsed_seconds();
    }

    /// Store the result of a pipeline tick and build its report.
    pub fn tick_end(&mut self, vehicle: Vehicle, output: TickOutput) {
        self.vehicle = vehicle;
        self.laps.update(self.vehicle.state.x, self.vehicle.state.y);

        let s = &self.vehicle.state;
        self.tick_report = Some(TickReport {
            tick: self.num_ticks,
            elapsed_s: self.elapsed_s,
            x: s.x,
            y: s.y,
            heading_deg: s.heading_deg,
            steering_angle_deg: s.steering_angle_deg,
            speed: s.speed,
            lane_estimate: output.estimate.centre,
            rows_detected: output.estimate.rows.len(),
            laps: self.laps.laps(),
            look_ahead_x: output.look_ahead_point.x,
            look_ahead_y: output.look_ahead_point.y,
        });

        self.num_ticks += 1;
        self.total_ticks += 1;
    }

    /// Return the vehicle to the start pose and clear the lap count.
    pub fn reset(&mut self) {
        self.vehicle = self.pipeline.spawn(self.start_pose);
        self.laps.reset();
        self.num_ticks = 0;
        self.tick_report = None;
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            ticks_run: self.total_ticks,
            laps: self.laps.laps(),
            final_state: self.vehicle.state,
            config: self.pipeline.pursuit().config(),
        }
    }
}

impl Archived for DataStore {
    fn write(&mut self) -> Result<(), ArchiveError> {
        match self.tick_report {
            Some(ref r) => self.arch_tick_report.serialise(r),
            None => {
                warn!("No tick report to archive");
                Ok(())
            }
        }
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
pub(crate) fn test_data_store() -> DataStore {
    use crate::{cam_pov, lane_det, lap::LapParams, pursuit_ctrl, vehicle};

    let pipeline = Pipeline::new(
        vehicle::Params::default(),
        cam_pov::Params::default(),
        lane_det::Params::default(),
        pursuit_ctrl::Params::default(),
    );
    let start = StartPose {
        x: 100.0,
        y: 100.0,
        heading_deg: 0.0,
    };

    DataStore::new(pipeline, start, LapCounter::new(LapParams::default(), start.x, start.y))
}
