//! # Simulation commands
//!
//! Commands an operator, or a timed script, can issue to a running simulation. They are
//! processed between ticks.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::data_store::DataStore;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// A command to the simulation.
///
/// In a script these are written as JSON, e.g. `{"SetLookAhead": 80.0}` or `"Pause"`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SimCmd {
    /// Set the pursuit look-ahead distance.
    SetLookAhead(f64),

    /// Set the base target speed.
    SetTargetSpeed(f64),

    /// Stop ticking the pipeline until resumed.
    Pause,

    /// Resume a paused simulation.
    Resume,

    /// Return the vehicle to the start pose, clearing its trail and the lap count.
    Reset,

    /// End the simulation.
    Stop,
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Execute a command against the datastore.
pub fn exec(ds: &mut DataStore, cmd: &SimCmd) {
    debug!("Executing {:?}", cmd);

    match cmd {
        SimCmd::SetLookAhead(l) => ds.pipeline.pursuit_mut().set_look_ahead(*l),
        SimCmd::SetTargetSpeed(s) => ds.pipeline.pursuit_mut().set_target_speed(*s),
        SimCmd::Pause => {
            if !ds.paused {
                info!("Simulation paused");
            }
            ds.paused = true;
        }
        SimCmd::Resume => {
            if ds.paused {
                info!("Simulation resumed");
            }
            ds.paused = false;
        }
        SimCmd::Reset => {
            info!("Simulation reset");
            ds.reset();
        }
        SimCmd::Stop => {
            info!("Stop requested");
            ds.stop_requested = true;
        }
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
