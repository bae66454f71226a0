//! # Simulation library.
//!
//! The vision pursuit driving simulator: a camera view synthesised from a top-down scene, a
//! colour based lane detector, pursuit steering and speed laws, and a kinematic vehicle model,
//! all joined up by the per-tick pipeline.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Camera point-of-view module - projects the top-down scene into the driver's forward view
pub mod cam_pov;

/// Data store - state of the simulation executable
pub mod data_store;

/// Lane detection module - finds the lane centre in the forward view
pub mod lane_det;

/// Lap counter
pub mod lap;

/// Simulation executable parameters
pub mod params;

/// The per-tick perception to control pipeline
pub mod pipeline;

/// Pursuit control module - steering and speed laws
pub mod pursuit_ctrl;

/// Scene sources - supply the top-down scene image
pub mod scene;

/// Simulation commands and their execution
pub mod sim_cmd;

/// Vehicle dynamics module - kinematic bicycle model
pub mod vehicle;
