//! Main simulation executable entry point.
//!
//! # Architecture
//!
//! The general execution methodology consists of:
//!
//!     - Initialise the session, logging and parameters
//!     - Load the scene and build the pipeline
//!     - Main loop:
//!         - Command processing (from the script, if given)
//!         - Pipeline tick, unless paused:
//!             - Camera projection
//!             - Lane detection
//!             - Pursuit control
//!             - Vehicle dynamics
//!         - Archiving and overlay saving
//!         - Tick pacing
//!     - Save the run summary

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use color_eyre::{eyre::WrapErr, Report};
use log::{debug, info, warn};
use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};
use structopt::StructOpt;

// Internal
use sim_lib::{
    cam_pov,
    data_store::DataStore,
    lane_det,
    lap::LapCounter,
    params::SimExecParams,
    pipeline::Pipeline,
    pursuit_ctrl,
    scene::{ImageScene, SceneSource},
    sim_cmd::{self, SimCmd},
    vehicle,
};
use util::{
    archive::{Archived, Archiver},
    logger::{logger_init, LevelFilter},
    script_interpreter::{Pending, ScriptInterpreter},
    session::Session,
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Vision pursuit driving simulator
#[derive(Debug, StructOpt)]
#[structopt(name = "sim_exec")]
struct Args {
    /// Timed command script to execute
    #[structopt(parse(from_os_str))]
    script: Option<PathBuf>,

    /// Stop after this many ticks, overriding the parameter file
    #[structopt(short = "n", long = "max-ticks")]
    max_ticks: Option<u64>,

    /// Minimum log level (info, debug or trace)
    #[structopt(short = "l", long = "log-level", default_value = "debug")]
    log_level: LevelFilter,
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Executable main function, entry point.
fn main() -> Result<(), Report> {
    color_eyre::install()?;

    let args = Args::from_args();

    // ---- EARLY INITIALISATION ----

    // Initialise session
    let session = Session::new("sim_exec", "sessions").wrap_err("Failed to create the session")?;

    // Initialise logger, per-scanline output is only wanted when asked for specifically
    logger_init(
        args.log_level,
        &[("sim_lib::lane_det", args.log_level.min(LevelFilter::Debug))],
        &session,
    )
    .wrap_err("Failed to initialise logging")?;

    info!("Vision Pursuit Simulator\n");
    info!("Session directory: {:?}\n", session.session_root);
    debug!("CLI arguments: {:?}", args);

    // ---- LOAD PARAMETERS ----

    let mut exec_params: SimExecParams =
        util::params::load("sim_exec.toml").wrap_err("Could not load exec params")?;
    let vehicle_params: vehicle::Params =
        util::params::load("vehicle.toml").wrap_err("Could not load vehicle params")?;
    let cam_params: cam_pov::Params =
        util::params::load("cam_pov.toml").wrap_err("Could not load camera params")?;
    let lane_params: lane_det::Params =
        util::params::load("lane_det.toml").wrap_err("Could not load lane detection params")?;
    let pursuit_params: pursuit_ctrl::Params =
        util::params::load("pursuit_ctrl.toml").wrap_err("Could not load pursuit params")?;

    if let Some(n) = args.max_ticks {
        exec_params.max_ticks = n;
    }

    info!("Parameters loaded");

    // ---- INITIALISE COMMAND SOURCE ----

    let mut script: Option<ScriptInterpreter<SimCmd>> = match args.script {
        Some(ref path) => {
            info!("Loading script from {:?}", path);

            let si = ScriptInterpreter::new(path).wrap_err("Failed to load script")?;

            info!(
                "Loaded script lasts {:.02} s and contains {} commands\n",
                si.get_duration(),
                si.get_num_cmds()
            );

            Some(si)
        }
        None => {
            info!("No script provided, running with the default controller config\n");
            None
        }
    };

    // ---- INITIALISE MODULES ----

    info!("Initialising modules...");

    let mut scene =
        ImageScene::load(&exec_params.scene_path).wrap_err("Failed to load the scene")?;

    let pipeline = Pipeline::new(vehicle_params, cam_params, lane_params, pursuit_params);

    let start = exec_params.start_pose;
    let mut ds = DataStore::new(
        pipeline,
        start,
        LapCounter::new(exec_params.lap, start.x, start.y),
    );
    ds.set_archiver(
        Archiver::from_path(&session, "telemetry.csv")
            .wrap_err("Failed to create the telemetry archive")?,
    );

    info!("Module initialisation complete\n");

    // ---- MAIN LOOP ----

    info!("Beginning main loop\n");

    loop {
        // Get tick start time
        let tick_start_instant = Instant::now();

        ds.tick_start();

        // ---- COMMAND PROCESSING ----

        if let Some(ref mut si) = script {
            match si.get_pending(ds.elapsed_s) {
                Pending::None => (),
                Pending::Some(cmds) => {
                    for cmd in cmds.iter() {
                        sim_cmd::exec(&mut ds, cmd);
                    }
                }
                Pending::EndOfScript => {
                    info!("End of command script reached, stopping");
                    break;
                }
            }
        }

        if ds.stop_requested {
            break;
        }

        // ---- PIPELINE ----

        if !ds.paused {
            let tick = ds.total_ticks;
            let save_overlay = exec_params.overlay_save_interval > 0
                && tick % exec_params.overlay_save_interval == 0;

            let scene_img = scene
                .scene(tick)
                .wrap_err("Failed to get the scene")?;

            let (vehicle, output) = ds.pipeline.tick(scene_img, ds.vehicle.clone(), save_overlay);

            if let Some(ref overlay) = output.overlay {
                let path = session
                    .session_root
                    .join(format!("overlay_{:06}.png", tick));
                if let Err(e) = overlay.save(&path) {
                    warn!("Could not save overlay to {:?}: {}", path, e);
                }
            }

            ds.tick_end(vehicle, output);

            // ---- WRITE ARCHIVES ----

            if let Err(e) = ds.write() {
                warn!("Could not archive the tick report: {}", e);
            }
        }

        if exec_params.max_ticks > 0 && ds.total_ticks >= exec_params.max_ticks {
            info!("Tick limit ({}) reached, stopping", exec_params.max_ticks);
            break;
        }

        // ---- TICK MANAGEMENT ----

        if exec_params.cycle_period_s > 0.0 {
            let period = Duration::from_secs_f64(exec_params.cycle_period_s);
            let tick_dur = Instant::now() - tick_start_instant;

            match period.checked_sub(tick_dur) {
                Some(d) => thread::sleep(d),
                None => warn!(
                    "Tick overran by {:.06} s",
                    tick_dur.as_secs_f64() - period.as_secs_f64()
                ),
            }
        }
    }

    // ---- SHUTDOWN ----

    let summary = ds.summary();
    info!(
        "Ran {} ticks, {} laps completed",
        summary.ticks_run, summary.laps
    );
    session.save("summary.json", summary);

    info!("End of execution");

    session.exit();

    Ok(())
}
