//! Session management
//!
//! A session is a single run of an executable. Each run gets its own directory,
//! `{exec_name}_{timestamp}`, holding the log file, an `arch` directory for the CSV archives,
//! and any data products saved while running.
//!
//! Saving is done on a background thread so the main loop never waits on the disk. Data is
//! serialised according to the extension of the requested path, currently only `.json` is
//! understood.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External imports
use chrono::{DateTime, Utc};
use conquer_once::OnceCell;
use erased_serde::Serialize;
use log::{debug, info, warn};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::thread::{self, JoinHandle};
use thiserror::Error;

// Internal imports
use crate::time;

// ---------------------------------------------------------------------------
// STATICS
// ---------------------------------------------------------------------------

static SESSION_EPOCH: OnceCell<DateTime<Utc>> = OnceCell::uninit();

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Chrono format string used for the session directory timestamp, see
/// https://docs.rs/chrono/0.4/chrono/format/strftime/index.html.
const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Name of the archive sub directory.
const ARCH_DIR_NAME: &str = "arch";

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A request to save some data, relative to the session root.
type SaveRequest = (PathBuf, Box<dyn Serialize + Send>);

/// The current session.
pub struct Session {
    /// The root directory for this session
    pub session_root: PathBuf,

    /// The root directory for this session's archives
    pub arch_root: PathBuf,

    /// The path to the session's log file
    pub log_file_path: PathBuf,

    saver: Option<Saver>,
}

/// Handle to the background save thread.
struct Saver {
    requests: Sender<SaveRequest>,
    handle: JoinHandle<()>,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors associated with the session module.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("The software root environment variable (PURSUIT_SW_ROOT) is not set")]
    SwRootNotSet,

    #[error("Cannot create the session directory: {0}")]
    CannotCreateDir(std::io::Error),

    #[error("A session has already been started in this process ({0})")]
    CannotInitEpoch(conquer_once::TryInitError),
}

/// Reasons a single save can fail. These are logged by the save thread, not returned.
#[derive(Error, Debug)]
enum SaveError {
    #[error("cannot create {0:?}: {1}")]
    Create(PathBuf, std::io::Error),

    #[error("cannot serialise into {0:?}: {1}")]
    Serialise(PathBuf, serde_json::Error),

    #[error("don't know how to save {0:?}, only .json files are supported")]
    UnknownFormat(PathBuf),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Session {
    /// Start a new session in `$PURSUIT_SW_ROOT/{sessions_dir}`.
    pub fn new(exec_name: &str, sessions_dir: &str) -> Result<Self, SessionError> {
        let root = crate::host::get_sw_root().map_err(|_| SessionError::SwRootNotSet)?;

        Self::new_in(exec_name, root.join(sessions_dir))
    }

    /// Start a new session inside an explicit sessions directory.
    ///
    /// Only one session may be started per process, as the epoch is global.
    pub fn new_in<P: AsRef<Path>>(exec_name: &str, sessions_dir: P) -> Result<Self, SessionError> {
        let epoch = Utc::now();
        SESSION_EPOCH
            .try_init_once(|| epoch)
            .map_err(SessionError::CannotInitEpoch)?;

        let session_root = sessions_dir
            .as_ref()
            .join(format!("{}_{}", exec_name, epoch.format(TIMESTAMP_FORMAT)));
        let arch_root = session_root.join(ARCH_DIR_NAME);

        fs::create_dir_all(&arch_root).map_err(SessionError::CannotCreateDir)?;

        Ok(Session {
            log_file_path: session_root.join(format!("{}.log", exec_name)),
            saver: Some(Saver::spawn(session_root.clone())),
            session_root,
            arch_root,
        })
    }

    /// Save `data` to `path`, relative to the session root, on the save thread.
    pub fn save<P: AsRef<Path>, T: Serialize + Send + 'static>(&self, path: P, data: T) {
        let path = path.as_ref().to_path_buf();

        match self.saver {
            Some(ref s) => {
                if let Err(e) = s.requests.send((path, Box::new(data))) {
                    warn!("Save thread has stopped, cannot save {:?}", (e.0).0);
                }
            }
            None => warn!("Cannot save {:?}, the session has exited", path),
        }
    }

    /// End the session, blocking until all outstanding saves are complete.
    pub fn exit(mut self) {
        if let Some(saver) = self.saver.take() {
            info!("Waiting for pending saves");
            saver.finish();
        }

        info!("Session ended");
    }
}

impl Saver {
    fn spawn(session_root: PathBuf) -> Self {
        let (requests, rx) = channel();
        let handle = thread::spawn(move || run_saver(session_root, rx));

        Self { requests, handle }
    }

    /// Hang up and wait for the thread to drain the queue.
    fn finish(self) {
        drop(self.requests);

        if self.handle.join().is_err() {
            warn!("Save thread panicked");
        }
    }
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Seconds elapsed since the start of the session, `NaN` if no session has been started.
pub fn get_elapsed_seconds() -> f64 {
    SESSION_EPOCH
        .get()
        .and_then(|e| time::duration_to_seconds(Utc::now() - *e))
        .unwrap_or(std::f64::NAN)
}

/// The session's epoch, or `None` if no session has been started.
pub fn get_epoch() -> Option<&'static DateTime<Utc>> {
    SESSION_EPOCH.get()
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

/// Body of the save thread. Runs until every sender has hung up and the queue is empty.
fn run_saver(session_root: PathBuf, requests: Receiver<SaveRequest>) {
    for (path, data) in requests.iter() {
        let full_path = session_root.join(path);

        match write_file(&full_path, data.as_ref()) {
            Ok(()) => debug!("Saved {:?}", full_path),
            Err(e) => warn!("Save failed: {}", e),
        }
    }
}

fn write_file(path: &Path, data: &(dyn Serialize + Send)) -> Result<(), SaveError> {
    if path.extension().and_then(|e| e.to_str()) != Some("json") {
        return Err(SaveError::UnknownFormat(path.to_path_buf()));
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| SaveError::Create(path.to_path_buf(), e))?;
    }

    let file = File::create(path).map_err(|e| SaveError::Create(path.to_path_buf(), e))?;

    serde_json::to_writer_pretty(file, data)
        .map_err(|e| SaveError::Serialise(path.to_path_buf(), e))
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    // The epoch is process wide so everything using a real session lives in this one test.
    #[test]
    fn test_session_lifecycle() {
        let sessions_dir =
            std::env::temp_dir().join(format!("util_session_test_{}", std::process::id()));

        assert!(get_epoch().is_none());
        assert!(get_elapsed_seconds().is_nan());

        let session = Session::new_in("test_exec", &sessions_dir).unwrap();

        assert!(session.arch_root.is_dir());
        assert!(session.session_root.starts_with(&sessions_dir));
        assert_eq!(
            session.log_file_path.file_name().and_then(|n| n.to_str()),
            Some("test_exec.log")
        );
        assert!(get_epoch().is_some());
        assert!(get_elapsed_seconds() >= 0.0);

        // A second session in the same process is refused
        assert!(matches!(
            Session::new_in("other", &sessions_dir),
            Err(SessionError::CannotInitEpoch(_))
        ));

        session.save("summary.json", json!({"laps": 2}));
        session.save("nested/report.json", json!([1, 2, 3]));
        session.save("image.bmp", json!(null));

        let root = session.session_root.clone();
        session.exit();

        let summary: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(root.join("summary.json")).unwrap()).unwrap();
        assert_eq!(summary["laps"], 2);
        assert!(root.join("nested/report.json").is_file());
        assert!(!root.join("image.bmp").exists());

        fs::remove_dir_all(&sessions_dir).ok();
    }
}
