pub mod controller;
pub mod state;

pub use controller::{RecorderSnapshot, SessionRecorder};
pub use state::{RecorderState, RecorderStatus};
