//! Voice annotation recording: the capture device seam, the exclusive
//! recorder session, and the finalizer that moves a completed recording
//! into its memory's permanent audio slot.

pub mod device;
pub mod finalize;
pub mod recorder;

pub use device::{CaptureDevice, DeviceError, FileCaptureDevice};
pub use finalize::{finalize, FinalizeError};
pub use recorder::{Recorder, RecorderError, RecorderSession};
