pub mod reading;
pub mod tilt;
pub mod log_entry;

pub use reading::Reading;
pub use tilt::TiltAngles;
pub use log_entry::{LogEntry, TiltLog};
