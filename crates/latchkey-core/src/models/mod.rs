//! Typed request and response shapes for the device API.
//!
//! Field names mirror the firmware's JSON keys. Everything optional on the
//! wire is optional here so older firmware revisions still parse.

pub mod enrollment;
pub mod settings;
pub mod system;

pub use enrollment::{Enrollment, EnrollmentKind, EnrollmentList, EnrollmentStatus};
pub use settings::DeviceSettings;
pub use system::{Ack, FirmwareInfo, LogEntry};
