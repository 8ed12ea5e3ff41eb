pub mod capture_loop;
pub mod controller;
pub mod snapshot;
pub mod tracking_loop;

pub use capture_loop::CaptureLoopConfig;
pub use controller::{LoopContext, SensingController};
