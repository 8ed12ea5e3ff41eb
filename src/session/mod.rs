pub mod controller;
pub mod state;

pub use controller::{Collaborators, SessionController, StopOutcome};
pub use state::{LifecycleStatus, SessionSnapshot, SessionState};
