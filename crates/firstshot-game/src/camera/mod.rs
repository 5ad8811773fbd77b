//! Camera system module
//!
//! First-person look: a camera basis rotated incrementally by analog input.

mod config;
mod controller;
mod state;

pub use config::LookConfig;
pub use controller::LookController;
pub use state::CameraState;
