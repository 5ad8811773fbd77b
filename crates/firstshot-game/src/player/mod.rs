//! Player controller module
//!
//! Walk-direction movement driven by held actions, plus the pistol mount
//! that follows the camera pitch.

mod controller;
mod movement;
mod weapon;

pub use controller::{HeldMovement, MovementController};
pub use movement::MovementConfig;
pub use weapon::{WeaponConfig, WeaponMount};
