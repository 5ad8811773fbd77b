//! Firstshot Game - first-person gameplay core
//!
//! Mouse look, walk-direction movement, projectile lifecycle and the input
//! mapping that feeds them.

pub mod camera;
pub mod error;
pub mod input;
pub mod player;
pub mod projectile;
pub mod scene;
pub mod session;

pub use camera::{CameraState, LookConfig, LookController};
pub use error::GameError;
pub use input::{
    AnalogAxis, AxisTrigger, BindingTable, InputAction, InputBinding, InputBindings, InputConfig,
    InputEvent, InputMapper, MouseAxis,
};
pub use player::{HeldMovement, MovementConfig, MovementController, WeaponConfig, WeaponMount};
pub use projectile::{Launch, Projectile, ProjectileConfig, ProjectileId, ProjectileManager};
pub use scene::{Material, Mesh, Scene, SceneNode, VisualHandle};
pub use session::{FrameReport, Gameplay, GameplayConfig};
