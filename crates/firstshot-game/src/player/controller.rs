//! Movement controller
//!
//! Tracks which movement actions are held and turns them into a horizontal
//! walk vector relative to the camera every frame.

use firstshot_core::Vec3;
use firstshot_physics::CharacterBody;
use tracing::{debug, trace};

use super::MovementConfig;
use crate::camera::CameraState;
use crate::input::InputAction;

/// Held state of the movement actions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeldMovement {
    pub left: bool,
    pub right: bool,
    pub forward: bool,
    pub backward: bool,
    pub run: bool,
}

/// Drives a [`CharacterBody`] from held movement actions
#[derive(Debug, Clone, Default)]
pub struct MovementController {
    pub config: MovementConfig,
    held: HeldMovement,
    jump_held: bool,
    walk_direction: Vec3,
}

impl MovementController {
    pub fn new(config: MovementConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    /// Current held state
    pub fn held(&self) -> HeldMovement {
        self.held
    }

    /// Whether the jump action is currently held
    pub fn jump_held(&self) -> bool {
        self.jump_held
    }

    /// Walk vector computed by the last update
    pub fn walk_direction(&self) -> Vec3 {
        self.walk_direction
    }

    /// Handle an action change. Returns false for actions this controller
    /// does not own.
    pub fn on_action(&mut self, action: InputAction, pressed: bool, body: &mut CharacterBody) -> bool {
        match action {
            InputAction::MoveLeft => self.held.left = pressed,
            InputAction::MoveRight => self.held.right = pressed,
            InputAction::MoveForward => self.held.forward = pressed,
            InputAction::MoveBackward => self.held.backward = pressed,
            InputAction::Run => self.held.run = pressed,
            InputAction::Jump => {
                if pressed && !self.jump_held && body.jump() {
                    debug!("Jump");
                }
                self.jump_held = pressed;
            }
            InputAction::Shoot => return false,
        }
        trace!("{:?} -> {}", action, pressed);
        true
    }

    /// Recompute the walk vector from the camera basis and hand it to the body
    pub fn update(&mut self, camera: &CameraState, body: &mut CharacterBody) -> Vec3 {
        self.walk_direction = walk_vector(
            &self.config,
            &self.held,
            camera.direction(),
            camera.left(),
        );
        body.set_walk_direction(self.walk_direction);
        self.walk_direction
    }

    /// Release everything and stop the body
    pub fn reset(&mut self, body: &mut CharacterBody) {
        self.held = HeldMovement::default();
        self.jump_held = false;
        self.walk_direction = Vec3::ZERO;
        body.set_walk_direction(Vec3::ZERO);
    }
}

/// Horizontal walk vector for a held state and camera basis
pub fn walk_vector(
    config: &MovementConfig,
    held: &HeldMovement,
    direction: Vec3,
    left: Vec3,
) -> Vec3 {
    let multiplier = config.speed_multiplier(held.run);
    let forward = Vec3::new(direction.x, 0.0, direction.z) * config.forward_speed * multiplier;
    let side = Vec3::new(left.x, 0.0, left.z) * config.side_speed * multiplier;

    let mut walk = Vec3::ZERO;
    if held.left {
        walk += side;
    }
    if held.right {
        walk -= side;
    }
    if held.forward {
        walk += forward;
    }
    if held.backward {
        walk -= forward;
    }
    walk
}
