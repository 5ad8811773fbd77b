//! Firstshot Core - Shared types and utilities
//!
//! This crate provides the foundational types used by the other crates:
//! - Mathematical primitives (re-exported from glam)
//! - Transform for posing scene nodes
//! - Frame clock for clamped, scalable delta time

pub mod time;
pub mod types;

pub use glam::{EulerRot, Mat3, Quat, Vec3};
pub use time::{GameTime, TimeConfig};
pub use types::{Color, Transform};
