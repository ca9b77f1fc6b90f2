//! glam re-exports shared by every vantage crate.

pub use glam::{Mat3, Mat4, Quat, Vec2, Vec3, Vec4};
