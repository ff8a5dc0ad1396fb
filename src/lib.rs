//! # Fanrig
//!
//! **An articulated pedestal fan built from procedural meshes and a matrix-stack scene graph.**
//!
//! The fan is a fixed tree of rigid parts (base, stand, motor, guard, blades). Each
//! frame, a [`TransformStack`] seeded with the camera's view matrix walks that tree:
//! oscillation is applied once at the motor and reaches the guard and blades through
//! composition, while blade spin is applied below it at the rotor.
//!
//! ## Quick Start
//!
//! ```no_run
//! use fanrig::fan::{FanModel, FanPreset};
//! use fanrig::{AnimationParams, AppConfig, CameraState, Viewer};
//!
//! let model = FanModel::build(FanPreset::Deluxe).unwrap();
//! let viewer = Viewer::new(model, AnimationParams::default(), CameraState::default());
//! fanrig::run(AppConfig::new().title("Fan").size(1280, 720), viewer).unwrap();
//! ```
//!
//! ## Layout
//!
//! - [`geometry`]: pure mesh generators (disk, cylinder, guard cage, blade) and `concat`
//! - [`fan`]: part tree, presets, mesh registry and traversal
//! - [`TransformStack`], [`AnimationClock`], [`CameraState`]: the per-frame inputs
//! - [`GpuContext`], [`MeshPass`], [`RenderQueue`]: the wgpu draw path

mod animation;
mod app;
mod camera;
mod config;
mod controls;
pub mod fan;
pub mod geometry;
mod gpu;
mod input;
mod mesh;
mod mesh_pass;
mod orbit_camera;
mod render_queue;
mod transform_stack;
mod viewer;

pub use animation::{AnimationClock, AnimationParams, AnimationState};
pub use app::{AppConfig, RunError, run};
pub use camera::Projection;
pub use config::{CameraSettings, ConfigError, ModelSettings, ViewerConfig, WindowSettings};
pub use controls::{Command, Controls};
pub use geometry::GeometryError;
pub use gpu::{GpuContext, InitError};
pub use input::Input;
pub use mesh::{Mesh, MeshData, Vertex3d};
pub use mesh_pass::{CLEAR_COLOR, DrawCall, MeshPass};
pub use orbit_camera::{CameraState, LOOK_HEIGHT};
pub use render_queue::{QueuedMesh, RenderQueue};
pub use transform_stack::{StackError, TransformStack};
pub use viewer::Viewer;

// Re-export glam math types for convenience
pub use glam::{Mat4, Vec3};

// Re-export commonly used winit types for convenience
pub use winit::keyboard::KeyCode;
