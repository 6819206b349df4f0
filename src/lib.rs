//! Procedural n-sided prism viewer.
//!
//! The crate generates a flat triangle list for a prism, uploads it once
//! with wgpu and lets the user fly a camera around it, move it and spin it
//! from the keyboard. Mesh generation and the transform controller do not
//! touch the GPU or the windowing system, so they can be used and tested
//! headless.

pub mod app;
pub mod bindings;
pub mod camera;
pub mod controller;
pub mod input;
pub mod mesh;
pub mod render;

pub use app::{DrawMode, PrismApp, WindowInitError};
pub use bindings::{Action, KeyBindings};
pub use camera::{Camera, Movement};
pub use controller::{ControllerConfig, ObjectTransform, TransformController};
pub use input::{InputState, KeyCode, NamedKey};
pub use mesh::{cap_polygon, prism, MeshError, PrismMesh, Triangle, Vertex};
pub use render::{CameraParams, Renderer};
