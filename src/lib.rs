//! Huewave
//!
//! Minimal animated shader demo: loads a GLSL fragment/vertex pair at
//! runtime, compiles and links them through the naga front-end, and renders
//! a full-screen quad whose color mix is driven by elapsed time.
//!
//! # Features
//!
//! - Runtime GLSL loading with compile/link diagnostics
//! - Optional time uniform and position attribute, resolved by reflection
//! - Windowed rendering via winit + wgpu with density-aware surface sizing
//! - Headless offscreen rendering with pixel readback (used by tests)

pub mod app;
pub mod assets;
pub mod gpu;
pub mod shader;

// Re-export commonly used types
pub use app::{App, AppState, FrameClock, InitError};
pub use assets::{load_text, shader_dir, LoadError};
pub use gpu::{physical_extent, GpuContext, GpuError, QuadPipeline, QuadRenderer, SurfaceState};
pub use shader::{compile, ShaderError, ShaderProgram, ShaderStage, TimeBinding};
