//! GPU rendering using wgpu.
//!
//! Provides the device/queue context, swapchain sizing, the full-surface
//! quad pipeline, and a renderer with both windowed and headless paths.

pub mod context;
pub mod pipeline;
pub mod renderer;
pub mod surface;

pub use context::{GpuContext, GpuError};
pub use pipeline::{FrameUniforms, QuadPipeline, QuadVertex, FULLSCREEN_QUAD};
pub use renderer::QuadRenderer;
pub use surface::{physical_extent, SurfaceState};
