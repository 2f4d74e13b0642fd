//! GLSL shader compilation and linking.
//!
//! Stages are parsed into naga IR on the CPU, so compile and link
//! diagnostics are available without touching the GPU. The validated
//! modules are handed to wgpu as-is when the render pipeline is built.

use std::fmt;

use thiserror::Error;

pub mod compile;
pub mod link;

pub use compile::compile;
pub use link::{ShaderProgram, TimeBinding};

/// Pipeline stage a shader source is compiled for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    pub(crate) fn to_naga(self) -> naga::ShaderStage {
        match self {
            ShaderStage::Vertex => naga::ShaderStage::Vertex,
            ShaderStage::Fragment => naga::ShaderStage::Fragment,
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => write!(f, "vertex"),
            ShaderStage::Fragment => write!(f, "fragment"),
        }
    }
}

/// Errors that can occur while building a shader program.
#[derive(Error, Debug)]
pub enum ShaderError {
    #[error("Failed to compile {stage} shader:\n{log}")]
    Compile { stage: ShaderStage, log: String },

    #[error("Failed to link shader program:\n{log}")]
    Link { log: String },
}
