//! Single-stage GLSL compilation.

use naga::front::glsl;

use super::{ShaderError, ShaderStage};

/// Compile one GLSL source into a naga module for the given stage.
///
/// On failure the returned [`ShaderError::Compile`] carries the front-end's
/// full diagnostic log; nothing of the failed compile is retained.
pub fn compile(stage: ShaderStage, source: &str) -> Result<naga::Module, ShaderError> {
    let mut frontend = glsl::Frontend::default();
    frontend
        .parse(&glsl::Options::from(stage.to_naga()), source)
        .map_err(|errors| ShaderError::Compile {
            stage,
            log: errors.emit_to_string(source),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRIVIAL_FRAGMENT: &str = r#"
        #version 450
        layout(location = 0) out vec4 frag_color;
        void main() {
            frag_color = vec4(1.0, 0.0, 0.0, 1.0);
        }
    "#;

    #[test]
    fn test_compile_valid_fragment() {
        let module = compile(ShaderStage::Fragment, TRIVIAL_FRAGMENT).unwrap();
        assert_eq!(module.entry_points.len(), 1);
    }

    #[test]
    fn test_compile_invalid_source_reports_log() {
        let err = compile(ShaderStage::Fragment, "this is not glsl").unwrap_err();
        match err {
            ShaderError::Compile { stage, ref log } => {
                assert_eq!(stage, ShaderStage::Fragment);
                assert!(!log.is_empty());
            }
            ShaderError::Link { .. } => panic!("expected a compile error"),
        }
    }

    #[test]
    fn test_compile_error_mentions_stage() {
        let err = compile(ShaderStage::Vertex, "#version 450\nvoid main() { oops; }").unwrap_err();
        assert!(err.to_string().contains("vertex"));
    }
}
