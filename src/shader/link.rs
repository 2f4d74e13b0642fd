//! Shader program linking and reflection.

use naga::valid::{Capabilities, ValidationFlags, Validator};

use super::{compile, ShaderError, ShaderStage};

/// Name of the per-frame time uniform the fragment shader may declare.
const TIME_UNIFORM: &str = "u_time";

/// Name of the vertex-position attribute the vertex shader may declare.
const POSITION_ATTRIBUTE: &str = "a_position";

/// Bind point of the uniform block that carries the time uniform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeBinding {
    pub group: u32,
    pub binding: u32,
}

/// A linked pair of validated shader modules.
///
/// Declaring neither the time uniform nor the position attribute is valid;
/// the reflection lookups simply return `None` and the renderer skips the
/// corresponding wiring.
#[derive(Debug)]
pub struct ShaderProgram {
    fragment: naga::Module,
    vertex: naga::Module,
}

impl ShaderProgram {
    /// Compile both stages and validate them into a usable program.
    ///
    /// The fragment stage is compiled first, then the vertex stage; the order
    /// has no semantic effect but keeps diagnostics deterministic. On any
    /// failure the partially built program is dropped before the error
    /// propagates.
    pub fn link(fragment_source: &str, vertex_source: &str) -> Result<Self, ShaderError> {
        let fragment = compile(ShaderStage::Fragment, fragment_source)?;
        let vertex = compile(ShaderStage::Vertex, vertex_source)?;

        validate(&fragment, fragment_source)?;
        validate(&vertex, vertex_source)?;

        Ok(Self { fragment, vertex })
    }

    /// The validated fragment module.
    pub fn fragment(&self) -> &naga::Module {
        &self.fragment
    }

    /// The validated vertex module.
    pub fn vertex(&self) -> &naga::Module {
        &self.vertex
    }

    /// Bind point of the uniform block containing `u_time`, if any stage
    /// declares one. Absence is expected input, not a failure.
    pub fn time_uniform(&self) -> Option<TimeBinding> {
        find_time_uniform(&self.fragment).or_else(|| find_time_uniform(&self.vertex))
    }

    /// Vertex-input location of `a_position`, if the vertex stage declares it.
    pub fn position_attribute(&self) -> Option<u32> {
        let entry = self
            .vertex
            .entry_points
            .iter()
            .find(|ep| ep.stage == naga::ShaderStage::Vertex)?;

        entry.function.arguments.iter().find_map(|arg| {
            if arg.name.as_deref() != Some(POSITION_ATTRIBUTE) {
                return None;
            }
            match arg.binding {
                Some(naga::Binding::Location { location, .. }) => Some(location),
                _ => None,
            }
        })
    }
}

/// The "link" step: run the naga validator over a compiled module.
fn validate(module: &naga::Module, source: &str) -> Result<(), ShaderError> {
    Validator::new(ValidationFlags::all(), Capabilities::default())
        .validate(module)
        .map(|_| ())
        .map_err(|err| ShaderError::Link {
            log: err.emit_to_string(source),
        })
}

fn find_time_uniform(module: &naga::Module) -> Option<TimeBinding> {
    for (_, var) in module.global_variables.iter() {
        if var.space != naga::AddressSpace::Uniform {
            continue;
        }
        let Some(ref resource) = var.binding else {
            continue;
        };
        if let naga::TypeInner::Struct { ref members, .. } = module.types[var.ty].inner {
            if members
                .iter()
                .any(|m| m.name.as_deref() == Some(TIME_UNIFORM))
            {
                return Some(TimeBinding {
                    group: resource.group,
                    binding: resource.binding,
                });
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    const VERTEX: &str = r#"
        #version 450
        layout(location = 0) in vec2 a_position;
        void main() {
            gl_Position = vec4(a_position, 0.0, 1.0);
        }
    "#;

    const FRAGMENT_WITH_TIME: &str = r#"
        #version 450
        layout(set = 0, binding = 0) uniform FrameUniforms {
            float u_time;
        };
        layout(location = 0) out vec4 frag_color;
        void main() {
            frag_color = vec4(abs(sin(u_time)), 0.0, 0.0, 1.0);
        }
    "#;

    const FRAGMENT_WITHOUT_TIME: &str = r#"
        #version 450
        layout(location = 0) out vec4 frag_color;
        void main() {
            frag_color = vec4(0.2, 0.4, 0.6, 1.0);
        }
    "#;

    #[test]
    fn test_link_valid_pair() {
        let program = ShaderProgram::link(FRAGMENT_WITH_TIME, VERTEX).unwrap();
        assert_eq!(program.fragment().entry_points.len(), 1);
        assert_eq!(program.vertex().entry_points.len(), 1);
    }

    #[test]
    fn test_time_uniform_resolved() {
        let program = ShaderProgram::link(FRAGMENT_WITH_TIME, VERTEX).unwrap();
        let binding = program.time_uniform().unwrap();
        assert_eq!(binding.group, 0);
        assert_eq!(binding.binding, 0);
    }

    #[test]
    fn test_missing_time_uniform_is_not_an_error() {
        let program = ShaderProgram::link(FRAGMENT_WITHOUT_TIME, VERTEX).unwrap();
        assert_eq!(program.time_uniform(), None);
    }

    #[test]
    fn test_position_attribute_resolved() {
        let program = ShaderProgram::link(FRAGMENT_WITHOUT_TIME, VERTEX).unwrap();
        assert_eq!(program.position_attribute(), Some(0));
    }

    #[test]
    fn test_link_fails_on_invalid_fragment() {
        let err = ShaderProgram::link("not a shader", VERTEX).unwrap_err();
        assert!(matches!(
            err,
            ShaderError::Compile {
                stage: ShaderStage::Fragment,
                ..
            }
        ));
    }
}
