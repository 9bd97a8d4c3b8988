// SPDX-FileCopyrightText: 2021 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::error::Error;
use std::fmt::{self, Display, Formatter};

/// A stage of a [`Shader`][`crate::shader::Shader`] program.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ShaderStage {
    /// Transforms vertices.
    Vertex,
    /// Colors fragments.
    Fragment,
}

impl ShaderStage {
    /// Name of the stage as used in logs.
    pub fn name(self) -> &'static str {
        match self {
            Self::Vertex => "vertex",
            Self::Fragment => "fragment",
        }
    }
}

/// Errors that abort setting up a [`Renderer`][`crate::renderer::Renderer`] or its resources.
#[derive(Debug, PartialEq)]
pub enum RendererError {
    /// The canvas could not provide a WebGL context.
    ContextUnavailable(String),
    /// A [`ShaderStage`] failed to compile. Contains the driver's info log.
    ShaderCompile {
        /// Stage that failed.
        stage: ShaderStage,
        /// Driver info log.
        log: String,
    },
    /// The program failed to link. Contains the driver's info log.
    ShaderLink(String),
    /// A `create_*` call returned null, usually because the context was lost.
    Resource(&'static str),
    /// The document didn't contain what was expected, or options were invalid.
    Dom(String),
}

impl Display for RendererError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::ContextUnavailable(message) => write!(f, "{}", message),
            Self::ShaderCompile { stage, log } if log.is_empty() => {
                write!(f, "could not compile {} shader", stage.name())
            }
            Self::ShaderCompile { stage, log } => {
                write!(f, "could not compile {} shader: {}", stage.name(), log)
            }
            Self::ShaderLink(log) if log.is_empty() => write!(f, "could not initialize shaders"),
            Self::ShaderLink(log) => write!(f, "could not initialize shaders: {}", log),
            Self::Resource(what) => write!(f, "could not create {}", what),
            Self::Dom(message) => write!(f, "{}", message),
        }
    }
}

impl Error for RendererError {}

impl From<String> for RendererError {
    fn from(message: String) -> Self {
        Self::Dom(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display() {
        let e = RendererError::ShaderCompile {
            stage: ShaderStage::Fragment,
            log: "ERROR: 0:1: 'foo' : syntax error".to_owned(),
        };
        assert_eq!(
            e.to_string(),
            "could not compile fragment shader: ERROR: 0:1: 'foo' : syntax error"
        );

        let e = RendererError::ShaderLink(String::new());
        assert_eq!(e.to_string(), "could not initialize shaders");

        let e = RendererError::Resource("buffer");
        assert_eq!(e.to_string(), "could not create buffer");
    }

    #[test]
    fn from_string() {
        let e: RendererError = "no canvas #webgl".to_owned().into();
        assert_eq!(e, RendererError::Dom("no canvas #webgl".to_owned()));
    }
}
