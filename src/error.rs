//! Crate-wide error type.
//!
//! Loaders, shader compilation and device resource creation all report through
//! [`Error`]. Capacity violations on [`Geometry`](crate::gfx::geometry::Geometry)
//! are not represented here: writing past a preallocated buffer is a programming
//! error and panics.

use std::path::PathBuf;

use thiserror::Error;

use crate::gfx::device::ShaderKind;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// A file (model, material library, shader source, image) could not be read.
    #[error("could not read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed content in a text format. `line` is 1-based.
    #[error("parse error on line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("{kind:?} shader failed to compile: {log}")]
    Compile { kind: ShaderKind, log: String },

    #[error("program failed to link: {log}")]
    Link { log: String },

    #[error("program failed validation: {log}")]
    Validate { log: String },

    /// Drawing was requested with a program that never linked successfully.
    #[error("cannot draw with a program that is not linked")]
    ProgramNotLinked,

    /// The device refused to allocate a handle.
    #[error("graphics device error: {0}")]
    Device(String),

    #[error("framebuffer incomplete (status 0x{0:04x})")]
    IncompleteFramebuffer(u32),

    #[error(transparent)]
    Image(#[from] image::ImageError),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn parse(line: usize, message: impl Into<String>) -> Self {
        Error::Parse {
            line,
            message: message.into(),
        }
    }
}
