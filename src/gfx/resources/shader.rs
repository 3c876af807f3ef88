use std::path::Path;

use log::{debug, error};

use crate::error::{Error, Result};
use crate::gfx::device::{Context, GraphicsDevice, Handle, ShaderKind};

/// A single shader stage.
///
/// A failed compile keeps the device's info log in [`log`](Self::log) and
/// frees the handle, so the shader returns to the unallocated state.
#[derive(Debug, Default)]
pub struct Shader {
    handle: Option<Handle>,
    kind: Option<ShaderKind>,
    source: Option<String>,
    log: Option<String>,
}

impl Shader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle(&self) -> Option<Handle> {
        self.handle
    }

    pub fn kind(&self) -> Option<ShaderKind> {
        self.kind
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// Diagnostic from the last failed compile; `None` after a success.
    pub fn log(&self) -> Option<&str> {
        self.log.as_deref()
    }

    pub fn is_compiled(&self) -> bool {
        self.handle.is_some() && self.log.is_none()
    }

    pub fn compile<D: GraphicsDevice>(&mut self, ctx: &mut Context<D>, source: &str, kind: ShaderKind) -> Result<()> {
        if self.kind != Some(kind) {
            self.delete(ctx);
        }
        let handle = match self.handle {
            Some(handle) => handle,
            None => {
                let handle = ctx.device_mut().create_shader(kind)?;
                self.handle = Some(handle);
                handle
            }
        };
        self.kind = Some(kind);
        self.source = Some(source.to_string());

        let device = ctx.device_mut();
        device.shader_source(handle, source);
        device.compile_shader(handle);

        if !device.shader_compile_status(handle) {
            let log = device.shader_info_log(handle);
            error!("{:?} shader failed to compile: {}", kind, log);
            self.log = Some(log.clone());
            self.delete(ctx);
            return Err(Error::Compile { kind, log });
        }

        debug!("compiled {:?} shader {}", kind, handle);
        self.log = None;
        Ok(())
    }

    /// Reads `path` and compiles it. A read failure is kept in the log too.
    pub fn compile_file<D: GraphicsDevice>(
        &mut self,
        ctx: &mut Context<D>,
        path: impl AsRef<Path>,
        kind: ShaderKind,
    ) -> Result<()> {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(source) => self.compile(ctx, &source, kind),
            Err(source) => {
                self.log = Some(source.to_string());
                Err(Error::io(path, source))
            }
        }
    }

    /// Frees the device object. Deleting twice is a no-op.
    pub fn delete<D: GraphicsDevice>(&mut self, ctx: &mut Context<D>) {
        if let Some(handle) = self.handle.take() {
            ctx.device_mut().delete_shader(handle);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::device::HeadlessDevice;

    #[test]
    fn test_successful_compile() {
        let mut ctx = Context::new(HeadlessDevice::new());
        let mut shader = Shader::new();
        shader
            .compile(&mut ctx, "void main() {}", ShaderKind::Fragment)
            .unwrap();
        assert!(shader.is_compiled());
        assert_eq!(shader.kind(), Some(ShaderKind::Fragment));
        assert_eq!(shader.log(), None);
        let handle = shader.handle().unwrap();
        assert_eq!(ctx.device().shader_source_of(handle), Some("void main() {}"));
    }

    #[test]
    fn test_failed_compile_keeps_log_and_frees_handle() {
        let mut ctx = Context::new(HeadlessDevice::new());
        let mut shader = Shader::new();
        let err = shader
            .compile(&mut ctx, "#error missing semicolon\nvoid main() {}", ShaderKind::Vertex)
            .unwrap_err();

        assert!(matches!(err, Error::Compile { kind: ShaderKind::Vertex, .. }));
        assert!(shader.handle().is_none());
        assert!(!shader.is_compiled());
        assert!(shader.log().unwrap().contains("missing semicolon"));
        assert_eq!(ctx.device().live_object_count(), 0);
    }

    #[test]
    fn test_recompile_reuses_handle() {
        let mut ctx = Context::new(HeadlessDevice::new());
        let mut shader = Shader::new();
        shader.compile(&mut ctx, "void main() {}", ShaderKind::Vertex).unwrap();
        let first = shader.handle();
        shader.compile(&mut ctx, "void main() { }", ShaderKind::Vertex).unwrap();
        assert_eq!(shader.handle(), first);
        assert_eq!(ctx.device().call_count("create_shader"), 1);
    }

    #[test]
    fn test_missing_file() {
        let mut ctx = Context::new(HeadlessDevice::new());
        let mut shader = Shader::new();
        let err = shader
            .compile_file(&mut ctx, "/definitely/not/here.vert", ShaderKind::Vertex)
            .unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
        assert!(shader.log().is_some());
    }
}
