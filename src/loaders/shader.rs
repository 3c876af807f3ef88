//! Shader sources on disk.

use std::path::Path;

use log::{debug, error};

use crate::error::Result;
use crate::gfx::device::{Context, GraphicsDevice, ShaderKind};
use crate::gfx::resources::{Program, Shader};

/// Reads `path` and compiles it as a `kind` shader. The device's compile log
/// is written to the error log on failure.
pub fn load_shader<D: GraphicsDevice>(
    ctx: &mut Context<D>,
    path: impl AsRef<Path>,
    kind: ShaderKind,
) -> Result<Shader> {
    let path = path.as_ref();
    let mut shader = Shader::new();
    if let Err(e) = shader.compile_file(ctx, path, kind) {
        error!(
            "could not load {:?} shader {}: {}",
            kind,
            path.display(),
            shader.log().unwrap_or("no log")
        );
        return Err(e);
    }
    debug!("loaded {:?} shader {}", kind, path.display());
    Ok(shader)
}

/// Loads a vertex and a fragment shader and links them into a program.
pub fn load_program<D: GraphicsDevice>(
    ctx: &mut Context<D>,
    vertex: impl AsRef<Path>,
    fragment: impl AsRef<Path>,
) -> Result<Program> {
    let mut vs = load_shader(ctx, vertex, ShaderKind::Vertex)?;
    let mut fs = match load_shader(ctx, fragment, ShaderKind::Fragment) {
        Ok(fs) => fs,
        Err(e) => {
            vs.delete(ctx);
            return Err(e);
        }
    };

    let mut program = Program::new();
    if let Err(e) = program.attach(ctx, vs) {
        fs.delete(ctx);
        program.delete(ctx, true);
        return Err(e);
    }
    program.attach(ctx, fs)?;
    if let Err(e) = program.link(ctx) {
        program.delete(ctx, true);
        return Err(e);
    }
    Ok(program)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::gfx::device::HeadlessDevice;
    use std::fs;
    use std::path::PathBuf;

    fn write_temp(name: &str, source: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("jgl-{}-{}", std::process::id(), name));
        fs::write(&path, source).unwrap();
        path
    }

    #[test]
    fn test_load_shader() {
        let path = write_temp("ok.vert", "in vec3 a_position;\nvoid main() {}\n");
        let mut ctx = Context::new(HeadlessDevice::new());
        let shader = load_shader(&mut ctx, &path, ShaderKind::Vertex).unwrap();
        assert!(shader.is_compiled());
        assert_eq!(shader.kind(), Some(ShaderKind::Vertex));
        fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_compile_failure_frees_shader() {
        let path = write_temp("bad.frag", "#error unexpected token\n");
        let mut ctx = Context::new(HeadlessDevice::new());
        let err = load_shader(&mut ctx, &path, ShaderKind::Fragment).unwrap_err();
        assert!(matches!(err, Error::Compile { kind: ShaderKind::Fragment, .. }));
        assert_eq!(ctx.device().live_object_count(), 0);
        fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_missing_file() {
        let mut ctx = Context::new(HeadlessDevice::new());
        let err = load_shader(&mut ctx, "/no/such/shader.vert", ShaderKind::Vertex).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }

    #[test]
    fn test_load_program_links() {
        let vs = write_temp("prog.vert", "in vec3 a_position;\nuniform mat4 u_view;\nvoid main() {}\n");
        let fs_path = write_temp("prog.frag", "void main() {}\n");
        let mut ctx = Context::new(HeadlessDevice::new());
        let program = load_program(&mut ctx, &vs, &fs_path).unwrap();
        assert!(program.is_linked());
        assert_eq!(program.attached().len(), 2);
        fs::remove_file(vs).unwrap();
        fs::remove_file(fs_path).unwrap();
    }

    #[test]
    fn test_load_program_cleans_up_on_failure() {
        let vs = write_temp("half.vert", "void main() {}\n");
        let mut ctx = Context::new(HeadlessDevice::new());
        assert!(load_program(&mut ctx, &vs, "/no/such/shader.frag").is_err());
        assert_eq!(ctx.device().live_object_count(), 0);
        fs::remove_file(vs).unwrap();
    }
}
