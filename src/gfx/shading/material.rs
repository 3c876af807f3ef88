use std::path::PathBuf;

use crate::error::Result;
use crate::gfx::device::{Context, GraphicsDevice};
use crate::gfx::resources::{Program, Texture};

pub const MAX_SHININESS: f32 = 128.0;

/// Texture unit the diffuse map is bound to.
pub const DIFFUSE_MAP_UNIT: u32 = 0;

/// GPU layout of [`PhongMaterial`] for a `u_material` uniform block.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MaterialUniform {
    pub ambient: [f32; 4],
    pub diffuse: [f32; 4],
    pub specular: [f32; 4],
    pub emission: [f32; 4],
    pub shininess: f32,
    pub has_diffuse_map: u32,
    _padding: [u32; 2],
}

/// Classic Phong surface description.
#[derive(Debug, Clone, PartialEq)]
pub struct PhongMaterial {
    pub name: String,
    pub ambient: [f32; 4],
    pub diffuse: [f32; 4],
    pub specular: [f32; 4],
    pub emission: [f32; 4],
    shininess: f32,
    /// MTL illumination model number.
    pub illum: u32,
    /// Diffuse texture file, relative to the material library.
    pub diffuse_map: Option<PathBuf>,
}

impl Default for PhongMaterial {
    fn default() -> Self {
        Self {
            name: String::from("default"),
            ambient: [0.2, 0.2, 0.2, 1.0],
            diffuse: [0.8, 0.8, 0.8, 1.0],
            specular: [0.0, 0.0, 0.0, 1.0],
            emission: [0.0, 0.0, 0.0, 1.0],
            shininess: 96.0,
            illum: 2,
            diffuse_map: None,
        }
    }
}

impl PhongMaterial {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn shininess(&self) -> f32 {
        self.shininess
    }

    /// Clamped to `[0, 128]`.
    pub fn set_shininess(&mut self, shininess: f32) {
        self.shininess = shininess.clamp(0.0, MAX_SHININESS);
    }

    pub fn alpha(&self) -> f32 {
        self.diffuse[3]
    }

    /// Sets the alpha of every colour term.
    pub fn set_alpha(&mut self, alpha: f32) {
        for color in [&mut self.ambient, &mut self.diffuse, &mut self.specular, &mut self.emission] {
            color[3] = alpha;
        }
    }

    pub fn is_transparent(&self) -> bool {
        self.alpha() < 1.0
    }

    /// Uses one colour for both diffuse and ambient reflection.
    pub fn set_diffuse_ambient(&mut self, color: [f32; 4]) {
        self.diffuse = color;
        self.ambient = color;
    }

    pub fn uniform(&self, has_diffuse_map: bool) -> MaterialUniform {
        MaterialUniform {
            ambient: self.ambient,
            diffuse: self.diffuse,
            specular: self.specular,
            emission: self.emission,
            shininess: self.shininess,
            has_diffuse_map: has_diffuse_map as u32,
            _padding: [0; 2],
        }
    }

    /// Writes the `u_material.*` uniforms the program declares and binds
    /// `diffuse_texture` on [`DIFFUSE_MAP_UNIT`].
    pub fn apply<D: GraphicsDevice>(
        &self,
        ctx: &mut Context<D>,
        program: &Program,
        diffuse_texture: Option<&mut Texture>,
    ) -> Result<()> {
        program.set_uniform(ctx, "u_material.ambient", self.ambient);
        program.set_uniform(ctx, "u_material.diffuse", self.diffuse);
        program.set_uniform(ctx, "u_material.specular", self.specular);
        program.set_uniform(ctx, "u_material.emission", self.emission);
        program.set_uniform(ctx, "u_material.shininess", self.shininess);
        program.set_uniform(ctx, "u_material.has_diffuse_map", diffuse_texture.is_some());

        if let Some(texture) = diffuse_texture {
            texture.bind_to_unit(ctx, DIFFUSE_MAP_UNIT)?;
            program.set_uniform(ctx, "u_material.diffuse_map", DIFFUSE_MAP_UNIT as i32);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::device::{HeadlessDevice, ShaderKind, TextureTarget, UniformValue};
    use crate::gfx::resources::Shader;

    const FRAGMENT: &str = "
        struct Material {
            vec4 ambient;
            vec4 diffuse;
            vec4 specular;
            vec4 emission;
            float shininess;
            bool has_diffuse_map;
            sampler2D diffuse_map;
        };
        uniform Material u_material;
        void main() {}
    ";

    fn material_program(ctx: &mut Context<HeadlessDevice>) -> Program {
        let mut shader = Shader::new();
        shader.compile(ctx, FRAGMENT, ShaderKind::Fragment).unwrap();
        let mut program = Program::new();
        program.attach(ctx, shader).unwrap();
        program.link(ctx).unwrap();
        program
    }

    #[test]
    fn test_defaults() {
        let m = PhongMaterial::default();
        assert_eq!(m.diffuse, [0.8, 0.8, 0.8, 1.0]);
        assert_eq!(m.ambient, [0.2, 0.2, 0.2, 1.0]);
        assert_eq!(m.specular, [0.0, 0.0, 0.0, 1.0]);
        assert_eq!(m.shininess(), 96.0);
        assert!(!m.is_transparent());
    }

    #[test]
    fn test_shininess_clamped() {
        let mut m = PhongMaterial::new("shiny");
        m.set_shininess(500.0);
        assert_eq!(m.shininess(), 128.0);
        m.set_shininess(-3.0);
        assert_eq!(m.shininess(), 0.0);
    }

    #[test]
    fn test_alpha_marks_transparency() {
        let mut m = PhongMaterial::new("glass");
        m.set_alpha(0.25);
        assert!(m.is_transparent());
        assert_eq!(m.uniform(false).specular[3], 0.25);
    }

    #[test]
    fn test_uniform_layout_is_std140_sized() {
        assert_eq!(std::mem::size_of::<MaterialUniform>(), 80);
    }

    #[test]
    fn test_apply_writes_uniforms_and_binds_map() {
        let mut ctx = Context::new(HeadlessDevice::new());
        let program = material_program(&mut ctx);
        let mut texture = Texture::default();
        let mut material = PhongMaterial::new("brick");
        material.diffuse = [0.5, 0.25, 0.125, 1.0];

        material.apply(&mut ctx, &program, Some(&mut texture)).unwrap();

        let handle = program.handle().unwrap();
        let device = ctx.device();
        assert_eq!(
            device.uniform_value(handle, "u_material.diffuse"),
            Some(UniformValue::Vec4([0.5, 0.25, 0.125, 1.0]))
        );
        assert_eq!(device.uniform_value(handle, "u_material.has_diffuse_map"), Some(UniformValue::Int(1)));
        assert_eq!(device.uniform_value(handle, "u_material.diffuse_map"), Some(UniformValue::Int(0)));
        assert_eq!(
            device.bound_texture(DIFFUSE_MAP_UNIT, TextureTarget::Texture2D),
            texture.handle()
        );
    }
}
