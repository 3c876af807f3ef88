use bytemuck::Zeroable;
use cgmath::{InnerSpace, Vector3, Vector4};
use log::warn;

use crate::gfx::device::{Context, GraphicsDevice};
use crate::gfx::resources::Program;

/// Number of light slots the shading uniforms provide.
pub const MAX_LIGHTS: usize = 8;

pub const MAX_SPOT_CUTOFF: f32 = 90.0;
pub const MAX_SPOT_EXPONENT: f32 = 128.0;

/// Cutoff value marking a light that is not a spot light.
pub const NO_SPOT_CUTOFF: f32 = 180.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightKind {
    Directional,
    Point,
    Spot,
}

/// GPU layout of one [`Light`].
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightUniform {
    pub position: [f32; 4],
    pub ambient: [f32; 4],
    pub diffuse: [f32; 4],
    pub specular: [f32; 4],
    /// xyz direction, w cutoff in degrees.
    pub spot: [f32; 4],
    /// constant, linear, quadratic, spot exponent.
    pub attenuation: [f32; 4],
}

/// A fixed-function style light source. A `w` of 0 in `position` makes the
/// light directional.
#[derive(Debug, Clone, PartialEq)]
pub struct Light {
    pub position: Vector4<f32>,
    pub ambient: [f32; 4],
    pub diffuse: [f32; 4],
    pub specular: [f32; 4],
    /// Constant, linear and quadratic attenuation factors.
    pub attenuation: Vector3<f32>,
    spot_direction: Vector3<f32>,
    spot_cutoff: f32,
    spot_exponent: f32,
}

impl Default for Light {
    fn default() -> Self {
        Self {
            position: Vector4::new(0.0, 0.0, 1.0, 0.0),
            ambient: [0.0, 0.0, 0.0, 1.0],
            diffuse: [1.0, 1.0, 1.0, 1.0],
            specular: [1.0, 1.0, 1.0, 1.0],
            attenuation: Vector3::new(1.0, 0.0, 0.0),
            spot_direction: Vector3::new(0.0, 0.0, -1.0),
            spot_cutoff: NO_SPOT_CUTOFF,
            spot_exponent: 0.0,
        }
    }
}

impl Light {
    /// Light shining along `direction`.
    pub fn directional(direction: Vector3<f32>) -> Self {
        let towards = -direction.normalize();
        Self {
            position: towards.extend(0.0),
            ..Default::default()
        }
    }

    pub fn point(position: Vector3<f32>) -> Self {
        Self {
            position: position.extend(1.0),
            ..Default::default()
        }
    }

    pub fn spot(position: Vector3<f32>, direction: Vector3<f32>, cutoff: f32, exponent: f32) -> Self {
        let mut light = Self::point(position);
        light.set_spot_direction(direction);
        light.set_spot_cutoff(cutoff);
        light.set_spot_exponent(exponent);
        light
    }

    pub fn kind(&self) -> LightKind {
        if self.position.w == 0.0 {
            LightKind::Directional
        } else if self.spot_cutoff < NO_SPOT_CUTOFF {
            LightKind::Spot
        } else {
            LightKind::Point
        }
    }

    pub fn spot_direction(&self) -> Vector3<f32> {
        self.spot_direction
    }

    pub fn set_spot_direction(&mut self, direction: Vector3<f32>) {
        self.spot_direction = direction.normalize();
    }

    pub fn spot_cutoff(&self) -> f32 {
        self.spot_cutoff
    }

    /// Clamped to `[0, 90]` degrees.
    pub fn set_spot_cutoff(&mut self, degrees: f32) {
        self.spot_cutoff = degrees.clamp(0.0, MAX_SPOT_CUTOFF);
    }

    /// Turns a spot light back into a point light.
    pub fn clear_spot(&mut self) {
        self.spot_cutoff = NO_SPOT_CUTOFF;
        self.spot_exponent = 0.0;
    }

    pub fn spot_exponent(&self) -> f32 {
        self.spot_exponent
    }

    /// Clamped to `[0, 128]`.
    pub fn set_spot_exponent(&mut self, exponent: f32) {
        self.spot_exponent = exponent.clamp(0.0, MAX_SPOT_EXPONENT);
    }

    /// Attenuation at `distance` from a positional light. Directional
    /// lights never attenuate.
    pub fn attenuation_at(&self, distance: f32) -> f32 {
        if self.kind() == LightKind::Directional {
            return 1.0;
        }
        let a = self.attenuation;
        let denominator = a.x + a.y * distance + a.z * distance * distance;
        if denominator <= 0.0 {
            1.0
        } else {
            1.0 / denominator
        }
    }

    pub fn uniform(&self) -> LightUniform {
        let d = self.spot_direction;
        let a = self.attenuation;
        LightUniform {
            position: self.position.into(),
            ambient: self.ambient,
            diffuse: self.diffuse,
            specular: self.specular,
            spot: [d.x, d.y, d.z, self.spot_cutoff],
            attenuation: [a.x, a.y, a.z, self.spot_exponent],
        }
    }

    /// Writes `u_lights[index].*`.
    pub fn apply<D: GraphicsDevice>(&self, ctx: &mut Context<D>, program: &Program, index: usize) {
        let prefix = format!("u_lights[{}]", index);
        program.set_uniform(ctx, &format!("{}.position", prefix), self.position);
        program.set_uniform(ctx, &format!("{}.ambient", prefix), self.ambient);
        program.set_uniform(ctx, &format!("{}.diffuse", prefix), self.diffuse);
        program.set_uniform(ctx, &format!("{}.specular", prefix), self.specular);
        program.set_uniform(ctx, &format!("{}.attenuation", prefix), self.attenuation);
        program.set_uniform(ctx, &format!("{}.spot_direction", prefix), self.spot_direction);
        program.set_uniform(ctx, &format!("{}.spot_cutoff", prefix), self.spot_cutoff);
        program.set_uniform(ctx, &format!("{}.spot_exponent", prefix), self.spot_exponent);
    }
}

/// GPU layout of a whole [`LightModel`].
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightModelUniform {
    pub global_ambient: [f32; 4],
    pub light_count: u32,
    _padding: [u32; 3],
    pub lights: [LightUniform; MAX_LIGHTS],
}

/// Global ambient term plus up to [`MAX_LIGHTS`] lights.
#[derive(Debug, Clone, PartialEq)]
pub struct LightModel {
    pub global_ambient: [f32; 4],
    lights: Vec<Light>,
}

impl Default for LightModel {
    fn default() -> Self {
        Self {
            global_ambient: [0.2, 0.2, 0.2, 1.0],
            lights: Vec::new(),
        }
    }
}

impl LightModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false when every slot is taken.
    pub fn add_light(&mut self, light: Light) -> bool {
        if self.lights.len() >= MAX_LIGHTS {
            warn!("Light model is full ({} lights), ignoring new light", MAX_LIGHTS);
            return false;
        }
        self.lights.push(light);
        true
    }

    pub fn remove_light(&mut self, index: usize) -> Option<Light> {
        if index < self.lights.len() {
            Some(self.lights.remove(index))
        } else {
            None
        }
    }

    pub fn light(&self, index: usize) -> Option<&Light> {
        self.lights.get(index)
    }

    pub fn light_mut(&mut self, index: usize) -> Option<&mut Light> {
        self.lights.get_mut(index)
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    pub fn uniform(&self) -> LightModelUniform {
        let mut lights = [LightUniform::zeroed(); MAX_LIGHTS];
        for (slot, light) in lights.iter_mut().zip(&self.lights) {
            *slot = light.uniform();
        }
        LightModelUniform {
            global_ambient: self.global_ambient,
            light_count: self.lights.len() as u32,
            _padding: [0; 3],
            lights,
        }
    }

    /// Writes `u_global_ambient`, `u_light_count` and every light.
    pub fn apply<D: GraphicsDevice>(&self, ctx: &mut Context<D>, program: &Program) {
        program.set_uniform(ctx, "u_global_ambient", self.global_ambient);
        program.set_uniform(ctx, "u_light_count", self.lights.len() as i32);
        for (index, light) in self.lights.iter().enumerate() {
            light.apply(ctx, program, index);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::device::{HeadlessDevice, ShaderKind, UniformValue};
    use crate::gfx::resources::Shader;

    const FRAGMENT: &str = "
        struct Light {
            vec4 position;
            vec4 ambient;
            vec4 diffuse;
            vec4 specular;
            vec3 attenuation;
            vec3 spot_direction;
            float spot_cutoff;
            float spot_exponent;
        };
        uniform vec4 u_global_ambient;
        uniform int u_light_count;
        uniform Light u_lights[8];
        void main() {}
    ";

    #[test]
    fn test_kinds() {
        assert_eq!(Light::directional(Vector3::new(0.0, -1.0, 0.0)).kind(), LightKind::Directional);
        assert_eq!(Light::point(Vector3::new(1.0, 2.0, 3.0)).kind(), LightKind::Point);
        let spot = Light::spot(Vector3::new(0.0, 5.0, 0.0), Vector3::new(0.0, -2.0, 0.0), 30.0, 4.0);
        assert_eq!(spot.kind(), LightKind::Spot);
        assert_eq!(spot.spot_direction(), Vector3::new(0.0, -1.0, 0.0));
    }

    #[test]
    fn test_directional_position_points_at_light() {
        let light = Light::directional(Vector3::new(0.0, 0.0, -3.0));
        assert_eq!(light.position, Vector4::new(0.0, 0.0, 1.0, 0.0));
        assert_eq!(light.attenuation_at(100.0), 1.0);
    }

    #[test]
    fn test_spot_values_clamped() {
        let mut light = Light::spot(Vector3::new(0.0, 0.0, 0.0), Vector3::new(0.0, 0.0, -1.0), 120.0, 400.0);
        assert_eq!(light.spot_cutoff(), 90.0);
        assert_eq!(light.spot_exponent(), 128.0);
        light.set_spot_cutoff(-5.0);
        assert_eq!(light.spot_cutoff(), 0.0);
        light.clear_spot();
        assert_eq!(light.kind(), LightKind::Point);
    }

    #[test]
    fn test_attenuation() {
        let mut light = Light::point(Vector3::new(0.0, 0.0, 0.0));
        light.attenuation = Vector3::new(1.0, 0.0, 1.0);
        assert_eq!(light.attenuation_at(2.0), 0.2);
    }

    #[test]
    fn test_model_capacity() {
        let mut model = LightModel::new();
        for i in 0..MAX_LIGHTS {
            assert!(model.add_light(Light::point(Vector3::new(i as f32, 0.0, 0.0))));
        }
        assert!(!model.add_light(Light::default()));
        assert_eq!(model.lights().len(), MAX_LIGHTS);

        let removed = model.remove_light(0).unwrap();
        assert_eq!(removed.position.x, 0.0);
        assert!(model.remove_light(MAX_LIGHTS).is_none());
        assert_eq!(model.uniform().light_count, (MAX_LIGHTS - 1) as u32);
    }

    #[test]
    fn test_uniform_layout_sizes() {
        assert_eq!(std::mem::size_of::<LightUniform>(), 96);
        assert_eq!(std::mem::size_of::<LightModelUniform>(), 32 + 96 * MAX_LIGHTS);
    }

    #[test]
    fn test_apply_writes_indexed_lights() {
        let mut ctx = Context::new(HeadlessDevice::new());
        let mut shader = Shader::new();
        shader.compile(&mut ctx, FRAGMENT, ShaderKind::Fragment).unwrap();
        let mut program = Program::new();
        program.attach(&mut ctx, shader).unwrap();
        program.link(&mut ctx).unwrap();

        let mut model = LightModel::new();
        model.add_light(Light::directional(Vector3::new(0.0, -1.0, 0.0)));
        let mut lamp = Light::point(Vector3::new(1.0, 2.0, 3.0));
        lamp.diffuse = [1.0, 0.5, 0.0, 1.0];
        model.add_light(lamp);
        model.apply(&mut ctx, &program);

        let handle = program.handle().unwrap();
        let device = ctx.device();
        assert_eq!(device.uniform_value(handle, "u_light_count"), Some(UniformValue::Int(2)));
        assert_eq!(
            device.uniform_value(handle, "u_lights[1].position"),
            Some(UniformValue::Vec4([1.0, 2.0, 3.0, 1.0]))
        );
        assert_eq!(
            device.uniform_value(handle, "u_lights[1].diffuse"),
            Some(UniformValue::Vec4([1.0, 0.5, 0.0, 1.0]))
        );
        assert_eq!(device.uniform_value(handle, "u_lights[2].position"), None);
    }
}
