use cgmath::{Matrix4, SquareMatrix, Vector3};
use log::warn;

use super::camera_utils::CameraUniform;
use crate::gfx::device::{Context, GraphicsDevice};
use crate::gfx::resources::Program;
use crate::math::{column3, inverse, transform};

/// View and projection matrices with the eye basis derived from the view.
///
/// The basis is read from the columns of the view inverse: right is column
/// 0, up is column 1, forward is the negated column 2 and the eye is column 3.
/// With an identity view the camera sits at the origin looking down -Z.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    view: Matrix4<f32>,
    view_inverse: Matrix4<f32>,
    projection: Matrix4<f32>,
    projection_inverse: Matrix4<f32>,
    eye: Vector3<f32>,
    forward: Vector3<f32>,
    right: Vector3<f32>,
    up: Vector3<f32>,
}

impl Default for Camera {
    fn default() -> Self {
        let mut camera = Self {
            view: Matrix4::identity(),
            view_inverse: Matrix4::identity(),
            projection: Matrix4::identity(),
            projection_inverse: Matrix4::identity(),
            eye: Vector3::new(0.0, 0.0, 0.0),
            forward: Vector3::new(0.0, 0.0, -1.0),
            right: Vector3::new(1.0, 0.0, 0.0),
            up: Vector3::new(0.0, 1.0, 0.0),
        };
        camera.update_basis();
        camera
    }
}

impl Camera {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> &Matrix4<f32> {
        &self.view
    }

    pub fn view_inverse(&self) -> &Matrix4<f32> {
        &self.view_inverse
    }

    pub fn projection(&self) -> &Matrix4<f32> {
        &self.projection
    }

    pub fn projection_inverse(&self) -> &Matrix4<f32> {
        &self.projection_inverse
    }

    pub fn view_projection(&self) -> Matrix4<f32> {
        self.projection * self.view
    }

    pub fn eye(&self) -> Vector3<f32> {
        self.eye
    }

    pub fn forward(&self) -> Vector3<f32> {
        self.forward
    }

    pub fn backward(&self) -> Vector3<f32> {
        -self.forward
    }

    pub fn right(&self) -> Vector3<f32> {
        self.right
    }

    pub fn left(&self) -> Vector3<f32> {
        -self.right
    }

    pub fn up(&self) -> Vector3<f32> {
        self.up
    }

    pub fn down(&self) -> Vector3<f32> {
        -self.up
    }

    /// Replaces the view matrix. A singular view is rejected and leaves the
    /// camera unchanged.
    pub fn set_view(&mut self, view: Matrix4<f32>) -> bool {
        match inverse(&view) {
            Some(view_inverse) => {
                self.view = view;
                self.view_inverse = view_inverse;
                self.update_basis();
                true
            }
            None => {
                warn!("Ignoring singular view matrix");
                false
            }
        }
    }

    /// Replaces the projection matrix. A singular projection is rejected.
    pub fn set_projection(&mut self, projection: Matrix4<f32>) -> bool {
        match inverse(&projection) {
            Some(projection_inverse) => {
                self.projection = projection;
                self.projection_inverse = projection_inverse;
                true
            }
            None => {
                warn!("Ignoring singular projection matrix");
                false
            }
        }
    }

    /// Symmetric perspective projection; `fov_y` is in degrees.
    pub fn set_perspective(&mut self, fov_y: f32, aspect: f32, near: f32, far: f32) -> bool {
        self.set_projection(transform::perspective(fov_y, aspect, near, far))
    }

    pub fn look_at(&mut self, eye: Vector3<f32>, center: Vector3<f32>, up: Vector3<f32>) -> bool {
        self.set_view(transform::look_at(eye, center, up))
    }

    /// Moves the eye by `t` in world space.
    pub fn translate(&mut self, t: Vector3<f32>) {
        self.view = self.view * transform::translation_v(-t);
        self.view_inverse = transform::translation_v(t) * self.view_inverse;
        self.update_basis();
    }

    pub fn translate_forward(&mut self, units: f32) {
        self.translate(self.forward * units);
    }

    pub fn translate_backward(&mut self, units: f32) {
        self.translate(self.forward * -units);
    }

    pub fn translate_right(&mut self, units: f32) {
        self.translate(self.right * units);
    }

    pub fn translate_left(&mut self, units: f32) {
        self.translate(self.right * -units);
    }

    pub fn translate_up(&mut self, units: f32) {
        self.translate(self.up * units);
    }

    pub fn translate_down(&mut self, units: f32) {
        self.translate(self.up * -units);
    }

    pub fn rotate_x(&mut self, radians: f64) {
        self.apply_rotation(transform::rotation_x(radians), transform::rotation_x(-radians));
    }

    pub fn rotate_y(&mut self, radians: f64) {
        self.apply_rotation(transform::rotation_y(radians), transform::rotation_y(-radians));
    }

    pub fn rotate_z(&mut self, radians: f64) {
        self.apply_rotation(transform::rotation_z(radians), transform::rotation_z(-radians));
    }

    pub fn rotate(&mut self, axis: Vector3<f32>, radians: f64) {
        self.apply_rotation(transform::rotation(axis, radians), transform::rotation(axis, -radians));
    }

    fn apply_rotation(&mut self, rotation: Matrix4<f32>, undo: Matrix4<f32>) {
        self.view = self.view * rotation;
        self.view_inverse = undo * self.view_inverse;
        self.update_basis();
    }

    fn update_basis(&mut self) {
        self.right = column3(&self.view_inverse, 0);
        self.up = column3(&self.view_inverse, 1);
        self.forward = -column3(&self.view_inverse, 2);
        self.eye = column3(&self.view_inverse, 3);
    }

    pub fn uniform(&self) -> CameraUniform {
        CameraUniform::from_camera(self)
    }

    /// Writes `u_view`, `u_projection`, `u_view_projection` and `u_eye` to
    /// whichever of them `program` declares.
    pub fn apply<D: GraphicsDevice>(&self, ctx: &mut Context<D>, program: &Program) {
        program.set_uniform(ctx, "u_view", self.view);
        program.set_uniform(ctx, "u_projection", self.projection);
        program.set_uniform(ctx, "u_view_projection", self.view_projection());
        program.set_uniform(ctx, "u_eye", self.eye);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::InnerSpace;

    use crate::gfx::device::{HeadlessDevice, ShaderKind, UniformValue};
    use crate::gfx::resources::Shader;

    fn assert_close(a: Vector3<f32>, b: Vector3<f32>) {
        assert!((a - b).magnitude() < 1e-5, "{:?} != {:?}", a, b);
    }

    fn assert_inverse_in_step(camera: &Camera) {
        let product = camera.view() * camera.view_inverse();
        for c in 0..4 {
            for r in 0..4 {
                let expected = if c == r { 1.0 } else { 0.0 };
                assert!((product[c][r] - expected).abs() < 1e-4);
            }
        }
    }

    #[test]
    fn test_identity_view_basis() {
        let camera = Camera::new();
        assert_eq!(camera.forward(), Vector3::new(0.0, 0.0, -1.0));
        assert_eq!(camera.up(), Vector3::new(0.0, 1.0, 0.0));
        assert_eq!(camera.right(), Vector3::new(1.0, 0.0, 0.0));
        assert_eq!(camera.eye(), Vector3::new(0.0, 0.0, 0.0));
        assert_eq!(camera.backward(), Vector3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn test_translate_moves_eye() {
        let mut camera = Camera::new();
        camera.translate_forward(2.0);
        assert_close(camera.eye(), Vector3::new(0.0, 0.0, -2.0));
        camera.translate_right(1.0);
        camera.translate_up(3.0);
        assert_close(camera.eye(), Vector3::new(1.0, 3.0, -2.0));
        assert_inverse_in_step(&camera);
    }

    #[test]
    fn test_rotations_keep_inverse_in_step() {
        let mut camera = Camera::new();
        camera.rotate_y(std::f64::consts::FRAC_PI_2);
        assert_close(camera.forward(), Vector3::new(1.0, 0.0, 0.0));
        camera.rotate_x(0.3);
        camera.rotate_z(0.2);
        camera.rotate(Vector3::new(1.0, 1.0, 0.0), 0.4);
        assert_inverse_in_step(&camera);
        assert!((camera.forward().magnitude() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_rotate_z_rolls_about_view_axis() {
        let mut camera = Camera::new();
        camera.rotate_z(std::f64::consts::FRAC_PI_2);
        assert_close(camera.forward(), Vector3::new(0.0, 0.0, -1.0));
        assert_close(camera.up().cross(camera.right()), Vector3::new(0.0, 0.0, -1.0));
    }

    #[test]
    fn test_look_at_basis() {
        let mut camera = Camera::new();
        assert!(camera.look_at(
            Vector3::new(0.0, 0.0, 5.0),
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(0.0, 1.0, 0.0),
        ));
        assert_close(camera.eye(), Vector3::new(0.0, 0.0, 5.0));
        assert_close(camera.forward(), Vector3::new(0.0, 0.0, -1.0));
    }

    #[test]
    fn test_singular_view_rejected() {
        let mut camera = Camera::new();
        camera.translate_up(1.0);
        let before = camera.clone();
        assert!(!camera.set_view(Matrix4::from_scale(0.0)));
        assert_eq!(camera, before);
    }

    #[test]
    fn test_apply_sets_declared_matrices() {
        let mut ctx = Context::new(HeadlessDevice::new());
        let mut shader = Shader::new();
        shader
            .compile(&mut ctx, "uniform mat4 u_view;\nuniform mat4 u_projection;\nvoid main() {}", ShaderKind::Vertex)
            .unwrap();
        let mut program = Program::new();
        program.attach(&mut ctx, shader).unwrap();
        program.link(&mut ctx).unwrap();

        let mut camera = Camera::new();
        camera.set_perspective(60.0, 1.5, 0.1, 100.0);
        camera.apply(&mut ctx, &program);

        let handle = program.handle().unwrap();
        assert_eq!(
            ctx.device().uniform_value(handle, "u_projection"),
            Some(UniformValue::from(*camera.projection()))
        );
        assert_eq!(ctx.device().uniform_value(handle, "u_view"), Some(UniformValue::from(Matrix4::<f32>::identity())));
    }
}
