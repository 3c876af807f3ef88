use cgmath::{InnerSpace, Vector3};
use winit::{
    event::{DeviceEvent, ElementState, KeyEvent},
    keyboard::{KeyCode, PhysicalKey},
};

use super::motion::MotionParameter;
use super::view_camera::Camera;
use crate::math::{spherical_to_cartesian, transform, PI};

/// Keeps the view off the world up axis, where the basis would degenerate.
pub const PITCH_EPSILON: f32 = 0.000001;
pub const MAX_PITCH: f32 = PI / 2.0 - PITCH_EPSILON;
pub const MIN_PITCH: f32 = -MAX_PITCH;

/// First-person camera control: an eye position plus yaw and pitch.
///
/// Every mutator rebuilds the camera's view with a look-at from the eye
/// along the current forward direction.
#[derive(Debug, Clone)]
pub struct FirstPersonController {
    /// Radians of yaw/pitch per unit of mouse motion.
    pub rotate_speed: f32,
    /// World units per unit of integrated motion velocity.
    pub move_speed: f32,
    y_up: bool,
    eye: Vector3<f32>,
    yaw: f32,
    pitch: f32,
    forward: Vector3<f32>,
    right: Vector3<f32>,
    up: Vector3<f32>,
    motion_forward: MotionParameter,
    motion_right: MotionParameter,
    motion_up: MotionParameter,
}

impl FirstPersonController {
    pub fn new(eye: Vector3<f32>, yaw: f32, pitch: f32, y_up: bool) -> Self {
        let mut controller = Self {
            rotate_speed: 0.005,
            move_speed: 1.0,
            y_up,
            eye,
            yaw: 0.0,
            pitch: 0.0,
            forward: Vector3::new(0.0, 0.0, -1.0),
            right: Vector3::new(1.0, 0.0, 0.0),
            up: Vector3::new(0.0, 1.0, 0.0),
            motion_forward: MotionParameter::new(),
            motion_right: MotionParameter::new(),
            motion_up: MotionParameter::new(),
        };
        controller.orient(yaw, pitch);
        controller
    }

    pub fn eye(&self) -> Vector3<f32> {
        self.eye
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn y_up(&self) -> bool {
        self.y_up
    }

    pub fn forward(&self) -> Vector3<f32> {
        self.forward
    }

    pub fn right(&self) -> Vector3<f32> {
        self.right
    }

    pub fn up(&self) -> Vector3<f32> {
        self.up
    }

    /// Writes the controller's view into `camera`.
    pub fn apply(&self, camera: &mut Camera) {
        camera.set_view(transform::look_at(self.eye, self.eye + self.forward, self.up));
    }

    pub fn set_rotation(&mut self, camera: &mut Camera, yaw: f32, pitch: f32) {
        self.orient(yaw, pitch);
        self.apply(camera);
    }

    pub fn set_yaw(&mut self, camera: &mut Camera, yaw: f32) {
        self.set_rotation(camera, yaw, self.pitch);
    }

    pub fn set_pitch(&mut self, camera: &mut Camera, pitch: f32) {
        self.set_rotation(camera, self.yaw, pitch);
    }

    pub fn add_rotation(&mut self, camera: &mut Camera, yaw: f32, pitch: f32) {
        self.set_rotation(camera, self.yaw + yaw, self.pitch + pitch);
    }

    fn orient(&mut self, yaw: f32, pitch: f32) {
        self.yaw = yaw;
        self.pitch = pitch.clamp(MIN_PITCH, MAX_PITCH);

        let world_up = if self.y_up { Vector3::unit_y() } else { Vector3::unit_z() };
        self.forward = spherical_to_cartesian(1.0, self.pitch, self.yaw, self.y_up);
        self.right = self.forward.cross(world_up).normalize();
        self.up = self.right.cross(self.forward).normalize();
    }

    /// Moves the eye by `t` in world space.
    pub fn move_by(&mut self, camera: &mut Camera, t: Vector3<f32>) {
        self.eye += t;
        self.apply(camera);
    }

    pub fn move_forward(&mut self, camera: &mut Camera, units: f32) {
        self.move_by(camera, self.forward * units);
    }

    pub fn move_backward(&mut self, camera: &mut Camera, units: f32) {
        self.move_by(camera, self.forward * -units);
    }

    pub fn move_right(&mut self, camera: &mut Camera, units: f32) {
        self.move_by(camera, self.right * units);
    }

    pub fn move_left(&mut self, camera: &mut Camera, units: f32) {
        self.move_by(camera, self.right * -units);
    }

    pub fn move_up(&mut self, camera: &mut Camera, units: f32) {
        self.move_by(camera, self.up * units);
    }

    pub fn move_down(&mut self, camera: &mut Camera, units: f32) {
        self.move_by(camera, self.up * -units);
    }

    /// Maps W/A/S/D, Space and Shift onto the motion parameters. Returns true
    /// when the key is one the controller handles.
    pub fn process_key(&mut self, key: KeyCode, state: ElementState) -> bool {
        let pressed = state == ElementState::Pressed;
        let (motion, direction) = match key {
            KeyCode::KeyW | KeyCode::ArrowUp => (&mut self.motion_forward, 1),
            KeyCode::KeyS | KeyCode::ArrowDown => (&mut self.motion_forward, -1),
            KeyCode::KeyD | KeyCode::ArrowRight => (&mut self.motion_right, 1),
            KeyCode::KeyA | KeyCode::ArrowLeft => (&mut self.motion_right, -1),
            KeyCode::Space => (&mut self.motion_up, 1),
            KeyCode::ShiftLeft | KeyCode::ShiftRight => (&mut self.motion_up, -1),
            _ => return false,
        };
        if pressed {
            motion.set_direction(direction);
        } else if motion.direction() == direction {
            motion.set_direction(0);
        }
        true
    }

    pub fn process_keyboard_event(&mut self, event: &KeyEvent) -> bool {
        match event.physical_key {
            PhysicalKey::Code(key) => self.process_key(key, event.state),
            PhysicalKey::Unidentified(_) => false,
        }
    }

    /// Turns raw mouse motion into yaw and pitch. Returns true when the view
    /// changed.
    pub fn process_device_event(&mut self, event: &DeviceEvent, camera: &mut Camera) -> bool {
        match event {
            DeviceEvent::MouseMotion { delta } => {
                let yaw = -delta.0 as f32 * self.rotate_speed;
                let pitch = -delta.1 as f32 * self.rotate_speed;
                self.add_rotation(camera, yaw, pitch);
                true
            }
            _ => false,
        }
    }

    /// Integrates the motion parameters and moves the eye. Returns true when
    /// anything moved.
    pub fn update(&mut self, camera: &mut Camera) -> bool {
        let mut moved = false;
        let mut t = Vector3::new(0.0, 0.0, 0.0);
        if self.motion_forward.update() {
            t += self.forward * self.motion_forward.velocity * self.move_speed;
            moved = true;
        }
        if self.motion_right.update() {
            t += self.right * self.motion_right.velocity * self.move_speed;
            moved = true;
        }
        if self.motion_up.update() {
            t += self.up * self.motion_up.velocity * self.move_speed;
            moved = true;
        }
        if moved {
            self.move_by(camera, t);
        }
        moved
    }

    /// Drops any motion still in progress.
    pub fn halt(&mut self) {
        self.motion_forward.halt();
        self.motion_right.halt();
        self.motion_up.halt();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: Vector3<f32>, b: Vector3<f32>) {
        assert!((a - b).magnitude() < 1e-4, "{:?} != {:?}", a, b);
    }

    #[test]
    fn test_pitch_clamped_away_from_poles() {
        let mut camera = Camera::new();
        let mut controller = FirstPersonController::new(Vector3::new(0.0, 0.0, 0.0), 0.0, 10.0, true);
        assert_eq!(controller.pitch(), MAX_PITCH);
        controller.set_pitch(&mut camera, -10.0);
        assert_eq!(controller.pitch(), MIN_PITCH);
        assert!(camera.forward().x.is_finite());
    }

    #[test]
    fn test_camera_follows_controller() {
        let mut camera = Camera::new();
        let mut controller = FirstPersonController::new(Vector3::new(1.0, 2.0, 3.0), PI, 0.0, true);
        controller.apply(&mut camera);
        assert_close(camera.eye(), Vector3::new(1.0, 2.0, 3.0));
        assert_close(camera.forward(), Vector3::new(0.0, 0.0, -1.0));
        assert_close(camera.right(), Vector3::new(1.0, 0.0, 0.0));
        assert_close(camera.up(), Vector3::new(0.0, 1.0, 0.0));

        controller.move_forward(&mut camera, 2.0);
        assert_close(camera.eye(), Vector3::new(1.0, 2.0, 1.0));
        controller.move_left(&mut camera, 1.0);
        assert_close(camera.eye(), Vector3::new(0.0, 2.0, 1.0));
    }

    #[test]
    fn test_z_up_orientation() {
        let mut camera = Camera::new();
        let mut controller = FirstPersonController::new(Vector3::new(0.0, 0.0, 0.0), 0.0, 0.0, false);
        controller.apply(&mut camera);
        assert_close(camera.forward(), Vector3::new(0.0, -1.0, 0.0));
        assert_close(camera.up(), Vector3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn test_keys_drive_motion() {
        let mut camera = Camera::new();
        let mut controller = FirstPersonController::new(Vector3::new(0.0, 0.0, 0.0), PI, 0.0, true);
        controller.apply(&mut camera);

        assert!(controller.process_key(KeyCode::KeyW, ElementState::Pressed));
        assert!(!controller.process_key(KeyCode::KeyQ, ElementState::Pressed));
        for _ in 0..5 {
            assert!(controller.update(&mut camera));
        }
        assert!(camera.eye().z < 0.0);

        controller.process_key(KeyCode::KeyW, ElementState::Released);
        let mut steps = 0;
        while controller.update(&mut camera) {
            steps += 1;
            assert!(steps < 1000);
        }
        assert!(!controller.update(&mut camera));
    }

    #[test]
    fn test_releasing_opposite_key_keeps_direction() {
        let mut controller = FirstPersonController::new(Vector3::new(0.0, 0.0, 0.0), 0.0, 0.0, true);
        controller.process_key(KeyCode::KeyD, ElementState::Pressed);
        controller.process_key(KeyCode::KeyA, ElementState::Released);
        assert_eq!(controller.motion_right.direction(), 1);
    }

    #[test]
    fn test_mouse_motion_turns_view() {
        let mut camera = Camera::new();
        let mut controller = FirstPersonController::new(Vector3::new(0.0, 0.0, 0.0), 0.0, 0.0, true);
        controller.rotate_speed = 0.01;
        let event = DeviceEvent::MouseMotion { delta: (-10.0, 20.0) };
        assert!(controller.process_device_event(&event, &mut camera));
        assert!((controller.yaw() - 0.1).abs() < 1e-6);
        assert!((controller.pitch() + 0.2).abs() < 1e-6);
    }
}
