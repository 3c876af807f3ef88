use cgmath::{Matrix4, SquareMatrix};
use winit::event::{DeviceEvent, KeyEvent};

use super::{camera_controller::FirstPersonController, view_camera::Camera};

/// A camera driven by a [`FirstPersonController`].
pub struct CameraRig {
    pub camera: Camera,
    pub controller: FirstPersonController,
}

impl CameraRig {
    pub fn new(camera: Camera, controller: FirstPersonController) -> Self {
        let mut rig = Self { camera, controller };
        rig.controller.apply(&mut rig.camera);
        rig
    }

    pub fn process_event(&mut self, event: &DeviceEvent) -> bool {
        self.controller.process_device_event(event, &mut self.camera)
    }

    pub fn process_keyboard_event(&mut self, event: &KeyEvent) -> bool {
        self.controller.process_keyboard_event(event)
    }

    /// Advances smoothed motion by one step.
    pub fn update(&mut self) -> bool {
        self.controller.update(&mut self.camera)
    }

    pub fn view_proj_matrix(&self) -> Matrix4<f32> {
        self.camera.view_projection()
    }
}

/// Camera matrices laid out for a std140 uniform block.
#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable, Debug, PartialEq)]
pub struct CameraUniform {
    /// Eye position, padded to a vec4 for std140 alignment.
    pub view_position: [f32; 4],
    pub view: [[f32; 4]; 4],
    pub projection: [[f32; 4]; 4],
    pub view_proj: [[f32; 4]; 4],
}

impl Default for CameraUniform {
    fn default() -> Self {
        let identity = convert_matrix4_to_array(Matrix4::identity());
        Self {
            view_position: [0.0, 0.0, 0.0, 1.0],
            view: identity,
            projection: identity,
            view_proj: identity,
        }
    }
}

impl CameraUniform {
    pub fn from_camera(camera: &Camera) -> Self {
        let eye = camera.eye();
        Self {
            view_position: [eye.x, eye.y, eye.z, 1.0],
            view: convert_matrix4_to_array(*camera.view()),
            projection: convert_matrix4_to_array(*camera.projection()),
            view_proj: convert_matrix4_to_array(camera.view_projection()),
        }
    }
}

pub fn convert_matrix4_to_array(matrix4: Matrix4<f32>) -> [[f32; 4]; 4] {
    matrix4.into()
}
