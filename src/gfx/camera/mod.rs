pub mod camera_controller;
pub mod camera_utils;
pub mod motion;
pub mod view_camera;

// Re-export main types
pub use camera_controller::FirstPersonController;
pub use camera_utils::{CameraRig, CameraUniform};
pub use motion::MotionParameter;
pub use view_camera::Camera;
