/// A damped single-axis motion integrator used to smooth camera input.
///
/// Each [`update`](Self::update) adds `direction * step` to the velocity,
/// damps it, clamps it to `max_velocity` and advances `value` by the result
/// (clamped to `max_value`). Velocities below `rest_threshold` snap to zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionParameter {
    pub value: f32,
    pub velocity: f32,
    direction: i8,
    pub damping: f32,
    pub step: f32,
    pub max_velocity: f32,
    pub max_value: f32,
    pub rest_threshold: f32,
}

impl Default for MotionParameter {
    fn default() -> Self {
        Self {
            value: 0.0,
            velocity: 0.0,
            direction: 0,
            damping: 0.9,
            step: 0.1,
            max_velocity: 2.0,
            max_value: f32::INFINITY,
            rest_threshold: 0.001,
        }
    }
}

impl MotionParameter {
    pub fn new() -> Self {
        Self::default()
    }

    /// A parameter whose value stays within `[-max_value, max_value]`.
    pub fn with_max_value(max_value: f32) -> Self {
        Self {
            max_value,
            ..Default::default()
        }
    }

    pub fn direction(&self) -> i8 {
        self.direction
    }

    /// Sets the push direction; only the sign of `direction` is kept.
    pub fn set_direction(&mut self, direction: i8) {
        self.direction = direction.signum();
    }

    /// True while the parameter is pushed or still moving.
    pub fn is_active(&self) -> bool {
        self.direction != 0 || self.velocity != 0.0
    }

    /// Advances one step. Returns false when there was nothing to integrate.
    pub fn update(&mut self) -> bool {
        if !self.is_active() {
            return false;
        }

        let pushed = self.velocity + self.direction as f32 * self.step;
        self.velocity = (pushed * self.damping).clamp(-self.max_velocity, self.max_velocity);
        self.value = (self.value + self.velocity).clamp(-self.max_value, self.max_value);

        if self.velocity.abs() < self.rest_threshold {
            self.velocity = 0.0;
        }
        true
    }

    /// Stops all motion without touching the value.
    pub fn halt(&mut self) {
        self.direction = 0;
        self.velocity = 0.0;
    }
}
