use crate::math::V3;

pub const DEFAULT_EPSILON: f64 = 0.001;

/// One pixel's ray. Created once per viewport by the camera and then moved
/// in place every frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    pub(crate) position: V3,
    pub(crate) direction: V3,
    pub(crate) render_distance: f64,
    pub(crate) epsilon: f64,
}

impl Ray {
    pub fn new(position: V3, direction: V3, render_distance: f64) -> Self {
        Ray {
            position,
            direction: direction.unit_vector(),
            render_distance,
            epsilon: DEFAULT_EPSILON,
        }
    }

    pub fn position(&self) -> V3 {
        self.position
    }

    pub fn set_position(&mut self, position: V3) {
        self.position = position;
    }

    pub fn direction(&self) -> V3 {
        self.direction
    }

    /// Normalizes before storing.
    pub fn set_direction(&mut self, direction: V3) {
        self.direction = direction.unit_vector();
    }

    pub fn render_distance(&self) -> f64 {
        self.render_distance
    }

    pub fn set_render_distance(&mut self, render_distance: f64) {
        self.render_distance = render_distance;
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    pub fn set_epsilon(&mut self, epsilon: f64) {
        self.epsilon = epsilon;
    }
}
