use log::{debug, trace};
use rayon::prelude::*;

use crate::color::Color;
use crate::input::{Intent, Intents};
use crate::marcher::ray::DEFAULT_EPSILON;
use crate::marcher::{Ray, Scene};
use crate::math::{add, cross, dot, mul, B1, B2, O, V3};
use crate::{Error, Result};

pub const DEFAULT_SCREEN_DISTANCE: f64 = 0.1;
pub const DEFAULT_PIXEL_SPACING: f64 = 0.00025;
pub const DEFAULT_MOVEMENT_SPEED: f64 = 0.1;
pub const DEFAULT_ROTATION_SPEED: f64 = 0.05;

/// Looking down -z.
const DEFAULT_DIRECTION: V3 = V3 {
    x: 0.,
    y: 0.,
    z: -1.,
};

#[derive(Clone, Copy)]
enum Axis {
    X,
    Y,
}

impl Axis {
    fn rotate(self, x: &mut V3, angle: f64) {
        match self {
            Axis::X => x.rotate_in_place_x(angle),
            Axis::Y => x.rotate_in_place_y(angle),
        };
    }
}

fn look_direction(direction: &V3) -> V3 {
    if *direction == O {
        DEFAULT_DIRECTION
    } else {
        direction.unit_vector()
    }
}

/// `up` normalized, or a synthesized unit vector perpendicular to
/// `direction` when `up` is degenerate or not perpendicular.
///
/// The synthesized vector is `direction x B1`, switching to `B2` when that
/// cross product vanishes (a look along either direction of the x axis).
fn up_direction(direction: &V3, up: &V3) -> V3 {
    if dot(direction, up) != 0. || *up == O {
        let helper = cross(direction, &B1);
        if helper == O {
            cross(direction, &B2).unit_vector()
        } else {
            helper.unit_vector()
        }
    } else {
        up.unit_vector()
    }
}

/// Negative values flip sign, zero becomes 1.
fn positive_or_one(value: f64) -> f64 {
    if value < 0. {
        value.abs()
    } else if value == 0. {
        1.
    } else {
        value
    }
}

/// Eye position, orientation and the per-pixel ray grid.
///
/// The ray grid is built by [`Camera::create_rays`] and after that only ever
/// mutated in place: movement translates every ray with the eye and rotation
/// turns every ray direction with the basis.
#[derive(Clone, Debug)]
pub struct Camera {
    position: V3,
    direction: V3,
    up: V3,
    right: V3,
    screen_distance: f64,
    pixel_spacing: f64,
    movement_speed: f64,
    rotation_speed: f64,
    epsilon: f64,
    intents: Intents,
    rays: Vec<Ray>,
    viewport: Option<(usize, usize)>,
}

impl Default for Camera {
    fn default() -> Self {
        Camera::new(O, DEFAULT_DIRECTION, B2, DEFAULT_SCREEN_DISTANCE)
    }
}

impl Camera {
    pub fn new(position: V3, direction: V3, up: V3, screen_distance: f64) -> Self {
        let direction = look_direction(&direction);
        let up = up_direction(&direction, &up);
        Camera {
            position,
            direction,
            up,
            right: cross(&direction, &up),
            screen_distance: positive_or_one(screen_distance),
            pixel_spacing: DEFAULT_PIXEL_SPACING,
            movement_speed: DEFAULT_MOVEMENT_SPEED,
            rotation_speed: DEFAULT_ROTATION_SPEED,
            epsilon: DEFAULT_EPSILON,
            intents: Intents::NONE,
            rays: Vec::new(),
            viewport: None,
        }
    }

    pub fn position(&self) -> V3 {
        self.position
    }

    /// Takes effect on the ray grid at the next [`Camera::create_rays`].
    pub fn set_position(&mut self, position: V3) {
        self.position = position;
    }

    pub fn direction(&self) -> V3 {
        self.direction
    }

    /// Zero falls back to -z. The up vector is re-derived if it is no longer
    /// perpendicular. Takes effect on the ray grid at the next
    /// [`Camera::create_rays`].
    pub fn set_direction(&mut self, direction: V3) {
        self.direction = look_direction(&direction);
        self.up = up_direction(&self.direction, &self.up);
        self.right = cross(&self.direction, &self.up);
    }

    pub fn up_direction(&self) -> V3 {
        self.up
    }

    pub fn set_up_direction(&mut self, up: V3) {
        self.up = up_direction(&self.direction, &up);
        self.right = cross(&self.direction, &self.up);
    }

    pub fn right_direction(&self) -> V3 {
        self.right
    }

    pub fn screen_distance(&self) -> f64 {
        self.screen_distance
    }

    pub fn set_screen_distance(&mut self, screen_distance: f64) {
        self.screen_distance = positive_or_one(screen_distance);
    }

    pub fn pixel_spacing(&self) -> f64 {
        self.pixel_spacing
    }

    pub fn set_pixel_spacing(&mut self, pixel_spacing: f64) {
        self.pixel_spacing = positive_or_one(pixel_spacing);
    }

    pub fn movement_speed(&self) -> f64 {
        self.movement_speed
    }

    /// Scene units per frame.
    pub fn set_movement_speed(&mut self, speed: f64) {
        self.movement_speed = speed;
    }

    pub fn rotation_speed(&self) -> f64 {
        self.rotation_speed
    }

    /// Radians per frame.
    pub fn set_rotation_speed(&mut self, speed: f64) {
        self.rotation_speed = speed;
    }

    pub fn ray_epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Hit tolerance for every current and future ray.
    pub fn set_ray_epsilon(&mut self, epsilon: f64) {
        self.epsilon = epsilon;
        for ray in self.rays.iter_mut() {
            ray.set_epsilon(epsilon);
        }
    }

    pub fn intents(&self) -> Intents {
        self.intents
    }

    pub fn set_intent(&mut self, intent: Intent, active: bool) {
        self.intents.set(intent, active);
    }

    pub fn set_intents(&mut self, intents: Intents) {
        self.intents = intents;
    }

    pub fn rays(&self) -> &[Ray] {
        &self.rays
    }

    pub fn viewport(&self) -> Option<(usize, usize)> {
        self.viewport
    }

    /// The point the look direction pierces the screen plane at.
    pub fn screen_center(&self) -> V3 {
        add(&self.position, &mul(self.screen_distance, &self.direction))
    }

    /// Rebuilds the ray grid for a `width` x `height` viewport.
    ///
    /// Rays are laid out row-major from the top row down, left to right. Each
    /// one starts on the screen plane and points away from the eye.
    pub fn create_rays(&mut self, width: usize, height: usize, render_distance: f64) -> Result<()> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidViewport { width, height });
        }
        let center = self.screen_center();
        let top = height as f64 / 2. - 0.5;
        let left = width as f64 / -2. + 0.5;

        let mut rays = Vec::with_capacity(width * height);
        for row in 0..height {
            let r = top - row as f64;
            let row_center = add(&center, &mul(self.pixel_spacing * r, &self.up));
            for col in 0..width {
                let c = left + col as f64;
                let pixel = add(&row_center, &mul(self.pixel_spacing * c, &self.right));
                let mut ray = Ray::new(
                    pixel,
                    self.position.difference_vector(&pixel),
                    render_distance,
                );
                ray.set_epsilon(self.epsilon);
                rays.push(ray);
            }
        }
        self.rays = rays;
        self.viewport = Some((width, height));
        debug!(
            "built {}x{} ray grid, screen center {}, render distance {}",
            width, height, center, render_distance
        );
        Ok(())
    }

    fn translate(&mut self, delta: &V3) {
        self.position.add_in_place(delta);
        for ray in self.rays.iter_mut() {
            ray.position.add_in_place(delta);
        }
    }

    fn rotate(&mut self, axis: Axis, angle: f64) {
        axis.rotate(&mut self.direction, angle);
        axis.rotate(&mut self.up, angle);
        axis.rotate(&mut self.right, angle);
        for ray in self.rays.iter_mut() {
            axis.rotate(&mut ray.direction, angle);
        }
    }

    /// Applies one frame of the active intents.
    ///
    /// Translations go first: forward/back along the look direction,
    /// left/right along the right direction, up/down along world +y. Then
    /// tilting turns about world X and rotating left/right about world Y.
    pub fn apply_motion(&mut self) {
        let intents = self.intents;
        if intents.is_empty() {
            return;
        }
        let speed = self.movement_speed;
        let moves = [
            (Intent::Forward, self.direction),
            (Intent::Backward, -self.direction),
            (Intent::Left, -self.right),
            (Intent::Right, self.right),
            (Intent::Up, B2),
            (Intent::Down, -B2),
        ];
        for (intent, axis) in moves {
            if intents.contains(intent) {
                self.translate(&mul(speed, &axis));
            }
        }

        let angle = self.rotation_speed;
        let turns = [
            (Intent::TiltUp, Axis::X, angle),
            (Intent::TiltDown, Axis::X, -angle),
            (Intent::RotateLeft, Axis::Y, angle),
            (Intent::RotateRight, Axis::Y, -angle),
        ];
        for (intent, axis, angle) in turns {
            if intents.contains(intent) {
                self.rotate(axis, angle);
            }
        }
        trace!("camera at {} looking {}", self.position, self.direction);
    }

    /// Applies this frame's motion, then marches every ray into `pixels`.
    pub fn render(&mut self, scene: &Scene, pixels: &mut [Color]) -> Result<()> {
        if self.viewport.is_none() {
            return Err(Error::RaysNotCreated);
        }
        if pixels.len() != self.rays.len() {
            return Err(Error::PixelBufferSize {
                expected: self.rays.len(),
                actual: pixels.len(),
            });
        }
        if scene.is_empty() {
            return Err(Error::EmptyScene);
        }
        self.apply_motion();
        pixels
            .par_iter_mut()
            .zip(self.rays.par_iter())
            .try_for_each(|(pixel, ray)| {
                *pixel = ray.calculate(scene)?;
                Ok(())
            })
    }
}
