use crate::color::Color;
use crate::math::{add, mul, V3};
use crate::Result;

pub mod camera;
pub mod ray;
pub mod scene;
pub mod shapes;

pub use camera::Camera;
pub use ray::Ray;
pub use scene::{Scene, ShapeId};
pub use shapes::{Csg, CsgOp, Cuboid, RoundedBox, Shape, Sphere, Torus, TriangularPrism};

/// Signed distance to a surface: positive outside, zero on it, negative
/// inside.
pub trait Renderable {
    fn sdf(&self, x: &V3) -> f64;
}

/// Everything learned while sphere-tracing one ray.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MarchOutcome {
    pub color: Color,
    /// Shape that produced the final minimum, or `None` on a miss.
    pub hit: Option<ShapeId>,
    pub distance_traveled: f64,
    pub steps: u32,
}

impl Ray {
    /// Sphere-traces this ray through `scene`.
    ///
    /// Steps by the distance to the nearest drawn shape until that distance
    /// drops to epsilon or the ray has covered its render distance.
    pub fn march(&self, scene: &Scene) -> Result<MarchOutcome> {
        let mut y = self.position;
        let mut traveled = 0.;
        let mut nearest = self.epsilon + 1.;
        let mut winner = None;
        let mut steps = 0;
        while nearest > self.epsilon && traveled < self.render_distance {
            let (id, d) = scene.nearest(&y)?;
            winner = Some(id);
            nearest = d;
            traveled += d;
            y = add(&y, &mul(d, &self.direction));
            steps += 1;
        }

        let hit = if traveled >= self.render_distance {
            None
        } else {
            winner
        };
        let color = match hit {
            Some(id) => scene.get(id)?.color(),
            None => scene.background_color(),
        };
        Ok(MarchOutcome {
            color,
            hit,
            distance_traveled: traveled,
            steps,
        })
    }

    /// Color seen along this ray.
    pub fn calculate(&self, scene: &Scene) -> Result<Color> {
        self.march(scene).map(|outcome| outcome.color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{v, B2, B3, O};
    use crate::Error;

    fn sphere_ahead() -> Scene {
        let mut scene = Scene::new();
        scene
            .add_shape(Sphere::new(v(0., 0., 5.), 1., Color::RED))
            .unwrap();
        scene
    }

    #[test]
    fn hits_sphere_straight_ahead() {
        let scene = sphere_ahead();
        let ray = Ray::new(O, B3, 20.);
        let outcome = ray.march(&scene).unwrap();
        assert_eq!(outcome.color, Color::RED);
        assert_eq!(outcome.hit, Some(ShapeId(0)));
        assert!((outcome.distance_traveled - 4.).abs() <= ray.epsilon());
        assert_eq!(ray.calculate(&scene), Ok(Color::RED));
    }

    #[test]
    fn ray_pointing_away_sees_background() {
        let mut scene = sphere_ahead();
        scene
            .add_shape(Sphere::new(v(0., 0., -4.), 1., Color::BLUE))
            .unwrap();
        let ray = Ray::new(O, B2, 20.);
        let outcome = ray.march(&scene).unwrap();
        assert_eq!(outcome.color, Color::SKY);
        assert_eq!(outcome.hit, None);
        assert!(outcome.distance_traveled >= 20.);
    }

    #[test]
    fn march_does_not_move_the_ray() {
        let scene = sphere_ahead();
        let ray = Ray::new(v(0., 0., 1.), B3, 20.);
        ray.march(&scene).unwrap();
        assert_eq!(ray.position(), v(0., 0., 1.));
    }

    #[test]
    fn empty_scene_is_an_error() {
        let ray = Ray::new(O, B3, 20.);
        assert_eq!(ray.calculate(&Scene::new()), Err(Error::EmptyScene));
    }

    #[test]
    fn starting_inside_a_shape_hits_immediately() {
        let scene = sphere_ahead();
        let ray = Ray::new(v(0., 0., 5.), B2, 20.);
        let outcome = ray.march(&scene).unwrap();
        assert_eq!(outcome.steps, 1);
        assert_eq!(outcome.color, Color::RED);
    }

    #[test]
    fn epsilon_bounds_the_stopping_distance() {
        let mut scene = Scene::new();
        scene
            .add_shape(Torus::new(v(0., 0., -6.), 2., 0.5, Color::GREEN))
            .unwrap();
        let mut ray = Ray::new(v(2., 3., -6.), -B2, 20.);
        ray.set_epsilon(1e-6);
        let outcome = ray.march(&scene).unwrap();
        assert_eq!(outcome.color, Color::GREEN);
        assert!((outcome.distance_traveled - 2.5).abs() < 1e-5);
    }
}
