use std::fmt;
use std::ops;

/// A point or direction in 3D space.
///
/// Right-handed convention: +x is right, +y is up and +z points back toward
/// the viewer. Nothing here normalizes implicitly; callers that need a
/// direction go through [`V3::unit_vector`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct V3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

pub fn sub(x: &V3, y: &V3) -> V3 {
    V3 {
        x: x.x - y.x,
        y: x.y - y.y,
        z: x.z - y.z,
    }
}

pub fn length2(x: &V3) -> f64 {
    x.x * x.x + x.y * x.y + x.z * x.z
}

pub fn length(x: &V3) -> f64 {
    length2(x).sqrt()
}

pub fn v(x: f64, y: f64, z: f64) -> V3 {
    V3 { x, y, z }
}

pub fn mul(scalar: f64, x: &V3) -> V3 {
    V3 {
        x: x.x * scalar,
        y: x.y * scalar,
        z: x.z * scalar,
    }
}

pub fn add(x: &V3, y: &V3) -> V3 {
    V3 {
        x: x.x + y.x,
        y: x.y + y.y,
        z: x.z + y.z,
    }
}

pub fn dist(x: &V3, y: &V3) -> f64 {
    length(&sub(x, y))
}

/// Unit vector in the direction of `x`, or the zero vector when `x` has no
/// length.
pub fn normalize(x: &V3) -> V3 {
    let len = length(x);
    if len == 0. {
        O
    } else {
        mul(1. / len, x)
    }
}

pub fn dot(x: &V3, y: &V3) -> f64 {
    x.x * y.x + x.y * y.y + x.z * y.z
}

pub fn cross(v1: &V3, v2: &V3) -> V3 {
    v(
        v1.y * v2.z - v1.z * v2.y,
        v1.z * v2.x - v1.x * v2.z,
        v1.x * v2.y - v1.y * v2.x,
    )
}

impl V3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        v(x, y, z)
    }

    /// A vector along `unit` with the given magnitude.
    pub fn with_length(unit: &V3, len: f64) -> Self {
        mul(len, unit)
    }

    pub fn set_x(&mut self, x: f64) {
        self.x = x;
    }

    pub fn set_y(&mut self, y: f64) {
        self.y = y;
    }

    pub fn set_z(&mut self, z: f64) {
        self.z = z;
    }

    /// Overwrites every component with those of `other`.
    pub fn replace(&mut self, other: &V3) {
        *self = *other;
    }

    pub fn length(&self) -> f64 {
        length(self)
    }

    pub fn length2(&self) -> f64 {
        length2(self)
    }

    /// Scalar multiple as a new vector.
    pub fn multiply(&self, factor: f64) -> V3 {
        mul(factor, self)
    }

    /// Scalar multiple, in place.
    pub fn scale(&mut self, factor: f64) -> &mut Self {
        self.x *= factor;
        self.y *= factor;
        self.z *= factor;
        self
    }

    /// Component-wise absolute value.
    pub fn abs(&self) -> V3 {
        v(self.x.abs(), self.y.abs(), self.z.abs())
    }

    /// Component-wise maximum against a scalar floor.
    pub fn max_scalar(&self, floor: f64) -> V3 {
        v(self.x.max(floor), self.y.max(floor), self.z.max(floor))
    }

    /// Largest of the three components.
    pub fn max_component(&self) -> f64 {
        self.x.max(self.y.max(self.z))
    }

    /// The single normalization primitive. A zero-length vector yields the
    /// zero vector instead of dividing by zero.
    pub fn unit_vector(&self) -> V3 {
        normalize(self)
    }

    pub fn multiply_by_vector(&self, factor: &V3) -> V3 {
        v(self.x * factor.x, self.y * factor.y, self.z * factor.z)
    }

    pub fn scale_by_vector(&mut self, factor: &V3) -> &mut Self {
        self.x *= factor.x;
        self.y *= factor.y;
        self.z *= factor.z;
        self
    }

    /// Ratio of `other`'s length to this one's, or 0 when the two point the
    /// same way.
    pub fn find_factor(&self, other: &V3) -> f64 {
        if self.angle_between(other) != 0. {
            other.length() / self.length()
        } else {
            0.
        }
    }

    pub fn add(&self, other: &V3) -> V3 {
        add(self, other)
    }

    pub fn add_in_place(&mut self, other: &V3) -> &mut Self {
        self.x += other.x;
        self.y += other.y;
        self.z += other.z;
        self
    }

    pub fn subtract(&self, other: &V3) -> V3 {
        sub(self, other)
    }

    pub fn subtract_in_place(&mut self, other: &V3) -> &mut Self {
        self.x -= other.x;
        self.y -= other.y;
        self.z -= other.z;
        self
    }

    pub fn translate(&mut self, dx: f64, dy: f64, dz: f64) -> &mut Self {
        self.x += dx;
        self.y += dy;
        self.z += dz;
        self
    }

    /// Vector pointing from `self` to `other`.
    pub fn difference_vector(&self, other: &V3) -> V3 {
        sub(other, self)
    }

    pub fn distance(&self, other: &V3) -> f64 {
        dist(self, other)
    }

    pub fn dot(&self, other: &V3) -> f64 {
        dot(self, other)
    }

    pub fn cross(&self, other: &V3) -> V3 {
        cross(self, other)
    }

    /// Angle in radians between the two vectors. Returns 0 when either one
    /// has zero length.
    pub fn angle_between(&self, other: &V3) -> f64 {
        let lengths = self.length() * other.length();
        if lengths == 0. {
            return 0.;
        }
        (dot(self, other) / lengths).clamp(-1., 1.).acos()
    }

    pub fn angle_to_xz(&self) -> f64 {
        self.angle_between(&v(self.x, 0., self.z))
    }

    pub fn angle_to_xy(&self) -> f64 {
        self.angle_between(&v(self.x, self.y, 0.))
    }

    pub fn angle_to_yz(&self) -> f64 {
        self.angle_between(&v(0., self.y, self.z))
    }

    /// Vector projection of `self` onto `onto`.
    pub fn projection(&self, onto: &V3) -> V3 {
        let len2 = onto.length2();
        if len2 == 0. {
            return O;
        }
        mul(dot(self, onto) / len2, onto)
    }

    pub fn scalar_projection(&self, onto: &V3) -> f64 {
        self.length() * self.angle_between(onto).cos()
    }

    pub fn rotate_x(&self, angle: f64) -> V3 {
        let (s, c) = angle.sin_cos();
        v(self.x, self.y * c - self.z * s, self.y * s + self.z * c)
    }

    pub fn rotate_in_place_x(&mut self, angle: f64) -> &mut Self {
        *self = self.rotate_x(angle);
        self
    }

    pub fn rotate_y(&self, angle: f64) -> V3 {
        let (s, c) = angle.sin_cos();
        v(self.x * c + self.z * s, self.y, self.z * c - self.x * s)
    }

    pub fn rotate_in_place_y(&mut self, angle: f64) -> &mut Self {
        *self = self.rotate_y(angle);
        self
    }

    pub fn rotate_z(&self, angle: f64) -> V3 {
        let (s, c) = angle.sin_cos();
        v(self.x * c - self.y * s, self.x * s + self.y * c, self.z)
    }

    pub fn rotate_in_place_z(&mut self, angle: f64) -> &mut Self {
        *self = self.rotate_z(angle);
        self
    }
}

impl fmt::Display for V3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

impl ops::Add<V3> for V3 {
    type Output = V3;

    fn add(self, rhs: V3) -> V3 {
        add(&self, &rhs)
    }
}

impl ops::Sub<V3> for V3 {
    type Output = V3;

    fn sub(self, rhs: V3) -> V3 {
        sub(&self, &rhs)
    }
}

impl ops::Neg for V3 {
    type Output = V3;

    fn neg(self) -> V3 {
        mul(-1., &self)
    }
}

impl ops::Mul<V3> for f64 {
    type Output = V3;

    fn mul(self, rhs: V3) -> Self::Output {
        mul(self, &rhs)
    }
}

impl ops::Mul<f64> for V3 {
    type Output = V3;

    fn mul(self, rhs: f64) -> Self::Output {
        mul(rhs, &self)
    }
}

impl ops::AddAssign<V3> for V3 {
    fn add_assign(&mut self, rhs: V3) {
        self.add_in_place(&rhs);
    }
}

impl ops::SubAssign<V3> for V3 {
    fn sub_assign(&mut self, rhs: V3) {
        self.subtract_in_place(&rhs);
    }
}

pub const B1: V3 = V3 {
    x: 1.,
    y: 0.,
    z: 0.,
};

pub const B2: V3 = V3 {
    x: 0.,
    y: 1.,
    z: 0.,
};

pub const B3: V3 = V3 {
    x: 0.,
    y: 0.,
    z: 1.,
};

pub const O: V3 = V3 {
    x: 0.,
    y: 0.,
    z: 0.,
};

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    fn assert_close(a: V3, b: V3) {
        assert!(dist(&a, &b) < 1e-9, "{a} != {b}");
    }

    #[test]
    fn unit_vector_of_unit_vector_is_unchanged() {
        let dirs = [B1, B2, B3, -B1, normalize(&v(1., 2., 3.)), normalize(&v(-0.3, 0.1, 7.))];
        for u in dirs {
            assert_close(u.unit_vector(), u);
        }
    }

    #[test]
    fn unit_vector_of_zero_is_zero() {
        let u = O.unit_vector();
        assert_eq!(u, O);
        assert!(!u.x.is_nan());
    }

    #[test]
    fn unit_vector_has_unit_length() {
        assert!((v(3., 4., 12.).unit_vector().length() - 1.).abs() < 1e-12);
    }

    #[test]
    fn value_ops_do_not_mutate() {
        let a = v(1., 2., 3.);
        let b = a.add(&B1);
        assert_eq!(a, v(1., 2., 3.));
        assert_eq!(b, v(2., 2., 3.));
        assert_eq!(a.subtract(&B2), v(1., 1., 3.));
        assert_eq!(a.multiply(2.), v(2., 4., 6.));
    }

    #[test]
    fn in_place_ops_mutate_and_chain() {
        let mut a = v(1., 1., 1.);
        a.add_in_place(&B1).scale(2.).translate(0., 0., 1.);
        assert_eq!(a, v(4., 2., 3.));
        a.subtract_in_place(&v(4., 2., 3.));
        assert_eq!(a, O);
    }

    #[test]
    fn dot_and_cross() {
        assert_eq!(dot(&v(1., 2., 3.), &v(4., -5., 6.)), 12.);
        assert_eq!(cross(&B1, &B2), B3);
        assert_eq!(cross(&v(0., 0., -1.), &B2), B1);
    }

    #[test]
    fn angle_between_handles_zero_operands() {
        assert_eq!(O.angle_between(&B1), 0.);
        assert_eq!(B1.angle_between(&O), 0.);
        assert!((B1.angle_between(&B2) - FRAC_PI_2).abs() < 1e-12);
        assert!((B1.angle_between(&-B1) - PI).abs() < 1e-12);
    }

    #[test]
    fn projection_onto_axis() {
        let a = v(3., 4., 5.);
        assert_close(a.projection(&v(0., 2., 0.)), v(0., 4., 0.));
        assert_eq!(a.projection(&O), O);
        assert!((a.scalar_projection(&B1) - 3.).abs() < 1e-9);
    }

    #[test]
    fn rotations_follow_right_hand_rule() {
        assert_close(B2.rotate_x(FRAC_PI_2), B3);
        assert_close(B3.rotate_y(FRAC_PI_2), B1);
        assert_close(B1.rotate_z(FRAC_PI_2), B2);
    }

    #[test]
    fn in_place_rotation_matches_value_rotation() {
        let a = v(0.3, -1.2, 2.5);
        for angle in [0.1, 1.0, -2.3] {
            let mut x = a;
            x.rotate_in_place_x(angle);
            assert_eq!(x, a.rotate_x(angle));
            let mut y = a;
            y.rotate_in_place_y(angle);
            assert_eq!(y, a.rotate_y(angle));
            let mut z = a;
            z.rotate_in_place_z(angle);
            assert_eq!(z, a.rotate_z(angle));
            assert!((z.length() - a.length()).abs() < 1e-12);
        }
    }

    #[test]
    fn difference_and_distance() {
        let a = v(1., 1., 1.);
        let b = v(2., 3., 1.);
        assert_eq!(a.difference_vector(&b), v(1., 2., 0.));
        assert!((a.distance(&b) - 5f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn find_factor_is_zero_for_parallel_vectors() {
        assert_eq!(B1.find_factor(&v(2., 0., 0.)), 0.);
        assert_eq!(B1.find_factor(&v(0., 2., 0.)), 2.);
    }

    #[test]
    fn plane_angles() {
        assert_eq!(v(1., 0., 0.).angle_to_xz(), 0.);
        assert!((v(0., 1., 1.).angle_to_xz() - PI / 4.).abs() < 1e-12);
        assert_eq!(v(0., 1., 0.).angle_to_xy(), 0.);
        assert_eq!(v(1., 0., 0.).angle_to_yz(), 0.);
    }

    #[test]
    fn display_formats_components() {
        assert_eq!(v(1., -2.5, 0.).to_string(), "(1, -2.5, 0)");
    }
}
