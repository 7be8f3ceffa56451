use crate::color::Color;
use crate::marcher::scene::ShapeId;
use crate::marcher::Renderable;
use crate::math::{length, sub, v, V3};

/// cos(30°), the slope of the prism's slanted faces.
const PRISM_SLOPE: f64 = 0.866025;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sphere {
    pub center: V3,
    pub radius: f64,
    pub color: Color,
}

impl Sphere {
    pub fn new(center: V3, radius: f64, color: Color) -> Self {
        Sphere {
            center,
            radius: radius.abs(),
            color,
        }
    }
}

/// Axis-aligned box. `size` holds the half-extent along each axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cuboid {
    pub center: V3,
    pub size: V3,
    pub color: Color,
}

impl Cuboid {
    pub fn new(center: V3, size: V3, color: Color) -> Self {
        Cuboid {
            center,
            size,
            color,
        }
    }
}

/// A [`Cuboid`] with its surface pushed out by `radius`, rounding the edges.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RoundedBox {
    pub center: V3,
    pub size: V3,
    pub radius: f64,
    pub color: Color,
}

impl RoundedBox {
    pub fn new(center: V3, size: V3, radius: f64, color: Color) -> Self {
        RoundedBox {
            center,
            size,
            radius,
            color,
        }
    }
}

/// Ring lying in the XZ plane.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Torus {
    pub center: V3,
    pub radius: f64,
    pub thickness: f64,
    pub color: Color,
}

impl Torus {
    pub fn new(center: V3, radius: f64, thickness: f64, color: Color) -> Self {
        Torus {
            center,
            radius,
            thickness,
            color,
        }
    }
}

/// Equilateral triangle in the XY plane extruded along z.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TriangularPrism {
    pub center: V3,
    pub height: f64,
    pub length: f64,
    pub color: Color,
}

impl TriangularPrism {
    pub fn new(center: V3, height: f64, length: f64, color: Color) -> Self {
        TriangularPrism {
            center,
            height,
            length,
            color,
        }
    }
}

fn box_sdf(local: &V3, size: &V3) -> f64 {
    let q = sub(&local.abs(), size);
    length(&q.max_scalar(0.)) + q.max_component().min(0.)
}

impl Renderable for Sphere {
    fn sdf(&self, x: &V3) -> f64 {
        length(&sub(x, &self.center)) - self.radius
    }
}

impl Renderable for Cuboid {
    fn sdf(&self, x: &V3) -> f64 {
        box_sdf(&sub(x, &self.center), &self.size)
    }
}

impl Renderable for RoundedBox {
    fn sdf(&self, x: &V3) -> f64 {
        box_sdf(&sub(x, &self.center), &self.size) - self.radius
    }
}

impl Renderable for Torus {
    fn sdf(&self, x: &V3) -> f64 {
        let p = sub(x, &self.center);
        let ring = (p.x * p.x + p.z * p.z).sqrt() - self.radius;
        length(&v(ring, p.y, 0.)) - self.thickness
    }
}

impl Renderable for TriangularPrism {
    fn sdf(&self, x: &V3) -> f64 {
        let p = sub(x, &self.center);
        let cap = p.z.abs() - self.length * 0.5;
        let side = (p.x.abs() * PRISM_SLOPE + p.y * 0.5).max(-p.y) - self.height * 0.5;
        cap.max(side)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CsgOp {
    Union,
    /// Carves the first operand out of the second.
    Subtract,
    Intersection,
}

impl CsgOp {
    pub fn combine(self, a: f64, b: f64) -> f64 {
        match self {
            CsgOp::Union => a.min(b),
            CsgOp::Subtract => (-a).max(b),
            CsgOp::Intersection => a.max(b),
        }
    }
}

/// Boolean combination of two stored shapes.
///
/// The node has one flat color no matter which operand is nearest.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Csg {
    pub op: CsgOp,
    pub a: ShapeId,
    pub b: ShapeId,
    pub color: Color,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Shape {
    Sphere(Sphere),
    Box(Cuboid),
    RoundedBox(RoundedBox),
    Torus(Torus),
    TriangularPrism(TriangularPrism),
    Csg(Csg),
}

impl Shape {
    pub fn union(a: ShapeId, b: ShapeId, color: Color) -> Self {
        Shape::Csg(Csg {
            op: CsgOp::Union,
            a,
            b,
            color,
        })
    }

    pub fn subtract(a: ShapeId, b: ShapeId, color: Color) -> Self {
        Shape::Csg(Csg {
            op: CsgOp::Subtract,
            a,
            b,
            color,
        })
    }

    pub fn intersection(a: ShapeId, b: ShapeId, color: Color) -> Self {
        Shape::Csg(Csg {
            op: CsgOp::Intersection,
            a,
            b,
            color,
        })
    }

    pub fn color(&self) -> Color {
        match self {
            Shape::Sphere(s) => s.color,
            Shape::Box(s) => s.color,
            Shape::RoundedBox(s) => s.color,
            Shape::Torus(s) => s.color,
            Shape::TriangularPrism(s) => s.color,
            Shape::Csg(s) => s.color,
        }
    }

    pub fn set_color(&mut self, color: Color) {
        match self {
            Shape::Sphere(s) => s.color = color,
            Shape::Box(s) => s.color = color,
            Shape::RoundedBox(s) => s.color = color,
            Shape::Torus(s) => s.color = color,
            Shape::TriangularPrism(s) => s.color = color,
            Shape::Csg(s) => s.color = color,
        }
    }

    /// Center of a primitive; combinators have none of their own.
    pub fn position(&self) -> Option<V3> {
        match self {
            Shape::Sphere(s) => Some(s.center),
            Shape::Box(s) => Some(s.center),
            Shape::RoundedBox(s) => Some(s.center),
            Shape::Torus(s) => Some(s.center),
            Shape::TriangularPrism(s) => Some(s.center),
            Shape::Csg(_) => None,
        }
    }

    pub fn set_position(&mut self, center: V3) {
        match self {
            Shape::Sphere(s) => s.center = center,
            Shape::Box(s) => s.center = center,
            Shape::RoundedBox(s) => s.center = center,
            Shape::Torus(s) => s.center = center,
            Shape::TriangularPrism(s) => s.center = center,
            Shape::Csg(_) => {}
        }
    }

    /// Operands a combinator reads from.
    pub fn operands(&self) -> Option<(ShapeId, ShapeId)> {
        match self {
            Shape::Csg(c) => Some((c.a, c.b)),
            _ => None,
        }
    }

    /// Distance for leaf shapes. Combinators need the arena their operands
    /// live in, so they return `None` here.
    pub fn leaf_sdf(&self, x: &V3) -> Option<f64> {
        match self {
            Shape::Sphere(s) => Some(s.sdf(x)),
            Shape::Box(s) => Some(s.sdf(x)),
            Shape::RoundedBox(s) => Some(s.sdf(x)),
            Shape::Torus(s) => Some(s.sdf(x)),
            Shape::TriangularPrism(s) => Some(s.sdf(x)),
            Shape::Csg(_) => None,
        }
    }
}

impl From<Sphere> for Shape {
    fn from(s: Sphere) -> Self {
        Shape::Sphere(s)
    }
}

impl From<Cuboid> for Shape {
    fn from(s: Cuboid) -> Self {
        Shape::Box(s)
    }
}

impl From<RoundedBox> for Shape {
    fn from(s: RoundedBox) -> Self {
        Shape::RoundedBox(s)
    }
}

impl From<Torus> for Shape {
    fn from(s: Torus) -> Self {
        Shape::Torus(s)
    }
}

impl From<TriangularPrism> for Shape {
    fn from(s: TriangularPrism) -> Self {
        Shape::TriangularPrism(s)
    }
}
