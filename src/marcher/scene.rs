use crate::color::Color;
use crate::marcher::shapes::Shape;
use crate::math::V3;
use crate::{Error, Result};

/// Handle to a shape stored in a [`Scene`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShapeId(pub usize);

/// Shapes plus the background color shown when a ray escapes.
///
/// Every shape lives in one arena. Only ids on the draw list are scanned by
/// the marcher; the rest exist to be referenced by combinators. A combinator
/// can only point at shapes stored before it, so the arena is a DAG.
#[derive(Clone, Debug)]
pub struct Scene {
    arena: Vec<Shape>,
    draw: Vec<ShapeId>,
    background: Color,
}

impl Default for Scene {
    fn default() -> Self {
        Scene::new()
    }
}

impl Scene {
    pub fn new() -> Self {
        Scene {
            arena: Vec::new(),
            draw: Vec::new(),
            background: Color::SKY,
        }
    }

    pub fn with_background(background: Color) -> Self {
        Scene {
            background,
            ..Scene::new()
        }
    }

    /// Stores a shape without drawing it.
    pub fn insert(&mut self, shape: impl Into<Shape>) -> Result<ShapeId> {
        let shape = shape.into();
        if let Some((a, b)) = shape.operands() {
            self.get(a)?;
            self.get(b)?;
        }
        self.arena.push(shape);
        Ok(ShapeId(self.arena.len() - 1))
    }

    /// Stores a shape and appends it to the draw list.
    pub fn add_shape(&mut self, shape: impl Into<Shape>) -> Result<ShapeId> {
        let id = self.insert(shape)?;
        self.draw.push(id);
        Ok(id)
    }

    /// Appends an already stored shape to the draw list.
    pub fn draw(&mut self, id: ShapeId) -> Result<()> {
        self.get(id)?;
        self.draw.push(id);
        Ok(())
    }

    pub fn get(&self, id: ShapeId) -> Result<&Shape> {
        self.arena.get(id.0).ok_or(Error::UnknownShape(id))
    }

    /// Mutable access for moving or recoloring a shape between frames.
    /// Combinator operands cannot be rewired through this.
    pub fn shape_mut(&mut self, id: ShapeId) -> Result<&mut Shape> {
        self.arena.get_mut(id.0).ok_or(Error::UnknownShape(id))
    }

    pub fn background_color(&self) -> Color {
        self.background
    }

    pub fn set_background_color(&mut self, color: Color) {
        self.background = color;
    }

    /// Drawn shapes in insertion order.
    pub fn shapes(&self) -> impl Iterator<Item = (ShapeId, &Shape)> + '_ {
        self.draw.iter().map(move |&id| (id, &self.arena[id.0]))
    }

    pub fn len(&self) -> usize {
        self.draw.len()
    }

    pub fn is_empty(&self) -> bool {
        self.draw.is_empty()
    }

    /// Signed distance from `x` to a stored shape, recursing through
    /// combinators.
    pub fn distance(&self, id: ShapeId, x: &V3) -> Result<f64> {
        match self.get(id)? {
            Shape::Csg(c) => Ok(c.op.combine(self.distance(c.a, x)?, self.distance(c.b, x)?)),
            leaf => Ok(leaf.leaf_sdf(x).unwrap_or(f64::INFINITY)),
        }
    }

    /// Nearest drawn shape to `x`. The first shape in draw order wins ties.
    pub fn nearest(&self, x: &V3) -> Result<(ShapeId, f64)> {
        let mut ids = self.draw.iter();
        let first = *ids.next().ok_or(Error::EmptyScene)?;
        let mut best = (first, self.distance(first, x)?);
        for &id in ids {
            let d = self.distance(id, x)?;
            if d < best.1 {
                best = (id, d);
            }
        }
        Ok(best)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::marcher::shapes::{Cuboid, Sphere, Torus};
    use crate::math::{v, O};

    fn two_spheres() -> (Scene, ShapeId, ShapeId) {
        let mut scene = Scene::new();
        let a = scene.insert(Sphere::new(O, 1., Color::RED)).unwrap();
        let b = scene.insert(Sphere::new(v(3., 0., 0.), 1., Color::BLUE)).unwrap();
        (scene, a, b)
    }

    #[test]
    fn default_background_is_sky() {
        assert_eq!(Scene::new().background_color(), Color::SKY);
        let mut scene = Scene::default();
        scene.set_background_color(Color::BLACK);
        assert_eq!(scene.background_color(), Color::BLACK);
    }

    #[test]
    fn insert_does_not_draw() {
        let (scene, _, _) = two_spheres();
        assert!(scene.is_empty());
        assert_eq!(scene.nearest(&O), Err(Error::EmptyScene));
    }

    #[test]
    fn union_of_two_spheres() {
        let (mut scene, a, b) = two_spheres();
        let u = scene.add_shape(Shape::union(a, b, Color::GREEN)).unwrap();
        assert!(scene.distance(u, &v(0.4, 0., 0.)).unwrap() < 0.);
        assert!((scene.distance(u, &v(1.4, 0., 0.)).unwrap() - 0.4).abs() < 1e-9);
        assert_eq!(scene.distance(u, &v(5., 0., 0.)).unwrap(), 1.);
        assert_eq!(scene.len(), 1);
    }

    #[test]
    fn subtract_reads_outside_where_both_overlap() {
        let mut scene = Scene::new();
        let a = scene.insert(Sphere::new(O, 1., Color::RED)).unwrap();
        let b = scene.insert(Sphere::new(v(0.5, 0., 0.), 1., Color::RED)).unwrap();
        let s = scene.add_shape(Shape::subtract(a, b, Color::RED)).unwrap();
        assert!(scene.distance(s, &v(0.25, 0., 0.)).unwrap() > 0.);
    }

    #[test]
    fn intersection_keeps_only_overlap() {
        let mut scene = Scene::new();
        let a = scene.insert(Sphere::new(O, 1., Color::RED)).unwrap();
        let b = scene.insert(Cuboid::new(v(1., 0., 0.), v(1., 1., 1.), Color::RED)).unwrap();
        let i = scene.add_shape(Shape::intersection(a, b, Color::RED)).unwrap();
        assert!(scene.distance(i, &v(0.5, 0., 0.)).unwrap() < 0.);
        assert!(scene.distance(i, &v(-0.5, 0., 0.)).unwrap() > 0.);
    }

    #[test]
    fn combinators_nest() {
        let (mut scene, a, b) = two_spheres();
        let u = scene.insert(Shape::union(a, b, Color::GREEN)).unwrap();
        let t = scene.insert(Torus::new(O, 3., 0.25, Color::RED)).unwrap();
        let outer = scene.add_shape(Shape::union(u, t, Color::WHITE)).unwrap();
        assert!((scene.distance(outer, &v(0., 0., 3.)).unwrap() + 0.25).abs() < 1e-9);
        assert_eq!(scene.get(outer).unwrap().color(), Color::WHITE);
    }

    #[test]
    fn unknown_operands_are_rejected() {
        let mut scene = Scene::new();
        let err = scene.add_shape(Shape::union(ShapeId(0), ShapeId(1), Color::RED));
        assert_eq!(err, Err(Error::UnknownShape(ShapeId(0))));
        assert_eq!(scene.draw(ShapeId(7)), Err(Error::UnknownShape(ShapeId(7))));
    }

    #[test]
    fn nearest_prefers_first_on_ties() {
        let mut scene = Scene::new();
        let a = scene.add_shape(Sphere::new(v(-2., 0., 0.), 1., Color::RED)).unwrap();
        let _b = scene.add_shape(Sphere::new(v(2., 0., 0.), 1., Color::BLUE)).unwrap();
        assert_eq!(scene.nearest(&O), Ok((a, 1.)));
    }

    #[test]
    fn shapes_iterate_in_draw_order() {
        let (mut scene, a, b) = two_spheres();
        scene.draw(b).unwrap();
        scene.draw(a).unwrap();
        let order: Vec<_> = scene.shapes().map(|(id, _)| id).collect();
        assert_eq!(order, vec![b, a]);
    }

    #[test]
    fn shape_mut_moves_a_shape() {
        let (mut scene, a, _) = two_spheres();
        scene.draw(a).unwrap();
        scene.shape_mut(a).unwrap().set_position(v(10., 0., 0.));
        assert_eq!(scene.distance(a, &v(10., 0., 0.)).unwrap(), -1.);
    }

    #[test]
    fn distance_to_unknown_id_is_an_error() {
        let mut scene = Scene::new();
        scene.add_shape(Sphere::new(O, 1., Color::RED)).unwrap();
        assert_eq!(scene.distance(ShapeId(5), &O), Err(Error::UnknownShape(ShapeId(5))));
    }
}
