use criterion::{black_box, criterion_group, criterion_main, Criterion};
use raymarcher::marcher::{Camera, Cuboid, Ray, Scene, Shape, Sphere, Torus};
use raymarcher::math::{v, B2, B3, O};
use raymarcher::Color;

fn showcase() -> Scene {
    let mut scene = Scene::new();
    scene
        .add_shape(Sphere::new(v(-2.5, 0., 0.), 0.8, Color::RED))
        .unwrap();
    scene
        .add_shape(Torus::new(v(2.5, 0., 0.), 0.8, 0.3, Color::GREEN))
        .unwrap();
    let a = scene.insert(Sphere::new(O, 0.7, Color::WHITE)).unwrap();
    let b = scene
        .insert(Cuboid::new(O, v(0.55, 0.55, 0.55), Color::WHITE))
        .unwrap();
    scene
        .add_shape(Shape::intersection(a, b, Color::BLUE))
        .unwrap();
    scene
}

fn bench_single_ray(c: &mut Criterion) {
    let scene = showcase();
    let hit = Ray::new(v(0., 0., 5.), -B3, 20.);
    let miss = Ray::new(v(0., 0., 5.), B3, 20.);
    c.bench_function("march_hit", |b| b.iter(|| black_box(&hit).march(&scene)));
    c.bench_function("march_miss", |b| b.iter(|| black_box(&miss).march(&scene)));
}

fn bench_frame(c: &mut Criterion) {
    let scene = showcase();
    let mut camera = Camera::new(v(0., 0., 5.), v(0., 0., -1.), B2, 0.1);
    camera.set_pixel_spacing(0.0005);
    camera.create_rays(320, 200, 20.).unwrap();
    let mut pixels = vec![Color::BLACK; 320 * 200];
    c.bench_function("render_320x200", |b| {
        b.iter(|| camera.render(&scene, &mut pixels).unwrap())
    });
}

criterion_group!(benches, bench_single_ray, bench_frame);
criterion_main!(benches);
