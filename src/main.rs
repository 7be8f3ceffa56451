use std::time::{Duration, Instant};

use anyhow::{bail, Context};
use clap::{Parser, ValueEnum};
use log::{info, warn, LevelFilter};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use raymarcher::color::to_rgb_image;
use raymarcher::engine::{Engine, EngineConfig};
use raymarcher::input::Intent;
use raymarcher::logger::init_logger;
use raymarcher::marcher::{Camera, Cuboid, RoundedBox, Scene, Shape, Sphere, Torus, TriangularPrism};
use raymarcher::math::{v, B2, O};
use raymarcher::Color;

#[derive(Debug, Clone, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Preset {
    Prism,
    Box,
    Torus,
    /// Sphere with a torus carved out of it.
    Carved,
    Showcase,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Held {
    Forward,
    Backward,
    Left,
    Right,
    Up,
    Down,
    TiltUp,
    TiltDown,
    RotateLeft,
    RotateRight,
}

impl From<Held> for Intent {
    fn from(held: Held) -> Self {
        match held {
            Held::Forward => Intent::Forward,
            Held::Backward => Intent::Backward,
            Held::Left => Intent::Left,
            Held::Right => Intent::Right,
            Held::Up => Intent::Up,
            Held::Down => Intent::Down,
            Held::TiltUp => Intent::TiltUp,
            Held::TiltDown => Intent::TiltDown,
            Held::RotateLeft => Intent::RotateLeft,
            Held::RotateRight => Intent::RotateRight,
        }
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Signed distance field ray marcher", long_about = None)]
struct Args {
    #[arg(long, default_value_t = 900)]
    width: usize,

    #[arg(long, default_value_t = 600)]
    height: usize,

    /// Logic ticks to run before saving the last frame
    #[arg(short, long, default_value_t = 1)]
    frames: u64,

    /// Logic ticks per second
    #[arg(long, default_value_t = 10.)]
    fps: f64,

    #[arg(short, long, default_value_t = 20.)]
    render_distance: f64,

    /// Distance below which a ray counts as a hit
    #[arg(short, long, default_value_t = 0.001)]
    epsilon: f64,

    #[arg(short, long, value_enum, default_value_t = Preset::Prism)]
    scene: Preset,

    /// Extra randomly placed spheres
    #[arg(long, default_value_t = 0)]
    scatter: usize,

    #[arg(long, default_value_t = 7)]
    seed: u64,

    /// Movement or rotation to hold for the whole run (repeatable)
    #[arg(long, value_enum)]
    hold: Vec<Held>,

    #[arg(long, default_value_t = 0.1)]
    movement_speed: f64,

    #[arg(long, default_value_t = 0.05)]
    rotation_speed: f64,

    #[arg(long, default_value_t = 0.1)]
    screen_distance: f64,

    #[arg(long, default_value_t = 0.00025)]
    pixel_spacing: f64,

    #[arg(short, long, default_value = "out.png")]
    out: String,

    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    log_level: LogLevel,
}

fn build_scene(preset: Preset) -> raymarcher::Result<Scene> {
    let mut scene = Scene::new();
    match preset {
        Preset::Prism => {
            scene.add_shape(TriangularPrism::new(O, 1., 1., Color::WHITE))?;
        }
        Preset::Box => {
            scene.add_shape(Cuboid::new(O, v(1., 1., 1.), Color::BLUE))?;
        }
        Preset::Torus => {
            scene.add_shape(Torus::new(O, 2., 1., Color::RED))?;
        }
        Preset::Carved => {
            let torus = scene.insert(Torus::new(O, 1., 0.5, Color::RED))?;
            let sphere = scene.insert(Sphere::new(O, 1., Color::BLACK))?;
            scene.add_shape(Shape::subtract(torus, sphere, Color::RED))?;
        }
        Preset::Showcase => {
            scene.add_shape(Sphere::new(v(-2.5, 0., 0.), 0.8, Color::RED))?;
            scene.add_shape(RoundedBox::new(O, v(0.6, 0.6, 0.6), 0.15, Color::BLUE))?;
            scene.add_shape(Torus::new(v(2.5, 0., 0.), 0.8, 0.3, Color::GREEN))?;
            let a = scene.insert(Sphere::new(v(0., 2., 0.), 0.7, Color::WHITE))?;
            let b = scene.insert(Cuboid::new(v(0., 2., 0.), v(0.55, 0.55, 0.55), Color::WHITE))?;
            scene.add_shape(Shape::intersection(a, b, Color::rgb(0xFF, 0xA5, 0x00)))?;
        }
    }
    Ok(scene)
}

fn scatter_spheres(scene: &mut Scene, count: usize, seed: u64) -> raymarcher::Result<()> {
    let mut rng = StdRng::seed_from_u64(seed);
    for _ in 0..count {
        let center = v(
            rng.gen_range(-6.0..6.0),
            rng.gen_range(-4.0..4.0),
            rng.gen_range(-12.0..-2.0),
        );
        let color = Color::rgb(rng.gen(), rng.gen(), rng.gen());
        scene.add_shape(Sphere::new(center, rng.gen_range(0.1..0.6), color))?;
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logger(args.log_level.clone().into());

    if args.frames == 0 {
        bail!("--frames must be at least 1");
    }

    let mut scene = build_scene(args.scene).context("building scene")?;
    scatter_spheres(&mut scene, args.scatter, args.seed).context("scattering spheres")?;
    info!("scene has {} shapes", scene.len());

    let mut camera = Camera::new(v(0., 0., 5.), v(0., 0., -1.), B2, args.screen_distance);
    camera.set_pixel_spacing(args.pixel_spacing);
    camera.set_movement_speed(args.movement_speed);
    camera.set_rotation_speed(args.rotation_speed);
    camera.set_ray_epsilon(args.epsilon);

    let engine = Engine::new(
        camera,
        scene,
        EngineConfig {
            width: args.width,
            height: args.height,
            render_distance: args.render_distance,
            tick_rate: args.fps,
        },
    );
    let input = engine.input();
    for held in &args.hold {
        input.press((*held).into());
    }

    let start = Instant::now();
    let handle = engine.spawn().context("starting render thread")?;
    let timeout = Duration::from_secs_f64(args.frames as f64 / args.fps.abs().max(0.1) + 60.);
    let reached = handle.front().wait_for(args.frames, timeout);
    if reached < args.frames {
        warn!("only {} of {} frames were rendered", reached, args.frames);
    }
    let frame = handle.front().snapshot();
    let stats = handle.stop().context("render thread failed")?;
    info!(
        "rendered {} frames in {:.2} s",
        stats.frames,
        start.elapsed().as_secs_f32()
    );

    let img = to_rgb_image(&frame.pixels, frame.width as u32, frame.height as u32)
        .context("no frame was published")?;
    img.save(&args.out)
        .with_context(|| format!("saving {}", args.out))?;
    info!("saved {}", args.out);
    Ok(())
}
