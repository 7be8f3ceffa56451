//! Fixed-rate render loop.
//!
//! One dedicated thread owns the [`Camera`]. Logic ticks happen at a fixed
//! rate: elapsed time feeds an accumulator and every whole tick in it runs one
//! frame (apply motion, march every ray). Each finished frame is swapped into
//! a [`FrontBuffer`] so the presentation side only ever sees complete frames,
//! at whatever rate it likes.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::{unbounded, Receiver, Sender};
use log::{debug, error, info, trace};
use parking_lot::{Condvar, Mutex, RwLock};

use crate::color::Color;
use crate::input::InputState;
use crate::marcher::{Camera, Scene};
use crate::{Error, Result};

pub type SharedScene = Arc<RwLock<Scene>>;

pub const DEFAULT_TICK_RATE: f64 = 10.;

/// Longest the render thread sleeps between checks of the running flag.
const MAX_IDLE: Duration = Duration::from_millis(5);

/// Negative rates flip sign. Zero, NaN and infinities fall back to
/// [`DEFAULT_TICK_RATE`].
pub fn tick_rate_or_default(rate: f64) -> f64 {
    if !rate.is_finite() {
        DEFAULT_TICK_RATE
    } else if rate < 0. {
        rate.abs()
    } else if rate == 0. {
        DEFAULT_TICK_RATE
    } else {
        rate
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct EngineConfig {
    pub width: usize,
    pub height: usize,
    pub render_distance: f64,
    /// Logic ticks per second.
    pub tick_rate: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            width: 900,
            height: 600,
            render_distance: 20.,
            tick_rate: DEFAULT_TICK_RATE,
        }
    }
}

/// Accumulates elapsed time in units of whole ticks.
#[derive(Clone, Debug)]
pub struct FixedStep {
    tick: Duration,
    accumulator: f64,
}

impl FixedStep {
    pub fn new(rate: f64) -> Self {
        FixedStep {
            tick: Duration::from_secs_f64(1. / tick_rate_or_default(rate)),
            accumulator: 0.,
        }
    }

    pub fn tick(&self) -> Duration {
        self.tick
    }

    /// Adds `elapsed` and returns how many ticks are now due. The fractional
    /// remainder carries over.
    pub fn advance(&mut self, elapsed: Duration) -> u32 {
        self.accumulator += elapsed.as_secs_f64() / self.tick.as_secs_f64();
        let mut due = 0;
        while self.accumulator >= 1. {
            self.accumulator -= 1.;
            due += 1;
        }
        due
    }

    pub fn until_next_tick(&self) -> Duration {
        self.tick.mul_f64((1. - self.accumulator).max(0.))
    }
}

/// A published frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Frame {
    pub pixels: Vec<Color>,
    pub width: usize,
    pub height: usize,
    /// Number of frames published so far; 0 means nothing yet.
    pub sequence: u64,
}

#[derive(Debug, Default)]
struct FrontState {
    frame: Frame,
    closed: bool,
}

/// The presentation side of the double buffer.
#[derive(Debug, Default)]
pub struct FrontBuffer {
    state: Mutex<FrontState>,
    published: Condvar,
}

impl FrontBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Swaps `back` in as the new front frame. `back` gets the previous front
    /// pixels, ready to be overwritten.
    pub fn publish(&self, back: &mut Vec<Color>, width: usize, height: usize) -> u64 {
        let mut state = self.state.lock();
        let frame = &mut state.frame;
        std::mem::swap(&mut frame.pixels, back);
        frame.width = width;
        frame.height = height;
        frame.sequence += 1;
        let sequence = frame.sequence;
        drop(state);
        self.published.notify_all();
        sequence
    }

    pub fn sequence(&self) -> u64 {
        self.state.lock().frame.sequence
    }

    /// Runs `f` against the current front frame while holding the lock.
    pub fn read<R>(&self, f: impl FnOnce(&Frame) -> R) -> R {
        f(&self.state.lock().frame)
    }

    pub fn snapshot(&self) -> Frame {
        self.read(Frame::clone)
    }

    /// Blocks until frame `sequence` has been published, the producer has
    /// gone away, or `timeout` passes. Returns the latest sequence number.
    pub fn wait_for(&self, sequence: u64, timeout: Duration) -> u64 {
        let deadline = Instant::now() + timeout;
        let mut state = self.state.lock();
        while state.frame.sequence < sequence && !state.closed {
            if self.published.wait_until(&mut state, deadline).timed_out() {
                break;
            }
        }
        state.frame.sequence
    }

    fn close(&self) {
        self.state.lock().closed = true;
        self.published.notify_all();
    }
}

/// Requests handled by the render thread at the top of the next tick.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    Resize { width: usize, height: usize },
    SetMovementSpeed(f64),
    SetRotationSpeed(f64),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EngineStats {
    pub frames: u64,
    pub resizes: u64,
}

pub struct Engine {
    camera: Camera,
    scene: SharedScene,
    config: EngineConfig,
    input: Arc<InputState>,
}

impl Engine {
    pub fn new(camera: Camera, scene: Scene, config: EngineConfig) -> Self {
        Engine {
            camera,
            scene: Arc::new(RwLock::new(scene)),
            config,
            input: Arc::new(InputState::new()),
        }
    }

    pub fn input(&self) -> Arc<InputState> {
        Arc::clone(&self.input)
    }

    pub fn scene(&self) -> SharedScene {
        Arc::clone(&self.scene)
    }

    /// Builds the ray grid and starts the render thread.
    pub fn spawn(mut self) -> Result<EngineHandle> {
        let EngineConfig {
            width,
            height,
            render_distance,
            tick_rate,
        } = self.config;
        self.camera.create_rays(width, height, render_distance)?;

        let running = Arc::new(AtomicBool::new(true));
        let front = Arc::new(FrontBuffer::new());
        let (commands, receiver) = unbounded();

        let worker = RenderLoop {
            camera: self.camera,
            scene: Arc::clone(&self.scene),
            input: Arc::clone(&self.input),
            front: Arc::clone(&front),
            commands: receiver,
            running: Arc::clone(&running),
            render_distance,
            width,
            height,
        };
        info!(
            "starting render thread: {}x{} at {} ticks/s",
            width,
            height,
            tick_rate_or_default(tick_rate)
        );
        let thread = thread::spawn(move || worker.run(FixedStep::new(tick_rate)));

        Ok(EngineHandle {
            running,
            commands,
            front,
            input: self.input,
            scene: self.scene,
            thread: Some(thread),
        })
    }
}

struct RenderLoop {
    camera: Camera,
    scene: SharedScene,
    input: Arc<InputState>,
    front: Arc<FrontBuffer>,
    commands: Receiver<Command>,
    running: Arc<AtomicBool>,
    render_distance: f64,
    width: usize,
    height: usize,
}

impl RenderLoop {
    fn run(mut self, mut step: FixedStep) -> Result<EngineStats> {
        let mut stats = EngineStats::default();
        let mut back = vec![Color::default(); self.width * self.height];
        let mut last = Instant::now();

        let result = 'run: loop {
            if !self.running.load(Ordering::Acquire) {
                break Ok(stats);
            }
            let now = Instant::now();
            let due = step.advance(now - last);
            last = now;
            if due == 0 {
                thread::sleep(step.until_next_tick().min(MAX_IDLE));
                continue;
            }
            for _ in 0..due {
                if !self.running.load(Ordering::Acquire) {
                    break 'run Ok(stats);
                }
                if let Err(e) = self.tick(&mut back, &mut stats) {
                    error!("frame {} aborted: {}", stats.frames + 1, e);
                    break 'run Err(e);
                }
            }
        };

        self.running.store(false, Ordering::Release);
        self.front.close();
        info!("render thread stopped after {} frames", stats.frames);
        result
    }

    fn tick(&mut self, back: &mut Vec<Color>, stats: &mut EngineStats) -> Result<()> {
        for command in self.commands.try_iter() {
            match command {
                Command::Resize { width, height } => {
                    self.camera
                        .create_rays(width, height, self.render_distance)?;
                    self.width = width;
                    self.height = height;
                    stats.resizes += 1;
                    debug!("viewport resized to {}x{}", width, height);
                }
                Command::SetMovementSpeed(speed) => self.camera.set_movement_speed(speed),
                Command::SetRotationSpeed(speed) => self.camera.set_rotation_speed(speed),
            }
        }

        back.resize(self.width * self.height, Color::default());
        self.camera.set_intents(self.input.snapshot());
        {
            let scene = self.scene.read();
            self.camera.render(&scene, back)?;
        }
        let sequence = self.front.publish(back, self.width, self.height);
        stats.frames += 1;
        trace!("published frame {}", sequence);
        Ok(())
    }
}

/// Host-side control of a running engine.
///
/// Dropping the handle stops the render thread and discards its result.
pub struct EngineHandle {
    running: Arc<AtomicBool>,
    commands: Sender<Command>,
    front: Arc<FrontBuffer>,
    input: Arc<InputState>,
    scene: SharedScene,
    thread: Option<JoinHandle<Result<EngineStats>>>,
}

impl EngineHandle {
    pub fn front(&self) -> &FrontBuffer {
        &self.front
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    /// Write-lock this between frames to add shapes or change the
    /// background.
    pub fn scene(&self) -> &SharedScene {
        &self.scene
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    pub fn send(&self, command: Command) -> Result<()> {
        if !self.is_running() {
            return Err(Error::EngineStopped);
        }
        self.commands
            .send(command)
            .map_err(|_| Error::EngineStopped)
    }

    pub fn resize(&self, width: usize, height: usize) -> Result<()> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidViewport { width, height });
        }
        self.send(Command::Resize { width, height })
    }

    /// Stops the loop after the current frame and returns what the render
    /// thread ended with.
    pub fn stop(mut self) -> Result<EngineStats> {
        self.shutdown()
    }

    fn shutdown(&mut self) -> Result<EngineStats> {
        self.running.store(false, Ordering::Release);
        match self.thread.take() {
            Some(thread) => thread.join().unwrap_or(Err(Error::EngineStopped)),
            None => Err(Error::EngineStopped),
        }
    }
}

impl Drop for EngineHandle {
    fn drop(&mut self) {
        if self.thread.is_some() {
            let _ = self.shutdown();
        }
    }
}
