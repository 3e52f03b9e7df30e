//! Particle Pool Demo
//!
//! Runs a headless CPU particle simulation on top of `engine_pool`.
//! Long-lived particles are tracked through `Pool` accessors; the short
//! sparks they leave behind live in a `PoolWithoutAccessor` and are swept by
//! age every frame.
//!
//! ```text
//! particle_demo [config.ron|config.toml]
//! ```

use engine_pool::foundation::logging;
use engine_pool::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can stop the demo
#[derive(Debug, Error)]
enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Pool error: {0}")]
    Pool(#[from] PoolError),
}

/// Demo settings, loadable from TOML or RON
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
struct AppConfig {
    frames: u32,
    delta_time: f32,
    spawn_per_frame: u32,
    particle_lifetime: f32,
    seed: u64,
    particles: PoolConfig,
    sparks: PoolConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            frames: 120,
            delta_time: 1.0 / 60.0,
            spawn_per_frame: 8,
            particle_lifetime: 1.0,
            seed: 0,
            particles: PoolConfig::with_capacity(128),
            sparks: PoolConfig::with_capacity(256).growth(GrowthPolicy::Doubling),
        }
    }
}

impl Config for AppConfig {}

#[derive(Debug, Default, Clone, PartialEq)]
struct Particle {
    position: [f32; 3],
    velocity: [f32; 3],
    age: f32,
    lifetime: f32,
}

impl Particle {
    fn expired(&self) -> bool {
        self.age >= self.lifetime
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
struct Spark {
    id: u64,
    position: [f32; 3],
    ttl: f32,
}

const GRAVITY: f32 = -9.81;
const SPARK_TTL: f32 = 0.25;

struct Simulation {
    config: AppConfig,
    particles: Pool<Particle>,
    live: Vec<Accessor>,
    sparks: PoolWithoutAccessor<Spark>,
    next_spark_id: u64,
    rng: StdRng,
}

impl Simulation {
    fn new(config: AppConfig) -> Result<Self, AppError> {
        let particles = Pool::with_config(&config.particles)?;
        let sparks = PoolWithoutAccessor::with_config(&config.sparks)?;
        let rng = StdRng::seed_from_u64(config.seed);

        Ok(Self {
            live: Vec::with_capacity(config.particles.initial_capacity),
            config,
            particles,
            sparks,
            next_spark_id: 0,
            rng,
        })
    }

    fn spawn(&mut self) {
        for _ in 0..self.config.spawn_per_frame {
            let velocity = [
                self.rng.gen_range(-1.0..1.0),
                self.rng.gen_range(2.0..6.0),
                self.rng.gen_range(-1.0..1.0),
            ];
            let lifetime = self.config.particle_lifetime * self.rng.gen_range(0.5..1.5);

            let accessor = self.particles.fetch();
            let particle = &mut self.particles[accessor];
            particle.velocity = velocity;
            particle.lifetime = lifetime;
            self.live.push(accessor);
        }
    }

    fn integrate(&mut self, dt: f32) {
        for particle in self.particles.iter_mut() {
            particle.velocity[1] += GRAVITY * dt;
            for axis in 0..3 {
                particle.position[axis] += particle.velocity[axis] * dt;
            }
            particle.age += dt;
        }

        for spark in self.sparks.iter_mut() {
            spark.ttl -= dt;
        }
    }

    /// Release expired particles, leaving a spark where each one died
    fn retire(&mut self) -> Result<usize, AppError> {
        let mut retired = 0;
        let mut index = 0;
        while index < self.live.len() {
            let accessor = self.live[index];
            if self.particles[accessor].expired() {
                let particle = self.particles.release(accessor)?;
                self.live.swap_remove(index);
                self.emit_spark(particle.position);
                retired += 1;
            } else {
                index += 1;
            }
        }

        self.sparks.release_where(|spark| spark.ttl <= 0.0);
        Ok(retired)
    }

    fn emit_spark(&mut self, position: [f32; 3]) {
        let spark = self.sparks.fetch();
        spark.id = self.next_spark_id;
        spark.position = position;
        spark.ttl = SPARK_TTL;
        self.next_spark_id += 1;
    }

    fn step(&mut self) -> Result<usize, AppError> {
        let dt = self.config.delta_time;
        self.spawn();
        self.integrate(dt);
        self.retire()
    }

    fn run(&mut self) -> Result<(), AppError> {
        let mut retired_total = 0;
        for frame in 0..self.config.frames {
            retired_total += self.step()?;

            if frame % 60 == 0 {
                log::info!(
                    "Frame {:>4}: {} particles ({} slots), {} sparks ({} slots)",
                    frame,
                    self.particles.len(),
                    self.particles.capacity(),
                    self.sparks.len(),
                    self.sparks.capacity()
                );
            }
        }

        log::info!("Retired {} particles", retired_total);
        log::info!("Particle pool: {:?}", self.particles.stats());
        log::info!("Spark pool: {:?}", self.sparks.stats());
        Ok(())
    }
}

fn load_config() -> Result<AppConfig, AppError> {
    match std::env::args().nth(1) {
        Some(path) => {
            log::info!("Loading configuration from {}", path);
            Ok(AppConfig::load_from_file(path)?)
        }
        None => Ok(AppConfig::default()),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init_with_level(log::LevelFilter::Info);

    log::info!("Starting particle pool demo");

    let config = load_config()?;
    let mut simulation = Simulation::new(config)?;
    simulation.run()?;

    log::info!("Particle pool demo finished successfully");
    Ok(())
}
