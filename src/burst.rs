use rand::seq::SliceRandom;
use rand::Rng;

const PARTICLE_COUNT: usize = 30;
const SYMBOLS: [char; 5] = ['✦', '•', '*', '·', '+'];

/// One spark of the cue burst, in terminal cell coordinates
#[derive(Debug, Clone)]
pub struct Particle {
    pub x: f64,
    pub y: f64,
    pub vel_x: f64,
    pub vel_y: f64,
    pub symbol: char,
    /// 1.0 when spawned, dead at 0.0
    pub life: f64,
}

impl Particle {
    fn update(&mut self, dt: f64) -> bool {
        self.x += self.vel_x * dt;
        self.y += self.vel_y * dt;
        self.life -= dt;
        self.life > 0.0
    }
}

/// Radial particle burst played when the cue appears
#[derive(Debug, Default)]
pub struct Burst {
    pub particles: Vec<Particle>,
    pub is_active: bool,
    width: f64,
    height: f64,
}

impl Burst {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn trigger(&mut self, width: u16, height: u16) {
        self.trigger_with(width, height, &mut rand::thread_rng());
    }

    pub fn trigger_with<R: Rng>(&mut self, width: u16, height: u16, rng: &mut R) {
        self.width = width as f64;
        self.height = height as f64;
        self.particles.clear();

        let center_x = self.width / 2.0;
        let center_y = self.height / 2.0;

        for _ in 0..PARTICLE_COUNT {
            let theta = rng.gen_range(0.0..std::f64::consts::TAU);
            let speed = rng.gen_range(6.0..18.0);
            self.particles.push(Particle {
                x: center_x,
                y: center_y,
                // cells are roughly twice as tall as they are wide
                vel_x: theta.cos() * speed * 2.0,
                vel_y: theta.sin() * speed,
                symbol: *SYMBOLS.choose(rng).unwrap_or(&'*'),
                life: rng.gen_range(0.6..1.0),
            });
        }

        self.is_active = true;
    }

    /// Step the animation by `dt` seconds
    pub fn update(&mut self, dt: f64) {
        if !self.is_active {
            return;
        }

        let (width, height) = (self.width, self.height);
        self.particles.retain_mut(|p| {
            let alive = p.update(dt);
            alive && p.x >= 0.0 && p.y >= 0.0 && p.x < width && p.y < height
        });

        if self.particles.is_empty() {
            self.is_active = false;
        }
    }

    pub fn clear(&mut self) {
        self.particles.clear();
        self.is_active = false;
    }
}
