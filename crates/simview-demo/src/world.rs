use std::borrow::Cow;

use simview_engine::coords::SceneViewport;
use simview_engine::{Body, PixelPos, RgbColor, Scene, Surface, Vec2};

const RESTITUTION: f64 = 0.85;

/// Outline of a body relative to its center.
#[derive(Debug, Clone, Copy)]
pub enum Outline {
    Disc { radius: f64 },
    Crate { half: f64 },
    Ell { size: f64 },
}

impl Outline {
    fn extent(self) -> f64 {
        match self {
            Outline::Disc { radius } => radius,
            Outline::Crate { half } => half,
            Outline::Ell { size } => size,
        }
    }

    fn points(self) -> Vec<Vec2> {
        match self {
            Outline::Disc { radius } => (0..24)
                .map(|i| {
                    let a = f64::from(i) * std::f64::consts::TAU / 24.0;
                    Vec2::new(radius * a.cos(), radius * a.sin())
                })
                .collect(),
            Outline::Crate { half } => vec![
                Vec2::new(-half, -half),
                Vec2::new(half, -half),
                Vec2::new(half, half),
                Vec2::new(-half, half),
            ],
            // concave
            Outline::Ell { size } => {
                let t = size / 3.0;
                vec![
                    Vec2::new(-size, -size),
                    Vec2::new(size, -size),
                    Vec2::new(size, -size + t),
                    Vec2::new(-size + t, -size + t),
                    Vec2::new(-size + t, size),
                    Vec2::new(-size, size),
                ]
            }
        }
    }
}

pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
    pub outline: Outline,
    pub color: RgbColor,
    pub hidden: bool,
    pub texture: Option<Surface>,
    local: Vec<Vec2>,
}

impl Ball {
    pub fn new(pos: Vec2, vel: Vec2, outline: Outline, color: RgbColor) -> Self {
        Self {
            pos,
            vel,
            outline,
            color,
            hidden: false,
            texture: None,
            local: outline.points(),
        }
    }

    pub fn with_texture(mut self, texture: Surface) -> Self {
        self.texture = Some(texture);
        self
    }

    fn contains(&self, p: Vec2) -> bool {
        (p - self.pos).length() <= self.outline.extent()
    }
}

impl Body for Ball {
    fn shape(&self) -> Cow<'_, [Vec2]> {
        Cow::Owned(self.local.iter().map(|&v| v + self.pos).collect())
    }

    fn color(&self) -> RgbColor {
        self.color
    }

    fn is_hidden(&self) -> bool {
        self.hidden
    }

    fn texture(&self) -> Option<&Surface> {
        self.texture.as_ref()
    }
}

/// A box of bodies falling under gravity and bouncing off the walls.
pub struct World {
    pub bodies: Vec<Ball>,
    pub viewport: SceneViewport,
    /// Last known window center, used to map pointer pixels back into the world.
    pub window_center: Vec2,
    pub gravity: Vec2,
    pub paused: bool,
    pub time_scale: f64,
    pub grabbed: Option<usize>,
    pub quit: bool,
    spawned: u32,
}

impl World {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self {
            bodies: Vec::new(),
            viewport: SceneViewport::from_bounds(min, max),
            window_center: Vec2::zero(),
            gravity: Vec2::new(0.0, -9.81),
            paused: false,
            time_scale: 1.0,
            grabbed: None,
            quit: false,
            spawned: 0,
        }
    }

    pub fn to_world(&self, pixel: PixelPos) -> Vec2 {
        self.viewport.to_scene_position(pixel, self.window_center)
    }

    pub fn body_at(&self, p: Vec2) -> Option<usize> {
        self.bodies.iter().rposition(|b| !b.hidden && b.contains(p))
    }

    /// Adds a body near the top, cycling through outlines and colors.
    pub fn spawn(&mut self) {
        let n = self.spawned;
        self.spawned += 1;

        let outline = match n % 3 {
            0 => Outline::Disc { radius: 0.6 },
            1 => Outline::Crate { half: 0.5 },
            _ => Outline::Ell { size: 0.7 },
        };
        let hue = f64::from(n % 7) / 7.0;
        let color = RgbColor::new(hue as f32, (1.0 - hue) as f32, 0.6);

        let min = self.viewport.min();
        let max = self.viewport.max();
        let x = min.x + (max.x - min.x) * (0.1 + 0.8 * f64::from(n * 37 % 100) / 100.0);
        let vel = Vec2::new(if n % 2 == 0 { 3.0 } else { -3.0 }, 0.0);

        self.bodies.push(Ball::new(Vec2::new(x, max.y - 1.0), vel, outline, color));
        log::debug!("spawned body #{n}");
    }

    pub fn step(&mut self, dt: f64) {
        if self.paused {
            return;
        }
        let dt = dt * self.time_scale;
        let (min, max) = (self.viewport.min(), self.viewport.max());

        for (i, b) in self.bodies.iter_mut().enumerate() {
            if self.grabbed == Some(i) {
                continue;
            }
            b.vel = b.vel + self.gravity * dt;
            b.pos = b.pos + b.vel * dt;

            let r = b.outline.extent();
            if b.pos.x - r < min.x {
                b.pos.x = min.x + r;
                b.vel.x = -b.vel.x * RESTITUTION;
            } else if b.pos.x + r > max.x {
                b.pos.x = max.x - r;
                b.vel.x = -b.vel.x * RESTITUTION;
            }
            if b.pos.y - r < min.y {
                b.pos.y = min.y + r;
                b.vel.y = -b.vel.y * RESTITUTION;
            } else if b.pos.y + r > max.y {
                b.pos.y = max.y - r;
                b.vel.y = -b.vel.y * RESTITUTION;
            }
        }
    }
}

impl Scene for World {
    type Body = Ball;

    fn body_count(&self) -> usize {
        self.bodies.len()
    }

    fn body(&self, index: usize) -> &Ball {
        &self.bodies[index]
    }
}

/// Two-tone checkerboard used as a crate texture.
pub fn checkerboard(size: u32, cell: u32) -> Surface {
    let mut s = Surface::new(size, size);
    for y in 0..size {
        for x in 0..size {
            let dark = ((x / cell) + (y / cell)) % 2 == 0;
            let px = if dark { [120, 80, 40, 255] } else { [200, 160, 90, 255] };
            s.put_pixel(x, y, px);
        }
    }
    s
}
