mod world;

use anyhow::Result;
use simview_engine::logging::{init_logging, LoggingConfig};
use simview_engine::text::{FontId, FontSystem};
use simview_engine::{Display, DisplayConfig, Key, KeyState, RgbColor, Surface, Vec2};

use world::{checkerboard, Ball, Outline, World};

const FONT_FALLBACKS: [&str; 5] = [
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/noto/NotoSans-Regular.ttf",
    "/usr/share/fonts/truetype/noto/NotoSans-Regular.ttf",
];

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let (min, max) = (Vec2::new(-10.0, -5.0), Vec2::new(10.0, 5.0));
    let config = DisplayConfig::default().with_title("simview bouncing bodies");
    let mut display: Display<World> = Display::with_config(config, min, max)?;

    let mut world = World::new(min, max);
    for _ in 0..4 {
        world.spawn();
    }
    world.bodies.push(
        Ball::new(Vec2::new(0.0, 2.0), Vec2::new(1.5, 0.0), Outline::Crate { half: 1.0 }, RgbColor::new(0.8, 0.6, 0.3))
            .with_texture(checkerboard(64, 8)),
    );

    register_handlers(&mut display);

    let mut fonts = FontSystem::new();
    let font = load_font(&mut fonts);
    let mut hud = Hud::default();

    log::info!("space: pause, n: spawn, arrows: gravity, h: hide textured, q: quit");

    loop {
        world.window_center = display.window_center();
        if display.poll_events(&mut world) || world.quit {
            break;
        }

        let dt = display.elapsed_since_last_tick();
        world.step(dt);

        if let Some(font) = font {
            let label = hud.surface(&mut fonts, font, &world);
            display.draw_text(label.clone(), 8.0, 8.0, f64::from(label.width()), f64::from(label.height()));
        }

        display.render_scene(&world)?;
    }

    log::info!("bye");
    Ok(())
}

fn register_handlers(display: &mut Display<World>) {
    display.on_key(|key, state, held, world| {
        if state != KeyState::Pressed {
            log::trace!("{key} released after {held:.2}s");
            return;
        }
        match key {
            Key::Space => world.paused = !world.paused,
            Key::N => world.spawn(),
            Key::LeftArrow => world.gravity.x -= 1.0,
            Key::RightArrow => world.gravity.x += 1.0,
            Key::UpArrow => world.gravity.y += 1.0,
            Key::DownArrow => world.gravity.y -= 1.0,
            Key::Char('h') => {
                for b in world.bodies.iter_mut().filter(|b| b.texture.is_some()) {
                    b.hidden = !b.hidden;
                }
            }
            Key::Char('q') => world.quit = true,
            _ => {}
        }
    });

    display.on_drag(|press, current, world| {
        if world.grabbed.is_none() {
            world.grabbed = world.body_at(world.to_world(press));
        }
        if let Some(i) = world.grabbed {
            let p = world.to_world(current);
            let b = &mut world.bodies[i];
            b.pos = p;
            b.vel = Vec2::zero();
        }
    });

    display.on_click(|press, release, world| {
        if press == release {
            if let Some(i) = world.body_at(world.to_world(release)) {
                let b = &mut world.bodies[i];
                b.vel = b.vel + Vec2::new(0.0, 8.0);
            }
        }
    });

    display.on_button_up(|_, _, world| {
        world.grabbed = None;
    });

    display.on_scroll(|_, dy, world| {
        world.time_scale = (world.time_scale * 1.1f64.powf(dy)).clamp(0.1, 10.0);
        log::debug!("time scale {:.2}", world.time_scale);
    });
}

fn load_font(fonts: &mut FontSystem) -> Option<FontId> {
    let from_env = std::env::var("SIMVIEW_FONT").ok();
    let candidates = from_env.iter().map(String::as_str).chain(FONT_FALLBACKS);

    for path in candidates {
        match fonts.load_font_file(path) {
            Ok(id) => return Some(id),
            Err(e) => log::debug!("{path}: {e}"),
        }
    }
    log::warn!("no usable font found; set SIMVIEW_FONT to a .ttf path to show the status line");
    None
}

/// Status line, re-rendered only when its text changes.
#[derive(Default)]
struct Hud {
    text: String,
    surface: Option<Surface>,
}

impl Hud {
    fn surface(&mut self, fonts: &mut FontSystem, font: FontId, world: &World) -> &Surface {
        let text = format!(
            "bodies {}  speed x{:.1}{}",
            world.bodies.len(),
            world.time_scale,
            if world.paused { "  paused" } else { "" }
        );
        if self.surface.is_none() || text != self.text {
            self.text = text;
            self.surface = None;
        }
        let text = &self.text;
        self.surface
            .get_or_insert_with(|| fonts.render_text(text, font, 18.0, RgbColor::new(0.1, 0.1, 0.1)))
    }
}
