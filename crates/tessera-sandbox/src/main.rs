//! Batching renderer sandbox.
//!
//! Draws a grid of rectangles, a ring of circles and a row of sprites, and
//! logs per-frame batching stats at debug level (`RUST_LOG=debug`).
//!
//! Usage: `tessera-sandbox [IMAGE]...`. Each image becomes a sprite texture;
//! unreadable files show up as magenta placeholders. `TESSERA_QUAD_SHADER`
//! and `TESSERA_CIRCLE_SHADER` point at WGSL files replacing the built-in
//! shaders.

mod scene;

use std::path::PathBuf;

use anyhow::Result;
use winit::dpi::LogicalSize;

use tessera_engine::core::{App, AppControl, FrameCtx};
use tessera_engine::device::GpuInit;
use tessera_engine::logging::{LoggingConfig, init_logging};
use tessera_engine::paint::Color;
use tessera_engine::render::batch::FrameStats;
use tessera_engine::render::{MAX_TEXTURE_SLOTS, RenderCtx, RenderTarget, Renderer2DConfig};
use tessera_engine::time::FrameTime;
use tessera_engine::window::{Runtime, RuntimeConfig};

use scene::Scene;

/// Frames between two stats log lines.
const STATS_INTERVAL: u64 = 120;

struct Sandbox {
    config: Renderer2DConfig,
    image_paths: Vec<PathBuf>,
    scene: Option<Scene>,
}

impl Sandbox {
    fn new(config: Renderer2DConfig, image_paths: Vec<PathBuf>) -> Self {
        Self {
            config,
            image_paths,
            scene: None,
        }
    }

    fn draw(
        &mut self,
        rctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        time: FrameTime,
    ) -> Result<FrameStats> {
        let scene = match &mut self.scene {
            Some(scene) => scene,
            slot @ None => slot.insert(Scene::new(rctx, self.config.clone(), &self.image_paths)?),
        };
        Ok(scene.draw(rctx, target, time))
    }
}

impl App for Sandbox {
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        let time = ctx.time;
        let mut failure = None;

        let control = ctx.render(Color::from_srgb_u8(18, 18, 24, 255), |rctx, target| {
            match self.draw(rctx, target, time) {
                Ok(stats) if time.frame_index % STATS_INTERVAL == 0 => {
                    log::debug!("frame {}: {stats:?}", time.frame_index);
                }
                Ok(_) => {}
                Err(e) => failure = Some(e),
            }
        });

        if let Some(e) = failure {
            ctx.runtime.fail(e);
            return AppControl::Exit;
        }
        control
    }
}

fn renderer_config() -> Renderer2DConfig {
    Renderer2DConfig {
        quad_shader_path: std::env::var_os("TESSERA_QUAD_SHADER").map(PathBuf::from),
        circle_shader_path: std::env::var_os("TESSERA_CIRCLE_SHADER").map(PathBuf::from),
        ..Renderer2DConfig::default()
    }
}

fn main() {
    init_logging(LoggingConfig::default());

    let image_paths: Vec<PathBuf> = std::env::args_os().skip(1).map(PathBuf::from).collect();
    let app = Sandbox::new(renderer_config(), image_paths);

    let config = RuntimeConfig {
        title: "tessera sandbox".to_string(),
        initial_size: LogicalSize::new(1024.0, 640.0),
    };

    if let Err(e) = Runtime::run(config, GpuInit::for_batching(MAX_TEXTURE_SLOTS as u32), app) {
        log::error!("fatal: {e:#}");
        std::process::exit(1);
    }
}
