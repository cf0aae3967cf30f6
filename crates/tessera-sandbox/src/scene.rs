use std::f32::consts::TAU;
use std::path::PathBuf;

use anyhow::{Context, Result};

use tessera_engine::coords::{Vec2, Viewport};
use tessera_engine::paint::Color;
use tessera_engine::render::batch::FrameStats;
use tessera_engine::render::resources::{Texture, TextureConfig, TextureHandle};
use tessera_engine::render::{RenderCtx, RenderTarget, Renderer2D, Renderer2DConfig};
use tessera_engine::shapes::{Circle, Rectangle, Shape, Sprite};
use tessera_engine::time::FrameTime;

const MARGIN: f32 = 24.0;
const SPRITE_SIZE: f32 = 48.0;
const SPRITE_GAP: f32 = 8.0;

/// Renderer plus the textures it draws, created on the first frame.
pub struct Scene {
    renderer: Renderer2D,
    textures: Vec<TextureHandle>,
    viewport: Viewport,
}

impl Scene {
    pub fn new(
        rctx: &RenderCtx<'_>,
        config: Renderer2DConfig,
        image_paths: &[PathBuf],
    ) -> Result<Self> {
        let renderer = Renderer2D::new(rctx, config).context("failed to create 2D renderer")?;

        let format = wgpu::TextureFormat::Rgba8UnormSrgb;
        let mut textures = vec![
            Texture::from_rgba8(
                rctx.device,
                rctx.queue,
                &checkerboard(32, 4, [235, 235, 235, 255], [40, 40, 48, 255]),
                32,
                32,
                format,
            ),
            Texture::from_rgba8(rctx.device, rctx.queue, &stripes(32, 8), 32, 32, format),
        ];
        textures.extend(image_paths.iter().map(|path| {
            Texture::from_path(rctx.device, rctx.queue, path, TextureConfig::default())
        }));
        log::info!("sandbox scene: {} textures", textures.len());

        Ok(Self {
            renderer,
            textures,
            viewport: rctx.viewport,
        })
    }

    pub fn draw(
        &mut self,
        rctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        time: FrameTime,
    ) -> FrameStats {
        if rctx.viewport != self.viewport {
            self.renderer.update_projection(rctx.queue, rctx.viewport);
            self.viewport = rctx.viewport;
        }

        let vp = rctx.viewport;
        let t = time.elapsed;
        let mut frame = self.renderer.begin(rctx, target);

        let grid_size = Vec2::new(vp.width * 0.5 - 2.0 * MARGIN, vp.height * 0.55 - 2.0 * MARGIN);
        for (i, (pos, size)) in grid_cells(Vec2::new(MARGIN, MARGIN), grid_size, 8, 6).enumerate() {
            let rect = Rectangle::new(pos, size, palette(i as f32 / 48.0));
            frame.draw_rect(&if i % 3 == 0 { rect.outlined() } else { rect });
        }

        let center = Vec2::new(vp.width * 0.75, vp.height * 0.3);
        for i in 0..12 {
            let angle = t * 0.5 + i as f32 * TAU / 12.0;
            let circle = Circle::new(
                center.polar_offset(vp.height * 0.18, angle),
                18.0,
                palette(i as f32 / 12.0),
            );
            frame.draw_circle(&if i % 2 == 0 { circle } else { circle.outlined() });
        }

        let count = ((vp.width - 2.0 * MARGIN) / (SPRITE_SIZE + SPRITE_GAP)).max(0.0) as usize;
        for i in 0..count {
            let bounce = (t * 2.0 + i as f32 * 0.4).sin().abs() * 24.0;
            let pos = Vec2::new(
                MARGIN + i as f32 * (SPRITE_SIZE + SPRITE_GAP),
                vp.height - MARGIN - SPRITE_SIZE - bounce,
            );
            let texture = self.textures[i % self.textures.len()].clone();
            let sprite = Sprite::new(texture, pos, Vec2::new(SPRITE_SIZE, SPRITE_SIZE));
            frame.submit(&Shape::Sprite(sprite));
        }

        frame.draw_sprite(&Sprite::from_texture(
            self.textures[0].clone(),
            Vec2::new(vp.width * 0.5 + MARGIN, vp.height * 0.6),
        ));

        frame.end()
    }
}

/// Cells of a `cols` x `rows` grid filling `size`, row by row, each inset by
/// a quarter of the smaller cell side.
fn grid_cells(
    origin: Vec2,
    size: Vec2,
    cols: u32,
    rows: u32,
) -> impl Iterator<Item = (Vec2, Vec2)> {
    let cell = Vec2::new(size.x / cols as f32, size.y / rows as f32);
    let inset = cell.x.min(cell.y) * 0.25;
    (0..rows).flat_map(move |r| {
        (0..cols).map(move |c| {
            let pos = Vec2::new(
                origin.x + c as f32 * cell.x + inset * 0.5,
                origin.y + r as f32 * cell.y + inset * 0.5,
            );
            (pos, Vec2::new((cell.x - inset).max(0.0), (cell.y - inset).max(0.0)))
        })
    })
}

/// Cosine palette, `h` in `[0, 1)`.
fn palette(h: f32) -> Color {
    let channel = |phase: f32| 0.5 + 0.5 * (TAU * (h + phase)).cos();
    Color::rgb(channel(0.0), channel(0.33), channel(0.67))
}

fn checkerboard(size: u32, cell: u32, a: [u8; 4], b: [u8; 4]) -> Vec<u8> {
    let cell = cell.max(1);
    (0..size)
        .flat_map(|y| (0..size).map(move |x| if (x / cell + y / cell) % 2 == 0 { a } else { b }))
        .flatten()
        .collect()
}

/// Diagonal stripes fading to transparent at the top.
fn stripes(size: u32, period: u32) -> Vec<u8> {
    let period = period.max(1);
    (0..size)
        .flat_map(|y| {
            (0..size).map(move |x| {
                let alpha = (255 * (y + 1) / size) as u8;
                if (x + y) / (period / 2).max(1) % 2 == 0 {
                    [255, 170, 40, alpha]
                } else {
                    [40, 120, 255, alpha]
                }
            })
        })
        .flatten()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checkerboard_alternates_cells() {
        let a = [1, 1, 1, 1];
        let b = [2, 2, 2, 2];
        let px = checkerboard(4, 2, a, b);
        assert_eq!(px.len(), 4 * 4 * 4);
        assert_eq!(&px[0..4], &a);
        assert_eq!(&px[8..12], &b);
        assert_eq!(&px[(2 * 4) * 4..(2 * 4) * 4 + 4], &b);
    }

    #[test]
    fn stripes_are_opaque_on_the_last_row() {
        let px = stripes(8, 4);
        assert_eq!(px.len(), 8 * 8 * 4);
        assert_eq!(px[(7 * 8) * 4 + 3], 255);
        assert!(px[3] < 255);
    }

    #[test]
    fn grid_cells_stay_inside_the_area() {
        let origin = Vec2::new(10.0, 20.0);
        let size = Vec2::new(400.0, 300.0);
        let cells: Vec<_> = grid_cells(origin, size, 8, 6).collect();

        assert_eq!(cells.len(), 48);
        for (pos, cell) in cells {
            assert!(pos.x >= origin.x && pos.y >= origin.y);
            assert!(pos.x + cell.x <= origin.x + size.x + 1e-3);
            assert!(pos.y + cell.y <= origin.y + size.y + 1e-3);
        }
    }

    #[test]
    fn palette_is_opaque() {
        for i in 0..10 {
            assert_eq!(palette(i as f32 / 10.0).a, 1.0);
        }
    }
}
