//! Per-pixel render loop with edge anti-aliasing.
//!
//! A frame is rendered in two passes:
//! - every pixel gets one primary ray, recording its colour and the
//!   primitive it hit
//! - pixels whose hit differs from the left or upper neighbour are traced
//!   again with a 3x3 sub-pixel pattern and averaged
//!
//! Both passes work one scanline at a time, on the `rayon` pool or in order.
//! The second pass only reads the hit map of the first, so the output does
//! not depend on which worker rendered which row.

use std::time::{Duration, Instant};

use glint_core::View;
use rayon::prelude::*;

use crate::surface::Surface;
use crate::tracer::{TraceContext, TraceStats, Tracer};
use crate::{Camera, Color, PrimitiveId, RenderError, RenderResult, Scene};

/// Nearest-hit strategy used for every ray.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Traversal {
    /// Walk the scene grid cell by cell
    #[default]
    Grid,
    /// Test every primitive
    BruteForce,
}

/// Render configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderConfig {
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Deepest recursion level that is still shaded
    pub max_depth: u32,
    /// Tolerance for box containment and the nudge onto the world box
    pub epsilon: f32,
    pub traversal: Traversal,
    /// Supersample pixels on primitive edges
    pub anti_alias: bool,
    /// Render scanlines on the rayon pool
    pub parallel: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 1024,
            height: 800,
            max_depth: 4,
            epsilon: 0.1,
            traversal: Traversal::Grid,
            anti_alias: true,
            parallel: true,
        }
    }
}

impl RenderConfig {
    pub fn validate(&self) -> RenderResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(RenderError::InvalidConfig(format!(
                "resolution {}x{} is empty",
                self.width, self.height
            )));
        }
        if !(self.epsilon > 0.0) || !self.epsilon.is_finite() {
            return Err(RenderError::InvalidConfig(format!(
                "epsilon {} must be positive and finite",
                self.epsilon
            )));
        }
        Ok(())
    }
}

/// Summary of a finished render.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RenderStats {
    pub trace: TraceStats,
    pub elapsed: Duration,
}

/// Sub-pixel offsets, in units of half a pixel step.
const AA_PATTERN: [(f32, f32); 9] = [
    (-1.0, -1.0),
    (0.0, -1.0),
    (1.0, -1.0),
    (-1.0, 0.0),
    (0.0, 0.0),
    (1.0, 0.0),
    (-1.0, 1.0),
    (0.0, 1.0),
    (1.0, 1.0),
];

/// Convert a colour to a packed `0x00RRGGBB` pixel.
///
/// Channels are scaled by 256 and clamped to 0..=255.
#[inline]
pub fn color_to_pixel(color: Color) -> u32 {
    let channel = |c: f32| ((c * 256.0) as i32).clamp(0, 255) as u32;
    (channel(color.x) << 16) | (channel(color.y) << 8) | channel(color.z)
}

/// Render `scene` as seen from `view` into `surface`, then present it.
///
/// The scene's grid must already be built. The surface must match the
/// configured resolution.
pub fn render<S: Surface + ?Sized>(
    scene: &Scene,
    view: &View,
    config: &RenderConfig,
    surface: &mut S,
) -> RenderResult<RenderStats> {
    config.validate()?;
    let width = config.width as usize;
    let height = config.height as usize;
    if surface.width() != config.width
        || surface.height() != config.height
        || surface.pixels_mut().len() != width * height
    {
        return Err(RenderError::SurfaceSize {
            width: config.width,
            height: config.height,
            actual_width: surface.width(),
            actual_height: surface.height(),
        });
    }

    let tracer = Tracer::new(scene, config)?;
    let camera = Camera::new(view, config.width, config.height);
    if !tracer.bounds().contains(camera.eye(), 0.0) {
        log::warn!(
            "Eye {} is outside the world box; primary rays that miss the box stay black",
            camera.eye()
        );
    }
    let start = Instant::now();

    let pixels = surface.pixels_mut();
    let mut hits: Vec<Option<PrimitiveId>> = vec![None; width * height];

    let mut stats = if config.parallel {
        pixels
            .par_chunks_mut(width)
            .zip(hits.par_chunks_mut(width))
            .enumerate()
            .map_init(
                || tracer.context(),
                |ctx, (y, (row, hit_row))| {
                    trace_row(&tracer, &camera, y as u32, row, hit_row, ctx);
                    std::mem::take(&mut ctx.stats)
                },
            )
            .reduce(TraceStats::default, |mut a, b| {
                a += b;
                a
            })
    } else {
        let mut ctx = tracer.context();
        for (y, (row, hit_row)) in pixels
            .chunks_mut(width)
            .zip(hits.chunks_mut(width))
            .enumerate()
        {
            trace_row(&tracer, &camera, y as u32, row, hit_row, &mut ctx);
        }
        ctx.stats
    };

    if config.anti_alias {
        let hits = hits.as_slice();
        stats += if config.parallel {
            pixels
                .par_chunks_mut(width)
                .enumerate()
                .map_init(
                    || tracer.context(),
                    |ctx, (y, row)| {
                        smooth_row(&tracer, &camera, y, row, hits, width, ctx);
                        std::mem::take(&mut ctx.stats)
                    },
                )
                .reduce(TraceStats::default, |mut a, b| {
                    a += b;
                    a
                })
        } else {
            let mut ctx = tracer.context();
            for (y, row) in pixels.chunks_mut(width).enumerate() {
                smooth_row(&tracer, &camera, y, row, hits, width, &mut ctx);
            }
            ctx.stats
        };
    }

    let elapsed = start.elapsed();
    log::info!(
        "Rendered {}x{} in {:.2?}: {} primary, {} shadow, {} secondary rays, {} edge pixels supersampled",
        config.width,
        config.height,
        elapsed,
        stats.primary_rays,
        stats.shadow_rays,
        stats.secondary_rays,
        stats.supersampled_pixels
    );
    log::debug!(
        "{} trace calls, {} intersection tests",
        stats.trace_calls,
        stats.intersection_tests
    );

    surface.present()?;

    Ok(RenderStats {
        trace: stats,
        elapsed,
    })
}

/// Trace one primary ray per pixel of scanline `y`.
fn trace_row(
    tracer: &Tracer,
    camera: &Camera,
    y: u32,
    row: &mut [u32],
    hit_row: &mut [Option<PrimitiveId>],
    ctx: &mut TraceContext,
) {
    for (x, (pixel, hit)) in row.iter_mut().zip(hit_row.iter_mut()).enumerate() {
        let dir = camera.direction(x as u32, y, 0.0, 0.0);
        let (color, prim) = tracer.trace_primary(camera.eye(), dir, ctx);
        *pixel = color_to_pixel(color);
        *hit = prim;
    }
}

/// Supersample the pixels of scanline `y` that sit on an edge.
///
/// Neighbours outside the image count as hitting nothing.
fn smooth_row(
    tracer: &Tracer,
    camera: &Camera,
    y: usize,
    row: &mut [u32],
    hits: &[Option<PrimitiveId>],
    width: usize,
    ctx: &mut TraceContext,
) {
    let (dx, dy) = camera.pixel_delta();
    for (x, pixel) in row.iter_mut().enumerate() {
        let here = hits[y * width + x];
        let left = if x > 0 { hits[y * width + x - 1] } else { None };
        let above = if y > 0 { hits[(y - 1) * width + x] } else { None };
        if here == left && here == above {
            continue;
        }

        let mut color = Color::ZERO;
        for (tx, ty) in AA_PATTERN {
            let dir = camera.direction(x as u32, y as u32, tx * dx * 0.5, ty * dy * 0.5);
            color += tracer.trace_primary(camera.eye(), dir, ctx).0;
        }
        *pixel = color_to_pixel(color / AA_PATTERN.len() as f32);
        ctx.stats.supersampled_pixels += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FrameBuffer, GridConfig, Material, Primitive};
    use glint_math::Vec3;

    fn small(width: u32, height: u32) -> RenderConfig {
        RenderConfig {
            width,
            height,
            ..Default::default()
        }
    }

    #[test]
    fn test_color_to_pixel() {
        assert_eq!(color_to_pixel(Color::ZERO), 0);
        assert_eq!(color_to_pixel(Color::ONE), 0x00FF_FFFF);
        assert_eq!(color_to_pixel(Color::new(0.5, 0.25, 0.0)), 0x0080_4000);
        // Out of range channels clamp
        assert_eq!(color_to_pixel(Color::new(-1.0, 2.0, 0.999)), 0x0000_FFFF);
    }

    #[test]
    fn test_config_validation() {
        assert!(RenderConfig::default().validate().is_ok());
        assert!(small(0, 10).validate().is_err());
        let bad_epsilon = RenderConfig {
            epsilon: 0.0,
            ..Default::default()
        };
        assert!(bad_epsilon.validate().is_err());
    }

    #[test]
    fn test_surface_size_mismatch() {
        let mut scene = Scene::new();
        scene.build_grid(&GridConfig::default()).unwrap();
        let mut fb = FrameBuffer::new(4, 4);

        let result = render(&scene, &View::default(), &small(8, 8), &mut fb);
        assert!(matches!(result, Err(RenderError::SurfaceSize { .. })));
        assert_eq!(fb.presented(), 0);
    }

    #[test]
    fn test_render_requires_grid() {
        let scene = Scene::new();
        let mut fb = FrameBuffer::new(4, 4);
        let result = render(&scene, &View::default(), &small(4, 4), &mut fb);
        assert!(matches!(result, Err(RenderError::GridNotBuilt)));
    }

    #[test]
    fn test_empty_scene_is_black_and_presented() {
        let mut scene = Scene::new();
        scene.build_grid(&GridConfig::default()).unwrap();
        let mut fb = FrameBuffer::new(8, 6);

        let stats = render(&scene, &View::default(), &small(8, 6), &mut fb).unwrap();
        assert!(fb.pixels().iter().all(|&p| p == 0));
        assert_eq!(fb.presented(), 1);
        assert_eq!(stats.trace.primary_rays, 48);
        assert_eq!(stats.trace.supersampled_pixels, 0);
    }

    #[test]
    fn test_edges_are_supersampled() {
        let mut scene = Scene::new();
        scene.add(Primitive::sphere(
            Vec3::new(0.0, 0.0, 5.0),
            1.5,
            Material::new(Color::ONE),
        ));
        scene.add(Primitive::white_light(Vec3::new(0.0, 5.0, -5.0), 0.5));
        scene.build_grid(&GridConfig::default()).unwrap();

        let config = small(16, 12);
        let mut fb = FrameBuffer::new(16, 12);
        let stats = render(&scene, &View::default(), &config, &mut fb).unwrap();
        assert!(stats.trace.supersampled_pixels > 0);
        assert!(stats.trace.supersampled_pixels < 16 * 12);
        assert_eq!(
            stats.trace.primary_rays,
            16 * 12 + 9 * stats.trace.supersampled_pixels
        );

        let no_aa = RenderConfig {
            anti_alias: false,
            ..config
        };
        let mut plain = FrameBuffer::new(16, 12);
        let stats = render(&scene, &View::default(), &no_aa, &mut plain).unwrap();
        assert_eq!(stats.trace.supersampled_pixels, 0);
        assert_ne!(fb.pixels(), plain.pixels());
    }

    #[test]
    fn test_edge_pixel_is_nine_sample_average() {
        let mut scene = Scene::new();
        scene.add(Primitive::sphere(
            Vec3::new(0.0, 0.0, 5.0),
            1.5,
            Material::new(Color::ONE),
        ));
        scene.add(Primitive::white_light(Vec3::new(0.0, 5.0, -5.0), 0.5));
        scene.build_grid(&GridConfig::default()).unwrap();

        let (width, height) = (16u32, 12u32);
        let config = RenderConfig {
            parallel: false,
            ..small(width, height)
        };
        let view = View::default();
        let mut smooth = FrameBuffer::new(width, height);
        render(&scene, &view, &config, &mut smooth).unwrap();
        let no_aa = RenderConfig {
            anti_alias: false,
            ..config
        };
        let mut plain = FrameBuffer::new(width, height);
        render(&scene, &view, &no_aa, &mut plain).unwrap();

        let tracer = Tracer::new(&scene, &config).unwrap();
        let camera = Camera::new(&view, width, height);
        let mut ctx = tracer.context();
        let hit_at = |x: u32, y: u32, ctx: &mut TraceContext| {
            let dir = camera.direction(x, y, 0.0, 0.0);
            tracer.trace_primary(camera.eye(), dir, ctx).1
        };

        let mut edge = None;
        let mut interior = None;
        for y in 0..height {
            for x in 0..width {
                let here = hit_at(x, y, &mut ctx);
                let left = if x > 0 { hit_at(x - 1, y, &mut ctx) } else { None };
                let above = if y > 0 { hit_at(x, y - 1, &mut ctx) } else { None };
                if here != left || here != above {
                    if edge.is_none() {
                        edge = Some((x, y));
                    }
                } else if here.is_some() && interior.is_none() {
                    interior = Some((x, y));
                }
            }
        }
        let (ex, ey) = edge.unwrap();
        let (ix, iy) = interior.unwrap();

        let (dx, dy) = camera.pixel_delta();
        let mut sum = Color::ZERO;
        for (tx, ty) in AA_PATTERN {
            let dir = camera.direction(ex, ey, tx * dx * 0.5, ty * dy * 0.5);
            sum += tracer.trace_primary(camera.eye(), dir, &mut ctx).0;
        }
        assert_eq!(smooth.get(ex, ey), color_to_pixel(sum / 9.0));

        // Pixels off the edges keep their single-sample colour
        assert_eq!(smooth.get(ix, iy), plain.get(ix, iy));
    }
}
