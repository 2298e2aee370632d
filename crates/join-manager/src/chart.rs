//! Chart renderers for the source distribution of approved members.
//!
//! [`PieChartRenderer`] draws a poster-sized card with a donut chart of the
//! category counts. Slices start at twelve o'clock and run
//! counter-clockwise, largest category first. Text is not drawn.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use image::imageops::{self, FilterType};
use image::{ImageFormat, Rgba, RgbaImage};
use join_core::{ChartSummary, RenderError, RenderedChart, ReportRenderer};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::JoinManagerConfig;

/// Output size in pixels (9:16 poster).
pub const CHART_WIDTH: u32 = 1200;
pub const CHART_HEIGHT: u32 = 1920;

/// Slice colors, cycled when there are more categories.
pub const PALETTE: [[u8; 3]; 8] = [
    [0xFF, 0xB7, 0xC5],
    [0x87, 0xCE, 0xEB],
    [0xFF, 0xD7, 0x00],
    [0xDD, 0xA0, 0xDD],
    [0x98, 0xFB, 0x98],
    [0xFF, 0xA0, 0x7A],
    [0xB0, 0xC4, 0xDE],
    [0xFF, 0x69, 0xB4],
];

const FALLBACK_BACKGROUND: [u8; 3] = [0xFF, 0xF0, 0xF5];
const CARD_BORDER: [u8; 3] = [0xFF, 0xB7, 0xC5];
const WHITE: [u8; 3] = [0xFF, 0xFF, 0xFF];

const CARD_MARGIN_X: f64 = 0.05;
const CARD_MARGIN_Y: f64 = 0.05;
const CARD_CORNER: f64 = 80.0;
const CARD_ALPHA: f32 = 0.85;

const PIE_RADIUS: f64 = 340.0;
const PIE_CENTER_Y: f64 = 1008.0;
const HOLE_RATIO: f64 = 0.60;
const EXPLODE_RATIO: f64 = 0.04;
const EDGE_WIDTH: f64 = 3.0;
const SLICE_ALPHA: f32 = 0.9;
const START_ANGLE: f64 = 90.0;

/// Renderer that never produces a chart.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoChart;

#[async_trait]
impl ReportRenderer for NoChart {
    async fn render(&self, _summary: &ChartSummary) -> Result<RenderedChart, RenderError> {
        Err(RenderError::Disabled)
    }

    fn name(&self) -> &str {
        "none"
    }
}

/// Draws donut charts as PNG files.
#[derive(Debug, Clone)]
pub struct PieChartRenderer {
    output_dir: PathBuf,
    background: Option<PathBuf>,
}

impl PieChartRenderer {
    /// Create a renderer writing into `output_dir`, with a plain background.
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            background: None,
        }
    }

    /// Use an image file as background. A missing or unreadable file falls
    /// back to the plain background at render time.
    pub fn with_background(mut self, path: impl Into<PathBuf>) -> Self {
        self.background = Some(path.into());
        self
    }

    /// Renderer using `bg_img` from `assets_dir`.
    pub fn from_config(
        config: &JoinManagerConfig,
        assets_dir: &Path,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self::new(output_dir).with_background(assets_dir.join(&config.bg_img))
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }
}

#[async_trait]
impl ReportRenderer for PieChartRenderer {
    async fn render(&self, summary: &ChartSummary) -> Result<RenderedChart, RenderError> {
        if summary.is_empty() {
            return Err(RenderError::Empty(summary.group_id.clone()));
        }
        let counts: Vec<usize> = summary
            .categories
            .iter()
            .map(|c| c.count)
            .filter(|&n| n > 0)
            .collect();
        if counts.is_empty() {
            return Err(RenderError::Empty(summary.group_id.clone()));
        }

        tokio::fs::create_dir_all(&self.output_dir).await?;
        let path = self.output_dir.join(format!(
            "join_chart_{}_{}.png",
            summary.group_id,
            Uuid::new_v4().simple()
        ));

        let background = self.background.clone();
        let target = path.clone();
        tokio::task::spawn_blocking(move || draw(&counts, background.as_deref(), &target))
            .await
            .map_err(|e| RenderError::Task(e.to_string()))??;

        debug!(
            "Rendered chart for group {} ({} members) to {}",
            summary.group_id,
            summary.total,
            path.display()
        );
        Ok(RenderedChart { path })
    }

    fn name(&self) -> &str {
        "pie"
    }
}

fn draw(counts: &[usize], background: Option<&Path>, path: &Path) -> Result<(), RenderError> {
    let mut canvas = load_background(background);
    draw_card(&mut canvas);
    draw_donut(&mut canvas, &slices(counts));

    canvas
        .save_with_format(path, ImageFormat::Png)
        .map_err(|e| RenderError::Image(e.to_string()))
}

fn load_background(path: Option<&Path>) -> RgbaImage {
    let loaded = path.filter(|p| p.exists()).and_then(|p| match image::open(p) {
        Ok(img) => Some(img.to_rgba8()),
        Err(e) => {
            warn!("Failed to load chart background {}: {}", p.display(), e);
            None
        }
    });

    match loaded {
        Some(img) => imageops::resize(&img, CHART_WIDTH, CHART_HEIGHT, FilterType::Triangle),
        None => RgbaImage::from_pixel(CHART_WIDTH, CHART_HEIGHT, opaque(FALLBACK_BACKGROUND)),
    }
}

/// Translucent white card with a rounded border.
fn draw_card(canvas: &mut RgbaImage) {
    let (w, h) = (f64::from(CHART_WIDTH), f64::from(CHART_HEIGHT));
    let (left, top) = (w * CARD_MARGIN_X, h * CARD_MARGIN_Y);
    let (right, bottom) = (w - left, h - top);

    for (x, y, pixel) in canvas.enumerate_pixels_mut() {
        let d = rounded_rect_distance(
            f64::from(x) + 0.5,
            f64::from(y) + 0.5,
            (left, top, right, bottom),
            CARD_CORNER,
        );
        if d <= 0.0 {
            blend(pixel, WHITE, CARD_ALPHA);
        }
        if d.abs() <= 1.0 {
            blend(pixel, CARD_BORDER, 1.0);
        }
    }
}

/// Signed distance to a rounded rectangle; negative inside.
fn rounded_rect_distance(x: f64, y: f64, rect: (f64, f64, f64, f64), radius: f64) -> f64 {
    let (left, top, right, bottom) = rect;
    let cx = (left + right) / 2.0;
    let cy = (top + bottom) / 2.0;
    let qx = (x - cx).abs() - ((right - left) / 2.0 - radius);
    let qy = (y - cy).abs() - ((bottom - top) / 2.0 - radius);

    let outside = qx.max(0.0).hypot(qy.max(0.0));
    let inside = qx.max(qy).min(0.0);
    outside + inside - radius
}

/// Slice of the pie in degrees, measured from [`START_ANGLE`].
#[derive(Debug, Clone, Copy, PartialEq)]
struct Slice {
    start: f64,
    end: f64,
    color: [u8; 3],
}

impl Slice {
    fn mid_radians(&self) -> f64 {
        (START_ANGLE + (self.start + self.end) / 2.0).to_radians()
    }

    fn contains(&self, angle: f64) -> bool {
        angle >= self.start && angle < self.end
    }
}

fn slices(counts: &[usize]) -> Vec<Slice> {
    let total: usize = counts.iter().sum();
    let mut start = 0.0;

    counts
        .iter()
        .enumerate()
        .map(|(i, &count)| {
            let sweep = 360.0 * count as f64 / total as f64;
            let slice = Slice {
                start,
                end: start + sweep,
                color: PALETTE[i % PALETTE.len()],
            };
            start += sweep;
            slice
        })
        .collect()
}

/// Counter-clockwise angle of (dx, dy) from [`START_ANGLE`], in [0, 360).
/// `dy` grows upwards.
fn relative_angle(dx: f64, dy: f64) -> f64 {
    (dy.atan2(dx).to_degrees() - START_ANGLE).rem_euclid(360.0)
}

fn draw_donut(canvas: &mut RgbaImage, slices: &[Slice]) {
    let cx = f64::from(CHART_WIDTH) / 2.0;
    let cy = PIE_CENTER_Y;
    let offset = PIE_RADIUS * EXPLODE_RATIO;
    let hole = PIE_RADIUS * HOLE_RATIO;
    let single = slices.len() == 1;

    let reach = PIE_RADIUS + offset + EDGE_WIDTH;
    let x0 = (cx - reach).floor().max(0.0) as u32;
    let x1 = ((cx + reach).ceil() as u32).min(CHART_WIDTH);
    let y0 = (cy - reach).floor().max(0.0) as u32;
    let y1 = ((cy + reach).ceil() as u32).min(CHART_HEIGHT);

    for y in y0..y1 {
        for x in x0..x1 {
            let px = f64::from(x) + 0.5 - cx;
            let py = cy - (f64::from(y) + 0.5);
            let pixel = canvas.get_pixel_mut(x, y);

            for slice in slices {
                // Exploded slices are shifted outwards along their middle.
                let (ox, oy) = if single {
                    (0.0, 0.0)
                } else {
                    let mid = slice.mid_radians();
                    (offset * mid.cos(), offset * mid.sin())
                };
                let (dx, dy) = (px - ox, py - oy);
                let r = dx.hypot(dy);
                if r > PIE_RADIUS + EDGE_WIDTH {
                    continue;
                }

                let angle = relative_angle(dx, dy);
                if !slice.contains(angle) {
                    continue;
                }

                let to_rim = PIE_RADIUS - r;
                let to_side = if single {
                    f64::INFINITY
                } else {
                    let side = (angle - slice.start).min(slice.end - angle);
                    r * side.to_radians().sin().abs()
                };

                if to_rim < 0.0 || to_side < EDGE_WIDTH / 2.0 {
                    blend(pixel, WHITE, 1.0);
                } else {
                    blend(pixel, slice.color, SLICE_ALPHA);
                }
                break;
            }

            let r = px.hypot(py);
            if r <= hole {
                blend(pixel, WHITE, 1.0);
            }
            if (r - hole).abs() <= 2.0 {
                blend(pixel, CARD_BORDER, 1.0);
            }
        }
    }
}

fn opaque(color: [u8; 3]) -> Rgba<u8> {
    Rgba([color[0], color[1], color[2], 0xFF])
}

fn blend(pixel: &mut Rgba<u8>, color: [u8; 3], alpha: f32) {
    for (channel, value) in pixel.0.iter_mut().zip(color) {
        let mixed = f32::from(*channel) * (1.0 - alpha) + f32::from(value) * alpha;
        *channel = mixed.round().clamp(0.0, 255.0) as u8;
    }
    pixel.0[3] = 0xFF;
}

#[cfg(test)]
mod tests {
    use super::*;
    use join_core::CategoryCount;

    fn summary(counts: &[(&str, usize)]) -> ChartSummary {
        ChartSummary {
            group_id: "1001".to_string(),
            categories: counts
                .iter()
                .map(|(c, n)| CategoryCount {
                    category: c.to_string(),
                    count: *n,
                })
                .collect(),
            total: counts.iter().map(|(_, n)| n).sum(),
            time_range: None,
        }
    }

    #[test]
    fn test_slices_cover_full_circle() {
        let slices = slices(&[2, 1, 1]);
        assert_eq!(slices.len(), 3);
        assert_eq!(slices[0].start, 0.0);
        assert_eq!(slices[0].end, 180.0);
        assert_eq!(slices[2].end, 360.0);
        assert_eq!(slices[1].color, PALETTE[1]);
    }

    #[test]
    fn test_palette_cycles() {
        let slices = slices(&[1; 10]);
        assert_eq!(slices[8].color, PALETTE[0]);
    }

    #[test]
    fn test_relative_angle_starts_at_top() {
        assert!(relative_angle(0.0, 1.0).abs() < 1e-9);
        assert!((relative_angle(-1.0, 0.0) - 90.0).abs() < 1e-9);
        assert!((relative_angle(1.0, 0.0) - 270.0).abs() < 1e-9);
    }

    #[test]
    fn test_rounded_rect_distance() {
        let rect = (0.0, 0.0, 100.0, 100.0);
        assert!(rounded_rect_distance(50.0, 50.0, rect, 10.0) < 0.0);
        assert!(rounded_rect_distance(150.0, 50.0, rect, 10.0) > 0.0);
        // Corner is cut off.
        assert!(rounded_rect_distance(0.5, 0.5, rect, 10.0) > 0.0);
    }

    #[test]
    fn test_first_slice_color_left_of_top() {
        let mut canvas = RgbaImage::from_pixel(CHART_WIDTH, CHART_HEIGHT, opaque(WHITE));
        draw_donut(&mut canvas, &slices(&[1, 1]));

        // Upper left quadrant, inside the ring, belongs to the first slice.
        let x = (f64::from(CHART_WIDTH) / 2.0 - 200.0) as u32;
        let y = (PIE_CENTER_Y - 200.0) as u32;
        let pixel = canvas.get_pixel(x, y);
        let mut expected = opaque(WHITE);
        blend(&mut expected, PALETTE[0], SLICE_ALPHA);
        assert_eq!(*pixel, expected);

        // Center is the hole.
        let center = canvas.get_pixel(CHART_WIDTH / 2, PIE_CENTER_Y as u32);
        assert_eq!(*center, opaque(WHITE));
    }

    #[tokio::test]
    async fn test_render_writes_png() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = PieChartRenderer::new(dir.path().join("charts"))
            .with_background(dir.path().join("missing.png"));

        let chart = renderer
            .render(&summary(&[("粉丝", 3), ("同学", 1)]))
            .await
            .unwrap();

        assert!(chart.path.starts_with(dir.path().join("charts")));
        let img = image::open(&chart.path).unwrap().to_rgba8();
        assert_eq!(img.dimensions(), (CHART_WIDTH, CHART_HEIGHT));
    }

    #[tokio::test]
    async fn test_render_paths_are_unique() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = PieChartRenderer::new(dir.path());
        let data = summary(&[("粉丝", 1)]);

        let a = renderer.render(&data).await.unwrap();
        let b = renderer.render(&data).await.unwrap();
        assert_ne!(a.path, b.path);
    }

    #[tokio::test]
    async fn test_render_uses_background() {
        let dir = tempfile::tempdir().unwrap();
        let bg = dir.path().join("bg.png");
        RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 0xFF]))
            .save_with_format(&bg, ImageFormat::Png)
            .unwrap();

        let renderer = PieChartRenderer::new(dir.path()).with_background(&bg);
        let chart = renderer.render(&summary(&[("粉丝", 1)])).await.unwrap();

        let img = image::open(&chart.path).unwrap().to_rgba8();
        // Outside the card the background shows through.
        assert_eq!(*img.get_pixel(0, 0), Rgba([0, 0, 0, 0xFF]));
    }

    #[tokio::test]
    async fn test_render_empty_summary() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = PieChartRenderer::new(dir.path());

        let err = renderer.render(&summary(&[])).await.unwrap_err();
        assert!(matches!(err, RenderError::Empty(ref g) if g == "1001"));
        assert!(std::fs::read_dir(dir.path()).unwrap().next().is_none());
    }

    #[tokio::test]
    async fn test_no_chart_declines() {
        let err = NoChart.render(&summary(&[("a", 1)])).await.unwrap_err();
        assert!(matches!(err, RenderError::Disabled));
    }
}
