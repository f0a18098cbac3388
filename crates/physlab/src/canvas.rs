//! Raster back end: paints [`Scene`]s into an RGB pixel buffer.

use crate::scene::{Rgb, Scene, Shape, Viewport};
use crate::vector::Vec2;

/// An owned RGB frame buffer, row-major, origin top-left.
///
/// Pixels cannot carry legible text, so labels are kept aside as
/// [`TextMark`]s for the host to overlay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canvas {
    width: u32,
    height: u32,
    pixels: Vec<Rgb>,
    marks: Vec<TextMark>,
}

/// A label from the last painted scene, anchored at a pixel inside the
/// canvas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextMark {
    /// Pixel column where the text starts.
    pub x: u32,
    /// Pixel row of the baseline.
    pub y: u32,
    /// Text content.
    pub text: String,
    /// Text colour.
    pub color: Rgb,
}

impl Canvas {
    /// Creates a black canvas of the given size.
    pub fn new(viewport: Viewport) -> Self {
        let len = viewport.width as usize * viewport.height as usize;
        Self {
            width: viewport.width,
            height: viewport.height,
            pixels: vec![Rgb::default(); len],
            marks: Vec::new(),
        }
    }

    /// Current size.
    pub const fn viewport(&self) -> Viewport {
        Viewport::new(self.width, self.height)
    }

    /// Changes the size, discarding the contents if it differs.
    pub fn resize(&mut self, viewport: Viewport) {
        if viewport != self.viewport() {
            *self = Self::new(viewport);
        }
    }

    /// The colour at `(x, y)`, if inside the canvas.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb> {
        if x < self.width && y < self.height {
            self.pixels.get(y as usize * self.width as usize + x as usize).copied()
        } else {
            None
        }
    }

    /// One row of pixels.
    pub fn row(&self, y: u32) -> &[Rgb] {
        let w = self.width as usize;
        let start = (y as usize * w).min(self.pixels.len());
        let end = (start + w).min(self.pixels.len());
        &self.pixels[start..end]
    }

    /// Labels of the last painted scene, in drawing order.
    pub fn marks(&self) -> &[TextMark] {
        &self.marks
    }

    /// Draws a full frame.
    ///
    /// Without persistence the buffer is cleared to the background first.
    /// With persistence the previous frame is blended toward the background
    /// by that alpha, so moving shapes leave fading streaks.
    pub fn paint(&mut self, scene: &Scene) {
        match scene.persistence {
            Some(alpha) => {
                for px in &mut self.pixels {
                    *px = px.blend(scene.background, alpha);
                }
            }
            None => self.pixels.fill(scene.background),
        }
        self.marks.clear();

        for shape in &scene.shapes {
            match shape {
                Shape::Line { from, to, color } => self.line(*from, *to, *color),
                Shape::Polyline { points, color } => {
                    for pair in points.windows(2) {
                        self.line(pair[0], pair[1], *color);
                    }
                }
                Shape::Circle {
                    center,
                    radius,
                    color,
                    filled,
                } => self.circle(*center, *radius, *color, *filled),
                Shape::Rect {
                    min,
                    max,
                    color,
                    filled,
                } => self.rect(*min, *max, *color, *filled),
                Shape::Label { at, text, color } => self.mark(*at, text, *color),
            }
        }
    }

    /// Keeps a label, pulling its anchor inside the canvas.
    fn mark(&mut self, at: Vec2, text: &str, color: Rgb) {
        if !at.is_finite() || self.width == 0 || self.height == 0 || text.is_empty() {
            return;
        }
        let x = at.x.round().clamp(0.0, f64::from(self.width - 1)) as u32;
        let y = at.y.round().clamp(0.0, f64::from(self.height - 1)) as u32;
        self.marks.push(TextMark {
            x,
            y,
            text: text.to_owned(),
            color,
        });
    }

    fn plot(&mut self, x: i64, y: i64, color: Rgb) {
        if x < 0 || y < 0 || x >= i64::from(self.width) || y >= i64::from(self.height) {
            return;
        }
        let offset = y as usize * self.width as usize + x as usize;
        if let Some(px) = self.pixels.get_mut(offset) {
            *px = color;
        }
    }

    /// Bresenham between the clipped endpoints.
    fn line(&mut self, from: Vec2, to: Vec2, color: Rgb) {
        let Some((from, to)) = self.clip(from, to) else {
            return;
        };
        let (mut x0, mut y0) = (from.x.round() as i64, from.y.round() as i64);
        let (x1, y1) = (to.x.round() as i64, to.y.round() as i64);
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            self.plot(x0, y0, color);
            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
        }
    }

    /// Liang–Barsky clip against the canvas grown by one pixel.
    fn clip(&self, from: Vec2, to: Vec2) -> Option<(Vec2, Vec2)> {
        if !from.is_finite() || !to.is_finite() {
            return None;
        }
        let (lo_x, lo_y) = (-1.0, -1.0);
        let (hi_x, hi_y) = (f64::from(self.width), f64::from(self.height));
        let d = to - from;
        let mut t0: f64 = 0.0;
        let mut t1: f64 = 1.0;
        for (p, q) in [
            (-d.x, from.x - lo_x),
            (d.x, hi_x - from.x),
            (-d.y, from.y - lo_y),
            (d.y, hi_y - from.y),
        ] {
            if p == 0.0 {
                if q < 0.0 {
                    return None;
                }
            } else {
                let r = q / p;
                if p < 0.0 {
                    t0 = t0.max(r);
                } else {
                    t1 = t1.min(r);
                }
            }
        }
        (t0 <= t1).then(|| (from + d * t0, from + d * t1))
    }

    fn circle(&mut self, center: Vec2, radius: f64, color: Rgb, filled: bool) {
        if !center.is_finite() || !radius.is_finite() {
            return;
        }
        let radius = radius.max(0.0);
        let (w, h) = (f64::from(self.width), f64::from(self.height));
        if center.x + radius < -1.0 || center.y + radius < -1.0 {
            return;
        }
        if center.x - radius > w || center.y - radius > h {
            return;
        }

        let x_min = (center.x - radius - 1.0).floor().max(0.0) as i64;
        let x_max = (center.x + radius + 1.0).ceil().min(w) as i64;
        let y_min = (center.y - radius - 1.0).floor().max(0.0) as i64;
        let y_max = (center.y + radius + 1.0).ceil().min(h) as i64;

        for y in y_min..y_max {
            for x in x_min..x_max {
                let dist = Vec2::new(x as f64 + 0.5, y as f64 + 0.5) - center;
                let dist = dist.length();
                let hit = if filled {
                    dist <= radius
                } else {
                    (dist - radius).abs() <= 0.5
                };
                if hit {
                    self.plot(x, y, color);
                }
            }
        }

        // Tiny discs still show up as one pixel.
        if filled {
            self.plot(center.x.floor() as i64, center.y.floor() as i64, color);
        }
    }

    fn rect(&mut self, min: Vec2, max: Vec2, color: Rgb, filled: bool) {
        if !filled {
            let tr = Vec2::new(max.x, min.y);
            let bl = Vec2::new(min.x, max.y);
            self.line(min, tr, color);
            self.line(tr, max, color);
            self.line(max, bl, color);
            self.line(bl, min, color);
            return;
        }
        if !min.is_finite() || !max.is_finite() {
            return;
        }
        let x0 = min.x.min(max.x).round().max(0.0) as i64;
        let x1 = min.x.max(max.x).round().min(f64::from(self.width)) as i64;
        let y0 = min.y.min(max.y).round().max(0.0) as i64;
        let y1 = min.y.max(max.y).round().min(f64::from(self.height)) as i64;
        for y in y0..y1 {
            for x in x0..x1 {
                self.plot(x, y, color);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BG: Rgb = Rgb::new(10, 10, 10);
    const INK: Rgb = Rgb::new(250, 250, 250);

    fn canvas() -> Canvas {
        Canvas::new(Viewport::new(20, 10))
    }

    #[test]
    fn test_paint_clears_to_background() {
        let mut c = canvas();
        c.paint(&Scene::new(BG));
        assert!((0..10).all(|y| c.row(y).iter().all(|px| *px == BG)));
    }

    #[test]
    fn test_line_hits_endpoints() {
        let mut c = canvas();
        let mut scene = Scene::new(BG);
        scene.line(Vec2::new(1.0, 1.0), Vec2::new(15.0, 8.0), INK);
        c.paint(&scene);
        assert_eq!(c.pixel(1, 1), Some(INK));
        assert_eq!(c.pixel(15, 8), Some(INK));
        assert_eq!(c.pixel(15, 1), Some(BG));
    }

    #[test]
    fn test_far_offscreen_line_is_clipped() {
        let mut c = canvas();
        let mut scene = Scene::new(BG);
        scene.line(Vec2::new(-1e12, 5.0), Vec2::new(1e12, 5.0), INK);
        scene.line(Vec2::new(f64::NAN, 0.0), Vec2::new(3.0, 3.0), INK);
        c.paint(&scene);
        assert!(c.row(5).iter().all(|px| *px == INK));
        assert_eq!(c.pixel(3, 3), Some(BG));
    }

    #[test]
    fn test_disc_and_ring() {
        let mut c = Canvas::new(Viewport::new(30, 30));
        let mut scene = Scene::new(BG);
        scene.disc(Vec2::new(8.0, 8.0), 4.0, INK);
        scene.ring(Vec2::new(22.0, 22.0), 5.0, INK);
        scene.disc(Vec2::new(2.2, 25.7), 0.3, INK);
        c.paint(&scene);
        assert_eq!(c.pixel(8, 8), Some(INK));
        assert_eq!(c.pixel(22, 22), Some(BG));
        assert_eq!(c.pixel(26, 22), Some(INK));
        assert_eq!(c.pixel(2, 25), Some(INK));
    }

    #[test]
    fn test_persistence_fades_previous_frame() {
        let mut c = canvas();
        let mut first = Scene::new(BG);
        first.rect(Vec2::ZERO, Vec2::new(20.0, 10.0), INK, true);
        c.paint(&first);
        assert_eq!(c.pixel(4, 4), Some(INK));

        c.paint(&Scene::new(BG).with_persistence(0.5));
        assert_eq!(c.pixel(4, 4), Some(INK.blend(BG, 0.5)));

        c.paint(&Scene::new(BG));
        assert_eq!(c.pixel(4, 4), Some(BG));
    }

    #[test]
    fn test_outline_rect_leaves_inside() {
        let mut c = canvas();
        let mut scene = Scene::new(BG);
        scene.rect(Vec2::new(2.0, 2.0), Vec2::new(12.0, 8.0), INK, false);
        c.paint(&scene);
        assert_eq!(c.pixel(2, 2), Some(INK));
        assert_eq!(c.pixel(12, 5), Some(INK));
        assert_eq!(c.pixel(6, 5), Some(BG));
    }

    #[test]
    fn test_labels_become_marks() {
        let mut c = canvas();
        let mut scene = Scene::new(BG);
        scene.label(Vec2::new(3.4, 4.6), "0 m", INK);
        scene.label(Vec2::new(-8.0, 40.0), "below", BG);
        scene.label(Vec2::new(f64::NAN, 1.0), "lost", INK);
        c.paint(&scene);

        assert_eq!(
            c.marks(),
            [
                TextMark {
                    x: 3,
                    y: 5,
                    text: "0 m".into(),
                    color: INK,
                },
                TextMark {
                    x: 0,
                    y: 9,
                    text: "below".into(),
                    color: BG,
                },
            ]
        );
        assert!((0..10).all(|y| c.row(y).iter().all(|px| *px == BG)));

        c.paint(&Scene::new(BG));
        assert!(c.marks().is_empty());
    }

    #[test]
    fn test_resize_and_bounds() {
        let mut c = canvas();
        assert_eq!(c.pixel(20, 0), None);
        c.resize(Viewport::new(4, 4));
        assert_eq!(c.viewport(), Viewport::new(4, 4));
        assert_eq!(c.row(3).len(), 4);
    }
}
