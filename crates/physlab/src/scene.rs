//! Declarative 2D scenes produced by the renderers.
//!
//! A renderer never touches pixels directly: it returns a [`Scene`] made of
//! [`Shape`]s in pixel coordinates (origin top-left, y down). Back ends
//! turn scenes into pixels ([`Canvas`](crate::Canvas)) or markup
//! ([`svg::render`](crate::svg::render)).

use serde::{Deserialize, Serialize};

use crate::vector::Vec2;

/// An opaque 24-bit colour.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Rgb {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb {
    /// Creates a colour from its channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Alpha-blends `over` onto `self` with coverage `alpha` in `[0, 1]`.
    pub fn blend(self, over: Rgb, alpha: f64) -> Rgb {
        let alpha = alpha.clamp(0.0, 1.0);
        let mix = |under: u8, top: u8| {
            (f64::from(under) + (f64::from(top) - f64::from(under)) * alpha).round() as u8
        };
        Rgb::new(mix(self.r, over.r), mix(self.g, over.g), mix(self.b, over.b))
    }

    /// Formats as `#rrggbb`.
    pub fn hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Size of the drawing surface in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Viewport {
    /// Creates a viewport.
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width as a float.
    pub fn w(self) -> f64 {
        f64::from(self.width)
    }

    /// Height as a float.
    pub fn h(self) -> f64 {
        f64::from(self.height)
    }
}

/// Visual overlays the user can switch on and off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Toggles {
    /// Draw motion trails / history.
    pub trail: bool,
    /// Draw velocity and force arrows.
    pub vectors: bool,
    /// Draw reference lines (ground, equilibrium, envelopes, grid).
    pub guides: bool,
}

impl Default for Toggles {
    fn default() -> Self {
        Self {
            trail: true,
            vectors: false,
            guides: true,
        }
    }
}

/// One drawable primitive, in pixel coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// A straight segment.
    Line {
        /// Start point.
        from: Vec2,
        /// End point.
        to: Vec2,
        /// Stroke colour.
        color: Rgb,
    },
    /// An open chain of segments.
    Polyline {
        /// Vertices in order.
        points: Vec<Vec2>,
        /// Stroke colour.
        color: Rgb,
    },
    /// A circle, filled or outlined.
    Circle {
        /// Centre.
        center: Vec2,
        /// Radius in pixels.
        radius: f64,
        /// Fill or stroke colour.
        color: Rgb,
        /// Filled disc when true, ring otherwise.
        filled: bool,
    },
    /// An axis-aligned rectangle.
    Rect {
        /// Top-left corner.
        min: Vec2,
        /// Bottom-right corner.
        max: Vec2,
        /// Fill or stroke colour.
        color: Rgb,
        /// Filled when true, outline otherwise.
        filled: bool,
    },
    /// A text annotation.
    Label {
        /// Baseline start.
        at: Vec2,
        /// Text content.
        text: String,
        /// Text colour.
        color: Rgb,
    },
}

/// A complete frame description.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    /// Colour behind everything.
    pub background: Rgb,
    /// When set, raster back ends fade the previous frame toward the
    /// background by this alpha instead of clearing it.
    pub persistence: Option<f64>,
    /// Primitives in painter's order.
    pub shapes: Vec<Shape>,
}

impl Scene {
    /// Creates an empty scene that fully clears each frame.
    pub const fn new(background: Rgb) -> Self {
        Self {
            background,
            persistence: None,
            shapes: Vec::new(),
        }
    }

    /// Keeps a fading copy of previous frames (raster back ends only).
    pub fn with_persistence(mut self, alpha: f64) -> Self {
        self.persistence = Some(alpha.clamp(0.0, 1.0));
        self
    }

    /// Adds a line.
    pub fn line(&mut self, from: Vec2, to: Vec2, color: Rgb) {
        self.shapes.push(Shape::Line { from, to, color });
    }

    /// Adds a polyline; fewer than two points draws nothing.
    pub fn polyline(&mut self, points: Vec<Vec2>, color: Rgb) {
        if points.len() >= 2 {
            self.shapes.push(Shape::Polyline { points, color });
        }
    }

    /// Adds a filled disc.
    pub fn disc(&mut self, center: Vec2, radius: f64, color: Rgb) {
        self.shapes.push(Shape::Circle {
            center,
            radius,
            color,
            filled: true,
        });
    }

    /// Adds a circle outline.
    pub fn ring(&mut self, center: Vec2, radius: f64, color: Rgb) {
        self.shapes.push(Shape::Circle {
            center,
            radius,
            color,
            filled: false,
        });
    }

    /// Adds a rectangle.
    pub fn rect(&mut self, min: Vec2, max: Vec2, color: Rgb, filled: bool) {
        self.shapes.push(Shape::Rect {
            min,
            max,
            color,
            filled,
        });
    }

    /// Adds a text label.
    pub fn label(&mut self, at: Vec2, text: impl Into<String>, color: Rgb) {
        self.shapes.push(Shape::Label {
            at,
            text: text.into(),
            color,
        });
    }

    /// Adds an arrow from `from` along `vector` with a small head.
    pub fn arrow(&mut self, from: Vec2, vector: Vec2, color: Rgb) {
        let to = from + vector;
        self.line(from, to, color);
        if let Some(dir) = vector.normalized() {
            let head = (vector.length() * 0.3).min(4.0);
            let back = -dir * head;
            let side = Vec2::new(-dir.y, dir.x) * (head * 0.5);
            self.line(to, to + back + side, color);
            self.line(to, to + back - side, color);
        }
    }
}

/// Maps world coordinates (y up) to pixel coordinates (y down) with a
/// uniform scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    scale: f64,
    world_origin: Vec2,
    pixel_origin: Vec2,
}

impl Projection {
    /// Fits the world rectangle `min..max` into `viewport`, leaving `margin`
    /// pixels on each side and centring the unused axis.
    pub fn fit(min: Vec2, max: Vec2, viewport: Viewport, margin: f64) -> Self {
        let world = max - min;
        let avail_w = (viewport.w() - 2.0 * margin).max(1.0);
        let avail_h = (viewport.h() - 2.0 * margin).max(1.0);
        let scale = (avail_w / world.x.max(f64::EPSILON)).min(avail_h / world.y.max(f64::EPSILON));
        let used_w = world.x * scale;
        let used_h = world.y * scale;
        let pixel_origin = Vec2::new(
            margin + (avail_w - used_w) / 2.0,
            margin + (avail_h - used_h) / 2.0 + used_h,
        );
        Self {
            scale,
            world_origin: min,
            pixel_origin,
        }
    }

    /// Pixels per world unit.
    pub const fn scale(&self) -> f64 {
        self.scale
    }

    /// Converts a world point to pixel coordinates.
    pub fn point(&self, world: Vec2) -> Vec2 {
        let rel = world - self.world_origin;
        Vec2::new(
            self.pixel_origin.x + rel.x * self.scale,
            self.pixel_origin.y - rel.y * self.scale,
        )
    }

    /// Converts a world displacement to a pixel displacement.
    pub fn vector(&self, world: Vec2) -> Vec2 {
        Vec2::new(world.x * self.scale, -world.y * self.scale)
    }

    /// Converts a world length to pixels.
    pub fn length(&self, world: f64) -> f64 {
        world * self.scale
    }
}
