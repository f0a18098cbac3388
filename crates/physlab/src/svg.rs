//! Vector back end: serializes a [`Scene`] to a standalone SVG document.
//!
//! Persistence has no meaning here; every document is a complete frame.

use crate::scene::{Scene, Shape, Viewport};

/// Renders `scene` as an SVG document of the given size.
///
/// ```rust
/// use physlab::{Rgb, Scene, Viewport, Vec2, svg};
///
/// let mut scene = Scene::new(Rgb::new(0, 0, 0));
/// scene.disc(Vec2::new(5.0, 5.0), 2.0, Rgb::new(255, 0, 0));
/// let doc = svg::render(&scene, Viewport::new(10, 10));
/// assert!(doc.contains(r##"<circle cx="5.00" cy="5.00" r="2.00" fill="#ff0000"/>"##));
/// ```
pub fn render(scene: &Scene, viewport: Viewport) -> String {
    let (w, h) = (viewport.width, viewport.height);
    let mut out = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#
    );
    out.push('\n');
    out.push_str(&format!(
        r#"<rect width="100%" height="100%" fill="{}"/>"#,
        scene.background.hex()
    ));
    out.push('\n');

    for shape in &scene.shapes {
        out.push_str(&element(shape));
        out.push('\n');
    }

    out.push_str("</svg>\n");
    out
}

/// One SVG element for `shape`, without a trailing newline.
fn element(shape: &Shape) -> String {
    match shape {
        Shape::Line { from, to, color } => format!(
            r#"<line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" stroke="{}"/>"#,
            from.x,
            from.y,
            to.x,
            to.y,
            color.hex()
        ),
        Shape::Polyline { points, color } => {
            let coords = points
                .iter()
                .map(|p| format!("{:.2},{:.2}", p.x, p.y))
                .collect::<Vec<_>>()
                .join(" ");
            format!(
                r#"<polyline points="{coords}" fill="none" stroke="{}"/>"#,
                color.hex()
            )
        }
        Shape::Circle {
            center,
            radius,
            color,
            filled,
        } => format!(
            r#"<circle cx="{:.2}" cy="{:.2}" r="{:.2}" {}/>"#,
            center.x,
            center.y,
            radius,
            paint(&color.hex(), *filled)
        ),
        Shape::Rect {
            min,
            max,
            color,
            filled,
        } => format!(
            r#"<rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" {}/>"#,
            min.x.min(max.x),
            min.y.min(max.y),
            (max.x - min.x).abs(),
            (max.y - min.y).abs(),
            paint(&color.hex(), *filled)
        ),
        Shape::Label { at, text, color } => format!(
            r#"<text x="{:.2}" y="{:.2}" fill="{}" font-family="monospace" font-size="10">{}</text>"#,
            at.x,
            at.y,
            color.hex(),
            escape(text)
        ),
    }
}

fn paint(hex: &str, filled: bool) -> String {
    if filled {
        format!(r#"fill="{hex}""#)
    } else {
        format!(r#"fill="none" stroke="{hex}""#)
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}
