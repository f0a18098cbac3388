//! Drawing the app into a terminal.
//!
//! The scene is shown with half-block cells: each character cell carries
//! two vertical pixels, the upper as foreground of `▀` and the lower as
//! background. The side panel, tab bar and key help are plain text.

use std::io::{self, Write};

use crossterm::{
    cursor::MoveTo,
    queue,
    style::{
        Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
    },
};
use physlab::{Rgb, THEME, Viewport};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::app::{App, LineStyle};
use crate::key::HELP;

/// Columns given to the side panel on a wide terminal.
pub const SIDEBAR_WIDTH: u16 = 36;

const UPPER_HALF: char = '▀';

/// Where each part of the screen goes, in character cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    /// Terminal width.
    pub cols: u16,
    /// Terminal height.
    pub rows: u16,
    /// Side panel width, starting at column 0.
    pub sidebar: u16,
    /// First row of the body (below the tab bar).
    pub top: u16,
    /// Rows between the tab bar and the footer.
    pub body_rows: u16,
}

impl Layout {
    /// Splits a terminal of `cols` by `rows`.
    pub fn new(cols: u16, rows: u16) -> Self {
        let sidebar = SIDEBAR_WIDTH.min(cols / 2);
        Self {
            cols,
            rows,
            sidebar,
            top: 1,
            body_rows: rows.saturating_sub(2),
        }
    }

    /// Column where the scene starts.
    pub const fn scene_left(&self) -> u16 {
        self.sidebar + 1
    }

    /// Scene width in cells.
    pub const fn scene_cols(&self) -> u16 {
        self.cols.saturating_sub(self.sidebar + 1)
    }

    /// Pixel size of the scene: one pixel per column, two per row.
    pub fn viewport(&self) -> Viewport {
        Viewport::new(
            u32::from(self.scene_cols()).max(1),
            (u32::from(self.body_rows) * 2).max(1),
        )
    }
}

/// Pads or cuts `text` to exactly `width` display columns.
pub fn fit(text: &str, width: usize) -> String {
    let mut out = String::with_capacity(width);
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > width {
            break;
        }
        out.push(c);
        used += w;
    }
    out.extend(std::iter::repeat_n(' ', width - used));
    out
}

const fn color(rgb: Rgb) -> Color {
    Color::Rgb {
        r: rgb.r,
        g: rgb.g,
        b: rgb.b,
    }
}

/// Queues a full frame. The caller flushes.
///
/// # Errors
///
/// Returns any error from writing to `out`.
pub fn draw<W: Write>(out: &mut W, app: &mut App, layout: Layout) -> io::Result<()> {
    if layout.cols == 0 || layout.rows == 0 {
        return Ok(());
    }
    let width = usize::from(layout.cols);

    queue!(
        out,
        MoveTo(0, 0),
        SetBackgroundColor(color(THEME.background)),
        SetForegroundColor(color(THEME.accent)),
        SetAttribute(Attribute::Bold),
        Print(fit(&app.tab_bar(), width)),
        SetAttribute(Attribute::Reset),
    )?;

    draw_sidebar(out, app, layout)?;
    draw_scene(out, app, layout)?;

    if layout.rows > 1 {
        let footer = if app.status().is_empty() {
            HELP.to_string()
        } else {
            format!("{}  │  {HELP}", app.status())
        };
        queue!(
            out,
            MoveTo(0, layout.rows - 1),
            SetBackgroundColor(color(THEME.background)),
            SetForegroundColor(color(THEME.muted)),
            Print(fit(&footer, width)),
        )?;
    }
    queue!(out, ResetColor)
}

fn draw_sidebar<W: Write>(out: &mut W, app: &App, layout: Layout) -> io::Result<()> {
    let width = usize::from(layout.sidebar);
    let lines = app.sidebar();
    for row in 0..layout.body_rows {
        let line = lines.get(usize::from(row));
        let (text, fg, bold) = match line {
            Some(line) => match line.style {
                LineStyle::Heading => (line.text.as_str(), THEME.text, true),
                LineStyle::Normal => (line.text.as_str(), THEME.text, false),
                LineStyle::Selected => (line.text.as_str(), THEME.accent, true),
                LineStyle::Muted => (line.text.as_str(), THEME.muted, false),
            },
            None => ("", THEME.text, false),
        };
        queue!(
            out,
            MoveTo(0, layout.top + row),
            SetBackgroundColor(color(THEME.background)),
            SetForegroundColor(color(fg)),
        )?;
        if bold {
            queue!(out, SetAttribute(Attribute::Bold))?;
        }
        queue!(
            out,
            Print(fit(&format!(" {text}"), width)),
            SetAttribute(Attribute::Reset),
            SetForegroundColor(color(THEME.guide)),
            SetBackgroundColor(color(THEME.background)),
            Print('│'),
        )?;
    }
    Ok(())
}

fn draw_scene<W: Write>(out: &mut W, app: &mut App, layout: Layout) -> io::Result<()> {
    if layout.scene_cols() == 0 {
        return Ok(());
    }
    let canvas = app.render(layout.viewport());
    for row in 0..layout.body_rows {
        let upper = canvas.row(u32::from(row) * 2);
        let lower = canvas.row(u32::from(row) * 2 + 1);
        queue!(out, MoveTo(layout.scene_left(), layout.top + row))?;

        let mut current: Option<(Rgb, Rgb)> = None;
        let mut run = String::new();
        for (top, bottom) in upper.iter().zip(lower) {
            let pair = (*top, *bottom);
            if current != Some(pair) {
                if let Some((fg, bg)) = current {
                    queue!(
                        out,
                        SetForegroundColor(color(fg)),
                        SetBackgroundColor(color(bg)),
                        Print(&run),
                    )?;
                    run.clear();
                }
                current = Some(pair);
            }
            run.push(UPPER_HALF);
        }
        if let Some((fg, bg)) = current {
            queue!(
                out,
                SetForegroundColor(color(fg)),
                SetBackgroundColor(color(bg)),
                Print(&run),
            )?;
        }
    }

    for mark in canvas.marks() {
        let row = mark.y / 2;
        if row >= u32::from(layout.body_rows) {
            continue;
        }
        let room = u32::from(layout.scene_cols()).saturating_sub(mark.x);
        let text = fit(&mark.text, mark.text.width().min(room as usize));
        if text.is_empty() {
            continue;
        }
        let bg = canvas.pixel(mark.x, row * 2 + 1).unwrap_or(THEME.background);
        // Both bounds were checked against u16 layout values.
        let (col, row) = (mark.x as u16, row as u16);
        queue!(
            out,
            MoveTo(layout.scene_left() + col, layout.top + row),
            SetForegroundColor(color(mark.color)),
            SetBackgroundColor(color(bg)),
            Print(text),
        )?;
    }
    Ok(())
}
