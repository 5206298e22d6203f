// Grid rendering: plain text and SVG
// Failures are logged by callers and never change the solution.
// Colors come from a seeded generator; the same seed paints the same picture.

use crate::domain::grid::Grid;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64Mcg;
use std::fmt::Write as _;

const CELL_SIZE: usize = 48;
const EMPTY_FILL: &str = "#ffffff";

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RenderError {
    #[error("Palette has {available} colors but the grid places {needed} items")]
    PaletteTooSmall { needed: usize, available: usize },

    #[error("Invalid color '{0}', expected #rrggbb")]
    InvalidColor(String),

    #[error("Formatting failed: {0}")]
    Format(#[from] std::fmt::Error),
}

/// One fill color per placed item instance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorPalette {
    colors: Vec<String>,
}

impl ColorPalette {
    /// `count` light colors drawn from a PCG stream seeded with `seed`.
    pub fn seeded(seed: u64, count: usize) -> Self {
        let mut rng = Pcg64Mcg::seed_from_u64(seed);
        let colors = (0..count)
            .map(|_| {
                let [r, g, b]: [u8; 3] = std::array::from_fn(|_| rng.gen_range(96..=255));
                format!("#{:02x}{:02x}{:02x}", r, g, b)
            })
            .collect();
        Self { colors }
    }

    pub fn from_colors(colors: Vec<String>) -> Result<Self, RenderError> {
        if let Some(bad) = colors.iter().find(|c| !is_hex_color(c)) {
            return Err(RenderError::InvalidColor(bad.clone()));
        }
        Ok(Self { colors })
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn color(&self, index: usize) -> Option<&str> {
        self.colors.get(index).map(String::as_str)
    }
}

fn is_hex_color(color: &str) -> bool {
    color.len() == 7
        && color.starts_with('#')
        && color[1..].chars().all(|c| c.is_ascii_hexdigit())
}

pub trait Renderer {
    fn render(&self, grid: &Grid, palette: &ColorPalette) -> Result<String, RenderError>;
}

/// Plain text, one line per row
#[derive(Debug, Clone, Copy, Default)]
pub struct TextRenderer;

impl Renderer for TextRenderer {
    fn render(&self, grid: &Grid, _palette: &ColorPalette) -> Result<String, RenderError> {
        let mut out = String::new();
        for row in grid.label_rows() {
            writeln!(out, "{}", row)?;
        }
        Ok(out)
    }
}

/// SVG image with one colored square per cell and the item label on top
#[derive(Debug, Clone)]
pub struct SvgRenderer {
    pub title: String,
}

impl Default for SvgRenderer {
    fn default() -> Self {
        Self {
            title: "2D Bin Packing".to_string(),
        }
    }
}

impl SvgRenderer {
    /// Instance index owning each cell; later placements win like the decoder.
    fn owners(grid: &Grid) -> Vec<Option<usize>> {
        let mut owners = vec![None; grid.width() * grid.height()];
        for (instance, placement) in grid.placed().iter().enumerate() {
            for (row, col) in placement.cells() {
                if row < grid.height() && col < grid.width() {
                    owners[row * grid.width() + col] = Some(instance);
                }
            }
        }
        owners
    }
}

impl Renderer for SvgRenderer {
    fn render(&self, grid: &Grid, palette: &ColorPalette) -> Result<String, RenderError> {
        let needed = grid.placed().len();
        if palette.len() < needed {
            return Err(RenderError::PaletteTooSmall {
                needed,
                available: palette.len(),
            });
        }

        let title_height = CELL_SIZE / 2;
        let width = grid.width() * CELL_SIZE;
        let height = grid.height() * CELL_SIZE + title_height;
        let owners = Self::owners(grid);

        let mut svg = String::new();
        writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = width,
            h = height
        )?;
        writeln!(
            svg,
            r#"  <text x="{}" y="{}" text-anchor="middle" font-family="sans-serif" font-size="14">{}</text>"#,
            width / 2,
            title_height * 3 / 4,
            escape(&self.title)
        )?;

        for row in 0..grid.height() {
            for col in 0..grid.width() {
                let x = col * CELL_SIZE;
                let y = title_height + row * CELL_SIZE;
                let fill = owners[row * grid.width() + col]
                    .and_then(|instance| palette.color(instance))
                    .unwrap_or(EMPTY_FILL);
                writeln!(
                    svg,
                    r#"  <rect x="{}" y="{}" width="{s}" height="{s}" fill="{}" stroke="black" stroke-width="1"/>"#,
                    x,
                    y,
                    fill,
                    s = CELL_SIZE
                )?;

                if let Some(item) = grid.get(row, col) {
                    writeln!(
                        svg,
                        r#"  <text x="{}" y="{}" text-anchor="middle" dominant-baseline="central" font-family="sans-serif" font-size="16" font-weight="bold">{}</text>"#,
                        x + CELL_SIZE / 2,
                        y + CELL_SIZE / 2,
                        item.label()
                    )?;
                }
            }
        }
        writeln!(svg, "</svg>")?;
        Ok(svg)
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
