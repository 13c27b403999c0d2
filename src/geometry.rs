use crate::columns::{Column, COLUMN_COUNT};
use crate::error::{ScResult, ScorecardError};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Smallest width/height a derived cell may have. Mis-taps that would produce
/// zero or negative extents are clamped to this.
pub const MIN_EXTENT: f64 = 1.0;

/// Smallest vertical span accepted for the uniform row strategy.
pub const MIN_UNIFORM_SPAN: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Units {
    #[default]
    Pixels,
    /// 0..100 of the viewport width (x) or height (y).
    Percent,
}

/// How player rows are derived from the calibration taps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum RowStrategy {
    /// Span between first-row top and last-row bottom split evenly, no gap.
    #[default]
    Uniform,
    /// Row height from the first row, gap from the step to the second row.
    UniformGap,
    /// One tap per row top; tolerates uneven spacing between players.
    Explicit,
}

/// Canvas size the rectangles are resolved against (the background image's
/// natural size).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 800.0,
        }
    }
}

/// Where the canvas is displayed on screen, in client coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayBounds {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Maps a client-space point into canvas pixels through the displayed
    /// bounds. Returns `None` when the canvas is not laid out.
    pub fn client_to_canvas(
        &self,
        client_x: f64,
        client_y: f64,
        bounds: DisplayBounds,
    ) -> Option<(f64, f64)> {
        if bounds.width <= 0.0 || bounds.height <= 0.0 {
            return None;
        }
        let x = (client_x - bounds.left) * (self.width / bounds.width);
        let y = (client_y - bounds.top) * (self.height / bounds.height);
        Some((x, y))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RowGeometry {
    Uniform { row_h: f64, row_gap: f64 },
    Explicit { tops: Vec<f64>, heights: Vec<f64> },
}

impl RowGeometry {
    /// (top, height) for each of the first `players` rows. Uniform rows are
    /// stacked by accumulation so neighbours meet exactly.
    fn rows(&self, start_y: f64, players: usize) -> Vec<(f64, f64)> {
        match self {
            RowGeometry::Uniform { row_h, row_gap } => {
                let mut top = start_y;
                (0..players)
                    .map(|_| {
                        let row = (top, *row_h);
                        top += row_h + row_gap;
                        row
                    })
                    .collect()
            }
            RowGeometry::Explicit { tops, heights } => tops
                .iter()
                .copied()
                .zip(heights.iter().copied())
                .take(players)
                .collect(),
        }
    }

    fn scaled(&self, sy: f64) -> RowGeometry {
        match self {
            RowGeometry::Uniform { row_h, row_gap } => RowGeometry::Uniform {
                row_h: row_h * sy,
                row_gap: row_gap * sy,
            },
            RowGeometry::Explicit { tops, heights } => RowGeometry::Explicit {
                tops: tops.iter().map(|t| t * sy).collect(),
                heights: heights.iter().map(|h| h * sy).collect(),
            },
        }
    }
}

/// Persisted result of a completed calibration wizard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Calibration {
    #[serde(default)]
    pub units: Units,
    pub start_x: f64,
    pub start_y: f64,
    pub col_w: Vec<f64>,
    pub col_g: Vec<f64>,
    pub rows: RowGeometry,
}

impl Calibration {
    /// Checks that a (possibly loaded) calibration can lay out a card with
    /// `players` rows.
    pub fn validate(&self, players: usize) -> ScResult<()> {
        if self.col_w.len() != COLUMN_COUNT || self.col_g.len() != COLUMN_COUNT {
            return Err(ScorecardError::Validation(format!(
                "calibration needs {} column widths and gaps, got {}/{}",
                COLUMN_COUNT,
                self.col_w.len(),
                self.col_g.len()
            )));
        }

        let row_values: Vec<f64> = match &self.rows {
            RowGeometry::Uniform { row_h, row_gap } => vec![*row_h, *row_gap],
            RowGeometry::Explicit { tops, heights } => {
                tops.iter().chain(heights.iter()).copied().collect()
            }
        };
        let all_finite = [self.start_x, self.start_y]
            .iter()
            .chain(self.col_w.iter())
            .chain(self.col_g.iter())
            .chain(row_values.iter())
            .all(|v| v.is_finite());
        if !all_finite {
            return Err(ScorecardError::Validation(
                "calibration contains non-finite coordinates".to_string(),
            ));
        }

        if self.col_w.iter().any(|w| *w < MIN_EXTENT) || self.col_g.iter().any(|g| *g < 0.0) {
            return Err(ScorecardError::Validation(
                "calibration has a column narrower than the minimum or a negative gap"
                    .to_string(),
            ));
        }

        match &self.rows {
            // A tall card split into many players can go below MIN_EXTENT.
            RowGeometry::Uniform { row_h, row_gap } => {
                if *row_h <= 0.0 || *row_gap < 0.0 {
                    return Err(ScorecardError::Validation(format!(
                        "uniform rows need a positive height and no negative gap, got {}/{}",
                        row_h, row_gap
                    )));
                }
            }
            RowGeometry::Explicit { tops, heights } => {
                if tops.len() < players || heights.len() < players {
                    return Err(ScorecardError::Validation(format!(
                        "explicit rows cover {} players, card has {}",
                        tops.len().min(heights.len()),
                        players
                    )));
                }
                if heights.iter().any(|h| *h < MIN_EXTENT) {
                    return Err(ScorecardError::Validation(
                        "explicit row shorter than the minimum height".to_string(),
                    ));
                }
            }
        }
        Ok(())
    }

    /// Converts to canvas pixels for the given viewport.
    pub fn resolve(&self, viewport: Viewport) -> Calibration {
        let (sx, sy) = match self.units {
            Units::Pixels => return self.clone(),
            Units::Percent => (viewport.width / 100.0, viewport.height / 100.0),
        };
        Calibration {
            units: Units::Pixels,
            start_x: self.start_x * sx,
            start_y: self.start_y * sy,
            col_w: self.col_w.iter().map(|w| w * sx).collect(),
            col_g: self.col_g.iter().map(|g| g * sx).collect(),
            rows: self.rows.scaled(sy),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CellRect {
    pub player: usize,
    pub column_index: usize,
    pub column: Column,
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl CellRect {
    /// Edges are inclusive.
    pub fn contains(&self, px: f64, py: f64) -> bool {
        px >= self.x && px <= self.x + self.w && py >= self.y && py <= self.y + self.h
    }

    pub fn center(&self) -> (f64, f64) {
        (self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    pub fn inset(&self, by: f64) -> CellRect {
        CellRect {
            x: self.x + by,
            y: self.y + by,
            w: (self.w - 2.0 * by).max(0.0),
            h: (self.h - 2.0 * by).max(0.0),
            ..*self
        }
    }

    /// Interiors intersect; shared edges do not count.
    pub fn overlaps(&self, other: &CellRect) -> bool {
        self.x < other.x + other.w
            && other.x < self.x + self.w
            && self.y < other.y + other.h
            && other.y < self.y + self.h
    }
}

/// Widths of the columns between `left` and `right`. Boundary taps are sorted
/// and treated as right edges, so the result does not depend on tap order.
pub fn column_widths(left: f64, right: f64, boundaries: &[f64]) -> Vec<f64> {
    let mut sorted = boundaries.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let edges: Vec<f64> = std::iter::once(left)
        .chain(sorted)
        .chain(std::iter::once(right))
        .collect();

    edges
        .windows(2)
        .map(|pair| (pair[1] - pair[0]).max(MIN_EXTENT))
        .collect()
}

/// Rows of equal height filling `top..bottom`, no gap.
pub fn uniform_rows(top: f64, bottom: f64, players: usize) -> RowGeometry {
    let span = (bottom - top).max(MIN_UNIFORM_SPAN);
    RowGeometry::Uniform {
        row_h: span / players.max(1) as f64,
        row_gap: 0.0,
    }
}

/// Row height from the first row's bottom edge, gap from where the second
/// row starts.
pub fn uniform_gap_rows(top: f64, first_bottom: f64, second_top: f64) -> RowGeometry {
    let row_h = (first_bottom - top).max(MIN_EXTENT);
    let row_gap = (second_top - top - row_h).max(0.0);
    RowGeometry::Uniform { row_h, row_gap }
}

/// Explicit rows: `tops` are sorted, every row gets the last row's height but
/// never reaches into the next row, and a row starts no earlier than the end
/// of the row above it.
pub fn explicit_rows(tops: &[f64], last_bottom: f64) -> RowGeometry {
    let mut sorted = tops.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let Some(&last_top) = sorted.last() else {
        return RowGeometry::Explicit {
            tops: Vec::new(),
            heights: Vec::new(),
        };
    };
    let row_h = (last_bottom - last_top).max(MIN_EXTENT);

    let mut out_tops = Vec::with_capacity(sorted.len());
    let mut heights = Vec::with_capacity(sorted.len());
    let mut floor = f64::NEG_INFINITY;

    for (i, &tap) in sorted.iter().enumerate() {
        let top = tap.max(floor);
        let h = match sorted.get(i + 1) {
            Some(&next) => row_h.min(next - top).max(MIN_EXTENT),
            None => row_h,
        };
        out_tops.push(top);
        heights.push(h);
        floor = top + h;
    }

    RowGeometry::Explicit {
        tops: out_tops,
        heights,
    }
}

/// Lays out one rectangle per (player, column), player-major.
pub fn build_cells(cal: &Calibration, players: usize, viewport: Viewport) -> Vec<CellRect> {
    let cal = cal.resolve(viewport);
    let columns = Column::all();

    let mut x_pos = Vec::with_capacity(COLUMN_COUNT);
    let mut x = cal.start_x;
    for (w, g) in cal.col_w.iter().zip(cal.col_g.iter()) {
        x_pos.push(x);
        x += w + g;
    }

    let mut cells = Vec::with_capacity(players * COLUMN_COUNT);
    for (row, (top, row_h)) in cal.rows.rows(cal.start_y, players).into_iter().enumerate() {
        for (idx, (&x, &w)) in x_pos.iter().zip(cal.col_w.iter()).enumerate() {
            cells.push(CellRect {
                player: row + 1,
                column_index: idx,
                column: columns[idx],
                x,
                y: top,
                w,
                h: row_h,
            });
        }
    }
    cells
}

/// Hit test: first rectangle containing the point.
pub fn find_cell_at(cells: &[CellRect], x: f64, y: f64) -> Option<&CellRect> {
    cells.iter().find(|c| c.contains(x, y))
}

pub fn find_cell(cells: &[CellRect], player: usize, column_index: usize) -> Option<&CellRect> {
    cells
        .iter()
        .find(|c| c.player == player && c.column_index == column_index)
}
