//! Guided calibration: the user taps a fixed sequence of anchor points on the
//! background image, then every internal column boundary. Nothing is derived
//! or persisted until `finish` is called with all points captured, and the
//! wizard can be reset to step 0 at any time.

use crate::columns::COLUMN_COUNT;
use crate::geometry::{
    column_widths, explicit_rows, uniform_gap_rows, uniform_rows, Calibration, RowStrategy, Units,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// What the next tap is expected to mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Anchor {
    /// Top-left of player 1 / hole 1. Supplies both x and y.
    TopLeft,
    /// Top-right of player 1 / NET. Only x is used.
    FarRight,
    /// Bottom-left of the last player row (uniform).
    LastRowBottom,
    /// Bottom of player 1's row (uniform-gap).
    FirstRowBottom,
    /// Top of player 2's row (uniform-gap).
    SecondRowTop,
    /// Top of the given 1-based player row (explicit, rows 2..=N).
    RowTop(usize),
    /// A vertical boundary between two columns; only x is used.
    Boundary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapOutcome {
    /// Point recorded; more are needed.
    Recorded,
    /// All required points are present, `finish` will succeed.
    Complete,
    /// Wizard was already complete, or the point was not a finite
    /// coordinate; the tap was dropped.
    Ignored,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CapturedPoints {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    /// Y values of the row anchors in tap order (strategy dependent).
    pub row_ys: Vec<f64>,
    pub boundaries: Vec<f64>,
}

#[derive(Debug, Clone)]
pub struct CalibrationWizard {
    strategy: RowStrategy,
    units: Units,
    players: usize,
    steps: Vec<Anchor>,
    step: usize,
    points: CapturedPoints,
}

/// Anchor sequence for a strategy, before the boundary taps.
pub fn anchor_steps(strategy: RowStrategy, players: usize) -> Vec<Anchor> {
    let mut steps = vec![Anchor::TopLeft, Anchor::FarRight];
    match strategy {
        RowStrategy::Uniform => steps.push(Anchor::LastRowBottom),
        RowStrategy::UniformGap => {
            steps.push(Anchor::FirstRowBottom);
            steps.push(Anchor::SecondRowTop);
        }
        RowStrategy::Explicit => {
            steps.extend((2..=players).map(Anchor::RowTop));
            steps.push(Anchor::LastRowBottom);
        }
    }
    steps
}

impl CalibrationWizard {
    pub fn new(strategy: RowStrategy, units: Units, players: usize) -> Self {
        let players = players.max(1);
        let mut steps = anchor_steps(strategy, players);
        steps.extend(std::iter::repeat(Anchor::Boundary).take(COLUMN_COUNT - 1));
        Self {
            strategy,
            units,
            players,
            steps,
            step: 0,
            points: CapturedPoints::default(),
        }
    }

    pub fn strategy(&self) -> RowStrategy {
        self.strategy
    }

    pub fn points(&self) -> &CapturedPoints {
        &self.points
    }

    /// Index of the next tap.
    pub fn step(&self) -> usize {
        self.step
    }

    pub fn total_steps(&self) -> usize {
        self.steps.len()
    }

    pub fn expected(&self) -> Option<Anchor> {
        self.steps.get(self.step).copied()
    }

    pub fn can_finish(&self) -> bool {
        self.step >= self.steps.len()
    }

    /// Discards every captured point and starts over.
    pub fn reset(&mut self) {
        debug!("calibration wizard reset at step {}", self.step);
        self.step = 0;
        self.points = CapturedPoints::default();
    }

    pub fn tap(&mut self, x: f64, y: f64) -> TapOutcome {
        let Some(anchor) = self.expected() else {
            return TapOutcome::Ignored;
        };
        if !(x.is_finite() && y.is_finite()) {
            warn!("calibration tap ({}, {}) is not a point on the card", x, y);
            return TapOutcome::Ignored;
        }

        match anchor {
            Anchor::TopLeft => {
                self.points.x0 = x;
                self.points.y0 = y;
            }
            Anchor::FarRight => self.points.x1 = x,
            Anchor::LastRowBottom
            | Anchor::FirstRowBottom
            | Anchor::SecondRowTop
            | Anchor::RowTop(_) => self.points.row_ys.push(y),
            Anchor::Boundary => self.points.boundaries.push(x),
        }
        self.step += 1;
        debug!("calibration tap {:?} at ({:.1}, {:.1})", anchor, x, y);

        if self.can_finish() {
            TapOutcome::Complete
        } else {
            TapOutcome::Recorded
        }
    }

    /// Instruction for the current step.
    pub fn hint(&self) -> String {
        let boundaries_needed = COLUMN_COUNT - 1;
        match self.expected() {
            None => "All boundaries captured. Tap Finish.".to_string(),
            Some(Anchor::TopLeft) => "Tap top-left of Player 1 / Hole 1 box.".to_string(),
            Some(Anchor::FarRight) => {
                "Tap top-right of Player 1 / NET box (far right).".to_string()
            }
            Some(Anchor::LastRowBottom) => format!(
                "Tap bottom-left of Player {} row (same left edge).",
                self.players
            ),
            Some(Anchor::FirstRowBottom) => "Tap bottom-left of Player 1 row.".to_string(),
            Some(Anchor::SecondRowTop) => "Tap top-left of Player 2 row.".to_string(),
            Some(Anchor::RowTop(p)) => format!("Tap top-left of Player {} row.", p),
            Some(Anchor::Boundary) => {
                let captured = self.points.boundaries.len();
                if captured == 0 {
                    "Tap vertical boundaries between columns (top row), starting after Hole 1, \
                     all the way to the boundary before NET."
                        .to_string()
                } else {
                    format!(
                        "Captured boundary {}/{}. Keep tapping next boundary.",
                        captured, boundaries_needed
                    )
                }
            }
        }
    }

    /// Derives a full calibration. Returns `None` (and leaves the wizard
    /// untouched) if any required point is missing.
    pub fn finish(&self) -> Option<Calibration> {
        if !self.can_finish() {
            warn!(
                "calibration finish ignored: {}/{} points captured",
                self.step,
                self.steps.len()
            );
            return None;
        }

        let p = &self.points;
        let col_w = column_widths(p.x0, p.x1, &p.boundaries);
        let col_g = vec![0.0; col_w.len()];

        let rows = match self.strategy {
            RowStrategy::Uniform => uniform_rows(p.y0, p.row_ys[0], self.players),
            RowStrategy::UniformGap => uniform_gap_rows(p.y0, p.row_ys[0], p.row_ys[1]),
            RowStrategy::Explicit => {
                let (tops, bottom) = p.row_ys.split_at(p.row_ys.len() - 1);
                let mut all_tops = Vec::with_capacity(self.players);
                all_tops.push(p.y0);
                all_tops.extend_from_slice(tops);
                explicit_rows(&all_tops, bottom[0])
            }
        };

        Some(Calibration {
            units: self.units,
            start_x: p.x0,
            start_y: p.y0,
            col_w,
            col_g,
            rows,
        })
    }
}
