use crate::geometry::{find_cell, CellRect};
use crate::keys::CellKey;
use crate::ledger::ScoreLedger;
use crate::selection::Selection;
use serde::Serialize;

pub const UNCALIBRATED_PROMPT: &str = "Tap Calibrate to map the boxes.";

/// Highlight is drawn this far inside the selected cell.
pub const HIGHLIGHT_INSET: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TextSize {
    Regular,
    /// OUT/IN/TOT/HCP/NET.
    Small,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Label {
    pub text: String,
    pub cx: f64,
    pub cy: f64,
    pub size: TextSize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RenderPlan {
    Uncalibrated { prompt: String },
    Card {
        labels: Vec<Label>,
        highlight: Option<CellRect>,
    },
}

/// What to draw over the background image. Without cells the card is not
/// calibrated and only the prompt is shown.
pub fn plan(cells: &[CellRect], ledger: &ScoreLedger, selection: Option<Selection>) -> RenderPlan {
    if cells.is_empty() {
        return RenderPlan::Uncalibrated {
            prompt: UNCALIBRATED_PROMPT.to_string(),
        };
    }

    let labels = cells
        .iter()
        .filter_map(|cell| {
            let text = ledger.get(CellKey::new(cell.player, cell.column));
            if text.is_empty() {
                return None;
            }
            let (cx, cy) = cell.center();
            let size = if cell.column.is_summary() {
                TextSize::Small
            } else {
                TextSize::Regular
            };
            Some(Label {
                text: text.to_string(),
                cx,
                cy,
                size,
            })
        })
        .collect();

    let highlight = selection
        .and_then(|sel| find_cell(cells, sel.player, sel.column_index))
        .map(|cell| cell.inset(HIGHLIGHT_INSET));

    RenderPlan::Card { labels, highlight }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::columns::{AggregateKind, COLUMN_COUNT};
    use crate::geometry::{build_cells, Calibration, RowGeometry, Units, Viewport};

    fn cells() -> Vec<CellRect> {
        let cal = Calibration {
            units: Units::Pixels,
            start_x: 0.0,
            start_y: 0.0,
            col_w: vec![40.0; COLUMN_COUNT],
            col_g: vec![0.0; COLUMN_COUNT],
            rows: RowGeometry::Uniform {
                row_h: 20.0,
                row_gap: 0.0,
            },
        };
        build_cells(&cal, 2, Viewport::default())
    }

    #[test]
    fn no_cells_means_prompt() {
        let plan = plan(&[], &ScoreLedger::new(2), None);
        assert_eq!(
            plan,
            RenderPlan::Uncalibrated {
                prompt: UNCALIBRATED_PROMPT.to_string()
            }
        );
    }

    #[test]
    fn labels_sit_in_cell_centres() {
        let mut ledger = ScoreLedger::new(2);
        ledger.set_value(CellKey::Hole { player: 1, hole: 2 }, "4");
        ledger.set_value(
            CellKey::Aggregate {
                player: 2,
                kind: AggregateKind::Hcp,
            },
            "9",
        );

        let RenderPlan::Card { labels, highlight } = plan(&cells(), &ledger, None) else {
            panic!("expected a card");
        };
        assert!(highlight.is_none());

        // hole 2, OUT, TOT for player 1 and HCP for player 2.
        assert_eq!(labels.len(), 4);
        assert_eq!(
            labels[0],
            Label {
                text: "4".to_string(),
                cx: 60.0,
                cy: 10.0,
                size: TextSize::Regular
            }
        );
        assert!(labels[1..].iter().all(|l| l.size == TextSize::Small));
        assert_eq!(labels[3].cy, 30.0);
    }

    #[test]
    fn selection_is_highlighted_inset() {
        let ledger = ScoreLedger::new(2);
        let RenderPlan::Card { highlight, .. } =
            plan(&cells(), &ledger, Some(Selection::new(2, 1)))
        else {
            panic!("expected a card");
        };
        let rect = highlight.unwrap();
        assert_eq!((rect.x, rect.y, rect.w, rect.h), (42.0, 22.0, 36.0, 16.0));
    }
}
