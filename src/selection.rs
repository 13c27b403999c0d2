use crate::columns::{Column, COLUMN_COUNT};
use crate::keys::CellKey;
use crate::ledger::ScoreLedger;

/// Focused (player, column) pair. Transient, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub player: usize,
    pub column_index: usize,
}

impl Selection {
    pub fn new(player: usize, column_index: usize) -> Self {
        Self {
            player,
            column_index,
        }
    }

    pub fn column(&self) -> Column {
        Column::at(self.column_index).unwrap_or(Column::Hole(1))
    }

    pub fn key(&self) -> CellKey {
        CellKey::new(self.player, self.column())
    }

    /// Moves one column left (`delta < 0`) or right (`delta > 0`); only the
    /// sign of `delta` counts, zero stays put. Running off either end of a
    /// row wraps the column and steps to the neighbouring player, with the
    /// player index clamped to `1..=players`.
    pub fn advance(&self, delta: i32, players: usize) -> Selection {
        let players = players.max(1);
        let idx = self.column_index as i64 + delta.signum() as i64;
        let last = COLUMN_COUNT as i64 - 1;

        if idx < 0 {
            Selection::new(self.player.saturating_sub(1).max(1), last as usize)
        } else if idx > last {
            Selection::new((self.player + 1).min(players), 0)
        } else {
            Selection::new(self.player, idx as usize)
        }
    }

    /// e.g. "P2 • OUT"
    pub fn label(&self) -> String {
        format!("P{} • {}", self.player, self.column())
    }

    /// "= 5" for a filled cell, empty otherwise.
    pub fn value_text(&self, ledger: &ScoreLedger) -> String {
        let v = ledger.get(self.key());
        if v.is_empty() {
            String::new()
        } else {
            format!("= {}", v)
        }
    }
}
