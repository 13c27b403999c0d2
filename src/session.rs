use crate::calibrate::{CalibrationWizard, TapOutcome};
use crate::config::CardConfig;
use crate::error::ScResult;
use crate::geometry::{build_cells, find_cell, find_cell_at, Calibration, CellRect, Viewport};
use crate::keys::CellKey;
use crate::ledger::ScoreLedger;
use crate::render::{self, RenderPlan};
use crate::selection::Selection;
use crate::store::{self, KvStore};
use tracing::{debug, info};

/// Keypad operations on the selected cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOp {
    Increment,
    Decrement,
    Clear,
}

/// Everything one open card needs: configuration, the backing store, the
/// score ledger, the calibration and derived cells, and transient UI state.
pub struct Session {
    config: CardConfig,
    store: Box<dyn KvStore>,
    ledger: ScoreLedger,
    calibration: Option<Calibration>,
    viewport: Viewport,
    cells: Vec<CellRect>,
    selection: Option<Selection>,
    wizard: Option<CalibrationWizard>,
}

impl Session {
    /// Loads both records from `store`, falling back to defaults.
    pub fn open(config: CardConfig, store: Box<dyn KvStore>) -> Self {
        let ledger = store::load_ledger(store.as_ref(), config.players);
        let calibration = store::load_calibration(store.as_ref(), config.players);
        let viewport = config.viewport();

        info!(
            "card opened: {} players, calibrated: {}",
            config.players,
            calibration.is_some()
        );

        let mut session = Self {
            config,
            store,
            ledger,
            calibration,
            viewport,
            cells: Vec::new(),
            selection: None,
            wizard: None,
        };
        session.rebuild_cells();
        session
    }

    pub fn config(&self) -> &CardConfig {
        &self.config
    }

    pub fn ledger(&self) -> &ScoreLedger {
        &self.ledger
    }

    pub fn calibration(&self) -> Option<&Calibration> {
        self.calibration.as_ref()
    }

    pub fn cells(&self) -> &[CellRect] {
        &self.cells
    }

    pub fn selection(&self) -> Option<Selection> {
        self.selection
    }

    pub fn wizard(&self) -> Option<&CalibrationWizard> {
        self.wizard.as_ref()
    }

    pub fn is_calibrated(&self) -> bool {
        self.calibration.is_some()
    }

    fn rebuild_cells(&mut self) {
        self.cells = match &self.calibration {
            Some(cal) => build_cells(cal, self.config.players, self.viewport),
            None => Vec::new(),
        };
        debug!("{} cells laid out", self.cells.len());
    }

    /// New canvas size; cells follow.
    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.rebuild_cells();
    }

    // ---- Scores ----

    fn persist_scores(&mut self) -> ScResult<()> {
        store::save_ledger(self.store.as_mut(), &self.ledger)
    }

    /// Applies a ledger mutation and persists when it took effect.
    fn mutate<F>(&mut self, f: F) -> ScResult<bool>
    where
        F: FnOnce(&mut ScoreLedger) -> bool,
    {
        let changed = f(&mut self.ledger);
        if changed {
            self.persist_scores()?;
        }
        Ok(changed)
    }

    pub fn set_value(&mut self, key: CellKey, raw: &str) -> ScResult<bool> {
        self.mutate(|l| l.set_value(key, raw))
    }

    pub fn apply(&mut self, key: CellKey, op: KeyOp) -> ScResult<bool> {
        self.mutate(|l| match op {
            KeyOp::Increment => l.increment(key),
            KeyOp::Decrement => l.decrement(key),
            KeyOp::Clear => l.clear(key),
        })
    }

    /// Keypad digit/value for the selected cell.
    pub fn set_selected(&mut self, raw: &str) -> ScResult<bool> {
        match self.selection {
            Some(sel) => self.set_value(sel.key(), raw),
            None => Ok(false),
        }
    }

    pub fn apply_selected(&mut self, op: KeyOp) -> ScResult<bool> {
        match self.selection {
            Some(sel) => self.apply(sel.key(), op),
            None => Ok(false),
        }
    }

    pub fn reset_scores(&mut self) -> ScResult<()> {
        self.ledger = ScoreLedger::new(self.config.players);
        self.persist_scores()?;
        info!("scores reset");
        Ok(())
    }

    // ---- Selection ----

    /// Selects the cell under a canvas point. Ignored while uncalibrated or
    /// while the wizard is running; a miss keeps the current selection.
    pub fn tap(&mut self, x: f64, y: f64) -> Option<Selection> {
        if self.wizard.is_some() {
            return None;
        }
        let cell = find_cell_at(&self.cells, x, y)?;
        let sel = Selection::new(cell.player, cell.column_index);
        self.selection = Some(sel);
        Some(sel)
    }

    pub fn select(&mut self, selection: Option<Selection>) {
        self.selection = selection
            .filter(|s| find_cell(&self.cells, s.player, s.column_index).is_some());
    }

    /// Next/previous cell; stays put if the target has no cell.
    pub fn advance(&mut self, delta: i32) -> Option<Selection> {
        let current = self.selection?;
        let next = current.advance(delta, self.config.players);
        if find_cell(&self.cells, next.player, next.column_index).is_some() {
            self.selection = Some(next);
        }
        self.selection
    }

    // ---- Calibration ----

    /// Starts (or restarts) the wizard at step 0.
    pub fn begin_calibration(&mut self) -> &CalibrationWizard {
        self.wizard.insert(CalibrationWizard::new(
            self.config.row_strategy,
            self.config.units,
            self.config.players,
        ))
    }

    pub fn calibration_tap(&mut self, x: f64, y: f64) -> Option<TapOutcome> {
        self.wizard.as_mut().map(|w| w.tap(x, y))
    }

    pub fn reset_wizard(&mut self) {
        if let Some(w) = self.wizard.as_mut() {
            w.reset();
        }
    }

    /// Closes the wizard without touching the saved calibration.
    pub fn abandon_calibration(&mut self) {
        if self.wizard.take().is_some() {
            debug!("calibration wizard abandoned");
        }
    }

    /// Replaces the calibration with the wizard's result. Returns false (and
    /// keeps the wizard open) when points are still missing.
    pub fn finish_calibration(&mut self) -> ScResult<bool> {
        let Some(cal) = self.wizard.as_ref().and_then(|w| w.finish()) else {
            return Ok(false);
        };
        // Never persist something the next open would refuse to load.
        cal.validate(self.config.players)?;
        store::save_calibration(self.store.as_mut(), &cal)?;
        self.calibration = Some(cal);
        self.wizard = None;
        self.selection = None;
        self.rebuild_cells();
        Ok(true)
    }

    pub fn reset_calibration(&mut self) -> ScResult<()> {
        store::clear_calibration(self.store.as_mut())?;
        self.calibration = None;
        self.selection = None;
        self.rebuild_cells();
        Ok(())
    }

    // ---- Output ----

    pub fn render(&self) -> RenderPlan {
        render::plan(&self.cells, &self.ledger, self.selection)
    }
}
