use crate::columns::{AggregateKind, Column, HOLES};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifies one value slot on the card. The string form (`p1_h7`, `p3_out`)
/// is the persisted key and must stay stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CellKey {
    Hole { player: usize, hole: u8 },
    Aggregate { player: usize, kind: AggregateKind },
}

impl CellKey {
    pub fn new(player: usize, column: Column) -> Self {
        match column {
            Column::Hole(hole) => CellKey::Hole { player, hole },
            Column::Aggregate(kind) => CellKey::Aggregate { player, kind },
        }
    }

    pub fn player(&self) -> usize {
        match *self {
            CellKey::Hole { player, .. } | CellKey::Aggregate { player, .. } => player,
        }
    }

    pub fn column(&self) -> Column {
        match *self {
            CellKey::Hole { hole, .. } => Column::Hole(hole),
            CellKey::Aggregate { kind, .. } => Column::Aggregate(kind),
        }
    }

    pub fn is_derived(&self) -> bool {
        self.column().is_derived()
    }

    /// True when the key addresses a real cell on a card with `players` rows.
    pub fn in_range(&self, players: usize) -> bool {
        let player_ok = (1..=players).contains(&self.player());
        match *self {
            CellKey::Hole { hole, .. } => player_ok && (1..=HOLES).contains(&hole),
            CellKey::Aggregate { .. } => player_ok,
        }
    }

    /// Every key of a card, player-major in column order.
    pub fn all(players: usize) -> impl Iterator<Item = CellKey> {
        (1..=players).flat_map(|p| Column::all().into_iter().map(move |c| CellKey::new(p, c)))
    }
}

impl fmt::Display for CellKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellKey::Hole { player, hole } => write!(f, "p{}_h{}", player, hole),
            CellKey::Aggregate { player, kind } => write!(f, "p{}_{}", player, kind),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseKeyError(pub String);

impl fmt::Display for ParseKeyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid cell key '{}'", self.0)
    }
}

impl std::error::Error for ParseKeyError {}

impl FromStr for CellKey {
    type Err = ParseKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseKeyError(s.to_string());

        let rest = s.strip_prefix('p').ok_or_else(err)?;
        let (player, slot) = rest.split_once('_').ok_or_else(err)?;
        let player: usize = player.parse().map_err(|_| err())?;

        // "hcp" also starts with 'h'; a hole slot is 'h' plus digits.
        if let Some(hole) = slot
            .strip_prefix('h')
            .filter(|h| !h.is_empty() && h.chars().all(|c| c.is_ascii_digit()))
        {
            let hole: u8 = hole.parse().map_err(|_| err())?;
            return Ok(CellKey::Hole { player, hole });
        }

        let kind: AggregateKind = slot.parse().map_err(|_| err())?;
        Ok(CellKey::Aggregate { player, kind })
    }
}
