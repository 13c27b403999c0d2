use crate::columns::{AggregateKind, Column, BACK_NINE, FRONT_NINE};
use crate::keys::CellKey;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Most digits a cell may hold.
pub const MAX_DIGITS: usize = 2;
pub const MAX_VALUE: u32 = 99;

/// Flat key -> numeric string store for one card. OUT/IN/TOT are derived and
/// only ever written by `recompute`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreLedger {
    players: usize,
    values: BTreeMap<String, String>,
    /// Saved rows of players beyond this card, carried through unchanged so
    /// a later, larger card gets them back.
    beyond: BTreeMap<String, String>,
}

/// Keeps digit characters only, at most two of them.
pub fn sanitize(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_digit())
        .take(MAX_DIGITS)
        .collect()
}

fn is_cell_value(v: &str) -> bool {
    v.len() <= MAX_DIGITS && v.chars().all(|c| c.is_ascii_digit())
}

impl ScoreLedger {
    /// All-empty card for `players` rows.
    pub fn new(players: usize) -> Self {
        let values = CellKey::all(players)
            .map(|k| (k.to_string(), String::new()))
            .collect();
        Self {
            players,
            values,
            beyond: BTreeMap::new(),
        }
    }

    /// Rebuilds a ledger from a persisted flat map. Fails on the first key or
    /// value that cannot belong to any card; the caller starts fresh in that
    /// case. Missing cells are filled as empty. Rows of players past
    /// `players` are kept aside, not dropped.
    pub fn from_map(players: usize, map: BTreeMap<String, String>) -> Result<Self, String> {
        let mut ledger = Self::new(players);
        for (raw_key, value) in map {
            let key: CellKey = raw_key.parse().map_err(|e| format!("{}", e))?;
            if !key.in_range(key.player()) {
                return Err(format!("cell '{}' does not exist on any card", key));
            }
            if !is_cell_value(&value) {
                return Err(format!("cell '{}' holds non-numeric value '{}'", key, value));
            }
            if key.player() > players {
                ledger.beyond.insert(key.to_string(), value);
            } else {
                ledger.values.insert(key.to_string(), value);
            }
        }
        if !ledger.beyond.is_empty() {
            debug!(
                "{} saved cells belong to players beyond {}; kept aside",
                ledger.beyond.len(),
                players
            );
        }
        ledger.recompute_all();
        Ok(ledger)
    }

    /// Everything to write back to the store: this card plus any rows kept
    /// aside from a larger one.
    pub fn to_persisted(&self) -> BTreeMap<String, String> {
        let mut all = self.beyond.clone();
        all.extend(self.values.iter().map(|(k, v)| (k.clone(), v.clone())));
        all
    }

    pub fn players(&self) -> usize {
        self.players
    }

    pub fn as_map(&self) -> &BTreeMap<String, String> {
        &self.values
    }

    pub fn get(&self, key: CellKey) -> &str {
        self.values
            .get(&key.to_string())
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Parsed value; empty or unparsable reads as `None`.
    pub fn number(&self, key: CellKey) -> Option<u32> {
        self.get(key).parse().ok()
    }

    fn writable(&self, key: CellKey) -> bool {
        if !key.in_range(self.players) {
            warn!("ignoring write to out-of-range cell {}", key);
            return false;
        }
        if key.is_derived() {
            debug!("ignoring write to derived cell {}", key);
            return false;
        }
        true
    }

    fn write(&mut self, key: CellKey, value: String) {
        self.values.insert(key.to_string(), value);
        self.recompute(key.player());
    }

    /// Stores the digits of `raw` (max two). Returns false when the key is
    /// derived or out of range; the ledger is unchanged then.
    pub fn set_value(&mut self, key: CellKey, raw: &str) -> bool {
        if !self.writable(key) {
            return false;
        }
        self.write(key, sanitize(raw));
        true
    }

    pub fn increment(&mut self, key: CellKey) -> bool {
        if !self.writable(key) {
            return false;
        }
        let next = (self.number(key).unwrap_or(0) + 1).min(MAX_VALUE);
        self.write(key, next.to_string());
        true
    }

    pub fn decrement(&mut self, key: CellKey) -> bool {
        if !self.writable(key) {
            return false;
        }
        let next = self.number(key).unwrap_or(0).saturating_sub(1);
        self.write(key, next.to_string());
        true
    }

    pub fn clear(&mut self, key: CellKey) -> bool {
        if !self.writable(key) {
            return false;
        }
        self.write(key, String::new());
        true
    }

    /// Sum of the non-empty holes in `holes`, `None` when all are empty.
    fn half_sum(&self, player: usize, holes: std::ops::RangeInclusive<u8>) -> Option<u32> {
        holes
            .filter_map(|hole| self.number(CellKey::Hole { player, hole }))
            .fold(None, |acc, v| Some(acc.unwrap_or(0) + v))
    }

    /// Re-derives OUT, IN and TOT for one player. Idempotent.
    pub fn recompute(&mut self, player: usize) {
        let out = self.half_sum(player, FRONT_NINE);
        let inn = self.half_sum(player, BACK_NINE);
        let tot = match (out, inn) {
            (None, None) => None,
            (o, i) => Some(o.unwrap_or(0) + i.unwrap_or(0)),
        };

        for (kind, value) in [
            (AggregateKind::Out, out),
            (AggregateKind::In, inn),
            (AggregateKind::Tot, tot),
        ] {
            let key = CellKey::Aggregate { player, kind };
            let text = value.map(|v| v.to_string()).unwrap_or_default();
            self.values.insert(key.to_string(), text);
        }
    }

    pub fn recompute_all(&mut self) {
        for player in 1..=self.players {
            self.recompute(player);
        }
    }

    /// Values of one player row in card order.
    pub fn row(&self, player: usize) -> Vec<&str> {
        Column::all()
            .into_iter()
            .map(|c| self.get(CellKey::new(player, c)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn hole(player: usize, hole: u8) -> CellKey {
        CellKey::Hole { player, hole }
    }

    fn agg(player: usize, kind: AggregateKind) -> CellKey {
        CellKey::Aggregate { player, kind }
    }

    #[test]
    fn front_nine_only() {
        let mut ledger = ScoreLedger::new(6);
        for (h, v) in (1..=9).zip(["4", "5", "3", "4", "4", "5", "3", "4", "4"]) {
            assert!(ledger.set_value(hole(1, h), v));
        }
        assert_eq!(ledger.get(agg(1, AggregateKind::Out)), "36");
        assert_eq!(ledger.get(agg(1, AggregateKind::In)), "");
        assert_eq!(ledger.get(agg(1, AggregateKind::Tot)), "36");
    }

    #[test]
    fn empty_card_has_empty_totals() {
        let mut ledger = ScoreLedger::new(2);
        ledger.recompute_all();
        for kind in [AggregateKind::Out, AggregateKind::In, AggregateKind::Tot] {
            assert_eq!(ledger.get(agg(1, kind)), "");
        }
    }

    #[test]
    fn back_nine_feeds_in_and_total() {
        let mut ledger = ScoreLedger::new(1);
        ledger.set_value(hole(1, 10), "5");
        ledger.set_value(hole(1, 18), "3");
        assert_eq!(ledger.get(agg(1, AggregateKind::Out)), "");
        assert_eq!(ledger.get(agg(1, AggregateKind::In)), "8");
        assert_eq!(ledger.get(agg(1, AggregateKind::Tot)), "8");

        ledger.set_value(hole(1, 1), "4");
        assert_eq!(ledger.get(agg(1, AggregateKind::Tot)), "12");

        ledger.clear(hole(1, 10));
        ledger.clear(hole(1, 18));
        assert_eq!(ledger.get(agg(1, AggregateKind::In)), "");
        assert_eq!(ledger.get(agg(1, AggregateKind::Tot)), "4");
    }

    #[test]
    fn zero_is_a_value() {
        let mut ledger = ScoreLedger::new(1);
        ledger.set_value(hole(1, 3), "0");
        assert_eq!(ledger.get(agg(1, AggregateKind::Out)), "0");
        assert_eq!(ledger.get(agg(1, AggregateKind::Tot)), "0");
    }

    #[rstest]
    #[case("4", "4")]
    #[case("12", "12")]
    #[case("123", "12")]
    #[case("a7b", "7")]
    #[case(" 9 ", "9")]
    #[case("-3", "3")]
    #[case("xyz", "")]
    fn set_value_keeps_two_digits(#[case] raw: &str, #[case] stored: &str) {
        let mut ledger = ScoreLedger::new(1);
        assert!(ledger.set_value(hole(1, 5), raw));
        assert_eq!(ledger.get(hole(1, 5)), stored);
    }

    #[rstest]
    #[case(AggregateKind::Out)]
    #[case(AggregateKind::In)]
    #[case(AggregateKind::Tot)]
    fn derived_cells_reject_every_mutation(#[case] kind: AggregateKind) {
        let mut ledger = ScoreLedger::new(2);
        ledger.set_value(hole(1, 1), "4");
        let before = ledger.clone();

        let key = agg(1, kind);
        assert!(!ledger.set_value(key, "9"));
        assert!(!ledger.increment(key));
        assert!(!ledger.decrement(key));
        assert!(!ledger.clear(key));
        assert_eq!(ledger, before);
    }

    #[test]
    fn hcp_and_net_are_independent() {
        let mut ledger = ScoreLedger::new(1);
        ledger.set_value(hole(1, 1), "5");
        assert!(ledger.set_value(agg(1, AggregateKind::Hcp), "12"));
        assert!(ledger.set_value(agg(1, AggregateKind::Net), "70"));
        assert_eq!(ledger.get(agg(1, AggregateKind::Net)), "70");
        assert_eq!(ledger.get(agg(1, AggregateKind::Tot)), "5");
    }

    #[test]
    fn increment_and_decrement_clamp() {
        let mut ledger = ScoreLedger::new(1);
        let key = hole(1, 7);
        ledger.increment(key);
        assert_eq!(ledger.get(key), "1");

        ledger.set_value(key, "0");
        ledger.decrement(key);
        assert_eq!(ledger.get(key), "0");

        ledger.clear(key);
        ledger.decrement(key);
        assert_eq!(ledger.get(key), "0");

        ledger.set_value(key, "99");
        ledger.increment(key);
        assert_eq!(ledger.get(key), "99");
    }

    #[test]
    fn out_of_range_keys_are_ignored() {
        let mut ledger = ScoreLedger::new(2);
        let before = ledger.clone();
        assert!(!ledger.set_value(hole(3, 1), "4"));
        assert!(!ledger.increment(hole(1, 19)));
        assert_eq!(ledger, before);
    }

    #[rstest]
    #[case("p0_h1")]
    #[case("p1_h19")]
    #[case("p1_h0")]
    #[case("bogus")]
    fn from_map_rejects_foreign_keys(#[case] raw: &str) {
        let mut map = BTreeMap::new();
        map.insert("p1_h1".to_string(), "4".to_string());
        assert!(ScoreLedger::from_map(1, map.clone()).is_ok());

        map.insert(raw.to_string(), "4".to_string());
        assert!(ScoreLedger::from_map(1, map).is_err());
    }

    #[test]
    fn from_map_rejects_non_numeric_values() {
        let mut map = BTreeMap::new();
        map.insert("p1_h1".to_string(), "four".to_string());
        assert!(ScoreLedger::from_map(1, map).is_err());
    }

    #[test]
    fn rows_beyond_a_smaller_card_are_kept_aside() {
        let mut map = BTreeMap::new();
        map.insert("p1_h1".to_string(), "4".to_string());
        map.insert("p3_h2".to_string(), "5".to_string());

        let mut small = ScoreLedger::from_map(2, map).unwrap();
        assert_eq!(small.get(hole(1, 1)), "4");
        assert!(!small.as_map().contains_key("p3_h2"));

        small.set_value(hole(2, 1), "6");
        let persisted = small.to_persisted();
        assert_eq!(persisted.get("p3_h2").map(String::as_str), Some("5"));

        let big = ScoreLedger::from_map(3, persisted).unwrap();
        assert_eq!(big.get(hole(1, 1)), "4");
        assert_eq!(big.get(hole(2, 1)), "6");
        assert_eq!(big.get(hole(3, 2)), "5");
        assert_eq!(big.get(agg(3, AggregateKind::Out)), "5");
    }

    #[test]
    fn from_map_fills_missing_and_recomputes() {
        let mut map = BTreeMap::new();
        map.insert("p1_h2".to_string(), "6".to_string());
        map.insert("p1_out".to_string(), "50".to_string());
        let ledger = ScoreLedger::from_map(1, map).unwrap();
        assert_eq!(ledger.get(hole(1, 1)), "");
        assert_eq!(ledger.get(agg(1, AggregateKind::Out)), "6");
        assert_eq!(ledger.as_map().len(), 23);
    }

    #[test]
    fn row_follows_card_order() {
        let mut ledger = ScoreLedger::new(1);
        ledger.set_value(hole(1, 10), "3");
        let row = ledger.row(1);
        assert_eq!(row.len(), 23);
        assert_eq!(row[10], "3");
        assert_eq!(row[19], "3");
    }
}
