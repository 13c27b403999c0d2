use serde::{Deserialize, Serialize};
use std::fmt;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

pub const HOLES: u8 = 18;
pub const FRONT_NINE: std::ops::RangeInclusive<u8> = 1..=9;
pub const BACK_NINE: std::ops::RangeInclusive<u8> = 10..=18;

/// Number of fields printed across one player row of the card.
pub const COLUMN_COUNT: usize = 23;

/// The non-hole fields of a player row. OUT, IN and TOT are derived from hole
/// values; HCP and NET are plain editable cells.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    EnumIter,
    EnumString,
    Display,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AggregateKind {
    Out,
    In,
    Tot,
    Hcp,
    Net,
}

impl AggregateKind {
    /// Derived columns are recomputed from holes and never written directly.
    pub fn is_derived(self) -> bool {
        matches!(self, Self::Out | Self::In | Self::Tot)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Out => "OUT",
            Self::In => "IN",
            Self::Tot => "TOT",
            Self::Hcp => "HCP",
            Self::Net => "NET",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Column {
    Hole(u8),
    Aggregate(AggregateKind),
}

impl Column {
    /// All columns in card order: 1-9, OUT, 10-18, IN, TOT, HCP, NET.
    pub fn all() -> [Column; COLUMN_COUNT] {
        let mut cols = [Column::Aggregate(AggregateKind::Out); COLUMN_COUNT];
        let mut idx = 0;
        for h in FRONT_NINE {
            cols[idx] = Column::Hole(h);
            idx += 1;
        }
        cols[idx] = Column::Aggregate(AggregateKind::Out);
        idx += 1;
        for h in BACK_NINE {
            cols[idx] = Column::Hole(h);
            idx += 1;
        }
        // OUT sits between the nines; the rest trail the back nine.
        for kind in AggregateKind::iter().filter(|k| *k != AggregateKind::Out) {
            cols[idx] = Column::Aggregate(kind);
            idx += 1;
        }
        cols
    }

    pub fn at(index: usize) -> Option<Column> {
        Self::all().get(index).copied()
    }

    pub fn index(self) -> usize {
        match self {
            Column::Hole(h) if h <= 9 => h.saturating_sub(1) as usize,
            Column::Hole(h) => h as usize,
            Column::Aggregate(AggregateKind::Out) => 9,
            Column::Aggregate(AggregateKind::In) => 19,
            Column::Aggregate(AggregateKind::Tot) => 20,
            Column::Aggregate(AggregateKind::Hcp) => 21,
            Column::Aggregate(AggregateKind::Net) => 22,
        }
    }

    pub fn is_derived(self) -> bool {
        match self {
            Column::Hole(_) => false,
            Column::Aggregate(kind) => kind.is_derived(),
        }
    }

    /// Summary and meta columns are drawn with a smaller font.
    pub fn is_summary(self) -> bool {
        matches!(self, Column::Aggregate(_))
    }

    /// Parses a card label ("7", "OUT", "net", ...).
    pub fn from_label(label: &str) -> Option<Column> {
        let label = label.trim();
        if let Ok(h) = label.parse::<u8>() {
            return (1..=HOLES).contains(&h).then_some(Column::Hole(h));
        }
        label
            .to_lowercase()
            .parse::<AggregateKind>()
            .ok()
            .map(Column::Aggregate)
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Column::Hole(h) => write!(f, "{}", h),
            Column::Aggregate(kind) => f.write_str(kind.label()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn card_order_is_fixed() {
        let labels: Vec<String> = Column::all().iter().map(|c| c.to_string()).collect();
        assert_eq!(labels.len(), COLUMN_COUNT);
        assert_eq!(labels[0], "1");
        assert_eq!(labels[8], "9");
        assert_eq!(labels[9], "OUT");
        assert_eq!(labels[10], "10");
        assert_eq!(labels[18], "18");
        assert_eq!(&labels[19..], &["IN", "TOT", "HCP", "NET"]);
    }

    #[test]
    fn index_matches_position() {
        for (i, col) in Column::all().iter().enumerate() {
            assert_eq!(col.index(), i, "column {}", col);
            assert_eq!(Column::at(i), Some(*col));
        }
        assert_eq!(Column::at(COLUMN_COUNT), None);
    }

    #[test]
    fn labels_parse_back() {
        assert_eq!(Column::from_label("12"), Some(Column::Hole(12)));
        assert_eq!(
            Column::from_label("out"),
            Some(Column::Aggregate(AggregateKind::Out))
        );
        assert_eq!(
            Column::from_label("NET"),
            Some(Column::Aggregate(AggregateKind::Net))
        );
        assert_eq!(Column::from_label("19"), None);
        assert_eq!(Column::from_label("0"), None);
        assert_eq!(Column::from_label("par"), None);
    }

    #[test]
    fn only_totals_are_derived() {
        let derived: Vec<Column> = Column::all()
            .into_iter()
            .filter(|c| c.is_derived())
            .collect();
        assert_eq!(
            derived,
            vec![
                Column::Aggregate(AggregateKind::Out),
                Column::Aggregate(AggregateKind::In),
                Column::Aggregate(AggregateKind::Tot),
            ]
        );
    }
}
