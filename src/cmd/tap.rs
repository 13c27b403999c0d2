use super::parse_point;
use clap::{Args, ValueEnum};
use scorecard::config::CardConfig;
use scorecard::error::{ScResult, ScorecardError};
use scorecard::session::{KeyOp, Session};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TapOp {
    Inc,
    Dec,
    Clear,
}

#[derive(Args, Debug, Clone)]
pub struct TapArgs {
    #[command(flatten)]
    pub config: CardConfig,

    /// Canvas point as "x,y".
    #[arg(allow_hyphen_values = true)]
    pub at: String,

    /// Value to enter into the tapped cell.
    #[arg(long, conflicts_with = "op")]
    pub value: Option<String>,

    #[arg(long, value_enum)]
    pub op: Option<TapOp>,

    /// Move the selection this many cells after tapping (negative = back).
    #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
    pub advance: i32,
}

pub fn run(args: TapArgs, session: &mut Session) -> ScResult<()> {
    if !session.is_calibrated() {
        return Err(ScorecardError::Validation(
            "card is not calibrated; run `calibrate` first".to_string(),
        ));
    }

    let (x, y) = parse_point(&args.at)?;
    if session.tap(x, y).is_none() {
        println!("No cell at ({}, {}).", x, y);
        return Ok(());
    }

    let changed = match (&args.value, args.op) {
        (Some(value), _) => session.set_selected(value)?,
        (None, Some(op)) => session.apply_selected(match op {
            TapOp::Inc => KeyOp::Increment,
            TapOp::Dec => KeyOp::Decrement,
            TapOp::Clear => KeyOp::Clear,
        })?,
        (None, None) => true,
    };
    if !changed {
        println!("🔒 Totals are computed and cannot be edited.");
    }

    for _ in 0..args.advance.unsigned_abs() {
        session.advance(args.advance.signum());
    }

    if let Some(sel) = session.selection() {
        println!("{} {}", sel.label(), sel.value_text(session.ledger()));
    }
    Ok(())
}
