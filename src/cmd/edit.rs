use clap::Args;
use scorecard::config::CardConfig;
use scorecard::error::{ScResult, ScorecardError};
use scorecard::keys::CellKey;
use scorecard::session::{KeyOp, Session};

#[derive(Args, Debug, Clone)]
pub struct CellArgs {
    #[command(flatten)]
    pub config: CardConfig,

    /// Cell key, e.g. p1_h7, p2_hcp.
    pub cell: String,
}

#[derive(Args, Debug, Clone)]
pub struct SetArgs {
    #[command(flatten)]
    pub cell: CellArgs,

    #[arg(allow_hyphen_values = true)]
    pub value: String,
}

#[derive(Debug, Clone, Copy)]
pub enum Op {
    Inc,
    Dec,
    Clear,
}

fn parse_key(raw: &str, players: usize) -> ScResult<CellKey> {
    let key: CellKey = raw
        .parse()
        .map_err(|e| ScorecardError::Validation(format!("{}", e)))?;
    if !key.in_range(players) {
        return Err(ScorecardError::Validation(format!(
            "cell '{}' is not on a {}-player card",
            key, players
        )));
    }
    Ok(key)
}

fn report(session: &Session, key: CellKey, changed: bool) {
    if changed {
        let value = session.ledger().get(key);
        println!("✅ {} = {}", key, if value.is_empty() { "(empty)" } else { value });
    } else {
        println!("🔒 {} is computed from the holes and cannot be edited.", key);
    }
}

pub fn run_set(args: SetArgs, session: &mut Session) -> ScResult<()> {
    let key = parse_key(&args.cell.cell, session.config().players)?;
    let changed = session.set_value(key, &args.value)?;
    report(session, key, changed);
    Ok(())
}

pub fn run_op(args: CellArgs, session: &mut Session, op: Op) -> ScResult<()> {
    let key = parse_key(&args.cell, session.config().players)?;
    let op = match op {
        Op::Inc => KeyOp::Increment,
        Op::Dec => KeyOp::Decrement,
        Op::Clear => KeyOp::Clear,
    };
    let changed = session.apply(key, op)?;
    report(session, key, changed);
    Ok(())
}
