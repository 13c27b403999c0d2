use crate::reports;
use clap::Args;
use scorecard::config::CardConfig;
use scorecard::error::ScResult;
use scorecard::session::Session;

#[derive(Args, Debug, Clone)]
pub struct ShowArgs {
    #[command(flatten)]
    pub config: CardConfig,
}

pub fn run_card(session: &Session) -> ScResult<()> {
    reports::print_card(session.ledger());
    if !session.is_calibrated() {
        println!("\n⚠️  Not calibrated yet. Run `calibrate` to map the boxes.");
    }
    Ok(())
}

pub fn run_cells(session: &Session) -> ScResult<()> {
    if session.cells().is_empty() {
        println!("⚠️  Not calibrated yet. Run `calibrate` to map the boxes.");
        return Ok(());
    }
    reports::print_cells(session.cells());
    Ok(())
}

pub fn run_render(session: &Session) -> ScResult<()> {
    let plan = session.render();
    println!("{}", serde_json::to_string_pretty(&plan)?);
    Ok(())
}
