use super::parse_point;
use crate::reports;
use clap::Args;
use scorecard::calibrate::TapOutcome;
use scorecard::config::CardConfig;
use scorecard::error::ScResult;
use scorecard::session::Session;

#[derive(Args, Debug, Clone)]
pub struct CalibrateArgs {
    #[command(flatten)]
    pub config: CardConfig,

    /// One wizard tap as "x,y". Repeat in wizard order.
    #[arg(short, long = "tap", allow_hyphen_values = true)]
    pub taps: Vec<String>,
}

pub fn run(args: CalibrateArgs, session: &mut Session) -> ScResult<()> {
    let points = args
        .taps
        .iter()
        .map(|t| parse_point(t))
        .collect::<ScResult<Vec<_>>>()?;

    let total = session.begin_calibration().total_steps();
    println!("\n📐 === CALIBRATION ({} taps) === 📐", total);

    for (x, y) in points {
        if session.calibration_tap(x, y) == Some(TapOutcome::Ignored) {
            println!("   ⚠️  Tap ({}, {}) ignored.", x, y);
        }
    }

    if session.finish_calibration()? {
        println!("✅ Calibration saved.");
        reports::print_cells(session.cells());
        return Ok(());
    }

    // Incomplete: nothing is saved, the previous calibration stays.
    if let Some(wizard) = session.wizard() {
        println!(
            "⚠️  Calibration incomplete: {}/{} taps captured. Nothing saved.",
            wizard.step(),
            wizard.total_steps()
        );
        println!("   Next: {}", wizard.hint());
    }
    session.abandon_calibration();
    Ok(())
}
