use clap::Args;
use scorecard::config::CardConfig;
use scorecard::error::ScResult;
use scorecard::session::Session;

#[derive(Args, Debug, Clone)]
pub struct ResetArgs {
    #[command(flatten)]
    pub config: CardConfig,

    #[arg(long)]
    pub calibration: bool,

    #[arg(long)]
    pub scores: bool,
}

pub fn run(args: ResetArgs, session: &mut Session) -> ScResult<()> {
    // Neither flag: reset both.
    let both = !args.calibration && !args.scores;

    if args.calibration || both {
        session.reset_calibration()?;
        println!("🧹 Calibration cleared.");
    }
    if args.scores || both {
        session.reset_scores()?;
        println!("🧹 Scores cleared.");
    }
    Ok(())
}
