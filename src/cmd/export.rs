use clap::Args;
use scorecard::config::CardConfig;
use scorecard::error::ScResult;
use scorecard::export;
use scorecard::session::Session;
use std::io;

#[derive(Args, Debug, Clone)]
pub struct ExportArgs {
    #[command(flatten)]
    pub config: CardConfig,

    /// Output CSV file; stdout when omitted.
    #[arg(short, long)]
    pub output: Option<String>,
}

pub fn run(args: ExportArgs, session: &Session) -> ScResult<()> {
    match args.output {
        Some(path) => {
            export::export_csv_file(session.ledger(), &path)?;
            println!("💾 Card saved to {}", path);
        }
        None => export::write_csv(session.ledger(), io::stdout().lock())?,
    }
    Ok(())
}
