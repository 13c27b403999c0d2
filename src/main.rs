use clap::{CommandFactory, FromArgMatches, Parser, Subcommand};
use scorecard::config::CardConfig;
use scorecard::session::Session;
use scorecard::store::FileStore;
use std::process;
use tracing::{error, info};

mod cmd;
mod reports;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Directory holding the saved calibration and scores.
    #[arg(global = true, short, long, default_value = ".scorecard")]
    store: String,

    /// JSON card configuration; explicit flags still win.
    #[arg(global = true, long)]
    config: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the calibration wizard with a sequence of taps.
    Calibrate(cmd::calibrate::CalibrateArgs),
    /// Set a cell to a value (digits only, max two).
    Set(cmd::edit::SetArgs),
    /// Add one to a cell.
    Inc(cmd::edit::CellArgs),
    /// Subtract one from a cell (never below zero).
    Dec(cmd::edit::CellArgs),
    /// Empty a cell.
    Clear(cmd::edit::CellArgs),
    /// Hit-test a point on the card and optionally edit the cell there.
    Tap(cmd::tap::TapArgs),
    /// Print the card.
    Show(cmd::show::ShowArgs),
    /// Print the calibrated cell rectangles.
    Cells(cmd::show::ShowArgs),
    /// Print the render plan as JSON.
    Render(cmd::show::ShowArgs),
    /// Export the card as CSV.
    Export(cmd::export::ExportArgs),
    /// Forget the calibration and/or the scores.
    Reset(cmd::reset::ResetArgs),
}

impl Commands {
    fn config(&self) -> &CardConfig {
        match self {
            Commands::Calibrate(a) => &a.config,
            Commands::Set(a) => &a.cell.config,
            Commands::Inc(a) | Commands::Dec(a) | Commands::Clear(a) => &a.config,
            Commands::Tap(a) => &a.config,
            Commands::Show(a) | Commands::Cells(a) | Commands::Render(a) => &a.config,
            Commands::Export(a) => &a.config,
            Commands::Reset(a) => &a.config,
        }
    }
}

fn fatal(msg: impl std::fmt::Display) -> ! {
    error!("{}", msg);
    eprintln!("❌ {}", msg);
    process::exit(1);
}

fn main() {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    // 1. Raw matches first, so file config and explicit flags can be told apart
    let matches = Cli::command().get_matches();
    let cli = Cli::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    let Some((_, sub_matches)) = matches.subcommand() else {
        fatal("no subcommand given");
    };

    // 2. Resolve configuration: file, then CLI overrides
    let cli_config = cli.command.config();
    let config = match &cli.config {
        Some(path) => {
            info!("📂 Loading card config: {}", path);
            let mut file_config = CardConfig::load_from_file(path).unwrap_or_else(|e| fatal(e));
            file_config.merge_from_cli(cli_config, sub_matches);
            file_config
        }
        None => cli_config.clone(),
    };
    if let Err(e) = config.validate() {
        fatal(e);
    }

    // 3. Open the card
    let store = FileStore::open(&cli.store).unwrap_or_else(|e| fatal(e));
    let mut session = Session::open(config, Box::new(store));

    // 4. Execute
    let result = match cli.command {
        Commands::Calibrate(args) => cmd::calibrate::run(args, &mut session),
        Commands::Set(args) => cmd::edit::run_set(args, &mut session),
        Commands::Inc(args) => cmd::edit::run_op(args, &mut session, cmd::edit::Op::Inc),
        Commands::Dec(args) => cmd::edit::run_op(args, &mut session, cmd::edit::Op::Dec),
        Commands::Clear(args) => cmd::edit::run_op(args, &mut session, cmd::edit::Op::Clear),
        Commands::Tap(args) => cmd::tap::run(args, &mut session),
        Commands::Show(_) => cmd::show::run_card(&session),
        Commands::Cells(_) => cmd::show::run_cells(&session),
        Commands::Render(_) => cmd::show::run_render(&session),
        Commands::Export(args) => cmd::export::run(args, &session),
        Commands::Reset(args) => cmd::reset::run(args, &mut session),
    };

    if let Err(e) = result {
        fatal(e);
    }
}
