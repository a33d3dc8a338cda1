mod session;

use clap::Parser;
use session::Session;
use tic_tac_toe_rust::core::board_size::BoardSize;
use tracing_subscriber::EnvFilter;

/// Play tic-tac-toe (five-in-a-row on big boards) in the terminal.
#[derive(Parser, Debug)]
#[command(name = "ttt_cli")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Board side length, e.g. 3, 5, 10 or 15 (also accepts 5x5)
    #[arg(short, long, default_value = "3")]
    pub size: BoardSize,

    /// Semicolon-separated directives to run before reading stdin
    #[arg(long)]
    pub script: Option<String>,

    /// Exit after running the script instead of reading stdin
    #[arg(long)]
    pub batch: bool,

    /// Disable highlighting of winning cells
    #[arg(long)]
    pub no_color: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    tracing::debug!(?cli, "parsed arguments");

    println!("program begin");
    let mut session = Session::new(cli.size, !cli.no_color);
    session.start(cli.script.as_deref(), !cli.batch);
    println!("program end");
}
