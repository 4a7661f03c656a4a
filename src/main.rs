use clap::Parser;

use ideation_cli::{Config, InputCollector, Interrupted, OutputHandler, SessionManager};

#[derive(Parser)]
#[command(name = "ideation")]
#[command(about = "Interactive AI CLI for guided product ideation sessions", long_about = None)]
struct Cli {
    /// Enable debug output
    #[arg(short, long)]
    debug: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let mut out = OutputHandler::new().with_debug(cli.debug);
    out.print_banner().ok();

    let config = Config::load_or_default();
    let input = InputCollector::stdin();
    let mut session = SessionManager::new(&config, input, out);

    if let Err(err) = session.run().await {
        if err.is::<Interrupted>() {
            println!("\n\nSession interrupted by user. Goodbye!");
            std::process::exit(0);
        }
        eprintln!("\n\nAn error occurred: {}", err);
        std::process::exit(1);
    }
}
