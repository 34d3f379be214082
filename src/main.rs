use clap::Parser;
use weeklight::adapter::inbound::cli::command::Cli;
use weeklight::adapter::inbound::cli::{dispatch, output};

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    dispatch::configure(&cli);

    if let Err(e) = dispatch::execute(&cli).await {
        output::error(&e.to_string());
        std::process::exit(1);
    }
}
