use clap::Parser;
use course_rag_assistant::cli::{self, Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Serve(args) => cli::serve::run(cli.global, args).await,
        Command::Chat(args) => cli::chat::run(cli.global, args).await,
        Command::Ask(args) => cli::ask::run(cli.global, args).await,
    }
}
