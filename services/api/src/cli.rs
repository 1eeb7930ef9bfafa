use crate::quiz::{run_quiz, run_score, QuizArgs, ScoreArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use mission_secure::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Mission Secure",
    about = "Cybersecurity self-assessment service and terminal quiz",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Take the assessment interactively in the terminal
    Quiz(QuizArgs),
    /// Score a saved answer set without running the quiz
    Score(ScoreArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Quiz(args) => run_quiz(args).await,
        Command::Score(args) => run_score(args).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_serve_without_subcommand() {
        let cli = Cli::try_parse_from(["mission-secure"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn quiz_accepts_server_and_seed() {
        let cli = Cli::try_parse_from([
            "mission-secure",
            "quiz",
            "--server",
            "http://localhost:3001",
            "--seed",
            "9",
        ])
        .expect("parses");
        match cli.command {
            Some(Command::Quiz(args)) => {
                assert_eq!(args.server.as_deref(), Some("http://localhost:3001"));
                assert_eq!(args.seed, Some(9));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
