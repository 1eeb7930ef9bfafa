//! Terminal front end: the interactive quiz and one-shot scoring of saved answers.

use crate::infra::{self, SERVICE_TIMEOUT};
use clap::Args;
use mission_secure::assessment::report::AssessmentReport;
use mission_secure::assessment::responses::{HttpResponseLogger, ResponseLogWorker, ResponseSink};
use mission_secure::assessment::{
    standard_catalog, AnswerMap, Assessor, Question, QuizSession, SessionStep,
};
use mission_secure::config::AppConfig;
use mission_secure::error::AppError;
use mission_secure::telemetry;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Args, Debug, Default)]
pub(crate) struct QuizArgs {
    /// Mission Secure service used for response logging and grading
    #[arg(long)]
    pub(crate) server: Option<String>,
    /// Seed for the question order (random when omitted)
    #[arg(long)]
    pub(crate) seed: Option<u64>,
}

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// JSON file mapping question ids to the chosen options
    #[arg(long)]
    pub(crate) answers: PathBuf,
    /// Ask the remote grader to refine the local score
    #[arg(long)]
    pub(crate) refine: bool,
    /// Print the report as JSON instead of text
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) async fn run_quiz(args: QuizArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init_stderr(&config.telemetry)?;

    let (sink, worker) = match &args.server {
        Some(url) => {
            let logger = HttpResponseLogger::new(url.as_str(), SERVICE_TIMEOUT)?;
            let (sink, rx) = ResponseSink::channel();
            let handle = ResponseLogWorker::new(rx, Arc::new(logger)).spawn();
            (Some(sink), Some(handle))
        }
        None => (None, None),
    };

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut session = QuizSession::start(standard_catalog(), &mut rng, sink);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = std::io::stdout();
    writeln!(stdout, "Mission Secure cybersecurity self-assessment\n")?;

    while let Some(question) = session.current().cloned() {
        let (answered, total) = session.progress();
        render_question(&mut stdout, &question, answered + 1, total)?;

        let choice = loop {
            write!(stdout, "> ")?;
            stdout.flush()?;
            let Some(line) = lines.next_line().await? else {
                return Err(AppError::InvalidInput(
                    "input closed before the assessment finished".to_string(),
                ));
            };
            match parse_choice(&line, question.options.len()) {
                Some(index) => break index,
                None => writeln!(
                    stdout,
                    "Enter a number between 1 and {}.",
                    question.options.len()
                )?,
            }
        };

        if let Ok(SessionStep::Complete) = session.choose(choice) {
            writeln!(stdout, "\nAll {total} questions answered. Grading...\n")?;
        }
    }

    let (questions, answers) = session.finish();
    let assessor = Assessor::new(
        infra::scoring_engine(&config)?,
        infra::refiner(&config, args.server.as_deref())?,
    );
    let report = assessor.assess(&answers, &questions).await;
    render_report(&mut stdout, &report)?;

    if let Some(handle) = worker {
        match handle.await {
            Ok(summary) => tracing::info!(
                delivered = summary.delivered,
                dropped = summary.dropped,
                "response log drained"
            ),
            Err(err) => tracing::warn!(error = %err, "response log worker failed"),
        }
    }

    Ok(())
}

pub(crate) async fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init_stderr(&config.telemetry)?;

    let raw = std::fs::read_to_string(&args.answers)?;
    let answers = parse_answers(&raw)?;

    let engine = infra::scoring_engine(&config)?;
    let refiner = if args.refine {
        infra::refiner(&config, None)?
    } else {
        None
    };
    let report = Assessor::new(engine, refiner)
        .assess(&answers, standard_catalog().questions())
        .await;

    let mut stdout = std::io::stdout();
    if args.json {
        let body = serde_json::to_string_pretty(&report).map_err(std::io::Error::from)?;
        writeln!(stdout, "{body}")?;
    } else {
        render_report(&mut stdout, &report)?;
    }
    Ok(())
}

pub(crate) fn parse_answers(raw: &str) -> Result<AnswerMap, AppError> {
    let answers: AnswerMap = serde_json::from_str(raw)
        .map_err(|err| AppError::InvalidInput(format!("answers file: {err}")))?;
    let catalog = standard_catalog();
    if let Some((id, _)) = answers.iter().find(|(id, _)| catalog.get(id.as_str()).is_none()) {
        return Err(AppError::InvalidInput(format!("unknown question id '{id}'")));
    }
    Ok(answers)
}

/// 1-based menu choice to an option index.
pub(crate) fn parse_choice(input: &str, option_count: usize) -> Option<usize> {
    let number: usize = input.trim().parse().ok()?;
    (1..=option_count).contains(&number).then(|| number - 1)
}

fn render_question(
    out: &mut impl Write,
    question: &Question,
    position: usize,
    total: usize,
) -> std::io::Result<()> {
    writeln!(out, "Question {position} of {total}")?;
    writeln!(out, "{}", question.text)?;
    for (index, option) in question.options.iter().enumerate() {
        writeln!(out, "  {}. {}", index + 1, option.label)?;
    }
    Ok(())
}

pub(crate) fn render_report(out: &mut impl Write, report: &AssessmentReport) -> std::io::Result<()> {
    writeln!(out, "Security score: {}/100", report.score)?;
    writeln!(
        out,
        "Level: {} {}",
        report.badge, report.security_level_label
    )?;
    writeln!(
        out,
        "Risk: {} (remediate within {}, estimated investment {})",
        report.risk_band_label, report.remediation_window, report.estimated_investment
    )?;
    writeln!(out, "Benchmark: {}", report.benchmark)?;
    if report.maturity_bonus > 0 {
        writeln!(out, "Maturity bonus: +{}", report.maturity_bonus)?;
    }

    writeln!(out, "\nBy category")?;
    for entry in &report.category_breakdown {
        if entry.answered == 0 {
            continue;
        }
        writeln!(out, "  {:<20} {:>3}%", entry.label, entry.average_percent)?;
    }

    if report.notes.is_empty() {
        writeln!(out, "\nNo open recommendations.")?;
    } else {
        writeln!(out, "\nRecommendations")?;
        for note in &report.notes {
            writeln!(out, "  - {note}")?;
        }
    }

    if report.celebrate {
        writeln!(out, "\nExcellent posture. Keep it up!")?;
    }
    Ok(())
}
