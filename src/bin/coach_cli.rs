use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use form_coach::analysis::{analyze, Exercise, FormVerdict};
use form_coach::config::AppConfig;
use form_coach::engine::SessionHandle;
use form_coach::fixtures::{self, PoseScript, ScriptedPoseProvider};
use form_coach::speech::LoggingSynthesizer;
use serde::Serialize;

#[derive(Parser, Debug)]
#[command(
    name = "coach_cli",
    about = "Deterministic pose fixture harness for the form coach"
)]
struct Cli {
    /// Override config file (defaults to assets/coach_config.json)
    #[arg(long)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Classify a single fixture pose and print the verdict
    Analyze {
        #[arg(long)]
        fixture: String,
        #[arg(long)]
        exercise: String,
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Play a pose script through a full session, streaming emissions
    Session {
        #[arg(long)]
        script: PathBuf,
        #[arg(long)]
        exercise: String,
        /// Extra time to keep the session open after the script ends
        #[arg(long, default_value_t = 1000)]
        drain_ms: u64,
    },
    /// List available fixture poses
    DumpFixtures,
}

fn main() -> ExitCode {
    form_coach::init_logging();
    match run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:?}");
            ExitCode::from(1)
        }
    }
}

fn run() -> Result<ExitCode> {
    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => AppConfig::load_from_file(path),
        None => AppConfig::load(),
    };

    match cli.command {
        Commands::Analyze {
            fixture,
            exercise,
            output,
        } => run_analyze(&config, &fixture, &exercise, output),
        Commands::Session {
            script,
            exercise,
            drain_ms,
        } => run_session(config, &script, &exercise, drain_ms),
        Commands::DumpFixtures => run_dump(),
    }
}

fn parse_exercise(name: &str) -> Result<Exercise> {
    Exercise::parse(name).ok_or_else(|| anyhow!("unknown exercise: {name}"))
}

fn run_analyze(
    config: &AppConfig,
    fixture: &str,
    exercise: &str,
    output_path: Option<PathBuf>,
) -> Result<ExitCode> {
    let exercise = parse_exercise(exercise)?;
    let pose = fixtures::pose(fixture).with_context(|| format!("loading fixture {fixture}"))?;
    let verdict = analyze(exercise, &pose, config);

    let report = VerdictReportPayload {
        fixture,
        exercise: exercise.as_str(),
        key: verdict.key.as_ref().map(|k| k.to_string()),
        verdict: &verdict,
    };
    let json = serde_json::to_string_pretty(&report)?;

    if let Some(path) = output_path {
        fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;
    } else {
        println!("{json}");
    }

    Ok(ExitCode::from(0))
}

fn run_session(
    config: AppConfig,
    script_path: &PathBuf,
    exercise: &str,
    drain_ms: u64,
) -> Result<ExitCode> {
    let exercise = parse_exercise(exercise)?;
    let script = PoseScript::load_from_file(script_path)
        .with_context(|| format!("loading script {}", script_path.display()))?;
    let provider = Arc::new(ScriptedPoseProvider::from_script(&script)?);
    let frame_interval = config.engine.frame_interval_ms;
    let script_frames = script.expand()?.len() as u64;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("building tokio runtime")?;

    runtime.block_on(async move {
        let session = SessionHandle::new(
            config,
            Arc::clone(&provider) as Arc<dyn form_coach::engine::PoseProvider>,
            Arc::new(LoggingSynthesizer),
        );
        session
            .start(exercise)
            .map_err(|err| anyhow!("starting session: {err}"))?;
        let mut feedback = session
            .subscribe_feedback()
            .ok_or_else(|| anyhow!("feedback channel not initialized"))?;

        // Enough time to play every scripted frame, plus the drain.
        let deadline =
            tokio::time::sleep(Duration::from_millis(script_frames * frame_interval + drain_ms));
        tokio::pin!(deadline);

        loop {
            tokio::select! {
                emission = feedback.recv() => match emission {
                    Ok(emission) => println!("{}", serde_json::to_string(&emission)?),
                    Err(tokio::sync::broadcast::error::RecvError::Lagged(skipped)) => {
                        eprintln!("lagged, skipped {skipped} emissions");
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
                },
                _ = &mut deadline => break,
            }
        }

        session
            .stop()
            .map_err(|err| anyhow!("stopping session: {err}"))?;
        Ok::<(), anyhow::Error>(())
    })?;

    Ok(ExitCode::from(0))
}

fn run_dump() -> Result<ExitCode> {
    for name in fixtures::fixture_names() {
        println!("{name}");
    }
    Ok(ExitCode::from(0))
}

#[derive(Serialize)]
struct VerdictReportPayload<'a> {
    fixture: &'a str,
    exercise: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    key: Option<String>,
    verdict: &'a FormVerdict,
}
