//! Task Planner - Entry Point
//!
//! Loads a scene and a goal (or an instruction to parse into one), plans it,
//! and prints the resulting atomic action sequence.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use serde::Serialize;

use task_planner::command::{InstructionParser, PatternInstructionParser, TaskGoal};
use task_planner::core::config::{load_config, set_config};
use task_planner::core::error::Result;
use task_planner::planning::{AtomicAction, PlanOutcome, Planner};
use task_planner::scene::{JsonSceneFile, SceneDescriptionFile, SceneModel, SceneSource};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Text,
}

/// Task Planner - turn a robot goal into atomic actions
#[derive(Parser, Debug)]
#[command(name = "task-planner")]
#[command(about = "Plan atomic robot actions for a goal in an observed scene")]
struct Args {
    /// Scene: JSON with an `objects` list (`.json`), otherwise a text description
    #[arg(long)]
    scene: PathBuf,

    /// Structured goal (JSON TaskGoal)
    #[arg(long, conflicts_with = "instruction", required_unless_present = "instruction")]
    goal: Option<PathBuf>,

    /// Instruction text, e.g. "put the cup in the cabinet"
    #[arg(long)]
    instruction: Option<String>,

    /// Planner configuration (TOML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Enable debug logging
    #[arg(long, short = 'v')]
    verbose: bool,
}

/// JSON output structure
#[derive(Serialize)]
struct PlanReport<'a> {
    goal: &'a TaskGoal,
    actions: &'a [AtomicAction],
    sub_tasks: usize,
    conflicts: usize,
    skipped_sub_tasks: Vec<String>,
    resolution_fault: Option<String>,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let filter = if args.verbose {
        "task_planner=debug"
    } else {
        "task_planner=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<()> {
    if let Some(path) = &args.config {
        let config = load_config(path)?;
        if set_config(config).is_err() {
            tracing::warn!("Planner config already initialized; ignoring {}", path.display());
        }
    }

    let planner = Planner::new();
    let scene = observe_scene(&args.scene)?;

    let goal = match (&args.goal, &args.instruction) {
        (Some(path), _) => serde_json::from_str::<TaskGoal>(&fs::read_to_string(path)?)?,
        (None, Some(text)) => PatternInstructionParser::new().parse(text, &scene),
        (None, None) => TaskGoal::unrecognized(),
    };

    let outcome = planner.plan_detailed(&goal, &scene)?;

    match args.format {
        OutputFormat::Json => print_json(&goal, &outcome)?,
        OutputFormat::Text => print_text(&outcome),
    }

    Ok(())
}

fn observe_scene(path: &Path) -> Result<SceneModel> {
    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    if is_json {
        JsonSceneFile::new(path).observe()
    } else {
        SceneDescriptionFile::new(path).observe()
    }
}

fn print_json(goal: &TaskGoal, outcome: &PlanOutcome) -> Result<()> {
    let report = PlanReport {
        goal,
        actions: &outcome.actions,
        sub_tasks: outcome.sub_tasks,
        conflicts: outcome.conflicts,
        skipped_sub_tasks: outcome.gaps.iter().map(|g| g.to_string()).collect(),
        resolution_fault: outcome.fault.as_ref().map(|f| f.to_string()),
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn print_text(outcome: &PlanOutcome) {
    println!("Execution plan:");
    for (i, action) in outcome.actions.iter().enumerate() {
        println!("{:>3}. {}", i + 1, action);
    }

    for gap in &outcome.gaps {
        println!("  skipped: {}", gap);
    }
    if let Some(fault) = &outcome.fault {
        println!("  partial resolution: {}", fault.reason);
    }
}
