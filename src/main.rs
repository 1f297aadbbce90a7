use std::process::ExitCode;

use clap::{Parser, Subcommand};
use log::error;
use railflow::config::CONFIG;
use railflow::logging::init_logging;
use railflow::{actor_from_args, params_from_pairs, App, AppError};
use serde_json::{json, Value};
use uuid::Uuid;

const EXIT_FAILURE: u8 = 1;
const EXIT_FAULT: u8 = 2;
const EXIT_USAGE: u8 = 64;

#[derive(Parser, Debug)]
#[command(name = "railflow", version, about = "Run railway operation pipelines")]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace with targets)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run an operation and print its result
    Run(RunArgs),
    /// List registered operations with their steps
    List {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Parser, Debug)]
struct RunArgs {
    /// Operation name (e.g. CompanyCreate)
    operation: String,

    /// Input attribute; repeatable. Values are parsed as JSON when possible
    #[arg(long = "param", short = 'p', value_name = "KEY=VALUE")]
    params: Vec<String>,

    /// Role of the invoking actor (admin|member). Omit for anonymous
    #[arg(long, value_name = "ROLE")]
    actor_role: Option<String>,

    /// Id of the invoking actor
    #[arg(long, value_name = "UUID")]
    actor_id: Option<Uuid>,

    /// Shortcut for --param id=<UUID>
    #[arg(long, value_name = "UUID")]
    id: Option<Uuid>,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,

    /// Also print the run's event trace
    #[arg(long)]
    events: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&CONFIG, cli.verbose);

    let outcome = App::new(&CONFIG).and_then(|app| match cli.command {
                                       Commands::Run(args) => run(&app, args),
                                       Commands::List { json } => list(&app, json),
                                   });
    match outcome {
        Ok(code) => code,
        Err(e) if e.is_fault() => {
            error!("{e}");
            eprintln!("fault: {e}");
            ExitCode::from(EXIT_FAULT)
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::from(EXIT_USAGE)
        }
    }
}

fn run(app: &App, args: RunArgs) -> Result<ExitCode, AppError> {
    let mut params = params_from_pairs(&args.params)?;
    if let Some(id) = args.id {
        params.insert("id".to_string(), Value::String(id.to_string()));
    }
    let actor = actor_from_args(args.actor_role.as_deref(), args.actor_id)?;
    let result = app.run(&args.operation, params, actor)?;

    if args.json {
        let mut out = serde_json::to_value(&result)?;
        if args.events {
            out["events"] = json!(result.events());
        }
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!("{} [{}]: {:?}", result.operation(), result.run_id(), result.status());
        for msg in result.errors().full_messages() {
            println!("  error: {msg}");
        }
        if let Some(step) = result.failed_step() {
            println!("  failed at: {step}");
        }
        if let Some(model) = result.model() {
            println!("  model: {}", serde_json::to_string(model)?);
        }
        if args.events {
            for ev in result.events() {
                println!("  #{} {:?}", ev.seq, ev.kind);
            }
        }
    }
    Ok(if result.is_success() { ExitCode::SUCCESS } else { ExitCode::from(EXIT_FAILURE) })
}

fn list(app: &App, as_json: bool) -> Result<ExitCode, AppError> {
    let ops = app.describe();
    if as_json {
        println!("{}", serde_json::to_string_pretty(&ops)?);
        return Ok(ExitCode::SUCCESS);
    }
    for op in ops {
        println!("{} ({})", op.name, &op.definition_hash[..12.min(op.definition_hash.len())]);
        for s in op.steps {
            let fatal = if s.on_fatal { ", on_fatal" } else { "" };
            println!("  - {} [{}{fatal}]", s.name, s.track.as_str());
        }
    }
    Ok(ExitCode::SUCCESS)
}
