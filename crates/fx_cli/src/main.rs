mod completer;
mod config;
mod repl;
mod store;

use std::collections::HashSet;
use std::io::{BufRead, Write};

use anyhow::{bail, Context};
use clap::Parser;
use fx_engine::{evaluate, free_variables, AngleMode, Constants, Environment, EvalContext};

use crate::config::FxConfig;
use crate::repl::Repl;
use crate::store::FunctionStore;

/// Command-line formula calculator: evaluate expressions, bind variables
/// lazily, and rearrange equations to isolate a variable.
#[derive(Parser)]
#[command(name = "fx", version)]
struct Cli {
    /// Expression to evaluate; the interactive shell starts when omitted.
    expression: Vec<String>,

    /// Override the configured angle mode (deg, rad, grad) for this run.
    #[arg(long)]
    mode: Option<AngleMode>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = FxConfig::load();
    if let Some(mode) = cli.mode {
        config.mode = mode;
    }
    let store = FunctionStore::open().context("opening function store")?;

    if cli.expression.is_empty() {
        Repl::new(config, store).run()?;
        return Ok(());
    }

    eval_once(&cli.expression.join(" "), &config, &store)
}

/// One-shot evaluation: prompt for every unbound variable on stdin, print
/// the result, exit.
fn eval_once(input: &str, config: &FxConfig, store: &FunctionStore) -> anyhow::Result<()> {
    let expr = fx_parser::parse(input)?;
    let constants = Constants::new();

    let mut seen = HashSet::new();
    let vars: Vec<String> = free_variables(&expr, store)
        .into_iter()
        .filter(|name| !constants.contains(name) && seen.insert(name.clone()))
        .collect();

    let stdin = std::io::stdin();
    let mut env = Environment::new();
    for name in &vars {
        print!("input {}> ", name);
        std::io::stdout().flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            bail!("no value supplied for '{}'", name);
        }
        env.set(name.clone(), fx_parser::parse(line.trim())?);
    }

    let ctx = EvalContext {
        constants: &constants,
        mode: config.mode,
        functions: store,
    };
    let value = evaluate(&expr, &env, &ctx)?;

    if vars.is_empty() {
        println!("\t{} = {}", expr, value);
    } else {
        println!("\t{}", expr);
        println!("where");
        for (name, bound) in env.list() {
            println!("\t{} = {}", name, bound);
        }
        println!(" = {}", value);
    }
    Ok(())
}
