//! Interactive shell: line editing, command dispatch, session state.

use std::collections::HashSet;

use fx_engine::{
    evaluate, free_variables, AngleMode, Constants, Environment, EvalContext, FunctionSource,
};
use rustyline::error::ReadlineError;

use crate::completer::FxHelper;
use crate::config::FxConfig;
use crate::store::FunctionStore;

type Editor = rustyline::Editor<FxHelper, rustyline::history::DefaultHistory>;

pub struct Repl {
    config: FxConfig,
    constants: Constants,
    env: Environment,
    store: FunctionStore,
}

/// Order-preserving de-duplication of a free-variable listing.
fn dedupe(names: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    names.into_iter().filter(|n| seen.insert(n.clone())).collect()
}

/// Split one whitespace-delimited token off the front of `s`.
fn split_token(s: &str) -> Option<(&str, &str)> {
    let s = s.trim_start();
    if s.is_empty() {
        return None;
    }
    match s.find(char::is_whitespace) {
        Some(i) => Some((&s[..i], &s[i..])),
        None => Some((s, "")),
    }
}

impl Repl {
    pub fn new(config: FxConfig, store: FunctionStore) -> Self {
        Repl {
            config,
            constants: Constants::new(),
            env: Environment::new(),
            store,
        }
    }

    pub fn run(&mut self) -> rustyline::Result<()> {
        println!("fx {} (type 'help' for commands)", env!("CARGO_PKG_VERSION"));

        let rl_config = rustyline::Config::builder()
            .max_history_size(200)?
            .completion_type(rustyline::CompletionType::List)
            .build();
        let mut rl = Editor::with_config(rl_config)?;
        rl.set_helper(Some(FxHelper::new()));

        let history_path = dirs::home_dir()
            .map(|p| p.join(".fx_history"))
            .unwrap_or_else(|| std::path::PathBuf::from(".fx_history"));
        let _ = rl.load_history(&history_path);

        loop {
            match rl.readline("fx> ") {
                Ok(line) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    rl.add_history_entry(line)?;

                    if line == "exit" || line == "quit" {
                        break;
                    }
                    self.handle_line(&mut rl, line);
                }
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
                Err(err) => {
                    println!("error: {:?}", err);
                    break;
                }
            }
        }

        let _ = rl.save_history(&history_path);
        Ok(())
    }

    fn handle_line(&mut self, rl: &mut Editor, line: &str) {
        if line == "help" {
            self.print_help();
            return;
        }

        if line == "mode" {
            println!("angle mode: {}", self.config.mode);
            return;
        }
        if let Some(rest) = line.strip_prefix("mode ") {
            match rest.trim().parse::<AngleMode>() {
                Ok(mode) => {
                    self.config.mode = mode;
                    if let Err(e) = self.config.save() {
                        println!("warning: could not persist config: {}", e);
                    }
                    println!("angle mode: {}", mode);
                }
                Err(e) => println!("error: {}", e),
            }
            return;
        }

        if line == "steps" {
            println!(
                "solver steps: {}",
                if self.config.solver_steps { "on" } else { "off" }
            );
            return;
        }
        if let Some(rest) = line.strip_prefix("steps ") {
            match rest.trim() {
                "on" => self.config.solver_steps = true,
                "off" => self.config.solver_steps = false,
                other => {
                    println!("error: expected 'on' or 'off', got '{}'", other);
                    return;
                }
            }
            if let Err(e) = self.config.save() {
                println!("warning: could not persist config: {}", e);
            }
            println!(
                "solver steps: {}",
                if self.config.solver_steps { "on" } else { "off" }
            );
            return;
        }

        if line == "vars" {
            if self.env.is_empty() {
                println!("no variables bound");
            } else {
                for (name, expr) in self.env.list() {
                    println!("\t{} = {}", name, expr);
                }
            }
            return;
        }

        if let Some(rest) = line.strip_prefix("let ") {
            self.handle_let(rest);
            return;
        }

        if line == "clear" {
            self.env.clear_all();
            println!("variables cleared");
            return;
        }
        if let Some(rest) = line.strip_prefix("clear ") {
            for name in rest.split_whitespace() {
                if !self.env.unset(name) {
                    println!("'{}' was not bound", name);
                }
            }
            return;
        }

        if line == "const" {
            for (name, value) in self.constants.list() {
                println!("\t{} = {}", name, value);
            }
            return;
        }
        if let Some(rest) = line.strip_prefix("const ") {
            self.handle_const(rest);
            return;
        }
        if let Some(rest) = line.strip_prefix("unconst ") {
            let name = rest.trim();
            if !self.constants.unset(name) {
                println!("'{}' is not a user constant", name);
            }
            return;
        }

        if let Some(rest) = line.strip_prefix("save ") {
            self.handle_save(rest);
            return;
        }
        if let Some(rest) = line.strip_prefix("show ") {
            self.handle_show(rest.trim());
            return;
        }
        if line == "list" {
            let names = self.store.list();
            if names.is_empty() {
                println!("no stored functions");
            } else {
                for name in names {
                    println!("\t${}", name);
                }
            }
            return;
        }
        if let Some(rest) = line.strip_prefix("del ") {
            let name = rest.trim();
            if self.store.remove(name) {
                println!("deleted ${}", name);
            } else {
                println!("no stored function '{}'", name);
            }
            return;
        }

        if let Some(rest) = line.strip_prefix("solve ") {
            self.handle_solve(rest);
            return;
        }

        self.evaluate_input(rl, line);
    }

    fn handle_let(&mut self, rest: &str) {
        let Some(eq) = rest.find('=') else {
            println!("usage: let <name> = <expr>");
            return;
        };
        let name = rest[..eq].trim();
        let expr_text = rest[eq + 1..].trim();
        if name.is_empty() || expr_text.is_empty() {
            println!("usage: let <name> = <expr>");
            return;
        }
        if self.constants.contains(name) {
            println!("'{}' is a constant and cannot be rebound", name);
            return;
        }
        match fx_parser::parse(expr_text) {
            Ok(expr) => {
                println!("\t{} = {}", name, expr);
                self.env.set(name, expr);
            }
            Err(e) => println!("error: {}", e),
        }
    }

    fn handle_const(&mut self, rest: &str) {
        let Some(eq) = rest.find('=') else {
            println!("usage: const <name> = <expr>");
            return;
        };
        let name = rest[..eq].trim().to_string();
        let expr_text = rest[eq + 1..].trim();
        let expr = match fx_parser::parse(expr_text) {
            Ok(expr) => expr,
            Err(e) => {
                println!("error: {}", e);
                return;
            }
        };
        let ctx = EvalContext {
            constants: &self.constants,
            mode: self.config.mode,
            functions: &self.store,
        };
        match evaluate(&expr, &self.env, &ctx) {
            Ok(value) => {
                if self.constants.set(name.clone(), value) {
                    println!("\t{} = {}", name, value);
                } else {
                    println!("'{}' is built in and cannot be redefined", name);
                }
            }
            Err(e) => println!("error: {}", e),
        }
    }

    fn handle_save(&mut self, rest: &str) {
        let Some((name, expr_text)) = split_token(rest) else {
            println!("usage: save <name> <expr>");
            return;
        };
        let expr_text = expr_text.trim();
        if expr_text.is_empty() {
            println!("usage: save <name> <expr>");
            return;
        }
        let expr = match fx_parser::parse(expr_text) {
            Ok(expr) => expr,
            Err(e) => {
                println!("error: {}", e);
                return;
            }
        };

        // Capture current bindings for the body's variables as defaults.
        let mut defaults = Environment::new();
        for var in dedupe(free_variables(&expr, &self.store)) {
            if let Some(bound) = self.env.get(&var) {
                defaults.set(var, bound.clone());
            }
        }

        match self.store.save(name, &expr, &defaults) {
            Ok(()) => println!("saved ${} = {}", name, expr),
            Err(e) => println!("error: {}", e),
        }
    }

    fn handle_show(&self, name: &str) {
        let name = name.strip_prefix('$').unwrap_or(name);
        match self.store.load(name) {
            Some(loaded) => {
                println!("\t${} = {}", name, loaded.body);
                for (var, expr) in loaded.defaults.list() {
                    println!("\t  {} = {}", var, expr);
                }
            }
            None => println!("no stored function '{}'", name),
        }
    }

    fn handle_solve(&self, rest: &str) {
        let Some((target, rest)) = split_token(rest) else {
            println!("usage: solve <target> <placeholder> <expr>");
            return;
        };
        let Some((placeholder, expr_text)) = split_token(rest) else {
            println!("usage: solve <target> <placeholder> <expr>");
            return;
        };
        let expr_text = expr_text.trim();
        if expr_text.is_empty() {
            println!("usage: solve <target> <placeholder> <expr>");
            return;
        }

        let expr = match fx_parser::parse(expr_text) {
            Ok(expr) => expr,
            Err(e) => {
                println!("error: {}", e);
                return;
            }
        };

        match fx_solver::solve_for(&expr, target, placeholder, &self.store) {
            Ok(solved) => {
                if self.config.solver_steps {
                    for step in &solved.steps {
                        println!(
                            "\t{} = {}\t| {}",
                            step.placeholder, step.expression, step.operation
                        );
                    }
                }
                println!("{} = {}", target, solved.expr);
            }
            Err(e) => println!("error: {}", e),
        }
    }

    fn evaluate_input(&mut self, rl: &mut Editor, input: &str) {
        let expr = match fx_parser::parse(input) {
            Ok(expr) => expr,
            Err(e) => {
                println!("error: {}", e);
                return;
            }
        };

        let mut used = dedupe(free_variables(&expr, &self.store));
        used.retain(|name| !self.constants.contains(name));

        // Prompted bindings live in a child scope; the session bindings
        // stay as they were.
        let mut env = Environment::child_of(&self.env);
        for name in &used {
            if env.contains(name) {
                continue;
            }
            match rl.readline(&format!("input {}> ", name)) {
                Ok(text) => match fx_parser::parse(text.trim()) {
                    Ok(bound) => env.set(name.clone(), bound),
                    Err(e) => {
                        println!("error: {}", e);
                        return;
                    }
                },
                Err(_) => return,
            }
        }

        let ctx = EvalContext {
            constants: &self.constants,
            mode: self.config.mode,
            functions: &self.store,
        };
        match evaluate(&expr, &env, &ctx) {
            Ok(value) => {
                if used.is_empty() {
                    println!("\t{} = {}", expr, value);
                } else {
                    println!("\t{}", expr);
                    println!("where");
                    for name in &used {
                        if let Some(bound) = env.get(name) {
                            println!("\t{} = {}", name, bound);
                        }
                    }
                    println!(" = {}", value);
                }
            }
            Err(e) => println!("error: {}", e),
        }
    }

    fn print_help(&self) {
        println!("  <expr>                  evaluate; unbound variables are prompted for");
        println!("  let <name> = <expr>     bind a variable (lazily, as an expression)");
        println!("  vars                    list bound variables");
        println!("  clear [names]           drop all (or the named) bindings");
        println!("  solve <t> <p> <expr>    rearrange '<p> = expr' into 't = ...'");
        println!("  steps on|off            toggle solver step output");
        println!("  mode [deg|rad|grad]     show or set the angle mode");
        println!("  const [<name> = <expr>] list constants or define one");
        println!("  unconst <name>          remove a user constant");
        println!("  save <name> <expr>      store a function for $name calls");
        println!("  show <name>             print a stored function");
        println!("  list                    list stored functions");
        println!("  del <name>              delete a stored function");
        println!("  exit | quit             leave the shell");
    }
}
