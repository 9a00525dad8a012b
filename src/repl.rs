use anyhow::Result;
use lispy_rs::{new_engine, Engine};
use rustyline::{error::ReadlineError, DefaultEditor};

const PROMPT: &str = "lispy> ";

pub fn start() -> Result<()> {
    println!("Lispy Version {}", env!("CARGO_PKG_VERSION"));
    println!("Press Ctrl+c to Exit\n");

    let mut rl = DefaultEditor::new()?;
    let mut engine = new_engine();

    loop {
        match rl.readline(PROMPT) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    rl.add_history_entry(line.as_str())?;
                }
                println!("{}", eval_line(engine.as_mut(), &line));
            }
            Err(ReadlineError::Eof) | Err(ReadlineError::Interrupted) => return Ok(()),
            Err(err) => return Err(err.into()),
        }
    }
}

/// Evaluates one line and renders what the prompt should echo back.
fn eval_line(engine: &mut dyn Engine, line: &str) -> String {
    match engine.run(line) {
        Ok(value) => value.to_string(),
        Err(err) => format!("parse error: {:#}", err),
    }
}
