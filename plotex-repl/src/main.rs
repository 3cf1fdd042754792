mod config;
mod error;
mod session;

use rustyline::{error::ReadlineError, DefaultEditor};
use session::Session;
use std::{fs, io::{self, IsTerminal, Read}};

/// Executes a single line in the session, printing the output or the error report.
fn execute_line(line: &str, session: &mut Session) {
    match session.execute(line) {
        Ok(out) => println!("{}", out),
        Err(err) => error::report_to_stderr(&err, line),
    }
}

/// Executes every non-blank line of the input in order.
fn execute_all(input: &str, session: &mut Session) {
    input.lines()
        .filter(|line| !line.trim().is_empty())
        .for_each(|line| execute_line(line, session));
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let mut session = Session::new(config::viewport_from_env());
    let mut args = std::env::args();
    args.next();

    if let Some(filename) = args.next() {
        // run source file
        match fs::read_to_string(&filename) {
            Ok(input) => execute_all(&input, &mut session),
            Err(err) => eprintln!("could not read {}: {}", filename, err),
        }
    } else if !io::stdin().is_terminal() {
        // read source from stdin
        let mut input = String::new();
        match io::stdin().read_to_string(&mut input) {
            Ok(_) => execute_all(&input, &mut session),
            Err(err) => eprintln!("could not read stdin: {}", err),
        }
    } else {
        // run the repl / interactive mode
        let mut rl = match DefaultEditor::new() {
            Ok(rl) => rl,
            Err(err) => {
                eprintln!("could not start the editor: {}", err);
                return;
            },
        };

        fn process_line(rl: &mut DefaultEditor, session: &mut Session) -> Result<(), ReadlineError> {
            let input = rl.readline("> ")?;
            if input.trim().is_empty() {
                return Ok(());
            }

            rl.add_history_entry(&input)?;

            execute_line(&input, session);
            Ok(())
        }

        loop {
            if let Err(err) = process_line(&mut rl, &mut session) {
                match err {
                    ReadlineError::Eof | ReadlineError::Interrupted => (),
                    _ => eprintln!("{}", err),
                }
                break;
            }
        }
    }
}
