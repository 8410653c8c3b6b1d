//! Interactive console for YADA
//!
//! Reads one command per line from stdin and prints replies to stdout.

use std::io::{self, BufRead, IsTerminal, Write};

use tracing_subscriber::EnvFilter;

use yada::build_info;
use yada::config::Config;
use yada::console::{handle_line, Reply};
use yada::storage::JsonStorage;
use yada::tracker::Tracker;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("yada=warn".parse()?))
        .with_writer(std::io::stderr)
        .init();

    build_info::print_startup_banner("Console");

    let config = Config::from_env();
    eprintln!("Data directory: {}", config.data_dir.display());

    let storage = JsonStorage::new(&config.data_dir);
    let mut tracker = Tracker::open(Box::new(storage)).with_calorie_method(config.calorie_method);

    let interactive = io::stdin().is_terminal();
    if interactive {
        println!("Type 'help' for commands, 'quit' to exit.");
    }

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut lines = stdin.lock().lines();
    loop {
        if interactive {
            print!("yada> ");
            stdout.flush()?;
        }
        let Some(line) = lines.next() else {
            break;
        };
        match handle_line(&mut tracker, &line?) {
            Reply::Quit => break,
            Reply::Output(text) if text.is_empty() => {}
            Reply::Output(text) => println!("{}", text),
        }
    }

    Ok(())
}
