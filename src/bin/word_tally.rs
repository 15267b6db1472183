use anchor_hashmap::Console;
use clap::Parser;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "word-tally")]
#[command(about = "Count word frequencies from files or typed input")]
struct Args {
    /// File to tally before the menu starts
    file: Option<PathBuf>,
}

fn main() -> ExitCode {
    let args = Args::parse();
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut console = Console::new(stdin.lock(), stdout.lock());

    if let Some(path) = &args.file {
        match console.load_file(path) {
            Ok(words) => println!("Tallied {words} words from {}", path.display()),
            Err(err) => {
                eprintln!("word-tally: {}: {err}", path.display());
                return ExitCode::FAILURE;
            }
        }
    }

    if let Err(err) = console.run() {
        eprintln!("word-tally: {err}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
