use clap::Parser;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use crossword_csp::{find_fill, render_grid, FillFailure, FillOptions, Puzzle, WordList};
use instant::Duration;

/// Fill a crossword structure with words from a word list
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Structure file: `_` marks a fillable cell, anything else a block
    structure: PathBuf,

    /// Word list file, one word per line
    words: PathBuf,

    /// Also write the filled grid to this file
    output: Option<PathBuf>,

    /// Give up after this many seconds
    #[arg(short, long, value_name = "SECONDS")]
    time_limit: Option<f64>,

    /// Enable debug logging (same as setting CROSSWORD_DEBUG)
    #[arg(short, long)]
    debug: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    crossword_csp::log::init_logger(cli.debug);

    match try_main(&cli) {
        Ok(code) => code,
        Err(e) => {
            if let Some(puzzle_err) = e.downcast_ref::<crossword_csp::PuzzleError>() {
                eprintln!("Error: {}", puzzle_err.display_detailed());
            } else {
                eprintln!("Error: {e}");
            }
            ExitCode::FAILURE
        }
    }
}

/// Load both files, fill the grid, and print the result. An unsatisfiable puzzle is a normal
/// outcome and exits successfully; running out of time does not.
fn try_main(cli: &Cli) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let puzzle = Puzzle::from_structure_str(&fs::read_to_string(&cli.structure)?)?;
    let word_list = WordList::parse_from_str(&fs::read_to_string(&cli.words)?);

    let mut options = FillOptions::default();
    if let Some(seconds) = cli.time_limit {
        options = options.with_time_limit(Duration::try_from_secs_f64(seconds)?);
    }

    log::info!(
        "Filling {} slots from {} words",
        puzzle.slot_count(),
        word_list.len()
    );

    match find_fill(&puzzle, &word_list, &options) {
        Ok(result) => {
            let grid = render_grid(&puzzle, &word_list, &result.assignment);
            println!("{grid}");

            if let Some(output) = &cli.output {
                fs::write(output, format!("{grid}\n"))?;
                log::info!("Wrote grid to {}", output.display());
            }

            eprintln!("{:?}", result.statistics);
            Ok(ExitCode::SUCCESS)
        }
        Err(failure) if failure.is_unsatisfiable() => {
            println!("No solution.");
            Ok(ExitCode::SUCCESS)
        }
        Err(FillFailure::Timeout) => {
            eprintln!("Timed out before finding a fill");
            Ok(ExitCode::FAILURE)
        }
        Err(failure) => {
            eprintln!("Fill stopped: {failure:?}");
            Ok(ExitCode::FAILURE)
        }
    }
}
