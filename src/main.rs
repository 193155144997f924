use std::error::Error;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use instant::Duration;

use crossfill::observer::LoggingObserver;
use crossfill::{
    find_fill, FillFailure, FillOptions, Grid, Inference, LetterGrid, NoopObserver, ValueOrdering,
    WordList, DEFAULT_OPEN_SYMBOL,
};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OrderingArg {
    LeastConstraining,
    Lexicographic,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum InferenceArg {
    None,
    ForwardChecking,
    Mac,
}

/// Fill a crossword structure with words from a word list
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Structure layout file, one row per line
    structure: PathBuf,

    /// Word list file, one word per line (words are uppercased)
    words: PathBuf,

    /// Char marking an open cell in the structure; any other char is a block
    #[arg(long, default_value_t = DEFAULT_OPEN_SYMBOL)]
    open: char,

    /// Order in which candidate words are tried
    #[arg(long, value_enum, default_value_t = OrderingArg::LeastConstraining)]
    ordering: OrderingArg,

    /// Pruning applied after each placement
    #[arg(long, value_enum, default_value_t = InferenceArg::ForwardChecking)]
    inference: InferenceArg,

    /// Skip the arc consistency pass before searching
    #[arg(long)]
    no_initial_arc_consistency: bool,

    /// Give up after this many milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Log every search step
    #[arg(long)]
    trace: bool,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    crossfill::logging::init_logger(cli.debug, cli.trace);

    match try_main(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(2),
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Load the inputs, run the fill and print the result. Returns whether a fill was found.
fn try_main(cli: &Cli) -> Result<bool, Box<dyn Error>> {
    let structure = fs::read_to_string(&cli.structure)
        .map_err(|e| format!("couldn't read {}: {e}", cli.structure.display()))?;
    let grid = Grid::parse(&structure, cli.open)?;

    let word_text = fs::read_to_string(&cli.words)
        .map_err(|e| format!("couldn't read {}: {e}", cli.words.display()))?;
    let words = WordList::parse(&word_text.to_uppercase());

    log::info!("Loaded {}x{} grid and {} words", grid.width(), grid.height(), words.len());

    let mut options = FillOptions {
        value_ordering: match cli.ordering {
            OrderingArg::LeastConstraining => ValueOrdering::LeastConstraining,
            OrderingArg::Lexicographic => ValueOrdering::Lexicographic,
        },
        inference: match cli.inference {
            InferenceArg::None => Inference::None,
            InferenceArg::ForwardChecking => Inference::ForwardChecking,
            InferenceArg::Mac => Inference::MaintainArcConsistency,
        },
        initial_arc_consistency: !cli.no_initial_arc_consistency,
        ..FillOptions::default()
    };
    if let Some(timeout_ms) = cli.timeout_ms {
        options = options.with_timeout(Duration::from_millis(timeout_ms));
    }

    let result = if cli.trace {
        find_fill(&grid, &words, &options, &mut LoggingObserver)
    } else {
        find_fill(&grid, &words, &options, &mut NoopObserver)
    };

    match result {
        Ok(success) => {
            println!("{}", LetterGrid::project(&grid, &words, &success.assignment));
            eprintln!("{:?}", success.statistics);
            Ok(true)
        }
        Err(FillFailure::NoSolution) => {
            eprintln!("No fill exists for this grid and word list");
            Ok(false)
        }
        Err(FillFailure::Timeout) => Err("timed out before finding a fill".into()),
        Err(FillFailure::Abort) => Err("fill aborted".into()),
    }
}
