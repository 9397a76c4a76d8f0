use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use crossword_fill::{load_crossword, render_grid, solve, FillFailure, SolverConfig};
use instant::Duration;

/// Fill a crossword grid from a word list.
#[derive(Parser, Debug)]
#[command(name = "crossword-fill", version, about)]
struct Cli {
    /// Structure file: one row per line, `_` for open cells, anything else for blocks.
    structure: PathBuf,

    /// Word list, one word per line.
    words: PathBuf,

    /// Also write the filled grid to this file.
    output: Option<PathBuf>,

    /// Skip re-running arc consistency after each tentative assignment.
    #[arg(long, default_value_t = false)]
    no_propagation: bool,

    /// Don't prune a chosen word from the other slots' candidates up front. Duplicate words are
    /// still rejected when they're assigned.
    #[arg(long, default_value_t = false)]
    allow_duplicates: bool,

    /// Give up after visiting this many search states.
    #[arg(long)]
    max_states: Option<u64>,

    /// Give up after this many milliseconds.
    #[arg(long)]
    time_limit_ms: Option<u64>,

    /// Print solver statistics to stderr.
    #[arg(long, default_value_t = false)]
    stats: bool,
}

impl Cli {
    fn solver_config(&self) -> SolverConfig {
        let mut config = SolverConfig::default()
            .with_propagation(!self.no_propagation)
            .with_duplicate_pruning(!self.allow_duplicates);

        if let Some(max_states) = self.max_states {
            config = config.with_max_states(max_states);
        }
        if let Some(time_limit_ms) = self.time_limit_ms {
            config = config.with_time_limit(Duration::from_millis(time_limit_ms));
        }

        config
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let crossword = load_crossword(&cli.structure, &cli.words)
        .context("Failed to load the crossword")?;

    match solve(&crossword, &cli.solver_config()) {
        Ok(result) => {
            if cli.stats {
                eprintln!("{:?}", result.statistics);
            }

            let display_grid = render_grid(&crossword, &result.assignment);
            println!("{}", display_grid);

            if let Some(output) = &cli.output {
                fs::write(output, display_grid + "\n")
                    .with_context(|| format!("Unable to write '{}'", output.display()))?;
            }
        }
        Err(failure) => {
            if cli.stats {
                eprintln!("{:?}", failure.statistics());
            }

            match &failure {
                FillFailure::NoSolution { .. } => println!("No solution."),
                FillFailure::BudgetExhausted { .. } => println!("No solution found: {}.", failure),
            }
        }
    }

    Ok(())
}
