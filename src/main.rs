//! Polyomino Packer
//!
//! Packs a rectangular board exactly with a chosen set of blocks, from the
//! monomino up to the U and X pentominoes. The board is sized automatically
//! from the total block area unless a width and height are given.

use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use log::info;

use blockfit::grid::{format_shape, format_solution};
use blockfit::pieces::{Catalog, PieceId};
use blockfit::{PackError, Request, SolveConfig, Status};

/// Packs polyomino blocks into a rectangle.
#[derive(Parser)]
#[command(name = "blockfit")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Pack the requested blocks and print the board.
    Solve(SolveArgs),
    /// List the available blocks.
    Pieces,
}

#[derive(Args)]
struct SolveArgs {
    /// Block counts such as `L=2` or `X=1`.
    #[arg(required = true, value_parser = parse_count)]
    counts: Vec<PieceCount>,
    /// Board width; sized from the block area when omitted.
    #[arg(long, requires = "height")]
    width: Option<usize>,
    /// Board height; sized from the block area when omitted.
    #[arg(long, requires = "width")]
    height: Option<usize>,
    /// Time budget in milliseconds.
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    time_ms: Option<u64>,
    /// Seed for a reproducible search order.
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct PieceCount {
    id: PieceId,
    count: usize,
}

/// Parses `ID=COUNT`, e.g. `T=3`.
fn parse_count(arg: &str) -> Result<PieceCount, PackError> {
    let invalid = || PackError::InvalidConfiguration(format!("expected ID=COUNT, got '{arg}'"));

    let (id, count) = arg.split_once('=').ok_or_else(invalid)?;
    let mut chars = id.trim().chars();
    let (Some(id), None) = (chars.next(), chars.next()) else {
        return Err(invalid());
    };
    let count = count.trim().parse().map_err(|_| invalid())?;

    Ok(PieceCount {
        id: id.to_ascii_uppercase(),
        count,
    })
}

fn main() -> blockfit::Result<()> {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();

    let cli = Cli::parse();
    let catalog = Catalog::builtin();

    match cli.command {
        Some(Command::Solve(args)) => run_solve(&catalog, args),
        Some(Command::Pieces) | None => {
            print!("{}", list_pieces(&catalog));
            Ok(())
        }
    }
}

/// Solves one request and prints the board and summary.
fn run_solve(catalog: &Catalog, args: SolveArgs) -> blockfit::Result<()> {
    let mut config = SolveConfig::from_env()?;
    if let Some(millis) = args.time_ms {
        config = config.with_time_budget_ms(millis);
    }
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }

    let counts: Vec<(PieceId, usize)> = args.counts.iter().map(|c| (c.id, c.count)).collect();
    let request = match (args.width, args.height) {
        (Some(width), Some(height)) => Request::new(catalog, width, height, &counts)?,
        _ => Request::with_auto_dimensions(catalog, &counts)?,
    };

    info!(
        "Packing {} blocks into a {}x{} board (budget {:?})",
        request.piece_count(),
        request.width,
        request.height,
        config.time_budget
    );
    let outcome = blockfit::solve(&request, &config);

    if outcome.is_solved() {
        println!("{}", format_solution(&outcome.placements, request.width, request.height));
    }
    print!("{}", summary(&request, outcome.elapsed, outcome.status));

    Ok(())
}

/// Lists every block with its icon.
fn list_pieces(catalog: &Catalog) -> String {
    let mut output = String::new();
    for piece in catalog.pieces() {
        output.push_str(&format!(
            "{}  {} (area {}, orientations {})\n",
            piece.id,
            piece.name,
            piece.area(),
            piece.orientations.len()
        ));
        if let Some(shape) = piece.orientations.first() {
            output.push_str(&format_shape(shape));
        }
        output.push('\n');
    }
    output
}

/// Formats a duration as milliseconds below one second, seconds otherwise.
fn format_elapsed(elapsed: Duration) -> String {
    let millis = elapsed.as_secs_f64() * 1000.0;
    if millis < 1000.0 {
        format!("{millis:.2} ms")
    } else {
        format!("{:.2} seconds", millis / 1000.0)
    }
}

/// Text summary of one run.
fn summary(request: &Request<'_>, elapsed: Duration, status: Status) -> String {
    let selected: Vec<String> = request
        .pieces
        .iter()
        .map(|(piece, count)| format!("{count} x {}", piece.name))
        .collect();
    let selected = if selected.is_empty() {
        "None".to_string()
    } else {
        selected.join(", ")
    };

    let result = match status {
        Status::Solved => "Solution found",
        Status::Exhausted => "No solution exists for these blocks.",
        Status::TimedOut => "No solution found within the time limit.",
    };

    format!(
        "Selected blocks: {selected}\n\
         Board area: {} x {} (total blocks: {})\n\
         Time to find solution: {}\n\
         Result: {result}\n",
        request.width,
        request.height,
        request.piece_count(),
        format_elapsed(elapsed)
    )
}
