//! Verse Diff command-line tool
//!
//! Compares chapters (or single verses) of two Bible translations word by
//! word and reports which tokens are shared and which are unique to each.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use verse_diff::align;
use verse_diff::compare::{compare_chapters, compare_verses_with};
use verse_diff::load::{load_chapter, verse_content};
use verse_diff::models::{ComparisonParams, MatchMode, TieBreak, Token};
use verse_diff::output::{
    format_verse_diff, print_summary, print_verse_diffs, write_csv_file, write_json_file,
    write_text_file, write_verse_json,
};
use verse_diff::telemetry;

#[derive(Parser)]
#[command(name = "verse-diff")]
#[command(about = "Word-level comparison of Bible translations")]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Output format for chapter comparison results
#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    /// JSON file with every verse diff
    Json,
    /// CSV file, one row per diff entry
    Csv,
    /// Plain text with [-removed-] and {+added+} markers
    Text,
}

/// Token matching mode (CLI version, mirrors models::MatchMode)
#[derive(Clone, Copy, Debug, ValueEnum)]
enum CliMatchMode {
    /// Exact token text equality
    Exact,
    /// Fold quotes, question marks, case and whitespace runs
    Normalized,
}

impl From<CliMatchMode> for MatchMode {
    fn from(mode: CliMatchMode) -> Self {
        match mode {
            CliMatchMode::Exact => MatchMode::Exact,
            CliMatchMode::Normalized => MatchMode::Normalized,
        }
    }
}

/// Backtrack tie-break policy (CLI version, mirrors models::TieBreak)
#[derive(Clone, Copy, Debug, ValueEnum)]
enum CliTieBreak {
    /// Consume the other side first (default)
    PreferAdded,
    /// Consume the base side first
    PreferRemoved,
}

impl From<CliTieBreak> for TieBreak {
    fn from(tie_break: CliTieBreak) -> Self {
        match tie_break {
            CliTieBreak::PreferAdded => TieBreak::PreferAdded,
            CliTieBreak::PreferRemoved => TieBreak::PreferRemoved,
        }
    }
}

/// Comparison parameters shared by `compare` and `verse`.
///
/// Unset options inherit from ComparisonParams::default().
#[derive(Args)]
struct ParamArgs {
    /// Token matching mode [default: exact]
    #[arg(long, value_enum)]
    mode: Option<CliMatchMode>,

    /// Tie-break policy for equal-length alignments [default: prefer-added]
    #[arg(long, value_enum)]
    tie_break: Option<CliTieBreak>,

    /// Insert a space between segments that run words together
    #[arg(long)]
    implicit_spacing: bool,

    /// Always align, even when the raw verse content is identical
    #[arg(long)]
    no_precheck: bool,
}

impl ParamArgs {
    fn into_params(self) -> ComparisonParams {
        // Start with library defaults and overlay what the user set
        let defaults = ComparisonParams::default();

        ComparisonParams {
            mode: self.mode.map(MatchMode::from).unwrap_or(defaults.mode),
            tie_break: self
                .tie_break
                .map(TieBreak::from)
                .unwrap_or(defaults.tie_break),
            implicit_spacing: self.implicit_spacing || defaults.implicit_spacing,
            precheck: defaults.precheck && !self.no_precheck,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Compare two chapters verse by verse
    Compare {
        /// Base translation chapter (JSON)
        #[arg(long)]
        base: PathBuf,

        /// Comparison translation chapter (JSON)
        #[arg(long)]
        other: PathBuf,

        /// Output file path
        #[arg(long)]
        output: PathBuf,

        /// Output format
        #[arg(long, value_enum, default_value = "json")]
        format: OutputFormat,

        /// Also output CSV file (derived from output path)
        #[arg(long)]
        csv: bool,

        #[command(flatten)]
        params: ParamArgs,

        /// Suppress progress output
        #[arg(long)]
        quiet: bool,

        /// Print first N differing verses to console
        #[arg(long)]
        show_verses: Option<usize>,
    },

    /// Compare a single verse and print the diff
    Verse {
        /// Base translation chapter (JSON)
        #[arg(long)]
        base: PathBuf,

        /// Comparison translation chapter (JSON)
        #[arg(long)]
        other: PathBuf,

        /// Verse number
        #[arg(long)]
        number: u32,

        /// Print `{ baseDiff, otherDiff }` JSON instead of markers
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        params: ParamArgs,
    },

    /// Benchmark alignment performance
    Benchmark {
        /// Number of alignment iterations
        #[arg(long, default_value = "1000")]
        iterations: usize,

        /// Token sequence size
        #[arg(long, default_value = "120")]
        size: usize,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    telemetry::init(cli.verbose);

    match cli.command {
        Commands::Compare {
            base,
            other,
            output,
            format,
            csv,
            params,
            quiet,
            show_verses,
        } => {
            let params = params.into_params();

            if !quiet {
                eprintln!("Loading {}...", base.display());
            }
            let base_doc = load_chapter(&base)?;

            if !quiet {
                eprintln!("Loading {}...", other.display());
            }
            let other_doc = load_chapter(&other)?;

            let result = compare_chapters(&base_doc, &other_doc, &params, !quiet);

            match format {
                OutputFormat::Json => write_json_file(&result, &output)?,
                OutputFormat::Csv => write_csv_file(&result.verses, &output)?,
                OutputFormat::Text => write_text_file(&result, &output)?,
            }

            // Also output CSV if requested (and not already CSV format)
            if csv && !matches!(format, OutputFormat::Csv) {
                let csv_path = output.with_extension("csv");
                write_csv_file(&result.verses, &csv_path)?;
                if !quiet {
                    eprintln!("CSV output: {}", csv_path.display());
                }
            }

            if !quiet {
                print_summary(&result);
                eprintln!("\nOutput: {}", output.display());
            }

            if let Some(limit) = show_verses {
                println!("\n=== Differing Verses ===");
                print_verse_diffs(&result.verses, Some(limit));
            }
        }

        Commands::Verse {
            base,
            other,
            number,
            json,
            params,
        } => {
            let params = params.into_params();
            let base_doc = load_chapter(&base)?;
            let other_doc = load_chapter(&other)?;

            let diff = compare_verses_with(
                verse_content(&base_doc, number)?,
                verse_content(&other_doc, number)?,
                &params,
            );

            if json {
                let mut stdout = std::io::stdout().lock();
                write_verse_json(&diff, &mut stdout)?;
                println!();
            } else if diff.is_identical() {
                println!("Verse {}: identical", number);
            } else {
                println!("Verse {}:", number);
                println!("{}", format_verse_diff(&diff));
            }
        }

        Commands::Benchmark { iterations, size } => {
            run_benchmark(iterations, size);
        }
    }

    Ok(())
}

/// Word/space token stream `w0 w1 w2 ...` with every `k`th word replaced.
fn synthetic_tokens(size: usize, replace_every: Option<usize>) -> Vec<Token> {
    let mut tokens = Vec::with_capacity(size);
    for i in 0..size {
        if i % 2 == 1 {
            tokens.push(Token::space());
            continue;
        }
        let word = match replace_every {
            Some(k) if (i / 2) % k == 0 => format!("x{}", i),
            _ => format!("w{}", i),
        };
        tokens.push(Token::new(word, false));
    }
    tokens
}

/// Run alignment benchmark to measure performance.
fn run_benchmark(iterations: usize, size: usize) {
    use std::time::Instant;

    println!("=== Alignment Benchmark ===");
    println!("Iterations: {}", iterations);
    println!("Sequence size: {}", size);

    let params = ComparisonParams::default();
    let seq_identical = synthetic_tokens(size, None);
    let seq_partial = synthetic_tokens(size, Some(3));
    let seq_no_match: Vec<Token> = (0..size)
        .map(|i| Token::new(format!("z{}", i), false))
        .collect();

    let cases = [
        ("Identical sequences", &seq_identical, &seq_identical),
        ("Partial match sequences", &seq_identical, &seq_partial),
        ("No match sequences", &seq_identical, &seq_no_match),
    ];

    for (label, a, b) in cases {
        println!("\n{}:", label);
        let start = Instant::now();
        for _ in 0..iterations {
            let _ = align::align_tokens_with(a, b, &params);
        }
        let elapsed = start.elapsed();
        let per_alignment = elapsed.as_secs_f64() / iterations.max(1) as f64;
        println!("  Total time: {:.3}s", elapsed.as_secs_f64());
        println!("  Per alignment: {:.3}ms", per_alignment * 1000.0);
        if per_alignment > 0.0 {
            println!("  Alignments/sec: {:.0}", 1.0 / per_alignment);
        }
    }
}
