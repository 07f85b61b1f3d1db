use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use similar::{ChangeTag, TextDiff};
use std::fs;
use std::path::{Path, PathBuf};
use tree_splice::{
    load_from_path, resolve_edits, Document, EditResult, EditVerification, Grammar,
};

#[derive(Parser)]
#[command(name = "tree-splice")]
#[command(about = "Apply batches of edits to a source file and its syntax tree", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply a batch file to a source file and report what changed
    Apply {
        /// Source file to edit (never written back)
        source: PathBuf,

        /// TOML batch file describing the edits
        #[arg(short, long)]
        batch: PathBuf,

        /// Grammar to parse with (overrides `meta.language` in the batch)
        #[arg(short, long)]
        language: Option<String>,

        /// Show unified diff of changes
        #[arg(short, long, conflicts_with = "json")]
        diff: bool,

        /// Emit the edit result as JSON
        #[arg(long, conflicts_with = "print")]
        json: bool,

        /// Print the edited source instead of a report
        #[arg(long)]
        print: bool,
    },

    /// Print the syntax tree of a source file as an S-expression
    Tree {
        source: PathBuf,

        #[arg(short, long)]
        language: String,
    },

    /// Print the xxh3 digest of a byte span, for `expected_xxh3` in batch files
    Digest {
        source: PathBuf,

        #[arg(long)]
        start: usize,

        #[arg(long)]
        end: usize,
    },

    /// List available grammars
    Languages,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Apply {
            source,
            batch,
            language,
            diff,
            json,
            print,
        } => cmd_apply(&source, &batch, language, diff, json, print),

        Commands::Tree { source, language } => cmd_tree(&source, &language),

        Commands::Digest { source, start, end } => cmd_digest(&source, start, end),

        Commands::Languages => cmd_languages(),
    }
}

fn read_source(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

/// Helper: Show unified diff between original and modified content
fn display_diff(file: &Path, original: &str, modified: &str) {
    println!(
        "\n{}",
        format!("--- {} (original)", file.display()).dimmed()
    );
    println!("{}", format!("+++ {} (edited)", file.display()).dimmed());

    let diff = TextDiff::from_lines(original, modified);

    for change in diff.iter_all_changes() {
        let sign = match change.tag() {
            ChangeTag::Delete => format!("-{}", change).red(),
            ChangeTag::Insert => format!("+{}", change).green(),
            ChangeTag::Equal => format!(" {}", change).normal(),
        };
        print!("{}", sign);
    }
}

fn cmd_apply(
    source_path: &Path,
    batch_path: &Path,
    language: Option<String>,
    show_diff: bool,
    json: bool,
    print: bool,
) -> Result<()> {
    let config = load_from_path(batch_path)?;
    let Some(language) = language.or_else(|| config.meta.language.clone()) else {
        bail!("no language given: pass --language or set meta.language in the batch file");
    };

    let original = read_source(source_path)?;
    let mut doc = Document::parse(&language, original.as_str())?;
    let errors_before = doc.error_ranges().len();

    let edits = resolve_edits(&config, &original)?;
    let result = doc
        .apply_edits(edits)
        .with_context(|| format!("batch {} was not applied", batch_path.display()))?;

    let errors_after = doc.error_ranges().len();
    if errors_after > errors_before {
        log::warn!(
            "{} syntax errors after editing, {} before",
            errors_after,
            errors_before
        );
        eprintln!(
            "{}",
            format!(
                "Warning: edits introduced {} new syntax error(s)",
                errors_after - errors_before
            )
            .yellow()
        );
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else if print {
        print!("{}", doc.source());
    } else {
        report(source_path, &result);
    }

    if show_diff {
        display_diff(source_path, &original, doc.source());
    }

    Ok(())
}

fn report(file: &Path, result: &EditResult) {
    println!("File: {}", file.display());
    println!();

    for applied in &result.applied_edits {
        println!(
            "{} {:?} -> {:?}",
            "✓".green(),
            applied.old_text,
            applied.replacement
        );
        println!(
            "    before {}  after {}",
            applied.before.to_string().dimmed(),
            applied.after
        );
    }

    println!();
    println!("{}", "Changed syntax:".bold());
    if result.changed_ranges.is_empty() {
        println!("  {}", "none".dimmed());
    }
    for range in &result.changed_ranges {
        println!(
            "  {}..{} (bytes {}..{})",
            range.start.point.pretty(true),
            range.end.point.pretty(true),
            range.start.byte,
            range.end.byte
        );
    }

    println!();
    println!("{}", "Summary:".bold());
    println!(
        "  {} edits applied",
        format!("{}", result.applied_edits.len()).green()
    );
    println!(
        "  {} changed ranges",
        format!("{}", result.changed_ranges.len()).cyan()
    );
}

fn cmd_tree(source_path: &Path, language: &str) -> Result<()> {
    let source = read_source(source_path)?;
    let doc = Document::parse(language, source)?;

    println!("{}", doc.to_sexp());

    for range in doc.error_ranges() {
        eprintln!(
            "{} syntax error at {}",
            "✗".red(),
            range.start.point.pretty(true)
        );
    }

    Ok(())
}

fn cmd_digest(source_path: &Path, start: usize, end: usize) -> Result<()> {
    let source = read_source(source_path)?;
    let Some(text) = source.get(start..end) else {
        bail!(
            "bytes {}..{} are not a valid span of {} ({} bytes)",
            start,
            end,
            source_path.display(),
            source.len()
        );
    };

    println!("{:#018x}", EditVerification::digest(text));
    Ok(())
}

fn cmd_languages() -> Result<()> {
    println!("{}", "Available grammars:".bold());
    for name in Grammar::available() {
        println!("  {}", name);
    }
    Ok(())
}
