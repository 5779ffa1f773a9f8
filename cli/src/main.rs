//! docsift CLI - turn layout-detector output into clean Markdown

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use docsift::{
    read_regions, Docsift, DocsiftResult, HeuristicConfig, LineSignals,
    MarkdownOptions, RegionClass, DEFAULT_PAGE_HEIGHT, DEFAULT_PAGE_WIDTH,
};

#[derive(Parser)]
#[command(name = "docsift")]
#[command(version)]
#[command(about = "Clean layout-detector output into ordered Markdown", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Options shared by `process` and `batch`.
#[derive(clap::Args, Clone)]
struct ProcessArgs {
    /// JSON heuristics file (partial files override defaults)
    #[arg(long, value_name = "FILE", env = "DOCSIFT_CONFIG")]
    config: Option<PathBuf>,

    /// Also write surviving blocks as <stem>.jsonl
    #[arg(long)]
    save_json: bool,

    /// Also write removed license and reference text under removed/
    #[arg(long)]
    save_removed: bool,

    /// Process pages on one thread
    #[arg(long)]
    sequential: bool,

    /// Page width the region boxes refer to
    #[arg(long, default_value_t = DEFAULT_PAGE_WIDTH)]
    page_width: f32,

    /// Page height the region boxes refer to
    #[arg(long, default_value_t = DEFAULT_PAGE_HEIGHT)]
    page_height: f32,

    /// Prefix headings with '#'
    #[arg(long)]
    atx_headings: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Process one region file (JSON Lines) into Markdown
    Process {
        /// Region records, one JSON object per line
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Output directory
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,

        #[command(flatten)]
        args: ProcessArgs,
    },

    /// Process every *.jsonl file in a directory
    Batch {
        /// Directory of region files
        #[arg(value_name = "DIR")]
        input: PathBuf,

        /// Output directory
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,

        #[command(flatten)]
        args: ProcessArgs,
    },

    /// Show the citation score of a line and the signals behind it
    Score {
        /// Line of text to score
        #[arg(value_name = "LINE")]
        line: String,

        /// JSON heuristics file with custom score weights
        #[arg(long, value_name = "FILE", env = "DOCSIFT_CONFIG")]
        config: Option<PathBuf>,

        /// Output JSON
        #[arg(long)]
        json: bool,
    },

    /// Show region counts of a region file
    Info {
        /// Region records, one JSON object per line
        #[arg(value_name = "INPUT")]
        input: PathBuf,
    },

    /// Show version information
    Version,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Process {
            input,
            output,
            args,
        } => cmd_process(&input, output.as_deref(), &args),
        Commands::Batch {
            input,
            output,
            args,
        } => cmd_batch(&input, &output, &args),
        Commands::Score { line, config, json } => cmd_score(&line, config.as_deref(), json),
        Commands::Info { input } => cmd_info(&input),
        Commands::Version => {
            cmd_version();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn load_config(path: Option<&Path>) -> Result<HeuristicConfig, Box<dyn std::error::Error>> {
    match path {
        Some(path) => {
            log::info!("Loading heuristics from {}", path.display());
            Ok(HeuristicConfig::load(path)?)
        }
        None => Ok(HeuristicConfig::default()),
    }
}

fn build_docsift(args: &ProcessArgs) -> Result<Docsift, Box<dyn std::error::Error>> {
    let mut docsift = Docsift::new()
        .with_config(load_config(args.config.as_deref())?)
        .with_page_size(args.page_width, args.page_height)
        .with_markdown_options(MarkdownOptions::new().with_atx_headings(args.atx_headings));
    if args.sequential {
        docsift = docsift.sequential();
    }
    Ok(docsift)
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .unwrap_or_default()
        .to_string_lossy()
        .into_owned()
}

/// Write `<stem>.md` and the optional side outputs. Returns the paths written.
fn write_outputs(
    result: &DocsiftResult,
    stem: &str,
    output_dir: &Path,
    args: &ProcessArgs,
) -> Result<Vec<PathBuf>, Box<dyn std::error::Error>> {
    fs::create_dir_all(output_dir)?;
    let mut written = Vec::new();

    let md_path = output_dir.join(format!("{}.md", stem));
    fs::write(&md_path, result.to_markdown())?;
    written.push(md_path);

    if args.save_json {
        let json_path = output_dir.join(format!("{}.jsonl", stem));
        fs::write(&json_path, result.to_jsonl()?)?;
        written.push(json_path);
    }

    if args.save_removed {
        let removed_dir = output_dir.join("removed");
        fs::create_dir_all(&removed_dir)?;

        let licenses = removed_dir.join(format!("{}_removed_licenses.md", stem));
        fs::write(&licenses, result.removed_licenses_markdown())?;
        written.push(licenses);

        let references = removed_dir.join(format!("{}_removed_references.md", stem));
        fs::write(&references, result.removed_references_markdown())?;
        written.push(references);
    }

    Ok(written)
}

fn cmd_process(
    input: &Path,
    output: Option<&Path>,
    args: &ProcessArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let stem = file_stem(input);
    let output_dir = output
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| PathBuf::from(format!("{}_output", stem)));

    let result = build_docsift(args)?.process_file(input)?;
    let written = write_outputs(&result, &stem, &output_dir, args)?;

    let stats = &result.document.stats;
    println!(
        "{} {} pages, {} regions -> {} blocks",
        "Processed".green().bold(),
        stats.page_count,
        stats.regions_in,
        stats.blocks_out
    );
    println!(
        "  {} {} license, {} reference",
        "Removed:".dimmed(),
        stats.license_hits,
        stats.references_removed
    );

    println!("\n{}", "Output files:".green().bold());
    for (i, path) in written.iter().enumerate() {
        let branch = if i + 1 == written.len() { "└─" } else { "├─" };
        println!("  {} {}", branch.dimmed(), path.display());
    }

    Ok(())
}

fn cmd_batch(
    input: &Path,
    output: &Path,
    args: &ProcessArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut files: Vec<PathBuf> = fs::read_dir(input)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().is_some_and(|ext| ext == "jsonl"))
        .collect();
    files.sort();

    if files.is_empty() {
        println!("{} {}", "No .jsonl files in".yellow(), input.display());
        return Ok(());
    }

    let docsift = build_docsift(args)?;

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    let mut failures = Vec::new();
    for path in &files {
        let stem = file_stem(path);
        pb.set_message(stem.clone());
        let outcome = docsift
            .process_file(path)
            .map_err(Box::<dyn std::error::Error>::from)
            .and_then(|result| write_outputs(&result, &stem, output, args));
        if let Err(e) = outcome {
            log::warn!("Failed to process {}: {}", path.display(), e);
            failures.push((path.clone(), e.to_string()));
        }
        pb.inc(1);
    }
    pb.finish_with_message("Done!");

    println!(
        "\n{} {} of {} files",
        "Processed".green().bold(),
        files.len() - failures.len(),
        files.len()
    );
    for (path, error) in &failures {
        println!("  {} {}: {}", "Failed".red(), path.display(), error);
    }

    Ok(())
}

fn cmd_score(
    line: &str,
    config: Option<&Path>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(config)?;
    let weights = &config.scrub.reference.weights;
    let signals = LineSignals::detect(line);
    let score = signals.score(weights);

    if json {
        let value = serde_json::json!({
            "line": line,
            "score": score,
            "signals": signals.fired(),
            "commas": signals.commas,
            "chars": signals.chars,
            "strong": signals.core_count() >= weights.strong_signals,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    let reference = &config.scrub.reference;
    let verdict = if score > reference.any_line_threshold {
        "citation".red().bold()
    } else if score > reference.list_line_threshold {
        "citation as a list item".yellow()
    } else {
        "prose".green()
    };

    println!("{}: {:.2} ({})", "Score".bold(), score, verdict);
    let fired = signals.fired();
    if fired.is_empty() {
        println!("{}: none", "Signals".bold());
    } else {
        println!("{}: {}", "Signals".bold(), fired.join(", "));
    }
    println!("{}: {}", "Commas".bold(), signals.commas);
    println!("{}: {}", "Characters".bold(), signals.chars);

    Ok(())
}

fn cmd_info(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let regions = read_regions(input)?;

    let mut by_class: BTreeMap<RegionClass, usize> = BTreeMap::new();
    let mut by_page: BTreeMap<u32, usize> = BTreeMap::new();
    for region in &regions {
        *by_class.entry(region.class).or_default() += 1;
        *by_page.entry(region.page).or_default() += 1;
    }

    println!("{}", "Region Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "File".bold(), input.display());
    println!("{}: {}", "Regions".bold(), regions.len());
    println!("{}: {}", "Pages".bold(), by_page.len());

    println!();
    println!("{}", "By Class".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    for (class, count) in &by_class {
        println!("{:>16}: {}", class.to_string().bold(), count);
    }

    println!();
    println!("{}", "By Page".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    for (page, count) in &by_page {
        println!("{:>16}: {}", format!("page {}", page).bold(), count);
    }

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "docsift".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Layout post-processing for scientific papers");
    println!();
    println!("License: MIT");
}
