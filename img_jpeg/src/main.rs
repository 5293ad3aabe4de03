use clap::{Parser, ValueEnum};
use img_jpeg::config::{RunConfig, DEFAULT_QUALITY, DEFAULT_WORKERS};
use img_jpeg::converter::{convert_task, TARGET_EXTENSION};
use shared_utils::logging::{init_logging, LogConfig};
use shared_utils::pool::effective_workers;
use shared_utils::{
    check_dangerous_directory, collect_files, normalize_extensions, plan_tasks,
    print_summary_report, run_batch, summarize, validate_root, BatchProgress,
};
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "img_jpeg")]
#[command(version, about = "Batch HEIC/HEIF to JPEG converter", long_about = None)]
struct Cli {
    /// Root folder to scan for convertible images.
    #[arg(value_name = "ROOT")]
    root: PathBuf,

    /// Upper bound on concurrent conversions.
    #[arg(short = 'w', long, default_value_t = DEFAULT_WORKERS as u64,
          value_parser = clap::value_parser!(u64).range(1..))]
    workers: u64,

    /// JPEG encoder quality (1-100).
    #[arg(short = 'q', long, default_value_t = DEFAULT_QUALITY,
          value_parser = clap::value_parser!(u8).range(1..=100))]
    quality: u8,

    /// Keep source files after successful conversion.
    #[arg(short = 'k', long)]
    keep_originals: bool,

    /// Case-insensitive extension filters, comma separated.
    #[arg(long, value_delimiter = ',', default_values_t = [".heic".to_string(), ".heif".to_string()])]
    extensions: Vec<String>,

    /// Recurse into subdirectories.
    #[arg(short, long, default_value_t = true)]
    recursive: bool,

    /// Summary format.
    #[arg(short, long, value_enum, default_value = "human")]
    output: OutputFormat,

    #[arg(short, long)]
    verbose: bool,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Human,
    Json,
}

fn main() -> anyhow::Result<()> {
    let _ = init_logging("img_jpeg", LogConfig::default());

    let cli = Cli::parse();

    let config = RunConfig {
        root: cli.root,
        max_workers: cli.workers as usize,
        quality: cli.quality,
        keep_originals: cli.keep_originals,
        extensions: normalize_extensions(&cli.extensions),
        recursive: cli.recursive,
        verbose: cli.verbose,
    };

    // Fatal tier: configuration problems abort before any work is scheduled.
    if let Err(e) = validate_root(&config.root) {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
    if !config.keep_originals {
        if let Err(e) = check_dangerous_directory(&config.root) {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    }
    if config.extensions.is_empty() {
        eprintln!("❌ Error: no valid extensions to filter on");
        std::process::exit(1);
    }

    run(&config, cli.output)
}

fn run(config: &RunConfig, output: OutputFormat) -> anyhow::Result<()> {
    let start = Instant::now();

    let files = collect_files(&config.root, &config.extensions, config.recursive);
    if files.is_empty() {
        println!(
            "📂 No matching image files found in {}",
            config.root.display()
        );
        return Ok(());
    }

    let tasks = plan_tasks(&files, TARGET_EXTENSION);
    let workers = effective_workers(config.max_workers, tasks.len());

    println!(
        "📂 Found {} files to convert ({} workers, quality {}, keep originals: {})",
        tasks.len(),
        workers,
        config.quality,
        config.keep_originals
    );
    if config.verbose {
        println!(
            "🔧 Extensions: {:?} | recursive: {} | CPU cores: {}",
            config.extensions,
            config.recursive,
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(4)
        );
    }

    let progress = BatchProgress::new(tasks.len() as u64);
    let outcomes = run_batch(&tasks, config.max_workers, &progress, |task| {
        convert_task(task, config)
    })?;
    progress.finish();

    let summary = summarize(&outcomes);
    match output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
        OutputFormat::Human => print_summary_report(&summary, start.elapsed()),
    }

    // Partial failure is not a fatal run outcome; the summary carries it.
    Ok(())
}
