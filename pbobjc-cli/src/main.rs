use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use pbobjc_codegen::{CodeGenerator, GeneratorOptions, OutputStyle};
use pbobjc_descriptor::types::common::Severity;
use pbobjc_descriptor::{ResolvedFile, ValidationReport};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(
    name = "pbobjc",
    about = "pbobjc – Objective-C extension code from protobuf descriptors"
)]
#[command(version, propagate_version = true)]
struct Cli {
    /// Log more (-v for info, -vv for debug). RUST_LOG takes precedence.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Load and resolve descriptors, then show a summary
    Check {
        /// Descriptor directory (defaults to current directory)
        #[arg(default_value = ".")]
        path: PathBuf,
    },
    /// Generate Objective-C sources for every file that declares extensions
    Generate(GenerateArgs),
}

#[derive(Args)]
struct GenerateArgs {
    /// Descriptor directory (defaults to current directory)
    #[arg(default_value = ".")]
    path: PathBuf,
    /// Output directory (defaults to <path>/.pbobjc/generated)
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Header mapping file, may be repeated
    #[arg(long = "mapping")]
    mappings: Vec<PathBuf>,
    /// Layout of generated files
    #[arg(long, value_enum)]
    output_style: Option<StyleArg>,
    /// Write the mappings of all known headers to this file
    #[arg(long)]
    output_mapping: Option<PathBuf>,
    /// Options file (defaults to <path>/pbobjc.config.json when present)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum StyleArg {
    Package,
    None,
}

impl From<StyleArg> for OutputStyle {
    fn from(style: StyleArg) -> Self {
        match style {
            StyleArg::Package => OutputStyle::Package,
            StyleArg::None => OutputStyle::None,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Command::Check { path } => cmd_check(&path),
        Command::Generate(args) => cmd_generate(&args),
    };

    match result {
        Ok(success) => {
            if success {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(1)
            }
        }
        Err(e) => {
            eprintln!("{} {e:#}", "error:".red().bold());
            ExitCode::from(1)
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Load and resolve every descriptor under `path`, merging both reports.
fn load_and_resolve(path: &Path) -> Result<(Vec<ResolvedFile>, ValidationReport)> {
    let (set, mut report) = pbobjc_descriptor::load_descriptor_set(path)
        .with_context(|| format!("Failed to load descriptors at '{}'", path.display()))?;
    let (resolved, resolve_report) = pbobjc_descriptor::resolve_set(&set);
    report.merge(resolve_report);
    Ok((resolved, report))
}

/// Print every entry of the report. Returns (errors, warnings).
fn print_report(report: &ValidationReport) -> (usize, usize) {
    for entry in &report.errors {
        let severity_str = match entry.severity {
            Severity::Error => "error".red().bold(),
            Severity::Warning => "warning".yellow().bold(),
            Severity::Info => "info".blue().bold(),
        };

        println!(
            "  {} [{}] {} ({}:{})",
            severity_str,
            entry.code.dimmed(),
            entry.message,
            entry.file.dimmed(),
            entry.path.dimmed(),
        );

        if let Some(suggestion) = &entry.suggestion {
            println!("    {} {}", "hint:".cyan(), suggestion);
        }
    }

    (report.count(Severity::Error), report.count(Severity::Warning))
}

fn cmd_check(path: &Path) -> Result<bool> {
    println!(
        "{} {}",
        "Checking".bold(),
        path.canonicalize()
            .unwrap_or_else(|_| path.to_path_buf())
            .display()
    );

    let (resolved, report) = load_and_resolve(path)?;
    let (error_count, warning_count) = print_report(&report);

    println!();
    println!("{}", "Descriptor Files".bold().underline());
    for file in &resolved {
        println!(
            "  {} {} ({} extension(s))",
            file.file.name,
            file.path.dimmed(),
            file.extensions.len()
        );
    }

    let extension_count: usize = resolved.iter().map(|f| f.extensions.len()).sum();

    println!();
    if error_count == 0 && warning_count == 0 {
        println!(
            "{} {} file(s), {} extension(s)",
            "✓".green().bold(),
            resolved.len(),
            extension_count,
        );
        Ok(true)
    } else if error_count == 0 {
        println!(
            "{} Valid with {} warning(s)",
            "⚠".yellow().bold(),
            warning_count,
        );
        Ok(true)
    } else {
        println!(
            "{} {} error(s), {} warning(s)",
            "✗".red().bold(),
            error_count,
            warning_count,
        );
        Ok(false)
    }
}

/// Options from the config file, overridden by command-line flags.
fn generator_options(args: &GenerateArgs) -> Result<GeneratorOptions> {
    let config_path = match &args.config {
        Some(p) => Some(p.clone()),
        None => Some(args.path.join(GeneratorOptions::FILE_NAME)).filter(|p| p.is_file()),
    };

    let mut options = match config_path {
        Some(p) => GeneratorOptions::load(&p)
            .with_context(|| format!("Failed to read options from '{}'", p.display()))?,
        None => GeneratorOptions::default(),
    };

    if !args.mappings.is_empty() {
        options.header_mappings = args.mappings.clone();
    }
    if let Some(style) = args.output_style {
        options.output_style = style.into();
    }
    if let Some(out) = &args.output_mapping {
        options.output_mapping = Some(out.clone());
    }

    Ok(options)
}

fn cmd_generate(args: &GenerateArgs) -> Result<bool> {
    let path = args.path.as_path();
    println!(
        "{} {}",
        "Generating code from".bold(),
        path.canonicalize()
            .unwrap_or_else(|_| path.to_path_buf())
            .display()
    );

    // 1. Load & resolve
    let (resolved, report) = load_and_resolve(path)?;
    let (error_count, _) = print_report(&report);
    if error_count > 0 {
        eprintln!(
            "{} {} error(s), fix them before generating code",
            "✗".red().bold(),
            error_count
        );
        return Ok(false);
    }

    // 2. Configure
    let options = generator_options(args)?;
    let mut generator = CodeGenerator::new(options).context("Failed to load header mappings")?;

    // 3. Generate
    let generated = generator.generate(&resolved);
    tracing::info!(files = generated.file_count(), "generation finished");

    // 4. Write output
    let output_dir = match &args.output {
        Some(d) => d.clone(),
        None => path.join(".pbobjc/generated"),
    };

    generated
        .write_to_disk(&output_dir)
        .with_context(|| format!("Failed to write to '{}'", output_dir.display()))?;

    println!(
        "{} Generated {} file(s) → {}",
        "✓".green().bold(),
        generated.file_count(),
        output_dir.display()
    );
    for file_path in generated.files().keys() {
        println!("  {} {}", "→".dimmed(), file_path);
    }

    if generator
        .write_output_mapping()
        .context("Failed to write header mappings")?
    {
        println!(
            "  {} {} header mapping(s)",
            "→".dimmed(),
            generator.header_map().len()
        );
    }

    Ok(true)
}
