use anyhow::{Context, Result};
use blockpatch::config::{builtin, load_from_path, PatchConfig};
use blockpatch::report::{
    render_applied, render_check, render_definition, render_diff, render_no_match,
};
use blockpatch::{ApplyOptions, ApplyOutcome, CheckStatus, PatchApplier};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::Level;

/// Exit status when the exact target block is not in the file.
const EXIT_NO_MATCH: u8 = 1;
/// Exit status for I/O and patch definition errors.
const EXIT_FATAL: u8 = 2;

#[derive(Parser)]
#[command(name = "blockpatch")]
#[command(about = "Replace an exact block of text in a source file", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Log internals to stderr (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply the patch (default when no subcommand is given)
    Apply {
        #[command(flatten)]
        source: PatchSource,

        /// Dry run - report what would change without writing the file
        #[arg(short = 'n', long)]
        dry_run: bool,

        /// Show unified diff of changes
        #[arg(short, long)]
        diff: bool,
    },

    /// Check whether the patch would apply, without modifying the file
    Check {
        #[command(flatten)]
        source: PatchSource,
    },

    /// Print the patch definition
    Show {
        #[command(flatten)]
        source: PatchSource,
    },
}

#[derive(Args, Default)]
struct PatchSource {
    /// Patch definition TOML (defaults to the built-in patch)
    #[arg(short, long)]
    patch: Option<PathBuf>,

    /// Override the file named in the patch definition
    #[arg(short, long)]
    file: Option<PathBuf>,
}

impl PatchSource {
    fn load(&self) -> Result<PatchConfig> {
        let config = match &self.patch {
            Some(path) => load_from_path(path)?,
            None => builtin().context("Built-in patch is unusable")?,
        };
        match &self.file {
            Some(file) => config
                .with_file(file)
                .with_context(|| format!("Cannot retarget patch to {}", file.display())),
            None => Ok(config),
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }
    init_tracing(cli.verbose, !cli.no_color);

    let command = cli.command.unwrap_or(Commands::Apply {
        source: PatchSource::default(),
        dry_run: false,
        diff: false,
    });

    let result = match command {
        Commands::Apply {
            source,
            dry_run,
            diff,
        } => cmd_apply(&source, dry_run, diff),
        Commands::Check { source } => cmd_check(&source),
        Commands::Show { source } => cmd_show(&source),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            ExitCode::from(EXIT_FATAL)
        }
    }
}

fn init_tracing(verbose: u8, ansi: bool) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_ansi(ansi)
        .with_target(false)
        .init();
}

fn cmd_apply(source: &PatchSource, dry_run: bool, show_diff: bool) -> Result<ExitCode> {
    let config = source.load()?;
    let applier = PatchApplier::new(config);

    if dry_run {
        println!("{}", "[DRY RUN - the file will not be modified]".cyan());
    }

    let outcome = applier
        .apply_with(ApplyOptions { dry_run })
        .with_context(|| format!("Patch '{}' aborted", applier.config().name()))?;

    match outcome {
        ApplyOutcome::Applied(applied) => {
            print!("{}", render_applied(applier.config().name(), &applied));
            if show_diff {
                print!(
                    "{}",
                    render_diff(&applied.file, &applied.original, &applied.patched)
                );
            }
            Ok(ExitCode::SUCCESS)
        }
        ApplyOutcome::NoExactMatch { file, diagnosis } => {
            eprint!("{}", render_no_match(applier.config(), &file, &diagnosis));
            Ok(ExitCode::from(EXIT_NO_MATCH))
        }
    }
}

fn cmd_check(source: &PatchSource) -> Result<ExitCode> {
    let config = source.load()?;
    let applier = PatchApplier::new(config);

    let status = applier
        .check()
        .with_context(|| format!("Cannot check patch '{}'", applier.config().name()))?;
    let report = render_check(applier.config(), &status);
    match status {
        CheckStatus::WouldApply { .. } => {
            print!("{report}");
            Ok(ExitCode::SUCCESS)
        }
        CheckStatus::NoExactMatch { .. } => {
            eprint!("{report}");
            Ok(ExitCode::from(EXIT_NO_MATCH))
        }
    }
}

fn cmd_show(source: &PatchSource) -> Result<ExitCode> {
    let config = source.load()?;
    print!("{}", render_definition(&config));
    Ok(ExitCode::SUCCESS)
}
