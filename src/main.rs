use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use std::env;
use std::path::{Path, PathBuf};
use tokens_table_patcher::diff::render_diff;
use tokens_table_patcher::tokens_table::{self, DEFAULT_TARGET};
use tokens_table_patcher::{
    load_from_path, Artifact, PatchReport, Patcher, RuleOutcome, RuleSet, WorkspaceGuard,
};

const WORKSPACE_ENV: &str = "TOKENS_PATCHER_WORKSPACE";

#[derive(Parser)]
#[command(name = "tokens-table-patcher")]
#[command(
    about = "Accessibility patches for the tokens table component",
    long_about = "Accessibility patches for the tokens table component.\n\n\
                  Without a subcommand, applies the built-in rules to \
                  web/default/src/components/TokensTable.js in the current directory."
)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args, Default)]
struct TargetArgs {
    /// Workspace root (defaults to $TOKENS_PATCHER_WORKSPACE, then the current directory)
    #[arg(short, long)]
    workspace: Option<PathBuf>,

    /// File to patch, relative to the workspace (defaults to the rule set target)
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// TOML rule set to use instead of the built-in tokens table rules
    #[arg(short, long)]
    rules: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply the rules to the target file
    Apply {
        #[command(flatten)]
        target: TargetArgs,

        /// Dry run - show what would be changed without modifying files
        #[arg(short = 'n', long)]
        dry_run: bool,

        /// Show unified diff of changes
        #[arg(short, long)]
        diff: bool,

        /// Exit with status 1 if any rule did not match
        #[arg(long)]
        strict: bool,
    },

    /// Report what each rule would do, without writing
    Status {
        #[command(flatten)]
        target: TargetArgs,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check that every rule is already applied
    Verify {
        #[command(flatten)]
        target: TargetArgs,
    },

    /// List the rules in order
    List {
        /// TOML rule set to list instead of the built-in rules
        #[arg(short, long)]
        rules: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    match cli.command {
        None => cmd_apply(TargetArgs::default(), false, false, false),

        Some(Commands::Apply {
            target,
            dry_run,
            diff,
            strict,
        }) => cmd_apply(target, dry_run, diff, strict),

        Some(Commands::Status { target, json }) => cmd_status(target, json),

        Some(Commands::Verify { target }) => cmd_verify(target),

        Some(Commands::List { rules }) => cmd_list(rules.as_deref()),
    }
}

/// Resolve workspace path
///
/// Priority order:
/// 1. Explicit --workspace flag
/// 2. TOKENS_PATCHER_WORKSPACE environment variable
/// 3. Current directory
fn resolve_workspace(cli_workspace: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = cli_workspace {
        return path
            .canonicalize()
            .with_context(|| format!("workspace {} does not exist", path.display()));
    }

    if let Ok(env_path) = env::var(WORKSPACE_ENV) {
        let path = PathBuf::from(&env_path);
        if path.exists() {
            return Ok(path.canonicalize()?);
        }
        eprintln!(
            "{}",
            format!(
                "Warning: {} is set but path doesn't exist: {}",
                WORKSPACE_ENV, env_path
            )
            .yellow()
        );
    }

    Ok(env::current_dir()?)
}

fn load_rules(rules: Option<&Path>) -> Result<RuleSet> {
    match rules {
        Some(path) => Ok(load_from_path(path)?),
        None => Ok(tokens_table::rules()),
    }
}

struct Session {
    workspace: PathBuf,
    target: PathBuf,
    patcher: Patcher,
}

/// Resolve workspace, rule set and target file shared by every command.
fn open_session(args: &TargetArgs) -> Result<Session> {
    let workspace = resolve_workspace(args.workspace.as_deref())?;
    let rules = load_rules(args.rules.as_deref())?;

    let relative = args
        .file
        .clone()
        .or_else(|| rules.target().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_TARGET));

    let guard = WorkspaceGuard::new(&workspace)?;
    let target = guard.validate_path(&relative)?;

    Ok(Session {
        workspace: guard.workspace_root().to_path_buf(),
        target,
        patcher: Patcher::new(rules),
    })
}

fn print_header(session: &Session) {
    let rules = session.patcher.rules();
    println!("Workspace: {}", session.workspace.display());
    println!("Target: {}", session.target.display());
    println!("Rules: {} ({} rules)", rules.name(), rules.len());
    println!();
}

fn print_rule_reports(report: &PatchReport, dry_run: bool) {
    for rule in &report.rules {
        match &rule.outcome {
            RuleOutcome::Applied { occurrences } => {
                let verb = if dry_run { "Would apply" } else { "Applied" };
                let suffix = if *occurrences > 1 {
                    format!(" ({} occurrences)", occurrences)
                } else {
                    String::new()
                };
                println!("{} {}: {}{}", "✓".green(), rule.id, verb, suffix);
            }
            RuleOutcome::AlreadyApplied => {
                println!("{} {}: Already applied", "⊙".yellow(), rule.id);
            }
            RuleOutcome::Skipped { drift } => {
                println!("{} {}: Skipped (no match)", "⊘".cyan(), rule.id);
                if let Some(hint) = drift {
                    println!("  {}", format!("Nearest: {}", hint).dimmed());
                }
            }
        }
    }
}

fn print_summary(report: &PatchReport) {
    println!();
    println!("{}", "Summary:".bold());
    println!("  {} applied", format!("{}", report.applied()).green());
    println!(
        "  {} already applied",
        format!("{}", report.already_applied()).yellow()
    );
    println!("  {} skipped", format!("{}", report.skipped()).cyan());
    println!("  status: {}", report.status());
}

fn cmd_apply(args: TargetArgs, dry_run: bool, show_diff: bool, strict: bool) -> Result<()> {
    let session = open_session(&args)?;
    print_header(&session);

    let artifact = Artifact::load(&session.target)?;
    let outcome = session.patcher.patch_str(artifact.content());
    let refused = strict && outcome.report.skipped() > 0;

    if dry_run {
        println!("{}", "[DRY RUN - nothing will be written]".cyan());
    } else if !refused {
        artifact.persist(&outcome.content)?;
    }

    print_rule_reports(&outcome.report, dry_run || refused);

    if show_diff {
        print!(
            "{}",
            render_diff(artifact.path(), artifact.content(), &outcome.content)
        );
    }

    print_summary(&outcome.report);

    if refused {
        eprintln!(
            "{}",
            format!(
                "Strict mode: {} rule(s) did not match, {} left untouched",
                outcome.report.skipped(),
                artifact.path().display()
            )
            .red()
        );
        std::process::exit(1);
    }

    Ok(())
}

fn cmd_status(args: TargetArgs, json: bool) -> Result<()> {
    let session = open_session(&args)?;
    let outcome = session.patcher.check(&session.target)?;

    if json {
        let value = serde_json::json!({
            "target": session.target,
            "status": outcome.report.status(),
            "report": outcome.report,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!("{}", "Patch Status Report".bold());
    print_header(&session);

    let mut applied = Vec::new();
    let mut pending = Vec::new();
    let mut unmatched = Vec::new();

    for rule in &outcome.report.rules {
        match &rule.outcome {
            RuleOutcome::AlreadyApplied => applied.push(rule),
            RuleOutcome::Applied { .. } => pending.push(rule),
            RuleOutcome::Skipped { .. } => unmatched.push(rule),
        }
    }

    if !applied.is_empty() {
        println!(
            "{} {} ({} rules)",
            "✓".green(),
            "APPLIED".green().bold(),
            applied.len()
        );
        for rule in &applied {
            println!("  - {}", rule.id);
        }
        println!();
    }

    if !pending.is_empty() {
        println!(
            "{} {} ({} rules)",
            "⊙".yellow(),
            "NOT APPLIED".yellow().bold(),
            pending.len()
        );
        for rule in &pending {
            println!("  - {} ({})", rule.id, "old block found".dimmed());
        }
        println!();
    }

    if !unmatched.is_empty() {
        println!(
            "{} {} ({} rules)",
            "⊘".cyan(),
            "NO MATCH".cyan().bold(),
            unmatched.len()
        );
        for rule in &unmatched {
            println!("  - {} ({})", rule.id, rule.outcome.to_string().dimmed());
        }
        println!();
    }

    println!("Status: {}", outcome.report.status());

    Ok(())
}

fn cmd_verify(args: TargetArgs) -> Result<()> {
    let session = open_session(&args)?;

    println!("{}", "Verifying rules...".bold());
    print_header(&session);

    let outcome = session.patcher.check(&session.target)?;
    let mut verified = 0;
    let mut mismatch = 0;

    for rule in &outcome.report.rules {
        match &rule.outcome {
            RuleOutcome::AlreadyApplied => {
                println!("{} {}: Verified (already applied)", "✓".green(), rule.id);
                verified += 1;
            }
            RuleOutcome::Applied { .. } => {
                eprintln!("{} {}: MISMATCH", "✗".red(), rule.id);
                eprintln!("  Expected: rule already applied");
                eprintln!("  Found: original block still present");
                mismatch += 1;
            }
            RuleOutcome::Skipped { drift } => {
                eprintln!("{} {}: MISMATCH", "✗".red(), rule.id);
                eprintln!("  Found: neither the original nor the patched block");
                if let Some(hint) = drift {
                    eprintln!("  Nearest: {}", hint);
                }
                mismatch += 1;
            }
        }
    }

    println!();
    println!("{}", "Summary:".bold());
    println!("  {} verified", format!("{}", verified).green());
    println!("  {} mismatch", format!("{}", mismatch).red());

    if mismatch > 0 {
        std::process::exit(1);
    }

    Ok(())
}

fn cmd_list(rules: Option<&Path>) -> Result<()> {
    let rules = load_rules(rules)?;

    println!("{} ({} rules)", rules.name().bold(), rules.len());
    if let Some(target) = rules.target() {
        println!("Target: {}", target.display());
    }
    println!();

    for (idx, rule) in rules.iter().enumerate() {
        if rule.description().is_empty() {
            println!("{:>2}. {}", idx + 1, rule.id());
        } else {
            println!(
                "{:>2}. {} - {}",
                idx + 1,
                rule.id(),
                rule.description().dimmed()
            );
        }
    }

    Ok(())
}
