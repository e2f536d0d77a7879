//! gitacct command-line tool.
//!
//! Provides subcommands for applying a resolved identity to a repository,
//! inspecting what an account key or remote URL resolves to, listing
//! configured accounts, wrapping `gh` with an account-selected token, and
//! creating / validating the accounts file.

mod style;
mod wizard;

use std::path::PathBuf;
use std::process::{Command as ProcessCommand, ExitCode};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use gitacct_core::account::resolver::{resolve, ResolutionRequest, ResolutionResult};
use gitacct_core::account::store::{AccountStore, DEFAULT_KEY, RECOGNIZED_FIELDS};
use gitacct_core::config::accounts_file_path;
use gitacct_core::dispatch::dispatch;
use gitacct_core::git::local::LocalRepo;

// ---------------------------------------------------------------------------
// CLI argument definitions
// ---------------------------------------------------------------------------

/// gitacct command-line tool.
#[derive(Parser, Debug)]
#[command(
    name = "gitacct",
    version,
    about = "Per-repository Git identity and credential switching for multiple GitHub accounts"
)]
struct Cli {
    /// Path to the accounts file (defaults to the platform config
    /// directory, e.g. ~/.config/gitacct/accounts).
    #[arg(long, global = true)]
    accounts_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Apply the resolved identity to a repository's local git config.
    Apply {
        /// Repository path (any directory inside the repository).
        #[arg(long, default_value = ".")]
        repo: PathBuf,

        /// Explicit account key, bypassing remote URL matching.
        #[arg(long)]
        account: Option<String>,

        /// Remote whose URL is matched against account keys.
        #[arg(long, default_value = "origin")]
        remote: String,
    },

    /// Show the identity an account key or remote URL resolves to.
    Resolve {
        /// Remote URL to extract the owner from.
        #[arg(long, conflicts_with = "account")]
        remote_url: Option<String>,

        /// Explicit account key.
        #[arg(long)]
        account: Option<String>,

        /// Emit JSON instead of human-readable output.
        #[arg(long)]
        json: bool,
    },

    /// List configured accounts.
    List,

    /// Run `gh`, optionally selecting a token with a leading account key.
    Gh {
        /// Optional leading account key, then arguments forwarded to `gh`.
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },

    /// Interactive setup wizard that creates a starter accounts file.
    Init {
        /// Output path (defaults to the resolved accounts-file location).
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Validate an accounts file and summarize its records.
    Validate,
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> ExitCode {
    // Minimal logging for CLI
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_target(false)
        .without_time()
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}", style::error(&format!("{:#}", e)));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let accounts_path = accounts_file_path(cli.accounts_file)
        .context("failed to resolve the accounts file location")?;

    match cli.command {
        Commands::Apply {
            repo,
            account,
            remote,
        } => cmd_apply(&accounts_path, &repo, account, &remote)?,
        Commands::Resolve {
            remote_url,
            account,
            json,
        } => cmd_resolve(&accounts_path, remote_url, account, json)?,
        Commands::List => cmd_list(&accounts_path)?,
        Commands::Gh { args } => return cmd_gh(&accounts_path, args),
        Commands::Init { output } => wizard::run_init(output.unwrap_or(accounts_path))?,
        Commands::Validate => cmd_validate(&accounts_path)?,
    }

    Ok(ExitCode::SUCCESS)
}

// ---------------------------------------------------------------------------
// Store helpers
// ---------------------------------------------------------------------------

fn load_store(path: &PathBuf) -> Result<AccountStore> {
    AccountStore::load(path).with_context(|| {
        format!(
            "failed to load accounts file {} (run `gitacct init` to create one)",
            path.display()
        )
    })
}

// ---------------------------------------------------------------------------
// Subcommand implementations
// ---------------------------------------------------------------------------

fn cmd_apply(
    accounts_path: &PathBuf,
    repo_path: &PathBuf,
    account: Option<String>,
    remote: &str,
) -> Result<()> {
    let store = load_store(accounts_path)?;
    let repo = LocalRepo::open(repo_path)
        .with_context(|| format!("failed to open repository at {}", repo_path.display()))?;

    let request = match account {
        Some(key) => ResolutionRequest::for_key(key),
        None => {
            let url = repo
                .remote_url(remote)
                .with_context(|| format!("failed to read the '{}' remote URL", remote))?;
            ResolutionRequest::for_remote_url(url)
        }
    };

    let result = resolve(&store, &request).context("identity resolution failed")?;

    repo.apply_identity(result.name.as_deref(), result.email.as_deref())
        .context("failed to write repository config")?;

    let matched = if result.used_default {
        format!("{} (default fallback)", style::key(&result.matched_key))
    } else {
        style::key(&result.matched_key)
    };
    println!(
        "{}",
        style::success(&format!(
            "applied identity from account {} to {}",
            matched,
            repo.path().display()
        ))
    );
    for (field, value) in [("user.name", &result.name), ("user.email", &result.email)] {
        match value {
            Some(v) => println!("  {:<10} = {}", field, v),
            None => println!("  {:<10} {}", field, style::dim("unresolved, left unchanged")),
        }
    }
    Ok(())
}

/// Serializable view of a resolution for `--json`. The token itself is
/// reported as presence only, never echoed.
#[derive(Serialize)]
struct ResolutionView<'a> {
    name: Option<&'a str>,
    email: Option<&'a str>,
    token_set: bool,
    matched_key: &'a str,
    used_default: bool,
}

impl<'a> From<&'a ResolutionResult> for ResolutionView<'a> {
    fn from(result: &'a ResolutionResult) -> Self {
        Self {
            name: result.name.as_deref(),
            email: result.email.as_deref(),
            token_set: result.token.is_some(),
            matched_key: &result.matched_key,
            used_default: result.used_default,
        }
    }
}

fn cmd_resolve(
    accounts_path: &PathBuf,
    remote_url: Option<String>,
    account: Option<String>,
    json: bool,
) -> Result<()> {
    let store = load_store(accounts_path)?;
    let request = ResolutionRequest {
        remote_url,
        explicit_key: account,
    };
    let result = resolve(&store, &request).context("identity resolution failed")?;

    if json {
        let view = ResolutionView::from(&result);
        println!("{}", serde_json::to_string_pretty(&view)?);
        return Ok(());
    }

    println!("  Matched key : {}", style::key(&result.matched_key));
    println!(
        "  Fallback    : {}",
        if result.used_default { "yes (default record)" } else { "no" }
    );
    println!(
        "  Name        : {}",
        result.name.as_deref().unwrap_or("—")
    );
    println!(
        "  Email       : {}",
        result.email.as_deref().unwrap_or("—")
    );
    println!(
        "  Token       : {}",
        if result.token.is_some() { "set" } else { "not set" }
    );
    Ok(())
}

fn cmd_list(accounts_path: &PathBuf) -> Result<()> {
    let store = load_store(accounts_path)?;

    if store.is_empty() {
        println!("No accounts configured. Run `gitacct init` to create some.");
        return Ok(());
    }

    let mut table = comfy_table::Table::new();
    table
        .load_preset(comfy_table::presets::UTF8_BORDERS_ONLY)
        .set_header(vec!["Key", "Name", "Email", "Token"]);

    for key in store.keys() {
        let Some(record) = store.get(key) else { continue };
        table.add_row(vec![
            key,
            record.name.as_deref().unwrap_or("—"),
            record.email.as_deref().unwrap_or("—"),
            if record.token.is_some() { "set" } else { "—" },
        ]);
    }

    println!("{table}");
    Ok(())
}

fn cmd_gh(accounts_path: &PathBuf, args: Vec<String>) -> Result<ExitCode> {
    let store = load_store(accounts_path)?;
    let plan = dispatch(&args, &store);

    let mut command = ProcessCommand::new("gh");
    command.args(&plan.effective_args);
    if let Some(token) = &plan.token {
        command.env("GH_TOKEN", token);
    }

    let status = command
        .status()
        .context("failed to run gh (is the GitHub CLI installed?)")?;

    // Pass the downstream exit status through.
    match status.code() {
        Some(code) => Ok(ExitCode::from(code.clamp(0, 255) as u8)),
        None => Ok(ExitCode::FAILURE),
    }
}

fn cmd_validate(accounts_path: &PathBuf) -> Result<()> {
    println!("Validating accounts file: {}", accounts_path.display());
    println!();

    let store = load_store(accounts_path)?;
    println!("  [OK] File is readable");
    println!("  [OK] Parsed {} account record(s)", store.len());
    println!();

    let mut warnings = 0;
    for key in store.keys() {
        let Some(record) = store.get(key) else { continue };
        let fields: Vec<&str> = RECOGNIZED_FIELDS
            .iter()
            .copied()
            .filter(|f| record.get_field(f).is_some())
            .collect();

        println!("  {} [{}]", style::key(key), fields.join(", "));

        if !record.has_identity_fields() {
            println!(
                "    {}",
                style::warn("no name/email/token; this record will never match")
            );
            warnings += 1;
        }
        for (field, _) in &record.extra {
            println!(
                "    {}",
                style::dim(&format!("unrecognized field '{}' (stored, unused)", field))
            );
        }
    }

    println!();
    if store.get(DEFAULT_KEY).is_none() {
        println!(
            "  {}",
            style::warn("no `default` record; unmatched repositories will resolve to nothing")
        );
        warnings += 1;
    }

    if warnings == 0 {
        println!("{}", style::success("Accounts file is valid."));
    } else {
        println!(
            "{}",
            style::warn(&format!("Accounts file is usable, {} warning(s).", warnings))
        );
    }
    Ok(())
}
