//! Interactive init wizard.
//!
//! Walks the user through a fallback identity and any number of
//! per-account entries, then writes the resulting accounts file.

use std::path::PathBuf;

use anyhow::{Context, Result};
use console::Style;
use dialoguer::{Confirm, Input, Password};

use gitacct_core::account::store::{is_valid_key, AccountStore, DEFAULT_KEY};

use crate::style;

/// Run the interactive wizard and write the accounts file to `output_path`.
pub fn run_init(output_path: PathBuf) -> Result<()> {
    // Guard against overwriting an existing file.
    if output_path.exists() {
        let overwrite = Confirm::new()
            .with_prompt(format!("{} already exists. Overwrite?", output_path.display()))
            .default(false)
            .interact()
            .context("failed to read confirmation")?;

        if !overwrite {
            println!(
                "{}",
                style::warn("Init cancelled. Existing file was not modified.")
            );
            return Ok(());
        }
    }

    // Print a welcome banner.
    let accent = Style::new().cyan().bold();
    println!();
    println!("{}", accent.apply_to("=== gitacct Account Setup ==="));
    println!();
    println!("This wizard creates the accounts file used to pick a Git identity");
    println!("per repository. Fields left empty are simply omitted.");
    println!();

    let mut store = AccountStore::new();

    // -----------------------------------------------------------------
    // 1. Fallback identity
    // -----------------------------------------------------------------
    println!("{}", style::header("1/2  Fallback identity (`default`)"));
    println!();

    let default_name: String = Input::new()
        .with_prompt("Default git author name")
        .allow_empty(true)
        .interact_text()
        .context("failed to read default name")?;
    if !default_name.is_empty() {
        store.set_field(DEFAULT_KEY, "name", default_name);
    }

    let default_email: String = Input::new()
        .with_prompt("Default git email")
        .allow_empty(true)
        .interact_text()
        .context("failed to read default email")?;
    if !default_email.is_empty() {
        store.set_field(DEFAULT_KEY, "email", default_email);
    }

    println!();

    // -----------------------------------------------------------------
    // 2. Per-account entries
    // -----------------------------------------------------------------
    println!("{}", style::header("2/2  Accounts"));
    println!();
    println!("Account keys are matched against the owner segment of a repository's");
    println!("remote URL (e.g. the `acme` in github.com/acme/widgets).");
    println!();

    loop {
        let add = Confirm::new()
            .with_prompt("Add an account?")
            .default(store.len() <= 1)
            .interact()
            .context("failed to read confirmation")?;
        if !add {
            break;
        }

        let key: String = Input::new()
            .with_prompt("Account key (GitHub owner name)")
            .validate_with(|input: &String| -> Result<(), String> {
                if !is_valid_key(input) {
                    return Err("keys may only contain letters, digits, '_' and '-'".into());
                }
                if input == DEFAULT_KEY {
                    return Err("`default` is reserved for the fallback identity".into());
                }
                Ok(())
            })
            .interact_text()
            .context("failed to read account key")?;

        let name: String = Input::new()
            .with_prompt("Git author name (empty = inherit default)")
            .allow_empty(true)
            .interact_text()
            .context("failed to read account name")?;
        if !name.is_empty() {
            store.set_field(key.as_str(), "name", name);
        }

        let email: String = Input::new()
            .with_prompt("Git email (empty = inherit default)")
            .allow_empty(true)
            .interact_text()
            .context("failed to read account email")?;
        if !email.is_empty() {
            store.set_field(key.as_str(), "email", email);
        }

        let token: String = Password::new()
            .with_prompt("GitHub token for this account (empty = none)")
            .allow_empty_password(true)
            .interact()
            .context("failed to read account token")?;
        if !token.is_empty() {
            store.set_field(key.as_str(), "token", token);
        }

        println!("{}", style::success(&format!("added account {}", style::key(&key))));
        println!();
    }

    // -----------------------------------------------------------------
    // Write the file
    // -----------------------------------------------------------------
    if let Some(parent) = output_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    store
        .save(&output_path)
        .with_context(|| format!("failed to write {}", output_path.display()))?;

    println!();
    println!(
        "{}",
        style::success(&format!(
            "Wrote {} account(s) to {}",
            store.len(),
            output_path.display()
        ))
    );
    println!();
    println!("Next steps:");
    println!("  1. Inspect the file with: gitacct list");
    println!("  2. In a repository, run: gitacct apply");
    println!("  3. Wrap gh with a token: gitacct gh <account> repo list");

    Ok(())
}
