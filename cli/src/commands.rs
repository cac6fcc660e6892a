use anyhow::Result;
use clap::{Parser, Subcommand};
use serde::Serialize;
use shared_types::{Entries, Owner};
use tracing::info;
use userprefs::preferences::{BackendKind, PreferenceResource};

/// Inspect and edit a user's preferences
#[derive(Debug, Parser)]
#[command(name = "prefs", version)]
pub struct Cli {
    /// Preference backend, overrides PREFERENCE_BACKEND
    #[arg(long)]
    pub backend: Option<BackendKind>,

    /// User whose preferences to address
    pub owner: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the user's preferences
    Get,
    /// Print the user's preferences as a resource list
    List,
    /// Add or change keys, keeping the others
    Set {
        #[arg(required = true, value_parser = parse_pair)]
        pairs: Vec<(String, String)>,
    },
    /// Remove keys, keeping the others
    Unset {
        #[arg(required = true)]
        keys: Vec<String>,
    },
    /// Replace the whole set with exactly these keys
    Replace {
        #[arg(value_parser = parse_pair)]
        pairs: Vec<(String, String)>,
    },
    /// Delete all of the user's preferences
    Clear,
}

fn parse_pair(arg: &str) -> Result<(String, String), String> {
    let (key, value) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got {arg:?}"))?;
    if key.is_empty() {
        return Err(format!("empty key in {arg:?}"));
    }
    Ok((key.to_string(), value.to_string()))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// `set` and `unset` read the current set first, so they race with other
/// writers the same way any read-modify-write does.
pub async fn run(resource: &PreferenceResource, owner: &Owner, command: Command) -> Result<()> {
    match command {
        Command::Get => print_json(&resource.by_id(owner).await?),
        Command::List => print_json(&resource.list(owner).await?),
        Command::Set { pairs } => {
            let mut entries = resource.by_id(owner).await?.data;
            entries.extend(pairs);
            print_json(&resource.update(owner, entries).await?)
        }
        Command::Unset { keys } => {
            let mut entries = resource.by_id(owner).await?.data;
            for key in &keys {
                entries.remove(key);
            }
            print_json(&resource.update(owner, entries).await?)
        }
        Command::Replace { pairs } => {
            let entries: Entries = pairs.into_iter().collect();
            print_json(&resource.update(owner, entries).await?)
        }
        Command::Clear => {
            resource.delete(owner).await?;
            info!("Cleared preferences for {}", owner);
            Ok(())
        }
    }
}
