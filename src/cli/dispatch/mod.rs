//! Maps parsed CLI arguments to an [`Action`].

use crate::cli::{
    actions::{catalog, menu, permissions, sidebar, Action},
    commands::{
        ARG_API_URL, ARG_JSON, ARG_MENU_TTL, ARG_PERMISSIONS_TTL, ARG_SECTION, ARG_SUBSECTION,
        ARG_TIMEOUT, ARG_TOKEN, ARG_URL, CMD_CATALOG, CMD_MENU, CMD_PERMISSIONS, CMD_SIDEBAR,
    },
    globals::GlobalArgs,
};
use anyhow::{anyhow, Context, Result};
use secrecy::SecretString;
use std::time::Duration;

fn global_args(matches: &clap::ArgMatches) -> Result<GlobalArgs> {
    let api_url = matches
        .get_one::<String>(ARG_API_URL)
        .cloned()
        .context("missing required argument: --api-url")?;

    let mut globals = GlobalArgs::new(api_url);
    if let Some(token) = matches
        .get_one::<String>(ARG_TOKEN)
        .map(|token| token.trim())
        .filter(|token| !token.is_empty())
    {
        globals.set_token(SecretString::from(token.to_string()));
    }
    if let Some(&secs) = matches.get_one::<u64>(ARG_TIMEOUT) {
        globals.timeout = Duration::from_secs(secs);
    }
    if let Some(&secs) = matches.get_one::<u64>(ARG_MENU_TTL) {
        globals.menu_ttl = Duration::from_secs(secs);
    }
    if let Some(&secs) = matches.get_one::<u64>(ARG_PERMISSIONS_TTL) {
        globals.permissions_ttl = Duration::from_secs(secs);
    }

    Ok(globals)
}

fn required(matches: &clap::ArgMatches, name: &str) -> Result<String> {
    matches
        .get_one::<String>(name)
        .cloned()
        .with_context(|| format!("missing required argument: --{name}"))
}

/// Map validated CLI matches to an action.
///
/// # Errors
/// Returns an error if required arguments are missing or the subcommand is unknown.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let globals = global_args(matches)?;

    match matches.subcommand() {
        Some((CMD_MENU, sub)) => Ok(Action::Menu(menu::Args {
            globals,
            json: sub.get_flag(ARG_JSON),
        })),
        Some((CMD_PERMISSIONS, sub)) => Ok(Action::Permissions(permissions::Args {
            globals,
            section: required(sub, ARG_SECTION)?,
            subsection: required(sub, ARG_SUBSECTION)?,
            json: sub.get_flag(ARG_JSON),
        })),
        Some((CMD_SIDEBAR, sub)) => Ok(Action::Sidebar(sidebar::Args {
            globals,
            url: required(sub, ARG_URL)?,
        })),
        Some((CMD_CATALOG, sub)) => Ok(Action::Catalog(catalog::Args {
            json: sub.get_flag(ARG_JSON),
        })),
        Some((name, _)) => Err(anyhow!("unknown command: {name}")),
        None => Err(anyhow!("missing command")),
    }
}
