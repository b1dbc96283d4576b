use crate::catalog::NAVIGATION;
use anyhow::Result;
use std::fmt::Write as _;

#[derive(Debug)]
pub struct Args {
    pub json: bool,
}

/// Print the static navigation catalog.
/// # Errors
/// Returns an error if JSON serialization fails.
pub fn execute(args: &Args) -> Result<()> {
    if args.json {
        println!("{}", serde_json::to_string_pretty(NAVIGATION)?);
    } else {
        print!("{}", render());
    }
    Ok(())
}

#[must_use]
pub fn render() -> String {
    let mut out = String::new();
    for section in NAVIGATION {
        let _ = writeln!(out, "{} {}", section.id, section.code);
        for subsection in section.subsections {
            let _ = writeln!(out, "  {} {}", subsection.id, subsection.code);
            for module in subsection.modules {
                let _ = writeln!(out, "    {} {}", module.id, module.code);
            }
        }
    }
    out
}
