//! `badgekit detect` — Detect the format of a badge document.

use clap::Args;

use badgekit_core::detect;

#[derive(Args, Debug)]
pub struct DetectArgs {
    /// Badge JSON (as string or path to file).
    pub badge: String,
}

pub fn run(args: &DetectArgs) -> anyhow::Result<()> {
    let value = super::read_json(&args.badge)?;

    match detect(&value) {
        Some(kind) => {
            println!("{}", kind);
            Ok(())
        }
        None => anyhow::bail!("unrecognized badge format"),
    }
}
