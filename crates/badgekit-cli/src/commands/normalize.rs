//! `badgekit normalize` — Print the canonical display view of a badge.

use clap::Args;

use badgekit_credentials::normalize_value;

#[derive(Args, Debug)]
pub struct NormalizeArgs {
    /// Badge JSON (as string or path to file).
    pub badge: String,
}

pub fn run(args: &NormalizeArgs) -> anyhow::Result<()> {
    let value = super::read_json(&args.badge)?;
    let badge = normalize_value(&value)?;
    super::print_json(&badge)
}
