//! `badgekit validate` — Validate a badge class.

use clap::Args;

use badgekit_credentials::validate_value;

#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Badge class JSON (as string or path to file).
    pub badge_class: String,
}

pub fn run(args: &ValidateArgs) -> anyhow::Result<()> {
    let value = super::read_json(&args.badge_class)?;
    let errors = validate_value(&value);

    if errors.is_empty() {
        println!("Badge class is VALID");
        return Ok(());
    }

    println!("Badge class is INVALID");
    println!();
    for error in &errors {
        println!("  [FAIL] {}", error);
    }
    anyhow::bail!("{} validation error(s)", errors.len());
}
