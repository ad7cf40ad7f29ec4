//! `badgekit template` — Print issuance templates.

use clap::{Args, Subcommand};

use badgekit_core::LegacyBadgeClass;
use badgekit_credentials::{create_assertion_template, create_badge_class_template, validate};

#[derive(Args, Debug)]
pub struct TemplateArgs {
    #[command(subcommand)]
    pub kind: TemplateKind,
}

#[derive(Subcommand, Debug)]
pub enum TemplateKind {
    /// A placeholder badge class.
    BadgeClass,
    /// An assertion awarding a badge class to a recipient.
    Assertion {
        /// Recipient email address.
        #[arg(short, long)]
        recipient: String,

        /// Badge class JSON to embed (as string or path to file).
        /// Defaults to the placeholder badge class.
        #[arg(short, long)]
        badge_class: Option<String>,
    },
}

pub fn run(args: &TemplateArgs) -> anyhow::Result<()> {
    match &args.kind {
        TemplateKind::BadgeClass => super::print_json(&create_badge_class_template()),
        TemplateKind::Assertion {
            recipient,
            badge_class,
        } => {
            let class = match badge_class {
                Some(source) => {
                    let class: LegacyBadgeClass = serde_json::from_value(super::read_json(source)?)
                        .map_err(|e| anyhow::anyhow!("invalid badge class: {}", e))?;
                    let errors = validate(&class);
                    if !errors.is_empty() {
                        anyhow::bail!("badge class is invalid: {}", errors.join("; "));
                    }
                    class
                }
                None => create_badge_class_template(),
            };
            super::print_json(&create_assertion_template(class, recipient))
        }
    }
}
