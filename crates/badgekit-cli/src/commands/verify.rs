//! `badgekit verify` — Run the trust pipeline on a badge.

use clap::Args;
use std::sync::Arc;

use badgekit_credentials::BadgeVerifier;

use crate::config::BadgekitConfig;

#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// Badge JSON (as string or path to file).
    pub badge: String,

    /// Additionally mark a credential id as revoked (repeatable).
    #[arg(long = "revoked")]
    pub revoked: Vec<String>,
}

pub async fn run(args: &VerifyArgs, config: &BadgekitConfig) -> anyhow::Result<()> {
    let value = super::read_json(&args.badge)?;

    let mut verifier = BadgeVerifier::new().with_policy(config.verification);
    if config.revocation.is_configured() || !args.revoked.is_empty() {
        let list = config.revocation.to_list();
        for id in &args.revoked {
            list.revoke(id.clone());
        }
        verifier = verifier.with_revocation_provider(Arc::new(list));
    }

    let result = verifier.verify(&value).await;
    super::print_json(&result)?;

    if !result.is_valid {
        anyhow::bail!("badge is INVALID");
    }
    Ok(())
}
