use anyhow::Context;
use serde_json::json;

use crate::auth::{credentials, issue_dev_token};
use crate::cli::utils::print_json;
use crate::cli::OutputFormat;
use crate::config::config;

/// Mint a bearer token from the locally configured shared-secret credentials.
pub async fn dev_token(
    user_id: String,
    email: Option<String>,
    ttl_hours: i64,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    let ttl = token_ttl(ttl_hours)?;

    let (credentials, source) = credentials::resolve(&config().identity.sources())
        .context("failed to load identity credentials")?;

    let token = issue_dev_token(&credentials, &user_id, email.as_deref(), ttl)
        .with_context(|| format!("cannot sign tokens with credentials from {}", source))?;

    match output_format {
        OutputFormat::Json => print_json(&json!({
            "token": token,
            "user_id": user_id,
            "expires_in_hours": ttl_hours
        }))?,
        OutputFormat::Text => println!("{}", token),
    }
    Ok(())
}

fn token_ttl(hours: i64) -> anyhow::Result<chrono::Duration> {
    if hours <= 0 {
        anyhow::bail!("--ttl-hours must be positive");
    }
    chrono::Duration::try_hours(hours)
        .ok_or_else(|| anyhow::anyhow!("--ttl-hours {} is out of range", hours))
}
