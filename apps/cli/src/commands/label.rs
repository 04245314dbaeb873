//! Label command implementation.

use anyhow::Result;

use super::Services;

/// Execute the label command: print the display label of a location code.
pub async fn execute(services: &Services, code: &str) -> Result<()> {
    println!("{}", services.resolver.resolve_label(code).await);
    Ok(())
}
