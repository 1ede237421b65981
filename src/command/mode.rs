use anyhow::Result;

use super::resolve::resolve_snapshot;
use crate::cli::BackendArgs;

pub async fn run_mode(backend: BackendArgs) -> Result<()> {
    let snapshot = resolve_snapshot(&backend).await?;

    let mode = snapshot
        .mode()
        .map(|mode| mode.as_str())
        .unwrap_or("unresolved");
    println!("{}", mode);

    Ok(())
}
