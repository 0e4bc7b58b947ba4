//! Raw document commands: get and set.
//!
//! Values are shown and accepted in the on-disk JSON format, so ordered maps
//! appear as `{"dataType": "Map", "value": [[key, value], ...]}`.

use std::path::Path;

use anyhow::{Context, Result};
use console::style;

use pickems_core::codec;
use pickems_types::document::{DocumentKind, DocumentValue};
use pickems_types::tenant::TenantId;

use crate::state::AppState;

/// Print a stored document.
pub async fn get(state: &AppState, tenant: &TenantId, kind: DocumentKind, json: bool) -> Result<()> {
    let value = state
        .entities
        .get_raw(tenant, kind)
        .await
        .with_context(|| format!("Failed to read {kind} for tenant '{tenant}'"))?;

    match value {
        Some(value) => {
            let wire = codec::to_wire(&value);
            if json {
                let result = serde_json::json!({
                    "tenant": tenant.as_str(),
                    "document": kind.name(),
                    "value": wire,
                });
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                println!("{}", serde_json::to_string_pretty(&wire)?);
            }
        }
        None => {
            if json {
                let result = serde_json::json!({
                    "tenant": tenant.as_str(),
                    "document": kind.name(),
                    "value": null,
                });
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                println!();
                println!(
                    "  {} {} is absent for {}",
                    style("i").blue().bold(),
                    style(kind).cyan(),
                    style(tenant).cyan(),
                );
                println!();
            }
        }
    }

    Ok(())
}

/// Replace a stored document with `raw` (JSON text, or `@path`).
pub async fn set(
    state: &AppState,
    tenant: &TenantId,
    kind: DocumentKind,
    raw: &str,
    json: bool,
    quiet: bool,
) -> Result<()> {
    let text = match raw.strip_prefix('@') {
        Some(path) => tokio::fs::read_to_string(Path::new(path))
            .await
            .with_context(|| format!("Failed to read {path}"))?,
        None => raw.to_string(),
    };
    let value = parse_value(&text)?;

    state
        .entities
        .set_raw(tenant, kind, &value)
        .await
        .with_context(|| format!("Failed to write {kind} for tenant '{tenant}'"))?;

    if json {
        let result = serde_json::json!({
            "tenant": tenant.as_str(),
            "document": kind.name(),
            "written": true,
        });
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else if !quiet {
        println!();
        println!(
            "  {} Wrote {} for {}",
            style("ok").green(),
            style(kind).cyan(),
            style(tenant).cyan(),
        );
        println!();
    }

    Ok(())
}

/// Parse on-disk JSON text into a value, reconstructing tagged maps.
fn parse_value(text: &str) -> Result<DocumentValue> {
    codec::decode(text.as_bytes()).context("Value is not a valid document")
}
