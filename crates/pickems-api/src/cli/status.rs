//! Per-tenant document status table.

use anyhow::Result;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;

use pickems_types::document::{DocumentKind, DocumentValue};
use pickems_types::error::StoreError;
use pickems_types::tenant::TenantId;

use crate::state::AppState;

/// State of one document on disk.
enum DocState {
    Present(DocumentValue),
    Absent,
    Corrupt(String),
}

impl DocState {
    fn label(&self) -> &'static str {
        match self {
            DocState::Present(_) => "present",
            DocState::Absent => "absent",
            DocState::Corrupt(_) => "corrupt",
        }
    }
}

/// Number of top-level entries in a value.
fn entry_count(value: &DocumentValue) -> usize {
    match value {
        DocumentValue::Map(map) | DocumentValue::Record(map) => map.len(),
        DocumentValue::Sequence(items) => items.len(),
        DocumentValue::Scalar(_) => 1,
    }
}

/// Show present / absent / corrupt for each of the tenant's documents.
pub async fn status(state: &AppState, tenant: &TenantId, json: bool) -> Result<()> {
    let store = state.entities.store();

    let mut rows = Vec::with_capacity(DocumentKind::ALL.len());
    for kind in DocumentKind::ALL {
        let doc = match store.read(tenant, kind).await {
            Ok(Some(value)) => DocState::Present(value),
            Ok(None) => DocState::Absent,
            Err(StoreError::Parse { message, .. }) => DocState::Corrupt(message),
            Err(e) => return Err(e.into()),
        };
        rows.push((kind, doc));
    }

    let settings_channel = state.entities.settings_channel_id(tenant).await.ok().flatten();

    if json {
        let documents: Vec<serde_json::Value> = rows
            .iter()
            .map(|(kind, doc)| {
                serde_json::json!({
                    "document": kind.name(),
                    "path": store.document_path(tenant, *kind).display().to_string(),
                    "state": doc.label(),
                    "entries": match doc {
                        DocState::Present(value) => Some(entry_count(value)),
                        _ => None,
                    },
                    "error": match doc {
                        DocState::Corrupt(message) => Some(message.as_str()),
                        _ => None,
                    },
                })
            })
            .collect();
        let result = serde_json::json!({
            "tenant": tenant.as_str(),
            "data_dir": state.data_dir.display().to_string(),
            "settings_channel_id": settings_channel.as_ref().map(|c| c.as_str()),
            "documents": documents,
        });
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Document").fg(Color::White),
        Cell::new("File").fg(Color::White),
        Cell::new("State").fg(Color::White),
        Cell::new("Entries").fg(Color::White),
    ]);

    for (kind, doc) in &rows {
        let state_cell = match doc {
            DocState::Present(_) => Cell::new("● present").fg(Color::Green),
            DocState::Absent => Cell::new("○ absent").fg(Color::DarkGrey),
            DocState::Corrupt(_) => Cell::new("✗ corrupt").fg(Color::Red),
        };
        let entries = match doc {
            DocState::Present(value) => entry_count(value).to_string(),
            _ => "-".to_string(),
        };
        table.add_row(vec![
            Cell::new(kind.name()),
            Cell::new(kind.file_name()),
            state_cell,
            Cell::new(entries),
        ]);
    }

    println!();
    println!(
        "  {} Tenant {}  {}",
        style("⚡").bold(),
        style(tenant).cyan().bold(),
        style(store.tenant_dir(tenant).display()).dim()
    );
    println!();
    println!("{table}");

    for (kind, doc) in &rows {
        if let DocState::Corrupt(message) = doc {
            println!("  {} {}: {}", style("!").yellow().bold(), style(kind).cyan(), message);
        }
    }

    match settings_channel {
        Some(channel) => println!("  Settings mirror: channel {}", style(channel).cyan()),
        None => println!("  Settings mirror: {}", style("not configured").dim()),
    }
    println!();

    Ok(())
}
