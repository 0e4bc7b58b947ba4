//! Tenant lifecycle commands: init, bootstrap, publish-settings.

use anyhow::{Context, Result, bail};
use console::style;

use pickems_core::service::init::initialize_tenant;
use pickems_core::service::mirror::MirrorOutcome;
use pickems_types::document::DocumentKind;
use pickems_types::error::BootstrapError;
use pickems_types::tenant::TenantId;

use crate::state::AppState;

fn names(kinds: &[DocumentKind]) -> Vec<&'static str> {
    kinds.iter().map(|k| k.name()).collect()
}

/// Create missing documents and report what was found.
pub async fn init(state: &AppState, tenant: &TenantId, json: bool, quiet: bool) -> Result<()> {
    let report = initialize_tenant(&state.entities, tenant)
        .await
        .with_context(|| format!("Failed to initialize tenant '{tenant}'"))?;

    if json {
        let result = serde_json::json!({
            "tenant": tenant.as_str(),
            "created": names(&report.created),
            "existing": names(&report.existing),
            "corrupt": names(&report.corrupt),
        });
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }
    if quiet {
        return Ok(());
    }

    println!();
    for kind in DocumentKind::ALL {
        if report.created.contains(&kind) {
            println!("  {} {} created", style("+").green().bold(), style(kind).cyan());
        } else if report.corrupt.contains(&kind) {
            println!(
                "  {} {} exists but is corrupt, left untouched",
                style("!").yellow().bold(),
                style(kind).cyan()
            );
        } else {
            println!("  {} {} already exists, skipping", style("=").dim(), style(kind).cyan());
        }
    }
    println!();

    Ok(())
}

/// Provision the tenant on Discord and save its settings.
pub async fn bootstrap(state: &AppState, tenant: &TenantId, json: bool, quiet: bool) -> Result<()> {
    let bootstrapper = state.bootstrapper()?;

    let settings = match bootstrapper.bootstrap_tenant(&state.entities, tenant).await {
        Ok(settings) => settings,
        Err(BootstrapError::AlreadyBootstrapped(_)) => {
            bail!("Tenant '{tenant}' is already bootstrapped; edit its settings with `pickems set` instead")
        }
        Err(e) => return Err(e).with_context(|| format!("Failed to bootstrap tenant '{tenant}'")),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&settings)?);
    } else if !quiet {
        println!();
        println!(
            "  {} Bootstrapped tenant {}",
            style("ok").green(),
            style(tenant).cyan().bold()
        );
        println!();
        println!("{}", serde_json::to_string_pretty(&settings)?);
        println!();
    }

    Ok(())
}

/// Upsert the settings mirror message from the stored settings.
pub async fn publish_settings(state: &AppState, tenant: &TenantId, json: bool, quiet: bool) -> Result<()> {
    let Some(settings) = state.entities.get_settings(tenant).await? else {
        bail!("Tenant '{tenant}' has no settings; run `pickems init {tenant}` first");
    };

    let mirror = state.mirror()?;
    let outcome = mirror.publish_settings(&state.entities, tenant, &settings).await;

    if json {
        let (status, message, reason) = match &outcome {
            MirrorOutcome::Sent(id) => ("sent", Some(id.as_str()), None),
            MirrorOutcome::Edited(id) => ("edited", Some(id.as_str()), None),
            MirrorOutcome::Skipped => ("skipped", None, None),
            MirrorOutcome::Failed(reason) => ("failed", None, Some(reason.as_str())),
        };
        let result = serde_json::json!({
            "tenant": tenant.as_str(),
            "status": status,
            "message_id": message,
            "reason": reason,
        });
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }
    if quiet {
        return Ok(());
    }

    println!();
    match outcome {
        MirrorOutcome::Sent(id) => {
            println!("  {} Sent settings message {}", style("ok").green(), style(id).dim());
        }
        MirrorOutcome::Edited(id) => {
            println!("  {} Updated settings message {}", style("ok").green(), style(id).dim());
        }
        MirrorOutcome::Skipped => {
            println!(
                "  {} No settings channel configured for {}",
                style("i").blue().bold(),
                style(tenant).cyan()
            );
        }
        MirrorOutcome::Failed(reason) => {
            println!("  {} Could not publish settings: {}", style("!").yellow().bold(), reason);
        }
    }
    println!();

    Ok(())
}
