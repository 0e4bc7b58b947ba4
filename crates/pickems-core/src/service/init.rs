//! Tenant initialization.
//!
//! Fills in whichever of the five documents are missing with their empty
//! defaults. Existing documents are never overwritten, including ones that
//! no longer decode, so running it again is always safe.

use pickems_types::document::DocumentKind;
use pickems_types::error::StoreError;
use pickems_types::tenant::TenantId;
use tracing::{info, warn};

use crate::service::entities::EntityService;
use crate::service::fs::FileSystem;

/// What initialization found for each document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InitReport {
    /// Documents that were absent and got their default.
    pub created: Vec<DocumentKind>,
    /// Documents that were already present.
    pub existing: Vec<DocumentKind>,
    /// Present documents that failed to decode. Also listed in `existing`.
    pub corrupt: Vec<DocumentKind>,
}

impl InitReport {
    /// True when nothing had to be written.
    pub fn is_noop(&self) -> bool {
        self.created.is_empty()
    }
}

/// Ensure the tenant directory and all five documents exist.
///
/// Documents are visited in a fixed order: reactionMap, matchups, settings,
/// lastMatchupMessages, weeks. The check and the default write for each one
/// happen under that document's lock, so a concurrent writer is never
/// clobbered by a default.
#[tracing::instrument(name = "initialize_tenant", skip(entities, tenant), fields(tenant = %tenant))]
pub async fn initialize_tenant<F: FileSystem>(
    entities: &EntityService<F>,
    tenant: &TenantId,
) -> Result<InitReport, StoreError> {
    let store = entities.store();
    store.ensure_tenant_dir(tenant).await?;

    let mut report = InitReport::default();
    for kind in DocumentKind::ALL {
        let guard = store.lock(tenant, kind).await;

        if !store.contains(tenant, kind).await? {
            store.write_locked(&guard, &kind.empty_value()).await?;
            info!(%kind, "Created default document");
            report.created.push(kind);
            continue;
        }

        match store.read(tenant, kind).await {
            Ok(_) => {}
            Err(StoreError::Parse { path, message }) => {
                warn!(%kind, path = %path.display(), %message, "Existing document is corrupt, leaving it untouched");
                report.corrupt.push(kind);
            }
            Err(e) => return Err(e),
        }
        tracing::debug!(%kind, "Document already exists, skipping");
        report.existing.push(kind);
    }

    Ok(report)
}
