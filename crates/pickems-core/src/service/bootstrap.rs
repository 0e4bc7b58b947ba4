//! First-time tenant bootstrap.
//!
//! Initializes the tenant's documents, provisions the admin role, channels,
//! and categories on the chat platform, records their ids in the settings
//! document, and publishes the settings mirror.

use pickems_types::config::ProvisioningConfig;
use pickems_types::document::DocumentKind;
use pickems_types::error::{BootstrapError, PlatformError, StoreError};
use pickems_types::platform::{ChannelId, ChannelSpec, ChannelVisibility, RoleId};
use pickems_types::settings::Settings;
use pickems_types::tenant::TenantId;
use tracing::{info, warn};

use crate::service::entities::EntityService;
use crate::service::fs::FileSystem;
use crate::service::init::initialize_tenant;
use crate::service::mirror::{MirrorOutcome, SettingsMirror};
use crate::service::platform::ChatPlatform;
use crate::service::typed::TypedDocument;

/// Ids of everything created on the platform for one tenant.
struct Provisioned {
    admin_role: RoleId,
    console: ChannelId,
    matchups: ChannelId,
    leaderboard: ChannelId,
    settings: ChannelId,
    matchup_category: ChannelId,
    archive_category: ChannelId,
}

/// Runs the guarded bootstrap sequence against a [`ChatPlatform`].
pub struct TenantBootstrapper<P: ChatPlatform> {
    mirror: SettingsMirror<P>,
    names: ProvisioningConfig,
}

impl<P: ChatPlatform> TenantBootstrapper<P> {
    pub fn new(platform: P, names: ProvisioningConfig) -> Self {
        Self {
            mirror: SettingsMirror::new(platform),
            names,
        }
    }

    /// The mirror publisher sharing this bootstrapper's platform.
    pub fn mirror(&self) -> &SettingsMirror<P> {
        &self.mirror
    }

    fn platform(&self) -> &P {
        self.mirror.platform()
    }

    /// Bootstrap `tenant` and return the settings that were written.
    ///
    /// Fails with [`BootstrapError::AlreadyBootstrapped`] without touching the
    /// platform when the stored settings already carry a guild id or settings
    /// channel. The settings lock is held from that check until the new
    /// settings are written, so concurrent bootstraps provision at most once.
    /// Mirror failures are logged and do not fail the bootstrap.
    pub async fn bootstrap_tenant<F: FileSystem>(
        &self,
        entities: &EntityService<F>,
        tenant: &TenantId,
    ) -> Result<Settings, BootstrapError> {
        initialize_tenant(entities, tenant).await?;

        let store = entities.store();
        let guard = store.lock(tenant, DocumentKind::Settings).await;

        let mut settings = entities.get_settings(tenant).await?.unwrap_or_default();
        if settings.is_bootstrapped() {
            info!(%tenant, "Tenant already bootstrapped, skipping provisioning");
            return Err(BootstrapError::AlreadyBootstrapped(tenant.to_string()));
        }

        info!(%tenant, "Provisioning tenant");
        let provisioned = self.provision(tenant).await?;

        settings.weeks = Some(Vec::new());
        settings.guild_id = Some(tenant.clone());
        settings.admin_role_id = Some(provisioned.admin_role);
        settings.console_channel_id = Some(provisioned.console);
        settings.matchups_channel_id = Some(provisioned.matchups);
        settings.leaderboard_channel_id = Some(provisioned.leaderboard);
        settings.settings_channel_id = Some(provisioned.settings);
        settings.pickems_matchup_category_id = Some(provisioned.matchup_category);
        settings.pickems_matchup_archive_category_id = Some(provisioned.archive_category);

        let value = settings.to_value().map_err(|message| StoreError::Encode {
            kind: DocumentKind::Settings,
            message,
        })?;
        store.write_locked(&guard, &value).await?;
        drop(guard);
        info!(%tenant, "Saved bootstrapped settings");

        match self.mirror.publish_settings(entities, tenant, &settings).await {
            MirrorOutcome::Failed(reason) => {
                warn!(%tenant, %reason, "Bootstrap finished without a settings mirror");
            }
            outcome => tracing::debug!(%tenant, ?outcome, "Settings mirror published"),
        }

        Ok(settings)
    }

    /// Create the role, channels, and categories. Nothing is rolled back on
    /// failure; what was created is logged.
    async fn provision(&self, tenant: &TenantId) -> Result<Provisioned, PlatformError> {
        let mut created = Vec::new();
        let result = self.provision_all(tenant, &mut created).await;
        if let Err(e) = &result {
            warn!(%tenant, error = %e, ?created, "Provisioning failed, created resources were left in place");
        }
        result
    }

    async fn provision_all(
        &self,
        tenant: &TenantId,
        created: &mut Vec<String>,
    ) -> Result<Provisioned, PlatformError> {
        let names = &self.names;

        let admin_role = self.platform().create_role(tenant, &names.admin_role).await?;
        created.push(names.admin_role.clone());
        let private = ChannelVisibility::Private {
            role: admin_role.clone(),
        };

        let category = self
            .create(tenant, ChannelSpec::category(&names.category, ChannelVisibility::Inherit), created)
            .await?;
        let under = |name: &str, visibility: ChannelVisibility| {
            ChannelSpec::text(name, Some(category.clone()), visibility)
        };

        let console = self
            .create(tenant, under(&names.console_channel, private.clone()), created)
            .await?;
        let matchups = self
            .create(tenant, under(&names.matchups_channel, ChannelVisibility::ReadOnly), created)
            .await?;
        let leaderboard = self
            .create(tenant, under(&names.leaderboard_channel, ChannelVisibility::ReadOnly), created)
            .await?;
        let settings = self
            .create(tenant, under(&names.settings_channel, private.clone()), created)
            .await?;
        let matchup_category = self
            .create(tenant, ChannelSpec::category(&names.matchup_category, private.clone()), created)
            .await?;
        let archive_category = self
            .create(tenant, ChannelSpec::category(&names.archive_category, private), created)
            .await?;

        Ok(Provisioned {
            admin_role,
            console,
            matchups,
            leaderboard,
            settings,
            matchup_category,
            archive_category,
        })
    }

    async fn create(
        &self,
        tenant: &TenantId,
        spec: ChannelSpec,
        created: &mut Vec<String>,
    ) -> Result<ChannelId, PlatformError> {
        let id = self.platform().create_channel(tenant, &spec).await?;
        info!(%tenant, name = %spec.name, %id, "Created channel");
        created.push(spec.name);
        Ok(id)
    }
}
