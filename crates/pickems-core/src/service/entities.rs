//! Entity accessors.
//!
//! Typed get/set pairs over the [`DocumentStore`], one per document kind,
//! plus projections of single settings fields used by the command layer.

use pickems_types::document::{DocumentKind, DocumentValue};
use pickems_types::entities::{LastMatchupMessages, Matchups, ReactionMap, Weeks};
use pickems_types::error::StoreError;
use pickems_types::platform::ChannelId;
use pickems_types::settings::Settings;
use pickems_types::tenant::TenantId;

use crate::service::fs::FileSystem;
use crate::service::typed::{self, TypedDocument};
use crate::storage::DocumentStore;

/// Typed access to the five per-tenant documents.
///
/// Getters return `Ok(None)` for an absent document. A present document that
/// does not decode to its kind's type is a [`StoreError::Parse`].
pub struct EntityService<F: FileSystem> {
    store: DocumentStore<F>,
}

impl<F: FileSystem> EntityService<F> {
    pub fn new(store: DocumentStore<F>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &DocumentStore<F> {
        &self.store
    }

    /// Read a typed document.
    pub async fn get<T: TypedDocument>(&self, tenant: &TenantId) -> Result<Option<T>, StoreError> {
        let Some(value) = self.store.read(tenant, T::KIND).await? else {
            return Ok(None);
        };
        T::from_value(value).map(Some).map_err(|message| StoreError::Parse {
            path: self.store.document_path(tenant, T::KIND),
            message,
        })
    }

    /// Replace a typed document.
    pub async fn set<T: TypedDocument>(&self, tenant: &TenantId, document: &T) -> Result<(), StoreError> {
        let value = document.to_value().map_err(|message| StoreError::Encode {
            kind: T::KIND,
            message,
        })?;
        self.store.write(tenant, T::KIND, &value).await
    }

    /// Read a document as stored, without checking it against its kind.
    pub async fn get_raw(
        &self,
        tenant: &TenantId,
        kind: DocumentKind,
    ) -> Result<Option<DocumentValue>, StoreError> {
        self.store.read(tenant, kind).await
    }

    /// Replace a document after checking the value fits its kind.
    pub async fn set_raw(
        &self,
        tenant: &TenantId,
        kind: DocumentKind,
        value: &DocumentValue,
    ) -> Result<(), StoreError> {
        typed::validate(kind, value).map_err(|message| StoreError::Encode { kind, message })?;
        self.store.write(tenant, kind, value).await
    }

    pub async fn get_reaction_map(&self, tenant: &TenantId) -> Result<Option<ReactionMap>, StoreError> {
        self.get(tenant).await
    }

    pub async fn set_reaction_map(&self, tenant: &TenantId, map: &ReactionMap) -> Result<(), StoreError> {
        self.set(tenant, map).await
    }

    pub async fn get_matchups(&self, tenant: &TenantId) -> Result<Option<Matchups>, StoreError> {
        self.get(tenant).await
    }

    pub async fn set_matchups(&self, tenant: &TenantId, matchups: &Matchups) -> Result<(), StoreError> {
        self.set(tenant, matchups).await
    }

    pub async fn get_settings(&self, tenant: &TenantId) -> Result<Option<Settings>, StoreError> {
        self.get(tenant).await
    }

    pub async fn set_settings(&self, tenant: &TenantId, settings: &Settings) -> Result<(), StoreError> {
        self.set(tenant, settings).await
    }

    pub async fn get_weeks(&self, tenant: &TenantId) -> Result<Option<Weeks>, StoreError> {
        self.get(tenant).await
    }

    pub async fn set_weeks(&self, tenant: &TenantId, weeks: &Weeks) -> Result<(), StoreError> {
        self.set(tenant, weeks).await
    }

    pub async fn get_last_matchup_messages(
        &self,
        tenant: &TenantId,
    ) -> Result<Option<LastMatchupMessages>, StoreError> {
        self.get(tenant).await
    }

    pub async fn set_last_matchup_messages(
        &self,
        tenant: &TenantId,
        messages: &LastMatchupMessages,
    ) -> Result<(), StoreError> {
        self.set(tenant, messages).await
    }

    async fn settings_field(
        &self,
        tenant: &TenantId,
        field: impl FnOnce(Settings) -> Option<ChannelId>,
    ) -> Result<Option<ChannelId>, StoreError> {
        Ok(self.get_settings(tenant).await?.and_then(field))
    }

    pub async fn matchups_channel_id(&self, tenant: &TenantId) -> Result<Option<ChannelId>, StoreError> {
        self.settings_field(tenant, |s| s.matchups_channel_id).await
    }

    pub async fn leaderboard_channel_id(&self, tenant: &TenantId) -> Result<Option<ChannelId>, StoreError> {
        self.settings_field(tenant, |s| s.leaderboard_channel_id).await
    }

    pub async fn console_channel_id(&self, tenant: &TenantId) -> Result<Option<ChannelId>, StoreError> {
        self.settings_field(tenant, |s| s.console_channel_id).await
    }

    /// Channel the settings mirror is published to.
    pub async fn settings_channel_id(&self, tenant: &TenantId) -> Result<Option<ChannelId>, StoreError> {
        self.settings_field(tenant, |s| s.settings_channel_id).await
    }

    pub async fn pickems_matchup_category_id(
        &self,
        tenant: &TenantId,
    ) -> Result<Option<ChannelId>, StoreError> {
        self.settings_field(tenant, |s| s.pickems_matchup_category_id).await
    }

    pub async fn pickems_matchup_archive_category_id(
        &self,
        tenant: &TenantId,
    ) -> Result<Option<ChannelId>, StoreError> {
        self.settings_field(tenant, |s| s.pickems_matchup_archive_category_id)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MemoryFileSystem;
    use pickems_types::document::OrderedMap;
    use serde_json::json;
    use std::path::{Path, PathBuf};

    fn tenant() -> TenantId {
        TenantId::parse("42").unwrap()
    }

    fn make_service() -> EntityService<MemoryFileSystem> {
        EntityService::new(DocumentStore::new(MemoryFileSystem::new(), PathBuf::from("data")))
    }

    #[tokio::test]
    async fn test_absent_documents_read_as_none() {
        let service = make_service();
        let t = tenant();
        assert!(service.get_reaction_map(&t).await.unwrap().is_none());
        assert!(service.get_matchups(&t).await.unwrap().is_none());
        assert!(service.get_settings(&t).await.unwrap().is_none());
        assert!(service.get_weeks(&t).await.unwrap().is_none());
        assert!(service.get_last_matchup_messages(&t).await.unwrap().is_none());
        assert!(service.settings_channel_id(&t).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_reaction_map_round_trip_keeps_order() {
        let service = make_service();
        let map: ReactionMap = vec![
            ("🦁".to_string(), "DET".to_string()),
            ("🐻".to_string(), "CHI".to_string()),
            ("🧀".to_string(), "GB".to_string()),
        ]
        .into_iter()
        .collect();

        service.set_reaction_map(&tenant(), &map).await.unwrap();
        let back = service.get_reaction_map(&tenant()).await.unwrap().unwrap();
        assert_eq!(back, map);
        assert_eq!(back.0.keys().collect::<Vec<_>>(), vec!["🦁", "🐻", "🧀"]);
    }

    #[tokio::test]
    async fn test_matchups_round_trip() {
        let service = make_service();
        let mut entries = OrderedMap::new();
        entries.insert(
            "m1",
            DocumentValue::from_json(json!({ "home": "DET", "away": "CHI", "week": 1 })),
        );
        let matchups = Matchups(entries);

        service.set_matchups(&tenant(), &matchups).await.unwrap();
        assert_eq!(service.get_matchups(&tenant()).await.unwrap(), Some(matchups));
    }

    #[tokio::test]
    async fn test_last_matchup_messages_stored_as_plain_object() {
        let service = make_service();
        let index: LastMatchupMessages =
            vec![("m1".to_string(), "555".to_string())].into_iter().collect();
        service.set_last_matchup_messages(&tenant(), &index).await.unwrap();

        let raw = service
            .store()
            .fs()
            .get_string(Path::new("data/42/lastMatchupMessages.json"))
            .unwrap();
        assert_eq!(
            serde_json::from_str::<serde_json::Value>(&raw).unwrap(),
            json!({ "m1": "555" })
        );
        assert_eq!(service.get_last_matchup_messages(&tenant()).await.unwrap(), Some(index));
    }

    #[tokio::test]
    async fn test_wrong_shape_is_parse_error() {
        let service = make_service();
        service
            .store()
            .fs()
            .put("data/42/reactionMap.json", r#"{ "🐻": "CHI" }"#.as_bytes());

        let err = service.get_reaction_map(&tenant()).await.unwrap_err();
        match err {
            StoreError::Parse { path, message } => {
                assert_eq!(path, PathBuf::from("data/42/reactionMap.json"));
                assert!(message.contains("expected map"), "{message}");
            }
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_derived_channel_getters() {
        let service = make_service();
        let settings = Settings {
            matchups_channel_id: Some(ChannelId::new("100")),
            leaderboard_channel_id: Some(ChannelId::new("101")),
            console_channel_id: Some(ChannelId::new("102")),
            settings_channel_id: Some(ChannelId::new("103")),
            pickems_matchup_category_id: Some(ChannelId::new("104")),
            pickems_matchup_archive_category_id: Some(ChannelId::new("105")),
            ..Default::default()
        };
        service.set_settings(&tenant(), &settings).await.unwrap();

        let t = tenant();
        assert_eq!(service.matchups_channel_id(&t).await.unwrap(), Some(ChannelId::new("100")));
        assert_eq!(service.leaderboard_channel_id(&t).await.unwrap(), Some(ChannelId::new("101")));
        assert_eq!(service.console_channel_id(&t).await.unwrap(), Some(ChannelId::new("102")));
        assert_eq!(service.settings_channel_id(&t).await.unwrap(), Some(ChannelId::new("103")));
        assert_eq!(
            service.pickems_matchup_category_id(&t).await.unwrap(),
            Some(ChannelId::new("104"))
        );
        assert_eq!(
            service.pickems_matchup_archive_category_id(&t).await.unwrap(),
            Some(ChannelId::new("105"))
        );
    }

    #[tokio::test]
    async fn test_settings_unknown_fields_survive_set() {
        let service = make_service();
        service
            .store()
            .fs()
            .put("data/42/settings.json", br#"{ "foo": 1, "settingsChannelId": "9" }"#);

        let mut settings = service.get_settings(&tenant()).await.unwrap().unwrap();
        settings.console_channel_id = Some(ChannelId::new("7"));
        service.set_settings(&tenant(), &settings).await.unwrap();

        let raw = service.get_raw(&tenant(), DocumentKind::Settings).await.unwrap().unwrap();
        let record = raw.as_record().unwrap();
        assert_eq!(record.get("foo"), Some(&DocumentValue::from(1i64)));
        assert_eq!(record.get("consoleChannelId").and_then(|v| v.as_str()), Some("7"));
    }

    #[tokio::test]
    async fn test_settings_nested_map_keeps_its_type_on_rewrite() {
        use pickems_types::document::Shape;

        let service = make_service();
        service.store().fs().put(
            "data/42/settings.json",
            br#"{"foo": {"dataType": "Map", "value": [["a", 1]]}}"#,
        );

        let settings = service.get_settings(&tenant()).await.unwrap().unwrap();
        service.set_settings(&tenant(), &settings).await.unwrap();

        let raw = service.get_raw(&tenant(), DocumentKind::Settings).await.unwrap().unwrap();
        let foo = raw.as_record().unwrap().get("foo").unwrap();
        assert_eq!(foo.shape(), Shape::Map);
        assert_eq!(foo.as_map().unwrap().get("a"), Some(&DocumentValue::from(1i64)));

        let on_disk = service
            .store()
            .fs()
            .get_string(Path::new("data/42/settings.json"))
            .unwrap();
        assert!(!on_disk.contains("\"Record\""), "{on_disk}");
    }

    #[tokio::test]
    async fn test_set_raw_rejects_wrong_shape() {
        let service = make_service();
        let err = service
            .set_raw(&tenant(), DocumentKind::Weeks, &DocumentValue::from_json(json!({})))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Encode { kind: DocumentKind::Weeks, .. }));
        assert!(service.store().fs().paths().is_empty());

        service
            .set_raw(&tenant(), DocumentKind::Weeks, &DocumentValue::from_json(json!([{ "n": 1 }])))
            .await
            .unwrap();
        let weeks = service.get_weeks(&tenant()).await.unwrap().unwrap();
        assert_eq!(weeks.0.len(), 1);
    }
}
