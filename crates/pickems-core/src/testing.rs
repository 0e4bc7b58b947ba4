//! In-memory test doubles shared by the unit tests in this crate.

use std::collections::{BTreeSet, HashMap};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use pickems_types::error::PlatformError;
use pickems_types::platform::{ChannelId, ChannelSpec, MessageId, RoleId};
use pickems_types::tenant::TenantId;

use crate::service::fs::FileSystem;
use crate::service::platform::ChatPlatform;

/// Filesystem kept entirely in memory.
#[derive(Default)]
pub struct MemoryFileSystem {
    files: Mutex<HashMap<PathBuf, Vec<u8>>>,
    dirs: Mutex<BTreeSet<PathBuf>>,
    fail_create_dir: Mutex<Option<io::ErrorKind>>,
    fail_rename: Mutex<bool>,
    reads: Mutex<Vec<PathBuf>>,
}

impl MemoryFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(&self, path: impl Into<PathBuf>, content: &[u8]) {
        self.files.lock().unwrap().insert(path.into(), content.to_vec());
    }

    pub fn get(&self, path: &Path) -> Option<Vec<u8>> {
        self.files.lock().unwrap().get(path).cloned()
    }

    pub fn get_string(&self, path: &Path) -> Option<String> {
        self.get(path).map(|b| String::from_utf8(b).unwrap())
    }

    pub fn paths(&self) -> Vec<PathBuf> {
        let mut paths: Vec<PathBuf> = self.files.lock().unwrap().keys().cloned().collect();
        paths.sort();
        paths
    }

    pub fn dirs(&self) -> Vec<PathBuf> {
        self.dirs.lock().unwrap().iter().cloned().collect()
    }

    /// Every path passed to `read_file` or `exists`, in call order.
    pub fn reads(&self) -> Vec<PathBuf> {
        self.reads.lock().unwrap().clone()
    }

    pub fn clear_reads(&self) {
        self.reads.lock().unwrap().clear();
    }

    pub fn fail_create_dir_with(&self, kind: io::ErrorKind) {
        *self.fail_create_dir.lock().unwrap() = Some(kind);
    }

    pub fn fail_renames(&self) {
        *self.fail_rename.lock().unwrap() = true;
    }
}

impl FileSystem for MemoryFileSystem {
    async fn read_file(&self, path: &Path) -> Result<Vec<u8>, io::Error> {
        self.reads.lock().unwrap().push(path.to_path_buf());
        self.get(path)
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no such file"))
    }

    async fn write_file(&self, path: &Path, content: &[u8]) -> Result<(), io::Error> {
        let parent = path.parent().map(Path::to_path_buf).unwrap_or_default();
        if !self.dirs.lock().unwrap().contains(&parent) {
            return Err(io::Error::new(io::ErrorKind::NotFound, "parent directory missing"));
        }
        self.put(path, content);
        Ok(())
    }

    async fn rename(&self, from: &Path, to: &Path) -> Result<(), io::Error> {
        if *self.fail_rename.lock().unwrap() {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "rename refused"));
        }
        let mut files = self.files.lock().unwrap();
        let content = files
            .remove(from)
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no such file"))?;
        files.insert(to.to_path_buf(), content);
        Ok(())
    }

    async fn remove_file(&self, path: &Path) -> Result<(), io::Error> {
        self.files
            .lock()
            .unwrap()
            .remove(path)
            .map(|_| ())
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no such file"))
    }

    async fn create_dir_all(&self, path: &Path) -> Result<(), io::Error> {
        if let Some(kind) = *self.fail_create_dir.lock().unwrap() {
            return Err(io::Error::new(kind, "create_dir_all refused"));
        }
        let mut dirs = self.dirs.lock().unwrap();
        for ancestor in path.ancestors() {
            dirs.insert(ancestor.to_path_buf());
        }
        Ok(())
    }

    async fn exists(&self, path: &Path) -> bool {
        self.reads.lock().unwrap().push(path.to_path_buf());
        self.dirs.lock().unwrap().contains(path) || self.files.lock().unwrap().contains_key(path)
    }
}

/// A created channel and the messages posted to it, oldest first.
#[derive(Debug, Clone)]
pub struct FakeChannel {
    pub spec: ChannelSpec,
    pub messages: Vec<(MessageId, String)>,
}

#[derive(Default)]
struct PlatformState {
    next_id: u64,
    roles: Vec<(RoleId, String)>,
    channels: Vec<(ChannelId, FakeChannel)>,
    fail_sends: bool,
    fail_channel_named: Option<String>,
}

/// Chat platform double that records every call.
#[derive(Default)]
pub struct MockPlatform {
    state: Mutex<PlatformState>,
}

impl MockPlatform {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an existing text channel.
    pub fn with_channel(self, id: &str) -> Self {
        self.state.lock().unwrap().channels.push((
            ChannelId::new(id),
            FakeChannel {
                spec: ChannelSpec::text(id, None, pickems_types::platform::ChannelVisibility::Inherit),
                messages: Vec::new(),
            },
        ));
        self
    }

    pub fn fail_sends(&self) {
        self.state.lock().unwrap().fail_sends = true;
    }

    pub fn fail_channel_named(&self, name: &str) {
        self.state.lock().unwrap().fail_channel_named = Some(name.to_string());
    }

    pub fn messages(&self, channel: &ChannelId) -> Vec<(MessageId, String)> {
        self.state
            .lock()
            .unwrap()
            .channels
            .iter()
            .find(|(id, _)| id == channel)
            .map(|(_, c)| c.messages.clone())
            .unwrap_or_default()
    }

    pub fn channels(&self) -> Vec<(ChannelId, FakeChannel)> {
        self.state.lock().unwrap().channels.clone()
    }

    pub fn roles(&self) -> Vec<(RoleId, String)> {
        self.state.lock().unwrap().roles.clone()
    }

    fn next_id(state: &mut PlatformState) -> String {
        state.next_id += 1;
        format!("{}", 9000 + state.next_id)
    }
}

impl ChatPlatform for MockPlatform {
    async fn create_role(&self, _tenant: &TenantId, name: &str) -> Result<RoleId, PlatformError> {
        let mut state = self.state.lock().unwrap();
        let id = RoleId::new(Self::next_id(&mut state));
        state.roles.push((id.clone(), name.to_string()));
        Ok(id)
    }

    async fn create_channel(
        &self,
        _tenant: &TenantId,
        spec: &ChannelSpec,
    ) -> Result<ChannelId, PlatformError> {
        let mut state = self.state.lock().unwrap();
        if state.fail_channel_named.as_deref() == Some(spec.name.as_str()) {
            return Err(PlatformError::Forbidden("MANAGE_CHANNELS".to_string()));
        }
        let id = ChannelId::new(Self::next_id(&mut state));
        state.channels.push((
            id.clone(),
            FakeChannel {
                spec: spec.clone(),
                messages: Vec::new(),
            },
        ));
        Ok(id)
    }

    async fn latest_message(&self, channel: &ChannelId) -> Result<Option<MessageId>, PlatformError> {
        let state = self.state.lock().unwrap();
        let (_, found) = state
            .channels
            .iter()
            .find(|(id, _)| id == channel)
            .ok_or_else(|| PlatformError::UnknownChannel(channel.to_string()))?;
        Ok(found.messages.last().map(|(id, _)| id.clone()))
    }

    async fn send_message(&self, channel: &ChannelId, content: &str) -> Result<MessageId, PlatformError> {
        let mut state = self.state.lock().unwrap();
        if state.fail_sends {
            return Err(PlatformError::Request("503 Service Unavailable".to_string()));
        }
        let id = MessageId::new(Self::next_id(&mut state));
        let (_, found) = state
            .channels
            .iter_mut()
            .find(|(cid, _)| cid == channel)
            .ok_or_else(|| PlatformError::UnknownChannel(channel.to_string()))?;
        found.messages.push((id.clone(), content.to_string()));
        Ok(id)
    }

    async fn edit_message(
        &self,
        channel: &ChannelId,
        message: &MessageId,
        content: &str,
    ) -> Result<(), PlatformError> {
        let mut state = self.state.lock().unwrap();
        let (_, found) = state
            .channels
            .iter_mut()
            .find(|(cid, _)| cid == channel)
            .ok_or_else(|| PlatformError::UnknownChannel(channel.to_string()))?;
        let (_, body) = found
            .messages
            .iter_mut()
            .find(|(mid, _)| mid == message)
            .ok_or_else(|| PlatformError::Request(format!("unknown message {message}")))?;
        *body = content.to_string();
        Ok(())
    }
}
