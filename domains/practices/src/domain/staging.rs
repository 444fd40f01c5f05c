//! Asset staging: the transient, local side of uploaded files
//!
//! Preview and video files get a revocable preview handle when staged.
//! `AssetStagingManager` is the only owner of those handles: a draft keeps
//! copies for rendering, but revocation always goes through the manager,
//! which forgets a handle before revoking it so no handle is revoked twice.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use thiserror::Error;
use uuid::Uuid;

use super::entities::{
    AssetId, AssetKind, AssetReference, ContentDraft, FileDescriptor, PreviewHandle,
    DOCUMENT_EXTENSIONS, MAX_VIDEO_SIZE_BYTES,
};

/// Failures of the preview handle registry
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResourceError {
    #[error("Could not allocate a preview handle for {0}")]
    AllocationFailed(String),

    #[error("Preview handle is not live: {0}")]
    UnknownHandle(String),

    #[error("Could not revoke preview handle {0}")]
    RevocationFailed(String),
}

/// Errors returned by staging operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StagingError {
    #[error("A {mime_type} file cannot be staged as {kind}")]
    UnsupportedKind { kind: AssetKind, mime_type: String },

    #[error(transparent)]
    Resource(#[from] ResourceError),
}

/// Allocates and revokes local preview handles
pub trait PreviewHandleRegistry: Send + Sync + fmt::Debug {
    fn allocate(&self, file: &FileDescriptor) -> Result<PreviewHandle, ResourceError>;

    fn revoke(&self, handle: &PreviewHandle) -> Result<(), ResourceError>;
}

#[derive(Debug, Default)]
struct RegistryState {
    live: HashSet<PreviewHandle>,
    allocations: usize,
    revocations: HashMap<PreviewHandle, usize>,
    fail_next_allocation: bool,
    fail_next_revocation: bool,
}

/// In-process handle registry
///
/// Clones share state, so a test can keep one clone to observe what the
/// staging manager did with the other.
#[derive(Debug, Clone, Default)]
pub struct LocalHandleRegistry {
    state: Arc<Mutex<RegistryState>>,
}

impl LocalHandleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of handles allocated and not yet revoked
    pub fn live_count(&self) -> usize {
        self.lock().live.len()
    }

    pub fn is_live(&self, handle: &PreviewHandle) -> bool {
        self.lock().live.contains(handle)
    }

    /// Total handles ever allocated
    pub fn allocation_count(&self) -> usize {
        self.lock().allocations
    }

    /// How many times `handle` was revoked successfully
    pub fn revocation_count(&self, handle: &PreviewHandle) -> usize {
        self.lock().revocations.get(handle).copied().unwrap_or(0)
    }

    /// Make the next allocation fail, as a browser does under memory pressure
    pub fn fail_next_allocation(&self) {
        self.lock().fail_next_allocation = true;
    }

    /// Make the next revocation fail; the handle stays live and leaks
    pub fn fail_next_revocation(&self) {
        self.lock().fail_next_revocation = true;
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, RegistryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl PreviewHandleRegistry for LocalHandleRegistry {
    fn allocate(&self, file: &FileDescriptor) -> Result<PreviewHandle, ResourceError> {
        let mut state = self.lock();
        if std::mem::take(&mut state.fail_next_allocation) {
            return Err(ResourceError::AllocationFailed(file.name.clone()));
        }

        let handle = PreviewHandle::new(format!("blob:practica/{}", Uuid::new_v4()));
        state.live.insert(handle.clone());
        state.allocations += 1;
        Ok(handle)
    }

    fn revoke(&self, handle: &PreviewHandle) -> Result<(), ResourceError> {
        let mut state = self.lock();
        if std::mem::take(&mut state.fail_next_revocation) {
            return Err(ResourceError::RevocationFailed(handle.to_string()));
        }
        if !state.live.remove(handle) {
            return Err(ResourceError::UnknownHandle(handle.to_string()));
        }
        *state.revocations.entry(handle.clone()).or_default() += 1;
        Ok(())
    }
}

/// Owner of every preview handle allocated for a draft
#[derive(Debug)]
pub struct AssetStagingManager {
    registry: Arc<dyn PreviewHandleRegistry>,
    owned: HashMap<AssetId, PreviewHandle>,
}

impl AssetStagingManager {
    pub fn new(registry: Arc<dyn PreviewHandleRegistry>) -> Self {
        Self {
            registry,
            owned: HashMap::new(),
        }
    }

    /// Stage a picked file into `draft`
    ///
    /// A new preview or video replaces the current one; the replaced handle
    /// is revoked before the new one is allocated. If allocation fails the
    /// slot is left empty so the user can pick again.
    pub fn stage(
        &mut self,
        draft: &mut ContentDraft,
        kind: AssetKind,
        file: FileDescriptor,
    ) -> Result<AssetReference, StagingError> {
        check_kind(kind, &file)?;
        warn_on_advisory_filters(kind, &file);

        if !kind.has_preview_handle() {
            let asset = AssetReference {
                id: AssetId::new(),
                kind,
                original_name: file.name,
                size_bytes: file.size_bytes,
                preview_handle: None,
            };
            tracing::debug!(asset_id = %asset.id, name = %asset.original_name, "Staged document");
            draft.push_document(asset.clone());
            return Ok(asset);
        }

        if let Some(previous) = draft.replace_slot(kind, None) {
            tracing::debug!(asset_id = %previous.id, %kind, "Replacing staged asset");
            self.release(previous.id);
        }

        let handle = match self.registry.allocate(&file) {
            Ok(handle) => handle,
            Err(e) => {
                tracing::warn!(error = %e, %kind, name = %file.name, "Preview handle allocation failed, slot left empty");
                return Err(e.into());
            }
        };

        let asset = AssetReference {
            id: AssetId::new(),
            kind,
            original_name: file.name,
            size_bytes: file.size_bytes,
            preview_handle: Some(handle.clone()),
        };
        self.owned.insert(asset.id, handle);
        draft.replace_slot(kind, Some(asset.clone()));

        tracing::debug!(asset_id = %asset.id, %kind, name = %asset.original_name, "Staged asset with preview handle");
        Ok(asset)
    }

    /// Stage several documents at once, keeping their order
    pub fn stage_documents(
        &mut self,
        draft: &mut ContentDraft,
        files: impl IntoIterator<Item = FileDescriptor>,
    ) -> Result<Vec<AssetReference>, StagingError> {
        files
            .into_iter()
            .map(|file| self.stage(draft, AssetKind::Document, file))
            .collect()
    }

    /// Remove an asset by id, revoking its handle. Unknown ids are ignored.
    pub fn unstage(&mut self, draft: &mut ContentDraft, id: AssetId) -> Option<AssetReference> {
        let removed = draft.take_asset(id)?;
        self.release(removed.id);
        tracing::debug!(asset_id = %id, kind = %removed.kind, "Unstaged asset");
        Some(removed)
    }

    /// Empty the preview or video slot
    pub fn clear(&mut self, draft: &mut ContentDraft, kind: AssetKind) -> Option<AssetReference> {
        let removed = draft.replace_slot(kind, None)?;
        self.release(removed.id);
        Some(removed)
    }

    /// Revoke every handle still owned; used on workflow teardown
    pub fn release_all(&mut self) {
        let ids: Vec<AssetId> = self.owned.keys().copied().collect();
        for id in ids {
            self.release(id);
        }
    }

    /// Handles currently owned by this manager
    pub fn live_handle_count(&self) -> usize {
        self.owned.len()
    }

    fn release(&mut self, id: AssetId) {
        let Some(handle) = self.owned.remove(&id) else {
            return;
        };
        match self.registry.revoke(&handle) {
            Ok(()) => tracing::debug!(asset_id = %id, handle = %handle, "Revoked preview handle"),
            Err(e) => tracing::warn!(asset_id = %id, error = %e, "Preview handle revocation failed"),
        }
    }
}

impl Drop for AssetStagingManager {
    #[mutants::skip] // Teardown path; covered by the release_all tests
    fn drop(&mut self) {
        if !self.owned.is_empty() {
            tracing::debug!(handles = self.owned.len(), "Releasing preview handles on teardown");
            self.release_all();
        }
    }
}

/// Reject only files that declare a MIME category contradicting the slot
fn check_kind(kind: AssetKind, file: &FileDescriptor) -> Result<(), StagingError> {
    let (Some(required), Some(declared)) = (kind.required_mime_category(), file.mime_category())
    else {
        return Ok(());
    };

    if declared.eq_ignore_ascii_case(required) {
        Ok(())
    } else {
        Err(StagingError::UnsupportedKind {
            kind,
            mime_type: file.mime_type.clone().unwrap_or_default(),
        })
    }
}

fn warn_on_advisory_filters(kind: AssetKind, file: &FileDescriptor) {
    match kind {
        AssetKind::Preview | AssetKind::Video if file.mime_category().is_none() => {
            tracing::warn!(%kind, name = %file.name, accept = kind.accept_filter(), "File has no usable MIME type, accepting anyway");
        }
        AssetKind::Document => {
            let listed = file
                .extension()
                .is_some_and(|ext| DOCUMENT_EXTENSIONS.contains(&ext.as_str()));
            if !listed {
                tracing::warn!(name = %file.name, accept = kind.accept_filter(), "Document extension outside the picker filter, accepting anyway");
            }
        }
        _ => {}
    }

    if kind == AssetKind::Video && file.size_bytes > MAX_VIDEO_SIZE_BYTES {
        tracing::warn!(name = %file.name, size_bytes = file.size_bytes, "Video exceeds the advertised 500MB limit");
    }
}
