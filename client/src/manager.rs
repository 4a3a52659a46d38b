use std::collections::HashSet;
use std::fmt;
use std::sync::{Mutex, MutexGuard};

use crate::api::ResourceApi;
use crate::error::ApiError;
use crate::model::{Resource, SortKey, UploadFile};
use crate::notify::Notifier;

pub const LOAD_FAILED_NOTICE: &str = "Failed to load photos!";
pub const UPLOAD_SUCCESS_NOTICE: &str = "Photos uploaded successfully!";
pub const DELETE_SUCCESS_NOTICE: &str = "Photo deleted successfully";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Load,
    Upload,
    Delete,
    Rename,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Operation::Load => "load",
            Operation::Upload => "upload",
            Operation::Delete => "delete",
            Operation::Rename => "rename",
        })
    }
}

/// Whether a patch carries server data or the client's own value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchPolicy {
    /// Built from what the server returned
    Confirmed,
    /// Built from what the client sent, once the server said yes
    Optimistic,
}

/// A change to the local list. Only applied after a successful call.
#[derive(Debug, Clone, PartialEq)]
pub enum Patch {
    Replace(Vec<Resource>),
    Prepend(Vec<Resource>),
    Remove { id: String },
    Rename { id: String, name: String },
}

impl Patch {
    pub fn policy(&self) -> PatchPolicy {
        match self {
            Patch::Rename { .. } => PatchPolicy::Optimistic,
            Patch::Replace(_) | Patch::Prepend(_) | Patch::Remove { .. } => PatchPolicy::Confirmed,
        }
    }

    /// Apply to `resources`, keeping ids unique (first occurrence wins)
    pub fn apply(self, resources: &mut Vec<Resource>) {
        match self {
            Patch::Replace(list) => *resources = unique_by_id(list),
            Patch::Prepend(list) => {
                let mut merged = unique_by_id(list);
                let incoming: HashSet<&str> = merged.iter().map(|r| r.id.as_str()).collect();
                let kept: Vec<Resource> = resources
                    .drain(..)
                    .filter(|r| !incoming.contains(r.id.as_str()))
                    .collect();
                merged.extend(kept);
                *resources = merged;
            }
            Patch::Remove { id } => resources.retain(|r| r.id != id),
            Patch::Rename { id, name } => {
                if let Some(resource) = resources.iter_mut().find(|r| r.id == id) {
                    resource.name = name;
                }
            }
        }
    }
}

fn unique_by_id(list: Vec<Resource>) -> Vec<Resource> {
    let mut seen = HashSet::new();
    list.into_iter()
        .filter(|r| seen.insert(r.id.clone()))
        .collect()
}

/// Entries whose name contains `search`, ignoring case
pub fn filter_by_name(resources: &[Resource], search: &str) -> Vec<Resource> {
    let needle = search.to_lowercase();
    resources
        .iter()
        .filter(|r| r.name.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}

#[derive(Debug, Default)]
struct State {
    owner: String,
    resources: Vec<Resource>,
    pending: bool,
    search: String,
    sort: SortKey,
    loads_issued: u64,
}

/// Owns one user's list of one collection and keeps it in step with the API.
///
/// Every operation swallows its failures: they end in an `error!` log and an
/// error notice, never in a return value. Operations take `&self` and may run
/// concurrently; each applies its patch when its call resolves.
pub struct ResourceManager<A, N> {
    api: A,
    notifier: N,
    state: Mutex<State>,
}

impl<A: ResourceApi, N: Notifier> ResourceManager<A, N> {
    /// Build without loading; call `load` when ready
    pub fn new(api: A, notifier: N, owner: impl Into<String>) -> Self {
        Self {
            api,
            notifier,
            state: Mutex::new(State {
                owner: owner.into(),
                ..State::default()
            }),
        }
    }

    /// Build and run the initial load
    pub async fn mount(api: A, notifier: N, owner: impl Into<String>) -> Self {
        let manager = Self::new(api, notifier, owner);
        manager.load().await;
        manager
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn owner(&self) -> String {
        self.state().owner.clone()
    }

    pub fn resources(&self) -> Vec<Resource> {
        self.state().resources.clone()
    }

    /// The list filtered by the current search term
    pub fn visible(&self) -> Vec<Resource> {
        let state = self.state();
        filter_by_name(&state.resources, &state.search)
    }

    pub fn is_pending(&self) -> bool {
        self.state().pending
    }

    pub fn search(&self) -> String {
        self.state().search.clone()
    }

    pub fn set_search(&self, search: impl Into<String>) {
        self.state().search = search.into();
    }

    pub fn sort_key(&self) -> SortKey {
        self.state().sort
    }

    /// Reloads when the key actually changes
    pub async fn set_sort_key(&self, sort: SortKey) {
        {
            let mut state = self.state();
            if state.sort == sort {
                return;
            }
            state.sort = sort;
        }
        self.load().await;
    }

    /// Reloads when the owner actually changes
    pub async fn set_owner(&self, owner: impl Into<String>) {
        let owner = owner.into();
        {
            let mut state = self.state();
            if state.owner == owner {
                return;
            }
            state.owner = owner;
        }
        self.load().await;
    }

    /// Replace the list with the server's. A no-op until there is an owner.
    pub async fn load(&self) {
        let (owner, sort, issued) = {
            let mut state = self.state();
            if state.owner.is_empty() {
                tracing::debug!("load skipped: no owner yet");
                return;
            }
            state.loads_issued += 1;
            (state.owner.clone(), state.sort, state.loads_issued)
        };

        match self.api.list(&owner, sort).await {
            Ok(list) => {
                let mut state = self.state();
                if issued != state.loads_issued {
                    tracing::warn!(
                        "⚠️ stale load applied: owner={}, sort={}, current owner={}, current sort={}",
                        owner,
                        sort,
                        state.owner,
                        state.sort
                    );
                }
                tracing::info!("📥 loaded {} resources: owner={}, sort={}", list.len(), owner, sort);
                apply(&mut state, Patch::Replace(list));
            }
            Err(e) => self.fail(Operation::Load, &e),
        }
    }

    /// Upload the files whose names are not in the list yet, as one batch
    pub async fn upload(&self, files: Vec<UploadFile>) {
        let (owner, fresh) = match self.begin_upload(files) {
            Ok(batch) => batch,
            Err(e) => return self.fail(Operation::Upload, &e),
        };

        let result = self.api.upload(&owner, &fresh).await;

        match result {
            Ok(created) => {
                {
                    let mut state = self.state();
                    tracing::info!("✅ uploaded {} resources: owner={}", created.len(), owner);
                    apply(&mut state, Patch::Prepend(created));
                    state.pending = false;
                }
                self.notifier.success(UPLOAD_SUCCESS_NOTICE);
            }
            Err(e) => {
                self.state().pending = false;
                self.fail(Operation::Upload, &e);
            }
        }
    }

    /// Validate and partition a batch; marks the upload pending on success
    fn begin_upload(&self, files: Vec<UploadFile>) -> Result<(String, Vec<UploadFile>), ApiError> {
        let mut state = self.state();
        if state.owner.is_empty() {
            return Err(ApiError::Validation("User ID is required".to_string()));
        }
        if files.is_empty() {
            return Err(ApiError::Validation("No files selected".to_string()));
        }

        let existing: HashSet<&str> = state.resources.iter().map(|r| r.name.as_str()).collect();
        let (duplicates, fresh): (Vec<UploadFile>, Vec<UploadFile>) = files
            .into_iter()
            .partition(|file| existing.contains(file.name.as_str()));

        if fresh.is_empty() {
            state.pending = false;
            return Err(ApiError::Duplicate {
                names: duplicates.into_iter().map(|file| file.name).collect(),
            });
        }
        if !duplicates.is_empty() {
            tracing::info!("skipping {} already uploaded files", duplicates.len());
        }

        state.pending = true;
        Ok((state.owner.clone(), fresh))
    }

    /// Remove a resource once the server confirms the delete
    pub async fn delete(&self, id: &str, url: &str) {
        if id.is_empty() || url.is_empty() {
            let e = ApiError::Validation("Missing parameters".to_string());
            return self.fail(Operation::Delete, &e);
        }

        match self.api.delete(id, url).await {
            Ok(()) => {
                apply(&mut self.state(), Patch::Remove { id: id.to_string() });
                self.notifier.success(DELETE_SUCCESS_NOTICE);
            }
            Err(e) => self.fail(Operation::Delete, &e),
        }
    }

    /// Rename locally with `new_name` once the server accepts it
    pub async fn rename(&self, id: &str, new_name: &str) {
        if id.is_empty() || new_name.trim().is_empty() {
            let e = ApiError::Validation("Missing parameters".to_string());
            return self.fail(Operation::Rename, &e);
        }

        match self.api.rename(id, new_name).await {
            Ok(_) => apply(
                &mut self.state(),
                Patch::Rename {
                    id: id.to_string(),
                    name: new_name.to_string(),
                },
            ),
            Err(e) => self.fail(Operation::Rename, &e),
        }
    }

    fn fail(&self, operation: Operation, error: &ApiError) {
        tracing::error!("❌ {} failed: owner={}, error={:?}", operation, self.owner(), error);
        match operation {
            Operation::Load => self.notifier.error(LOAD_FAILED_NOTICE),
            _ => self.notifier.error(&error.to_string()),
        }
    }
}

fn apply(state: &mut State, patch: Patch) {
    tracing::debug!("applying {:?} patch", patch.policy());
    patch.apply(&mut state.resources);
}
