//! # Archive Storage
//!
//! Storage seam for saved projects, templates and the working draft.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  ArchiveStore (trait)                       │
//! │  ├── projects:  save / list / get / delete                  │
//! │  ├── templates: save / list / rename / delete               │
//! │  └── draft:     save / load / clear                         │
//! └─────────────────────────────────────────────────────────────┘
//!                            ▲
//!                   ┌────────┴────────┐
//!                   │  MemoryArchive  │
//!                   └─────────────────┘
//! ```

use crate::configuration::Selection;
use crate::error::{QuoteError, QuoteResult};
use crate::project::SavedProject;
use crate::template::{DoorTemplate, TemplateLibrary};
use async_trait::async_trait;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::debug;

/// Persistence for everything a user keeps between sessions.
#[async_trait]
pub trait ArchiveStore: Send + Sync {
    /// Store a snapshot. A snapshot with a known id replaces the old one.
    /// The saved snapshot becomes the newest.
    async fn save_project(&self, project: SavedProject) -> QuoteResult<SavedProject>;

    /// All snapshots, newest first
    async fn list_projects(&self) -> QuoteResult<Vec<SavedProject>>;

    async fn get_project(&self, project_id: &str) -> QuoteResult<SavedProject>;

    async fn delete_project(&self, project_id: &str) -> QuoteResult<()>;

    async fn save_template(&self, template: DoorTemplate) -> QuoteResult<DoorTemplate>;

    async fn list_templates(&self) -> QuoteResult<Vec<DoorTemplate>>;

    async fn rename_template(&self, template_id: &str, name: &str) -> QuoteResult<DoorTemplate>;

    async fn delete_template(&self, template_id: &str) -> QuoteResult<()>;

    /// Overwrite the single draft slot. A draft never carries an edit
    /// target, so restoring it cannot overwrite a project line.
    async fn save_draft(&self, draft: Selection) -> QuoteResult<()>;

    async fn load_draft(&self) -> QuoteResult<Option<Selection>>;

    async fn clear_draft(&self) -> QuoteResult<()>;

    /// Backend name (for logging)
    fn backend_name(&self) -> &'static str;
}

/// Type alias for a shared archive (dynamic dispatch)
pub type BoxedArchiveStore = Arc<dyn ArchiveStore>;

#[derive(Debug, Default)]
struct ArchiveState {
    /// Newest first
    projects: Vec<SavedProject>,
    templates: TemplateLibrary,
    draft: Option<Selection>,
}

/// In-process archive
#[derive(Debug, Default)]
pub struct MemoryArchive {
    state: RwLock<ArchiveState>,
}

impl MemoryArchive {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared handle for use as a [`BoxedArchiveStore`]
    pub fn shared() -> BoxedArchiveStore {
        Arc::new(Self::new())
    }

    fn read(&self) -> QuoteResult<RwLockReadGuard<'_, ArchiveState>> {
        self.state
            .read()
            .map_err(|_| QuoteError::Storage("archive lock poisoned".to_string()))
    }

    fn write(&self) -> QuoteResult<RwLockWriteGuard<'_, ArchiveState>> {
        self.state
            .write()
            .map_err(|_| QuoteError::Storage("archive lock poisoned".to_string()))
    }
}

#[async_trait]
impl ArchiveStore for MemoryArchive {
    async fn save_project(&self, project: SavedProject) -> QuoteResult<SavedProject> {
        let mut state = self.write()?;
        state.projects.retain(|p| p.id != project.id);
        state.projects.insert(0, project.clone());
        debug!(project_id = %project.id, total = state.projects.len(), "project archived");
        Ok(project)
    }

    async fn list_projects(&self) -> QuoteResult<Vec<SavedProject>> {
        Ok(self.read()?.projects.clone())
    }

    async fn get_project(&self, project_id: &str) -> QuoteResult<SavedProject> {
        self.read()?
            .projects
            .iter()
            .find(|p| p.id == project_id)
            .cloned()
            .ok_or_else(|| QuoteError::ProjectNotFound {
                project_id: project_id.to_string(),
            })
    }

    async fn delete_project(&self, project_id: &str) -> QuoteResult<()> {
        let mut state = self.write()?;
        let before = state.projects.len();
        state.projects.retain(|p| p.id != project_id);
        if state.projects.len() == before {
            return Err(QuoteError::ProjectNotFound {
                project_id: project_id.to_string(),
            });
        }
        Ok(())
    }

    async fn save_template(&self, template: DoorTemplate) -> QuoteResult<DoorTemplate> {
        let mut state = self.write()?;
        state.templates.add(template.clone());
        debug!(template_id = %template.id, "template saved");
        Ok(template)
    }

    async fn list_templates(&self) -> QuoteResult<Vec<DoorTemplate>> {
        Ok(self.read()?.templates.iter().cloned().collect())
    }

    async fn rename_template(&self, template_id: &str, name: &str) -> QuoteResult<DoorTemplate> {
        let mut state = self.write()?;
        let renamed = state.templates.rename(template_id, name)?.clone();
        Ok(renamed)
    }

    async fn delete_template(&self, template_id: &str) -> QuoteResult<()> {
        self.write()?.templates.remove(template_id).map(|_| ())
    }

    async fn save_draft(&self, mut draft: Selection) -> QuoteResult<()> {
        draft.editing_id = None;
        self.write()?.draft = Some(draft);
        Ok(())
    }

    async fn load_draft(&self) -> QuoteResult<Option<Selection>> {
        Ok(self.read()?.draft.clone())
    }

    async fn clear_draft(&self) -> QuoteResult<()> {
        self.write()?.draft = None;
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
