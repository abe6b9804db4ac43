//! In-memory store implementation.

use super::{FrameStore, StoreError, StoreResult};
use frameboard_core::model::{
    Component, ComponentCreate, ComponentId, ComponentPatch, Frame, FrameId, Project, ProjectId,
};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// In-memory store for tests and offline use.
///
/// Mirrors the backend's observable behavior: serial ids starting at 1,
/// frame responses embed their components, and deletes cascade.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

#[derive(Default)]
struct Tables {
    projects: Vec<Project>,
    frames: Vec<Frame>,
    next_project: ProjectId,
    next_frame: FrameId,
    next_component: ComponentId,
}

impl MemoryStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, Tables>> {
        self.tables
            .read()
            .map_err(|e| StoreError::Other(format!("Lock error: {}", e)))
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, Tables>> {
        self.tables
            .write()
            .map_err(|e| StoreError::Other(format!("Lock error: {}", e)))
    }
}

impl FrameStore for MemoryStore {
    fn health(&self) -> StoreResult<()> {
        Ok(())
    }

    fn list_projects(&self) -> StoreResult<Vec<Project>> {
        Ok(self.read()?.projects.clone())
    }

    fn get_project(&self, id: ProjectId) -> StoreResult<Project> {
        self.read()?
            .projects
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("project {}", id)))
    }

    fn create_project(&self, name: &str) -> StoreResult<Project> {
        let mut tables = self.write()?;
        tables.next_project += 1;
        let project = Project {
            id: tables.next_project,
            name: name.to_string(),
        };
        tables.projects.push(project.clone());
        Ok(project)
    }

    fn rename_project(&self, id: ProjectId, name: &str) -> StoreResult<Project> {
        let mut tables = self.write()?;
        let project = tables
            .projects
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| StoreError::NotFound(format!("project {}", id)))?;
        project.name = name.to_string();
        Ok(project.clone())
    }

    fn delete_project(&self, id: ProjectId) -> StoreResult<()> {
        let mut tables = self.write()?;
        let before = tables.projects.len();
        tables.projects.retain(|p| p.id != id);
        if tables.projects.len() == before {
            return Err(StoreError::NotFound(format!("project {}", id)));
        }
        // Frames (and the components inside them) go with the project.
        tables.frames.retain(|f| f.project_id != id);
        Ok(())
    }

    fn list_frames(&self, project: Option<ProjectId>) -> StoreResult<Vec<Frame>> {
        Ok(self
            .read()?
            .frames
            .iter()
            .filter(|f| project.is_none_or(|p| f.project_id == p))
            .cloned()
            .collect())
    }

    fn create_frame(&self, name: &str, project: ProjectId) -> StoreResult<Frame> {
        let mut tables = self.write()?;
        if !tables.projects.iter().any(|p| p.id == project) {
            return Err(StoreError::NotFound(format!("project {}", project)));
        }
        tables.next_frame += 1;
        let frame = Frame {
            id: tables.next_frame,
            name: name.to_string(),
            project_id: project,
            components: Vec::new(),
        };
        tables.frames.push(frame.clone());
        Ok(frame)
    }

    fn rename_frame(&self, id: FrameId, name: &str) -> StoreResult<Frame> {
        let mut tables = self.write()?;
        let frame = tables
            .frames
            .iter_mut()
            .find(|f| f.id == id)
            .ok_or_else(|| StoreError::NotFound(format!("frame {}", id)))?;
        frame.name = name.to_string();
        Ok(frame.clone())
    }

    fn delete_frame(&self, id: FrameId) -> StoreResult<()> {
        let mut tables = self.write()?;
        let before = tables.frames.len();
        tables.frames.retain(|f| f.id != id);
        if tables.frames.len() == before {
            return Err(StoreError::NotFound(format!("frame {}", id)));
        }
        Ok(())
    }

    fn create_component(&self, create: &ComponentCreate) -> StoreResult<Component> {
        let mut tables = self.write()?;
        let index = tables
            .frames
            .iter()
            .position(|f| f.id == create.frame_id)
            .ok_or_else(|| StoreError::NotFound(format!("frame {}", create.frame_id)))?;
        tables.next_component += 1;
        let component = Component {
            id: tables.next_component,
            frame_id: create.frame_id,
            name: create.name.clone(),
            kind: create.kind,
            x: create.x,
            y: create.y,
            width: create.width,
            height: create.height,
            properties: create.properties.clone(),
        };
        tables.frames[index].components.push(component.clone());
        Ok(component)
    }

    fn update_component(&self, id: ComponentId, patch: &ComponentPatch) -> StoreResult<Component> {
        let mut tables = self.write()?;
        let component = tables
            .frames
            .iter_mut()
            .flat_map(|f| f.components.iter_mut())
            .find(|c| c.id == id)
            .ok_or_else(|| StoreError::NotFound(format!("component {}", id)))?;
        patch.apply_to(component);
        Ok(component.clone())
    }

    fn delete_component(&self, id: ComponentId) -> StoreResult<()> {
        let mut tables = self.write()?;
        let frame = tables
            .frames
            .iter_mut()
            .find(|f| f.components.iter().any(|c| c.id == id))
            .ok_or_else(|| StoreError::NotFound(format!("component {}", id)))?;
        frame.components.retain(|c| c.id != id);
        Ok(())
    }
}
