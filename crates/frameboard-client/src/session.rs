//! Workspace state: the project list, the frame list, and open frame tabs.

use crate::store::FrameStore;
use crate::worker::{StoreCommand, StoreEvent, StoreWorker};
use frameboard_core::model::{
    ComponentCreate, ComponentId, ComponentPatch, Frame, FrameId, Project, ProjectId,
};
use thiserror::Error;

/// Local validation errors, raised before any request is sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("Name must not be empty")]
    EmptyName,
    #[error("No project selected")]
    NoProjectSelected,
}

/// A user-facing failure notice collected from the worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Short action label, e.g. `create frame`.
    pub action: &'static str,
    pub message: String,
}

/// Owned session state over one store.
///
/// Mutations are optimistic: the local transition completes immediately,
/// the store call runs on the worker thread, and the follow-up refresh
/// resyncs the lists to backend truth. Call [`poll`](Self::poll) once per
/// tick to apply refreshes and collect failure [`Notice`]s for display.
pub struct Workspace {
    worker: StoreWorker,
    projects: Vec<Project>,
    current_project: Option<ProjectId>,
    frames: Vec<Frame>,
    open_frames: Vec<FrameId>,
    active_frame: Option<FrameId>,
}

impl Workspace {
    /// Create a workspace over a store and queue the initial project load.
    pub fn new(store: Box<dyn FrameStore>) -> Self {
        let worker = StoreWorker::spawn(store);
        worker.send(StoreCommand::RefreshProjects);
        Self {
            worker,
            projects: Vec::new(),
            current_project: None,
            frames: Vec::new(),
            open_frames: Vec::new(),
            active_frame: None,
        }
    }

    /// All known projects, in backend order.
    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    /// The currently selected project, if it still exists.
    pub fn current_project(&self) -> Option<&Project> {
        let id = self.current_project?;
        self.projects.iter().find(|p| p.id == id)
    }

    /// Frames of the current project.
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// Ids of the open frame tabs, in opening order.
    pub fn open_frames(&self) -> &[FrameId] {
        &self.open_frames
    }

    /// The active frame, if any.
    pub fn active_frame(&self) -> Option<&Frame> {
        let id = self.active_frame?;
        self.frames.iter().find(|f| f.id == id)
    }

    /// Drain worker events, apply list refreshes, and collect notices.
    pub fn poll(&mut self) -> Vec<Notice> {
        let mut notices = Vec::new();
        for event in self.worker.poll_events() {
            match event {
                StoreEvent::Projects(projects) => self.apply_projects(projects),
                StoreEvent::Frames(frames) => self.apply_frames(frames),
                StoreEvent::ActionFailed { action, message } => {
                    notices.push(Notice { action, message });
                }
            }
        }
        notices
    }

    /// Select a project (or none) and load its frames.
    pub fn select_project(&mut self, project: Option<ProjectId>) {
        self.current_project = project;
        self.frames.clear();
        self.open_frames.clear();
        self.active_frame = None;
        self.worker.send(StoreCommand::SetProjectScope(project));
    }

    /// Ask the worker for a fresh project list.
    pub fn refresh_projects(&self) {
        self.worker.send(StoreCommand::RefreshProjects);
    }

    /// Ask the worker for a fresh frame list.
    pub fn refresh_frames(&self) {
        self.worker.send(StoreCommand::RefreshFrames);
    }

    pub fn create_project(&mut self, name: &str) -> Result<(), SessionError> {
        let name = valid_name(name)?;
        self.worker.send(StoreCommand::CreateProject { name });
        Ok(())
    }

    pub fn rename_project(&mut self, id: ProjectId, name: &str) -> Result<(), SessionError> {
        let name = valid_name(name)?;
        self.worker.send(StoreCommand::RenameProject { id, name });
        Ok(())
    }

    pub fn delete_project(&mut self, id: ProjectId) {
        if self.current_project == Some(id) {
            self.select_project(None);
        }
        self.worker.send(StoreCommand::DeleteProject { id });
    }

    /// Create a frame in the current project.
    pub fn create_frame(&mut self, name: &str) -> Result<(), SessionError> {
        let name = valid_name(name)?;
        let project = self.current_project.ok_or(SessionError::NoProjectSelected)?;
        self.worker.send(StoreCommand::CreateFrame { name, project });
        Ok(())
    }

    pub fn rename_frame(&mut self, id: FrameId, name: &str) -> Result<(), SessionError> {
        let name = valid_name(name)?;
        self.worker.send(StoreCommand::RenameFrame { id, name });
        Ok(())
    }

    /// Delete a frame, closing its tab immediately.
    pub fn delete_frame(&mut self, id: FrameId) {
        self.close_frame(id);
        self.frames.retain(|f| f.id != id);
        self.worker.send(StoreCommand::DeleteFrame { id });
    }

    /// Open a frame tab and make it active. Unknown ids are ignored.
    pub fn open_frame(&mut self, id: FrameId) {
        if !self.frames.iter().any(|f| f.id == id) {
            log::warn!("ignoring open for unknown frame {}", id);
            return;
        }
        if !self.open_frames.contains(&id) {
            self.open_frames.push(id);
        }
        self.active_frame = Some(id);
    }

    /// Close a frame tab; the last remaining open tab becomes active.
    pub fn close_frame(&mut self, id: FrameId) {
        self.open_frames.retain(|open| *open != id);
        if self.active_frame == Some(id) {
            self.active_frame = self.open_frames.last().copied();
        }
    }

    /// Request a component creation; the id arrives with the next refresh.
    pub fn create_component(&mut self, create: ComponentCreate) {
        self.worker.send(StoreCommand::CreateComponent(create));
    }

    /// Patch a component, applying the change locally right away so drags
    /// render smoothly before the refresh lands.
    pub fn update_component(&mut self, id: ComponentId, patch: ComponentPatch) {
        for frame in &mut self.frames {
            if let Some(component) = frame.components.iter_mut().find(|c| c.id == id) {
                patch.apply_to(component);
                break;
            }
        }
        self.worker.send(StoreCommand::UpdateComponent { id, patch });
    }

    /// Delete a component, removing it locally right away.
    pub fn delete_component(&mut self, id: ComponentId) {
        for frame in &mut self.frames {
            frame.components.retain(|c| c.id != id);
        }
        self.worker.send(StoreCommand::DeleteComponent { id });
    }

    fn apply_projects(&mut self, projects: Vec<Project>) {
        self.projects = projects;
        if let Some(current) = self.current_project {
            if !self.projects.iter().any(|p| p.id == current) {
                log::debug!("current project {} no longer exists", current);
                self.select_project(None);
            }
        }
    }

    fn apply_frames(&mut self, frames: Vec<Frame>) {
        self.frames = frames;
        let frames = &self.frames;
        self.open_frames.retain(|id| frames.iter().any(|f| f.id == *id));
        if let Some(active) = self.active_frame {
            if !self.open_frames.contains(&active) {
                self.active_frame = self.open_frames.last().copied();
            }
        }
    }
}

fn valid_name(name: &str) -> Result<String, SessionError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(SessionError::EmptyName);
    }
    Ok(name.to_string())
}
