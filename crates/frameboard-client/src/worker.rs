//! Background worker that owns the store.
//!
//! Mutations from the UI are fire-and-forget: the worker executes them on
//! its own thread, surfaces failures as events, and after every batch
//! re-fetches the affected lists so the caller resyncs to backend truth
//! instead of merging responses.

use crate::store::{FrameStore, StoreError};
use frameboard_core::model::{
    ComponentCreate, ComponentId, ComponentPatch, Frame, FrameId, Project, ProjectId,
};
use std::collections::HashSet;
use std::sync::mpsc::{Receiver, Sender, TryRecvError, channel};
use std::thread::{self, JoinHandle};

/// Commands sent to the worker thread.
#[derive(Debug, Clone)]
pub enum StoreCommand {
    /// Restrict frame refreshes to one project (or none).
    SetProjectScope(Option<ProjectId>),
    RefreshProjects,
    RefreshFrames,
    CreateProject { name: String },
    RenameProject { id: ProjectId, name: String },
    DeleteProject { id: ProjectId },
    CreateFrame { name: String, project: ProjectId },
    RenameFrame { id: FrameId, name: String },
    DeleteFrame { id: FrameId },
    CreateComponent(ComponentCreate),
    UpdateComponent { id: ComponentId, patch: ComponentPatch },
    DeleteComponent { id: ComponentId },
    Shutdown,
}

/// Events delivered back to the caller.
#[derive(Debug, Clone)]
pub enum StoreEvent {
    /// Fresh project list after a refresh or a project mutation.
    Projects(Vec<Project>),
    /// Fresh frame list for the current project scope.
    Frames(Vec<Frame>),
    /// A store action failed; local state stays as it was.
    ActionFailed { action: &'static str, message: String },
}

/// Handle to the background store thread.
///
/// Commands are queued without blocking; results come back through
/// [`poll_events`](Self::poll_events). Dropping the handle shuts the
/// thread down.
pub struct StoreWorker {
    cmd_tx: Sender<StoreCommand>,
    event_rx: Receiver<StoreEvent>,
    _thread: JoinHandle<()>,
}

impl StoreWorker {
    /// Spawn the worker thread around a store.
    pub fn spawn(store: Box<dyn FrameStore>) -> Self {
        let (cmd_tx, cmd_rx) = channel::<StoreCommand>();
        let (event_tx, event_rx) = channel::<StoreEvent>();
        let thread = thread::spawn(move || run(store, cmd_rx, event_tx));
        Self {
            cmd_tx,
            event_rx,
            _thread: thread,
        }
    }

    /// Queue a command. Sends to a dead worker are dropped.
    pub fn send(&self, command: StoreCommand) {
        let _ = self.cmd_tx.send(command);
    }

    /// Drain pending events without blocking.
    pub fn poll_events(&self) -> Vec<StoreEvent> {
        self.event_rx.try_iter().collect()
    }
}

impl Drop for StoreWorker {
    fn drop(&mut self) {
        let _ = self.cmd_tx.send(StoreCommand::Shutdown);
    }
}

fn run(store: Box<dyn FrameStore>, commands: Receiver<StoreCommand>, events: Sender<StoreEvent>) {
    log::info!("store worker started");
    let mut scope: Option<ProjectId> = None;
    loop {
        // Block for the next command, then drain whatever else queued up
        // while the last batch was in flight.
        let first = match commands.recv() {
            Ok(command) => command,
            Err(_) => break,
        };
        let mut batch = vec![first];
        loop {
            match commands.try_recv() {
                Ok(command) => batch.push(command),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        coalesce_updates(&mut batch);
        if process_batch(store.as_ref(), &mut scope, batch, &events) {
            break;
        }
    }
    log::info!("store worker exiting");
}

/// Keep only the last `UpdateComponent` per component id so a drag burst
/// collapses to the final position instead of a request storm.
fn coalesce_updates(batch: &mut Vec<StoreCommand>) {
    let mut seen: HashSet<ComponentId> = HashSet::new();
    for index in (0..batch.len()).rev() {
        if let StoreCommand::UpdateComponent { id, .. } = &batch[index] {
            if !seen.insert(*id) {
                batch.remove(index);
            }
        }
    }
}

/// Execute one batch of commands, then refresh whatever the batch touched.
/// Returns true on shutdown.
fn process_batch(
    store: &dyn FrameStore,
    scope: &mut Option<ProjectId>,
    batch: Vec<StoreCommand>,
    events: &Sender<StoreEvent>,
) -> bool {
    let mut touched_projects = false;
    let mut touched_frames = false;
    let mut shutdown = false;

    for command in batch {
        match command {
            StoreCommand::Shutdown => {
                shutdown = true;
                break;
            }
            StoreCommand::SetProjectScope(project) => {
                *scope = project;
                touched_frames = true;
            }
            StoreCommand::RefreshProjects => touched_projects = true,
            StoreCommand::RefreshFrames => touched_frames = true,
            StoreCommand::CreateProject { name } => {
                report(events, "create project", store.create_project(&name).map(drop));
                touched_projects = true;
            }
            StoreCommand::RenameProject { id, name } => {
                report(
                    events,
                    "rename project",
                    store.rename_project(id, &name).map(drop),
                );
                touched_projects = true;
            }
            StoreCommand::DeleteProject { id } => {
                report(events, "delete project", store.delete_project(id));
                touched_projects = true;
                touched_frames = true;
            }
            StoreCommand::CreateFrame { name, project } => {
                report(
                    events,
                    "create frame",
                    store.create_frame(&name, project).map(drop),
                );
                touched_frames = true;
            }
            StoreCommand::RenameFrame { id, name } => {
                report(events, "rename frame", store.rename_frame(id, &name).map(drop));
                touched_frames = true;
            }
            StoreCommand::DeleteFrame { id } => {
                report(events, "delete frame", store.delete_frame(id));
                touched_frames = true;
            }
            StoreCommand::CreateComponent(create) => {
                report(
                    events,
                    "create component",
                    store.create_component(&create).map(drop),
                );
                touched_frames = true;
            }
            StoreCommand::UpdateComponent { id, patch } => {
                report(
                    events,
                    "update component",
                    store.update_component(id, &patch).map(drop),
                );
                touched_frames = true;
            }
            StoreCommand::DeleteComponent { id } => {
                report(events, "delete component", store.delete_component(id));
                touched_frames = true;
            }
        }
    }

    if touched_projects {
        match store.list_projects() {
            Ok(projects) => {
                let _ = events.send(StoreEvent::Projects(projects));
            }
            Err(e) => report_failure(events, "refresh projects", &e),
        }
    }
    if touched_frames {
        // No scope means no project is selected and there is nothing to
        // fetch; the caller clears its frame list locally.
        if let Some(project) = *scope {
            match store.list_frames(Some(project)) {
                Ok(frames) => {
                    let _ = events.send(StoreEvent::Frames(frames));
                }
                Err(e) => report_failure(events, "refresh frames", &e),
            }
        }
    }
    shutdown
}

fn report(events: &Sender<StoreEvent>, action: &'static str, result: Result<(), StoreError>) {
    if let Err(e) = result {
        report_failure(events, action, &e);
    }
}

fn report_failure(events: &Sender<StoreEvent>, action: &'static str, error: &StoreError) {
    log::error!("{} failed: {}", action, error);
    let _ = events.send(StoreEvent::ActionFailed {
        action,
        message: error.to_string(),
    });
}
