//! REST implementation of the store.

use super::{FrameStore, StoreError, StoreResult};
use crate::config::ClientConfig;
use frameboard_core::model::{
    Component, ComponentCreate, ComponentId, ComponentPatch, Frame, FrameId, Project, ProjectId,
};
use reqwest::StatusCode;
use reqwest::blocking::{Client, Response};
use serde::Serialize;
use url::Url;

/// Store backed by the Frameboard REST API.
///
/// All calls block until the server responds; drive the store through a
/// [`StoreWorker`](crate::worker::StoreWorker) to keep a UI thread free.
pub struct HttpStore {
    client: Client,
    base: Url,
}

#[derive(Serialize)]
struct NameBody<'a> {
    name: &'a str,
}

#[derive(Serialize)]
struct FrameCreateBody<'a> {
    name: &'a str,
    project_id: ProjectId,
}

impl HttpStore {
    /// Create a store talking to the configured base URL.
    pub fn new(config: &ClientConfig) -> StoreResult<Self> {
        // Url::join drops the last path segment unless the base ends with
        // a slash, so normalize before endpoint paths are joined on.
        let mut base = config.base_url.trim_end_matches('/').to_string();
        base.push('/');
        let base = Url::parse(&base)?;
        let client = Client::builder().build()?;
        Ok(Self { client, base })
    }

    /// Create a store for the environment-configured backend.
    pub fn from_env() -> StoreResult<Self> {
        Self::new(&ClientConfig::from_env())
    }

    /// The normalized base URL requests are issued against.
    pub fn base_url(&self) -> &str {
        self.base.as_str()
    }

    fn endpoint(&self, path: &str) -> StoreResult<Url> {
        Ok(self.base.join(path)?)
    }

    fn frames_endpoint(&self, project: Option<ProjectId>) -> StoreResult<Url> {
        let mut url = self.endpoint("frames")?;
        if let Some(id) = project {
            url.query_pairs_mut()
                .append_pair("project_id", &id.to_string());
        }
        Ok(url)
    }
}

fn checked(response: Response) -> StoreResult<Response> {
    let status = response.status();
    if status == StatusCode::NOT_FOUND {
        return Err(StoreError::NotFound(response.url().path().to_string()));
    }
    if !status.is_success() {
        log::warn!("backend returned {} for {}", status, response.url());
        return Err(StoreError::Http {
            status: status.as_u16(),
        });
    }
    Ok(response)
}

impl FrameStore for HttpStore {
    fn health(&self) -> StoreResult<()> {
        let response = self.client.get(self.endpoint("health")?).send()?;
        checked(response)?;
        Ok(())
    }

    fn list_projects(&self) -> StoreResult<Vec<Project>> {
        let response = self.client.get(self.endpoint("projects")?).send()?;
        Ok(checked(response)?.json()?)
    }

    fn get_project(&self, id: ProjectId) -> StoreResult<Project> {
        let url = self.endpoint(&format!("projects/{}", id))?;
        let response = self.client.get(url).send()?;
        Ok(checked(response)?.json()?)
    }

    fn create_project(&self, name: &str) -> StoreResult<Project> {
        let response = self
            .client
            .post(self.endpoint("projects")?)
            .json(&NameBody { name })
            .send()?;
        Ok(checked(response)?.json()?)
    }

    fn rename_project(&self, id: ProjectId, name: &str) -> StoreResult<Project> {
        let url = self.endpoint(&format!("projects/{}", id))?;
        let response = self.client.put(url).json(&NameBody { name }).send()?;
        Ok(checked(response)?.json()?)
    }

    fn delete_project(&self, id: ProjectId) -> StoreResult<()> {
        let url = self.endpoint(&format!("projects/{}", id))?;
        let response = self.client.delete(url).send()?;
        checked(response)?;
        Ok(())
    }

    fn list_frames(&self, project: Option<ProjectId>) -> StoreResult<Vec<Frame>> {
        let response = self.client.get(self.frames_endpoint(project)?).send()?;
        Ok(checked(response)?.json()?)
    }

    fn create_frame(&self, name: &str, project: ProjectId) -> StoreResult<Frame> {
        let response = self
            .client
            .post(self.endpoint("frames")?)
            .json(&FrameCreateBody {
                name,
                project_id: project,
            })
            .send()?;
        Ok(checked(response)?.json()?)
    }

    fn rename_frame(&self, id: FrameId, name: &str) -> StoreResult<Frame> {
        let url = self.endpoint(&format!("frames/{}", id))?;
        let response = self.client.put(url).json(&NameBody { name }).send()?;
        Ok(checked(response)?.json()?)
    }

    fn delete_frame(&self, id: FrameId) -> StoreResult<()> {
        let url = self.endpoint(&format!("frames/{}", id))?;
        let response = self.client.delete(url).send()?;
        checked(response)?;
        Ok(())
    }

    fn create_component(&self, create: &ComponentCreate) -> StoreResult<Component> {
        let response = self
            .client
            .post(self.endpoint("components")?)
            .json(create)
            .send()?;
        Ok(checked(response)?.json()?)
    }

    fn update_component(&self, id: ComponentId, patch: &ComponentPatch) -> StoreResult<Component> {
        let url = self.endpoint(&format!("components/{}", id))?;
        let response = self.client.put(url).json(patch).send()?;
        Ok(checked(response)?.json()?)
    }

    fn delete_component(&self, id: ComponentId) -> StoreResult<()> {
        let url = self.endpoint(&format!("components/{}", id))?;
        let response = self.client.delete(url).send()?;
        checked(response)?;
        Ok(())
    }
}
