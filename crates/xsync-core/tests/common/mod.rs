//! Shared test support: an in-memory RemoteApi fake and project fixtures.
#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;

use xsync_core::ProjectContext;
use xsync_fs::io;
use xsync_remote::{
    CreatedObject, Error as RemoteError, ObjectType, RawObject, RemoteApi, RequestOptions,
    Result as RemoteResult,
};

/// One object held by the fake remote.
#[derive(Debug, Clone)]
pub struct RemoteRecord {
    pub id: u64,
    pub object_type: ObjectType,
    pub name: String,
    pub content: String,
    pub verb: Option<String>,
    pub path_shape: Option<String>,
    pub group_id: Option<u64>,
    pub canonical: Option<String>,
}

#[derive(Debug, Default)]
struct RemoteState {
    objects: Vec<RemoteRecord>,
    next_id: u64,
    conflicts: HashSet<(ObjectType, u64)>,
    fail_create: Option<String>,
    calls: Vec<String>,
}

/// In-memory RemoteApi with scriptable failures and a call log.
#[derive(Debug, Default)]
pub struct FakeRemoteApi {
    state: Mutex<RemoteState>,
}

impl FakeRemoteApi {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(RemoteState {
                next_id: 100,
                ..RemoteState::default()
            }),
        }
    }

    pub fn seed(&self, record: RemoteRecord) {
        self.state.lock().unwrap().objects.push(record);
    }

    pub fn seed_function(&self, id: u64, name: &str, content: &str) {
        self.seed(RemoteRecord {
            id,
            object_type: ObjectType::Function,
            name: name.to_string(),
            content: content.to_string(),
            verb: None,
            path_shape: None,
            group_id: None,
            canonical: None,
        });
    }

    pub fn seed_group(&self, id: u64, name: &str, content: &str) {
        self.seed(RemoteRecord {
            id,
            object_type: ObjectType::ApiGroup,
            name: name.to_string(),
            content: content.to_string(),
            verb: None,
            path_shape: None,
            group_id: None,
            canonical: Some(format!("grp_{id}")),
        });
    }

    pub fn seed_endpoint(&self, id: u64, verb: &str, path_shape: &str, group_id: u64, content: &str) {
        self.seed(RemoteRecord {
            id,
            object_type: ObjectType::ApiEndpoint,
            name: format!("{verb} {path_shape}"),
            content: content.to_string(),
            verb: Some(verb.to_string()),
            path_shape: Some(path_shape.to_string()),
            group_id: Some(group_id),
            canonical: Some(format!("ep_{id}")),
        });
    }

    /// Make updates of `(object_type, id)` fail with a uniqueness conflict.
    pub fn conflict_on_update(&self, object_type: ObjectType, id: u64) {
        self.state.lock().unwrap().conflicts.insert((object_type, id));
    }

    /// Make every create fail with the given remote message.
    pub fn fail_creates(&self, message: &str) {
        self.state.lock().unwrap().fail_create = Some(message.to_string());
    }

    pub fn remove(&self, object_type: ObjectType, id: u64) {
        self.state
            .lock()
            .unwrap()
            .objects
            .retain(|o| !(o.object_type == object_type && o.id == id));
    }

    pub fn content_of(&self, object_type: ObjectType, id: u64) -> Option<String> {
        self.state
            .lock()
            .unwrap()
            .objects
            .iter()
            .find(|o| o.object_type == object_type && o.id == id)
            .map(|o| o.content.clone())
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    fn log(&self, call: String) {
        self.state.lock().unwrap().calls.push(call);
    }
}

fn to_raw(record: &RemoteRecord) -> RawObject {
    // an empty content stands in for a payload with no extractable source
    let xanoscript = if record.content.is_empty() {
        None
    } else {
        Some(serde_json::Value::String(record.content.clone()))
    };
    RawObject {
        id: record.id,
        name: record.name.clone(),
        xanoscript,
        verb: record.verb.clone(),
        path: record.path_shape.clone(),
        apigroup_id: record.group_id,
        canonical: record.canonical.clone(),
    }
}

#[async_trait]
impl RemoteApi for FakeRemoteApi {
    async fn list_objects(
        &self,
        object_type: ObjectType,
        page: u32,
        per_page: u32,
    ) -> RemoteResult<Vec<RawObject>> {
        self.log(format!("list {object_type} p{page}"));
        let state = self.state.lock().unwrap();
        let of_type: Vec<&RemoteRecord> = state
            .objects
            .iter()
            .filter(|o| o.object_type == object_type)
            .collect();
        let start = ((page.max(1) - 1) * per_page) as usize;
        Ok(of_type
            .into_iter()
            .skip(start)
            .take(per_page as usize)
            .map(|r| to_raw(r))
            .collect())
    }

    async fn create_object(
        &self,
        object_type: ObjectType,
        content: &str,
        options: RequestOptions,
    ) -> RemoteResult<CreatedObject> {
        self.log(format!("create {object_type}"));
        let mut state = self.state.lock().unwrap();
        if let Some(message) = state.fail_create.clone() {
            return Err(RemoteError::Api {
                status: 422,
                message,
            });
        }
        state.next_id += 1;
        let id = state.next_id;
        // derive the object name the way the remote would: from the
        // declaration line of the submitted source
        let name = content
            .lines()
            .find(|l| !l.trim().is_empty())
            .and_then(|l| l.split_whitespace().nth(1))
            .map(|n| n.trim_matches('{').to_string())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| format!("object_{id}"));
        state.objects.push(RemoteRecord {
            id,
            object_type,
            name,
            content: content.to_string(),
            verb: None,
            path_shape: None,
            group_id: options.group_id,
            canonical: None,
        });
        Ok(CreatedObject { id })
    }

    async fn update_object(
        &self,
        object_type: ObjectType,
        id: u64,
        content: &str,
        _options: RequestOptions,
    ) -> RemoteResult<()> {
        self.log(format!("update {object_type} {id}"));
        let mut state = self.state.lock().unwrap();
        if state.conflicts.contains(&(object_type, id)) {
            return Err(RemoteError::UniquenessConflict {
                message: "name must be unique".to_string(),
            });
        }
        let record = state
            .objects
            .iter_mut()
            .find(|o| o.object_type == object_type && o.id == id)
            .ok_or(RemoteError::Api {
                status: 404,
                message: "not found".to_string(),
            })?;
        record.content = content.to_string();
        Ok(())
    }

    async fn delete_object(&self, object_type: ObjectType, id: u64) -> RemoteResult<()> {
        self.log(format!("delete {object_type} {id}"));
        let mut state = self.state.lock().unwrap();
        let before = state.objects.len();
        state
            .objects
            .retain(|o| !(o.object_type == object_type && o.id == id));
        if state.objects.len() == before {
            return Err(RemoteError::Api {
                status: 404,
                message: "not found".to_string(),
            });
        }
        Ok(())
    }

    async fn get_object(&self, object_type: ObjectType, id: u64) -> RemoteResult<RawObject> {
        self.log(format!("get {object_type} {id}"));
        let state = self.state.lock().unwrap();
        state
            .objects
            .iter()
            .find(|o| o.object_type == object_type && o.id == id)
            .map(to_raw)
            .ok_or(RemoteError::Api {
                status: 404,
                message: "not found".to_string(),
            })
    }
}

/// A fresh initialized project in a temp directory.
pub fn project() -> (tempfile::TempDir, ProjectContext) {
    let dir = tempfile::tempdir().unwrap();
    let ctx = ProjectContext::init(dir.path(), "https://x.example/api:meta").unwrap();
    (dir, ctx)
}

/// Write a project-relative source file.
pub fn write_file(ctx: &ProjectContext, rel: &str, content: &str) {
    io::write_text(&ctx.absolute(rel), content).unwrap();
}

/// Read a project-relative source file.
pub fn read_file(ctx: &ProjectContext, rel: &str) -> String {
    io::read_text(&ctx.absolute(rel)).unwrap()
}
