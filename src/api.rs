//! Remote sync adapter for the task-manager API.
//!
//! This is the only place that performs network I/O for tasks. Each operation
//! is one request/response cycle with no retries; it never touches the board's
//! state. Callers reload the task list after every successful write.

use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::Deserialize;
use serde_json::Value;

use crate::config::ApiConfig;
use crate::error::{Error, Result};
use crate::task::{Task, TaskId};

const TASKS_PATH: &str = "/tools/task-manager/tasks";

/// Task CRUD against the remote store.
///
/// Writes return the task the server echoed back, or `None` when the
/// response body was not a task. Any 2xx status counts as success.
pub trait TaskApi {
    fn fetch_tasks(&self) -> Result<Vec<Task>>;
    fn create_task(&self, task: &Task) -> Result<Option<Task>>;
    fn update_task(&self, task: &Task, id: &TaskId) -> Result<Option<Task>>;
    fn delete_task(&self, id: &TaskId) -> Result<()>;
}

/// Shapes the list endpoint has been seen to answer with. Elements are
/// decoded one by one afterwards so a bad record cannot sink the rest.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TaskList {
    Data { data: Vec<Value> },
    Tasks { tasks: Vec<Value> },
    Bare(Vec<Value>),
}

/// Decode the list endpoint's body.
///
/// An unknown shape yields no tasks; an element that is not a task record is
/// skipped with a warning.
fn parse_task_list(body: &str) -> Result<Vec<Task>> {
    let value: Value = serde_json::from_str(body)?;
    let items = match serde_json::from_value::<TaskList>(value) {
        Ok(TaskList::Data { data }) => data,
        Ok(TaskList::Tasks { tasks }) => tasks,
        Ok(TaskList::Bare(items)) => items,
        Err(e) => {
            tracing::warn!(error = %e, "unexpected task list format, treating as empty");
            return Ok(Vec::new());
        }
    };

    let mut tasks = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        match serde_json::from_value::<Task>(item) {
            Ok(task) => tasks.push(task),
            Err(e) => tracing::warn!(index, error = %e, "skipping task entry that could not be decoded"),
        }
    }
    Ok(tasks)
}

/// Read the task echoed by a write, bare or wrapped in `{ "data": ... }`.
///
/// Only a record carrying an id counts; anything else (`{"message": ...}`,
/// an empty body) yields `None`.
fn parse_single_task(body: &str) -> Option<Task> {
    let value: Value = serde_json::from_str(body).ok()?;
    let record = match value {
        Value::Object(mut map) if map.get("data").is_some_and(Value::is_object) => map.remove("data")?,
        other @ Value::Object(_) => other,
        _ => return None,
    };
    serde_json::from_value::<Task>(record)
        .ok()
        .filter(|task| task.id.is_some())
}

/// `TaskApi` over HTTP using a blocking reqwest client.
pub struct HttpTaskApi {
    client: Client,
    config: ApiConfig,
}

impl HttpTaskApi {
    pub fn new(config: ApiConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;
        if config.api_key.is_none() {
            tracing::warn!("no API key configured; requests are sent unauthenticated");
        }
        Ok(HttpTaskApi { client, config })
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    fn collection_url(&self) -> String {
        format!("{}{}", self.config.base_url, TASKS_PATH)
    }

    fn item_url(&self, id: &TaskId) -> String {
        format!("{}/{}", self.collection_url(), id)
    }

    fn authorised(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.config.api_key {
            Some(key) => request.header(self.config.api_key_header.as_str(), key),
            None => request,
        }
    }

    /// Send a request and return the body of a 2xx response.
    fn send(&self, request: RequestBuilder) -> Result<String> {
        let response: Response = self.authorised(request).send()?;
        let status = response.status();
        let body = response.text()?;
        if !status.is_success() {
            return Err(Error::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(body)
    }
}

impl TaskApi for HttpTaskApi {
    fn fetch_tasks(&self) -> Result<Vec<Task>> {
        let body = self.send(self.client.get(self.collection_url()))?;
        let tasks = parse_task_list(&body)?;
        tracing::debug!(count = tasks.len(), "fetched tasks");
        Ok(tasks)
    }

    fn create_task(&self, task: &Task) -> Result<Option<Task>> {
        let mut body = task.clone();
        body.id = None;
        let text = self.send(self.client.post(self.collection_url()).json(&body))?;
        let created = parse_single_task(&text);
        match &created {
            Some(created) => tracing::info!(task = %created.label(), "created task"),
            None => tracing::info!(title = %task.title, "created task; response carried no task record"),
        }
        Ok(created)
    }

    fn update_task(&self, task: &Task, id: &TaskId) -> Result<Option<Task>> {
        let text = self.send(self.client.put(self.item_url(id)).json(task))?;
        let updated = parse_single_task(&text);
        if updated.is_none() {
            tracing::debug!(%id, "update response carried no task record");
        }
        tracing::info!(%id, status = %task.status, "updated task");
        Ok(updated)
    }

    fn delete_task(&self, id: &TaskId) -> Result<()> {
        self.send(self.client.delete(self.item_url(id)))?;
        tracing::info!(%id, "deleted task");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::Status;
    use mockito::Matcher;
    use std::time::Duration;

    fn api(server: &mockito::Server, key: Option<&str>) -> HttpTaskApi {
        HttpTaskApi::new(ApiConfig {
            base_url: server.url(),
            api_key: key.map(str::to_string),
            api_key_header: "x-api-key".into(),
            timeout: Duration::from_secs(5),
        })
        .unwrap()
    }

    const ONE_TASK: &str = r#"{"_id":"1","title":"Write report","status":"To Do"}"#;

    #[test]
    fn list_shapes_are_all_understood() {
        let cases = [
            format!(r#"{{"data":[{ONE_TASK}]}}"#),
            format!(r#"{{"tasks":[{ONE_TASK}]}}"#),
            format!("[{ONE_TASK}]"),
        ];
        for body in cases {
            let tasks = parse_task_list(&body).unwrap();
            assert_eq!(tasks.len(), 1, "body: {body}");
            assert_eq!(tasks[0].title, "Write report");
        }
    }

    #[test]
    fn irregular_entries_do_not_hide_the_rest() {
        let irregular = [
            r#"{"_id":"2","title":"B","status":null}"#,
            r#"{"_id":"2","status":"Done"}"#,
            r#"{"_id":"2","id":"2","title":"B","status":"Done"}"#,
            r#"{"_id":"2","title":"B","status":"Done","selfEvaluation":"3"}"#,
        ];
        for entry in irregular {
            let body = format!(r#"{{"data":[{ONE_TASK},{entry}]}}"#);
            let tasks = parse_task_list(&body).unwrap();
            assert_eq!(tasks.len(), 2, "entry: {entry}");
            assert_eq!(tasks[0].title, "Write report");
            assert_eq!(tasks[1].id, Some(TaskId::new("2")));
        }
    }

    #[test]
    fn undecodable_entries_are_skipped() {
        let body = format!(r#"{{"tasks":[{ONE_TASK}, 42, "junk", null]}}"#);
        let tasks = parse_task_list(&body).unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].id, Some(TaskId::new("1")));
    }

    #[test]
    fn single_task_needs_an_id() {
        assert!(parse_single_task(ONE_TASK).is_some());
        assert!(parse_single_task(&format!(r#"{{"data":{ONE_TASK}}}"#)).is_some());
        assert!(parse_single_task(r#"{"message":"Task updated"}"#).is_none());
        assert!(parse_single_task(r#"{"data":"ok"}"#).is_none());
        assert!(parse_single_task("").is_none());
        assert!(parse_single_task("OK").is_none());
    }

    #[test]
    fn unknown_list_shape_is_empty() {
        assert!(parse_task_list(r#"{"items":[]}"#).unwrap().is_empty());
        assert!(parse_task_list(r#""nothing""#).unwrap().is_empty());
        assert!(parse_task_list("null").unwrap().is_empty());
    }

    #[test]
    fn non_json_list_body_is_a_decode_error() {
        assert!(matches!(parse_task_list("<html>"), Err(Error::Decode(_))));
    }

    #[test]
    fn fetch_sends_api_key() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/tools/task-manager/tasks")
            .match_header("x-api-key", "secret")
            .with_status(200)
            .with_body(format!(r#"{{"data":[{ONE_TASK}]}}"#))
            .create();

        let tasks = api(&server, Some("secret")).fetch_tasks().unwrap();
        mock.assert();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].column(), Some(Status::ToDo));
    }

    #[test]
    fn fetch_without_key_sends_no_header() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/tools/task-manager/tasks")
            .match_header("x-api-key", Matcher::Missing)
            .with_body("[]")
            .create();
        assert!(api(&server, None).fetch_tasks().unwrap().is_empty());
        mock.assert();
    }

    #[test]
    fn non_success_status_is_an_error() {
        let mut server = mockito::Server::new();
        server
            .mock("GET", "/tools/task-manager/tasks")
            .with_status(401)
            .with_body("unauthorised")
            .create();
        match api(&server, Some("bad")).fetch_tasks() {
            Err(Error::Status { status, body }) => {
                assert_eq!(status, 401);
                assert_eq!(body, "unauthorised");
            }
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[test]
    fn create_posts_task_without_id() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/tools/task-manager/tasks")
            .match_body(Matcher::AllOf(vec![
                Matcher::PartialJson(serde_json::json!({"title": "Write report", "status": "To Do"})),
                Matcher::Regex("^[^_]*$".into()),
            ]))
            .with_status(201)
            .with_body(format!(r#"{{"data":{ONE_TASK}}}"#))
            .create();

        let mut draft = Task::draft(chrono::NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());
        draft.title = "Write report".into();
        draft.id = Some(TaskId::new("should-not-be-sent"));
        let created = api(&server, None).create_task(&draft).unwrap().unwrap();
        mock.assert();
        assert_eq!(created.id, Some(TaskId::new("1")));
    }

    #[test]
    fn update_puts_full_task_to_item_url() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("PUT", "/tools/task-manager/tasks/1")
            .match_body(Matcher::PartialJson(serde_json::json!({"_id": "1", "status": "Done"})))
            .with_body(r#"{"_id":"1","title":"Write report","status":"Done"}"#)
            .create();

        let task: Task = serde_json::from_str(ONE_TASK).unwrap();
        let moved = task.with_status(Status::Done);
        let updated = api(&server, None).update_task(&moved, &TaskId::new("1")).unwrap().unwrap();
        mock.assert();
        assert_eq!(updated.column(), Some(Status::Done));
    }

    #[test]
    fn board_keeps_good_tasks_from_a_ragged_list() {
        let mut server = mockito::Server::new();
        server
            .mock("GET", "/tools/task-manager/tasks")
            .with_body(format!(
                r#"{{"data":[{ONE_TASK},{{"_id":"2","title":"B","status":null}},{{"_id":"3","status":"Done","selfEvaluation":"4"}},42]}}"#
            ))
            .create();

        let mut board = crate::board::Board::new(api(&server, None));
        board.reload().unwrap();
        assert_eq!(board.tasks().len(), 3);
        let columns = board.columns();
        assert_eq!(columns.len(Status::ToDo), 2);
        assert_eq!(columns.len(Status::Done), 1);
        assert_eq!(columns.get(Status::Done, 0).unwrap().self_evaluation, 4);
    }

    #[test]
    fn write_with_message_body_still_succeeds() {
        let mut server = mockito::Server::new();
        let post = server
            .mock("POST", "/tools/task-manager/tasks")
            .with_status(201)
            .with_body(r#"{"message":"Task created"}"#)
            .create();
        let put = server
            .mock("PUT", "/tools/task-manager/tasks/1")
            .with_body(r#"{"message":"Task updated"}"#)
            .create();

        let api = api(&server, None);
        let mut draft = Task::draft(chrono::NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());
        draft.title = "Write report".into();
        assert_eq!(api.create_task(&draft).unwrap(), None);

        let task: Task = serde_json::from_str(ONE_TASK).unwrap();
        assert_eq!(api.update_task(&task, &TaskId::new("1")).unwrap(), None);
        post.assert();
        put.assert();
    }

    #[test]
    fn board_refreshes_after_write_with_message_body() {
        let mut server = mockito::Server::new();
        let put = server
            .mock("PUT", "/tools/task-manager/tasks/1")
            .with_body(r#"{"message":"Task updated"}"#)
            .create();
        // Before the write the list holds the task in To Do; afterwards in Done.
        let before = server
            .mock("GET", "/tools/task-manager/tasks")
            .with_body(format!("[{ONE_TASK}]"))
            .expect(1)
            .create();
        let mut board = crate::board::Board::new(api(&server, None));
        board.reload().unwrap();
        before.assert();
        before.remove();
        let after = server
            .mock("GET", "/tools/task-manager/tasks")
            .with_body(r#"{"data":[{"_id":"1","title":"Write report","status":"Done"}]}"#)
            .create();

        let task: Task = serde_json::from_str(ONE_TASK).unwrap();
        let updated = board.update(&task.with_status(Status::Done)).unwrap();
        put.assert();
        after.assert();
        assert_eq!(updated.column(), Some(Status::Done));
        assert_eq!(board.task(&TaskId::new("1")).unwrap().column(), Some(Status::Done));
    }

    #[test]
    fn delete_hits_item_url() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("DELETE", "/tools/task-manager/tasks/1")
            .with_body(r#"{"message":"deleted"}"#)
            .create();
        api(&server, None).delete_task(&TaskId::new("1")).unwrap();
        mock.assert();
    }

    #[test]
    fn delete_of_missing_task_surfaces_404() {
        let mut server = mockito::Server::new();
        server
            .mock("DELETE", "/tools/task-manager/tasks/9")
            .with_status(404)
            .create();
        let err = api(&server, None).delete_task(&TaskId::new("9")).unwrap_err();
        assert!(matches!(err, Error::Status { status: 404, .. }));
    }
}
