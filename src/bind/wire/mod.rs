//! Wire representations of the BIND statistics channel
//!
//! Each submodule mirrors the field names and nesting of one dialect. The
//! types only exist to be decoded and handed to the normalizer.

use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::bind::errors::DecodeError;
use crate::bind::model::{Task, TaskManager, ThreadModel};

/// JSON statistics, `/json/v1/*`
pub mod json;
/// XML statistics version 2, a single document at `/`
pub mod xml_v2;
/// XML statistics version 3, `/xml/v3/*`
pub mod xml_v3;

pub fn decode_json<T: DeserializeOwned>(body: &[u8]) -> Result<T, DecodeError> {
    Ok(serde_json::from_slice(body)?)
}

pub fn decode_xml<T: DeserializeOwned>(body: &[u8]) -> Result<T, DecodeError> {
    Ok(quick_xml::de::from_reader(body)?)
}

/// `<taskmgr>`, identical in XML v2 and v3
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct TaskManagerSection {
    pub thread_model: ThreadModelSection,
    pub tasks: TasksSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ThreadModelSection {
    #[serde(rename = "type")]
    pub model_type: String,
    pub worker_threads: u64,
    pub default_quantum: u64,
    pub tasks_running: u64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct TasksSection {
    pub task: Vec<TaskSection>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct TaskSection {
    pub id: String,
    pub name: String,
    pub references: u64,
    pub state: String,
    pub quantum: u64,
    pub events: u64,
}

impl From<TaskManagerSection> for TaskManager {
    fn from(section: TaskManagerSection) -> Self {
        TaskManager {
            tasks: section.tasks.task.into_iter().map(Task::from).collect(),
            thread_model: ThreadModel {
                model_type: section.thread_model.model_type,
                worker_threads: section.thread_model.worker_threads,
                default_quantum: section.thread_model.default_quantum,
                tasks_running: section.thread_model.tasks_running,
            },
        }
    }
}

impl From<TaskSection> for Task {
    fn from(section: TaskSection) -> Self {
        Task {
            id: section.id,
            name: section.name,
            quantum: section.quantum,
            references: section.references,
            state: section.state,
            events: section.events,
        }
    }
}
