//! In-memory backend that records every call, for workflow tests.

use crate::backend::{Backend, BackendError};
use crate::types::{NewRecord, Task};
use async_trait::async_trait;
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Record(NewRecord),
    Notification(String),
    Tasks(Vec<String>),
}

#[derive(Default)]
pub struct FakeBackend {
    calls: Mutex<Vec<Call>>,
    tasks: Vec<Task>,
    fail_records: bool,
    fail_notifications: bool,
    fail_tasks: bool,
}

impl FakeBackend {
    pub fn with_tasks(mut self, tasks: Vec<Task>) -> Self {
        self.tasks = tasks;
        self
    }

    pub fn failing_records(mut self) -> Self {
        self.fail_records = true;
        self
    }

    pub fn failing_notifications(mut self) -> Self {
        self.fail_notifications = true;
        self
    }

    pub fn failing_tasks(mut self) -> Self {
        self.fail_tasks = true;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn push(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

fn server_error() -> BackendError {
    BackendError::Http {
        status: 500,
        body: "internal error".into(),
    }
}

#[async_trait]
impl Backend for FakeBackend {
    async fn create_record(&self, record: &NewRecord) -> Result<bool, BackendError> {
        self.push(Call::Record(record.clone()));
        if self.fail_records {
            return Err(server_error());
        }
        Ok(true)
    }

    async fn create_notification(&self, message: &str) -> Result<bool, BackendError> {
        self.push(Call::Notification(message.to_string()));
        if self.fail_notifications {
            return Err(BackendError::Network("connection refused".into()));
        }
        Ok(true)
    }

    async fn tasks_for_customers(&self, names: &[String]) -> Result<Vec<Task>, BackendError> {
        self.push(Call::Tasks(names.to_vec()));
        if self.fail_tasks {
            return Err(server_error());
        }
        Ok(self.tasks.clone())
    }
}
