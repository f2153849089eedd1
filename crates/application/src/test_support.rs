//! Fakes shared by the application service tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chronopay_core::{AppError, AppResult};
use chronopay_domain::{ImportFile, ImportKind, ImportParameters, ReferenceKind};
use serde_json::Value;
use tokio::sync::Mutex;

use crate::{
    AlertSeverity, DialogPort, ImportGateway, ReferenceGateway, SetupGateway, SpreadsheetInspector,
};

/// One request observed by a fake gateway.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    List(String),
    Create(String, Value),
    Update(String, String, Value),
    Delete(String, String),
    Reference(ReferenceKind),
    Stage(ImportKind, String, ImportParameters),
    Commit(ImportKind, Value),
    Template(String),
}

/// Gateway that records calls and replays queued results.
#[derive(Default)]
pub struct FakeBackend {
    pub calls: Mutex<Vec<Call>>,
    pub lists: Mutex<VecDeque<AppResult<Vec<Value>>>>,
    pub writes: Mutex<VecDeque<AppResult<()>>>,
    pub responses: Mutex<VecDeque<AppResult<Value>>>,
    stall_next: AtomicBool,
}

impl FakeBackend {
    pub async fn push_list(&self, result: AppResult<Vec<Value>>) {
        self.lists.lock().await.push_back(result);
    }

    pub async fn push_write(&self, result: AppResult<()>) {
        self.writes.lock().await.push_back(result);
    }

    pub async fn push_response(&self, result: AppResult<Value>) {
        self.responses.lock().await.push_back(result);
    }

    /// Makes the next write or response never complete.
    pub fn stall_next_request(&self) {
        self.stall_next.store(true, Ordering::SeqCst);
    }

    pub async fn calls(&self) -> Vec<Call> {
        self.calls.lock().await.clone()
    }

    async fn record(&self, call: Call) {
        self.calls.lock().await.push(call);
    }

    async fn next_list(&self) -> AppResult<Vec<Value>> {
        self.lists
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn stall_if_requested(&self) {
        if self.stall_next.swap(false, Ordering::SeqCst) {
            std::future::pending::<()>().await;
        }
    }

    async fn next_write(&self) -> AppResult<()> {
        self.stall_if_requested().await;
        self.writes.lock().await.pop_front().unwrap_or(Ok(()))
    }

    async fn next_response(&self) -> AppResult<Value> {
        self.stall_if_requested().await;
        self.responses
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| Ok(Value::Array(Vec::new())))
    }
}

#[async_trait]
impl SetupGateway for FakeBackend {
    async fn list(&self, resource_path: &str) -> AppResult<Vec<Value>> {
        self.record(Call::List(resource_path.to_owned())).await;
        self.next_list().await
    }

    async fn create(&self, resource_path: &str, payload: Value) -> AppResult<()> {
        self.record(Call::Create(resource_path.to_owned(), payload))
            .await;
        self.next_write().await
    }

    async fn update(&self, resource_path: &str, record_key: &str, payload: Value) -> AppResult<()> {
        self.record(Call::Update(
            resource_path.to_owned(),
            record_key.to_owned(),
            payload,
        ))
        .await;
        self.next_write().await
    }

    async fn delete(&self, resource_path: &str, record_key: &str) -> AppResult<()> {
        self.record(Call::Delete(resource_path.to_owned(), record_key.to_owned()))
            .await;
        self.next_write().await
    }
}

#[async_trait]
impl ReferenceGateway for FakeBackend {
    async fn list_reference(&self, kind: ReferenceKind) -> AppResult<Vec<Value>> {
        self.record(Call::Reference(kind)).await;
        self.next_list().await
    }
}

#[async_trait]
impl ImportGateway for FakeBackend {
    async fn stage(
        &self,
        kind: ImportKind,
        file: &ImportFile,
        parameters: &ImportParameters,
    ) -> AppResult<Value> {
        self.record(Call::Stage(kind, file.file_name.clone(), parameters.clone()))
            .await;
        self.next_response().await
    }

    async fn commit(&self, kind: ImportKind, body: Value) -> AppResult<Value> {
        self.record(Call::Commit(kind, body)).await;
        self.next_response().await
    }

    async fn download_template(&self, file_name: &str) -> AppResult<Vec<u8>> {
        self.record(Call::Template(file_name.to_owned())).await;
        Ok(b"PK".to_vec())
    }
}

/// Dialog surface answering confirmations from a fixed reply.
pub struct FakeDialogs {
    pub confirm_reply: bool,
    pub alerts: Mutex<Vec<(AlertSeverity, String)>>,
    pub confirms: Mutex<Vec<String>>,
    pub toasts: Mutex<Vec<String>>,
}

impl FakeDialogs {
    pub fn answering(confirm_reply: bool) -> Self {
        Self {
            confirm_reply,
            alerts: Mutex::new(Vec::new()),
            confirms: Mutex::new(Vec::new()),
            toasts: Mutex::new(Vec::new()),
        }
    }

    pub async fn alerts(&self) -> Vec<(AlertSeverity, String)> {
        self.alerts.lock().await.clone()
    }

    pub async fn toasts(&self) -> Vec<String> {
        self.toasts.lock().await.clone()
    }
}

#[async_trait]
impl DialogPort for FakeDialogs {
    async fn alert(&self, severity: AlertSeverity, _title: &str, message: &str) {
        self.alerts.lock().await.push((severity, message.to_owned()));
    }

    async fn confirm(&self, _title: &str, message: &str) -> bool {
        self.confirms.lock().await.push(message.to_owned());
        self.confirm_reply
    }

    async fn toast(&self, message: &str, _duration: Duration) {
        self.toasts.lock().await.push(message.to_owned());
    }
}

/// Inspector returning fixed sheet names, or failing when empty.
pub struct FakeInspector(pub Vec<String>);

impl SpreadsheetInspector for FakeInspector {
    fn sheet_names(&self, file: &ImportFile) -> AppResult<Vec<String>> {
        if self.0.is_empty() {
            return Err(AppError::Validation(format!(
                "'{}' could not be read",
                file.file_name
            )));
        }
        Ok(self.0.clone())
    }
}
