use std::marker::PhantomData;
use std::sync::Arc;

use chronopay_core::AppResult;
use chronopay_domain::{FieldValues, SetupRecord};
use serde_json::Value;
use tracing::{info, warn};

use crate::SetupGateway;

/// Message shown when a list fails to load and nothing better is known.
pub const LOAD_FAILURE_MESSAGE: &str = "Failed to load data.";

/// Observable state of a remote list.
#[derive(Debug, Clone)]
pub struct CollectionState<R> {
    /// Rows from the last successful fetch.
    pub items: Vec<R>,
    /// True only while a fetch is outstanding.
    pub is_loading: bool,
    /// User-facing message from the last failed fetch.
    pub error_message: Option<String>,
}

impl<R> Default for CollectionState<R> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            is_loading: false,
            error_message: None,
        }
    }
}

/// Loads a setup list and maps each row through the record schema.
pub struct CollectionLoader<R> {
    gateway: Arc<dyn SetupGateway>,
    state: CollectionState<R>,
    _record: PhantomData<fn() -> R>,
}

impl<R: SetupRecord> CollectionLoader<R> {
    /// Creates a loader with no rows.
    #[must_use]
    pub fn new(gateway: Arc<dyn SetupGateway>) -> Self {
        Self {
            gateway,
            state: CollectionState::default(),
            _record: PhantomData,
        }
    }

    /// Returns the current state.
    #[must_use]
    pub fn state(&self) -> &CollectionState<R> {
        &self.state
    }

    /// Returns the rows from the last successful fetch.
    #[must_use]
    pub fn items(&self) -> &[R] {
        self.state.items.as_slice()
    }

    /// Fetches the list.
    ///
    /// On failure the previous rows are kept and `error_message` is set.
    pub async fn fetch(&mut self) -> &CollectionState<R> {
        let resource_path = R::KIND.resource_path();
        self.state.is_loading = true;

        match self.gateway.list(resource_path).await {
            Ok(rows) => {
                self.state.items = map_rows::<R>(rows);
                self.state.error_message = None;
                info!(
                    resource_path,
                    count = self.state.items.len(),
                    "loaded setup list"
                );
            }
            Err(error) => {
                warn!(resource_path, error = ?error, "failed to load setup list");
                self.state.error_message = Some(error.user_message_or(LOAD_FAILURE_MESSAGE));
            }
        }

        self.state.is_loading = false;
        &self.state
    }
}

fn map_rows<R: SetupRecord>(rows: Vec<Value>) -> Vec<R> {
    rows.into_iter()
        .filter_map(|row| match map_row::<R>(row) {
            Ok(record) => Some(record),
            Err(error) => {
                warn!(
                    resource_path = R::KIND.resource_path(),
                    error = %error,
                    "skipping row that does not match the record schema"
                );
                None
            }
        })
        .collect()
}

fn map_row<R: SetupRecord>(row: Value) -> AppResult<R> {
    let Value::Object(object) = row else {
        return Err(chronopay_core::AppError::Validation(format!(
            "expected an object row, got {row}"
        )));
    };

    R::from_fields(&FieldValues::from_wire(R::KIND.fields(), &object))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use chronopay_core::{AppError, AppResult};
    use chronopay_domain::Department;
    use serde_json::{Value, json};
    use tokio::sync::Mutex;

    use crate::SetupGateway;

    use super::{CollectionLoader, LOAD_FAILURE_MESSAGE};

    struct ScriptedGateway {
        responses: Mutex<Vec<AppResult<Vec<Value>>>>,
    }

    #[async_trait]
    impl SetupGateway for ScriptedGateway {
        async fn list(&self, _resource_path: &str) -> AppResult<Vec<Value>> {
            self.responses
                .lock()
                .await
                .pop()
                .unwrap_or_else(|| Ok(Vec::new()))
        }

        async fn create(&self, _resource_path: &str, _payload: Value) -> AppResult<()> {
            Ok(())
        }

        async fn update(&self, _resource_path: &str, _key: &str, _payload: Value) -> AppResult<()> {
            Ok(())
        }

        async fn delete(&self, _resource_path: &str, _key: &str) -> AppResult<()> {
            Ok(())
        }
    }

    fn loader(responses: Vec<AppResult<Vec<Value>>>) -> CollectionLoader<Department> {
        CollectionLoader::new(Arc::new(ScriptedGateway {
            responses: Mutex::new(responses),
        }))
    }

    #[tokio::test]
    async fn normalizes_heterogeneous_rows() {
        let mut loader = loader(vec![Ok(vec![
            json!({"DeptCode": "HR", "DeptDesc": "Human Resources"}),
            json!({"code": "IT", "description": "Information Technology", "divCode": "OPS"}),
            json!("not a row"),
        ])]);

        let state = loader.fetch().await;
        assert!(!state.is_loading);
        assert_eq!(state.items.len(), 2);
        assert_eq!(state.items[0].description, "Human Resources");
        assert_eq!(state.items[1].division_code, "OPS");
        assert_eq!(state.items[1].email, "");
    }

    #[tokio::test]
    async fn prefers_server_message_on_failure() {
        let mut loader = loader(vec![Err(AppError::Server {
            status: 500,
            message: Some("Database offline".to_owned()),
        })]);

        let state = loader.fetch().await;
        assert_eq!(state.error_message.as_deref(), Some("Database offline"));
    }

    #[tokio::test]
    async fn falls_back_to_static_message() {
        let mut loader = loader(vec![Err(AppError::Server {
            status: 502,
            message: None,
        })]);

        let state = loader.fetch().await;
        assert_eq!(state.error_message.as_deref(), Some(LOAD_FAILURE_MESSAGE));
    }

    #[tokio::test]
    async fn failed_refresh_keeps_previous_rows() {
        let mut loader = loader(vec![
            Err(AppError::Transport("timed out".to_owned())),
            Ok(vec![json!({"code": "HR", "description": "Human Resources"})]),
        ]);

        assert_eq!(loader.fetch().await.items.len(), 1);
        let state = loader.fetch().await;
        assert_eq!(state.items.len(), 1);
        assert_eq!(state.error_message.as_deref(), Some("timed out"));
    }
}
