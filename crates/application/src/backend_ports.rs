use async_trait::async_trait;
use chronopay_core::AppResult;
use chronopay_domain::{ImportFile, ImportKind, ImportParameters, ReferenceKind};
use serde_json::Value;

/// Backend port for setup list resources.
#[async_trait]
pub trait SetupGateway: Send + Sync {
    /// Lists every row of a resource.
    async fn list(&self, resource_path: &str) -> AppResult<Vec<Value>>;

    /// Creates one record.
    async fn create(&self, resource_path: &str, payload: Value) -> AppResult<()>;

    /// Updates the record identified by `record_key`.
    async fn update(&self, resource_path: &str, record_key: &str, payload: Value)
    -> AppResult<()>;

    /// Deletes the record identified by `record_key`.
    async fn delete(&self, resource_path: &str, record_key: &str) -> AppResult<()>;
}

/// Backend port for read-only reference lists.
#[async_trait]
pub trait ReferenceGateway: Send + Sync {
    /// Lists every entry of a reference list.
    async fn list_reference(&self, kind: ReferenceKind) -> AppResult<Vec<Value>>;
}

/// Backend port for the two-phase spreadsheet importers.
#[async_trait]
pub trait ImportGateway: Send + Sync {
    /// Uploads a spreadsheet and returns the server's row preview.
    async fn stage(
        &self,
        kind: ImportKind,
        file: &ImportFile,
        parameters: &ImportParameters,
    ) -> AppResult<Value>;

    /// Commits the given JSON body and returns the server response.
    async fn commit(&self, kind: ImportKind, body: Value) -> AppResult<Value>;

    /// Downloads a template file.
    async fn download_template(&self, file_name: &str) -> AppResult<Vec<u8>>;
}

/// Port for client-side spreadsheet inspection.
pub trait SpreadsheetInspector: Send + Sync {
    /// Returns worksheet names in workbook order.
    fn sheet_names(&self, file: &ImportFile) -> AppResult<Vec<String>>;
}
