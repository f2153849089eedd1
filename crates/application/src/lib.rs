//! Application services and ports.

#![forbid(unsafe_code)]

mod backend_ports;
mod collection_service;
mod dialog_ports;
mod import_service;
mod in_flight;
mod permission_service;
mod record_editor;
mod search_select;
mod session_ports;
mod setup_page;
mod table_view;

#[cfg(test)]
mod test_support;

pub use backend_ports::{ImportGateway, ReferenceGateway, SetupGateway, SpreadsheetInspector};
pub use collection_service::{CollectionLoader, CollectionState, LOAD_FAILURE_MESSAGE};
pub use dialog_ports::{AlertSeverity, DialogPort, TOAST_DURATION};
pub use import_service::{ImportState, ImportWorkflow, StageSummary};
pub use permission_service::PermissionResolver;
pub use record_editor::{DeleteOutcome, EditorMode, RecordEditor, SaveOutcome};
pub use search_select::{ReferenceErrorPolicy, SearchSelect, Selection};
pub use session_ports::{SecretDecryptor, SessionStore};
pub use setup_page::{PageContext, SetupPage};
pub use table_view::{SearchMatcher, TableView};
