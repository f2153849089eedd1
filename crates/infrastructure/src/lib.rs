//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod aes_permission_decryptor;
mod calamine_spreadsheet_inspector;
mod client_config;
mod console_dialog_port;
mod file_session_store;
mod http_backend_client;
mod template_file;

pub use aes_permission_decryptor::AesPermissionDecryptor;
pub use calamine_spreadsheet_inspector::CalamineSpreadsheetInspector;
pub use client_config::{ClientConfig, init_tracing};
pub use console_dialog_port::ConsoleDialogPort;
pub use file_session_store::{FileSessionStore, InMemorySessionStore};
pub use http_backend_client::HttpBackendClient;
pub use template_file::save_template;
