use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use chronopay_core::{AppError, AppResult};
use chronopay_domain::{ImportFile, ImportKind};
use serde_json::json;

use crate::test_support::{Call, FakeBackend, FakeDialogs, FakeInspector};

use super::{ImportState, ImportWorkflow};

fn workflow(
    kind: ImportKind,
    backend: &Arc<FakeBackend>,
    dialogs: &Arc<FakeDialogs>,
) -> ImportWorkflow {
    ImportWorkflow::new(
        kind,
        backend.clone(),
        Arc::new(FakeInspector(vec!["Logs".to_owned(), "Summary".to_owned()])),
        dialogs.clone(),
    )
}

fn spreadsheet() -> AppResult<ImportFile> {
    ImportFile::new("attendance.xlsx", b"PK\x03\x04".to_vec())
}

#[tokio::test]
async fn staging_without_file_is_blocked() {
    let backend = Arc::new(FakeBackend::default());
    let dialogs = Arc::new(FakeDialogs::answering(true));
    let mut workflow = workflow(ImportKind::EmployeeMasterfile, &backend, &dialogs);

    assert!(matches!(
        workflow.stage().await,
        Err(AppError::Validation(_))
    ));
    assert!(backend.calls().await.is_empty());
    assert_eq!(dialogs.alerts().await.len(), 1);
}

#[tokio::test]
async fn date_ranged_import_requires_both_bounds() -> AppResult<()> {
    let backend = Arc::new(FakeBackend::default());
    let dialogs = Arc::new(FakeDialogs::answering(true));
    let mut workflow = workflow(ImportKind::AttendanceLogs, &backend, &dialogs);

    workflow.select_file(spreadsheet()?).await?;
    workflow.parameters_mut().date_from = NaiveDate::from_ymd_opt(2026, 10, 1);

    assert!(workflow.stage().await.is_err());
    assert!(backend.calls().await.is_empty());
    Ok(())
}

#[tokio::test]
async fn select_file_defaults_to_first_sheet() -> AppResult<()> {
    let backend = Arc::new(FakeBackend::default());
    let dialogs = Arc::new(FakeDialogs::answering(true));
    let mut workflow = workflow(ImportKind::DeviceCode, &backend, &dialogs);

    let sheets = workflow.select_file(spreadsheet()?).await?.to_vec();
    assert_eq!(sheets, vec!["Logs".to_owned(), "Summary".to_owned()]);
    assert_eq!(workflow.state(), ImportState::FileSelected);
    assert_eq!(workflow.parameters().sheet_name.as_deref(), Some("Logs"));

    workflow.choose_sheet("Summary")?;
    assert_eq!(workflow.parameters().sheet_name.as_deref(), Some("Summary"));
    assert!(workflow.choose_sheet("Missing").is_err());
    Ok(())
}

#[tokio::test]
async fn stage_then_commit_sends_only_valid_rows() -> AppResult<()> {
    let backend = Arc::new(FakeBackend::default());
    backend
        .push_response(Ok(json!([
            {"rowNumber": 1, "empCode": "E01", "message": "Invalid date"},
            {"rowNumber": 2, "empCode": "E02", "message": ""}
        ])))
        .await;
    backend.push_response(Ok(json!({"message": "ok"}))).await;
    let dialogs = Arc::new(FakeDialogs::answering(true));
    let mut workflow = workflow(ImportKind::AttendanceLogs, &backend, &dialogs);

    workflow.select_file(spreadsheet()?).await?;
    workflow.parameters_mut().date_from = NaiveDate::from_ymd_opt(2026, 10, 1);
    workflow.parameters_mut().date_to = NaiveDate::from_ymd_opt(2026, 10, 15);

    let summary = workflow.stage().await?;
    assert_eq!((summary.total, summary.valid, summary.invalid), (2, 1, 1));
    assert_eq!(workflow.state(), ImportState::Staged);

    assert_eq!(workflow.commit().await?, 1);
    assert_eq!(workflow.state(), ImportState::Idle);
    assert!(workflow.file().is_none());

    let calls = backend.calls().await;
    let Some(Call::Commit(ImportKind::AttendanceLogs, body)) = calls.last() else {
        panic!("expected a commit call, got {calls:?}");
    };
    assert_eq!(
        body["imports"],
        json!([{"rowNumber": 2, "empCode": "E02", "message": ""}])
    );
    assert_eq!(body["dateFrom"], "2026-10-01");
    assert_eq!(body["sheetName"], "Logs");
    Ok(())
}

#[tokio::test]
async fn all_invalid_rows_commit_empty_imports() -> AppResult<()> {
    let backend = Arc::new(FakeBackend::default());
    backend
        .push_response(Ok(json!([
            {"rowNumber": 1, "message": "Unknown employee"}
        ])))
        .await;
    let dialogs = Arc::new(FakeDialogs::answering(true));
    let mut workflow = workflow(ImportKind::EmployeeMasterfile, &backend, &dialogs);

    workflow.select_file(spreadsheet()?).await?;
    workflow.stage().await?;
    assert!(workflow.valid_rows().is_empty());

    assert_eq!(workflow.commit().await?, 0);
    let calls = backend.calls().await;
    assert!(matches!(
        calls.last(),
        Some(Call::Commit(_, body)) if body["imports"] == json!([])
    ));
    Ok(())
}

#[tokio::test]
async fn server_error_list_clears_preview() -> AppResult<()> {
    let backend = Arc::new(FakeBackend::default());
    backend
        .push_response(Ok(json!([{"rowNumber": 4, "message": ""}])))
        .await;
    backend
        .push_response(Ok(json!({
            "errors": [{"rowNumber": 1, "message": "Column EmpCode is missing"}]
        })))
        .await;
    let dialogs = Arc::new(FakeDialogs::answering(true));
    let mut workflow = workflow(ImportKind::EmployeeMasterfile, &backend, &dialogs);

    workflow.select_file(spreadsheet()?).await?;
    workflow.stage().await?;
    assert_eq!(workflow.staged_rows().len(), 1);

    let result = workflow.stage().await;
    assert!(matches!(result, Err(AppError::Server { .. })));
    assert!(workflow.staged_rows().is_empty());
    assert_eq!(workflow.state(), ImportState::FileSelected);
    let alerts = dialogs.alerts().await;
    assert_eq!(
        alerts.last().map(|(_, message)| message.as_str()),
        Some("Column EmpCode is missing")
    );
    Ok(())
}

#[tokio::test]
async fn commit_before_stage_is_blocked() -> AppResult<()> {
    let backend = Arc::new(FakeBackend::default());
    let dialogs = Arc::new(FakeDialogs::answering(true));
    let mut workflow = workflow(ImportKind::DeviceCode, &backend, &dialogs);

    workflow.select_file(spreadsheet()?).await?;
    assert!(workflow.commit().await.is_err());
    assert!(backend.calls().await.is_empty());
    Ok(())
}

#[tokio::test]
async fn reselecting_file_keeps_previous_preview() -> AppResult<()> {
    let backend = Arc::new(FakeBackend::default());
    backend
        .push_response(Ok(json!([{"rowNumber": 2, "message": null}])))
        .await;
    let dialogs = Arc::new(FakeDialogs::answering(true));
    let mut workflow = workflow(ImportKind::DeviceCode, &backend, &dialogs);

    workflow.select_file(spreadsheet()?).await?;
    workflow.stage().await?;
    workflow
        .select_file(ImportFile::new("devices.xls", vec![0xD0, 0xCF])?)
        .await?;

    assert_eq!(workflow.state(), ImportState::Staged);
    assert_eq!(workflow.valid_rows().len(), 1);

    workflow.clear_file();
    assert_eq!(workflow.state(), ImportState::Idle);
    assert!(workflow.staged_rows().is_empty());
    Ok(())
}

#[tokio::test]
async fn workshift_import_sends_groups_and_dates() -> AppResult<()> {
    let backend = Arc::new(FakeBackend::default());
    let dialogs = Arc::new(FakeDialogs::answering(true));
    let mut workflow = workflow(ImportKind::WorkshiftSchedule, &backend, &dialogs);

    workflow.select_file(spreadsheet()?).await?;
    assert!(workflow.stage().await.is_err());

    let parameters = workflow.parameters_mut();
    parameters.group_codes = vec!["G1".to_owned(), "G2".to_owned()];
    parameters.date_from = NaiveDate::from_ymd_opt(2026, 11, 1);
    parameters.date_to = NaiveDate::from_ymd_opt(2026, 11, 30);
    workflow.stage().await?;

    let calls = backend.calls().await;
    assert!(matches!(
        calls.as_slice(),
        [Call::Stage(ImportKind::WorkshiftSchedule, file_name, parameters)]
            if file_name == "attendance.xlsx" && parameters.group_codes.len() == 2
    ));
    Ok(())
}

#[tokio::test]
async fn template_download_uses_kind_file_name() -> AppResult<()> {
    let backend = Arc::new(FakeBackend::default());
    let dialogs = Arc::new(FakeDialogs::answering(true));
    let workflow = workflow(ImportKind::AttendanceLogs, &backend, &dialogs);

    assert_eq!(workflow.download_template().await?, b"PK".to_vec());
    assert_eq!(
        backend.calls().await,
        vec![Call::Template("AttendanceLogsTemplate.xlsx".to_owned())]
    );
    Ok(())
}

#[tokio::test]
async fn abandoned_stage_releases_the_workflow() -> AppResult<()> {
    let backend = Arc::new(FakeBackend::default());
    backend.stall_next_request();
    backend
        .push_response(Ok(json!([{"rowNumber": 1, "empCode": "E01", "message": ""}])))
        .await;
    let dialogs = Arc::new(FakeDialogs::answering(true));
    let mut workflow = workflow(ImportKind::EmployeeMasterfile, &backend, &dialogs);

    workflow.select_file(spreadsheet()?).await?;
    let abandoned = tokio::time::timeout(Duration::from_millis(20), workflow.stage()).await;
    assert!(abandoned.is_err());
    assert!(!workflow.is_processing());
    assert_eq!(workflow.state(), ImportState::FileSelected);

    let summary = workflow.stage().await?;
    assert_eq!(summary.valid, 1);
    assert_eq!(workflow.state(), ImportState::Staged);
    Ok(())
}
