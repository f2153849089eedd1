//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod import;
mod modal;
mod pagination;
mod record;
mod reference;
mod search;
mod security;
mod setup;
pub mod validation;

pub use import::{
    ImportFile, ImportKind, ImportParameters, ImportRow, SPREADSHEET_EXTENSIONS, StageOutcome,
    commit_body, commit_eligible,
};
pub use modal::{ModalStack, Overlay};
pub use pagination::{FULL_PAGE_LIST_LIMIT, PageMarker, Pagination};
pub use record::{FieldFormat, FieldSpec, FieldValues};
pub use reference::{ReferenceEntry, ReferenceKind};
pub use search::{columns_match, matches_search};
pub use security::{AccessType, CapabilityMap};
pub use setup::{
    CODE_MAX_LENGTH, Classification, DESCRIPTION_MAX_LENGTH, Department, GroupSchedule,
    HolidayOtRate, PayHouse, SdkEntry, SetupKind, SetupRecord,
};
