use crate::record::{FieldSpec, FieldValues};

/// Returns whether any searchable field contains `term`, ignoring case.
///
/// A blank term matches every row.
#[must_use]
pub fn matches_search(fields: &[FieldSpec], values: &FieldValues, term: &str) -> bool {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }

    fields
        .iter()
        .filter(|field| field.searchable)
        .any(|field| values.get(field.name).to_lowercase().contains(&needle))
}

/// Returns whether any of `columns` contains `term`, ignoring case.
#[must_use]
pub fn columns_match<'a>(columns: impl IntoIterator<Item = &'a str>, term: &str) -> bool {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }

    columns
        .into_iter()
        .any(|column| column.to_lowercase().contains(&needle))
}

#[cfg(test)]
mod tests {
    use crate::record::{FieldSpec, FieldValues};

    use super::{columns_match, matches_search};

    const FIELDS: &[FieldSpec] = &[
        FieldSpec::text("code", "Code", &["code"], "Code").searchable(),
        FieldSpec::text("secret", "Secret", &["secret"], "Secret"),
    ];

    #[test]
    fn search_ignores_case() {
        let values = FieldValues::new().with("code", "Finance");
        assert!(matches_search(FIELDS, &values, "fIN"));
    }

    #[test]
    fn search_skips_unsearched_fields() {
        let values = FieldValues::new().with("code", "HR").with("secret", "payroll");
        assert!(!matches_search(FIELDS, &values, "payroll"));
    }

    #[test]
    fn blank_term_matches_everything() {
        assert!(columns_match(["x"], "  "));
        assert!(!columns_match(["x"], "y"));
    }
}
