use std::collections::BTreeSet;

use db_explorer_database::models::column_descriptor::ColumnDescriptor;
use log::warn;

use crate::dashboard::preferences::DecodeError;

const DONATIONS_DEFAULT_COLUMNS: &[&str] =
    &["id", "created_at", "project_slug", "pledgeAmount", "asset_symbol", "success", "status"];

/// Columns shown for a table when the user never picked any
pub fn default_columns(table: &str) -> Option<&'static [&'static str]> {
    match table {
        "donations" => Some(DONATIONS_DEFAULT_COLUMNS),
        _ => None,
    }
}

/// Case-insensitive substring match on column name or declared type. An empty query matches all.
pub fn filter_columns<'a>(columns: &'a [ColumnDescriptor], query: &str) -> Vec<&'a ColumnDescriptor> {
    let query = query.trim().to_lowercase();
    columns
        .iter()
        .filter(|c| {
            query.is_empty() || c.column_name.to_lowercase().contains(&query) || c.data_type.to_lowercase().contains(&query)
        })
        .collect()
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ColumnSelection {
    selected: BTreeSet<String>,
}

impl ColumnSelection {
    /// Saved preference first, then the table defaults, then every column.
    /// Names that no longer exist in the table are dropped at each step.
    pub fn resolve(table: &str, columns: &[ColumnDescriptor], saved: Option<Result<Vec<String>, DecodeError>>) -> Self {
        match saved {
            Some(Ok(names)) => {
                let selection = Self::existing(columns, names.iter().map(String::as_str));
                if !selection.selected.is_empty() {
                    return selection;
                }
            }
            Some(Err(e)) => warn!("{}, using default columns", e),
            None => {}
        }
        Self::defaults(table, columns)
    }

    pub fn defaults(table: &str, columns: &[ColumnDescriptor]) -> Self {
        if let Some(defaults) = default_columns(table) {
            let selection = Self::existing(columns, defaults.iter().copied());
            if !selection.selected.is_empty() {
                return selection;
            }
        }
        Self::all(columns)
    }

    pub fn all(columns: &[ColumnDescriptor]) -> Self {
        ColumnSelection { selected: columns.iter().map(|c| c.column_name.clone()).collect() }
    }

    pub fn none() -> Self {
        ColumnSelection::default()
    }

    fn existing<'a>(columns: &[ColumnDescriptor], names: impl Iterator<Item = &'a str>) -> Self {
        let wanted: BTreeSet<&str> = names.collect();
        ColumnSelection {
            selected: columns
                .iter()
                .filter(|c| wanted.contains(c.column_name.as_str()))
                .map(|c| c.column_name.clone())
                .collect(),
        }
    }

    pub fn toggle(&mut self, column: &str) {
        if !self.selected.remove(column) {
            self.selected.insert(column.to_string());
        }
    }

    pub fn contains(&self, column: &str) -> bool {
        self.selected.contains(column)
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Selected columns in table order
    pub fn visible<'a>(&self, columns: &'a [ColumnDescriptor]) -> Vec<&'a ColumnDescriptor> {
        columns.iter().filter(|c| self.contains(&c.column_name)).collect()
    }

    /// Persisted form, in table order
    pub fn to_vec(&self, columns: &[ColumnDescriptor]) -> Vec<String> {
        self.visible(columns).into_iter().map(|c| c.column_name.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column(name: &str, data_type: &str) -> ColumnDescriptor {
        ColumnDescriptor {
            column_name: name.to_string(),
            data_type: data_type.to_string(),
            udt_name: "text".to_string(),
            is_nullable: "YES".to_string(),
        }
    }

    fn donation_columns() -> Vec<ColumnDescriptor> {
        vec![
            column("id", "text"),
            column("created_at", "timestamp without time zone"),
            column("project_slug", "text"),
            column("pledgeAmount", "numeric"),
            column("asset_symbol", "text"),
            column("success", "boolean"),
            column("status", "text"),
            column("transactionHash", "text"),
            column("processed", "boolean"),
        ]
    }

    fn names(columns: &[&ColumnDescriptor]) -> Vec<String> {
        columns.iter().map(|c| c.column_name.clone()).collect()
    }

    #[test]
    fn donations_start_with_default_columns() {
        let columns = donation_columns();
        let selection = ColumnSelection::resolve("donations", &columns, None);
        assert_eq!(selection.len(), 7);
        assert!(!selection.contains("transactionHash"));
        assert_eq!(
            names(&selection.visible(&columns)),
            vec!["id", "created_at", "project_slug", "pledgeAmount", "asset_symbol", "success", "status"]
        );
    }

    #[test]
    fn other_tables_show_every_column() {
        let columns = vec![column("donorId", "text"), column("matchedAmount", "numeric")];
        let selection = ColumnSelection::resolve("MatchingDonationLog", &columns, None);
        assert_eq!(selection, ColumnSelection::all(&columns));
    }

    #[test]
    fn saved_preference_is_filtered_to_existing_columns() {
        let columns = donation_columns();
        let saved = Some(Ok(vec!["status".to_string(), "removed_column".to_string(), "id".to_string()]));
        let selection = ColumnSelection::resolve("donations", &columns, saved);
        assert_eq!(selection.to_vec(&columns), vec!["id", "status"]);
    }

    #[test]
    fn empty_or_stale_preference_falls_back_to_defaults() {
        let columns = donation_columns();
        let defaults = ColumnSelection::defaults("donations", &columns);
        assert_eq!(ColumnSelection::resolve("donations", &columns, Some(Ok(vec![]))), defaults);
        assert_eq!(ColumnSelection::resolve("donations", &columns, Some(Ok(vec!["gone".to_string()]))), defaults);
    }

    #[test]
    fn corrupt_preference_falls_back_to_defaults() {
        let columns = donation_columns();
        let error = serde_json::from_str::<Vec<String>>("nope").unwrap_err();
        let saved = Some(Err(DecodeError::Malformed { table: "donations".to_string(), source: error }));
        assert_eq!(ColumnSelection::resolve("donations", &columns, saved), ColumnSelection::defaults("donations", &columns));
    }

    #[test]
    fn defaults_missing_from_table_show_everything() {
        let columns = vec![column("uuid", "uuid"), column("amount", "numeric")];
        assert_eq!(ColumnSelection::defaults("donations", &columns), ColumnSelection::all(&columns));
    }

    #[test]
    fn toggle_adds_and_removes() {
        let columns = donation_columns();
        let mut selection = ColumnSelection::none();
        selection.toggle("status");
        selection.toggle("id");
        assert_eq!(selection.to_vec(&columns), vec!["id", "status"]);
        selection.toggle("status");
        assert_eq!(selection.to_vec(&columns), vec!["id"]);
        assert!(ColumnSelection::none().visible(&columns).is_empty());
    }

    #[test]
    fn search_matches_name_or_type() {
        let columns = donation_columns();
        assert_eq!(names(&filter_columns(&columns, "AMOUNT")), vec!["pledgeAmount"]);
        assert_eq!(names(&filter_columns(&columns, "bool")), vec!["success", "processed"]);
        assert_eq!(filter_columns(&columns, "").len(), columns.len());
        assert!(filter_columns(&columns, "zzz").is_empty());
    }
}
