use crate::models::cell_value::CellValue;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use sqlx::postgres::PgRow;
use sqlx::{Column, Row};

/// One row of an arbitrary table, cells kept in column order
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TableRow {
    cells: Vec<(String, CellValue)>,
}

impl TableRow {
    pub fn from_pg_row(row: &PgRow) -> Result<TableRow, sqlx::Error> {
        let mut cells = Vec::with_capacity(row.columns().len());
        for (index, column) in row.columns().iter().enumerate() {
            cells.push((column.name().to_string(), CellValue::decode(row, index)?));
        }
        Ok(TableRow { cells })
    }

    pub fn get(&self, column_name: &str) -> Option<&CellValue> {
        self.cells.iter().find(|(name, _)| name == column_name).map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CellValue)> {
        self.cells.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl FromIterator<(String, CellValue)> for TableRow {
    fn from_iter<I: IntoIterator<Item = (String, CellValue)>>(iter: I) -> Self {
        TableRow { cells: iter.into_iter().collect() }
    }
}

impl Serialize for TableRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.cells.len()))?;
        for (name, value) in &self.cells {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_and_serialize() {
        let row: TableRow = vec![
            ("id".to_string(), CellValue::Integer(42)),
            ("status".to_string(), CellValue::Text("pending".to_string())),
            ("memo".to_string(), CellValue::Null),
        ]
        .into_iter()
        .collect();

        assert_eq!(row.len(), 3);
        assert_eq!(row.get("status"), Some(&CellValue::Text("pending".to_string())));
        assert_eq!(row.get("missing"), None);
        assert_eq!(serde_json::to_string(&row).unwrap(), r#"{"id":42,"status":"pending","memo":null}"#);
    }
}
