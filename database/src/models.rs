pub mod cell_value;
pub mod column_descriptor;
pub mod matching;
pub mod query;
pub mod table_row;
pub mod types;
