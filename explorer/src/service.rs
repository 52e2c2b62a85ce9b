pub mod catalog;
pub mod matching_summary;
pub mod table_page;
