pub mod health;
pub mod matching_summary;
pub mod table_page;
pub mod tables;
