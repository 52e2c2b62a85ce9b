pub mod database_details;
