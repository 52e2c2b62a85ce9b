pub mod dashboard;
pub mod service;
pub mod settings;
pub mod signal;
pub mod web;
