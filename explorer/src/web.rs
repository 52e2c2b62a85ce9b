pub mod endpoint;
pub mod model;
pub mod web_server;
