pub mod acl;
pub mod app;
pub mod db;
pub mod docs;
pub mod errors;
pub mod extract;
pub mod jwt;
pub mod messages;
pub mod models;
pub mod response;
pub mod routes;
pub mod utils;

// Re-export commonly used items for tests
pub use app::create_app;
