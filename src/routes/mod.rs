pub mod api;
pub mod workspace;
