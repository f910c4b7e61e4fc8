pub mod routes;
pub mod start;
pub mod status;
