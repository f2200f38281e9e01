pub mod config;
pub mod demo;
pub mod environment;
pub mod errors;
pub mod ids;
pub mod routes;
pub mod store;
pub mod timestamp;
pub mod urls;
pub mod validation;
pub mod video;
