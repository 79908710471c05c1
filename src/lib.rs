// Library exports for Looplog
// This allows integration tests and external code to use Looplog modules

pub mod config;
pub mod content;
pub mod db;
pub mod error;
pub mod extractors;
pub mod routes;
pub mod state;
