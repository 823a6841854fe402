pub mod api;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod node;
pub mod shutdown;
pub mod worker;
