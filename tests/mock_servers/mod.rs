//! Mock servers for host integration testing

pub mod backend;

pub use backend::MockBackend;
