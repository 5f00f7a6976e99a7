pub mod config;
pub mod content;
pub mod domain;
pub mod handlers;
pub mod paths;
pub mod session;
pub mod state;
pub mod store;
pub mod study;
pub mod validation;
