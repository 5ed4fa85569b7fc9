pub mod alert;
pub mod config;
pub mod db;
pub mod error;
pub mod history;
pub mod metrics;
pub mod scanner;
pub mod source;
