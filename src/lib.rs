pub mod config;
pub mod cursor;
pub mod error;
pub mod granularity;
pub mod output;
pub mod record;
pub mod sequence;
pub mod store;
