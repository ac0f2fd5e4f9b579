pub mod config;
pub mod crawler;
pub mod error;
pub mod models;
pub mod research;
pub mod signals;
pub mod valuation;
