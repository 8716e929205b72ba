pub mod catalog;
pub mod cli;
pub mod config;
pub mod fields;
pub mod gallery;
pub mod logging;
pub mod report;
