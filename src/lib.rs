pub mod diagnostics;

pub mod calendar;
pub mod config;
pub mod entries;
pub mod output;
pub mod questions;
pub mod scoring;
