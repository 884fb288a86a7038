//! Core domain types and logic.

pub mod asset;
pub mod price_point;
pub mod calendar;
pub mod generator;
pub mod history;
pub mod catalog;
pub mod indicator;
pub mod indicator_helpers;
pub mod quote;
pub mod metrics;
pub mod config_validation;
pub mod error;
