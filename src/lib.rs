//! HR analytics core: load an employee dataset, filter it, aggregate it and
//! turn the results into chart specifications a renderer can draw.

pub mod chart;
pub mod color;
pub mod config;
pub mod data;
pub mod insight;
pub mod summary;

pub use config::{DashboardConfig, Variant};
