//! Concrete adapter implementations of the port traits.

pub mod file_config_adapter;
pub mod csv_adapter;
pub mod csv_export_adapter;
pub mod console_alert_adapter;
