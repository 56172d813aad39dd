pub mod format;
pub mod sanitize;
