pub mod format;
pub mod json;
pub mod markdown;
