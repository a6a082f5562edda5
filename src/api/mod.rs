pub mod client;
pub mod types;

pub use client::{GongClient, Transport, DEFAULT_BASE_URL};
