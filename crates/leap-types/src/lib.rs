#![forbid(unsafe_code)]
#![doc = "Common error types shared by the leap TLS crates."]

pub mod error;

pub use error::*;
