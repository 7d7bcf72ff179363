pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod types;

pub use client::{AyonClient, AyonClientBuilder};
pub use config::Credentials;
pub use error::{ClientError, ClientResult, RequestError};
