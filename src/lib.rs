pub mod config;
pub mod core;
pub mod domain;
pub mod operations;
pub mod utils;

pub use config::ClientConfig;
pub use self::core::{CallHandle, Client, ClientBuilder};
pub use domain::model::Outcome;
pub use domain::ports::Operation;
pub use utils::error::{ClientError, ErrorCategory, Result};
