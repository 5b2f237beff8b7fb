pub mod client;
pub mod dispatcher;
pub mod endpoint;
pub mod executor;
pub mod protocol;
pub mod signing;
pub mod transport;

pub use crate::domain::ports::{EndpointDiscovery, HttpTransport, Operation};
pub use crate::utils::error::Result;
pub use client::{Client, ClientBuilder};
pub use executor::CallHandle;
