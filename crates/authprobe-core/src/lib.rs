pub mod config;
pub mod logging;

pub mod credentials;
pub mod handler;
pub mod request;
pub mod surface;
pub mod transport;
