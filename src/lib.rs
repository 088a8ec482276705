pub mod audit;
pub mod cli;
pub mod config;
pub mod constants;
pub mod dispatch;
pub mod errors;
pub mod handlers;
pub mod rpc;
pub mod security;
pub mod server;
pub mod signer;
pub mod upstream;
pub mod utils;

pub use config::Config;
pub use dispatch::Dispatcher;
pub use errors::ProxyError;
pub use server::Server;
pub use signer::{RemoteSigner, SigningClient};
pub use upstream::{HttpUpstream, UpstreamClient};

// Re-export CLI types for main.rs
pub use cli::*;

#[cfg(test)]
pub mod test_utils;
