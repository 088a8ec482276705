pub mod rpc;
pub mod types;

pub use rpc::rpc_endpoint;
pub use types::*;
