/// JSON-RPC protocol version carried by every envelope
pub const JSONRPC_VERSION: &str = "2.0";

/// JSON-RPC 2.0 error codes
pub mod error_codes {
    pub const PARSE_ERROR: i64 = -32700;
    pub const INVALID_REQUEST: i64 = -32600;
    pub const INVALID_PARAMS: i64 = -32602;
    pub const INTERNAL_ERROR: i64 = -32603;
}

/// Methods answered by the signing service instead of the upstream node
pub mod methods {
    pub const ETH_ACCOUNTS: &str = "eth_accounts";
    pub const ETH_SEND_TRANSACTION: &str = "eth_sendTransaction";
    pub const ETH_SIGN_TRANSACTION: &str = "eth_signTransaction";
    pub const ETH_SIGN: &str = "eth_sign";
    pub const PERSONAL_SIGN: &str = "personal_sign";
    pub const ETH_SIGN_TYPED_DATA: &str = "eth_signTypedData";
    pub const ETH_SIGN_TYPED_DATA_V3: &str = "eth_signTypedData_v3";
    pub const ETH_SIGN_TYPED_DATA_V4: &str = "eth_signTypedData_v4";
}

/// Defaults shared by the CLI and the config file loader
pub mod defaults {
    pub const ADDRESS: &str = "127.0.0.1";
    pub const PORT: u16 = 8545;
    pub const LOG_LEVEL: &str = "info";
    pub const UPSTREAM_TIMEOUT_SECS: u64 = 30;
    pub const SIGNER_TIMEOUT_SECS: u64 = 30;
    pub const AUDIT_LOG_PATH: &str = "/var/log/signing-rpc-proxy/audit.log";
}

/// Entry removed from typed-data `types` before signing; the domain is passed separately
pub const EIP712_DOMAIN_TYPE: &str = "EIP712Domain";
