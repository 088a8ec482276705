use clap::Parser;

#[derive(Parser)]
#[command(name = "signing-rpc-proxy")]
#[command(about = "An Ethereum JSON-RPC proxy that delegates signing to a custodial signing service")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// When no subcommand is provided, these args are used for 'start'
    #[command(flatten)]
    pub start_args: StartArgs,
}

#[derive(Parser)]
pub enum Commands {
    /// Start the proxy server
    Start(StartArgs),
    /// Load and validate the configuration, then exit
    CheckConfig(StartArgs),
}

#[derive(Parser, Debug)]
pub struct StartArgs {
    /// Configuration file path (TOML)
    #[arg(short, long, env = "PROXY_CONFIG")]
    pub config: Option<String>,

    /// Server bind address
    #[arg(long, env = "PROXY_ADDRESS", default_value = "127.0.0.1")]
    pub address: String,

    /// Server port
    #[arg(short, long, env = "PROXY_PORT", default_value = "8545")]
    pub port: u16,

    /// Answer CORS preflight requests and allow any origin
    #[arg(long, env = "PROXY_CORS")]
    pub cors: bool,

    /// JSON-RPC URL of the upstream Ethereum node
    #[arg(long, env = "PROXY_UPSTREAM_URL")]
    pub upstream_url: Option<String>,

    /// Upstream request timeout in seconds
    #[arg(long, env = "PROXY_UPSTREAM_TIMEOUT")]
    pub upstream_timeout: Option<u64>,

    /// Base URL of the custodial signing service
    #[arg(long, env = "PROXY_SIGNER_URL")]
    pub signer_url: Option<String>,

    /// Organization identity at the signing service
    #[arg(long, env = "PROXY_ORGANIZATION_ID")]
    pub organization_id: Option<String>,

    /// Identity of the custodial key used for signing
    #[arg(long, env = "PROXY_KEY_ID")]
    pub key_id: Option<String>,

    /// API public key for the signing service
    #[arg(long, env = "PROXY_API_PUBLIC_KEY")]
    pub api_public_key: Option<String>,

    /// API private key for the signing service
    /// Prefer the environment variable over the command line
    #[arg(long, env = "PROXY_API_PRIVATE_KEY", hide_env_values = true)]
    pub api_private_key: Option<String>,

    /// Signing service request timeout in seconds
    #[arg(long, env = "PROXY_SIGNER_TIMEOUT")]
    pub signer_timeout: Option<u64>,

    /// Comma-separated list of client IPs allowed to use the proxy
    #[arg(long, env = "PROXY_ALLOWED_IPS", value_delimiter = ',')]
    pub allowed_ips: Vec<String>,

    /// Comma-separated reverse proxies allowed to set X-Forwarded-For and friends
    #[arg(long, env = "PROXY_TRUSTED_PROXIES", value_delimiter = ',')]
    pub trusted_proxies: Vec<String>,

    /// Write an audit entry for every signing call to this file
    #[arg(long, env = "PROXY_AUDIT_LOG")]
    pub audit_log: Option<String>,

    /// Enable TLS
    #[arg(long, env = "PROXY_TLS")]
    pub tls: bool,

    /// TLS certificate file path
    #[arg(long, env = "PROXY_TLS_CERT")]
    pub tls_cert: Option<String>,

    /// TLS private key file path
    #[arg(long, env = "PROXY_TLS_KEY")]
    pub tls_key: Option<String>,

    /// Enable logging (set to false to silence all output)
    #[arg(long, env = "PROXY_LOGGING", default_value_t = true, action = clap::ArgAction::Set)]
    pub logging: bool,

    /// Log level
    #[arg(long, env = "RUST_LOG")]
    pub log_level: Option<String>,
}
