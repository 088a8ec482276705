pub mod ip;
pub mod secure_string;
pub mod tls;

pub use ip::{extract_real_ip, validate_ip_access};
pub use secure_string::SecureString;
pub use tls::TlsManager;
