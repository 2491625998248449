pub mod loader;
pub mod types;
pub mod wordlist;

pub use loader::ConfigLoader;
pub use types::{ConcurrencyConfig, FilterConfig, GlobalConfig, HostsConfig, HttpConfig};
pub use wordlist::Wordlist;
