use std::time::Duration;

pub const DEFAULT_RPC_URL: &str = "https://aur.archlinux.org/rpc.php";
pub const DEFAULT_BASE_URL: &str = "https://aur.archlinux.org/";

#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Endpoint queried with `?type=...&arg=...`
    pub rpc_url: String,
    /// Prefix joined with a package's `URLPath` to download its snapshot
    pub base_url: String,
    pub user_agent: String,
    pub timeout: Option<Duration>,
    /// Log every URL and raw response body before it is parsed
    pub debug: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            rpc_url: DEFAULT_RPC_URL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: format!("aq/{}", env!("CARGO_PKG_VERSION")),
            timeout: None,
            debug: false,
        }
    }
}

impl ClientConfig {
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build the RPC query URL for a request type and its argument.
    pub fn query_url(&self, kind: &str, arg: &str) -> String {
        format!("{}?type={}&arg={}", self.rpc_url, kind, urlencoding::encode(arg))
    }

    /// Join the base URL with a package's relative download path.
    pub fn download_url(&self, download_path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            download_path.trim_start_matches('/')
        )
    }
}
