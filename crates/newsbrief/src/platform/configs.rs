#[derive(Debug, Clone)]
pub struct PlatformConfig {
    pub host: String,
    pub api_key: String,
}

impl PlatformConfig {
    pub fn new<H, K>(host: H, api_key: K) -> Self
    where
        H: Into<String>,
        K: Into<String>,
    {
        Self {
            host: host.into(),
            api_key: api_key.into(),
        }
    }
}
