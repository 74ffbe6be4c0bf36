/// Server configuration, read from the environment at startup
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// TCP port to listen on (`PORT`, default 3001)
    pub port: u16,
    /// Directory served as the static frontend (`STATIC_DIR`)
    pub static_dir: String,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(3001);
        let static_dir =
            std::env::var("STATIC_DIR").unwrap_or_else(|_| "static".to_string());

        Self { port, static_dir }
    }
}
