use forum_core::urls::ForumUrls;

use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields except the token secret have sensible defaults suitable for
/// local development. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Bearer token verification settings.
    pub jwt: JwtConfig,
    /// Forum presentation settings (page sizes, URL root).
    pub forum: ForumConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            jwt: JwtConfig::from_env(),
            forum: ForumConfig::from_env(),
        }
    }
}

/// Default categories per page.
const DEFAULT_CATEGORIES_PER_PAGE: i64 = 50;
/// Default threads per page.
const DEFAULT_THREADS_PER_PAGE: i64 = 20;
/// Default posts per page.
const DEFAULT_POSTS_PER_PAGE: i64 = 15;
/// Default window, in days, of `GET /posts/recent`.
const DEFAULT_RECENT_DAYS: i64 = 7;
/// Default path segment the forum front-end is mounted under.
const DEFAULT_ROUTE_ROOT: &str = "forum";

/// Per-entity page sizes, the recent-posts window and the front-end URL root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForumConfig {
    pub categories_per_page: i64,
    pub threads_per_page: i64,
    pub posts_per_page: i64,
    /// Posts updated within this many days count as recent.
    pub recent_days: i64,
    pub route_root: String,
}

impl Default for ForumConfig {
    fn default() -> Self {
        Self {
            categories_per_page: DEFAULT_CATEGORIES_PER_PAGE,
            threads_per_page: DEFAULT_THREADS_PER_PAGE,
            posts_per_page: DEFAULT_POSTS_PER_PAGE,
            recent_days: DEFAULT_RECENT_DAYS,
            route_root: DEFAULT_ROUTE_ROOT.to_string(),
        }
    }
}

impl ForumConfig {
    /// Load forum settings from environment variables.
    ///
    /// | Env Var                     | Default |
    /// |-----------------------------|---------|
    /// | `FORUM_CATEGORIES_PER_PAGE` | `50`    |
    /// | `FORUM_THREADS_PER_PAGE`    | `20`    |
    /// | `FORUM_POSTS_PER_PAGE`      | `15`    |
    /// | `FORUM_RECENT_DAYS`         | `7`     |
    /// | `FORUM_ROUTE_ROOT`          | `forum` |
    pub fn from_env() -> Self {
        Self {
            categories_per_page: positive_from_env(
                "FORUM_CATEGORIES_PER_PAGE",
                DEFAULT_CATEGORIES_PER_PAGE,
            ),
            threads_per_page: positive_from_env("FORUM_THREADS_PER_PAGE", DEFAULT_THREADS_PER_PAGE),
            posts_per_page: positive_from_env("FORUM_POSTS_PER_PAGE", DEFAULT_POSTS_PER_PAGE),
            recent_days: positive_from_env("FORUM_RECENT_DAYS", DEFAULT_RECENT_DAYS),
            route_root: std::env::var("FORUM_ROUTE_ROOT")
                .unwrap_or_else(|_| DEFAULT_ROUTE_ROOT.into()),
        }
    }

    /// URL builder rooted at `route_root`.
    pub fn urls(&self) -> ForumUrls {
        ForumUrls::new(&self.route_root)
    }
}

/// Read a positive integer, panicking on garbage so misconfiguration
/// fails at startup.
fn positive_from_env(var: &str, default: i64) -> i64 {
    let value: i64 = std::env::var(var)
        .unwrap_or_else(|_| default.to_string())
        .parse()
        .unwrap_or_else(|_| panic!("{var} must be a valid i64"));
    assert!(value > 0, "{var} must be positive");
    value
}
