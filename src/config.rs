use serde::Deserialize;

use crate::services::PosterPolicy;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Redis connection URL (response cache and user data)
    #[serde(default = "default_redis_url")]
    pub redis_url: String,

    /// Kinopoisk catalog API key, sent as `X-API-KEY`
    pub catalog_api_key: String,

    /// Kinopoisk catalog API base URL
    #[serde(default = "default_catalog_api_url")]
    pub catalog_api_url: String,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Maximum number of detail lookups in flight for one list aggregation
    #[serde(default = "default_detail_fetch_concurrency")]
    pub detail_fetch_concurrency: usize,

    /// Hosts the poster proxy may fetch from, comma separated; subdomains match
    #[serde(default = "default_poster_hosts")]
    pub poster_hosts: Vec<String>,

    /// Largest poster body accepted, in bytes
    #[serde(default = "default_poster_max_bytes")]
    pub poster_max_bytes: usize,

    /// Most posters kept in memory
    #[serde(default = "default_poster_cache_entries")]
    pub poster_cache_entries: usize,
}

fn default_redis_url() -> String {
    "redis://localhost:6379".to_string()
}

fn default_catalog_api_url() -> String {
    "https://kinopoiskapiunofficial.tech".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_detail_fetch_concurrency() -> usize {
    8
}

fn default_poster_hosts() -> Vec<String> {
    PosterPolicy::default().allowed_hosts
}

fn default_poster_max_bytes() -> usize {
    PosterPolicy::default().max_bytes
}

fn default_poster_cache_entries() -> usize {
    PosterPolicy::default().max_entries
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    pub fn poster_policy(&self) -> PosterPolicy {
        PosterPolicy {
            allowed_hosts: self.poster_hosts.clone(),
            max_bytes: self.poster_max_bytes,
            max_entries: self.poster_cache_entries,
        }
    }

    /// Socket address string the server binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_applied() {
        let vars = vec![("CATALOG_API_KEY".to_string(), "secret".to_string())];
        let config: Config = envy::from_iter(vars).unwrap();

        assert_eq!(config.catalog_api_key, "secret");
        assert_eq!(config.redis_url, "redis://localhost:6379");
        assert_eq!(config.catalog_api_url, "https://kinopoiskapiunofficial.tech");
        assert_eq!(config.detail_fetch_concurrency, 8);
        assert_eq!(config.bind_address(), "127.0.0.1:3000");
        assert_eq!(
            config.poster_hosts,
            vec!["kinopoiskapiunofficial.tech", "avatars.mds.yandex.net"]
        );
        assert_eq!(config.poster_max_bytes, 5 * 1024 * 1024);
    }

    #[test]
    fn test_missing_api_key_is_an_error() {
        let vars: Vec<(String, String)> = vec![];
        let result = envy::from_iter::<_, Config>(vars);
        assert!(result.is_err());
    }

    #[test]
    fn test_overrides() {
        let vars = vec![
            ("CATALOG_API_KEY".to_string(), "k".to_string()),
            ("PORT".to_string(), "8080".to_string()),
            ("DETAIL_FETCH_CONCURRENCY".to_string(), "2".to_string()),
        ];
        let config: Config = envy::from_iter(vars).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.detail_fetch_concurrency, 2);
    }

    #[test]
    fn test_poster_hosts_from_comma_list() {
        let vars = vec![
            ("CATALOG_API_KEY".to_string(), "k".to_string()),
            ("POSTER_HOSTS".to_string(), "img.example.test,cdn.example.test".to_string()),
            ("POSTER_MAX_BYTES".to_string(), "1024".to_string()),
        ];
        let config: Config = envy::from_iter(vars).unwrap();
        let policy = config.poster_policy();

        assert_eq!(policy.allowed_hosts, vec!["img.example.test", "cdn.example.test"]);
        assert_eq!(policy.max_bytes, 1024);
    }
}
