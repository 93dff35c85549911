use anyhow::Error;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 5000,
            log_level: "info".into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Without an url the server keeps everything in memory
    pub url: Option<String>,
    pub pool_size: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            pool_size: 8,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct SessionConfig {
    pub cookie_name: String,
    pub secure: bool,
    pub expiry_minutes: i64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: "movie-ratings.sid".into(),
            secure: false,
            expiry_minutes: 60 * 24,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct JudgmentConfig {
    pub eye_email: String,
    /// Dataset user whose ratings the eye takes over when seeding
    pub eye_user: i32,
    pub messages: Option<Vec<String>>,
}

impl Default for JudgmentConfig {
    fn default() -> Self {
        Self {
            eye_email: "the-eye@of-judgment.com".into(),
            eye_user: 1,
            messages: None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub session: SessionConfig,
    pub judgment: JudgmentConfig,
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, Error> {
        let parsed: Self = toml::from_str(contents)?;
        Ok(parsed)
    }

    /// Overrides the database url, mostly used with `DATABASE_URL`
    pub fn with_database_url(mut self, url: Option<String>) -> Self {
        if let Some(url) = url.filter(|url| !url.is_empty()) {
            self.database.url = Some(url);
        }

        self
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Error;

    #[test]
    fn load_example_config() -> Result<(), Error> {
        let expected = Config {
            server: ServerConfig {
                host: "127.0.0.1".into(),
                port: 5000,
                log_level: "debug".into(),
            },
            database: DatabaseConfig {
                url: Some("postgres://postgres:@localhost/ratings".into()),
                pool_size: 4,
            },
            session: SessionConfig {
                cookie_name: "ratings.sid".into(),
                secure: false,
                expiry_minutes: 120,
            },
            judgment: JudgmentConfig {
                eye_email: "the-eye@of-judgment.com".into(),
                eye_user: 13,
                messages: None,
            },
        };

        let loaded = Config::load("example.toml")?;
        assert_eq!(expected, loaded);

        Ok(())
    }

    #[test]
    fn missing_sections_use_defaults() -> Result<(), Error> {
        let loaded = Config::from_toml("[server]\nport = 8080\n")?;

        assert_eq!(loaded.server.port, 8080);
        assert_eq!(loaded.server.host, "0.0.0.0");
        assert_eq!(loaded.database, DatabaseConfig::default());
        assert_eq!(loaded.judgment.eye_email, "the-eye@of-judgment.com");
        assert_eq!(loaded.judgment.eye_user, 1);

        Ok(())
    }

    #[test]
    fn custom_messages() -> Result<(), Error> {
        let loaded = Config::from_toml(
            r#"
            [judgment]
            eye_email = "eye@example.com"
            messages = ["fine", "bad"]
            "#,
        )?;

        assert_eq!(loaded.judgment.eye_email, "eye@example.com");
        assert_eq!(
            loaded.judgment.messages,
            Some(vec!["fine".to_string(), "bad".to_string()])
        );

        Ok(())
    }

    #[test]
    fn database_url_override() {
        let config = Config::default().with_database_url(Some("postgres://db/ratings".into()));
        assert_eq!(config.database.url.as_deref(), Some("postgres://db/ratings"));

        let config = config.with_database_url(Some(String::new()));
        assert_eq!(config.database.url.as_deref(), Some("postgres://db/ratings"));

        let config = Config::default().with_database_url(None);
        assert_eq!(config.database.url, None);
        assert_eq!(config.bind_addr(), "0.0.0.0:5000");
    }
}
