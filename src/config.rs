// worklog-backend/src/config.rs
use std::env;
use std::path::{Path, PathBuf};

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 5000;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not resolve the base directory: {0}")]
    BaseDir(#[from] std::io::Error),
    #[error("PORT must be a valid number, got '{0}'")]
    InvalidPort(String),
}

/// Process-wide settings, resolved once at startup and handed to the pool and
/// store constructors.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database_path: PathBuf,
    pub upload_dir: PathBuf,
    /// Empty means any origin is allowed.
    pub allowed_origins: Vec<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let base_dir = match env::var("WORKLOG_BASE_DIR") {
            Ok(dir) if !dir.trim().is_empty() => PathBuf::from(dir),
            _ => env::current_dir()?,
        };

        let port = match env::var("PORT") {
            Ok(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort(raw.clone()))?,
            Err(_) => DEFAULT_PORT,
        };

        let allowed_origins = env::var("CORS_ALLOWED_ORIGINS")
            .map(|raw| split_origins(&raw))
            .unwrap_or_default();

        Ok(AppConfig {
            host: env::var("HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string()),
            port,
            database_path: resolve_under(&base_dir, env::var("DATABASE_PATH").ok(), "database.db"),
            upload_dir: resolve_under(&base_dir, env::var("UPLOAD_DIR").ok(), "uploads"),
            allowed_origins,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn resolve_under(base_dir: &Path, value: Option<String>, default_name: &str) -> PathBuf {
    match value {
        Some(v) if !v.trim().is_empty() => {
            let path = PathBuf::from(v);
            if path.is_absolute() {
                path
            } else {
                base_dir.join(path)
            }
        }
        _ => base_dir.join(default_name),
    }
}

fn split_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_paths_resolve_against_base_dir() {
        let base = Path::new("/srv/worklog");
        assert_eq!(
            resolve_under(base, Some("data/app.db".to_string()), "database.db"),
            PathBuf::from("/srv/worklog/data/app.db")
        );
        assert_eq!(
            resolve_under(base, Some("/var/lib/app.db".to_string()), "database.db"),
            PathBuf::from("/var/lib/app.db")
        );
        assert_eq!(
            resolve_under(base, None, "uploads"),
            PathBuf::from("/srv/worklog/uploads")
        );
        assert_eq!(
            resolve_under(base, Some("  ".to_string()), "uploads"),
            PathBuf::from("/srv/worklog/uploads")
        );
    }

    #[test]
    fn origins_are_trimmed_and_blank_entries_dropped() {
        assert_eq!(
            split_origins(" http://localhost:3000, ,https://worklog.example "),
            vec!["http://localhost:3000", "https://worklog.example"]
        );
        assert!(split_origins("").is_empty());
    }
}
