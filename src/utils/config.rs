use log::warn;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;

use crate::db::ConnectionInfo;

pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database: ConnectionInfo,
    #[serde(skip_serializing)]
    pub jwt_secret: String,
    pub admin_user: String,
    #[serde(skip_serializing)]
    pub admin_pass: String,
    pub allow_execute: bool,
    pub allow_execute_full: bool,
    pub sql_file_path: String,
    pub uploads_dir: String,
    pub log_level: String,
    pub max_upload_bytes: usize,
    pub json_limit_bytes: usize,
}

impl AppConfig {
    pub fn new() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 4000,
            database: ConnectionInfo::default(),
            jwt_secret: "changeme".to_string(),
            admin_user: "admin".to_string(),
            admin_pass: "changeme".to_string(),
            allow_execute: false,
            allow_execute_full: false,
            sql_file_path: "proyect.sql".to_string(),
            uploads_dir: "uploads".to_string(),
            log_level: "info".to_string(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            json_limit_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }

    pub fn config_path() -> Option<PathBuf> {
        if let Ok(path) = env::var("RESERVE_ADMIN_CONFIG") {
            return Some(PathBuf::from(path));
        }
        dirs::config_dir().map(|mut path| {
            path.push("reserve_admin");
            path.push("config.json");
            path
        })
    }

    /// Defaults, then the JSON config file if present, then the environment.
    pub fn load() -> Self {
        let mut config = Self::load_file().unwrap_or_default();
        config.apply_env(|key| env::var(key).ok());
        config
    }

    fn load_file() -> Option<Self> {
        let path = Self::config_path()?;
        if !path.exists() {
            return None;
        }
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(err) => {
                warn!("Config read error ({}): {err}", path.display());
                return None;
            }
        };
        match serde_json::from_str(&content) {
            Ok(config) => Some(config),
            Err(err) => {
                warn!("Config parse error ({}): {err}", path.display());
                None
            }
        }
    }

    /// Override fields from environment-style variables supplied by `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("HOST") {
            self.host = host;
        }
        if let Some(port) = lookup("PORT") {
            match port.trim().parse() {
                Ok(port) => self.port = port,
                Err(_) => warn!("Ignoring invalid PORT value `{port}`"),
            }
        }
        if let Some(user) = lookup("ORACLE_USER") {
            self.database.username = user;
        }
        if let Some(password) = lookup("ORACLE_PASSWORD") {
            self.database.password = password;
        }
        if let Some(connect_string) = lookup("ORACLE_CONNECT_STRING") {
            self.database.connect_string = connect_string;
        }
        if let Some(secret) = lookup("JWT_SECRET") {
            self.jwt_secret = secret;
        }
        if let Some(user) = lookup("ADMIN_USER") {
            self.admin_user = user;
        }
        if let Some(pass) = lookup("ADMIN_PASS") {
            self.admin_pass = pass;
        }
        if let Some(flag) = lookup("ALLOW_EXECUTE") {
            self.allow_execute = Self::flag(&flag);
        }
        if let Some(flag) = lookup("ALLOW_EXECUTE_FULL") {
            self.allow_execute_full = Self::flag(&flag);
        }
        if let Some(path) = lookup("SQL_FILE_PATH") {
            self.sql_file_path = path;
        }
        if let Some(dir) = lookup("UPLOADS_DIR") {
            self.uploads_dir = dir;
        }
        if let Some(level) = lookup("LOG_LEVEL") {
            self.log_level = level;
        }
        if let Some(bytes) = lookup("MAX_UPLOAD_BYTES") {
            match bytes.trim().parse() {
                Ok(bytes) => self.max_upload_bytes = bytes,
                Err(_) => warn!("Ignoring invalid MAX_UPLOAD_BYTES value `{bytes}`"),
            }
        }
    }

    /// Execution flags are on only for a literal (case-insensitive) `true`.
    fn flag(value: &str) -> bool {
        value.trim().eq_ignore_ascii_case("true")
    }

    pub fn script_path(&self) -> PathBuf {
        PathBuf::from(&self.sql_file_path)
    }

    pub fn uploads_path(&self) -> PathBuf {
        PathBuf::from(&self.uploads_dir)
    }

    pub fn bind_address(&self) -> (String, u16) {
        (self.host.clone(), self.port)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn with_env(vars: &[(&str, &str)]) -> AppConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let mut config = AppConfig::new();
        config.apply_env(|key| vars.get(key).cloned());
        config
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::new();
        assert_eq!(config.port, 4000);
        assert_eq!(config.admin_user, "admin");
        assert_eq!(config.jwt_secret, "changeme");
        assert_eq!(config.sql_file_path, "proyect.sql");
        assert_eq!(config.max_upload_bytes, 5 * 1024 * 1024);
        assert!(!config.allow_execute);
        assert!(!config.allow_execute_full);
        assert!(!config.database.is_configured());
    }

    #[test]
    fn test_env_overrides() {
        let config = with_env(&[
            ("PORT", "8080"),
            ("ORACLE_USER", "reserva"),
            ("ORACLE_PASSWORD", "secret"),
            ("ORACLE_CONNECT_STRING", "//localhost:1521/XEPDB1"),
            ("ADMIN_USER", "guardaparque"),
            ("SQL_FILE_PATH", "/srv/proyect.sql"),
        ]);
        assert_eq!(config.port, 8080);
        assert!(config.database.is_configured());
        assert_eq!(config.admin_user, "guardaparque");
        assert_eq!(config.script_path(), PathBuf::from("/srv/proyect.sql"));
    }

    #[test]
    fn test_execution_flags_need_literal_true() {
        assert!(with_env(&[("ALLOW_EXECUTE", "TRUE")]).allow_execute);
        assert!(with_env(&[("ALLOW_EXECUTE_FULL", "true")]).allow_execute_full);
        assert!(!with_env(&[("ALLOW_EXECUTE", "1")]).allow_execute);
        assert!(!with_env(&[("ALLOW_EXECUTE", "yes")]).allow_execute);
        assert!(!with_env(&[("ALLOW_EXECUTE_FULL", "")]).allow_execute_full);
    }

    #[test]
    fn test_invalid_numbers_keep_defaults() {
        let config = with_env(&[("PORT", "puerto"), ("MAX_UPLOAD_BYTES", "-1")]);
        assert_eq!(config.port, 4000);
        assert_eq!(config.max_upload_bytes, DEFAULT_MAX_UPLOAD_BYTES);
    }

    #[test]
    fn test_secrets_are_not_serialized() {
        let mut config = AppConfig::new();
        config.jwt_secret = "jwt-secret".to_string();
        config.admin_pass = "admin-pass".to_string();
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("jwt-secret"));
        assert!(!json.contains("admin-pass"));
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: AppConfig = serde_json::from_str(r#"{"port": 4500}"#).unwrap();
        assert_eq!(config.port, 4500);
        assert_eq!(config.uploads_dir, "uploads");
    }
}
