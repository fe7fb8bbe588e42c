// src/config.rs
use std::net::IpAddr;
use std::str::FromStr;

use thiserror::Error;

use crate::auth::role::Role;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} has an invalid value: {value}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageKind {
    Postgres,
    Memory,
}

impl FromStr for StorageKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "postgres" => Ok(StorageKind::Postgres),
            "memory" => Ok(StorageKind::Memory),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub storage: StorageKind,
    pub database_url: Option<String>,
    pub max_connections: u32,
    pub jwt_secret: String,
    pub host: IpAddr,
    pub port: u16,
    /// `email:role` pairs loaded into the in-memory store.
    pub seed_users: Vec<(String, Role)>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let storage = match lookup("STORAGE") {
            Some(value) => value
                .parse()
                .map_err(|_| ConfigError::Invalid { name: "STORAGE", value })?,
            None => StorageKind::Postgres,
        };

        let database_url = lookup("DATABASE_URL");
        if storage == StorageKind::Postgres && database_url.is_none() {
            return Err(ConfigError::Missing("DATABASE_URL"));
        }

        let jwt_secret = lookup("JWT_SECRET").ok_or(ConfigError::Missing("JWT_SECRET"))?;

        let host = match lookup("HOST") {
            Some(value) => value
                .parse()
                .map_err(|_| ConfigError::Invalid { name: "HOST", value })?,
            None => IpAddr::from([127, 0, 0, 1]),
        };

        let port = parse_or("PORT", lookup("PORT"), 3000)?;
        let max_connections = parse_or("DATABASE_MAX_CONNECTIONS", lookup("DATABASE_MAX_CONNECTIONS"), 5)?;

        let seed_users = match lookup("SEED_USERS") {
            Some(value) => parse_seed_users(&value)?,
            None => Vec::new(),
        };

        Ok(Self {
            storage,
            database_url,
            max_connections,
            jwt_secret,
            host,
            port,
            seed_users,
        })
    }
}

fn parse_or<T: FromStr>(name: &'static str, value: Option<String>, default: T) -> Result<T, ConfigError> {
    match value {
        Some(value) => value.parse().map_err(|_| ConfigError::Invalid { name, value }),
        None => Ok(default),
    }
}

fn parse_seed_users(value: &str) -> Result<Vec<(String, Role)>, ConfigError> {
    value
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let invalid = || ConfigError::Invalid { name: "SEED_USERS", value: entry.to_string() };
            let (email, role) = entry.rsplit_once(':').ok_or_else(invalid)?;
            let role = role.parse::<Role>().map_err(|_| invalid())?;
            Ok((email.to_string(), role))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn postgres_storage_requires_database_url() {
        let err = Config::from_lookup(lookup(&[("JWT_SECRET", "x")])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("DATABASE_URL")));
    }

    #[test]
    fn applies_defaults() {
        let config = Config::from_lookup(lookup(&[
            ("JWT_SECRET", "x"),
            ("DATABASE_URL", "postgres://localhost/store"),
        ]))
        .unwrap();

        assert_eq!(config.storage, StorageKind::Postgres);
        assert_eq!(config.port, 3000);
        assert_eq!(config.max_connections, 5);
        assert_eq!(config.host.to_string(), "127.0.0.1");
    }

    #[test]
    fn memory_storage_reads_seed_users() {
        let config = Config::from_lookup(lookup(&[
            ("JWT_SECRET", "x"),
            ("STORAGE", "memory"),
            ("SEED_USERS", "boss@store.test:admin, clerk@store.test:attendant"),
        ]))
        .unwrap();

        assert_eq!(config.storage, StorageKind::Memory);
        assert_eq!(
            config.seed_users,
            vec![
                ("boss@store.test".to_string(), Role::Admin),
                ("clerk@store.test".to_string(), Role::Attendant),
            ]
        );
    }

    #[test]
    fn rejects_bad_values() {
        let err = Config::from_lookup(lookup(&[
            ("JWT_SECRET", "x"),
            ("STORAGE", "memory"),
            ("PORT", "eighty"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: "PORT", .. }));

        let err = Config::from_lookup(lookup(&[
            ("JWT_SECRET", "x"),
            ("STORAGE", "memory"),
            ("SEED_USERS", "boss@store.test:owner"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: "SEED_USERS", .. }));
    }
}
