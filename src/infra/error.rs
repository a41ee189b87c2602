use std::net::SocketAddr;

use thiserror::Error;

/// Failures while bringing the process up, before any request is served.
#[derive(Debug, Error)]
pub enum InfraError {
    #[error("no database configured; set `database.url` or FOLIO_DATABASE__URL")]
    MissingDatabaseUrl,
    #[error("database {stage} failed: {message}")]
    Database { stage: &'static str, message: String },
    #[error("could not bind the {listener} listener on {addr}: {source}")]
    Bind {
        listener: &'static str,
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },
    #[error("tracing subscriber could not be installed: {0}")]
    Telemetry(String),
}

impl InfraError {
    pub fn database(stage: &'static str, err: impl ToString) -> Self {
        Self::Database {
            stage,
            message: err.to_string(),
        }
    }

    pub fn bind(listener: &'static str, addr: SocketAddr, source: std::io::Error) -> Self {
        Self::Bind {
            listener,
            addr,
            source,
        }
    }

    pub fn telemetry(message: impl Into<String>) -> Self {
        Self::Telemetry(message.into())
    }
}

#[cfg(test)]
mod tests {
    use std::io::{Error, ErrorKind};

    use super::*;

    #[test]
    fn bind_failure_names_listener_and_address() {
        let addr: SocketAddr = "127.0.0.1:3001".parse().expect("addr");
        let err = InfraError::bind("admin", addr, Error::from(ErrorKind::AddrInUse));

        let message = err.to_string();
        assert!(message.contains("admin listener"));
        assert!(message.contains("127.0.0.1:3001"));
    }

    #[test]
    fn database_failure_names_stage() {
        let err = InfraError::database("migration", "relation already exists");
        assert_eq!(
            err.to_string(),
            "database migration failed: relation already exists"
        );
    }
}
