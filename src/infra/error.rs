use std::{io, net::SocketAddr};

use thiserror::Error;

/// Process-level failures: sockets, stdout, the store client, tracing.
#[derive(Debug, Error)]
pub enum InfraError {
    #[error("failed to bind {addr}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },
    #[error("failed to write output")]
    Output(#[source] io::Error),
    #[error("failed to build document store client")]
    HttpClient(#[from] reqwest::Error),
    #[error("failed to install tracing subscriber: {0}")]
    Telemetry(String),
}
