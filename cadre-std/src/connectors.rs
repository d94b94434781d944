//! Transport connectors.
//!
//! [`TcpConnector`] establishes the opaque connection the pool hands to
//! protocol-specific collaborators: a plain TCP stream, or a TLS stream
//! when the server profile asks for it. Authentication happens at the
//! protocol layer that consumes the handle, so the credentials passed to
//! [`Connector::connect`] are not used during establishment here.

use cadre_core::{BoxError, ConnectionHandle, Connector, Credentials, ServerProfile};
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tokio_rustls::TlsConnector;
use tokio_rustls::client::TlsStream;
use tokio_rustls::rustls;

/// Opens plain TCP or TLS connections per the server profile.
#[derive(Clone)]
pub struct TcpConnector {
    tls_config: Arc<rustls::ClientConfig>,
}

impl TcpConnector {
    /// Create a connector trusting the bundled webpki roots.
    pub fn new() -> Self {
        let mut roots = rustls::RootCertStore::empty();
        roots.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());
        let tls_config = rustls::ClientConfig::builder()
            .with_root_certificates(roots)
            .with_no_client_auth();
        Self {
            tls_config: Arc::new(tls_config),
        }
    }

    /// Create a connector with a caller-supplied TLS configuration.
    pub fn with_tls_config(tls_config: Arc<rustls::ClientConfig>) -> Self {
        Self { tls_config }
    }
}

impl Default for TcpConnector {
    fn default() -> Self {
        Self::new()
    }
}

enum Stream {
    Plain(TcpStream),
    Tls(Box<TlsStream<TcpStream>>),
}

/// A live TCP or TLS connection with a local byte cache.
pub struct TcpHandle {
    stream: Mutex<Option<Stream>>,
    cache: Mutex<Vec<u8>>,
}

impl TcpHandle {
    /// Snapshot of the connection-local cache.
    pub async fn cache(&self) -> Vec<u8> {
        self.cache.lock().await.clone()
    }

    /// Whether the connection is still open.
    pub async fn is_open(&self) -> bool {
        self.stream.lock().await.is_some()
    }
}

impl ConnectionHandle for TcpHandle {
    async fn close(&self) {
        // Taking the stream makes a second close a no-op.
        if let Some(stream) = self.stream.lock().await.take() {
            match stream {
                Stream::Plain(mut tcp) => {
                    let _ = tcp.shutdown().await;
                }
                Stream::Tls(mut tls) => {
                    let _ = tls.shutdown().await;
                }
            }
        }
    }
}

impl Connector for TcpConnector {
    type Handle = TcpHandle;

    async fn connect(
        &self,
        profile: &ServerProfile,
        _credentials: &Credentials,
        cache: Option<&[u8]>,
    ) -> Result<TcpHandle, BoxError> {
        tracing::debug!(
            server = %profile.server,
            port = profile.port,
            tls = profile.tls,
            "opening connection"
        );
        let tcp = TcpStream::connect((profile.server.as_str(), profile.port)).await?;
        let stream = if profile.tls {
            let name = rustls::pki_types::ServerName::try_from(profile.server.clone())?;
            let connector = TlsConnector::from(Arc::clone(&self.tls_config));
            Stream::Tls(Box::new(connector.connect(name, tcp).await?))
        } else {
            Stream::Plain(tcp)
        };
        Ok(TcpHandle {
            stream: Mutex::new(Some(stream)),
            cache: Mutex::new(cache.map(<[u8]>::to_vec).unwrap_or_default()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn connects_and_closes_plain_tcp() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let accept = tokio::spawn(async move { listener.accept().await.unwrap() });

        let connector = TcpConnector::new();
        let profile = ServerProfile::new(addr.ip().to_string(), addr.port(), false);
        let handle = connector
            .connect(&profile, &Credentials::new("u", "p"), Some(b"seed"))
            .await
            .unwrap();
        accept.await.unwrap();

        assert!(handle.is_open().await);
        assert_eq!(handle.cache().await, b"seed");
        handle.close().await;
        assert!(!handle.is_open().await);
        // idempotent
        handle.close().await;
    }

    #[tokio::test]
    async fn refused_connection_is_an_error() {
        let connector = TcpConnector::new();
        // Bind then drop to get a port nothing is listening on.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let profile = ServerProfile::new(addr.ip().to_string(), addr.port(), false);
        let result = connector
            .connect(&profile, &Credentials::new("u", "p"), None)
            .await;
        assert!(result.is_err());
    }
}
