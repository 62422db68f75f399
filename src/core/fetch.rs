//! Blocking HTTP fetching.

use crate::error::{GoupError, Result};
use reqwest::blocking::Client;
use std::io::Read;
use std::time::Duration;
use url::Url;

/// Bound on the listing page round trip and on connecting for any request.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Source of remote byte streams.
pub trait Fetcher {
    /// Issues a GET for `url`. `timeout` bounds the whole exchange, body
    /// included; `None` leaves the body read unbounded.
    ///
    /// The returned stream is closed when dropped.
    fn get(&self, url: &Url, timeout: Option<Duration>) -> Result<Box<dyn Read>>;
}

#[derive(Debug)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("goup/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(REQUEST_TIMEOUT)
            .timeout(None::<Duration>)
            .build()
            .map_err(|e| GoupError::network("<client>", e))?;

        Ok(Self { client })
    }
}

impl Fetcher for HttpFetcher {
    fn get(&self, url: &Url, timeout: Option<Duration>) -> Result<Box<dyn Read>> {
        log::debug!("GET {url} (timeout: {timeout:?})");

        let mut request = self.client.get(url.clone());
        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }

        let response = request
            .send()
            .map_err(|e| GoupError::network(url.as_str(), e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(GoupError::network(
                url.as_str(),
                format!("server responded with status {status}"),
            ));
        }

        if let Some(length) = response.content_length() {
            log::debug!("{url}: {length} bytes");
        }

        Ok(Box::new(response))
    }
}

/// Reads a fetched page into a string for parsing.
pub fn read_document(url: &Url, mut body: impl Read) -> Result<String> {
    let mut bytes = Vec::new();
    body.read_to_end(&mut bytes)
        .map_err(|e| GoupError::network(url.as_str(), e))?;

    String::from_utf8(bytes)
        .map_err(|e| GoupError::parse_error(format!("{url} is not valid UTF-8: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    struct FailingReader;

    impl Read for FailingReader {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::ConnectionReset, "reset"))
        }
    }

    fn page() -> Url {
        Url::parse("https://go.dev/dl/").unwrap()
    }

    #[test]
    fn test_read_document() {
        let html = read_document(&page(), "<html></html>".as_bytes()).unwrap();
        assert_eq!(html, "<html></html>");
    }

    #[test]
    fn test_read_document_invalid_utf8() {
        let err = read_document(&page(), &[0xff, 0xfe, 0x00][..]).unwrap_err();
        assert!(matches!(err, GoupError::Parse { .. }));
    }

    #[test]
    fn test_read_document_transport_error() {
        let err = read_document(&page(), FailingReader).unwrap_err();
        assert!(matches!(err, GoupError::Network { .. }));
    }

    #[test]
    fn test_unreachable_host_is_network_error() {
        let fetcher = HttpFetcher::new().unwrap();
        // Port 9 on localhost (discard) is not expected to accept HTTP.
        let url = Url::parse("http://127.0.0.1:9/dl/").unwrap();
        let err = fetcher.get(&url, Some(REQUEST_TIMEOUT)).err().unwrap();
        assert!(matches!(err, GoupError::Network { .. }));
    }
}
