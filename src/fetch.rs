//! HTTP client for the mermaid.ink rendering endpoints.
//!
//! Uses a ureq agent configured with native-tls and the platform's root
//! certificates. Each request follows redirects and treats any non-2xx
//! status as a failure; failed attempts are repeated per [`RetryPolicy`].

use std::thread;

use log::{debug, warn};
use ureq::tls::{RootCerts, TlsConfig, TlsProvider};
use ureq::Agent;

use crate::encode::encode_with;
use crate::error::{Error, Result};
use crate::types::{OutputFormat, RenderOptions, RetryPolicy, Theme};

/// Upper bound on a rendered image (16 MB)
pub const MAX_RESPONSE_SIZE: u64 = 16 * 1024 * 1024;

const USER_AGENT: &str = concat!("mermaid-ink/", env!("CARGO_PKG_VERSION"));

/// Anything that turns diagram source into image bytes
pub trait Render {
    fn render(&self, source: &str) -> Result<Vec<u8>>;

    /// Format of the bytes returned by [`Render::render`]
    fn format(&self) -> OutputFormat {
        OutputFormat::Svg
    }
}

/// Build the request URL for a token.
///
/// `https://mermaid.ink` + SVG + `pako:abc` gives `https://mermaid.ink/svg/pako:abc`.
pub fn render_url(server: &str, format: OutputFormat, token: &str) -> String {
    format!(
        "{}/{}/{}{}",
        server.trim_end_matches('/'),
        format.path_segment(),
        token,
        format.query()
    )
}

/// Blocking client for one rendering service
pub struct Client {
    agent: Agent,
    server: String,
    theme: Theme,
    format: OutputFormat,
    retry: RetryPolicy,
}

impl Client {
    pub fn new(options: &RenderOptions) -> Self {
        let tls_config = TlsConfig::builder()
            .provider(TlsProvider::NativeTls)
            .root_certs(RootCerts::PlatformVerifier)
            .build();

        let agent: Agent = Agent::config_builder()
            .tls_config(tls_config)
            .timeout_global(options.timeout)
            .http_status_as_error(true)
            .max_redirects(10)
            .build()
            .into();

        Self {
            agent,
            server: options.server.clone(),
            theme: options.theme,
            format: options.format,
            retry: options.retry,
        }
    }

    pub fn url_for(&self, token: &str) -> String {
        render_url(&self.server, self.format, token)
    }

    /// Fetch the rendered image for an encoded token.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Fetch`] once every attempt has failed, carrying the
    /// error of the last attempt.
    pub fn fetch(&self, token: &str) -> Result<Vec<u8>> {
        let url = self.url_for(token);
        let max_attempts = self.retry.max_attempts();
        debug!("GET {} ({} byte token)", url, token.len());

        let mut attempt = 1;
        loop {
            match self.get(&url) {
                Ok(bytes) => {
                    debug!("Received {} bytes on attempt {}", bytes.len(), attempt);
                    return Ok(bytes);
                }
                Err(e) if attempt < max_attempts => {
                    warn!(
                        "Attempt {}/{} failed: {}; retrying in {:?}",
                        attempt, max_attempts, e, self.retry.delay
                    );
                    thread::sleep(self.retry.delay);
                    attempt += 1;
                }
                Err(source) => {
                    return Err(Error::Fetch {
                        url,
                        attempts: attempt,
                        source,
                    });
                }
            }
        }
    }

    fn get(&self, url: &str) -> std::result::Result<Vec<u8>, ureq::Error> {
        self.agent
            .get(url)
            .header("User-Agent", USER_AGENT)
            .call()?
            .into_body()
            .with_config()
            .limit(MAX_RESPONSE_SIZE)
            .read_to_vec()
    }
}

impl Render for Client {
    fn render(&self, source: &str) -> Result<Vec<u8>> {
        self.fetch(&encode_with(source, self.theme))
    }

    fn format(&self) -> OutputFormat {
        self.format
    }
}
