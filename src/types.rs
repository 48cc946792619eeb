//! Type definitions for mermaid.ink render requests

use serde::{Deserialize, Serialize};
use serde_json::ser::Formatter;
use std::io;
use std::time::Duration;

/// Base endpoint of the public rendering service
pub const DEFAULT_SERVER: &str = "https://mermaid.ink";

/// Mermaid theme selector sent inside the editor configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Default,
    Dark,
    Forest,
    Neutral,
    Base,
}

/// Editor configuration, serialized to JSON and embedded as a string
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditorConfig {
    pub theme: Theme,
}

/// The state record understood by mermaid.ink and mermaid.live.
///
/// Field order is the serialization order, which keeps tokens stable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderPayload {
    /// Raw diagram source, passed through untouched
    pub code: String,
    /// JSON text of an [`EditorConfig`]
    pub mermaid: String,
    pub auto_sync: bool,
    pub update_diagram: bool,
}

impl RenderPayload {
    pub fn new(code: &str, theme: Theme) -> Self {
        let config = EditorConfig { theme };
        Self {
            code: code.to_string(),
            // A struct holding a single unit enum always serializes
            mermaid: to_spaced_json(&config).expect("editor config serializes to JSON"),
            auto_sync: true,
            update_diagram: true,
        }
    }

    /// Parse the embedded editor configuration, if it is well-formed
    pub fn editor_config(&self) -> Option<EditorConfig> {
        serde_json::from_str(&self.mermaid).ok()
    }
}

/// Separators `", "` and `": "`, matching `json.dumps` defaults as used by the
/// existing links for the embedded editor configuration
struct SpacedFormatter;

impl Formatter for SpacedFormatter {
    fn begin_array_value<W: ?Sized + io::Write>(&mut self, writer: &mut W, first: bool) -> io::Result<()> {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W: ?Sized + io::Write>(&mut self, writer: &mut W, first: bool) -> io::Result<()> {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        writer.write_all(b": ")
    }
}

/// Serialize with [`SpacedFormatter`], e.g. `{"theme": "default"}`
fn to_spaced_json<T: Serialize>(value: &T) -> serde_json::Result<String> {
    let mut out = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut out, SpacedFormatter);
    value.serialize(&mut ser)?;
    // serde_json only ever emits valid UTF-8
    Ok(String::from_utf8_lossy(&out).into_owned())
}

/// Image type requested from the service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Svg,
    Png,
}

impl OutputFormat {
    /// Path segment selecting the service endpoint
    pub fn path_segment(self) -> &'static str {
        match self {
            OutputFormat::Svg => "svg",
            OutputFormat::Png => "img",
        }
    }

    /// Query string appended after the token, including the `?`
    pub fn query(self) -> &'static str {
        match self {
            OutputFormat::Svg => "",
            OutputFormat::Png => "?type=png",
        }
    }

    /// File extension of the written output, without the dot
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Svg => "svg",
            OutputFormat::Png => "png",
        }
    }
}

/// How often and how patiently a failed fetch is repeated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Extra attempts after the first one fails
    pub retries: u32,
    /// Fixed pause between attempts
    pub delay: Duration,
}

impl RetryPolicy {
    pub fn max_attempts(&self) -> u32 {
        self.retries.saturating_add(1)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            retries: 3,
            delay: Duration::from_secs(1),
        }
    }
}

/// Configuration for a render run
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Base endpoint, e.g. `https://mermaid.ink`. Default: [`DEFAULT_SERVER`]
    pub server: String,
    /// Theme embedded in every payload. Default: `default`
    pub theme: Theme,
    /// Requested image type. Default: SVG
    pub format: OutputFormat,
    /// Retry budget for each fetch. Default: 3 retries, 1s apart
    pub retry: RetryPolicy,
    /// Per-attempt timeout. Default: none, wait as long as the service does
    pub timeout: Option<Duration>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            server: DEFAULT_SERVER.to_string(),
            theme: Theme::Default,
            format: OutputFormat::Svg,
            retry: RetryPolicy::default(),
            timeout: None,
        }
    }
}
