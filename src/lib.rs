//! mermaid-ink - Render Mermaid diagram files through the mermaid.ink service
//!
//! Layout and rendering happen remotely. This crate only packs diagram source
//! into the `pako:` token format the service understands, fetches the image,
//! and writes it next to the source file.
//!
//! # Example
//!
//! ```rust
//! use mermaid_ink::{decode, encode, render_url, OutputFormat};
//!
//! let token = encode("graph LR\n  A --> B");
//! assert_eq!(decode(&token).unwrap().code, "graph LR\n  A --> B");
//!
//! let url = render_url("https://mermaid.ink", OutputFormat::Svg, &token);
//! assert!(url.starts_with("https://mermaid.ink/svg/pako:"));
//! ```

pub mod batch;
pub mod encode;
pub mod error;
pub mod fetch;
pub mod types;

pub use encode::{decode, encode, encode_with, TOKEN_PREFIX};
pub use error::{Error, Result};
pub use fetch::{render_url, Client, Render};
pub use types::*;

/// Render every `.mmd` file in `dir` with the given options.
///
/// Returns the paths of the written images in processing order.
pub fn render_dir(dir: &std::path::Path, options: &RenderOptions) -> Result<Vec<std::path::PathBuf>> {
    let client = Client::new(options);
    batch::run(dir, &client)
}
