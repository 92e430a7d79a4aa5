//! External HTML-to-image renderer.

mod wkhtml;

use std::path::Path;

pub use wkhtml::WkHtml;

use crate::prelude::*;

/// Turns a document plus side-channel values into image bytes.
///
/// Injected values are opaque strings. The engine is responsible for any
/// escaping its transport needs.
#[async_trait]
pub trait RenderEngine: Send + Sync {
  async fn render(
    &self,
    document: &Path,
    injections: &[(&str, String)],
  ) -> Result<Vec<u8>>;
}
