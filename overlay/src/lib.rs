//! Software overlay compositing
//!
//! Draws [`RenderDescriptor`](erfx_core::animator::RenderDescriptor) frames
//! with tiny-skia. The host owns the window and presents
//! [`SkiaOverlayRenderer::pixmap`] however its platform requires.

pub mod layout;
mod renderer;
pub mod texture;

pub use renderer::SkiaOverlayRenderer;

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("failed to read texture {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode png: {0}")]
    Decode(#[from] png::DecodingError),

    #[error("unsupported png color type {0:?}")]
    UnsupportedColor(png::ColorType),

    #[error("invalid pixmap size {width}x{height}")]
    BadDimensions { width: u32, height: u32 },
}
