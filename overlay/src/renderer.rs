//! tiny-skia compositor for overlay frames

use std::collections::HashMap;
use std::path::Path;

use erfx_core::animator::RenderDescriptor;
use erfx_core::render::OverlayRenderer;
use erfx_types::{AnimationVariant, BACKGROUND_ASSET};
use tiny_skia::{Color, FilterQuality, Pixmap, PixmapPaint, Transform};

use crate::RenderError;
use crate::layout::cover_fit;
use crate::texture::load_png;

/// Composites the backdrop and the active variant's image into a
/// viewport-sized pixmap the host presents.
pub struct SkiaOverlayRenderer {
    frame: Pixmap,
    background: Option<Pixmap>,
    foregrounds: HashMap<AnimationVariant, Pixmap>,
}

impl SkiaOverlayRenderer {
    pub fn new(width: u32, height: u32) -> Result<Self, RenderError> {
        Ok(Self {
            frame: new_frame(width, height)?,
            background: None,
            foregrounds: HashMap::new(),
        })
    }

    /// Load the backdrop and every variant image from `dir`.
    ///
    /// A texture that fails to load is logged and left out; only that layer
    /// goes missing. Returns how many textures loaded.
    pub fn load_assets(&mut self, dir: &Path) -> usize {
        let mut loaded = 0;

        match load_png(&dir.join(BACKGROUND_ASSET)) {
            Ok(pixmap) => {
                self.background = Some(pixmap);
                loaded += 1;
            }
            Err(e) => tracing::error!(error = %e, "Failed to load overlay background"),
        }

        for variant in AnimationVariant::ALL {
            match load_png(&dir.join(variant.asset_file())) {
                Ok(pixmap) => {
                    self.foregrounds.insert(variant, pixmap);
                    loaded += 1;
                }
                Err(e) => tracing::error!(?variant, error = %e, "Failed to load overlay texture"),
            }
        }

        tracing::info!(dir = %dir.display(), loaded, "Overlay textures loaded");
        loaded
    }

    pub fn set_background(&mut self, pixmap: Pixmap) {
        self.background = Some(pixmap);
    }

    pub fn set_foreground(&mut self, variant: AnimationVariant, pixmap: Pixmap) {
        self.foregrounds.insert(variant, pixmap);
    }

    /// Resize the viewport; the next frame is drawn at the new size.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), RenderError> {
        if (width, height) != (self.frame.width(), self.frame.height()) {
            self.frame = new_frame(width, height)?;
        }
        Ok(())
    }

    /// The last composited frame
    pub fn pixmap(&self) -> &Pixmap {
        &self.frame
    }

    fn draw_layer(frame: &mut Pixmap, texture: &Pixmap, opacity: f32, scale: f32) {
        let viewport = (frame.width() as f32, frame.height() as f32);
        let place = cover_fit(viewport, (texture.width(), texture.height()), scale);
        let transform = Transform::from_row(
            place.scale_x(texture.width()),
            0.0,
            0.0,
            place.scale_y(texture.height()),
            place.x,
            place.y,
        );
        let paint = PixmapPaint {
            opacity,
            quality: FilterQuality::Bilinear,
            ..PixmapPaint::default()
        };
        frame.draw_pixmap(0, 0, texture.as_ref(), &paint, transform, None);
    }
}

impl OverlayRenderer for SkiaOverlayRenderer {
    fn render(&mut self, frame: Option<&RenderDescriptor>) {
        self.frame.fill(Color::TRANSPARENT);

        let Some(desc) = frame else {
            return;
        };
        let opacity = desc.opacity.clamp(0.0, 1.0);
        if opacity <= 0.0 {
            return;
        }

        if let Some(background) = &self.background {
            Self::draw_layer(&mut self.frame, background, opacity, 1.0);
        }
        match self.foregrounds.get(&desc.variant) {
            Some(texture) => Self::draw_layer(&mut self.frame, texture, opacity, desc.scale),
            None => tracing::trace!(variant = ?desc.variant, "No texture for variant"),
        }
    }
}

fn new_frame(width: u32, height: u32) -> Result<Pixmap, RenderError> {
    Pixmap::new(width, height).ok_or(RenderError::BadDimensions { width, height })
}

#[cfg(test)]
mod tests {
    use erfx_core::animator::AnimationPhase;

    use super::*;

    fn solid(width: u32, height: u32, color: Color) -> Pixmap {
        let mut pixmap = Pixmap::new(width, height).unwrap();
        pixmap.fill(color);
        pixmap
    }

    fn descriptor(variant: AnimationVariant, opacity: f32, scale: f32) -> RenderDescriptor {
        RenderDescriptor {
            variant,
            phase: AnimationPhase::Hold,
            opacity,
            scale,
        }
    }

    fn centre(renderer: &SkiaOverlayRenderer) -> tiny_skia::PremultipliedColorU8 {
        let frame = renderer.pixmap();
        frame.pixel(frame.width() / 2, frame.height() / 2).unwrap()
    }

    #[test]
    fn idle_frame_is_transparent() {
        let mut renderer = SkiaOverlayRenderer::new(32, 18).unwrap();
        renderer.set_background(solid(4, 4, Color::WHITE));
        renderer.render(None);
        assert!(renderer.pixmap().pixels().iter().all(|px| px.alpha() == 0));
    }

    #[test]
    fn background_blends_at_opacity() {
        let mut renderer = SkiaOverlayRenderer::new(32, 18).unwrap();
        renderer.set_background(solid(4, 4, Color::WHITE));
        renderer.render(Some(&descriptor(AnimationVariant::Death, 0.5, 1.0)));

        let px = centre(&renderer);
        assert!((126..=129).contains(&px.alpha()), "alpha {}", px.alpha());
    }

    #[test]
    fn foreground_covers_background() {
        let mut renderer = SkiaOverlayRenderer::new(32, 18).unwrap();
        renderer.set_background(solid(4, 4, Color::BLACK));
        renderer.set_foreground(AnimationVariant::CraftFailed, solid(8, 8, Color::from_rgba8(255, 0, 0, 255)));
        renderer.render(Some(&descriptor(AnimationVariant::CraftFailed, 1.0, 1.0)));

        let px = centre(&renderer);
        assert_eq!((px.red(), px.green(), px.alpha()), (255, 0, 255));
    }

    #[test]
    fn next_idle_frame_clears_previous() {
        let mut renderer = SkiaOverlayRenderer::new(16, 16).unwrap();
        renderer.set_background(solid(2, 2, Color::WHITE));
        renderer.render(Some(&descriptor(AnimationVariant::Death, 1.0, 1.0)));
        assert_eq!(centre(&renderer).alpha(), 255);

        renderer.render(None);
        assert_eq!(centre(&renderer).alpha(), 0);
    }

    #[test]
    fn missing_assets_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let mut renderer = SkiaOverlayRenderer::new(16, 16).unwrap();
        assert_eq!(renderer.load_assets(dir.path()), 0);

        renderer.render(Some(&descriptor(AnimationVariant::EnemyFelled, 1.0, 1.0)));
        assert_eq!(centre(&renderer).alpha(), 0);
    }

    #[test]
    fn zero_size_viewport_is_rejected() {
        assert!(matches!(
            SkiaOverlayRenderer::new(0, 10),
            Err(RenderError::BadDimensions { .. })
        ));
        let mut renderer = SkiaOverlayRenderer::new(4, 4).unwrap();
        renderer.resize(8, 6).unwrap();
        assert_eq!((renderer.pixmap().width(), renderer.pixmap().height()), (8, 6));
    }
}
