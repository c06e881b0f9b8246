//! Renderer seam between the animator and a drawing backend.

use crate::animator::RenderDescriptor;

/// Draws one overlay frame.
///
/// Called once per frame; `None` means nothing is animating and the
/// renderer must leave the frame untouched or cleared.
pub trait OverlayRenderer {
    fn render(&mut self, frame: Option<&RenderDescriptor>);
}

/// Renderer that only remembers the last descriptor it was handed.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct RecordingRenderer {
    pub last: Option<RenderDescriptor>,
    pub frames: usize,
}

#[cfg(test)]
impl OverlayRenderer for RecordingRenderer {
    fn render(&mut self, frame: Option<&RenderDescriptor>) {
        self.frames += 1;
        self.last = frame.copied();
    }
}
