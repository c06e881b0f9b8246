//! Placement math for full-viewport layers

/// Axis-aligned placement of a texture inside the viewport, in pixels.
///
/// `x`/`y` may be negative when the texture overflows the viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Placement {
    /// Horizontal scale relative to a texture of `tex_width` pixels
    pub fn scale_x(&self, tex_width: u32) -> f32 {
        self.width / tex_width as f32
    }

    /// Vertical scale relative to a texture of `tex_height` pixels
    pub fn scale_y(&self, tex_height: u32) -> f32 {
        self.height / tex_height as f32
    }
}

/// Cover-fit a texture to the viewport, scale it, and centre it.
///
/// The texture first matches the viewport width; if that leaves it shorter
/// than the viewport it matches the height instead. Aspect ratio is kept, so
/// one axis may overflow. `scale` then grows or shrinks it around the centre.
pub fn cover_fit(viewport: (f32, f32), texture: (u32, u32), scale: f32) -> Placement {
    let (vp_w, vp_h) = viewport;
    let (tex_w, tex_h) = (texture.0.max(1) as f32, texture.1.max(1) as f32);

    let mut width = vp_w;
    let mut height = tex_h / tex_w * width;
    if height < vp_h {
        height = vp_h;
        width = tex_w / tex_h * height;
    }

    let width = width * scale;
    let height = height * scale;

    Placement {
        x: -(width - vp_w) / 2.0,
        y: -(height - vp_h) / 2.0,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn same_aspect_fills_exactly() {
        let p = cover_fit((1920.0, 1080.0), (1280, 720), 1.0);
        assert!(approx(p.width, 1920.0));
        assert!(approx(p.height, 1080.0));
        assert!(approx(p.x, 0.0));
        assert!(approx(p.y, 0.0));
    }

    #[test]
    fn wide_texture_overflows_horizontally() {
        // 4:1 texture on a 16:9 viewport: height-limited
        let p = cover_fit((1600.0, 900.0), (400, 100), 1.0);
        assert!(approx(p.height, 900.0));
        assert!(approx(p.width, 3600.0));
        assert!(approx(p.x, -1000.0));
        assert!(approx(p.y, 0.0));
    }

    #[test]
    fn tall_texture_overflows_vertically() {
        let p = cover_fit((1000.0, 500.0), (100, 100), 1.0);
        assert!(approx(p.width, 1000.0));
        assert!(approx(p.height, 1000.0));
        assert!(approx(p.y, -250.0));
    }

    #[test]
    fn scale_grows_around_centre() {
        let p = cover_fit((1000.0, 1000.0), (100, 100), 1.05);
        assert!(approx(p.width, 1050.0));
        assert!(approx(p.x, -25.0));
        assert!(approx(p.y, -25.0));

        let p = cover_fit((1000.0, 1000.0), (100, 100), 0.95);
        assert!(approx(p.x, 25.0));
        assert!(approx(p.scale_x(100), 9.5));
    }
}
