//! PNG texture loading

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use png::{ColorType, Transformations};
use tiny_skia::{ColorU8, IntSize, Pixmap};

use crate::RenderError;

/// Decode a PNG file into a premultiplied pixmap.
pub fn load_png(path: &Path) -> Result<Pixmap, RenderError> {
    let file = File::open(path).map_err(|source| RenderError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    decode_png(BufReader::new(file))
}

/// Decode PNG bytes into a premultiplied pixmap.
///
/// Palette and low bit-depth images are expanded to 8-bit channels first.
pub fn decode_png(reader: impl Read) -> Result<Pixmap, RenderError> {
    let mut decoder = png::Decoder::new(reader);
    decoder.set_transformations(Transformations::normalize_to_color8());
    let mut reader = decoder.read_info()?;

    let mut buf = vec![0; reader.output_buffer_size()];
    let info = reader.next_frame(&mut buf)?;
    let data = &buf[..info.buffer_size()];

    let rgba = to_rgba(data, info.color_type)?;
    let size = IntSize::from_wh(info.width, info.height).ok_or(RenderError::BadDimensions {
        width: info.width,
        height: info.height,
    })?;

    let premultiplied = premultiply(&rgba);
    Pixmap::from_vec(premultiplied, size).ok_or(RenderError::BadDimensions {
        width: info.width,
        height: info.height,
    })
}

fn to_rgba(data: &[u8], color_type: ColorType) -> Result<Vec<u8>, RenderError> {
    let rgba = match color_type {
        ColorType::Rgba => data.to_vec(),
        ColorType::Rgb => data
            .chunks_exact(3)
            .flat_map(|px| [px[0], px[1], px[2], 255])
            .collect(),
        ColorType::GrayscaleAlpha => data
            .chunks_exact(2)
            .flat_map(|px| [px[0], px[0], px[0], px[1]])
            .collect(),
        ColorType::Grayscale => data.iter().flat_map(|&g| [g, g, g, 255]).collect(),
        ColorType::Indexed => return Err(RenderError::UnsupportedColor(color_type)),
    };
    Ok(rgba)
}

/// Straight RGBA8 to tiny-skia's premultiplied layout.
fn premultiply(rgba: &[u8]) -> Vec<u8> {
    rgba.chunks_exact(4)
        .flat_map(|px| {
            let c = ColorU8::from_rgba(px[0], px[1], px[2], px[3]).premultiply();
            [c.red(), c.green(), c.blue(), c.alpha()]
        })
        .collect()
}
