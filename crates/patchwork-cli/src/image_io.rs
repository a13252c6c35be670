//! PNG decoding into [`RgbaBitmap`] and encoding back out.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use anyhow::{Context, bail};
use patchwork_types::bitmap::{Bitmap, RgbaBitmap};

/// Decode a PNG file to 8-bit RGBA.
pub fn load_png(path: &Path) -> anyhow::Result<RgbaBitmap> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let mut decoder = png::Decoder::new(BufReader::new(file));
    // Palette, low-bit grayscale and tRNS expand to full samples; 16-bit drops to 8.
    decoder.set_transformations(png::Transformations::EXPAND | png::Transformations::STRIP_16);
    let mut reader = decoder
        .read_info()
        .with_context(|| format!("reading PNG header of {}", path.display()))?;
    let mut buf = vec![0u8; reader.output_buffer_size()];
    let info = reader
        .next_frame(&mut buf)
        .with_context(|| format!("decoding {}", path.display()))?;
    buf.truncate(info.buffer_size());
    let rgba = to_rgba(&buf, info.color_type)?;
    let bitmap = RgbaBitmap::from_rgba(info.width, info.height, rgba)?;
    log::debug!("Decoded {} ({}x{})", path.display(), info.width, info.height);
    Ok(bitmap)
}

/// Write a bitmap as an 8-bit RGBA PNG.
pub fn save_png(path: &Path, bitmap: &RgbaBitmap) -> anyhow::Result<()> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut encoder = png::Encoder::new(BufWriter::new(file), bitmap.width(), bitmap.height());
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header()?;
    writer.write_image_data(bitmap.as_bytes())?;
    writer.finish()?;
    Ok(())
}

/// Widen decoded 8-bit samples to RGBA.
fn to_rgba(buf: &[u8], color: png::ColorType) -> anyhow::Result<Vec<u8>> {
    let out = match color {
        png::ColorType::Rgba => buf.to_vec(),
        png::ColorType::Rgb => buf
            .chunks_exact(3)
            .flat_map(|p| [p[0], p[1], p[2], 255])
            .collect(),
        png::ColorType::GrayscaleAlpha => buf
            .chunks_exact(2)
            .flat_map(|p| [p[0], p[0], p[0], p[1]])
            .collect(),
        png::ColorType::Grayscale => buf.iter().flat_map(|&g| [g, g, g, 255]).collect(),
        png::ColorType::Indexed => bail!("indexed PNG was not expanded"),
    };
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use patchwork_types::color::Color;

    #[test]
    fn saved_png_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("marker.png");
        let mut bmp = RgbaBitmap::new(5, 4, Color::TRANSPARENT);
        bmp.set_pixel(2, 0, Color::BLACK);
        bmp.set_pixel(1, 1, Color::rgba(10, 20, 30, 40));
        save_png(&path, &bmp).unwrap();

        let loaded = load_png(&path).unwrap();
        assert_eq!(loaded.size(), bmp.size());
        assert_eq!(loaded.pixel(2, 0), Color::BLACK);
        assert_eq!(loaded.pixel(1, 1), Color::rgba(10, 20, 30, 40));
        assert_eq!(loaded.pixel(0, 0), Color::TRANSPARENT);
    }

    #[test]
    fn gray_alpha_widens() {
        let rgba = to_rgba(&[0, 255, 200, 0], png::ColorType::GrayscaleAlpha).unwrap();
        assert_eq!(rgba, vec![0, 0, 0, 255, 200, 200, 200, 0]);
    }

    #[test]
    fn rgb_gets_opaque_alpha() {
        let rgba = to_rgba(&[1, 2, 3], png::ColorType::Rgb).unwrap();
        assert_eq!(rgba, vec![1, 2, 3, 255]);
    }

    #[test]
    fn missing_file_reports_path() {
        let err = load_png(Path::new("/nonexistent/nine.png")).unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent/nine.png"));
    }
}
