//! QR encoding at error-correction level H, drawn either as terminal text or
//! as an in-memory PNG.

use crate::config::RenderOptions;
use crate::utils::error::{QrBatchError, Result};
use image::{ImageBuffer, ImageFormat, Luma};
use qrcode::{Color, EcLevel, QrCode};
use std::io::Cursor;

pub const ERROR_CORRECTION: EcLevel = EcLevel::H;

/// Module matrix of an encoded QR code.
pub struct QrMatrix {
    width: usize,
    modules: Vec<Color>,
}

impl QrMatrix {
    pub fn encode(content: &str) -> Result<Self> {
        let code = QrCode::with_error_correction_level(content.as_bytes(), ERROR_CORRECTION)
            .map_err(|e| QrBatchError::EncodeError {
                message: e.to_string(),
            })?;

        Ok(Self {
            width: code.width(),
            modules: code.to_colors(),
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Out-of-range coordinates are light, which yields the quiet zone.
    pub fn is_dark(&self, x: i64, y: i64) -> bool {
        let w = self.width as i64;
        if x < 0 || y < 0 || x >= w || y >= w {
            return false;
        }
        self.modules[(y * w + x) as usize] == Color::Dark
    }

    pub fn to_terminal(&self, border: u32) -> String {
        let border = border as i64;
        let w = self.width as i64;
        let mut out = String::new();
        for y in -border..w + border {
            for x in -border..w + border {
                out.push_str(if self.is_dark(x, y) { "██" } else { "  " });
            }
            out.push('\n');
        }
        out
    }

    pub fn to_image(&self, options: RenderOptions) -> ImageBuffer<Luma<u8>, Vec<u8>> {
        let scale = options.scale.max(1);
        let border = options.border as i64;
        let size = (self.width as u32 + 2 * options.border) * scale;

        ImageBuffer::from_fn(size, size, |px, py| {
            let x = (px / scale) as i64 - border;
            let y = (py / scale) as i64 - border;
            if self.is_dark(x, y) {
                Luma([0u8])
            } else {
                Luma([255u8])
            }
        })
    }

    pub fn to_png(&self, options: RenderOptions) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();
        self.to_image(options)
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
        Ok(bytes)
    }
}

pub fn render_terminal(content: &str, options: RenderOptions) -> Result<String> {
    Ok(QrMatrix::encode(content)?.to_terminal(options.border))
}

pub fn render_png(content: &str, options: RenderOptions) -> Result<Vec<u8>> {
    QrMatrix::encode(content)?.to_png(options)
}
