//! Address publishing: the connection URI and its scannable QR image.
//!
//! The phone learns where to connect by scanning a QR code shown in a browser
//! on the desktop.  The functions here are pure transformations (no sockets,
//! no filesystem) so the HTTP path in the infrastructure layer can call them
//! per request and unit tests can call them directly:
//!
//! ```text
//! outbound_local_ip()  →  connection_uri()  →  render_connection_qr()  →  PNG bytes
//!  (infrastructure)         "ws://…:3000"          image/png body
//! ```
//!
//! # Rendering
//!
//! `qrcode` produces the module grid (error correction level M, its default);
//! the grid is rasterized by hand into a grayscale `image` buffer at a fixed
//! scale with a quiet zone, then PNG-encoded in memory.  Phone cameras need
//! the quiet zone; a QR code flush against the image border scans poorly.

use std::io::Cursor;
use std::net::IpAddr;

use image::{DynamicImage, GrayImage, ImageOutputFormat, Luma};
use qrcode::{Color, QrCode};
use thiserror::Error;

/// Pixels per QR module in the rendered image.
const MODULE_SCALE: u32 = 8;

/// Quiet-zone width on each side, in modules.  Four is the minimum the QR
/// standard asks readers to expect.
const QUIET_MODULES: u32 = 4;

/// Errors that can occur while producing the connection image.
///
/// These propagate through the HTTP layer's generic error path (a plain 500);
/// the server itself keeps running.
#[derive(Debug, Error)]
pub enum PublishError {
    /// The URI could not be encoded as a QR code (never expected for the
    /// short `ws://` URIs produced here, but the encoder is fallible).
    #[error("QR encoding failed: {0}")]
    Encode(#[from] qrcode::types::QrError),

    /// The rendered grid could not be PNG-encoded.
    #[error("PNG encoding failed: {0}")]
    Image(#[from] image::ImageError),
}

/// Formats the URI the phone should open a WebSocket to.
pub fn connection_uri(ip: IpAddr, port: u16) -> String {
    format!("ws://{ip}:{port}")
}

/// Encodes `uri` as a QR code and returns it as PNG bytes.
///
/// # Errors
///
/// Returns [`PublishError`] if QR or PNG encoding fails.
pub fn render_connection_qr(uri: &str) -> Result<Vec<u8>, PublishError> {
    let code = QrCode::new(uri.as_bytes())?;
    let width = code.width();
    let modules = code.to_colors();

    // White canvas covering the grid plus the quiet zone on all sides.
    let side = (width as u32 + 2 * QUIET_MODULES) * MODULE_SCALE;
    let mut img = GrayImage::from_pixel(side, side, Luma([255u8]));

    // Stamp each dark module as a MODULE_SCALE × MODULE_SCALE black square.
    for y in 0..width {
        for x in 0..width {
            if modules[y * width + x] == Color::Dark {
                let px = (x as u32 + QUIET_MODULES) * MODULE_SCALE;
                let py = (y as u32 + QUIET_MODULES) * MODULE_SCALE;
                for dy in 0..MODULE_SCALE {
                    for dx in 0..MODULE_SCALE {
                        img.put_pixel(px + dx, py + dy, Luma([0u8]));
                    }
                }
            }
        }
    }

    let mut png = Vec::new();
    DynamicImage::ImageLuma8(img).write_to(&mut Cursor::new(&mut png), ImageOutputFormat::Png)?;
    Ok(png)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
