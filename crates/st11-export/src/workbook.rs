//! Spreadsheet export: one styled worksheet with an embedded thumbnail per
//! row.
//!
//! Thumbnails on disk arrive in whatever format the CDN served (PNG, WebP,
//! GIF, JPEG), sometimes with transparency. Each is flattened onto a white
//! background, forced to RGB, and re-encoded as JPEG — entirely in memory,
//! embedded straight from the buffer, so there are no temporary files to
//! clean up (or leak) at any point.
//!
//! A row whose image cannot be read or decoded is rendered without an
//! image and the export continues; only spreadsheet-level write errors
//! abort the export.

use std::io::Cursor;
use std::path::Path;

use image::codecs::jpeg::JpegEncoder;
use rust_xlsxwriter::{Format, FormatAlign, Image, Workbook};

use st11_core::Product;

use crate::error::ExportError;

/// Column layout: No. / Image / Name / Price / Thumbnail URL / Local Path.
const HEADERS: [&str; 6] = ["No.", "Image", "Name", "Price", "Thumbnail URL", "Local Path"];
const COLUMN_WIDTHS: [f64; 6] = [8.0, 20.0, 50.0, 15.0, 60.0, 60.0];

/// Display size of an embedded thumbnail, in pixels.
const IMAGE_DISPLAY_PX: u32 = 100;
/// Row height (points) for rows carrying an embedded image.
const ROW_HEIGHT_WITH_IMAGE: f64 = 75.0;
/// Row height (points) for rows without one.
const ROW_HEIGHT_PLAIN: f64 = 30.0;
/// JPEG re-encode quality.
const JPEG_QUALITY: u8 = 95;

/// What an export run produced, for the operator's summary line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportSummary {
    /// Data rows written (excluding the header).
    pub rows: usize,
    /// Rows that carry an embedded thumbnail.
    pub embedded: usize,
    /// Rows rendered without an image (no local file, or codec failure).
    pub without_image: usize,
}

/// Writes `products` to a styled `.xlsx` workbook at `path`, preserving
/// list order.
///
/// # Errors
///
/// Returns [`ExportError::Xlsx`] if the workbook cannot be written.
/// Per-row image failures degrade that row to the no-image rendering and
/// are counted in [`ExportSummary::without_image`], not raised.
pub fn export_products(products: &[Product], path: &Path) -> Result<ExportSummary, ExportError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name("Products")?;

    let header_format = Format::new()
        .set_bold()
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter);
    let index_format = Format::new()
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter);
    let name_format = Format::new()
        .set_text_wrap()
        .set_align(FormatAlign::VerticalCenter);
    let price_format = Format::new()
        .set_align(FormatAlign::Right)
        .set_align(FormatAlign::VerticalCenter);

    for (col, label) in HEADERS.iter().enumerate() {
        let col = u16::try_from(col).unwrap_or(u16::MAX);
        worksheet.write_string_with_format(0, col, *label, &header_format)?;
    }
    for (col, width) in COLUMN_WIDTHS.iter().enumerate() {
        let col = u16::try_from(col).unwrap_or(u16::MAX);
        worksheet.set_column_width(col, *width)?;
    }

    let mut embedded = 0usize;
    let mut without_image = 0usize;

    for (idx, product) in products.iter().enumerate() {
        let row = u32::try_from(idx).unwrap_or(u32::MAX - 1) + 1;

        #[allow(clippy::cast_precision_loss)] // row counts stay far below 2^52
        worksheet.write_number_with_format(row, 0, (idx + 1) as f64, &index_format)?;
        worksheet.write_string_with_format(row, 2, &product.name, &name_format)?;
        worksheet.write_string_with_format(row, 3, &product.price, &price_format)?;
        worksheet.write_string(row, 4, &product.thumbnail)?;
        worksheet.write_string(row, 5, product.local_thumbnail_path().unwrap_or_default())?;

        match product.local_thumbnail_path() {
            Some(local_path) => match row_image(Path::new(local_path)) {
                Ok(image) => {
                    worksheet.insert_image(row, 1, &image)?;
                    worksheet.set_row_height(row, ROW_HEIGHT_WITH_IMAGE)?;
                    embedded += 1;
                }
                Err(e) => {
                    tracing::warn!(row, path = local_path, error = %e, "image embed failed; row rendered without image");
                    worksheet.set_row_height(row, ROW_HEIGHT_PLAIN)?;
                    without_image += 1;
                }
            },
            None => {
                tracing::debug!(row, "no local image for row");
                worksheet.set_row_height(row, ROW_HEIGHT_PLAIN)?;
                without_image += 1;
            }
        }
    }

    workbook.save(path)?;
    tracing::info!(
        path = %path.display(),
        rows = products.len(),
        embedded,
        without_image,
        "workbook saved"
    );

    Ok(ExportSummary {
        rows: products.len(),
        embedded,
        without_image,
    })
}

/// Reads one downloaded thumbnail and prepares it for embedding.
fn row_image(path: &Path) -> Result<Image, ExportError> {
    let bytes = std::fs::read(path)?;
    let jpeg = reencode_as_rgb_jpeg(&bytes)?;
    let image = Image::new_from_buffer(&jpeg)?.set_scale_to_size(
        IMAGE_DISPLAY_PX,
        IMAGE_DISPLAY_PX,
        false,
    );
    Ok(image)
}

/// Decodes arbitrary image bytes, flattens any transparency onto a white
/// background, forces RGB, and re-encodes as JPEG at [`JPEG_QUALITY`].
fn reencode_as_rgb_jpeg(bytes: &[u8]) -> Result<Vec<u8>, ExportError> {
    let decoded = image::load_from_memory(bytes)?;
    let rgba = decoded.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut canvas = image::RgbImage::from_pixel(width, height, image::Rgb([255, 255, 255]));
    for (x, y, pixel) in rgba.enumerate_pixels() {
        let alpha = u32::from(pixel[3]);
        #[allow(clippy::cast_possible_truncation)] // result of the blend is <= 255
        let blend =
            |fg: u8| -> u8 { ((u32::from(fg) * alpha + 255 * (255 - alpha)) / 255) as u8 };
        canvas.put_pixel(
            x,
            y,
            image::Rgb([blend(pixel[0]), blend(pixel[1]), blend(pixel[2])]),
        );
    }

    let mut jpeg = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(Cursor::new(&mut jpeg), JPEG_QUALITY);
    encoder.encode_image(&canvas)?;
    Ok(jpeg)
}

#[cfg(test)]
#[path = "workbook_test.rs"]
mod tests;
