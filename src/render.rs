use crate::cell::{CellSnapshot, col_to_letter};
use crate::error::{GridError, Result};
use crate::font::{self, GlyphCache};
use crate::spreadsheet::GridSnapshot;
use crate::widths::AVG_GLYPH_WIDTH;
use fontdue::Font;
use image::ImageEncoder;
use image::codecs::png::PngEncoder;
use log::debug;
use plotters::prelude::*;

/// Height of the header row and of every data row.
pub const ROW_HEIGHT: u32 = 28;
/// Width of the row-number band on the left edge.
pub const ROW_LABEL_WIDTH: u32 = 40;
/// Left padding of cell text.
pub const CELL_PADDING: u32 = 4;

const BACKGROUND: RGBColor = RGBColor(0x11, 0x11, 0x11);
const HEADER_BAND: RGBColor = RGBColor(0x33, 0x33, 0x33);
const LABEL_BAND: RGBColor = RGBColor(0x1a, 0x1a, 0x1a);
const CELL_FILL: RGBColor = RGBColor(0x11, 0x11, 0x11);
const LABEL_TEXT: RGBColor = RGBColor(0xaa, 0xaa, 0xaa);
const CELL_TEXT: RGBColor = RGBColor(0xf0, 0xf0, 0xf0);

type Area<DB> = DrawingArea<DB, plotters::coord::Shift>;
type DrawResult<DB> =
    std::result::Result<(), DrawingAreaErrorKind<<DB as DrawingBackend>::ErrorType>>;

/// Canvas size for a grid with the given column widths and row count.
pub fn canvas_size(widths: &[u32], rows: usize) -> (u32, u32) {
    let width = ROW_LABEL_WIDTH + widths.iter().sum::<u32>();
    let height = ROW_HEIGHT * (rows as u32 + 1);
    (width, height)
}

/// Number of characters that fit in a column of `width` pixels.
pub fn visible_chars(width: u32) -> usize {
    (width.saturating_sub(2 * CELL_PADDING) / AVG_GLYPH_WIDTH) as usize
}

/// Render a grid snapshot to PNG bytes
///
/// The canvas is `40 + sum(widths)` pixels wide and `28 * (rows + 1)` tall:
/// a header row of column letters, a band of 1-based row numbers, and one
/// rectangle per cell holding its text clipped to the column width. Text is
/// rasterized with the embedded font. The grid name only names the file and
/// is not painted.
///
/// # Arguments
/// * `snapshot` - Cells, column widths and name of the grid to draw
///
/// # Returns
/// * `Result<Vec<u8>>` - Encoded PNG image, or `ExportEncoding` when the grid
///   has no rows or columns, the widths do not match the columns, or drawing fails
pub fn to_png(snapshot: &GridSnapshot) -> Result<Vec<u8>> {
    let cells = &snapshot.cells;
    let widths = snapshot.widths.as_slice();
    if cells.rows() == 0 || cells.cols() == 0 {
        return Err(GridError::ExportEncoding(format!(
            "cannot draw an empty {}x{} grid",
            cells.rows(),
            cells.cols()
        )));
    }
    if widths.len() != cells.cols() {
        return Err(GridError::ExportEncoding(format!(
            "expected {} column widths, got {}",
            cells.cols(),
            widths.len()
        )));
    }

    let face = font::embedded_font().map_err(|e| GridError::ExportEncoding(e.to_string()))?;
    let metrics = font::line_metrics(face).map_err(|e| GridError::ExportEncoding(e.to_string()))?;
    let mut pen = Pen {
        font: face,
        cache: GlyphCache::new(),
        // Baseline offset that centres an ascent-to-descent line in a row.
        baseline: ((ROW_HEIGHT as f32 + metrics.ascent + metrics.descent) / 2.0).round() as i32,
    };

    let (width, height) = canvas_size(widths, cells.rows());
    let mut buffer = vec![0u8; width as usize * height as usize * 3];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
        paint(&root, &mut pen, cells, widths)
            .map_err(|e| GridError::ExportEncoding(e.to_string()))?;
        root.present().map_err(|e| GridError::ExportEncoding(e.to_string()))?;
    }

    let mut png = Vec::new();
    PngEncoder::new(&mut png)
        .write_image(&buffer, width, height, image::ColorType::Rgb8)
        .map_err(|e| GridError::ExportEncoding(e.to_string()))?;

    debug!(
        "rendered {}x{} grid {:?} to {}x{} png ({} bytes, {} glyphs)",
        cells.rows(),
        cells.cols(),
        snapshot.name,
        width,
        height,
        png.len(),
        pen.cache.len()
    );
    Ok(png)
}

struct Pen {
    font: &'static Font,
    cache: GlyphCache,
    baseline: i32,
}

fn paint<DB: DrawingBackend>(
    root: &Area<DB>,
    pen: &mut Pen,
    cells: &CellSnapshot,
    widths: &[u32],
) -> DrawResult<DB> {
    root.fill(&BACKGROUND)?;

    let mut offsets = Vec::with_capacity(widths.len());
    let mut x = ROW_LABEL_WIDTH;
    for w in widths {
        offsets.push(x);
        x += w;
    }

    for (c, (&x, &w)) in offsets.iter().zip(widths).enumerate() {
        fill_cell(root, x, 0, w, HEADER_BAND)?;
        let label = col_to_letter(c);
        let label_width = label.chars().count() as u32 * AVG_GLYPH_WIDTH;
        let lx = x + w.saturating_sub(label_width) / 2;
        draw_text(root, pen, &label, (lx, 0), x + w - 1, LABEL_TEXT)?;
    }

    for r in 0..cells.rows() {
        let y = ROW_HEIGHT * (r as u32 + 1);
        fill_cell(root, 0, y, ROW_LABEL_WIDTH, LABEL_BAND)?;
        let number = (r + 1).to_string();
        draw_text(root, pen, &number, (10, y), ROW_LABEL_WIDTH - 1, LABEL_TEXT)?;

        for (c, (&x, &w)) in offsets.iter().zip(widths).enumerate() {
            fill_cell(root, x, y, w, CELL_FILL)?;
            let value = cells.text(r, c);
            if value.is_empty() {
                continue;
            }
            let clipped: String = value.chars().take(visible_chars(w)).collect();
            draw_text(root, pen, &clipped, (x + CELL_PADDING, y), x + w - 1, CELL_TEXT)?;
        }
    }

    Ok(())
}

/// Fill a `w-1 x ROW_HEIGHT-1` rectangle, leaving a one pixel gutter to the right and below.
fn fill_cell<DB: DrawingBackend>(
    root: &Area<DB>,
    x: u32,
    y: u32,
    w: u32,
    color: RGBColor,
) -> DrawResult<DB> {
    if w < 2 {
        return Ok(());
    }
    let top_left = (x as i32, y as i32);
    // Corners are inclusive.
    let bottom_right = ((x + w - 2) as i32, (y + ROW_HEIGHT - 2) as i32);
    root.draw(&Rectangle::new([top_left, bottom_right], color.filled()))
}

/// Draw `text` one [`AVG_GLYPH_WIDTH`] step per character in the row starting
/// at `origin.1`, blending glyph coverage over what is already painted.
/// Pixels at or right of `clip_right` and outside the row are dropped.
fn draw_text<DB: DrawingBackend>(
    root: &Area<DB>,
    pen: &mut Pen,
    text: &str,
    origin: (u32, u32),
    clip_right: u32,
    color: RGBColor,
) -> DrawResult<DB> {
    let (x, y) = (origin.0 as i32, origin.1 as i32);
    let baseline = y + pen.baseline;
    let bottom = y + ROW_HEIGHT as i32 - 1;
    let right = clip_right as i32;

    for (i, ch) in text.chars().enumerate() {
        let left = x + i as i32 * AVG_GLYPH_WIDTH as i32;
        if left >= right {
            break;
        }
        let (metrics, coverage) = font::glyph(pen.font, &mut pen.cache, ch);
        let top = baseline - metrics.height as i32 - metrics.ymin;

        for (idx, &alpha) in coverage.iter().enumerate() {
            if alpha == 0 {
                continue;
            }
            let px = left + metrics.xmin + (idx % metrics.width) as i32;
            let py = top + (idx / metrics.width) as i32;
            if px < 0 || px >= right || py < y || py >= bottom {
                continue;
            }
            root.draw_pixel((px, py), &color.mix(f64::from(alpha) / 255.0))?;
        }
    }
    Ok(())
}
