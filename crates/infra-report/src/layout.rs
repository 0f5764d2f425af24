// Page geometry and cell text fitting (A4 landscape, Helvetica)

pub(crate) const PAGE_W: f32 = 842.0;
pub(crate) const PAGE_H: f32 = 595.0;
pub(crate) const MARGIN: f32 = 50.0;
pub(crate) const ROW_H: f32 = 20.0;
pub(crate) const CELL_PAD: f32 = 4.0;

pub(crate) const FONT_SIZE: f32 = 9.0;
pub(crate) const HEADER_FONT_SIZE: f32 = 10.0;
pub(crate) const TITLE_FONT_SIZE: f32 = 14.0;

/// Share of the table width per column, in column order
pub(crate) const COLUMN_SHARES: [f32; 6] = [0.17, 0.12, 0.27, 0.14, 0.10, 0.20];

/// Top edge of the header row
pub(crate) fn table_top() -> f32 {
    PAGE_H - MARGIN - 30.0
}

pub(crate) fn table_width() -> f32 {
    PAGE_W - 2.0 * MARGIN
}

pub(crate) fn column_widths() -> Vec<f32> {
    COLUMN_SHARES.iter().map(|share| share * table_width()).collect()
}

/// Data rows that fit under the header row on one page
pub(crate) fn rows_per_page() -> usize {
    let first_row = table_top() - ROW_H;
    ((first_row - MARGIN) / ROW_H) as usize
}

/// Helvetica average glyph width is about half the font size
fn max_chars(width: f32, font_size: f32) -> usize {
    (((width - 2.0 * CELL_PAD) / (font_size * 0.5)).floor() as usize).max(1)
}

/// Latin-1 bytes for the built-in font, truncated with "..." to fit `width`
pub(crate) fn fit_cell(text: &str, width: f32, font_size: f32) -> Vec<u8> {
    let flattened: String = text
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect();
    let limit = max_chars(width, font_size);

    let chars: Vec<char> = flattened.chars().collect();
    let visible: String = if chars.len() > limit {
        let keep = limit.saturating_sub(3);
        chars[..keep].iter().collect::<String>() + "..."
    } else {
        flattened
    };

    visible
        .chars()
        .map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?'))
        .collect()
}
