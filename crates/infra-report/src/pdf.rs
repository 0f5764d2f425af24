//! Audit report PDF
//!
//! Multi-page table with the column header repeated on every page, a title
//! line and a page number footer. No rows still yields one page with the
//! header only.

use crate::layout::{
    column_widths, fit_cell, rows_per_page, table_top, table_width, CELL_PAD, FONT_SIZE,
    HEADER_FONT_SIZE, MARGIN, PAGE_H, PAGE_W, ROW_H, TITLE_FONT_SIZE,
};
use async_trait::async_trait;
use chrono::DateTime;
use chrono_tz::Tz;
use pdf_writer::{Content, Name, Pdf, Rect, Ref, Str};
use std::path::Path;
use tracing::info;
use upkeep_core::domain::FindingReportRow;
use upkeep_core::port::{RenderError, ReportRenderer};

pub const REPORT_COLUMNS: [&str; 6] = [
    "Asset",
    "Category",
    "Notes",
    "Reported At",
    "Floor-Room",
    "Technician",
];

const REPORT_TITLE: &str = "Maintenance Audit Report";
const FONT_NAME: Name<'static> = Name(b"F1");
const HEADER_FILL: (f32, f32, f32) = (0.85, 0.87, 0.90);
const STRIPE_FILL: (f32, f32, f32) = (0.96, 0.96, 0.96);

/// Renders audit rows as a PDF file; timestamps are shown in `zone`
pub struct PdfReportRenderer {
    zone: Tz,
}

impl PdfReportRenderer {
    pub fn new(zone: Tz) -> Self {
        Self { zone }
    }
}

#[async_trait]
impl ReportRenderer for PdfReportRenderer {
    async fn render(
        &self,
        rows: &[FindingReportRow],
        destination: &Path,
    ) -> Result<(), RenderError> {
        let generated = chrono::Utc::now().with_timezone(&self.zone);
        let title = format!("{} ({})", REPORT_TITLE, generated.format("%Y-%m-%d"));
        let bytes = build_document(&title, rows, self.zone);

        if let Some(parent) = destination.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        tokio::fs::write(destination, &bytes).await?;

        info!(
            rows = rows.len(),
            bytes = bytes.len(),
            path = %destination.display(),
            "Audit report written"
        );
        Ok(())
    }
}

fn reported_at(epoch_ms: i64, zone: Tz) -> String {
    match DateTime::from_timestamp_millis(epoch_ms) {
        Some(utc) => utc
            .with_timezone(&zone)
            .format("%Y-%m-%d %H:%M")
            .to_string(),
        None => epoch_ms.to_string(),
    }
}

fn cells(row: &FindingReportRow, zone: Tz) -> [String; 6] {
    [
        row.asset_name.clone(),
        row.asset_category.clone(),
        row.notes.clone().unwrap_or_default(),
        reported_at(row.reported_at, zone),
        row.floor_room(),
        row.technician_identity(),
    ]
}

/// Encode the whole report in memory
pub fn build_document(title: &str, rows: &[FindingReportRow], zone: Tz) -> Vec<u8> {
    let mut doc = DocumentBuilder::new();
    let widths = column_widths();
    let per_page = rows_per_page();

    let table: Vec<[String; 6]> = rows.iter().map(|row| cells(row, zone)).collect();
    let chunks: Vec<&[[String; 6]]> = if table.is_empty() {
        vec![&[]]
    } else {
        table.chunks(per_page).collect()
    };

    for (index, chunk) in chunks.iter().enumerate() {
        let mut content = Content::new();
        draw_title_and_footer(&mut content, title, index + 1);

        let mut y = table_top();
        shade(&mut content, y, HEADER_FILL);
        let header: Vec<&str> = REPORT_COLUMNS.to_vec();
        draw_row(&mut content, y, &widths, &header, HEADER_FONT_SIZE);

        for (i, row) in chunk.iter().enumerate() {
            y -= ROW_H;
            if i % 2 == 0 {
                shade(&mut content, y, STRIPE_FILL);
            }
            let texts: Vec<&str> = row.iter().map(String::as_str).collect();
            draw_row(&mut content, y, &widths, &texts, FONT_SIZE);
        }

        doc.add_page(content);
    }

    doc.finish()
}

struct DocumentBuilder {
    pdf: Pdf,
    catalog_id: Ref,
    pages_id: Ref,
    font_id: Ref,
    page_refs: Vec<Ref>,
    next_id: i32,
}

impl DocumentBuilder {
    fn new() -> Self {
        let mut pdf = Pdf::new();
        let catalog_id = Ref::new(1);
        let pages_id = Ref::new(2);
        let font_id = Ref::new(3);
        pdf.type1_font(font_id)
            .base_font(Name(b"Helvetica"))
            .encoding_predefined(Name(b"WinAnsiEncoding"));

        Self {
            pdf,
            catalog_id,
            pages_id,
            font_id,
            page_refs: Vec::new(),
            next_id: 4,
        }
    }

    fn fresh_ref(&mut self) -> Ref {
        let id = self.next_id;
        self.next_id += 1;
        Ref::new(id)
    }

    fn add_page(&mut self, content: Content) {
        let page_id = self.fresh_ref();
        let content_id = self.fresh_ref();
        self.page_refs.push(page_id);

        {
            let mut page = self.pdf.page(page_id);
            page.parent(self.pages_id)
                .media_box(Rect::new(0.0, 0.0, PAGE_W, PAGE_H))
                .contents(content_id);
            page.resources().fonts().pair(FONT_NAME, self.font_id);
        }

        self.pdf.stream(content_id, &content.finish());
    }

    fn finish(mut self) -> Vec<u8> {
        self.pdf.catalog(self.catalog_id).pages(self.pages_id);
        self.pdf
            .pages(self.pages_id)
            .count(self.page_refs.len() as i32)
            .kids(self.page_refs.iter().copied());
        self.pdf.finish()
    }
}

fn draw_text(content: &mut Content, x: f32, y: f32, size: f32, bytes: &[u8]) {
    content.begin_text();
    content.set_font(FONT_NAME, size);
    content.set_text_matrix([1.0, 0.0, 0.0, 1.0, x, y]);
    content.show(Str(bytes));
    content.end_text();
}

fn shade(content: &mut Content, y: f32, (r, g, b): (f32, f32, f32)) {
    content.save_state();
    content.set_fill_rgb(r, g, b);
    content.rect(MARGIN, y, table_width(), ROW_H);
    content.fill_nonzero();
    content.restore_state();
}

fn draw_row(content: &mut Content, y: f32, widths: &[f32], texts: &[&str], font_size: f32) {
    let mut x = MARGIN;
    for (text, &w) in texts.iter().zip(widths) {
        draw_text(
            content,
            x + CELL_PAD,
            y + 6.0,
            font_size,
            &fit_cell(text, w, font_size),
        );

        content.save_state();
        content.set_stroke_rgb(0.65, 0.65, 0.65);
        content.rect(x, y, w, ROW_H);
        content.stroke();
        content.restore_state();

        x += w;
    }
}

fn draw_title_and_footer(content: &mut Content, title: &str, page: usize) {
    draw_text(
        content,
        MARGIN,
        PAGE_H - MARGIN + 15.0,
        TITLE_FONT_SIZE,
        &fit_cell(title, table_width(), TITLE_FONT_SIZE),
    );
    let footer = format!("Page {}", page);
    draw_text(
        content,
        PAGE_W - MARGIN - 60.0,
        MARGIN - 35.0,
        FONT_SIZE,
        footer.as_bytes(),
    );
}
