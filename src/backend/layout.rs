//! Positioned text extraction and layout-preserving text rendering.
//!
//! Content streams are walked operator by operator while tracking the
//! graphics and text matrices, so every shown string becomes a [`TextSpan`]
//! with a user-space position. Spans are then grouped into lines and laid
//! out on a character grid, which keeps columns of a page lined up in the
//! extracted text.

use std::collections::BTreeMap;

use lopdf::content::Content;
use lopdf::{Dictionary, Document as LopdfDocument, Object, ObjectId};

/// Average glyph width as a fraction of the font size.
const GLYPH_WIDTH_RATIO: f32 = 0.5;

/// TJ adjustment (thousandths of an em) treated as a word break.
const TJ_SPACE_THRESHOLD: f32 = 200.0;

/// Rightmost grid column a span may be placed at.
const MAX_LINE_COLUMNS: f32 = 4096.0;

/// A text span with position and size information.
#[derive(Debug, Clone, PartialEq)]
pub struct TextSpan {
    /// The text content
    pub text: String,
    /// X position (left edge, user space)
    pub x: f32,
    /// Y position (baseline, user space, grows upwards)
    pub y: f32,
    /// Estimated width of the text
    pub width: f32,
    /// Effective font size in points
    pub font_size: f32,
}

impl TextSpan {
    /// Create a new text span with a width estimated from its length.
    pub fn new(text: impl Into<String>, x: f32, y: f32, font_size: f32) -> Self {
        let text = text.into();
        let width = text.chars().count() as f32 * font_size * GLYPH_WIDTH_RATIO;
        Self {
            text,
            x,
            y,
            width,
            font_size,
        }
    }

    /// Right edge of the span.
    pub fn right(&self) -> f32 {
        self.x + self.width
    }
}

/// Spans sharing a baseline, sorted left to right.
#[derive(Debug, Clone)]
pub(crate) struct SpanRow {
    /// Average baseline of the row
    pub y: f32,
    /// Spans in this row, sorted by X
    pub spans: Vec<TextSpan>,
}

impl SpanRow {
    fn font_size(&self) -> f32 {
        self.spans
            .iter()
            .map(|s| s.font_size)
            .fold(0.0_f32, f32::max)
    }
}

/// Group spans into rows, top of the page first.
///
/// Two spans share a row when their baselines differ by at most
/// `tolerance_factor` times the font size.
pub(crate) fn group_rows(spans: &[TextSpan], tolerance_factor: f32) -> Vec<SpanRow> {
    let mut sorted = spans.to_vec();
    sorted.sort_by(|a, b| {
        b.y.partial_cmp(&a.y)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal))
    });

    let mut rows: Vec<SpanRow> = Vec::new();
    let mut current: Vec<TextSpan> = Vec::new();
    let mut anchor_y: Option<f32> = None;

    for span in sorted {
        let tolerance = span.font_size * tolerance_factor;
        match anchor_y {
            Some(y) if (span.y - y).abs() <= tolerance => current.push(span),
            _ => {
                if !current.is_empty() {
                    rows.push(finish_row(std::mem::take(&mut current)));
                }
                anchor_y = Some(span.y);
                current.push(span);
            }
        }
    }
    if !current.is_empty() {
        rows.push(finish_row(current));
    }

    rows
}

fn finish_row(mut spans: Vec<TextSpan>) -> SpanRow {
    spans.sort_by(|a, b| a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal));
    let y = spans.iter().map(|s| s.y).sum::<f32>() / spans.len() as f32;
    SpanRow { y, spans }
}

/// Render spans as plain text that keeps the page's visual layout.
///
/// Lines run top to bottom. Horizontal gaps become runs of spaces on a
/// character grid derived from the average glyph width, and a vertical gap
/// of more than two lines becomes one blank line. Every line ends in `\n`.
pub fn layout_text(spans: &[TextSpan]) -> String {
    if spans.is_empty() {
        return String::new();
    }

    let min_x = spans.iter().map(|s| s.x).fold(f32::INFINITY, f32::min);
    let avg_size = spans.iter().map(|s| s.font_size).sum::<f32>() / spans.len() as f32;
    let char_width = (avg_size * GLYPH_WIDTH_RATIO).max(1.0);

    let mut out = String::new();
    let mut previous: Option<(f32, f32)> = None;

    for row in group_rows(spans, 0.4) {
        let size = row.font_size();
        if let Some((prev_y, prev_size)) = previous {
            if prev_y - row.y > prev_size.max(size) * 2.0 {
                out.push('\n');
            }
        }

        let mut line = String::new();
        let mut column = 0usize;
        for span in &row.spans {
            let target = ((span.x - min_x) / char_width)
                .round()
                .clamp(0.0, MAX_LINE_COLUMNS) as usize;
            if column < target {
                line.extend(std::iter::repeat(' ').take(target - column));
                column = target;
            } else if column > 0 && !line.ends_with(' ') && !span.text.starts_with(' ') {
                line.push(' ');
                column += 1;
            }
            line.push_str(&span.text);
            column += span.text.chars().count();
        }

        out.push_str(line.trim_end());
        out.push('\n');
        previous = Some((row.y, size));
    }

    out
}

/// Affine matrix `[a, b, c, d, e, f]` in PDF row-vector convention.
type Matrix = [f32; 6];

const IDENTITY: Matrix = [1.0, 0.0, 0.0, 1.0, 0.0, 0.0];

/// `m1 × m2`: apply `m1` first, then `m2`.
fn multiply(m1: &Matrix, m2: &Matrix) -> Matrix {
    [
        m1[0] * m2[0] + m1[1] * m2[2],
        m1[0] * m2[1] + m1[1] * m2[3],
        m1[2] * m2[0] + m1[3] * m2[2],
        m1[2] * m2[1] + m1[3] * m2[3],
        m1[4] * m2[0] + m1[5] * m2[2] + m2[4],
        m1[4] * m2[1] + m1[5] * m2[3] + m2[5],
    ]
}

fn translation(tx: f32, ty: f32) -> Matrix {
    [1.0, 0.0, 0.0, 1.0, tx, ty]
}

/// Text and graphics state needed to place spans.
struct TextState {
    ctm: Matrix,
    saved: Vec<Matrix>,
    tm: Matrix,
    tlm: Matrix,
    leading: f32,
    font_size: f32,
    font: Vec<u8>,
}

impl Default for TextState {
    fn default() -> Self {
        Self {
            ctm: IDENTITY,
            saved: Vec::new(),
            tm: IDENTITY,
            tlm: IDENTITY,
            leading: 0.0,
            font_size: 12.0,
            font: Vec::new(),
        }
    }
}

impl TextState {
    fn move_line(&mut self, tx: f32, ty: f32) {
        self.tlm = multiply(&translation(tx, ty), &self.tlm);
        self.tm = self.tlm;
    }

    fn next_line(&mut self) {
        let leading = if self.leading > 0.0 {
            self.leading
        } else {
            self.font_size * 1.2
        };
        self.move_line(0.0, -leading);
    }

    /// Current text position in user space and the effective font size.
    fn placement(&self) -> (f32, f32, f32, f32) {
        let trm = multiply(&self.tm, &self.ctm);
        let h_scale = (trm[0] * trm[0] + trm[1] * trm[1]).sqrt();
        let v_scale = (trm[2] * trm[2] + trm[3] * trm[3]).sqrt();
        (trm[4], trm[5], h_scale, self.font_size * v_scale)
    }

    fn advance(&mut self, tx: f32) {
        self.tm = multiply(&translation(tx, 0.0), &self.tm);
    }
}

/// Extracts positioned text spans from page content streams.
pub struct SpanExtractor<'a> {
    doc: &'a LopdfDocument,
}

impl<'a> SpanExtractor<'a> {
    /// Create an extractor over a loaded document.
    pub fn new(doc: &'a LopdfDocument) -> Self {
        Self { doc }
    }

    /// Extract all text spans shown on a page.
    pub fn page_spans(&self, page_id: ObjectId) -> lopdf::Result<Vec<TextSpan>> {
        let fonts = self.doc.get_page_fonts(page_id)?;
        let content = Content::decode(&self.doc.get_page_content(page_id)?)?;

        let mut state = TextState::default();
        let mut spans = Vec::new();

        for op in &content.operations {
            let operands = &op.operands;
            match op.operator.as_str() {
                "q" => state.saved.push(state.ctm),
                "Q" => {
                    if let Some(ctm) = state.saved.pop() {
                        state.ctm = ctm;
                    }
                }
                "cm" => {
                    if let Some(m) = matrix_operand(operands) {
                        state.ctm = multiply(&m, &state.ctm);
                    }
                }
                "BT" => {
                    state.tm = IDENTITY;
                    state.tlm = IDENTITY;
                }
                "Tf" => {
                    if let Some(Object::Name(name)) = operands.first() {
                        state.font = name.clone();
                    }
                    state.font_size = operands.get(1).and_then(number).unwrap_or(12.0);
                }
                "TL" => state.leading = operands.first().and_then(number).unwrap_or(0.0),
                "Td" | "TD" => {
                    let tx = operands.first().and_then(number).unwrap_or(0.0);
                    let ty = operands.get(1).and_then(number).unwrap_or(0.0);
                    if op.operator == "TD" {
                        state.leading = -ty;
                    }
                    state.move_line(tx, ty);
                }
                "Tm" => {
                    if let Some(m) = matrix_operand(operands) {
                        state.tm = m;
                        state.tlm = m;
                    }
                }
                "T*" => state.next_line(),
                "Tj" => {
                    if let Some(Object::String(bytes, _)) = operands.first() {
                        let text = self.decode(&fonts, &state.font, bytes);
                        self.show(&mut state, text, 0.0, &mut spans);
                    }
                }
                "'" | "\"" => {
                    state.next_line();
                    let index = if op.operator == "\"" { 2 } else { 0 };
                    if let Some(Object::String(bytes, _)) = operands.get(index) {
                        let text = self.decode(&fonts, &state.font, bytes);
                        self.show(&mut state, text, 0.0, &mut spans);
                    }
                }
                "TJ" => {
                    if let Some(Object::Array(items)) = operands.first() {
                        let (text, kerning) = self.decode_tj(&fonts, &state.font, items);
                        self.show(&mut state, text, kerning, &mut spans);
                    }
                }
                _ => {}
            }
        }

        Ok(spans)
    }

    /// Record a shown string and move the text position past it.
    fn show(&self, state: &mut TextState, text: String, kerning: f32, spans: &mut Vec<TextSpan>) {
        let (x, y, h_scale, size) = state.placement();
        let advance =
            text.chars().count() as f32 * state.font_size * GLYPH_WIDTH_RATIO + kerning * state.font_size;

        if !text.trim().is_empty() {
            let mut span = TextSpan::new(text, x, y, size);
            span.width = advance * h_scale;
            spans.push(span);
        }
        state.advance(advance);
    }

    /// Decode a TJ array, inserting spaces for large positive gaps.
    ///
    /// Returns the text and the total kerning in ems.
    fn decode_tj(
        &self,
        fonts: &BTreeMap<Vec<u8>, &Dictionary>,
        font: &[u8],
        items: &[Object],
    ) -> (String, f32) {
        let mut combined = String::new();
        let mut kerning = 0.0;

        for item in items {
            match item {
                Object::String(bytes, _) => combined.push_str(&self.decode(fonts, font, bytes)),
                Object::Integer(_) | Object::Real(_) => {
                    let adjustment = -number(item).unwrap_or(0.0);
                    kerning += adjustment / 1000.0;
                    if adjustment > TJ_SPACE_THRESHOLD
                        && !combined.is_empty()
                        && !combined.ends_with(' ')
                        && !combined.chars().last().is_some_and(is_spaceless_script_char)
                    {
                        combined.push(' ');
                    }
                }
                _ => {}
            }
        }

        (combined, kerning)
    }

    fn decode(&self, fonts: &BTreeMap<Vec<u8>, &Dictionary>, font: &[u8], bytes: &[u8]) -> String {
        fonts
            .get(font)
            .and_then(|dict| dict.get_font_encoding(self.doc).ok())
            .and_then(|encoding| LopdfDocument::decode_text(&encoding, bytes).ok())
            .unwrap_or_else(|| decode_pdf_string(bytes))
    }
}

fn matrix_operand(operands: &[Object]) -> Option<Matrix> {
    if operands.len() < 6 {
        return None;
    }
    let mut m = IDENTITY;
    for (slot, operand) in m.iter_mut().zip(operands) {
        *slot = number(operand)?;
    }
    Some(m)
}

/// Numeric value of a PDF object.
pub(crate) fn number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

/// Decode a PDF text string: UTF-16BE with BOM, then UTF-8, then Latin-1.
pub(crate) fn decode_pdf_string(bytes: &[u8]) -> String {
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let utf16: Vec<u16> = bytes[2..]
            .chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect();
        return String::from_utf16_lossy(&utf16);
    }

    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => bytes.iter().map(|&b| b as char).collect(),
    }
}

/// Scripts that do not separate words with spaces (Chinese, Japanese).
fn is_spaceless_script_char(c: char) -> bool {
    matches!(c as u32,
        0x4E00..=0x9FFF
        | 0x3400..=0x4DBF
        | 0x20000..=0x2EBEF
        | 0x3040..=0x30FF
        | 0x3000..=0x303F)
}
