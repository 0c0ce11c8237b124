use crate::model::VerticalAlign;

/// Advance width of `text` in logical px for one bound font/size.
///
/// The production implementation shapes with Parley (see
/// [`crate::render::Rasterizer`]); tests substitute deterministic fakes.
pub trait TextMeasure {
    fn measure(&mut self, text: &str) -> f64;
}

/// Greedy per-character line breaking.
///
/// Paragraphs split on `'\n'` are wrapped independently. Within a paragraph
/// every candidate line is re-measured after each appended character; on
/// overflow the line is committed without that character, which then opens
/// the next line. A paragraph's first character is never broken before, so a
/// single unit wider than `max_width` still yields a (too wide) line.
/// Every paragraph commits a final line, so empty paragraphs survive as
/// empty lines.
pub fn break_lines(measure: &mut dyn TextMeasure, text: &str, max_width: f64) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let mut line = String::new();
        for (i, ch) in paragraph.chars().enumerate() {
            let mut candidate = line.clone();
            candidate.push(ch);
            if measure.measure(&candidate) > max_width && i > 0 {
                lines.push(line);
                line = ch.to_string();
            } else {
                line = candidate;
            }
        }
        lines.push(line);
    }
    lines
}

pub fn line_height(font_size: f64) -> f64 {
    font_size * 1.4
}

/// Y of the first line of a text block inside a container that starts at
/// `top_offset`. Center alignment distributes leftover space but never moves
/// the block above `top_offset`.
pub fn block_start_y(
    align: VerticalAlign,
    block_height: f64,
    container_height: f64,
    top_offset: f64,
) -> f64 {
    match align {
        VerticalAlign::Top => top_offset,
        VerticalAlign::Center => top_offset + ((container_height - block_height) / 2.0).max(0.0),
    }
}
