// diagnostics.rs
//
// One-line diagnostic rendering with a source excerpt and caret:
//
//   <file:line:col>: <message>
//   <source line containing the location>
//   <spaces>^
//
// When the location points past the end of the line (an expected token after
// the input ran out), the line is right-padded so the caret lands beyond it.

use crate::Span;

pub fn format_diagnostics(source: &str, file: &str, message: &str, span: Span) -> String {
    let offset = span.start.min(source.len());

    let line_start = source[..offset].rfind('\n').map_or(0, |p| p + 1);
    let line_end = source[offset..]
        .find('\n')
        .map_or(source.len(), |p| offset + p);
    let line = &source[line_start..line_end];

    // The caret column is the presumed (1-indexed) column of the location.
    let arrow = span.column.max(1) as usize;
    let line_width = line.chars().count();

    let mut rendered = format!("{}:{}:{}: {}\n", file, span.line, span.column, message);
    rendered.push_str(line);
    for _ in line_width..arrow.saturating_sub(1) {
        rendered.push(' ');
    }
    rendered.push('\n');
    for _ in 1..arrow {
        rendered.push(' ');
    }
    rendered.push('^');
    rendered
}
