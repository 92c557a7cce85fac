use ratatui::{buffer::Buffer, layout::Rect, style::Style, widgets::Widget};

/// Block of text drawn cell by cell from the area's top-left corner.
#[derive(Debug, Default)]
pub struct MultiLine<T: AsRef<str>> {
    lines: Vec<T>,
    style: Style,
    ignore_whitespace: bool,
}

impl<T: AsRef<str>> MultiLine<T> {
    pub fn new(lines: Vec<T>) -> Self {
        MultiLine { lines, style: Style::default(), ignore_whitespace: false }
    }

    pub fn style(self, style: Style) -> Self {
        Self { style, ..self }
    }

    /// Leave whatever is underneath visible through blank cells.
    pub fn ignore_whitespace(self, ignore_whitespace: bool) -> Self {
        Self { ignore_whitespace, ..self }
    }
}

impl<T: AsRef<str>> Widget for MultiLine<T> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        let area = area.intersection(buf.area);
        for (dy, line) in self.lines.iter().enumerate().take(area.height as usize) {
            for (dx, ch) in line.as_ref().chars().enumerate().take(area.width as usize) {
                if self.ignore_whitespace && ch.is_whitespace() {
                    continue;
                }
                if let Some(cell) = buf.cell_mut((area.x + dx as u16, area.y + dy as u16)) {
                    cell.set_char(ch).set_style(self.style);
                }
            }
        }
    }
}
