use anyhow::{Context, Result};
use ratatui::{
    Frame, Terminal,
    backend::Backend,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};

use crate::game::{Cell, Grid, Rgba, palette};

/// Titles at or above this size are drawn emphasized
pub const LARGE_TITLE: u16 = 20;

/// Where frames go.
///
/// Each call replaces whatever the previous call drew.
pub trait Canvas {
    /// Paint one square per `(cell, color)` pair; later pairs win on shared cells
    fn paint_cells(&mut self, grid: &Grid, cells: &[(Cell, Rgba)]) -> Result<()>;

    /// Paint a single line of text in place of the board
    fn paint_title(&mut self, text: &str, size: u16) -> Result<()>;
}

pub fn to_color(color: Rgba) -> Color {
    Color::Rgb(color.r(), color.g(), color.b())
}

/// One line per board row, `scale` columns per cell. Cells without an entity
/// are black.
pub fn board_lines(grid: &Grid, cells: &[(Cell, Rgba)], scale: u16) -> Vec<Line<'static>> {
    let mut colors = vec![Color::Black; grid.cell_count()];
    for (cell, color) in cells {
        if grid.contains(*cell) {
            colors[cell.index()] = to_color(*color);
        }
    }

    let square = " ".repeat(scale as usize);
    colors
        .chunks(grid.side())
        .map(|row| {
            Line::from(
                row.iter()
                    .map(|color| Span::styled(square.clone(), Style::default().bg(*color)))
                    .collect::<Vec<_>>(),
            )
        })
        .collect()
}

/// Title text, spaced out and bold when `size` is large
pub fn title_line(text: &str, size: u16) -> Line<'static> {
    let style = Style::default().fg(to_color(palette::TITLE));

    if size >= LARGE_TITLE {
        let spaced = text
            .chars()
            .map(String::from)
            .collect::<Vec<_>>()
            .join(" ");
        Line::from(Span::styled(spaced, style.add_modifier(Modifier::BOLD)))
    } else {
        Line::from(Span::styled(text.to_string(), style))
    }
}

/// Ratatui terminal drawing the board as colored squares
pub struct TerminalCanvas<B: Backend> {
    terminal: Terminal<B>,
    pixel_scale: u16,
}

impl<B: Backend> TerminalCanvas<B> {
    pub fn new(terminal: Terminal<B>, pixel_scale: u16) -> Self {
        Self {
            terminal,
            pixel_scale: pixel_scale.max(1),
        }
    }

    pub fn terminal(&self) -> &Terminal<B> {
        &self.terminal
    }

    pub fn terminal_mut(&mut self) -> &mut Terminal<B> {
        &mut self.terminal
    }
}

impl<B: Backend> Canvas for TerminalCanvas<B> {
    fn paint_cells(&mut self, grid: &Grid, cells: &[(Cell, Rgba)]) -> Result<()> {
        let scale = self.pixel_scale;
        let lines = board_lines(grid, cells, scale);

        self.terminal
            .draw(|frame| {
                let area = board_area(frame, grid, scale);
                frame.render_widget(Paragraph::new(lines).block(board_block()), area);
            })
            .context("Failed to draw frame")?;

        Ok(())
    }

    fn paint_title(&mut self, text: &str, size: u16) -> Result<()> {
        let line = title_line(text, size);

        self.terminal
            .draw(|frame| {
                let area = frame.area();
                let padding = area.height.saturating_sub(3) / 2;
                let mut lines = vec![Line::default(); padding as usize];
                lines.push(line);

                frame.render_widget(
                    Paragraph::new(lines)
                        .alignment(Alignment::Center)
                        .block(board_block()),
                    area,
                );
            })
            .context("Failed to draw title")?;

        Ok(())
    }
}

fn board_block() -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .border_style(Style::default().fg(Color::White))
        .title(" Snake ")
}

/// Board rectangle centered in the frame, clipped to it
fn board_area(frame: &Frame, grid: &Grid, scale: u16) -> Rect {
    let area = frame.area();
    let side = grid.side() as u16;
    let width = side.saturating_mul(scale).saturating_add(2).min(area.width);
    let height = side.saturating_add(2).min(area.height);

    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;

    fn screen_text(canvas: &TerminalCanvas<TestBackend>) -> String {
        let buffer = canvas.terminal().backend().buffer();
        buffer.content().iter().map(|cell| cell.symbol()).collect()
    }

    #[test]
    fn test_board_lines_colors_cells() {
        let grid = Grid::new(3);
        let lines = board_lines(&grid, &[(Cell(4), palette::FOOD)], 2);

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1].spans.len(), 3);
        assert_eq!(lines[1].spans[1].content, "  ");
        assert_eq!(lines[1].spans[1].style.bg, Some(Color::Rgb(255, 0, 0)));
        assert_eq!(lines[0].spans[0].style.bg, Some(Color::Black));
    }

    #[test]
    fn test_later_cells_paint_over_earlier_ones() {
        let grid = Grid::new(3);
        let lines = board_lines(
            &grid,
            &[(Cell(0), palette::SEGMENT), (Cell(0), palette::HEAD)],
            1,
        );

        assert_eq!(lines[0].spans[0].style.bg, Some(to_color(palette::HEAD)));
    }

    #[test]
    fn test_title_line_size() {
        assert_eq!(title_line("Snake", LARGE_TITLE).spans[0].content, "S n a k e");
        assert_eq!(title_line("Game over!!", 10).spans[0].content, "Game over!!");
    }

    #[test]
    fn test_terminal_canvas_draws_board() {
        let terminal = Terminal::new(TestBackend::new(30, 12)).unwrap();
        let mut canvas = TerminalCanvas::new(terminal, 2);
        let grid = Grid::new(5);

        canvas.paint_cells(&grid, &[(Cell(12), palette::HEAD)]).unwrap();

        // 5x2 + 2 columns, 5 + 2 rows, centered in 30x12
        let buffer = canvas.terminal().backend().buffer();
        let left: u16 = (30 - 12) / 2;
        let top: u16 = (12 - 7) / 2;
        let center = &buffer[(left + 1 + 2 * 2, top + 1 + 2)];
        assert_eq!(center.bg, Color::Rgb(0, 255, 0));
        assert!(screen_text(&canvas).contains("Snake"));
    }

    #[test]
    fn test_terminal_canvas_title_replaces_board() {
        let terminal = Terminal::new(TestBackend::new(40, 12)).unwrap();
        let mut canvas = TerminalCanvas::new(terminal, 2);
        let grid = Grid::new(5);

        canvas.paint_cells(&grid, &[(Cell(12), palette::HEAD)]).unwrap();
        canvas.paint_title("Game over!!", 10).unwrap();

        let text = screen_text(&canvas);
        assert!(text.contains("Game over!!"));
    }
}
