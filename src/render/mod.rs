pub mod renderer;

pub use renderer::{Canvas, LARGE_TITLE, TerminalCanvas, board_lines, title_line, to_color};
