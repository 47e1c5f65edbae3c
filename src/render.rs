//! Plain-text rendering of grids for terminal display.

use std::fmt::Write;

use crate::compute::Grid;

/// ANSI sequence that moves the cursor home and clears the screen.
pub const CLEAR_SCREEN: &str = "\x1b[H\x1b[2J";

const ALIVE: &str = "██";
const DEAD: &str = "  ";

/// Draw the top-left `limit x limit` corner of a grid, two characters per cell.
pub fn render_grid(grid: &Grid, limit: usize) -> String {
    let shown = grid.size().min(limit);
    let mut out = String::with_capacity(shown * (shown * ALIVE.len() + 1));
    for y in 0..shown {
        for &alive in &grid.row(y)[..shown] {
            out.push_str(if alive { ALIVE } else { DEAD });
        }
        out.push('\n');
    }
    out
}

/// Draw several grids one above the other, each with its label on the first row.
pub fn render_labeled(grids: &[(&str, &Grid)], limit: usize) -> String {
    let mut out = String::new();
    for (i, (label, grid)) in grids.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        let shown = grid.size().min(limit);
        let label_width = shown * 2;
        for (y, line) in render_grid(grid, limit).lines().enumerate() {
            if y == 0 {
                let _ = write!(out, "  {:<label_width$}", label);
            } else {
                out.push_str("  ");
            }
            out.push_str(line);
            out.push('\n');
        }
    }
    out
}

/// Status line shown under each rendered frame.
pub fn status_line(generation: u64, size: usize, matched: bool) -> String {
    format!(
        "Generation {}  ({}x{})  {}",
        generation,
        size,
        size,
        if matched { "[MATCH]" } else { "[MISMATCH!]" }
    )
}
