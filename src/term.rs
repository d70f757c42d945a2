use anyhow::Result;
use crossterm::{
    cursor, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{Clear, ClearType},
};

use crate::raster::Raster;
use crate::scene::Settings;
use crate::surface::Rgb;

/// Rows reserved above the canvas for the status line.
pub const TOP_PAD: u16 = 1;

const LIVE_COLOR: Color = Color::Rgb { r: 0x4c, g: 0xc9, b: 0xf0 };
const FAIL_COLOR: Color = Color::Rgb { r: 0xf7, g: 0x25, b: 0x85 };

/// Capture lifecycle as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    Idle,
    Live { device: String },
    Stopped,
    Failed(String),
}

impl Status {
    pub fn line(&self) -> (String, Color) {
        match self {
            Status::Idle => ("microphone: off (press s to start)".into(), Color::White),
            Status::Live { device } => (
                format!("microphone: on [{device}] speak or play music"),
                LIVE_COLOR,
            ),
            Status::Stopped => ("microphone: off".into(), Color::White),
            Status::Failed(reason) => (format!("error: {reason}"), FAIL_COLOR),
        }
    }
}

/// Cell viewport the canvas is sampled into, centered under the status
/// line. Cells are roughly twice as tall as wide, and every cell shows
/// two raster rows, so a viewport twice as wide as tall stays square on
/// screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub x0: u16,
    pub y0: u16,
    pub cols: u16,
    pub rows: u16,
}

pub fn layout_for(w: u16, h: u16, top_pad: u16) -> Layout {
    let avail_rows = h.saturating_sub(top_pad).max(1);
    let avail_cols = w.max(1);

    let mut rows = avail_rows;
    let mut cols = rows.saturating_mul(2);
    if cols > avail_cols {
        cols = avail_cols;
        rows = (cols / 2).max(1);
    }

    Layout {
        x0: (avail_cols - cols) / 2,
        y0: top_pad + (avail_rows - rows) / 2,
        cols,
        rows,
    }
}

fn term_color(c: Rgb) -> Color {
    Color::Rgb { r: c.r, g: c.g, b: c.b }
}

fn sample(raster: &Raster, lay: &Layout, col: u16, half_row: u16) -> Rgb {
    let x = (col as usize * raster.width()) / lay.cols as usize;
    let y = (half_row as usize * raster.height()) / (lay.rows as usize * 2);
    raster.get(x.min(raster.width() - 1), y.min(raster.height() - 1))
}

/// Queues the whole canvas as half-block cells: the upper raster row in
/// the foreground, the lower one in the background of `▀`.
pub fn render_canvas(raster: &Raster, lay: &Layout, frame: &mut Vec<u8>) -> Result<()> {
    for row in 0..lay.rows {
        queue!(frame, cursor::MoveTo(lay.x0, lay.y0 + row))?;
        for col in 0..lay.cols {
            let top = sample(raster, lay, col, row * 2);
            let bottom = sample(raster, lay, col, row * 2 + 1);
            queue!(
                frame,
                SetForegroundColor(term_color(top)),
                SetBackgroundColor(term_color(bottom)),
                Print('▀'),
            )?;
        }
        queue!(frame, ResetColor)?;
    }
    Ok(())
}

/// Queues the status line: lifecycle message on the left, the numeric
/// readout of both controls plus key hints on the right when they fit.
pub fn render_status(
    frame: &mut Vec<u8>,
    width: u16,
    status: &Status,
    settings: &Settings,
) -> Result<()> {
    let (message, color) = status.line();

    queue!(
        frame,
        cursor::MoveTo(0, 0),
        Clear(ClearType::CurrentLine),
        SetForegroundColor(color),
        Print(&message),
        ResetColor,
    )?;

    let readout = format!(
        "sens {:>3}  bars {:>3} | s start  x stop  d demo  arrows adjust  q quit",
        settings.sensitivity, settings.bar_count
    );
    let needed = message.chars().count() + readout.chars().count() + 2;
    if needed <= width as usize {
        queue!(
            frame,
            cursor::MoveTo(width - readout.chars().count() as u16, 0),
            SetForegroundColor(Color::DarkGrey),
            Print(&readout),
            ResetColor,
        )?;
    }

    Ok(())
}
