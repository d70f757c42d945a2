/// 24-bit color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Stroke style for line segments. Caps are always round.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub width: f32,
    pub color: Rgb,
}

/// The drawing seam: one frame is a clear followed by filled disks and
/// stroked segments. The terminal raster implements this for real output,
/// tests implement it to record the primitive sequence.
pub trait Surface {
    fn size(&self) -> (f32, f32);
    fn clear(&mut self);
    fn fill_circle(&mut self, cx: f32, cy: f32, r: f32, color: Rgb);
    fn stroke_line(&mut self, x0: f32, y0: f32, x1: f32, y1: f32, stroke: Stroke);
}

/// hue in degrees, saturation and lightness in [0, 1].
pub fn hsl(hue: f32, s: f32, l: f32) -> Rgb {
    let h = hue.rem_euclid(360.0);
    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let x = c * (1.0 - ((h / 60.0).rem_euclid(2.0) - 1.0).abs());
    let m = l - c / 2.0;

    let (r, g, b) = if h < 60.0 {
        (c, x, 0.0)
    } else if h < 120.0 {
        (x, c, 0.0)
    } else if h < 180.0 {
        (0.0, c, x)
    } else if h < 240.0 {
        (0.0, x, c)
    } else if h < 300.0 {
        (x, 0.0, c)
    } else {
        (c, 0.0, x)
    };

    Rgb::new(
        ((r + m) * 255.0).round() as u8,
        ((g + m) * 255.0).round() as u8,
        ((b + m) * 255.0).round() as u8,
    )
}
