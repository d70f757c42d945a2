use std::f32::consts::TAU;
use std::ops::RangeInclusive;

use crate::surface::{hsl, Rgb, Stroke, Surface};

/// Slider ranges for the two live controls. 50 is neutral gain.
pub const SENSITIVITY_RANGE: RangeInclusive<u16> = 0..=200;
pub const BAR_COUNT_RANGE: RangeInclusive<usize> = 8..=180;

const BACKDROP: Rgb = Rgb::new(0x16, 0x21, 0x3e);
const HUB: Rgb = Rgb::new(0x43, 0x61, 0xee);
const HUB_RADIUS: f32 = 20.0;
const BAR_WIDTH: f32 = 4.0;

/// The two live controls, re-supplied to the draw routine every frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    pub sensitivity: u16,
    pub bar_count: usize,
}

impl Settings {
    pub fn new(sensitivity: u16, bar_count: usize) -> Self {
        Self {
            sensitivity: sensitivity
                .clamp(*SENSITIVITY_RANGE.start(), *SENSITIVITY_RANGE.end()),
            bar_count: bar_count
                .clamp(*BAR_COUNT_RANGE.start(), *BAR_COUNT_RANGE.end()),
        }
    }

    pub fn nudge_sensitivity(&mut self, delta: i32) {
        let v = (self.sensitivity as i32 + delta)
            .clamp(*SENSITIVITY_RANGE.start() as i32, *SENSITIVITY_RANGE.end() as i32);
        self.sensitivity = v as u16;
    }

    pub fn nudge_bar_count(&mut self, delta: i32) {
        let v = (self.bar_count as i32 + delta)
            .clamp(*BAR_COUNT_RANGE.start() as i32, *BAR_COUNT_RANGE.end() as i32);
        self.bar_count = v as usize;
    }
}

/// Nearest-neighbor pick of the spectrum bin for bar `i`, truncating
/// toward zero. `bar_count` need not match `n`.
#[inline]
pub fn bin_for_bar(i: usize, bar_count: usize, n: usize) -> usize {
    ((i as f32 / bar_count as f32) * n as f32) as usize
}

/// Normalized, gain-scaled bar height. Clamped at 1.0 only; the low end
/// is left open since byte magnitudes cannot go negative.
#[inline]
pub fn bar_height(byte: u8, sensitivity: u16) -> f32 {
    let h = (byte as f32 / 255.0) * (sensitivity as f32 / 50.0);
    h.min(1.0)
}

/// Draws one full frame: backdrop disk, `bar_count` radial bars, center
/// hub. Stateless; the same bins and settings always produce the same
/// primitive sequence.
pub fn draw_frame<S: Surface>(surface: &mut S, bins: &[u8], settings: &Settings) {
    let (w, h) = surface.size();
    let (cx, cy) = (w / 2.0, h / 2.0);
    let radius = cx.min(cy) * 0.8;

    surface.clear();
    surface.fill_circle(cx, cy, radius, BACKDROP);

    let n = bins.len();
    if n == 0 {
        surface.fill_circle(cx, cy, HUB_RADIUS, HUB);
        return;
    }

    let step = TAU / settings.bar_count as f32;

    for i in 0..settings.bar_count {
        let byte = bins[bin_for_bar(i, settings.bar_count, n)];
        let height = bar_height(byte, settings.sensitivity);

        let angle = i as f32 * step;
        let bar_len = 10.0 + height * (radius * 0.7);

        let x0 = cx + (radius * 0.2) * angle.cos();
        let y0 = cy + (radius * 0.2) * angle.sin();
        let x1 = cx + bar_len * angle.cos();
        let y1 = cy + bar_len * angle.sin();

        // blue at rest, purple at full height
        let hue = 200.0 + height * 100.0;
        let stroke = Stroke {
            width: BAR_WIDTH,
            color: hsl(hue, 1.0, 0.6),
        };

        surface.stroke_line(x0, y0, x1, y1, stroke);
    }

    surface.fill_circle(cx, cy, HUB_RADIUS, HUB);
}

/// Synthetic spectrum for the startup preview: one fixed sine wave folded
/// into byte magnitudes, drawn through the exact same bar mapping as live
/// capture.
pub fn demo_bins() -> Vec<u8> {
    (0..1024)
        .map(|i| ((i as f32 * 0.05).sin() * 100.0 + 100.0) as u8)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[derive(Debug, Clone, PartialEq)]
    enum Op {
        Clear,
        Circle { cx: f32, cy: f32, r: f32, color: Rgb },
        Line { x0: f32, y0: f32, x1: f32, y1: f32, stroke: Stroke },
    }

    struct Recorder {
        w: f32,
        h: f32,
        ops: Vec<Op>,
    }

    impl Recorder {
        fn new(w: f32, h: f32) -> Self {
            Self { w, h, ops: Vec::new() }
        }
    }

    impl Surface for Recorder {
        fn size(&self) -> (f32, f32) {
            (self.w, self.h)
        }

        fn clear(&mut self) {
            self.ops.push(Op::Clear);
        }

        fn fill_circle(&mut self, cx: f32, cy: f32, r: f32, color: Rgb) {
            self.ops.push(Op::Circle { cx, cy, r, color });
        }

        fn stroke_line(&mut self, x0: f32, y0: f32, x1: f32, y1: f32, stroke: Stroke) {
            self.ops.push(Op::Line { x0, y0, x1, y1, stroke });
        }
    }

    #[test]
    fn bin_mapping_stays_in_range() {
        let n = 1024;
        for bar_count in 1..=n {
            for i in 0..bar_count {
                let idx = bin_for_bar(i, bar_count, n);
                assert!(idx < n, "bar {i}/{bar_count} mapped to {idx}");
            }
        }
    }

    #[test]
    fn bin_mapping_truncates_toward_zero() {
        // 3 bars over 8 bins: 0, 2.66 -> 2, 5.33 -> 5
        assert_eq!(bin_for_bar(0, 3, 8), 0);
        assert_eq!(bin_for_bar(1, 3, 8), 2);
        assert_eq!(bin_for_bar(2, 3, 8), 5);
    }

    #[test]
    fn height_clamps_only_at_the_top() {
        for byte in [0u8, 1, 127, 200, 255] {
            for sens in [0u16, 25, 50, 100, 200] {
                let raw = (byte as f32 / 255.0) * (sens as f32 / 50.0);
                let h = bar_height(byte, sens);
                if raw >= 1.0 {
                    assert_eq!(h, 1.0);
                } else {
                    assert_relative_eq!(h, raw);
                }
                assert!(h >= 0.0);
            }
        }
        assert_eq!(bar_height(255, 0), 0.0);
    }

    #[test]
    fn neutral_sensitivity_passes_the_byte_through() {
        let h = bar_height(127, 50);
        assert_relative_eq!(h, 127.0 / 255.0, epsilon = 1e-6);
        // bar length on a 400x400 surface, outer radius 160
        assert_relative_eq!(10.0 + h * (160.0 * 0.7), 65.7804, epsilon = 1e-3);
    }

    #[test]
    fn doubled_gain_saturates_to_max_length() {
        let mut rec = Recorder::new(400.0, 400.0);
        let bins = vec![255u8; 1024];
        draw_frame(&mut rec, &bins, &Settings::new(100, 8));

        // bar 0 points along +x: inner at 0.2R = 32, outer at 10 + 0.7R = 122
        match &rec.ops[2] {
            Op::Line { x0, y0, x1, y1, .. } => {
                assert_relative_eq!(*x0, 232.0, epsilon = 1e-3);
                assert_relative_eq!(*y0, 200.0, epsilon = 1e-3);
                assert_relative_eq!(*x1, 322.0, epsilon = 1e-3);
                assert_relative_eq!(*y1, 200.0, epsilon = 1e-3);
            }
            op => panic!("expected a line, got {op:?}"),
        }
    }

    #[test]
    fn frame_layout_is_clear_backdrop_bars_hub() {
        let mut rec = Recorder::new(400.0, 400.0);
        let settings = Settings::new(50, 60);
        draw_frame(&mut rec, &demo_bins(), &settings);

        assert_eq!(rec.ops.len(), 2 + settings.bar_count + 1);
        assert_eq!(rec.ops[0], Op::Clear);
        assert_eq!(
            rec.ops[1],
            Op::Circle { cx: 200.0, cy: 200.0, r: 160.0, color: BACKDROP }
        );
        assert_eq!(
            rec.ops[rec.ops.len() - 1],
            Op::Circle { cx: 200.0, cy: 200.0, r: HUB_RADIUS, color: HUB }
        );
    }

    #[test]
    fn identical_inputs_replay_the_same_primitives() {
        let bins = demo_bins();
        let settings = Settings::new(80, 33);

        let mut a = Recorder::new(400.0, 400.0);
        let mut b = Recorder::new(400.0, 400.0);
        draw_frame(&mut a, &bins, &settings);
        draw_frame(&mut b, &bins, &settings);

        assert_eq!(a.ops, b.ops);
    }

    #[test]
    fn empty_spectrum_draws_backdrop_and_hub_only() {
        let mut rec = Recorder::new(400.0, 400.0);
        draw_frame(&mut rec, &[], &Settings::new(50, 60));

        assert_eq!(rec.ops.len(), 3);
        assert_eq!(rec.ops[0], Op::Clear);
        assert!(matches!(rec.ops[1], Op::Circle { r, .. } if r == 160.0));
        assert!(matches!(rec.ops[2], Op::Circle { r, .. } if r == HUB_RADIUS));
    }

    #[test]
    fn preview_draws_without_any_capture() {
        // demo bins feed the same routine; nothing about it needs a device
        let mut rec = Recorder::new(400.0, 400.0);
        draw_frame(&mut rec, &demo_bins(), &Settings::new(50, 60));
        assert!(!rec.ops.is_empty());
    }

    #[test]
    fn demo_bins_look_like_the_reference_wave() {
        let bins = demo_bins();
        assert_eq!(bins.len(), 1024);
        assert_eq!(bins[0], 100);
        assert!(bins.iter().all(|&b| b <= 200));
        // the wave actually moves
        assert!(bins.iter().any(|&b| b < 20));
        assert!(bins.iter().any(|&b| b > 180));
    }

    #[test]
    fn settings_clamp_to_the_slider_ranges() {
        let s = Settings::new(9999, 1);
        assert_eq!(s.sensitivity, *SENSITIVITY_RANGE.end());
        assert_eq!(s.bar_count, *BAR_COUNT_RANGE.start());

        let mut s = Settings::new(0, 180);
        s.nudge_sensitivity(-5);
        assert_eq!(s.sensitivity, 0);
        s.nudge_bar_count(4);
        assert_eq!(s.bar_count, 180);
    }
}
