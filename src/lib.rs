pub mod buffer;
pub mod capture;
pub mod config;
pub mod raster;
pub mod scene;
pub mod spectrum;
pub mod surface;
pub mod term;
pub mod utils;

pub use buffer::SampleRing;
pub use capture::{Capture, CaptureAccessError, CaptureSession};
pub use config::Config;
pub use raster::Raster;
pub use scene::{demo_bins, draw_frame, Settings};
pub use spectrum::SpectrumAnalyzer;
pub use surface::{hsl, Rgb, Stroke, Surface};
pub use term::{layout_for, Layout, Status};
