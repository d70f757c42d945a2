use anyhow::Result;
use crossterm::{
    cursor, event, execute, queue,
    terminal::{self, ClearType},
};
use rondo::{
    buffer::SampleRing,
    capture::Capture,
    config::Config,
    raster::Raster,
    scene::{self, Settings},
    spectrum::SpectrumAnalyzer,
    surface::Surface,
    term::{self, Status},
    utils::scopeguard,
};
use std::{
    io::{stdout, Write},
    sync::{Arc, Mutex},
    thread,
    time::{Duration, Instant},
};

const CANVAS_PX: usize = 400;

fn reset_ring(shared: &Arc<Mutex<SampleRing>>, cap: usize) {
    if let Ok(mut ring) = shared.lock() {
        *ring = SampleRing::new(cap);
    }
}

fn main() -> Result<()> {
    let cfg = Config::load()?;

    let mut out =
        std::io::BufWriter::with_capacity(1024 * 1024, stdout());
    terminal::enable_raw_mode()?;
    execute!(
        out,
        terminal::EnterAlternateScreen,
        cursor::Hide,
        terminal::Clear(ClearType::All),
    )?;
    out.flush()?;

    let _cleanup = scopeguard::guard((), |_| {
        let mut out = stdout();
        let _ = execute!(
            out,
            cursor::Show,
            terminal::LeaveAlternateScreen
        );
        let _ = terminal::disable_raw_mode();
    });

    let ring_cap = (48_000usize / 10).max(cfg.fft_size * 4);
    let shared = Arc::new(Mutex::new(SampleRing::new(ring_cap)));

    let mut capture = Capture::new();
    let mut analyzer = SpectrumAnalyzer::new(cfg.fft_size);
    let mut settings = Settings::new(cfg.sensitivity, cfg.bar_count);
    let mut raster = Raster::new(CANVAS_PX, CANVAS_PX);
    let mut status = Status::Idle;

    let (mut w, mut h) = terminal::size()?;
    let mut lay = term::layout_for(w, h, term::TOP_PAD);
    let mut frame: Vec<u8> = Vec::with_capacity(256 * 1024);

    // static preview until a capture session begins
    scene::draw_frame(&mut raster, &scene::demo_bins(), &settings);
    let mut dirty = true;

    let mut last = Instant::now();
    let target_dt = Duration::from_millis(cfg.target_fps_ms);

    loop {
        if event::poll(Duration::ZERO)? {
            match event::read()? {
                event::Event::Resize(nw, nh) => {
                    w = nw;
                    h = nh;
                    lay = term::layout_for(w, h, term::TOP_PAD);
                    queue!(out, terminal::Clear(ClearType::All))?;
                    out.flush()?;
                    dirty = true;
                }
                event::Event::Key(k) => {
                    use crossterm::event::KeyCode::*;
                    match k.code {
                        Char('q') => return Ok(()),
                        Char('s') | Char('r') => {
                            reset_ring(&shared, ring_cap);
                            analyzer.reset();
                            status = match capture.start(shared.clone()) {
                                Ok(()) => {
                                    let device = capture
                                        .session()
                                        .map(|s| {
                                            format!(
                                                "{} @ {} Hz",
                                                s.label(),
                                                s.sample_rate()
                                            )
                                        })
                                        .unwrap_or_else(|| "mic".into());
                                    Status::Live { device }
                                }
                                Err(e) => Status::Failed(e.to_string()),
                            };
                            dirty = true;
                        }
                        Char('x') => {
                            // stopping when idle is a no-op
                            if capture.is_active() {
                                capture.stop();
                                raster.clear();
                                status = Status::Stopped;
                                dirty = true;
                            }
                        }
                        Char('d') => {
                            if !capture.is_active() {
                                scene::draw_frame(
                                    &mut raster,
                                    &scene::demo_bins(),
                                    &settings,
                                );
                                dirty = true;
                            }
                        }
                        Up => {
                            settings.nudge_sensitivity(5);
                            dirty = true;
                        }
                        Down => {
                            settings.nudge_sensitivity(-5);
                            dirty = true;
                        }
                        Right => {
                            settings.nudge_bar_count(4);
                            dirty = true;
                        }
                        Left => {
                            settings.nudge_bar_count(-4);
                            dirty = true;
                        }
                        _ => {}
                    }
                }
                _ => {}
            }
        }

        let now = Instant::now();
        let dt = now.duration_since(last);
        if dt < target_dt {
            thread::sleep(target_dt - dt);
        }
        last = Instant::now();

        // the live sample array is only ever read while a session is up
        if capture.is_active() {
            if let Ok(ring) = shared.try_lock() {
                analyzer.refresh(&ring);
            }
            scene::draw_frame(&mut raster, analyzer.bins(), &settings);
            dirty = true;
        }

        if dirty {
            frame.clear();
            term::render_status(&mut frame, w, &status, &settings)?;
            term::render_canvas(&raster, &lay, &mut frame)?;
            out.write_all(&frame)?;
            out.flush()?;
            dirty = false;
        }
    }
}
