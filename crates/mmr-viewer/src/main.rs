// File: crates/mmr-viewer/src/main.rs
// Summary: Interactive window for the progression chart: wheel zoom, drag pan, hover/pin tooltip and a
// debounced resize, rendered to RGBA on the CPU and blitted with softbuffer.

use std::num::NonZeroU32;
use std::time::Instant;

use anyhow::{anyhow, Context, Result};
use mmr_chart::{theme, Chart, ChartConfig, FeedSource, ResizeDebouncer, Size};
use winit::dpi::{LogicalSize, PhysicalPosition};
use winit::event::{ElementState, Event, KeyboardInput, MouseButton, MouseScrollDelta, VirtualKeyCode, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::WindowBuilder;

/// A press that moves less than this (px) before release counts as a click.
const CLICK_SLOP: f64 = 4.0;

fn init_logging() -> Result<()> {
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{} {:<5} {}] {}",
                chrono::Local::now().format("%H:%M:%S%.3f"),
                record.level(),
                record.target(),
                message
            ))
        })
        .level(log::LevelFilter::Info)
        .chain(std::io::stderr())
        .apply()?;
    Ok(())
}

fn main() -> Result<()> {
    init_logging()?;

    let mut args = std::env::args().skip(1);
    let feed = args.next().unwrap_or_else(|| "data/mmr-data.json".to_string());
    let config = match args.next() {
        Some(path) => ChartConfig::load(&path).with_context(|| format!("failed to load config '{path}'"))?,
        None => ChartConfig::default(),
    };
    let debounce = config.resize_debounce();

    // A feed that fails to load leaves an empty window; the error is already logged.
    let mut chart = Chart::from_source(&FeedSource::parse(&feed), config).ok();

    let title = chart
        .as_ref()
        .map(|c| c.dataset().profile.username.clone())
        .filter(|u| !u.is_empty())
        .map_or_else(|| "MMR Progression".to_string(), |u| format!("MMR Progression: {u}"));

    let event_loop = EventLoop::new();
    let window = WindowBuilder::new()
        .with_title(title)
        .with_inner_size(LogicalSize::new(960.0, 420.0))
        .build(&event_loop)
        .context("failed to create window")?;

    let context = unsafe { softbuffer::Context::new(&window) }.map_err(|e| anyhow!("softbuffer context: {e}"))?;
    let mut surface =
        unsafe { softbuffer::Surface::new(&context, &window) }.map_err(|e| anyhow!("softbuffer surface: {e}"))?;

    if let Some(ch) = chart.as_mut() {
        let s = window.inner_size();
        if let Err(e) = ch.resize(Size::new(s.width as f32, s.height as f32)) {
            log::warn!("initial size unusable: {e}");
        }
    }

    let mut debouncer = ResizeDebouncer::new(debounce);
    let mut cursor = PhysicalPosition::new(0.0f64, 0.0f64);
    let mut pressed_at: Option<PhysicalPosition<f64>> = None;
    let mut theme_index = 0usize;

    event_loop.run(move |event, _, control_flow| {
        match event {
            Event::WindowEvent { event, .. } => {
                let Some(ch) = chart.as_mut() else {
                    if let WindowEvent::CloseRequested = event {
                        *control_flow = ControlFlow::Exit;
                    }
                    return;
                };
                let (x, y) = (cursor.x as f32, cursor.y as f32);
                let redraw = match event {
                    WindowEvent::CloseRequested => {
                        *control_flow = ControlFlow::Exit;
                        false
                    }
                    WindowEvent::Resized(size) => {
                        debouncer.schedule(Instant::now(), Size::new(size.width as f32, size.height as f32));
                        true
                    }
                    WindowEvent::CursorMoved { position, .. } => {
                        cursor = position;
                        ch.on_pointer_move(position.x as f32, position.y as f32);
                        true
                    }
                    WindowEvent::CursorLeft { .. } => {
                        ch.on_pointer_leave();
                        true
                    }
                    WindowEvent::MouseWheel { delta, .. } => {
                        // winit reports scrolling up as positive; the chart zooms in on negative deltas.
                        let dy = match delta {
                            MouseScrollDelta::LineDelta(_, y) => -y,
                            MouseScrollDelta::PixelDelta(p) => -(p.y as f32),
                        };
                        ch.on_wheel(x, y, dy)
                    }
                    WindowEvent::MouseInput { state, button: MouseButton::Left, .. } => match state {
                        ElementState::Pressed => {
                            pressed_at = Some(cursor);
                            ch.on_pointer_down(x, y)
                        }
                        ElementState::Released => {
                            ch.on_pointer_up();
                            let still = pressed_at
                                .take()
                                .is_some_and(|p| (p.x - cursor.x).hypot(p.y - cursor.y) < CLICK_SLOP);
                            if still {
                                if let Some(index) = ch.on_click(x, y) {
                                    log::debug!("pinned sample #{index}");
                                }
                            }
                            true
                        }
                    },
                    WindowEvent::KeyboardInput {
                        input: KeyboardInput { state: ElementState::Pressed, virtual_keycode: Some(key), .. },
                        ..
                    } => match key {
                        VirtualKeyCode::R | VirtualKeyCode::Escape => ch.reset_zoom(),
                        VirtualKeyCode::T => {
                            let presets = theme::presets();
                            theme_index = (theme_index + 1) % presets.len();
                            ch.set_theme(presets[theme_index]);
                            true
                        }
                        _ => false,
                    },
                    _ => false,
                };
                if redraw {
                    window.request_redraw();
                }
            }
            Event::MainEventsCleared => {
                if let Some(size) = debouncer.poll(Instant::now()) {
                    if let Some(ch) = chart.as_mut() {
                        if let Err(e) = ch.resize(size) {
                            log::warn!("resize skipped: {e}");
                        }
                    }
                    window.request_redraw();
                }
            }
            Event::RedrawRequested(_) => {
                let s = window.inner_size();
                if let Err(e) = draw(&mut surface, chart.as_ref(), s.width, s.height) {
                    log::warn!("frame dropped: {e}");
                }
            }
            _ => {}
        }

        if !matches!(*control_flow, ControlFlow::ExitWithCode(_)) {
            *control_flow = match debouncer.deadline() {
                Some(deadline) => ControlFlow::WaitUntil(deadline),
                None => ControlFlow::Wait,
            };
        }
    })
}

fn pack(r: u8, g: u8, b: u8) -> u32 {
    ((r as u32) << 16) | ((g as u32) << 8) | b as u32
}

/// Blit the chart's current frame into the window buffer (0RGB). Until a pending
/// resize lands the frame keeps its old size; the rest is filled with the background.
fn draw(surface: &mut softbuffer::Surface, chart: Option<&Chart>, width: u32, height: u32) -> Result<()> {
    let (Some(w), Some(h)) = (NonZeroU32::new(width), NonZeroU32::new(height)) else {
        return Ok(());
    };
    surface.resize(w, h).map_err(|e| anyhow!("surface resize: {e}"))?;
    let mut buffer = surface.buffer_mut().map_err(|e| anyhow!("surface buffer: {e}"))?;

    let bg = chart.map_or(theme::Theme::default().background, |c| c.theme().background);
    buffer.fill(pack(bg.r(), bg.g(), bg.b()));

    if let Some(ch) = chart {
        let (rgba, fw, fh, stride) = ch.render_to_rgba8(&ch.render_options())?;
        let cols = fw.min(width) as usize;
        for row in 0..fh.min(height) as usize {
            let src = &rgba[row * stride..row * stride + cols * 4];
            let dst = &mut buffer[row * width as usize..row * width as usize + cols];
            for (px, out) in src.chunks_exact(4).zip(dst.iter_mut()) {
                *out = pack(px[0], px[1], px[2]);
            }
        }
    }

    buffer.present().map_err(|e| anyhow!("present: {e}"))?;
    Ok(())
}
