//! PNG export of the rendered chart.
//!
//! egui has no off-screen renderer, so the chart is exported by asking the
//! viewport for a screenshot and writing the captured frame with `image`.

use eframe::egui;
use image::{Rgba, RgbaImage};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Frames drawn before a capture is requested, so plot bounds have settled.
const FRAMES_BEFORE_CAPTURE: u64 = 2;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("failed to write {path:?}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("captured image has invalid size {width}x{height}")]
    InvalidSize { width: usize, height: usize },
}

/// Convert a captured egui frame to an RGBA image buffer.
pub fn to_rgba_image(capture: &egui::ColorImage) -> Result<RgbaImage, ExportError> {
    let [width, height] = capture.size;
    if width == 0 || height == 0 || capture.pixels.len() != width * height {
        return Err(ExportError::InvalidSize { width, height });
    }

    let mut out = RgbaImage::new(width as u32, height as u32);
    for (i, pixel) in capture.pixels.iter().enumerate() {
        let [r, g, b, a] = pixel.to_srgba_unmultiplied();
        out.put_pixel((i % width) as u32, (i / width) as u32, Rgba([r, g, b, a]));
    }
    Ok(out)
}

/// Write a captured frame as PNG.
pub fn save_png(capture: &egui::ColorImage, path: &Path) -> Result<(), ExportError> {
    let out = to_rgba_image(capture)?;
    out.save_with_format(path, image::ImageFormat::Png)
        .map_err(|source| ExportError::Image { path: path.to_path_buf(), source })
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum ExportStage {
    /// Waiting for enough frames before asking for a screenshot.
    Waiting { since_frame: u64 },
    /// Screenshot command sent, waiting for the image event.
    Requested,
}

/// What the exporter needs from the viewport at a given frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ExportStep {
    /// Nothing queued.
    Idle,
    /// Still settling; another frame must be drawn even if the window is idle.
    Settle,
    /// Send the screenshot command now.
    Capture,
    /// Screenshot requested; look for the image event.
    Collect,
}

/// A single pending chart export.
#[derive(Debug, Default)]
pub struct Exporter {
    pending: Option<(PathBuf, ExportStage)>,
}

impl Exporter {
    /// Queue an export of the next settled frame, replacing any pending one.
    pub fn request(&mut self, path: PathBuf, current_frame: u64) {
        log::info!("Chart export to {:?} queued", path);
        self.pending = Some((path, ExportStage::Waiting { since_frame: current_frame }));
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    fn step(&self, frame: u64) -> ExportStep {
        match &self.pending {
            None => ExportStep::Idle,
            Some((_, ExportStage::Waiting { since_frame })) if frame >= since_frame + FRAMES_BEFORE_CAPTURE => {
                ExportStep::Capture
            }
            Some((_, ExportStage::Waiting { .. })) => ExportStep::Settle,
            Some((_, ExportStage::Requested)) => ExportStep::Collect,
        }
    }

    /// Advance the export state machine once per frame.
    ///
    /// Sends the screenshot command when due and saves the image once the
    /// screenshot event arrives. Failures are logged; the viewer keeps running.
    pub fn drive(&mut self, ctx: &egui::Context, frame: u64) {
        match self.step(frame) {
            ExportStep::Idle => return,
            ExportStep::Settle => {
                ctx.request_repaint();
                return;
            }
            ExportStep::Capture => {
                if let Some((_, stage)) = self.pending.as_mut() {
                    *stage = ExportStage::Requested;
                }
                ctx.send_viewport_cmd(egui::ViewportCommand::Screenshot(Default::default()));
                ctx.request_repaint();
                return;
            }
            ExportStep::Collect => {}
        }

        let capture = ctx.input(|i| {
            i.events.iter().rev().find_map(|e| match e {
                egui::Event::Screenshot { image, .. } => Some(image.clone()),
                _ => None,
            })
        });

        match capture {
            Some(image) => {
                if let Some((path, _)) = self.pending.take() {
                    match save_png(&image, &path) {
                        Ok(()) => log::info!("Saved chart to {:?}", path),
                        Err(e) => log::error!("Chart export failed: {}", e),
                    }
                }
            }
            None => ctx.request_repaint(),
        }
    }
}
