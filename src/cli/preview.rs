use crate::common::Result;
use opencv::core::{Mat, Point, Rect, Scalar};
use opencv::{highgui, imgproc};

const KEY_ESC: i32 = 27;
const KEY_QUIT: i32 = 'q' as i32;

/// Live preview window. Strictly optional: headless runs never construct
/// one, and no highgui call happens outside this module.
pub struct Preview {
    window: String,
}

impl Preview {
    pub fn open(title: &str) -> Result<Self> {
        highgui::named_window(title, highgui::WINDOW_AUTOSIZE)?;
        Ok(Self {
            window: title.to_string(),
        })
    }

    pub fn show(&self, frame: &Mat) -> Result<()> {
        highgui::imshow(&self.window, frame)?;
        Ok(())
    }

    /// Pump the UI event loop for `delay_ms` and report whether the operator
    /// asked to quit (Esc or q).
    pub fn poll_quit(&self, delay_ms: i32) -> Result<bool> {
        let key = highgui::wait_key(delay_ms)?;
        Ok(key == KEY_ESC || key == KEY_QUIT)
    }
}

impl Drop for Preview {
    fn drop(&mut self) {
        if let Err(e) = highgui::destroy_window(&self.window) {
            tracing::warn!("failed to destroy window {}: {}", self.window, e);
        }
    }
}

fn box_color() -> Scalar {
    // green, matching the enrollment/recognition overlays
    Scalar::new(0.0, 255.0, 0.0, 0.0)
}

fn text_color() -> Scalar {
    Scalar::new(0.0, 255.0, 127.0, 0.0)
}

pub fn draw_face_box(frame: &mut Mat, face: Rect) -> Result<()> {
    imgproc::rectangle(frame, face, box_color(), 2, imgproc::LINE_8, 0)?;
    Ok(())
}

pub fn draw_label(frame: &mut Mat, text: &str, origin: Point) -> Result<()> {
    imgproc::put_text(
        frame,
        text,
        origin,
        imgproc::FONT_HERSHEY_COMPLEX,
        1.0,
        text_color(),
        2,
        imgproc::LINE_8,
        false,
    )?;
    Ok(())
}
