//! Overlay state shared between the caps-changed and draw callbacks.

use gstreamer as gst;
use gstreamer_video as gst_video;

use crate::config::OverlayConfig;

/// Negotiated video geometry plus the stroke parameters for the marker
/// line.
///
/// The geometry is only meaningful while `valid` is true; `draw` no-ops
/// otherwise. Written by the caps-changed callback, read by the draw
/// callback; the host element never runs the two concurrently.
#[derive(Debug, Clone)]
pub struct OverlayState {
    valid: bool,
    width: u32,
    height: u32,
    line_width: f64,
    color: [f64; 4],
}

impl OverlayState {
    /// Create an overlay state with no geometry yet
    pub fn new(config: &OverlayConfig) -> Self {
        Self {
            valid: false,
            width: 0,
            height: 0,
            line_width: config.line_width,
            color: config.color,
        }
    }

    /// Record the geometry from freshly negotiated caps.
    ///
    /// A parse failure only marks the state invalid so that subsequent
    /// draws are skipped; it is never propagated to the caller.
    pub fn update_from_caps(&mut self, caps: &gst::Caps) {
        match gst_video::VideoInfo::from_caps(caps) {
            Ok(info) => {
                self.width = info.width();
                self.height = info.height();
                self.valid = true;
            }
            Err(err) => {
                log::warn!("Could not parse negotiated caps: {}", err);
                self.valid = false;
            }
        }
    }

    /// Stroke the marker line onto the current frame.
    ///
    /// Runs on the streaming thread, once per frame, so it must not block.
    pub fn draw(&self, cr: &cairo::Context) {
        if !self.valid {
            return;
        }

        let ((x0, y0), (x1, y1)) = center_line(self.width, self.height);
        let [r, g, b, a] = self.color;

        cr.set_line_width(self.line_width);
        cr.move_to(x0, y0);
        cr.line_to(x1, y1);
        cr.set_source_rgba(r, g, b, a);
        if let Err(err) = cr.stroke() {
            log::warn!("Overlay stroke failed: {}", err);
        }
    }

    /// Whether negotiated geometry is currently known
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Last negotiated frame size
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// Endpoints of the vertical marker line for a frame of the given size,
/// spanning the full height at the horizontal center.
pub fn center_line(width: u32, height: u32) -> ((f64, f64), (f64, f64)) {
    let x = f64::from(width / 2);
    ((x, 0.0), (x, f64::from(height)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OverlayConfig;

    fn video_caps(width: i32, height: i32) -> gst::Caps {
        gst::Caps::builder("video/x-raw")
            .field("format", "BGRA")
            .field("width", width)
            .field("height", height)
            .field("framerate", gst::Fraction::new(30, 1))
            .build()
    }

    /// Render through a fresh image surface and return the raw pixel bytes.
    fn render(state: &OverlayState, width: i32, height: i32) -> (Vec<u8>, usize) {
        let mut surface = cairo::ImageSurface::create(cairo::Format::ARgb32, width, height).unwrap();
        {
            let cr = cairo::Context::new(&surface).unwrap();
            state.draw(&cr);
        }
        surface.flush();
        let stride = surface.stride() as usize;
        let data = surface.data().unwrap().to_vec();
        (data, stride)
    }

    #[test]
    fn test_center_line_geometry() {
        let ((x0, y0), (x1, y1)) = center_line(320, 240);
        assert_eq!((x0, y0), (160.0, 0.0));
        assert_eq!((x1, y1), (160.0, 240.0));

        // Odd widths truncate to the lower pixel column
        let ((x0, _), _) = center_line(321, 240);
        assert_eq!(x0, 160.0);
    }

    #[test]
    fn test_caps_update_stores_geometry() {
        gst::init().unwrap();

        let mut state = OverlayState::new(&OverlayConfig::default());
        assert!(!state.is_valid());

        state.update_from_caps(&video_caps(320, 240));
        assert!(state.is_valid());
        assert_eq!(state.dimensions(), (320, 240));
    }

    #[test]
    fn test_malformed_caps_invalidate_state() {
        gst::init().unwrap();

        let mut state = OverlayState::new(&OverlayConfig::default());
        state.update_from_caps(&video_caps(320, 240));
        assert!(state.is_valid());

        // Non-video caps cannot be parsed into a video info
        state.update_from_caps(&gst::Caps::builder("application/x-rtp").build());
        assert!(!state.is_valid());
    }

    #[test]
    fn test_draw_without_geometry_leaves_surface_untouched() {
        let state = OverlayState::new(&OverlayConfig::default());
        let (data, _) = render(&state, 64, 64);

        assert!(data.iter().all(|&byte| byte == 0));
    }

    #[test]
    fn test_draw_strokes_single_centered_line() {
        gst::init().unwrap();

        let mut state = OverlayState::new(&OverlayConfig::default());
        state.update_from_caps(&video_caps(320, 240));

        let (data, stride) = render(&state, 320, 240);

        let has_ink = |x: usize, y: usize| -> bool {
            let offset = y * stride + x * 4;
            data[offset..offset + 4].iter().any(|&byte| byte != 0)
        };

        // The 0.5-wide stroke at x=160 covers parts of columns 159 and 160
        // for the full frame height, and nothing else.
        for y in [0, 120, 239] {
            assert!(
                has_ink(159, y) || has_ink(160, y),
                "no ink at center in row {}",
                y
            );
        }
        for x in [0, 80, 158, 162, 240, 319] {
            assert!(!has_ink(x, 120), "unexpected ink in column {}", x);
        }
    }

    #[test]
    fn test_draw_skipped_after_caps_parse_failure() {
        gst::init().unwrap();

        let mut state = OverlayState::new(&OverlayConfig::default());
        state.update_from_caps(&video_caps(320, 240));
        state.update_from_caps(&gst::Caps::builder("application/x-rtp").build());

        let (data, _) = render(&state, 320, 240);
        assert!(data.iter().all(|&byte| byte == 0));
    }
}
