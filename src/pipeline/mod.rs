//! GStreamer pipeline assembly
//!
//! Builds the fixed receive chain
//!
//! ```text
//! udpsrc -> queue -> rtpjpegdepay -> jpegdec -> videoconvert
//!   -> cairooverlay -> videoscale -> capsfilter -> videoconvert -> sink
//! ```
//!
//! and wires the overlay callbacks onto the cairooverlay element.
//! Assembly fails fast: a missing element or a failed link is an error,
//! not a warning.

use std::sync::{Arc, Mutex};

use gstreamer as gst;
use gstreamer::prelude::*;

use crate::config::{AppConfig, DisplayConfig, NetworkConfig};
use crate::error::{ViewerError, ViewerResult};
use crate::overlay::OverlayState;

/// The assembled receive/overlay/display chain
pub struct ViewerPipeline {
    pipeline: gst::Pipeline,
    overlay_state: Arc<Mutex<OverlayState>>,
    is_running: bool,
}

impl ViewerPipeline {
    /// Build the chain and register the overlay callbacks
    pub fn new(config: &AppConfig) -> ViewerResult<Self> {
        gst::init()?;

        let pipeline = gst::Pipeline::builder().name("rtpview-receiver").build();

        let source = make_element("udpsrc", "source")?;
        source.set_property("port", i32::from(config.network.port));
        source.set_property("caps", &rtp_caps(&config.network));

        let queue = make_element("queue", "queue")?;
        let rtpjpegdepay = make_element("rtpjpegdepay", "rtpjpegdepay")?;
        let jpegdec = make_element("jpegdec", "jpegdec")?;

        // cairooverlay can only draw into alpha-capable raw video, hence
        // the conversion on each side of it.
        let videoconvert1 = make_element("videoconvert", "videoconvert1")?;
        let overlay = make_element("cairooverlay", "overlay")?;
        let videoscale = make_element("videoscale", "videoscale")?;

        let filter = make_element("capsfilter", "filter")?;
        filter.set_property("caps", &output_caps(&config.display));

        let videoconvert2 = make_element("videoconvert", "videoconvert2")?;
        let sink = make_element(sink_factory(&config.display), "sink")?;

        let overlay_state = Arc::new(Mutex::new(OverlayState::new(&config.overlay)));
        connect_overlay_callbacks(&overlay, &overlay_state);

        pipeline
            .add_many([
                &source,
                &queue,
                &rtpjpegdepay,
                &jpegdec,
                &videoconvert1,
                &overlay,
                &videoscale,
                &filter,
                &videoconvert2,
                &sink,
            ])
            .map_err(|e| ViewerError::Pipeline(e.to_string()))?;

        gst::Element::link_many([
            &source,
            &queue,
            &rtpjpegdepay,
            &jpegdec,
            &videoconvert1,
            &overlay,
            &videoscale,
            &filter,
            &videoconvert2,
            &sink,
        ])
        .map_err(|e| ViewerError::LinkFailed(e.to_string()))?;

        Ok(Self {
            pipeline,
            overlay_state,
            is_running: false,
        })
    }

    /// Start the pipeline
    pub fn start(&mut self) -> ViewerResult<()> {
        self.pipeline.set_state(gst::State::Playing)?;
        self.is_running = true;
        log::info!("Pipeline started");
        Ok(())
    }

    /// Stop the pipeline
    pub fn stop(&mut self) -> ViewerResult<()> {
        self.pipeline.set_state(gst::State::Null)?;
        self.is_running = false;
        log::info!("Pipeline stopped");
        Ok(())
    }

    /// Check if pipeline is running
    pub fn is_running(&self) -> bool {
        self.is_running
    }

    /// The bus carrying messages from the running chain
    pub fn bus(&self) -> gst::Bus {
        self.pipeline.bus().expect("pipeline without a bus")
    }

    /// Look up an element of the chain by name
    pub fn element(&self, name: &str) -> Option<gst::Element> {
        self.pipeline.by_name(name)
    }

    /// Handle onto the state shared with the overlay callbacks
    pub fn overlay_state(&self) -> Arc<Mutex<OverlayState>> {
        Arc::clone(&self.overlay_state)
    }
}

impl Drop for ViewerPipeline {
    fn drop(&mut self) {
        if self.is_running {
            let _ = self.stop();
        }
    }
}

fn make_element(factory: &str, name: &str) -> ViewerResult<gst::Element> {
    gst::ElementFactory::make(factory)
        .name(name)
        .build()
        .map_err(|_| ViewerError::ElementCreationFailed(factory.to_string()))
}

/// Caps announced to udpsrc for the incoming RTP stream
fn rtp_caps(config: &NetworkConfig) -> gst::Caps {
    gst::Caps::builder("application/x-rtp")
        .field("encoding-name", config.encoding.as_str())
        .field("payload", config.payload_type)
        .build()
}

/// Fixed raw-video caps between the scaler and the final conversion
fn output_caps(config: &DisplayConfig) -> gst::Caps {
    gst::Caps::builder("video/x-raw")
        .field("width", config.width)
        .field("height", config.height)
        .build()
}

fn sink_factory(config: &DisplayConfig) -> &str {
    if config.sink == "auto" {
        "autovideosink"
    } else {
        &config.sink
    }
}

/// Hook up the cairooverlay signals: caps-changed records the negotiated
/// geometry, draw strokes the marker line on every frame.
fn connect_overlay_callbacks(overlay: &gst::Element, state: &Arc<Mutex<OverlayState>>) {
    let caps_state = Arc::clone(state);
    overlay.connect("caps-changed", false, move |args| {
        match args[1].get::<gst::Caps>() {
            Ok(caps) => caps_state.lock().unwrap().update_from_caps(&caps),
            Err(err) => log::warn!("caps-changed signal without caps: {}", err),
        }
        None
    });

    let draw_state = Arc::clone(state);
    overlay.connect("draw", false, move |args| {
        match args[1].get::<cairo::Context>() {
            Ok(cr) => draw_state.lock().unwrap().draw(&cr),
            Err(err) => log::warn!("draw signal without a cairo context: {}", err),
        }
        None
    });
}
