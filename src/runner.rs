//! Bus message dispatch loop
//!
//! Drives the assembled chain through Idle -> Running -> Stopped: start
//! playback, block on the bus classifying messages one at a time in
//! arrival order, and tear the chain down once a terminating message
//! arrives.

use gstreamer as gst;

use crate::error::{ViewerError, ViewerResult};
use crate::pipeline::ViewerPipeline;

/// Placeholder logged when a bus message carries no debug detail
const NO_DEBUG: &str = "(none)";

/// The bus messages the driver reacts to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BusEvent {
    Error { message: String, debug: String },
    Warning { message: String, debug: String },
    Eos,
    Other,
}

/// Decision taken after dispatching one event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Stop(Termination),
}

/// Why the loop stopped
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Termination {
    EndOfStream,
    Failed { message: String, debug: String },
}

/// Decode a bus message into the event vocabulary the driver understands
pub fn classify(msg: &gst::Message) -> BusEvent {
    match msg.view() {
        gst::MessageView::Error(err) => BusEvent::Error {
            message: err.error().to_string(),
            debug: err
                .debug()
                .map(|d| d.to_string())
                .unwrap_or_else(|| NO_DEBUG.to_string()),
        },
        gst::MessageView::Warning(warn) => BusEvent::Warning {
            message: warn.error().to_string(),
            debug: warn
                .debug()
                .map(|d| d.to_string())
                .unwrap_or_else(|| NO_DEBUG.to_string()),
        },
        gst::MessageView::Eos(..) => BusEvent::Eos,
        _ => BusEvent::Other,
    }
}

/// Decide whether the loop keeps running after an event.
///
/// Errors stop the loop. Warnings are logged and playback continues; the
/// stream is still usable after one. End-of-stream stops silently.
pub fn dispatch(event: &BusEvent) -> LoopControl {
    match event {
        BusEvent::Error { message, debug } => {
            log::error!("Got ERROR: {} ({})", message, debug);
            LoopControl::Stop(Termination::Failed {
                message: message.clone(),
                debug: debug.clone(),
            })
        }
        BusEvent::Warning { message, debug } => {
            log::warn!("Got WARNING: {} ({})", message, debug);
            LoopControl::Continue
        }
        BusEvent::Eos => {
            log::info!("End of stream");
            LoopControl::Stop(Termination::EndOfStream)
        }
        BusEvent::Other => LoopControl::Continue,
    }
}

/// Run the chain until it terminates.
///
/// Blocks the calling thread for the whole Running phase. Returns `Ok`
/// when the stream ended normally and `ViewerError::Stream` when it was
/// terminated by an error message, so the caller can exit non-zero.
pub fn run(pipeline: &mut ViewerPipeline) -> ViewerResult<()> {
    pipeline.start()?;

    let bus = pipeline.bus();
    let mut termination = Termination::EndOfStream;
    for msg in bus.iter_timed(gst::ClockTime::NONE) {
        match dispatch(&classify(&msg)) {
            LoopControl::Continue => {}
            LoopControl::Stop(t) => {
                termination = t;
                break;
            }
        }
    }

    pipeline.stop()?;

    match termination {
        Termination::EndOfStream => Ok(()),
        Termination::Failed { message, debug } => Err(ViewerError::Stream { message, debug }),
    }
}
