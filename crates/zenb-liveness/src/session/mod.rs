//! Session controller
//!
//! Two execution modes over one shared core (`PulseExtractor` + `LivenessGate`):
//! - `StreamingSession` - push one sample per frame, get a result back immediately
//! - `BufferedSession` - collect a recording, then `analyze` once with diagnostics
//!
//! `SessionRegistry` manages many streaming sessions behind opaque handles.

mod buffered;
mod extractor;
mod registry;
mod streaming;

pub use buffered::{BufferedSession, ScanDiagnostics, ScanReport};
pub use extractor::{PulseExtractor, PulseStep};
pub use registry::{SessionError, SessionRegistry};
pub use streaming::StreamingSession;
