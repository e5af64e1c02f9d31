//! Frame adapter
//!
//! Turns a raw camera frame plus a region of interest into a [`crate::ColorSample`].
//! Face detection stays with the caller (MediaPipe, ARKit, ...); only the
//! rectangle is passed in.
//!
//! # Example
//!
//! ```ignore
//! use zenb_liveness::vision::{roi_color_sample, RoiRect};
//!
//! let roi = RoiRect::new(face.x, face.y, face.w, face.h / 3); // forehead band
//! if let Some(sample) = roi_color_sample(&frame_bytes, 640, 480, 4, roi, timestamp_us) {
//!     let result = session.push(sample);
//! }
//! ```

mod roi;

pub use roi::{roi_color_sample, roi_mean_color, RoiRect};
