//! Client-side orchestration for the redstr transformation service.
//!
//! The service owns every transform function; this crate holds the
//! interaction state of one client session and mediates each call to
//! `GET {base}/functions` and `POST {base}/transform`.

pub mod api;
pub mod clipboard;
pub mod config;
pub mod controller;
pub mod error;
pub mod session;

pub use api::{HttpTransformApi, TransformApi};
pub use clipboard::{ClipboardWriter, SystemClipboard};
pub use config::{load_settings, ClientSettings};
pub use controller::{
    ControllerEvent, ControllerOptions, ResponseOrdering, TransformController,
    EMPTY_INPUT_MESSAGE, TRANSFORM_FAILED_MESSAGE,
};
pub use error::ClientError;
pub use session::{SessionState, DEFAULT_FUNCTION};
pub use shared;
