//! # API Module
//!
//! HTTP handlers of the short-lived local server that receives the OAuth
//! redirect while the user grants access in the browser.
//!
//! - [`callback`] - Checks the `state` parameter and exchanges the
//!   authorization code for a token.
//!
//! ```rust,ignore
//! use axum::{Router, routing::get};
//! use spotcli::api::callback;
//!
//! let app = Router::new().route("/callback", get(callback));
//! ```

mod callback;

pub use callback::callback;
