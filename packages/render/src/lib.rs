//! # Mailcraft Render
//!
//! Turns template documents into virtual DOM trees and HTML.
//!
//! ```text
//! Document ──► layout (read path) ──► VNode ──► html
//!                 ▲
//!                 └── editor canvas decorates the same nodes
//! ```
//!
//! [`render`] is the only entry point a read-only host needs.

pub mod css;
pub mod html;
pub mod layout;
pub mod preview;
pub mod vdom;

pub use html::{render_email_html, to_html, HtmlOptions};
pub use layout::{RenderOptions, DEFAULT_CONTENT_WIDTH};
pub use preview::{render, render_with};
pub use vdom::VNode;
