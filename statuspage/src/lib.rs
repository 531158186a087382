//! Status page fragments
//!
//! Static HTML fragments with named placeholders, filled in from typed rows.
//!
//! Submodules:
//! - `template`: placeholder/section substitution with HTML escaping
//! - `subscribers`: subscriber table of the coordination service
pub mod subscribers;
pub mod template;

pub use subscribers::{SUBSCRIBERS_TEMPLATE, SubscriberRow, render_subscribers};
pub use template::{Context, Template, TemplateError};
