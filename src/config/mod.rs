//! Configuration management for portscout.
//!
//! Settings are optional: built-in defaults apply unless a JSON settings file
//! is given on the command line or found in the XDG config directory.

mod settings;

pub use settings::{Paths, Settings};
