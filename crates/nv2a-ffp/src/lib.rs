//! `nv2a-ffp` tracks the fixed-function (legacy) pipeline state of an NV2A Kelvin command stream
//! and renders it as a human-readable per-frame report.
//!
//! The crate is fed already-parsed `(opcode, parameter)` method pairs:
//! - [`TrackedOpcodes`] expands a set of interesting base opcodes into every raw opcode they
//!   cover, using a [`DescriptorRegistry`] (see [`kelvin::registry`]).
//! - [`FrameState`] keeps the last parameter written to each tracked opcode, reassembles fields
//!   ([`FrameState::get_raw`]) and decodes them through a [`FormatterRegistry`]
//!   ([`FrameState::decode`]).
//! - [`FrameState::report`] builds the text summary.
//!
//! ```
//! use nv2a_ffp::{kelvin, FrameState, TrackedOpcodes};
//!
//! let tracked = TrackedOpcodes::kelvin()?;
//! let formatters = kelvin::formatters();
//! let mut frame = FrameState::new(&tracked, &formatters);
//! frame.update(kelvin::SET_SKIN_MODE, 1);
//! assert!(frame.report().contains("Skinning mode: 2G"));
//! # Ok::<(), nv2a_ffp::FfpError>(())
//! ```

mod decode;
mod descriptor;
mod error;
mod format;
mod report;
mod state;
mod tracked;

pub mod kelvin;

pub use decode::Decoded;
pub use descriptor::{DescriptorRegistry, OpcodeDescriptor};
pub use error::FfpError;
pub use format::{as_float, float_bits, hex, Formatter, FormatterRegistry};
pub use report::ReportConfig;
pub use state::{FrameState, RawValue};
pub use tracked::TrackedOpcodes;
