//! Per-frame capture of tracked method parameters.

use std::collections::HashMap;

use tracing::trace;

use crate::descriptor::OpcodeDescriptor;
use crate::format::FormatterRegistry;
use crate::tracked::TrackedOpcodes;

/// A field reassembled from raw method parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawValue {
    Scalar(u32),
    Array(Vec<u32>),
    StructArray(Vec<Vec<u32>>),
}

/// The last parameter written to each tracked opcode during one frame.
///
/// A `FrameState` belongs to a single decoding pass; create a new one (or [`reset`](Self::reset)
/// this one) at each frame boundary.
#[derive(Debug, Clone)]
pub struct FrameState<'a> {
    pub(crate) tracked: &'a TrackedOpcodes,
    pub(crate) formatters: &'a FormatterRegistry,
    values: HashMap<u32, u32>,
}

impl<'a> FrameState<'a> {
    pub fn new(tracked: &'a TrackedOpcodes, formatters: &'a FormatterRegistry) -> Self {
        Self {
            tracked,
            formatters,
            values: HashMap::new(),
        }
    }

    /// Records `parameter` for `opcode`. Untracked opcodes are ignored; the last write wins.
    pub fn update(&mut self, opcode: u32, parameter: u32) {
        if !self.tracked.contains(opcode) {
            trace!(opcode, parameter, "ignoring untracked method");
            return;
        }
        self.values.insert(opcode, parameter);
    }

    /// Replays a sequence of `(opcode, parameter)` pairs through [`update`](Self::update).
    pub fn extend<I>(&mut self, commands: I)
    where
        I: IntoIterator<Item = (u32, u32)>,
    {
        for (opcode, parameter) in commands {
            self.update(opcode, parameter);
        }
    }

    /// Forgets every captured parameter.
    pub fn reset(&mut self) {
        self.values.clear();
    }

    /// Number of distinct raw opcodes captured so far.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The parameter last written to a single raw opcode.
    pub fn raw_opcode(&self, opcode: u32) -> Option<u32> {
        self.values.get(&opcode).copied()
    }

    pub fn tracked(&self) -> &'a TrackedOpcodes {
        self.tracked
    }

    fn element(&self, opcode: u32, default: Option<u32>) -> Option<u32> {
        self.raw_opcode(opcode).or(default)
    }

    /// Reassembles the field identified by `base`.
    ///
    /// Array and struct array fields are all-or-nothing: if any element is neither captured nor
    /// covered by `default`, the whole field is `None`. Bases without a descriptor are read as
    /// scalars.
    pub fn get_raw(&self, base: u32, default: Option<u32>) -> Option<RawValue> {
        let Some(descriptor) = self.tracked.descriptor(base) else {
            return self.element(base, default).map(RawValue::Scalar);
        };

        match *descriptor {
            OpcodeDescriptor::Scalar(opcode) => self.element(opcode, default).map(RawValue::Scalar),
            OpcodeDescriptor::Array { count, .. } => (0..count)
                .map(|i| self.element(descriptor.element_opcode(0, i), default))
                .collect::<Option<Vec<_>>>()
                .map(RawValue::Array),
            OpcodeDescriptor::StructArray {
                count,
                struct_count,
                ..
            } => (0..struct_count)
                .map(|j| {
                    (0..count)
                        .map(|i| self.element(descriptor.element_opcode(j, i), default))
                        .collect::<Option<Vec<_>>>()
                })
                .collect::<Option<Vec<_>>>()
                .map(RawValue::StructArray),
        }
    }
}
