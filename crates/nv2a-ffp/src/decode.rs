//! Conversion of captured fields into display text.

use std::fmt;

use crate::descriptor::OpcodeDescriptor;
use crate::state::{FrameState, RawValue};

/// Text for one field, shaped like its descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decoded {
    Text(String),
    List(Vec<String>),
    Nested(Vec<Vec<String>>),
}

impl fmt::Display for Decoded {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::List(items) => write!(f, "[{}]", items.join(", ")),
            Self::Nested(structs) => {
                f.write_str("[")?;
                for (index, items) in structs.iter().enumerate() {
                    if index > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "[{}]", items.join(", "))?;
                }
                f.write_str("]")
            }
        }
    }
}

impl FrameState<'_> {
    /// Decodes the field identified by `base`.
    ///
    /// Each element is formatted with the formatter registered for its own raw opcode, or as hex.
    /// A field that cannot be reassembled decodes to `default_text`, repeated per element for
    /// array shapes.
    pub fn decode(&self, base: u32, default_raw: Option<u32>, default_text: &str) -> Decoded {
        let class = self.tracked.class();
        let raw = self.get_raw(base, default_raw);
        let format_element = |opcode: u32, value: u32| self.formatters.format(class, opcode, value);

        let descriptor = self
            .tracked
            .descriptor(base)
            .copied()
            .unwrap_or(OpcodeDescriptor::Scalar(base));
        let count = descriptor.element_count() as usize;

        match (descriptor, raw) {
            (OpcodeDescriptor::Scalar(opcode), Some(RawValue::Scalar(value))) => {
                Decoded::Text(format_element(opcode, value))
            }
            (OpcodeDescriptor::Scalar(_), _) => Decoded::Text(default_text.to_owned()),
            (OpcodeDescriptor::Array { .. }, Some(RawValue::Array(values))) => Decoded::List(
                (0u32..)
                    .zip(values)
                    .map(|(i, value)| format_element(descriptor.element_opcode(0, i), value))
                    .collect(),
            ),
            (OpcodeDescriptor::Array { .. }, _) => {
                Decoded::List(vec![default_text.to_owned(); count])
            }
            (OpcodeDescriptor::StructArray { .. }, Some(RawValue::StructArray(structs))) => {
                Decoded::Nested(
                    (0u32..)
                        .zip(structs)
                        .map(|(j, values)| {
                            (0u32..)
                                .zip(values)
                                .map(|(i, value)| format_element(descriptor.element_opcode(j, i), value))
                                .collect()
                        })
                        .collect(),
                )
            }
            (OpcodeDescriptor::StructArray { struct_count, .. }, _) => {
                Decoded::Nested(vec![vec![default_text.to_owned(); count]; struct_count as usize])
            }
        }
    }
}
