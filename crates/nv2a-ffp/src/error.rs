use thiserror::Error;

#[derive(Debug, Error)]
pub enum FfpError {
    /// A registry entry names a descriptor kind other than `scalar`, `array` or `struct_array`.
    #[error("unsupported opcode descriptor kind {0:?}")]
    UnsupportedDescriptorKind(String),

    #[error("malformed descriptor for base opcode 0x{base:X}: {reason}")]
    MalformedDescriptor { base: u32, reason: &'static str },

    #[error("malformed descriptor registry: {0}")]
    MalformedRegistry(#[from] serde_json::Error),

    /// Two tracked descriptors (or two elements of the same descriptor) expand to the same raw
    /// opcode.
    #[error(
        "raw opcode 0x{opcode:X} is claimed by base opcode 0x{first_base:X} and base opcode 0x{second_base:X}"
    )]
    OverlappingOpcode {
        opcode: u32,
        first_base: u32,
        second_base: u32,
    },
}
