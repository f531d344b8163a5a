//! Opcode descriptors and the per-class descriptor registry.
//!
//! A descriptor tells the state tracker how many raw method opcodes a single logical field
//! occupies. Most fields are a single method (`Scalar`); vectors of per-stage or per-component
//! values are `Array`s; repeated blocks such as per-light or per-stage matrices are
//! `StructArray`s.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::error::FfpError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpcodeDescriptor {
    /// A single method whose opcode is also its base opcode.
    Scalar(u32),
    /// `count` elements; element `i` lives at `base + i * stride`.
    Array { base: u32, stride: u32, count: u32 },
    /// `struct_count` repetitions of an `Array`; element `i` of struct `j` lives at
    /// `base + j * struct_stride + i * stride`.
    StructArray {
        base: u32,
        stride: u32,
        count: u32,
        struct_stride: u32,
        struct_count: u32,
    },
}

impl OpcodeDescriptor {
    pub fn base(&self) -> u32 {
        match *self {
            Self::Scalar(base) | Self::Array { base, .. } | Self::StructArray { base, .. } => base,
        }
    }

    /// Number of elements per struct (1 for scalars).
    pub fn element_count(&self) -> u32 {
        match *self {
            Self::Scalar(_) => 1,
            Self::Array { count, .. } | Self::StructArray { count, .. } => count,
        }
    }

    /// Number of structs (1 for scalars and plain arrays).
    pub fn struct_count(&self) -> u32 {
        match *self {
            Self::Scalar(_) | Self::Array { .. } => 1,
            Self::StructArray { struct_count, .. } => struct_count,
        }
    }

    /// Raw opcode of element `index` within struct `struct_index`.
    pub fn element_opcode(&self, struct_index: u32, index: u32) -> u32 {
        match *self {
            Self::Scalar(base) => base,
            Self::Array { base, stride, .. } => base.wrapping_add(index.wrapping_mul(stride)),
            Self::StructArray {
                base,
                stride,
                struct_stride,
                ..
            } => base
                .wrapping_add(struct_index.wrapping_mul(struct_stride))
                .wrapping_add(index.wrapping_mul(stride)),
        }
    }

    /// Every raw opcode covered by this descriptor, struct-major then element order.
    pub fn opcodes(&self) -> impl Iterator<Item = u32> {
        let desc = *self;
        (0..desc.struct_count()).flat_map(move |j| {
            (0..desc.element_count()).map(move |i| desc.element_opcode(j, i))
        })
    }
}

/// Descriptor tables keyed by command class.
///
/// Iteration order within a class is registration order, which keeps expansion deterministic.
#[derive(Debug, Clone, Default)]
pub struct DescriptorRegistry {
    classes: BTreeMap<u32, Vec<OpcodeDescriptor>>,
}

impl DescriptorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, class: u32, descriptor: OpcodeDescriptor) -> &mut Self {
        self.classes.entry(class).or_default().push(descriptor);
        self
    }

    /// Descriptors registered for `class`; empty if the class is unknown.
    pub fn descriptors(&self, class: u32) -> &[OpcodeDescriptor] {
        self.classes.get(&class).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Load a registry from a JSON list of entries:
    ///
    /// ```json
    /// [
    ///   { "class": 151, "kind": "scalar", "base": 788 },
    ///   { "class": 151, "kind": "array", "base": 2608, "stride": 4, "count": 8 },
    ///   { "class": 151, "kind": "struct_array", "base": 4096, "stride": 4, "count": 3,
    ///     "struct_stride": 128, "struct_count": 8 }
    /// ]
    /// ```
    pub fn from_json(json: &str) -> Result<Self, FfpError> {
        let entries: Vec<RegistryEntry> = serde_json::from_str(json)?;
        let mut registry = Self::new();
        for entry in entries {
            let class = entry.class;
            registry.register(class, OpcodeDescriptor::try_from(entry)?);
        }
        Ok(registry)
    }
}

#[derive(Debug, Deserialize)]
struct RegistryEntry {
    class: u32,
    kind: String,
    base: u32,
    #[serde(default)]
    stride: Option<u32>,
    #[serde(default)]
    count: Option<u32>,
    #[serde(default)]
    struct_stride: Option<u32>,
    #[serde(default)]
    struct_count: Option<u32>,
}

impl TryFrom<RegistryEntry> for OpcodeDescriptor {
    type Error = FfpError;

    fn try_from(entry: RegistryEntry) -> Result<Self, Self::Error> {
        let base = entry.base;
        let require = |field: Option<u32>, reason: &'static str| {
            field.ok_or(FfpError::MalformedDescriptor { base, reason })
        };

        match entry.kind.as_str() {
            "scalar" => Ok(Self::Scalar(base)),
            "array" => Ok(Self::Array {
                base,
                stride: require(entry.stride, "array is missing `stride`")?,
                count: require(entry.count, "array is missing `count`")?,
            }),
            "struct_array" => Ok(Self::StructArray {
                base,
                stride: require(entry.stride, "struct array is missing `stride`")?,
                count: require(entry.count, "struct array is missing `count`")?,
                struct_stride: require(
                    entry.struct_stride,
                    "struct array is missing `struct_stride`",
                )?,
                struct_count: require(
                    entry.struct_count,
                    "struct array is missing `struct_count`",
                )?,
            }),
            _ => Err(FfpError::UnsupportedDescriptorKind(entry.kind)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn struct_array_opcodes_are_struct_major() {
        let desc = OpcodeDescriptor::StructArray {
            base: 0x1000,
            stride: 4,
            count: 3,
            struct_stride: 0x80,
            struct_count: 2,
        };
        let ops: Vec<u32> = desc.opcodes().collect();
        assert_eq!(ops, vec![0x1000, 0x1004, 0x1008, 0x1080, 0x1084, 0x1088]);
        assert_eq!(desc.element_opcode(1, 2), 0x1088);
    }

    #[test]
    fn scalar_covers_only_its_base() {
        let desc = OpcodeDescriptor::Scalar(0x314);
        assert_eq!(desc.opcodes().collect::<Vec<_>>(), vec![0x314]);
        assert_eq!(desc.element_count(), 1);
        assert_eq!(desc.struct_count(), 1);
    }

    #[test]
    fn empty_array_covers_nothing() {
        let desc = OpcodeDescriptor::Array {
            base: 0x420,
            stride: 4,
            count: 0,
        };
        assert_eq!(desc.opcodes().count(), 0);
    }

    #[test]
    fn unknown_class_has_no_descriptors() {
        let mut registry = DescriptorRegistry::new();
        registry.register(0x97, OpcodeDescriptor::Scalar(0x314));
        assert_eq!(registry.descriptors(0x97), &[OpcodeDescriptor::Scalar(0x314)]);
        assert!(registry.descriptors(0x62).is_empty());
    }

    #[test]
    fn json_rejects_unknown_kind() {
        let err = DescriptorRegistry::from_json(
            r#"[{ "class": 151, "kind": "matrix", "base": 1728 }]"#,
        )
        .unwrap_err();
        assert!(
            matches!(err, FfpError::UnsupportedDescriptorKind(ref kind) if kind == "matrix"),
            "{err}"
        );
    }

    #[test]
    fn json_rejects_array_without_stride() {
        let err = DescriptorRegistry::from_json(
            r#"[{ "class": 151, "kind": "array", "base": 1056, "count": 4 }]"#,
        )
        .unwrap_err();
        assert!(
            matches!(err, FfpError::MalformedDescriptor { base: 0x420, .. }),
            "{err}"
        );
    }

    #[test]
    fn json_rejects_invalid_document() {
        let err = DescriptorRegistry::from_json("{ not json").unwrap_err();
        assert!(matches!(err, FfpError::MalformedRegistry(_)), "{err}");
    }
}
