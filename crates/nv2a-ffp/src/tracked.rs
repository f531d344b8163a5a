//! Expansion of an interest set of base opcodes into the raw opcodes to capture.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::descriptor::{DescriptorRegistry, OpcodeDescriptor};
use crate::error::FfpError;
use crate::kelvin;

/// The raw opcodes tracked for one command class, plus the descriptors needed to reassemble
/// them into fields.
///
/// Built once at startup and then shared read-only by every [`FrameState`](crate::FrameState).
#[derive(Debug, Clone)]
pub struct TrackedOpcodes {
    class: u32,
    /// raw opcode -> base opcode of the descriptor that covers it.
    owners: HashMap<u32, u32>,
    /// base opcode -> descriptor.
    descriptors: HashMap<u32, OpcodeDescriptor>,
}

impl TrackedOpcodes {
    /// An empty tracker for `class`; see [`populate`](Self::populate).
    pub fn new(class: u32) -> Self {
        Self {
            class,
            owners: HashMap::new(),
            descriptors: HashMap::new(),
        }
    }

    /// Builds a tracker for `class` from `registry`, keeping only descriptors whose base opcode is
    /// in `interest`.
    pub fn expand(
        registry: &DescriptorRegistry,
        class: u32,
        interest: &HashSet<u32>,
    ) -> Result<Self, FfpError> {
        let mut tracked = Self::new(class);
        tracked.populate(registry, interest)?;
        Ok(tracked)
    }

    /// The built-in Kelvin registry expanded against [`kelvin::TRACKED_BASE_OPCODES`].
    pub fn kelvin() -> Result<Self, FfpError> {
        let interest: HashSet<u32> = kelvin::TRACKED_BASE_OPCODES.iter().copied().collect();
        Self::expand(&kelvin::registry(), kelvin::CLASS, &interest)
    }

    /// Fills the tracker from `registry`. Does nothing if it already tracks any opcode.
    ///
    /// On error the tracker is left unchanged.
    pub fn populate(
        &mut self,
        registry: &DescriptorRegistry,
        interest: &HashSet<u32>,
    ) -> Result<(), FfpError> {
        if !self.owners.is_empty() {
            return Ok(());
        }

        let mut owners = HashMap::new();
        let mut descriptors = HashMap::new();
        for descriptor in registry.descriptors(self.class) {
            let base = descriptor.base();
            if !interest.contains(&base) {
                continue;
            }
            descriptors.insert(base, *descriptor);

            for opcode in descriptor.opcodes() {
                if let Some(first_base) = owners.insert(opcode, base) {
                    return Err(FfpError::OverlappingOpcode {
                        opcode,
                        first_base,
                        second_base: base,
                    });
                }
            }
        }

        for base in interest {
            if !descriptors.contains_key(base) {
                debug!(class = self.class, base, "tracked base opcode has no descriptor");
            }
        }
        debug!(
            class = self.class,
            bases = descriptors.len(),
            opcodes = owners.len(),
            "expanded tracked opcodes"
        );

        self.owners = owners;
        self.descriptors = descriptors;
        Ok(())
    }

    pub fn class(&self) -> u32 {
        self.class
    }

    pub fn contains(&self, opcode: u32) -> bool {
        self.owners.contains_key(&opcode)
    }

    pub fn descriptor(&self, base: u32) -> Option<&OpcodeDescriptor> {
        self.descriptors.get(&base)
    }

    /// Base opcode of the field that `opcode` belongs to.
    pub fn base_of(&self, opcode: u32) -> Option<u32> {
        self.owners.get(&opcode).copied()
    }

    /// Number of raw opcodes tracked.
    pub fn len(&self) -> usize {
        self.owners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }

    /// Tracked raw opcodes in ascending order.
    pub fn opcodes(&self) -> Vec<u32> {
        let mut opcodes: Vec<u32> = self.owners.keys().copied().collect();
        opcodes.sort_unstable();
        opcodes
    }
}
