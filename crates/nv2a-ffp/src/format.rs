//! Per-method value formatters.
//!
//! Formatters are keyed by `(class, opcode)` where `opcode` is the raw opcode of the element
//! being formatted, so array elements can carry their own formatter. A missing formatter is the
//! common case and falls back to [`hex`].

use std::collections::HashMap;
use std::fmt;

use tracing::debug;

/// Formats one raw parameter. Arguments are `(context, class, raw_value)`; `context` is opaque
/// to the registry and is 0 when decoding frame state.
pub type Formatter = Box<dyn Fn(u32, u32, u32) -> String + Send + Sync>;

#[derive(Default)]
pub struct FormatterRegistry {
    formatters: HashMap<(u32, u32), Formatter>,
}

impl fmt::Debug for FormatterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<_> = self.formatters.keys().copied().collect();
        keys.sort_unstable();
        f.debug_struct("FormatterRegistry")
            .field("keys", &keys)
            .finish()
    }
}

impl FormatterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `formatter` for `(class, opcode)`, replacing any previous entry.
    pub fn register<F>(&mut self, class: u32, opcode: u32, formatter: F) -> &mut Self
    where
        F: Fn(u32, u32, u32) -> String + Send + Sync + 'static,
    {
        if self
            .formatters
            .insert((class, opcode), Box::new(formatter))
            .is_some()
        {
            debug!(class, opcode, "replaced method formatter");
        }
        self
    }

    pub fn get(&self, class: u32, opcode: u32) -> Option<&Formatter> {
        self.formatters.get(&(class, opcode))
    }

    pub fn len(&self) -> usize {
        self.formatters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.formatters.is_empty()
    }

    /// Formats `raw` with the registered formatter, or as hex if there is none.
    pub fn format(&self, class: u32, opcode: u32, raw: u32) -> String {
        match self.get(class, opcode) {
            Some(formatter) => formatter(0, class, raw),
            None => hex(raw),
        }
    }
}

/// Uppercase, `0x`-prefixed, unpadded hex.
pub fn hex(raw: u32) -> String {
    format!("0x{raw:X}")
}

/// Reinterprets the bit pattern of `raw` as an IEEE-754 single.
pub fn as_float(raw: u32) -> f32 {
    f32::from_be_bytes(raw.to_be_bytes())
}

/// Inverse of [`as_float`].
pub fn float_bits(value: f32) -> u32 {
    u32::from_be_bytes(value.to_be_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_is_uppercase_and_unpadded() {
        assert_eq!(hex(0), "0x0");
        assert_eq!(hex(0xA), "0xA");
        assert_eq!(hex(0x2401), "0x2401");
        assert_eq!(hex(0xDEAD_BEEF), "0xDEADBEEF");
        assert_eq!(hex(u32::MAX), "0xFFFFFFFF");
    }

    #[test]
    fn float_bits_round_trip_preserves_bit_patterns() {
        for bits in [
            0x0000_0000u32,
            0x8000_0000, // -0.0
            0x3F80_0000, // 1.0
            0x4120_0000, // 10.0
            0x7F80_0000, // +inf
            0xFF80_0000, // -inf
            0x7FC0_0000, // quiet NaN
            0x0000_0001, // smallest subnormal
        ] {
            assert_eq!(float_bits(as_float(bits)), bits, "bits 0x{bits:08X}");
        }
        assert_eq!(as_float(0x4120_0000), 10.0);
        assert_eq!(float_bits(2.0), 0x4000_0000);
        assert!(as_float(0x8000_0000).is_sign_negative());
    }

    #[test]
    fn format_prefers_registered_formatter() {
        let mut formatters = FormatterRegistry::new();
        formatters.register(0x97, 0x314, |_, _, raw| format!("enabled={}", raw != 0));

        assert_eq!(formatters.format(0x97, 0x314, 1), "enabled=true");
        assert_eq!(formatters.format(0x97, 0x318, 1), "0x1");
        // Same opcode, different class.
        assert_eq!(formatters.format(0x62, 0x314, 1), "0x1");
    }

    #[test]
    fn formatter_receives_class_and_zero_context() {
        let mut formatters = FormatterRegistry::new();
        formatters.register(0x97, 0x328, |ctx, class, raw| format!("{ctx}:{class:X}:{raw}"));
        assert_eq!(formatters.format(0x97, 0x328, 6), "0:97:6");
    }

    #[test]
    fn register_replaces_existing_entry() {
        let mut formatters = FormatterRegistry::new();
        formatters
            .register(0x97, 0x328, |_, _, _| "first".to_owned())
            .register(0x97, 0x328, |_, _, _| "second".to_owned());
        assert_eq!(formatters.len(), 1);
        assert_eq!(formatters.format(0x97, 0x328, 0), "second");
    }
}
