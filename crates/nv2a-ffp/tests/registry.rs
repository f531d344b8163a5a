use std::collections::HashSet;

use nv2a_ffp::{
    kelvin, DescriptorRegistry, FfpError, FormatterRegistry, FrameState, OpcodeDescriptor,
    RawValue, TrackedOpcodes,
};

const KELVIN_SUBSET_JSON: &str = include_str!("fixtures/kelvin_subset.json");

fn interest(bases: &[u32]) -> HashSet<u32> {
    bases.iter().copied().collect()
}

#[test]
fn json_registry_matches_built_in_descriptors() {
    let registry = DescriptorRegistry::from_json(KELVIN_SUBSET_JSON).expect("parse fixture");
    let built_in = kelvin::registry();

    for descriptor in registry.descriptors(kelvin::CLASS) {
        assert!(
            built_in.descriptors(kelvin::CLASS).contains(descriptor),
            "{descriptor:?} is not in the built-in registry"
        );
    }
    assert_eq!(registry.descriptors(0x62), &[OpcodeDescriptor::Scalar(0x300)]);
}

#[test]
fn struct_array_elements_follow_stride_arithmetic() {
    let registry = DescriptorRegistry::from_json(KELVIN_SUBSET_JSON).expect("parse fixture");
    let tracked = TrackedOpcodes::expand(
        &registry,
        kelvin::CLASS,
        &interest(&[kelvin::SET_LIGHT_AMBIENT_COLOR]),
    )
    .expect("expand");
    assert_eq!(tracked.len(), 24);

    let formatters = FormatterRegistry::new();
    let mut frame = FrameState::new(&tracked, &formatters);
    for light in 0..8u32 {
        for component in 0..3u32 {
            let opcode = kelvin::SET_LIGHT_AMBIENT_COLOR + light * 0x80 + component * 4;
            assert!(tracked.contains(opcode), "0x{opcode:X}");
            frame.update(opcode, light * 10 + component);
        }
    }

    let Some(RawValue::StructArray(lights)) =
        frame.get_raw(kelvin::SET_LIGHT_AMBIENT_COLOR, None)
    else {
        panic!("expected a complete struct array");
    };
    assert_eq!(lights.len(), 8);
    assert_eq!(lights[0], vec![0, 1, 2]);
    assert_eq!(lights[7], vec![70, 71, 72]);

    let decoded = frame.decode(kelvin::SET_LIGHT_AMBIENT_COLOR, None, "<UNKNOWN>");
    assert!(decoded.to_string().starts_with("[[0x0, 0x1, 0x2], [0xA, 0xB, 0xC]"));
}

#[test]
fn missing_struct_element_voids_the_whole_field() {
    let registry = DescriptorRegistry::from_json(KELVIN_SUBSET_JSON).expect("parse fixture");
    let tracked = TrackedOpcodes::expand(
        &registry,
        kelvin::CLASS,
        &interest(&[kelvin::SET_LIGHT_AMBIENT_COLOR]),
    )
    .expect("expand");
    let formatters = FormatterRegistry::new();
    let mut frame = FrameState::new(&tracked, &formatters);

    for opcode in tracked.opcodes() {
        if opcode != kelvin::SET_LIGHT_AMBIENT_COLOR + 5 * 0x80 + 8 {
            frame.update(opcode, 1);
        }
    }
    assert_eq!(frame.get_raw(kelvin::SET_LIGHT_AMBIENT_COLOR, None), None);
    assert!(matches!(
        frame.get_raw(kelvin::SET_LIGHT_AMBIENT_COLOR, Some(0)),
        Some(RawValue::StructArray(ref lights)) if lights[5] == vec![1, 1, 0]
    ));
}

#[test]
fn unsupported_kind_is_reported() {
    let err = DescriptorRegistry::from_json(
        r#"[{ "class": 151, "kind": "bitfield", "base": 788 }]"#,
    )
    .unwrap_err();
    assert!(
        matches!(err, FfpError::UnsupportedDescriptorKind(ref kind) if kind == "bitfield"),
        "{err}"
    );
    assert_eq!(err.to_string(), "unsupported opcode descriptor kind \"bitfield\"");
}
