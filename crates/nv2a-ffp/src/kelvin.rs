//! NV2A Kelvin (class `0x97`) fixed-function methods.
//!
//! Only the methods needed to describe the legacy pipeline are listed here, together with a
//! handful of neighbouring multi-element methods so the registry covers every descriptor shape.

use bitflags::bitflags;

use crate::descriptor::{DescriptorRegistry, OpcodeDescriptor};
use crate::format::{as_float, FormatterRegistry};

/// Kelvin primitive class.
pub const CLASS: u32 = 0x97;

pub const SET_LIGHT_CONTROL: u32 = 0x0294;
pub const SET_COLOR_MATERIAL: u32 = 0x0298;
pub const SET_FOG_MODE: u32 = 0x029C;
pub const SET_FOG_GEN_MODE: u32 = 0x02A0;
pub const SET_FOG_ENABLE: u32 = 0x02A4;
pub const SET_FOG_COLOR: u32 = 0x02A8;
pub const SET_LIGHTING_ENABLE: u32 = 0x0314;
pub const SET_POINT_PARAMS_ENABLE: u32 = 0x0318;
pub const SET_POINT_SMOOTH_ENABLE: u32 = 0x031C;
pub const SET_SKIN_MODE: u32 = 0x0328;
pub const SET_SPECULAR_ENABLE: u32 = 0x03B8;
pub const SET_LIGHT_ENABLE_MASK: u32 = 0x03BC;
pub const SET_TEXGEN_S: u32 = 0x03C0;
pub const SET_TEXGEN_T: u32 = 0x03C4;
pub const SET_TEXGEN_R: u32 = 0x03C8;
pub const SET_TEXGEN_Q: u32 = 0x03CC;
pub const SET_TEXTURE_MATRIX_ENABLE: u32 = 0x0420;
pub const SET_POINT_SIZE: u32 = 0x043C;
pub const SET_TEXTURE_MATRIX: u32 = 0x06C0;
pub const SET_FOG_PARAMS: u32 = 0x09C0;
pub const SET_POINT_PARAMS: u32 = 0x0A30;
pub const SET_LIGHT_AMBIENT_COLOR: u32 = 0x1000;
pub const SET_TWO_SIDE_LIGHT_EN: u32 = 0x17C4;

/// Texture stages addressed by the per-stage methods.
pub const TEXTURE_STAGES: u32 = 4;
/// Hardware lights.
pub const LIGHTS: u32 = 8;

const TEXGEN_STRIDE: u32 = 0x10;
const POINT_PARAMS_COUNT: u32 = 8;

/// Base opcodes whose state is captured per frame.
pub const TRACKED_BASE_OPCODES: [u32; 18] = [
    SET_COLOR_MATERIAL,
    SET_FOG_ENABLE,
    SET_FOG_GEN_MODE,
    SET_LIGHT_CONTROL,
    SET_LIGHT_ENABLE_MASK,
    SET_LIGHTING_ENABLE,
    SET_POINT_PARAMS,
    SET_POINT_PARAMS_ENABLE,
    SET_POINT_SIZE,
    SET_POINT_SMOOTH_ENABLE,
    SET_SKIN_MODE,
    SET_SPECULAR_ENABLE,
    SET_TWO_SIDE_LIGHT_EN,
    SET_TEXTURE_MATRIX_ENABLE,
    SET_TEXGEN_S,
    SET_TEXGEN_T,
    SET_TEXGEN_R,
    SET_TEXGEN_Q,
];

const SCALARS: [u32; 14] = [
    SET_LIGHT_CONTROL,
    SET_COLOR_MATERIAL,
    SET_FOG_MODE,
    SET_FOG_GEN_MODE,
    SET_FOG_ENABLE,
    SET_FOG_COLOR,
    SET_LIGHTING_ENABLE,
    SET_POINT_PARAMS_ENABLE,
    SET_POINT_SMOOTH_ENABLE,
    SET_SKIN_MODE,
    SET_SPECULAR_ENABLE,
    SET_LIGHT_ENABLE_MASK,
    SET_POINT_SIZE,
    SET_TWO_SIDE_LIGHT_EN,
];

/// Descriptor table for the Kelvin class.
pub fn registry() -> DescriptorRegistry {
    let mut registry = DescriptorRegistry::new();
    for opcode in SCALARS {
        registry.register(CLASS, OpcodeDescriptor::Scalar(opcode));
    }
    for base in [SET_TEXGEN_S, SET_TEXGEN_T, SET_TEXGEN_R, SET_TEXGEN_Q] {
        registry.register(
            CLASS,
            OpcodeDescriptor::Array {
                base,
                stride: TEXGEN_STRIDE,
                count: TEXTURE_STAGES,
            },
        );
    }
    registry
        .register(
            CLASS,
            OpcodeDescriptor::Array {
                base: SET_TEXTURE_MATRIX_ENABLE,
                stride: 4,
                count: TEXTURE_STAGES,
            },
        )
        .register(
            CLASS,
            OpcodeDescriptor::StructArray {
                base: SET_TEXTURE_MATRIX,
                stride: 4,
                count: 16,
                struct_stride: 0x40,
                struct_count: TEXTURE_STAGES,
            },
        )
        .register(
            CLASS,
            OpcodeDescriptor::Array {
                base: SET_FOG_PARAMS,
                stride: 4,
                count: 3,
            },
        )
        .register(
            CLASS,
            OpcodeDescriptor::Array {
                base: SET_POINT_PARAMS,
                stride: 4,
                count: POINT_PARAMS_COUNT,
            },
        )
        .register(
            CLASS,
            OpcodeDescriptor::StructArray {
                base: SET_LIGHT_AMBIENT_COLOR,
                stride: 4,
                count: 3,
                struct_stride: 0x80,
                struct_count: LIGHTS,
            },
        );
    registry
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct LightControl: u32 {
        const SEPARATE_SPECULAR = 1 << 0;
        const LOCALEYE = 1 << 16;
        const ALPHA_FROM_MATERIAL_SPECULAR = 1 << 17;
    }
}

fn bool_name(raw: u32) -> String {
    (raw != 0).to_string()
}

pub fn skin_mode_name(raw: u32) -> String {
    match raw {
        0 => "OFF".to_owned(),
        1 => "2G".to_owned(),
        2 => "2".to_owned(),
        3 => "3G".to_owned(),
        4 => "3".to_owned(),
        5 => "4G".to_owned(),
        6 => "4".to_owned(),
        _ => format!("<UNKNOWN SKIN MODE 0x{raw:X}>"),
    }
}

pub fn fog_gen_mode_name(raw: u32) -> String {
    match raw {
        0 => "SPEC_ALPHA".to_owned(),
        1 => "RADIAL".to_owned(),
        2 => "PLANAR".to_owned(),
        3 => "ABS_PLANAR".to_owned(),
        6 => "FOG_X".to_owned(),
        _ => format!("<UNKNOWN FOG GEN MODE 0x{raw:X}>"),
    }
}

pub fn texgen_mode_name(raw: u32) -> String {
    match raw {
        0 => "DISABLE".to_owned(),
        0x2400 => "EYE_LINEAR".to_owned(),
        0x2401 => "OBJECT_LINEAR".to_owned(),
        0x2402 => "SPHERE_MAP".to_owned(),
        0x8511 => "NORMAL_MAP".to_owned(),
        0x8512 => "REFLECTION_MAP".to_owned(),
        _ => format!("<UNKNOWN TEXGEN 0x{raw:X}>"),
    }
}

/// Two bits per light: OFF, INFINITE, LOCAL, SPOT. Lights that are off are omitted.
pub fn light_enable_mask_name(raw: u32) -> String {
    let lights: Vec<String> = (0..LIGHTS)
        .filter_map(|light| {
            let kind = match (raw >> (light * 2)) & 0x3 {
                0 => return None,
                1 => "INFINITE",
                2 => "LOCAL",
                _ => "SPOT",
            };
            Some(format!("L{light}: {kind}"))
        })
        .collect();
    if lights.is_empty() {
        "<NONE>".to_owned()
    } else {
        lights.join(", ")
    }
}

/// Two bits per material source; only sources taken from a vertex color are listed.
pub fn color_material_name(raw: u32) -> String {
    const SOURCES: [&str; 8] = [
        "EMISSIVE",
        "AMBIENT",
        "DIFFUSE",
        "SPECULAR",
        "BACK_EMISSIVE",
        "BACK_AMBIENT",
        "BACK_DIFFUSE",
        "BACK_SPECULAR",
    ];

    let sources: Vec<String> = SOURCES
        .iter()
        .enumerate()
        .filter_map(|(index, name)| {
            let from = match (raw >> (index * 2)) & 0x3 {
                0 => return None,
                1 => "DIFFUSE_VTX",
                2 => "SPECULAR_VTX",
                _ => "<UNKNOWN>",
            };
            Some(format!("{name}={from}"))
        })
        .collect();
    if sources.is_empty() {
        "<MATERIAL>".to_owned()
    } else {
        sources.join(" ")
    }
}

pub fn light_control_name(raw: u32) -> String {
    let flags = LightControl::from_bits_retain(raw);
    let mut names: Vec<String> = flags
        .iter_names()
        .map(|(name, _)| name.to_owned())
        .collect();
    let unknown = flags.bits() & !LightControl::all().bits();
    if unknown != 0 {
        names.push(format!("0x{unknown:X}"));
    }
    if names.is_empty() {
        "0x0".to_owned()
    } else {
        names.join(" | ")
    }
}

/// Point size is unsigned 6.3 fixed point.
pub fn point_size_name(raw: u32) -> String {
    format!("{:?}", raw as f32 / 8.0)
}

pub fn float_name(raw: u32) -> String {
    format!("{:?}", as_float(raw))
}

/// Formatters for the Kelvin methods that have a more useful rendering than hex.
pub fn formatters() -> FormatterRegistry {
    let mut formatters = FormatterRegistry::new();
    for opcode in [
        SET_LIGHTING_ENABLE,
        SET_TWO_SIDE_LIGHT_EN,
        SET_SPECULAR_ENABLE,
        SET_FOG_ENABLE,
        SET_POINT_PARAMS_ENABLE,
        SET_POINT_SMOOTH_ENABLE,
    ] {
        formatters.register(CLASS, opcode, |_, _, raw| bool_name(raw));
    }
    for stage in 0..TEXTURE_STAGES {
        formatters.register(CLASS, SET_TEXTURE_MATRIX_ENABLE + stage * 4, |_, _, raw| {
            bool_name(raw)
        });
        for base in [SET_TEXGEN_S, SET_TEXGEN_T, SET_TEXGEN_R, SET_TEXGEN_Q] {
            formatters.register(CLASS, base + stage * TEXGEN_STRIDE, |_, _, raw| {
                texgen_mode_name(raw)
            });
        }
    }
    for index in 0..POINT_PARAMS_COUNT {
        formatters.register(CLASS, SET_POINT_PARAMS + index * 4, |_, _, raw| float_name(raw));
    }
    formatters
        .register(CLASS, SET_SKIN_MODE, |_, _, raw| skin_mode_name(raw))
        .register(CLASS, SET_FOG_GEN_MODE, |_, _, raw| fog_gen_mode_name(raw))
        .register(CLASS, SET_LIGHT_ENABLE_MASK, |_, _, raw| {
            light_enable_mask_name(raw)
        })
        .register(CLASS, SET_COLOR_MATERIAL, |_, _, raw| color_material_name(raw))
        .register(CLASS, SET_LIGHT_CONTROL, |_, _, raw| light_control_name(raw))
        .register(CLASS, SET_POINT_SIZE, |_, _, raw| point_size_name(raw));
    formatters
}
