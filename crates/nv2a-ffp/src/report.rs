//! Human-readable summary of the fixed-function pipeline state of one frame.

use std::fmt;

use crate::decode::Decoded;
use crate::format::as_float;
use crate::kelvin::{
    SET_COLOR_MATERIAL, SET_FOG_ENABLE, SET_FOG_GEN_MODE, SET_LIGHTING_ENABLE,
    SET_LIGHT_CONTROL, SET_LIGHT_ENABLE_MASK, SET_POINT_PARAMS, SET_POINT_PARAMS_ENABLE,
    SET_POINT_SIZE, SET_POINT_SMOOTH_ENABLE, SET_SKIN_MODE, SET_SPECULAR_ENABLE, SET_TEXGEN_Q,
    SET_TEXGEN_R, SET_TEXGEN_S, SET_TEXGEN_T, SET_TEXTURE_MATRIX_ENABLE, SET_TWO_SIDE_LIGHT_EN,
};
use crate::state::{FrameState, RawValue};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportConfig {
    /// Inserted between report lines.
    pub separator: String,
    /// Shown for fields that were never written.
    pub unknown_text: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            separator: "\n  ".to_owned(),
            unknown_text: "<UNKNOWN>".to_owned(),
        }
    }
}

impl FrameState<'_> {
    /// A scalar enable read with a default of 0.
    fn enabled(&self, base: u32) -> bool {
        matches!(self.get_raw(base, Some(0)), Some(RawValue::Scalar(value)) if value != 0)
    }

    /// The report as individual lines, in a fixed order.
    pub fn report_lines(&self, unknown_text: &str) -> Vec<String> {
        let decode = |base: u32| self.decode(base, None, unknown_text);
        let mut lines = Vec::new();

        let lighting = self.enabled(SET_LIGHTING_ENABLE);
        lines.push(format!("Lighting: {lighting}"));
        if lighting {
            lines.push(format!("\tTwo sided: {}", decode(SET_TWO_SIDE_LIGHT_EN)));
            lines.push(format!("\tColor material: {}", decode(SET_COLOR_MATERIAL)));
            lines.push(format!("\tLight control: {}", decode(SET_LIGHT_CONTROL)));
            lines.push(format!("\tLight enable: {}", decode(SET_LIGHT_ENABLE_MASK)));
        }

        lines.push(format!(
            "Specular enable: {}",
            self.enabled(SET_SPECULAR_ENABLE)
        ));

        let fog = self.enabled(SET_FOG_ENABLE);
        lines.push(format!("Fog enable: {fog}"));
        if fog {
            lines.push(format!("\tFog gen mode: {}", decode(SET_FOG_GEN_MODE)));
        }

        lines.push(format!("Skinning mode: {}", decode(SET_SKIN_MODE)));

        let point_params = self.enabled(SET_POINT_PARAMS_ENABLE);
        lines.push(format!("Point params enable: {point_params}"));
        if point_params {
            lines.push(format!("\tPoint size: {}", decode(SET_POINT_SIZE)));
            if let Some(RawValue::Array(params)) = self.get_raw(SET_POINT_PARAMS, None) {
                lines.extend(point_params_lines(&params));
            }
        }

        if self.enabled(SET_POINT_SMOOTH_ENABLE) {
            lines.push("Point smooth (point sprites) enabled".to_owned());
        }

        lines.push("TexGen:".to_owned());
        lines.extend(self.texgen_lines(unknown_text));

        if let Some(RawValue::Array(flags)) = self.get_raw(SET_TEXTURE_MATRIX_ENABLE, None) {
            if !flags.is_empty() {
                let stages: Vec<String> = flags
                    .iter()
                    .enumerate()
                    .map(|(stage, flag)| format!("[{stage}: {}]", *flag != 0))
                    .collect();
                lines.push(format!("TextureMatrix: {}", stages.join(", ")));
            }
        }

        lines
    }

    /// One line per texture stage, only when all four coordinate generators were written for
    /// every stage.
    fn texgen_lines(&self, unknown_text: &str) -> Vec<String> {
        let coords = [SET_TEXGEN_S, SET_TEXGEN_T, SET_TEXGEN_R, SET_TEXGEN_Q].map(|base| {
            self.get_raw(base, None)
                .map(|_| self.decode(base, None, unknown_text))
        });
        let [Some(Decoded::List(s)), Some(Decoded::List(t)), Some(Decoded::List(r)), Some(Decoded::List(q))] =
            coords
        else {
            return Vec::new();
        };
        if s.is_empty() || [t.len(), r.len(), q.len()].iter().any(|&len| len != s.len()) {
            return Vec::new();
        }

        (0..s.len())
            .map(|i| {
                format!(
                    "\tS[{i}]: {}, T[{i}]: {}, R[{i}]: {}, Q[{i}]: {}",
                    s[i], t[i], r[i], q[i]
                )
            })
            .collect()
    }

    /// The full report, using `config`.
    pub fn report_with(&self, config: &ReportConfig) -> String {
        self.report_lines(&config.unknown_text)
            .join(&config.separator)
    }

    /// The full report with the default [`ReportConfig`].
    pub fn report(&self) -> String {
        self.report_with(&ReportConfig::default())
    }
}

impl fmt::Display for FrameState<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.report())
    }
}

/// Point size attenuation: `params[0..3]` are the distance attenuation factors, followed by the
/// size range, two unused slots, the scale bias and the minimum size.
fn point_params_lines(params: &[u32]) -> Vec<String> {
    let &[a, b, c, size_range, _, _, scale_bias, min_size, ..] = params else {
        return Vec::new();
    };
    let [a, b, c, size_range, scale_bias, min_size] =
        [a, b, c, size_range, scale_bias, min_size].map(as_float);

    vec![
        format!("\tSize multiplier: sqrt(1/({a:?} + {b:?}*Deye + {c:?}*Deye^2))"),
        format!("\tSize range: {size_range:?}"),
        format!("\tScale bias: {scale_bias:?}"),
        format!("\tMinimum size: {min_size:?}"),
    ]
}
