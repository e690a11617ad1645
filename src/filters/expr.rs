//! Parser for compositing-time filter expressions such as `hue-rotate(180deg) saturate(120%)`.

use crate::foundation::error::{BoothError, BoothResult};

/// One image-processing primitive of a filter expression.
///
/// Amounts are normalized: percentages are divided by 100, angles are in degrees and blur is a
/// gaussian standard deviation in pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FilterOp {
    /// Desaturate towards luminance; `1.0` is fully gray.
    Grayscale(f32),
    /// Sepia tone; `1.0` is full sepia.
    Sepia(f32),
    /// Saturation multiplier; `1.0` is identity.
    Saturate(f32),
    /// Hue rotation in degrees.
    HueRotate(f32),
    /// Colour inversion; `1.0` is fully inverted.
    Invert(f32),
    /// Alpha multiplier.
    Opacity(f32),
    /// Linear brightness multiplier.
    Brightness(f32),
    /// Contrast around mid-gray.
    Contrast(f32),
    /// Gaussian blur, standard deviation in pixels.
    Blur(f32),
}

/// Parsed, validated filter expression.
///
/// Keeps the exact source string: the live preview and the captured still carry the same text.
#[derive(Clone, Debug, PartialEq)]
pub struct FilterChain {
    source: String,
    ops: Vec<FilterOp>,
}

impl FilterChain {
    /// The identity chain (`none`).
    pub fn identity() -> Self {
        Self {
            source: "none".to_owned(),
            ops: Vec::new(),
        }
    }

    /// The expression text this chain was parsed from.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Primitives in application order.
    pub fn ops(&self) -> &[FilterOp] {
        &self.ops
    }

    /// `true` when applying the chain leaves pixels untouched.
    pub fn is_identity(&self) -> bool {
        self.ops.is_empty()
    }
}

/// Parse a filter expression: `none` or a whitespace-separated list of `name(arg)`.
pub fn parse_filter_expression(src: &str) -> BoothResult<FilterChain> {
    let trimmed = src.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("none") {
        return Ok(FilterChain {
            source: src.to_owned(),
            ops: Vec::new(),
        });
    }

    let mut ops = Vec::new();
    let mut rest = trimmed;
    while !rest.is_empty() {
        let open = rest.find('(').ok_or_else(|| {
            BoothError::validation(format!("filter '{rest}' is missing '('"))
        })?;
        let name = rest[..open].trim().to_ascii_lowercase();
        if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphabetic() || c == '-') {
            return Err(BoothError::validation(format!(
                "invalid filter function name '{name}'"
            )));
        }
        let after_open = &rest[open + 1..];
        let close = after_open.find(')').ok_or_else(|| {
            BoothError::validation(format!("filter '{name}' is missing ')'"))
        })?;
        let arg = after_open[..close].trim();
        ops.push(parse_op(&name, arg)?);
        rest = after_open[close + 1..].trim_start();
    }

    Ok(FilterChain {
        source: src.to_owned(),
        ops,
    })
}

fn parse_op(name: &str, arg: &str) -> BoothResult<FilterOp> {
    let op = match name {
        "grayscale" => FilterOp::Grayscale(amount(name, arg)?.min(1.0)),
        "sepia" => FilterOp::Sepia(amount(name, arg)?.min(1.0)),
        "invert" => FilterOp::Invert(amount(name, arg)?.min(1.0)),
        "opacity" => FilterOp::Opacity(amount(name, arg)?.min(1.0)),
        "saturate" => FilterOp::Saturate(amount(name, arg)?),
        "brightness" => FilterOp::Brightness(amount(name, arg)?),
        "contrast" => FilterOp::Contrast(amount(name, arg)?),
        "hue-rotate" => FilterOp::HueRotate(angle_deg(arg)?),
        "blur" => FilterOp::Blur(length_px(arg)?),
        _ => {
            return Err(BoothError::validation(format!(
                "unknown filter function '{name}'"
            )));
        }
    };
    Ok(op)
}

/// `<number> | <percentage>`, defaulting to 1 when omitted.
fn amount(name: &str, arg: &str) -> BoothResult<f32> {
    if arg.is_empty() {
        return Ok(1.0);
    }
    let v = match arg.strip_suffix('%') {
        Some(pct) => number(pct)? / 100.0,
        None => number(arg)?,
    };
    if v < 0.0 {
        return Err(BoothError::validation(format!(
            "{name}() amount must be >= 0, got '{arg}'"
        )));
    }
    Ok(v)
}

fn angle_deg(arg: &str) -> BoothResult<f32> {
    if arg.is_empty() {
        return Ok(0.0);
    }
    let lower = arg.to_ascii_lowercase();
    // `grad` must be tested before `rad`.
    let deg = if let Some(v) = lower.strip_suffix("deg") {
        number(v)?
    } else if let Some(v) = lower.strip_suffix("grad") {
        number(v)? * 360.0 / 400.0
    } else if let Some(v) = lower.strip_suffix("rad") {
        number(v)?.to_degrees()
    } else if let Some(v) = lower.strip_suffix("turn") {
        number(v)? * 360.0
    } else {
        let v = number(&lower)?;
        if v != 0.0 {
            return Err(BoothError::validation(format!(
                "hue-rotate() angle '{arg}' needs a unit"
            )));
        }
        0.0
    };
    Ok(deg)
}

fn length_px(arg: &str) -> BoothResult<f32> {
    if arg.is_empty() {
        return Ok(0.0);
    }
    let v = match arg.to_ascii_lowercase().strip_suffix("px") {
        Some(v) => number(v)?,
        None => {
            let v = number(arg)?;
            if v != 0.0 {
                return Err(BoothError::validation(format!(
                    "blur() length '{arg}' needs a px unit"
                )));
            }
            v
        }
    };
    if v < 0.0 {
        return Err(BoothError::validation("blur() radius must be >= 0"));
    }
    Ok(v)
}

fn number(s: &str) -> BoothResult<f32> {
    let s = s.trim();
    let v: f32 = s
        .parse()
        .map_err(|_| BoothError::validation(format!("invalid number '{s}'")))?;
    if !v.is_finite() {
        return Err(BoothError::validation(format!("number '{s}' must be finite")));
    }
    Ok(v)
}

#[cfg(test)]
#[path = "../../tests/unit/filters/expr.rs"]
mod tests;
