//! Field coercion: raw text token to typed [`Cell`].
//!
//! Every coercion is total. Scripts feeding a long-lived list dialog must not
//! be able to abort ingestion mid-stream with one malformed field, so numeric
//! and boolean coercions fall back to their zero value instead of erroring.
//! Icon resolution is the one coercion with a real failure side channel, and
//! it degrades to an empty cell.

use crate::types::{Cell, ColumnKind, ImageRef};

/// Resolves a textual image reference (usually a file path) to a small icon.
///
/// Implemented by the embedding presentation layer; [`NoIcons`] is the default.
pub trait IconResolver: Send + Sync {
    /// Resolve `reference` to an icon, or `None` when it cannot be resolved.
    fn resolve_icon(&self, reference: &str) -> Option<ImageRef>;
}

/// Icon resolver that resolves nothing; every Image cell stays empty.
#[derive(Debug, Default)]
pub struct NoIcons;

impl IconResolver for NoIcons {
    fn resolve_icon(&self, _reference: &str) -> Option<ImageRef> {
        None
    }
}

/// Default edge length for resolved small icons, in pixels.
pub const SMALL_ICON_SIZE: u32 = 16;

/// Resolver that treats references as image file paths on the local
/// filesystem, validating them with the `image` crate and recording
/// dimensions fitted to the small-icon size.
#[cfg(feature = "icons")]
#[derive(Debug)]
pub struct FileIconResolver {
    /// Bounding edge length for the resolved icon.
    pub icon_size: u32,
}

#[cfg(feature = "icons")]
impl Default for FileIconResolver {
    fn default() -> Self {
        Self {
            icon_size: SMALL_ICON_SIZE,
        }
    }
}

#[cfg(feature = "icons")]
impl IconResolver for FileIconResolver {
    fn resolve_icon(&self, reference: &str) -> Option<ImageRef> {
        let (w, h) = image::image_dimensions(reference).ok()?;
        let (w, h) = (w.max(1), h.max(1));
        let size = self.icon_size.max(1);
        // Fit inside size x size, preserving aspect ratio.
        let scale = f64::from(size) / f64::from(w.max(h));
        let scale = scale.min(1.0);
        Some(ImageRef {
            source: reference.to_owned(),
            width: ((f64::from(w) * scale).round() as u32).max(1),
            height: ((f64::from(h) * scale).round() as u32).max(1),
        })
    }
}

/// Coerce one raw token into the typed cell required by `kind`.
pub fn coerce_field(kind: ColumnKind, token: &str, icons: &dyn IconResolver) -> Cell {
    match kind {
        ColumnKind::Checkable | ColumnKind::Radio => {
            Cell::Bool(token.eq_ignore_ascii_case("true"))
        }
        ColumnKind::Integer | ColumnKind::Size => Cell::Int(parse_i64_prefix(token)),
        ColumnKind::Float => Cell::Float(parse_f64_prefix(token)),
        ColumnKind::ProgressBar => Cell::Int(parse_i64_prefix(token).clamp(0, 100)),
        ColumnKind::Image => Cell::Image(icons.resolve_icon(token)),
        ColumnKind::Text
        | ColumnKind::Hidden
        | ColumnKind::AttrForeground
        | ColumnKind::AttrBackground
        | ColumnKind::AttrFont => Cell::Text(token.to_owned()),
    }
}

/// Parse the leading base-10 integer prefix of `s`, strtoll-style.
///
/// Leading whitespace is skipped, an optional sign is honored, and the value
/// saturates at the i64 bounds on overflow. A non-numeric prefix parses as 0.
pub fn parse_i64_prefix(s: &str) -> i64 {
    let t = s.trim_start();
    let (neg, digits) = match t.as_bytes().first() {
        Some(b'-') => (true, &t[1..]),
        Some(b'+') => (false, &t[1..]),
        _ => (false, t),
    };

    let mut value: i64 = 0;
    let mut saw_digit = false;
    for b in digits.bytes() {
        if !b.is_ascii_digit() {
            break;
        }
        saw_digit = true;
        let d = i64::from(b - b'0');
        value = if neg {
            value.saturating_mul(10).saturating_sub(d)
        } else {
            value.saturating_mul(10).saturating_add(d)
        };
    }
    if saw_digit { value } else { 0 }
}

/// Parse the leading base-10 float prefix of `s`, strtod-style.
///
/// Accepts optional sign, digits, an optional fraction, and an exponent only
/// when it is followed by at least one digit (a bare `1e` parses as 1.0). A
/// non-numeric prefix parses as 0.0.
pub fn parse_f64_prefix(s: &str) -> f64 {
    let t = s.trim_start();
    let bytes = t.as_bytes();
    let mut i = 0;

    if matches!(bytes.first(), Some(b'-') | Some(b'+')) {
        i += 1;
    }
    let int_start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    let int_digits = i - int_start;

    let mut frac_digits = 0;
    if bytes.get(i) == Some(&b'.') {
        let mut j = i + 1;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        frac_digits = j - (i + 1);
        // A lone '.' with no digits on either side is not a number.
        if int_digits > 0 || frac_digits > 0 {
            i = j;
        }
    }

    if int_digits == 0 && frac_digits == 0 {
        return 0.0;
    }

    if matches!(bytes.get(i), Some(b'e') | Some(b'E')) {
        let mut j = i + 1;
        if matches!(bytes.get(j), Some(b'-') | Some(b'+')) {
            j += 1;
        }
        let exp_start = j;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if j > exp_start {
            i = j;
        }
    }

    t[..i].parse::<f64>().unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn booleans_compare_case_insensitively() {
        let icons = NoIcons;
        assert_eq!(
            coerce_field(ColumnKind::Checkable, "TRUE", &icons),
            Cell::Bool(true)
        );
        assert_eq!(
            coerce_field(ColumnKind::Radio, "tRuE", &icons),
            Cell::Bool(true)
        );
        assert_eq!(
            coerce_field(ColumnKind::Checkable, "yes", &icons),
            Cell::Bool(false)
        );
        assert_eq!(
            coerce_field(ColumnKind::Checkable, "1", &icons),
            Cell::Bool(false)
        );
    }

    #[test]
    fn integer_prefix_parse_is_lenient() {
        assert_eq!(parse_i64_prefix("42"), 42);
        assert_eq!(parse_i64_prefix("  -7 apples"), -7);
        assert_eq!(parse_i64_prefix("+3"), 3);
        assert_eq!(parse_i64_prefix("12.9"), 12);
        assert_eq!(parse_i64_prefix("garbage"), 0);
        assert_eq!(parse_i64_prefix(""), 0);
        assert_eq!(parse_i64_prefix("-"), 0);
    }

    #[test]
    fn integer_prefix_parse_saturates() {
        assert_eq!(parse_i64_prefix("99999999999999999999"), i64::MAX);
        assert_eq!(parse_i64_prefix("-99999999999999999999"), i64::MIN);
    }

    #[test]
    fn float_prefix_parse_is_lenient() {
        assert_eq!(parse_f64_prefix("3.14stuff"), 3.14);
        assert_eq!(parse_f64_prefix("-0.5"), -0.5);
        assert_eq!(parse_f64_prefix(".5"), 0.5);
        assert_eq!(parse_f64_prefix("7."), 7.0);
        assert_eq!(parse_f64_prefix("1e3"), 1000.0);
        assert_eq!(parse_f64_prefix("1e"), 1.0);
        assert_eq!(parse_f64_prefix("2E-2x"), 0.02);
        assert_eq!(parse_f64_prefix("."), 0.0);
        assert_eq!(parse_f64_prefix("nope"), 0.0);
    }

    #[test]
    fn progress_values_clamp_to_percent_range() {
        let icons = NoIcons;
        assert_eq!(
            coerce_field(ColumnKind::ProgressBar, "150", &icons),
            Cell::Int(100)
        );
        assert_eq!(
            coerce_field(ColumnKind::ProgressBar, "-3", &icons),
            Cell::Int(0)
        );
        assert_eq!(
            coerce_field(ColumnKind::ProgressBar, "55", &icons),
            Cell::Int(55)
        );
    }

    #[test]
    fn image_resolution_failure_leaves_cell_empty() {
        let icons = NoIcons;
        assert_eq!(
            coerce_field(ColumnKind::Image, "/no/such/icon.png", &icons),
            Cell::Image(None)
        );
    }

    #[test]
    fn attribute_columns_store_raw_text() {
        let icons = NoIcons;
        assert_eq!(
            coerce_field(ColumnKind::AttrForeground, "#ff0000", &icons),
            Cell::Text("#ff0000".to_string())
        );
    }

    #[test]
    fn custom_resolver_flows_through() {
        struct Fixed;
        impl IconResolver for Fixed {
            fn resolve_icon(&self, reference: &str) -> Option<ImageRef> {
                Some(ImageRef {
                    source: reference.to_owned(),
                    width: 16,
                    height: 16,
                })
            }
        }
        let cell = coerce_field(ColumnKind::Image, "gtk-ok", &Fixed);
        match cell {
            Cell::Image(Some(r)) => assert_eq!(r.source, "gtk-ok"),
            other => panic!("expected resolved image, got {other:?}"),
        }
    }
}
