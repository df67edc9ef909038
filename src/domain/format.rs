//! Parameter display formats.
//!
//! Model spec files store a format string per parameter (`{:.4g}`, `{0:.2f}`,
//! ...). We accept the small subset that matters for numeric display and render
//! it deterministically; anything else falls back to [`DEFAULT_FORMAT`].

pub const DEFAULT_FORMAT: &str = "{:.4g}";

/// A parsed display format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueFormat {
    /// `{}`: shortest round-trip representation.
    Plain,
    /// `{:.Nf}`
    Fixed(usize),
    /// `{:.Ne}`
    Exp(usize),
    /// `{:.Ng}`
    General(usize),
}

impl Default for ValueFormat {
    fn default() -> Self {
        ValueFormat::General(4)
    }
}

impl ValueFormat {
    /// Parse a format string, returning `None` if it is not understood.
    pub fn parse(spec: &str) -> Option<Self> {
        let inner = spec.trim().strip_prefix('{')?.strip_suffix('}')?;
        let inner = inner.strip_prefix('0').unwrap_or(inner);
        if inner.is_empty() {
            return Some(ValueFormat::Plain);
        }
        let body = inner.strip_prefix(':')?;
        if body.is_empty() {
            return Some(ValueFormat::Plain);
        }

        let (precision, kind) = match body.strip_prefix('.') {
            Some(rest) => {
                let split = rest.find(|c: char| !c.is_ascii_digit())?;
                let (digits, kind) = rest.split_at(split);
                (digits.parse::<usize>().ok()?, kind)
            }
            None => (6, body),
        };

        match kind {
            "f" => Some(ValueFormat::Fixed(precision)),
            "e" => Some(ValueFormat::Exp(precision)),
            "g" => Some(ValueFormat::General(precision)),
            _ => None,
        }
    }

    /// Parse with fallback to the default format.
    pub fn parse_or_default(spec: &str) -> Self {
        Self::parse(spec).unwrap_or_default()
    }

    pub fn render(self, v: f64) -> String {
        if !v.is_finite() {
            return non_finite(v);
        }
        match self {
            ValueFormat::Plain => format!("{v:?}"),
            ValueFormat::Fixed(p) => format!("{v:.p$}"),
            ValueFormat::Exp(p) => {
                let (mantissa, exp) = split_exp(v, p);
                format!("{mantissa}{}", exp_suffix(exp))
            }
            ValueFormat::General(p) => general(v, p.max(1)),
        }
    }
}

/// Render `v` with a stored format string.
pub fn format_value(fmt: &str, v: f64) -> String {
    ValueFormat::parse_or_default(fmt).render(v)
}

fn non_finite(v: f64) -> String {
    if v.is_nan() {
        "nan".to_string()
    } else if v > 0.0 {
        "inf".to_string()
    } else {
        "-inf".to_string()
    }
}

/// Scientific notation split into mantissa text and decimal exponent.
fn split_exp(v: f64, precision: usize) -> (String, i32) {
    let s = format!("{v:.precision$e}");
    match s.split_once('e') {
        Some((mantissa, exp)) => (mantissa.to_string(), exp.parse().unwrap_or(0)),
        None => (s, 0),
    }
}

fn exp_suffix(exp: i32) -> String {
    let sign = if exp < 0 { '-' } else { '+' };
    format!("e{sign}{:02}", exp.abs())
}

fn general(v: f64, precision: usize) -> String {
    if v == 0.0 {
        return "0".to_string();
    }
    // Exponent after rounding to `precision` significant digits.
    let (mantissa, exp) = split_exp(v, precision - 1);
    if exp < -4 || exp >= precision as i32 {
        format!("{}{}", trim_zeros(&mantissa), exp_suffix(exp))
    } else {
        let decimals = (precision as i32 - 1 - exp).max(0) as usize;
        trim_zeros(&format!("{v:.decimals$}")).to_string()
    }
}

fn trim_zeros(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}
