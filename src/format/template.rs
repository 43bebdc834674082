//! printf-style runtime templates with tolerant error markers.
//!
//! Supported verbs: `%v %s %q %d %x %X %o %b %c %f %F %e %E %g %t %T %%`,
//! with the `-`, `+`, `0`, ` ` and `#` flags, a width and a `.precision`.
//!
//! Problems in the template never abort formatting. They are rendered in place
//! as visible markers:
//!
//! | Problem                  | Rendering              |
//! |--------------------------|------------------------|
//! | argument of wrong type   | `%!d(string=abc)`      |
//! | unknown verb             | `%!z(int=1)`           |
//! | missing argument         | `%!d(MISSING)`         |
//! | unused arguments         | `%!(EXTRA int=1, ...)` |
//! | `%` at end of template   | `%!(NOVERB)`           |
//! | absurd width / precision | `%!(BADWIDTH)` / `%!(BADPREC)` |
//!
//! # Examples
//!
//! ```
//! use errx::format::{format_template, Arg};
//!
//! assert_eq!(format_template("user %d", &[7.into()]), "user 7");
//! assert_eq!(format_template("user %d", &["bob".into()]), "user %!d(string=bob)");
//! assert_eq!(format_template("%s and %s", &["a".into()]), "a and %!s(MISSING)");
//! assert_eq!(format_template("%05.1f|%-4s|", &[Arg::Float(3.14159), "ab".into()]), "003.1|ab  |");
//! ```
use core::fmt::{self, Write};

/// Upper bound for widths and precisions.
const MAX_WIDTH: usize = 1_000_000;

/// Single template argument.
#[derive(Clone, Copy)]
pub enum Arg<'a> {
    Int(i64),
    Uint(u64),
    Float(f64),
    Bool(bool),
    Char(char),
    Str(&'a str),
    /// Any other displayable value; accepted by `%v`, `%s`, `%q` and `%x`.
    Display(&'a dyn fmt::Display),
}

impl<'a> Arg<'a> {
    /// Wraps an arbitrary displayable value.
    pub fn display(value: &'a dyn fmt::Display) -> Self {
        Self::Display(value)
    }

    /// Name used in error markers.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Int(_) => "int",
            Self::Uint(_) => "uint",
            Self::Float(_) => "float64",
            Self::Bool(_) => "bool",
            Self::Char(_) => "char",
            Self::Str(_) => "string",
            Self::Display(_) => "value",
        }
    }

    /// Whether zero padding applies. Infinities and NaN pad with spaces.
    fn is_numeric(&self) -> bool {
        match self {
            Self::Int(_) | Self::Uint(_) => true,
            Self::Float(v) => v.is_finite(),
            _ => false,
        }
    }
}

impl fmt::Display for Arg<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => fmt::Display::fmt(v, f),
            Self::Uint(v) => fmt::Display::fmt(v, f),
            Self::Float(v) => fmt::Display::fmt(v, f),
            Self::Bool(v) => fmt::Display::fmt(v, f),
            Self::Char(v) => fmt::Display::fmt(v, f),
            Self::Str(v) => fmt::Display::fmt(v, f),
            Self::Display(v) => v.fmt(f),
        }
    }
}

impl fmt::Debug for Arg<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.type_name(), self)
    }
}

macro_rules! impl_from {
    ($variant:ident as $target:ty: $($source:ty),+) => {
        $(
            impl From<$source> for Arg<'_> {
                fn from(value: $source) -> Self {
                    Self::$variant(value as $target)
                }
            }
        )+
    };
}

impl_from!(Int as i64: i8, i16, i32, i64, isize);
impl_from!(Uint as u64: u8, u16, u32, u64, usize);
impl_from!(Float as f64: f32, f64);
impl_from!(Bool as bool: bool);
impl_from!(Char as char: char);

impl<'a> From<&'a str> for Arg<'a> {
    fn from(value: &'a str) -> Self {
        Self::Str(value)
    }
}

impl<'a> From<&'a String> for Arg<'a> {
    fn from(value: &'a String) -> Self {
        Self::Str(value.as_str())
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct Spec {
    minus: bool,
    plus: bool,
    zero: bool,
    space: bool,
    sharp: bool,
    width: Option<usize>,
    precision: Option<usize>,
}

/// Formats `template` with `args`, marking every problem in the output.
pub fn format_template(template: &str, args: &[Arg<'_>]) -> String {
    let mut out = String::with_capacity(template.len() + 16);
    let mut next = 0usize;
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }

        let mut spec = Spec::default();
        while let Some(&flag) = chars.peek() {
            match flag {
                '-' => spec.minus = true,
                '+' => spec.plus = true,
                '0' => spec.zero = true,
                ' ' => spec.space = true,
                '#' => spec.sharp = true,
                _ => break,
            }
            chars.next();
        }

        let width = read_number(&mut chars);
        if width.is_some_and(|w| w > MAX_WIDTH) {
            out.push_str("%!(BADWIDTH)");
        } else {
            spec.width = width;
        }

        if chars.peek() == Some(&'.') {
            chars.next();
            let precision = read_number(&mut chars).unwrap_or(0);
            if precision > MAX_WIDTH {
                out.push_str("%!(BADPREC)");
            } else {
                spec.precision = Some(precision);
            }
        }

        let Some(verb) = chars.next() else {
            out.push_str("%!(NOVERB)");
            break;
        };

        if verb == '%' {
            out.push('%');
            continue;
        }

        let Some(arg) = args.get(next) else {
            let _ = write!(out, "%!{verb}(MISSING)");
            continue;
        };
        next += 1;

        match render_verb(verb, arg, &spec) {
            Some(body) => pad(&mut out, &body, &spec, arg.is_numeric()),
            None => {
                let _ = write!(out, "%!{verb}({}={arg})", arg.type_name());
            }
        }
    }

    if next < args.len() {
        out.push_str("%!(EXTRA ");
        for (i, arg) in args[next..].iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            let _ = write!(out, "{}={arg}", arg.type_name());
        }
        out.push(')');
    }

    out
}

fn read_number(chars: &mut core::iter::Peekable<core::str::Chars<'_>>) -> Option<usize> {
    let mut value: Option<usize> = None;
    while let Some(digit) = chars.peek().and_then(|c| c.to_digit(10)) {
        chars.next();
        value = Some(value.unwrap_or(0).saturating_mul(10).saturating_add(digit as usize));
    }
    value
}

/// Renders one argument, or `None` when the verb does not apply to it.
fn render_verb(verb: char, arg: &Arg<'_>, spec: &Spec) -> Option<String> {
    let body = match (verb, arg) {
        ('T', _) => arg.type_name().to_owned(),

        ('v' | 'g' | 'f' | 'F' | 'e' | 'E', Arg::Float(v)) if !v.is_finite() => non_finite(*v).to_owned(),

        ('v', Arg::Float(v)) | ('f' | 'F', Arg::Float(v)) if verb != 'v' || spec.precision.is_some() => {
            signed(spec, *v < 0.0, format!("{:.*}", spec.precision.unwrap_or(6), v.abs()))
        }
        ('v' | 'd', Arg::Int(v)) => signed(spec, *v < 0, v.unsigned_abs().to_string()),
        ('v' | 'd', Arg::Uint(v)) => signed(spec, false, v.to_string()),
        ('v' | 'g', Arg::Float(v)) => signed(spec, v.is_sign_negative(), v.abs().to_string()),
        ('d', Arg::Char(c)) => (*c as u32).to_string(),

        ('v' | 't', Arg::Bool(v)) => v.to_string(),
        ('v' | 's' | 'c', Arg::Char(c)) => c.to_string(),
        ('v' | 's', Arg::Str(s)) => truncate(s, spec.precision),
        ('v' | 's', Arg::Display(d)) => truncate(&d.to_string(), spec.precision),

        ('q', Arg::Str(s)) => format!("{s:?}"),
        ('q', Arg::Display(d)) => format!("{:?}", d.to_string()),
        ('q', Arg::Char(c)) => format!("{c:?}"),

        ('x' | 'X', Arg::Int(v)) => signed(spec, *v < 0, radix(verb, spec, v.unsigned_abs())),
        ('x' | 'X', Arg::Uint(v)) => radix(verb, spec, *v),
        ('x' | 'X', Arg::Str(s)) => hex_bytes(verb, s.as_bytes()),
        ('x' | 'X', Arg::Display(d)) => hex_bytes(verb, d.to_string().as_bytes()),
        ('o' | 'b', Arg::Int(v)) => signed(spec, *v < 0, radix(verb, spec, v.unsigned_abs())),
        ('o' | 'b', Arg::Uint(v)) => radix(verb, spec, *v),

        ('c', Arg::Int(v)) => u32::try_from(*v).ok().and_then(char::from_u32).unwrap_or('\u{FFFD}').to_string(),
        ('c', Arg::Uint(v)) => u32::try_from(*v).ok().and_then(char::from_u32).unwrap_or('\u{FFFD}').to_string(),

        ('e' | 'E', Arg::Float(v)) => {
            signed(spec, *v < 0.0, exponent(verb, spec.precision.unwrap_or(6), v.abs()))
        }

        _ => return None,
    };
    Some(body)
}

fn signed(spec: &Spec, negative: bool, magnitude: String) -> String {
    if negative {
        format!("-{magnitude}")
    } else if spec.plus {
        format!("+{magnitude}")
    } else if spec.space {
        format!(" {magnitude}")
    } else {
        magnitude
    }
}

fn radix(verb: char, spec: &Spec, value: u64) -> String {
    match (verb, spec.sharp) {
        ('x', false) => format!("{value:x}"),
        ('x', true) => format!("{value:#x}"),
        ('X', false) => format!("{value:X}"),
        ('X', true) => format!("0X{value:X}"),
        ('o', false) => format!("{value:o}"),
        ('o', true) => format!("0{value:o}"),
        (_, false) => format!("{value:b}"),
        (_, true) => format!("{value:#b}"),
    }
}

fn hex_bytes(verb: char, bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        let _ = if verb == 'X' { write!(out, "{byte:02X}") } else { write!(out, "{byte:02x}") };
    }
    out
}

/// Scientific notation with a signed, two-digit exponent (`1.500000e+00`).
fn non_finite(value: f64) -> &'static str {
    if value.is_nan() {
        "NaN"
    } else if value.is_sign_negative() {
        "-Inf"
    } else {
        "+Inf"
    }
}

fn exponent(verb: char, precision: usize, value: f64) -> String {
    let rendered = format!("{value:.precision$e}");
    let (mantissa, exp) = rendered.split_once('e').unwrap_or((rendered.as_str(), "0"));
    let exp: i32 = exp.parse().unwrap_or(0);
    let marker = if verb == 'E' { 'E' } else { 'e' };
    let sign = if exp < 0 { '-' } else { '+' };
    format!("{mantissa}{marker}{sign}{:02}", exp.unsigned_abs())
}

fn truncate(s: &str, precision: Option<usize>) -> String {
    match precision {
        Some(limit) => s.chars().take(limit).collect(),
        None => s.to_owned(),
    }
}

fn pad(out: &mut String, body: &str, spec: &Spec, numeric: bool) {
    let len = body.chars().count();
    let fill = spec.width.unwrap_or(0).saturating_sub(len);

    if fill == 0 {
        out.push_str(body);
    } else if spec.minus {
        out.push_str(body);
        out.extend(core::iter::repeat(' ').take(fill));
    } else if spec.zero && numeric {
        let (sign, digits) = match body.chars().next() {
            Some(c @ ('-' | '+' | ' ')) => (Some(c), &body[1..]),
            _ => (None, body),
        };
        out.extend(sign);
        out.extend(core::iter::repeat('0').take(fill));
        out.push_str(digits);
    } else {
        out.extend(core::iter::repeat(' ').take(fill));
        out.push_str(body);
    }
}
