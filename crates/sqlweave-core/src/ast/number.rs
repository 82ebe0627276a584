//! Numeric literal values with SQL sub-kinds.

use core::fmt;

/// Largest number of decimal digits a [`Decimal`] may hold.
pub const MAX_PRECISION: u32 = 38;

/// The sub-kind of a numeric literal, ordered by promotion rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NumberKind {
    /// 32-bit integer.
    Int,
    /// 64-bit integer.
    BigInt,
    /// Exact decimal.
    Numeric,
}

impl NumberKind {
    /// Maps a type name such as `INT` or `DECIMAL` to a kind.
    #[must_use]
    pub fn from_type_name(name: &str) -> Option<Self> {
        match name.to_ascii_uppercase().as_str() {
            "INT" | "INTEGER" | "INT4" => Some(Self::Int),
            "BIGINT" | "INT8" => Some(Self::BigInt),
            "NUMERIC" | "DECIMAL" | "DEC" => Some(Self::Numeric),
            _ => None,
        }
    }
}

/// An exact decimal: `mantissa * 10^-scale`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Decimal {
    mantissa: i128,
    scale: u32,
}

impl Decimal {
    /// Creates a decimal, failing when it needs more than
    /// [`MAX_PRECISION`] digits.
    #[must_use]
    pub fn new(mantissa: i128, scale: u32) -> Option<Self> {
        if scale > MAX_PRECISION || digit_count(mantissa) > MAX_PRECISION {
            return None;
        }
        Some(Self { mantissa, scale })
    }

    /// Parses `digits[.digits]`.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        let (whole, fraction) = text.split_once('.').unwrap_or((text, ""));
        if whole.is_empty() || !whole.bytes().chain(fraction.bytes()).all(|b| b.is_ascii_digit()) {
            return None;
        }
        let digits = whole.len() + fraction.len();
        if digits > MAX_PRECISION as usize {
            return None;
        }
        let mantissa = format!("{whole}{fraction}").parse::<i128>().ok()?;
        Self::new(mantissa, u32::try_from(fraction.len()).ok()?)
    }

    /// The unscaled value.
    #[must_use]
    pub const fn mantissa(&self) -> i128 {
        self.mantissa
    }

    /// The number of fractional digits.
    #[must_use]
    pub const fn scale(&self) -> u32 {
        self.scale
    }

    /// Returns the integer part, truncating toward zero.
    #[must_use]
    pub fn trunc(&self) -> i128 {
        pow10(self.scale).map_or(0, |p| self.mantissa / p)
    }

    fn rescaled(&self, scale: u32) -> Option<i128> {
        self.mantissa.checked_mul(pow10(scale.checked_sub(self.scale)?)?)
    }

    fn aligned(self, other: Self) -> Option<(i128, i128, u32)> {
        let scale = self.scale.max(other.scale);
        Some((self.rescaled(scale)?, other.rescaled(scale)?, scale))
    }

    /// Checked addition.
    #[must_use]
    pub fn checked_add(self, other: Self) -> Option<Self> {
        let (a, b, scale) = self.aligned(other)?;
        Self::new(a.checked_add(b)?, scale)
    }

    /// Checked subtraction.
    #[must_use]
    pub fn checked_sub(self, other: Self) -> Option<Self> {
        let (a, b, scale) = self.aligned(other)?;
        Self::new(a.checked_sub(b)?, scale)
    }

    /// Checked multiplication.
    #[must_use]
    pub fn checked_mul(self, other: Self) -> Option<Self> {
        Self::new(
            self.mantissa.checked_mul(other.mantissa)?,
            self.scale.checked_add(other.scale)?,
        )
    }

    /// Checked division, keeping at least six fractional digits.
    #[must_use]
    pub fn checked_div(self, other: Self) -> Option<Self> {
        if other.mantissa == 0 {
            return None;
        }
        let scale = self.scale.max(other.scale).max(6);
        // a/10^sa / (b/10^sb) = a * 10^(scale - sa + sb) / b / 10^scale
        let shift = (scale + other.scale).checked_sub(self.scale)?;
        let numerator = self.mantissa.checked_mul(pow10(shift)?)?;
        Self::new(numerator / other.mantissa, scale)
    }

    /// Checked remainder.
    #[must_use]
    pub fn checked_rem(self, other: Self) -> Option<Self> {
        let (a, b, scale) = self.aligned(other)?;
        Self::new(a.checked_rem(b)?, scale)
    }

    /// Checked negation.
    #[must_use]
    pub fn checked_neg(self) -> Option<Self> {
        Self::new(self.mantissa.checked_neg()?, self.scale)
    }
}

impl From<i64> for Decimal {
    fn from(value: i64) -> Self {
        Self {
            mantissa: i128::from(value),
            scale: 0,
        }
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.mantissa.unsigned_abs().to_string();
        let sign = if self.mantissa < 0 { "-" } else { "" };
        let scale = self.scale as usize;
        if scale == 0 {
            return write!(f, "{sign}{digits}");
        }
        let padded = format!("{digits:0>width$}", width = scale + 1);
        let (whole, fraction) = padded.split_at(padded.len() - scale);
        write!(f, "{sign}{whole}.{fraction}")
    }
}

/// A numeric literal value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Number {
    /// Fits in 32 bits.
    Int(i32),
    /// Fits in 64 bits.
    BigInt(i64),
    /// Exact decimal.
    Numeric(Decimal),
}

impl Number {
    /// Types a literal: without a decimal point it is the narrowest of
    /// Int, BigInt and Numeric that holds it; with one it is Numeric.
    /// Returns `None` beyond [`MAX_PRECISION`] digits.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        if !text.contains('.') {
            if let Ok(value) = text.parse::<i32>() {
                return Some(Self::Int(value));
            }
            if let Ok(value) = text.parse::<i64>() {
                return Some(Self::BigInt(value));
            }
        }
        Decimal::parse(text).map(Self::Numeric)
    }

    /// Returns the sub-kind.
    #[must_use]
    pub const fn kind(&self) -> NumberKind {
        match self {
            Self::Int(_) => NumberKind::Int,
            Self::BigInt(_) => NumberKind::BigInt,
            Self::Numeric(_) => NumberKind::Numeric,
        }
    }

    /// Converts to another sub-kind. Integer targets truncate fractions
    /// toward zero; values that do not fit yield `None`.
    #[must_use]
    pub fn cast(self, kind: NumberKind) -> Option<Self> {
        let whole = match self {
            Self::Int(v) => i128::from(v),
            Self::BigInt(v) => i128::from(v),
            Self::Numeric(d) if kind == NumberKind::Numeric => return Some(Self::Numeric(d)),
            Self::Numeric(d) => d.trunc(),
        };
        match kind {
            NumberKind::Int => i32::try_from(whole).ok().map(Self::Int),
            NumberKind::BigInt => i64::try_from(whole).ok().map(Self::BigInt),
            NumberKind::Numeric => Decimal::new(whole, 0).map(Self::Numeric),
        }
    }

    fn promote(self, other: Self) -> Option<(Self, Self)> {
        let kind = self.kind().max(other.kind());
        Some((self.cast(kind)?, other.cast(kind)?))
    }

    fn combine(
        self,
        other: Self,
        int: fn(i32, i32) -> Option<i32>,
        bigint: fn(i64, i64) -> Option<i64>,
        numeric: fn(Decimal, Decimal) -> Option<Decimal>,
    ) -> Option<Self> {
        match self.promote(other)? {
            (Self::Int(a), Self::Int(b)) => int(a, b).map(Self::Int),
            (Self::BigInt(a), Self::BigInt(b)) => bigint(a, b).map(Self::BigInt),
            (Self::Numeric(a), Self::Numeric(b)) => numeric(a, b).map(Self::Numeric),
            _ => None,
        }
    }

    /// Checked addition with promotion to the wider sub-kind.
    #[must_use]
    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.combine(other, i32::checked_add, i64::checked_add, Decimal::checked_add)
    }

    /// Checked subtraction with promotion to the wider sub-kind.
    #[must_use]
    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.combine(other, i32::checked_sub, i64::checked_sub, Decimal::checked_sub)
    }

    /// Checked multiplication with promotion to the wider sub-kind.
    #[must_use]
    pub fn checked_mul(self, other: Self) -> Option<Self> {
        self.combine(other, i32::checked_mul, i64::checked_mul, Decimal::checked_mul)
    }

    /// Checked division with promotion; integer division truncates.
    #[must_use]
    pub fn checked_div(self, other: Self) -> Option<Self> {
        self.combine(other, i32::checked_div, i64::checked_div, Decimal::checked_div)
    }

    /// Checked remainder with promotion to the wider sub-kind.
    #[must_use]
    pub fn checked_rem(self, other: Self) -> Option<Self> {
        self.combine(other, i32::checked_rem, i64::checked_rem, Decimal::checked_rem)
    }

    /// Checked negation.
    #[must_use]
    pub fn checked_neg(self) -> Option<Self> {
        match self {
            Self::Int(v) => v.checked_neg().map(Self::Int),
            Self::BigInt(v) => v.checked_neg().map(Self::BigInt),
            Self::Numeric(d) => d.checked_neg().map(Self::Numeric),
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::BigInt(v) => write!(f, "{v}"),
            Self::Numeric(d) => write!(f, "{d}"),
        }
    }
}

fn pow10(exponent: u32) -> Option<i128> {
    10_i128.checked_pow(exponent)
}

fn digit_count(value: i128) -> u32 {
    value.unsigned_abs().checked_ilog10().map_or(1, |log| log + 1)
}
