use std::cmp::{Eq, Ord, Ordering, PartialEq, PartialOrd};
use std::convert::{TryFrom, TryInto};
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use std::{error, fmt};
use Number::*;

/// A numerical value.
///
/// `Number` captures Rust numerical primitives: _unsigned integers_, _signed integers_, and
/// _floating point decimal_ numbers. Each is stored at its widest size (128 bits for integers, 64
/// bits for floats). The numbers are canonicalized, so `Eq` and `Ord` hold across variants and a
/// document that round trips an integer through a float still compares equal.
///
/// The number line extends from negative infinity, through zero, to positive infinity. Nan is
/// above positive infinity. All zeroes are treated equally (`-0 == +0`), as well as all Nans.
///
/// `[ -∞, .., 0, .., +∞, NaN ]`
///
/// # Examples
/// ```rust
/// # use objser::*;
/// let n = Number::from(100u8);
/// assert_eq!(n, Number::from(100.0f32));
/// assert_eq!(n, Number::from(100i32));
/// assert_ne!(n, Number::from(99.99f64));
///
/// assert!(n < 101);
/// assert!(n > -100);
/// assert!(n > 99.99);
/// ```
///
/// Numbers can be read from text, which is how XML leaves are turned back into numbers.
/// ```rust
/// # use objser::*;
/// assert_eq!("42".parse::<Number>(), Ok(Number::Uint(42)));
/// assert_eq!("-42".parse::<Number>(), Ok(Number::Int(-42)));
/// assert_eq!("0.25".parse::<Number>(), Ok(Number::Float(0.25)));
/// assert!("forty-two".parse::<Number>().is_err());
/// ```
#[derive(Copy, Clone, Debug)]
#[allow(missing_docs)]
pub enum Number {
    Uint(u128),
    Int(i128),
    Float(f64),
}

/// Converting into a signed or unsigned integer can fail if the original number is outside the
/// integer's valid range.
#[derive(Debug, PartialEq)]
pub struct IntoIntError;

/// The text is not a number.
#[derive(Debug, PartialEq, Clone)]
pub struct ParseNumberError(pub String);

impl error::Error for ParseNumberError {}

impl fmt::Display for ParseNumberError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' is not a number", self.0)
    }
}

impl Number {
    /// Represent `Number` as an unsigned integer.
    ///
    /// Floats convert if they have no fractional part (within `1e-10`).
    pub fn as_u128(&self) -> Result<u128, IntoIntError> {
        match self {
            Uint(x) => Ok(*x),
            Int(x) => (*x).try_into().map_err(|_| IntoIntError),
            Float(x) => {
                if x.is_finite() && *x >= 0.0 && x.fract() < 1e-10 {
                    Ok(*x as u128)
                } else {
                    Err(IntoIntError)
                }
            }
        }
    }

    /// Represent `Number` as a signed integer.
    ///
    /// Floats convert if they have no fractional part (within `1e-10`).
    pub fn as_i128(&self) -> Result<i128, IntoIntError> {
        match self {
            Uint(x) => (*x).try_into().map_err(|_| IntoIntError),
            Int(x) => Ok(*x),
            Float(x) => {
                if x.is_finite() && x.fract().abs() < 1e-10 {
                    Ok(*x as i128)
                } else {
                    Err(IntoIntError)
                }
            }
        }
    }

    /// Represent `Number` as a floating point decimal.
    /// Does not fail, but is a lossy conversion for large integers.
    pub fn as_f64(&self) -> f64 {
        match *self {
            Uint(x) => x as f64,
            Int(x) => x as f64,
            Float(x) => x,
        }
    }

    /// Parse a number from text, ignoring surrounding whitespace.
    ///
    /// Unsigned integers are tried first, then signed integers, then floats.
    pub fn parse(s: &str) -> Result<Self, ParseNumberError> {
        let trimmed = s.trim();
        let bytes = trimmed.as_bytes();

        if bytes.is_empty() {
            return Err(ParseNumberError(s.to_string()));
        }

        if let Ok(x) = lexical_core::parse::<u128>(bytes) {
            Ok(Uint(x))
        } else if let Ok(x) = lexical_core::parse::<i128>(bytes) {
            Ok(Int(x))
        } else {
            fast_float::parse::<f64, _>(bytes)
                .map(Float)
                .map_err(|_| ParseNumberError(s.to_string()))
        }
    }
}

impl FromStr for Number {
    type Err = ParseNumberError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Number::parse(s)
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Uint(x) => write!(f, "{}", x),
            Int(x) => write!(f, "{}", x),
            Float(x) => write!(f, "{}", x),
        }
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Number) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

macro_rules! partial_impls {
    ( $( $t:ty ),* ) => {
	$(
	impl PartialEq<$t> for Number {
	    fn eq(&self, rhs: &$t) -> bool {
		self.eq(&Number::from(*rhs))
	    }
	}

	impl PartialOrd<$t> for Number {
	    fn partial_cmp(&self, rhs: &$t) -> Option<Ordering> {
		Some(self.cmp(&Number::from(*rhs)))
	    }
	}
	)*
    };
}

partial_impls!(usize, u8, u16, u32, u64, u128, isize, i8, i16, i32, i64, i128, f32, f64);

impl Eq for Number {}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Number) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Number {
    fn cmp(&self, other: &Number) -> Ordering {
        match (*self, *other) {
            (Uint(lhs), Uint(rhs)) => lhs.cmp(&rhs),
            (Int(lhs), Int(rhs)) => lhs.cmp(&rhs),
            (Float(lhs), Float(rhs)) => cmp_float_to_float(lhs, rhs),

            (Uint(lhs), Int(rhs)) => cmp_uint_to_int(lhs, rhs),
            (Int(lhs), Uint(rhs)) => cmp_uint_to_int(rhs, lhs).reverse(),

            (Float(lhs), Uint(rhs)) => cmp_float_to_uint(lhs, rhs),
            (Uint(lhs), Float(rhs)) => cmp_float_to_uint(rhs, lhs).reverse(),
            (Float(lhs), Int(rhs)) => cmp_float_to_int(lhs, rhs),
            (Int(lhs), Float(rhs)) => cmp_float_to_int(rhs, lhs).reverse(),
        }
    }
}

impl Hash for Number {
    fn hash<H: Hasher>(&self, state: &mut H) {
        canonical(*self).hash(state)
    }
}

/// A hashable form that agrees with equality: integers hash by value whatever their variant, and
/// a float holding an integer hashes as that integer.
fn canonical(n: Number) -> (u8, u128) {
    const SIGNED: u8 = 0;
    const UNSIGNED: u8 = 1;
    const FLOAT: u8 = 2;

    match n {
        Uint(x) => match i128::try_from(x) {
            Ok(x) => (SIGNED, x as u128),
            Err(_) => (UNSIGNED, x),
        },
        Int(x) => (SIGNED, x as u128),
        Float(x) if x.is_nan() => (FLOAT, f64::NAN.to_bits() as u128),
        Float(x) if x.is_finite() && x.fract() == 0.0 => {
            if x >= i128::MIN as f64 && x < i128::MAX as f64 {
                (SIGNED, x as i128 as u128)
            } else if x > 0.0 && x < u128::MAX as f64 {
                (UNSIGNED, x as u128)
            } else {
                (FLOAT, x.to_bits() as u128)
            }
        }
        Float(x) => (FLOAT, x.to_bits() as u128),
    }
}

/// `[ -INF | ... | C0 | ... | +INF | CNaN ]`
fn cmp_float_to_float(lhs: f64, rhs: f64) -> Ordering {
    match lhs.partial_cmp(&rhs) {
        Some(ordering) => ordering,
        None => match (lhs.is_nan(), rhs.is_nan()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            _ => Ordering::Less,
        },
    }
}

fn cmp_uint_to_int(lhs: u128, rhs: i128) -> Ordering {
    match rhs.try_into() {
        Ok(rhs) => lhs.cmp(&rhs),
        Err(_) => Ordering::Greater,
    }
}

fn cmp_float_to_uint(lhs: f64, rhs: u128) -> Ordering {
    // u128::MAX as f64 rounds up to 2^128
    if lhs.is_nan() || lhs >= u128::MAX as f64 {
        Ordering::Greater
    } else if lhs < 0.0 {
        Ordering::Less
    } else {
        cmp_bounds(lhs.floor() as u128, lhs.ceil() as u128, rhs)
    }
}

fn cmp_float_to_int(lhs: f64, rhs: i128) -> Ordering {
    if lhs < i128::MIN as f64 {
        Ordering::Less
    } else if lhs.is_nan() || lhs >= i128::MAX as f64 {
        Ordering::Greater
    } else {
        cmp_bounds(lhs.floor() as i128, lhs.ceil() as i128, rhs)
    }
}

/// Compare an integer against the `floor`/`ceil` pair bracketing a float.
fn cmp_bounds<T: Ord>(floor: T, ceil: T, rhs: T) -> Ordering {
    match (floor.cmp(&rhs), ceil.cmp(&rhs)) {
        (Ordering::Equal, Ordering::Equal) => Ordering::Equal,
        (Ordering::Less, _) => Ordering::Less,
        _ => Ordering::Greater,
    }
}

macro_rules! from_impls {
	( $variant:ident as $wide:ty: $( $t:ty ),* ) => {
		$(
			impl From<$t> for Number {
				fn from(x: $t) -> Self {
					Number::$variant(x as $wide)
				}
			}
		)*
	};
}

from_impls!(Uint as u128: usize, u8, u16, u32, u64, u128);
from_impls!(Int as i128: isize, i8, i16, i32, i64, i128);

impl From<f32> for Number {
    fn from(x: f32) -> Self {
        // go through text so 0.1f32 becomes 0.1 rather than 0.10000000149011612
        Number::Float(fast_float::parse::<f64, _>(x.to_string()).unwrap_or_else(|_| f64::from(x)))
    }
}

impl From<f64> for Number {
    fn from(x: f64) -> Self {
        Number::Float(x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_float_cmp() {
        use std::f64::{INFINITY, NAN, NEG_INFINITY};
        use Ordering::*;

        assert_eq!(cmp_float_to_float(0.0, -0.0), Equal);
        assert_eq!(cmp_float_to_float(0.1, 0.0), Greater);
        assert_eq!(cmp_float_to_float(-3.14, 3.14), Less);

        assert_eq!(cmp_float_to_float(NAN, INFINITY), Greater);
        assert_eq!(cmp_float_to_float(NEG_INFINITY, NAN), Less);
        assert_eq!(cmp_float_to_float(NAN, NAN), Equal);
        assert_eq!(cmp_float_to_float(INFINITY, INFINITY), Equal);
    }

    #[test]
    fn canonicalized_ordering() {
        use std::f64::{INFINITY, NAN, NEG_INFINITY};

        let mut set = std::collections::BTreeSet::new();

        set.insert(Number::from(0));
        set.insert((-0.0).into());
        set.insert((-1.0).into());
        set.insert(0.5.into());
        set.insert(INFINITY.into());
        set.insert((-100).into());
        set.insert(NAN.into());
        set.insert(NAN.into());
        set.insert(NEG_INFINITY.into());
        set.insert(100.0.into());

        let expected: Vec<Number> =
            vec![NEG_INFINITY, -100.0, -1.0, 0.0, 0.5, 100.0, INFINITY, NAN]
                .into_iter()
                .map(Number::from)
                .collect();

        assert_eq!(set.into_iter().collect::<Vec<_>>(), expected);
    }

    #[test]
    fn huge_floats_do_not_saturate() {
        let two_127 = 2f64.powi(127);
        let two_128 = 2f64.powi(128);

        assert_ne!(Number::from(two_127), Number::from(i128::MAX));
        assert!(Number::from(two_127) > Number::from(i128::MAX));
        assert_eq!(Number::from(two_127), Number::from(1u128 << 127));
        assert!(Number::from(-two_127 * 2.0) < Number::from(i128::MIN));
        assert_eq!(Number::from(-two_127), Number::from(i128::MIN));

        assert_ne!(Number::from(two_128), Number::from(u128::MAX));
        assert!(Number::from(1e40) > Number::from(u128::MAX));
    }

    #[test]
    fn equal_numbers_hash_equally() {
        use std::collections::hash_map::DefaultHasher;

        fn hash(n: Number) -> u64 {
            let mut h = DefaultHasher::new();
            n.hash(&mut h);
            h.finish()
        }

        let groups = vec![
            vec![Number::from(7u8), Number::from(7i64), Number::from(7.0)],
            vec![Number::from(0u8), Number::from(0i8), Number::from(0.0), Number::from(-0.0)],
            vec![Number::from(-3i32), Number::from(-3.0)],
            vec![Number::from(1u128 << 127), Number::from(2f64.powi(127))],
            vec![Number::from(f64::NAN), Number::from(-f64::NAN)],
            vec![Number::from(f64::INFINITY), Number::from(f64::INFINITY)],
        ];

        for group in groups {
            for a in &group {
                for b in &group {
                    assert_eq!(a, b);
                    assert_eq!(hash(*a), hash(*b));
                }
            }
        }

        assert_ne!(hash(Number::from(7)), hash(Number::from(7.5)));
        assert_ne!(hash(Number::from(u128::MAX)), hash(Number::from(-1)));
    }

    #[test]
    fn integer_conversions() {
        assert_eq!(Number::from(100i32).as_u128(), Ok(100));
        assert_eq!(Number::from(100.0).as_u128(), Ok(100));
        assert_eq!(Number::from(3.0 + 5e-11).as_u128(), Ok(3));
        assert_eq!(Number::from(-100i32).as_u128(), Err(IntoIntError));
        assert_eq!(Number::from(0.5).as_u128(), Err(IntoIntError));
        assert_eq!(Number::from(f64::NAN).as_i128(), Err(IntoIntError));
        assert_eq!(Number::from(-7.0).as_i128(), Ok(-7));
    }

    #[test]
    fn mixed_comparisons() {
        assert!(Number::from(128u128) > Number::from(-128i128));
        assert!(Number::from(128u128) > Number::from(-3.14));
        assert!(Number::from(f64::INFINITY) > Number::from(u128::MAX));
        assert!(Number::from(f64::NAN) > Number::from(i128::MAX));
        assert_eq!(Number::from(128u128), Number::from(128.0));
        assert!(Number::from(128i128) < Number::from(128.1));
        assert_ne!(Number::from(-123), Number::from(123usize));
        assert_eq!(Number::from(123isize), Number::from(123usize));
    }

    #[test]
    fn parsing() {
        assert_eq!(Number::parse(" 12 "), Ok(Uint(12)));
        assert_eq!(Number::parse("-12"), Ok(Int(-12)));
        assert_eq!(Number::parse("1e3"), Ok(Float(1000.0)));
        assert_eq!(Number::parse(""), Err(ParseNumberError(String::new())));
        assert!(Number::parse("12 apples").is_err());
    }

    #[test]
    fn f32_goes_through_text() {
        assert_eq!(Number::from(0.1f32), Float(0.1));
    }
}
