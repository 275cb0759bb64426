//! Payload values and the comparison contract.
//!
//! Node payloads are compared through [`Comparable`], which evaluates one
//! [`CmpOp`] at a time and may refuse it. The refusal is the point: textual
//! and boolean payloads only answer equality questions, so a tree keyed on
//! them fails loudly instead of producing an arbitrary order.
//!
//! [`Value`] is the dynamic payload type for mixed-type collections. When the
//! receiver and the operand are of different variants, a limited coercion is
//! applied first, and which coercion depends on the *receiver*:
//!
//! - a [`Value::Str`] receiver compares against the operand's display string;
//! - a [`Value::Bool`] receiver compares against the operand's truthiness;
//! - numeric receivers compare numerically, with `Bool` counting as 0 or 1.
//!
//! The contract is asymmetric on purpose, `Str("1") == Int(1)` holds while
//! `Int(1) == Str("1")` does not.

use std::cmp::Ordering;
use std::fmt;
use std::mem;

use crate::error::{Error, Result};

/// A comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CmpOp {
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
}

impl CmpOp {
    /// Whether this is an ordering operator, i.e. not `Eq` or `Ne`.
    pub fn is_ordering(self) -> bool { !matches!(self, CmpOp::Eq | CmpOp::Ne) }

    /// Evaluate the operator on the result of a three-way comparison.
    pub fn eval(self, ord: Ordering) -> bool {
        match self {
            CmpOp::Lt => ord == Ordering::Less,
            CmpOp::Le => ord != Ordering::Greater,
            CmpOp::Gt => ord == Ordering::Greater,
            CmpOp::Ge => ord != Ordering::Less,
            CmpOp::Eq => ord == Ordering::Equal,
            CmpOp::Ne => ord != Ordering::Equal,
        }
    }
}

impl fmt::Display for CmpOp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            CmpOp::Lt => "<",
            CmpOp::Le => "<=",
            CmpOp::Gt => ">",
            CmpOp::Ge => ">=",
            CmpOp::Eq => "==",
            CmpOp::Ne => "!=",
        };
        f.write_str(s)
    }
}

/// A payload that can be compared under the node comparison contract.
pub trait Comparable<Rhs: ?Sized = Self> {
    /// Evaluate `self <op> other`.
    ///
    /// # Returns
    ///
    /// - `Ok(bool)`: The result of the comparison.
    /// - [`Error::UnorderedComparison`] if `op` is an ordering operator and
    ///   the payloads cannot be ordered.
    fn compare(&self, op: CmpOp, other: &Rhs) -> Result<bool>;
}

macro_rules! impl_ordered {
    ($($ty:ty),*) => {
        $(
            impl Comparable for $ty {
                fn compare(&self, op: CmpOp, other: &Self) -> Result<bool> {
                    // NaN is unordered, only `!=` holds
                    Ok(match self.partial_cmp(other) {
                        Some(ord) => op.eval(ord),
                        None => op == CmpOp::Ne,
                    })
                }
            }
        )*
    };
}

impl_ordered!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64);

fn equality_only<T: PartialEq>(lhs: &T, op: CmpOp, rhs: &T, ty: &'static str) -> Result<bool> {
    match op {
        CmpOp::Eq => Ok(lhs == rhs),
        CmpOp::Ne => Ok(lhs != rhs),
        _ => Err(Error::UnorderedComparison {
            op,
            ty,
            against: ty,
        }),
    }
}

impl Comparable for String {
    fn compare(&self, op: CmpOp, other: &Self) -> Result<bool> {
        equality_only(self, op, other, "str")
    }
}

impl Comparable for bool {
    fn compare(&self, op: CmpOp, other: &Self) -> Result<bool> {
        equality_only(self, op, other, "bool")
    }
}

/// A dynamically typed payload.
#[derive(Debug, Clone, Default)]
pub enum Value {
    #[default]
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::None => "none",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "str",
        }
    }

    /// `None`, `false`, zero and the empty string are falsy.
    pub fn truthy(&self) -> bool {
        match self {
            Value::None => false,
            Value::Bool(b) => *b,
            Value::Int(i) => *i != 0,
            Value::Float(x) => *x != 0.0,
            Value::Str(s) => !s.is_empty(),
        }
    }

    fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Bool(b) => Some(i64::from(*b)),
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(x) => Some(*x),
            _ => self.as_i64().map(|i| i as f64),
        }
    }

    /// Numeric three-way comparison.
    ///
    /// The outer [`None`] means the two values are not both numeric, the inner
    /// [`None`] means they are numeric but unordered (NaN).
    fn numeric_cmp(&self, other: &Value) -> Option<Option<Ordering>> {
        if let (Some(a), Some(b)) = (self.as_i64(), other.as_i64()) {
            return Some(Some(a.cmp(&b)));
        }
        let (a, b) = (self.as_f64()?, other.as_f64()?);
        Some(a.partial_cmp(&b))
    }
}

/// Raw equality, without the receiver-driven coercion of [`Comparable`].
///
/// Numbers are equal across `Bool`, `Int` and `Float` when numerically equal;
/// strings only equal strings and `None` only equals `None`.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::None, Value::None) => true,
            (Value::Str(a), Value::Str(b)) => a == b,
            _ => self.numeric_cmp(other) == Some(Some(Ordering::Equal)),
        }
    }
}

impl Comparable for Value {
    fn compare(&self, op: CmpOp, other: &Value) -> Result<bool> {
        let coerced;
        let other = if mem::discriminant(self) != mem::discriminant(other) {
            match self {
                Value::Str(_) => {
                    coerced = Value::Str(other.to_string());
                    &coerced
                }
                Value::Bool(_) => {
                    coerced = Value::Bool(other.truthy());
                    &coerced
                }
                _ => other,
            }
        } else {
            other
        };

        let unordered = || Error::UnorderedComparison {
            op,
            ty: self.type_name(),
            against: other.type_name(),
        };

        if op.is_ordering() && matches!(self, Value::Str(_) | Value::Bool(_)) {
            return Err(unordered());
        }

        match op {
            CmpOp::Eq => Ok(self == other),
            CmpOp::Ne => Ok(self != other),
            _ => match self.numeric_cmp(other) {
                Some(Some(ord)) => Ok(op.eval(ord)),
                Some(None) => Ok(false),
                None => Err(unordered()),
            },
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::None => f.write_str("None"),
            Value::Bool(true) => f.write_str("True"),
            Value::Bool(false) => f.write_str("False"),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{:?}", x),
            Value::Str(s) => f.write_str(s),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self { Value::Bool(b) }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self { Value::Int(i64::from(i)) }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self { Value::Int(i) }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self { Value::Float(x) }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self { Value::Str(s.to_owned()) }
}

impl From<String> for Value {
    fn from(s: String) -> Self { Value::Str(s) }
}
