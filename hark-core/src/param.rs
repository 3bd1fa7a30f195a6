//! Parameter descriptors.
//!
//! A listener's parameters are described by [`ParamType`]s, produced from
//! the closure's argument types through the [`Param`] trait. Taking a raw
//! [`Arg`] declares an "accepts anything" parameter; any other
//! [`ArgType`] accepts exactly that type. [`Rest`] marks a variadic tail.

use crate::arg::{Arg, ArgType, TypeTag};
use std::{borrow::Cow, fmt, ops::Deref};

/// The declared type of one parameter.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ParamType {
    /// Accepts an argument of any type.
    Any,
    /// Accepts only arguments of exactly this type.
    Exact(TypeTag),
}

impl ParamType {
    /// An exact parameter of type `T`.
    pub fn of<T: ArgType>() -> Self {
        ParamType::Exact(TypeTag::of::<T>())
    }

    /// Whether an argument tagged `tag` may be bound to this parameter.
    pub fn accepts(&self, tag: &TypeTag) -> bool {
        match self {
            ParamType::Any => true,
            ParamType::Exact(expected) => expected == tag,
        }
    }

    /// The name used in error messages.
    pub fn name(&self) -> Cow<'_, str> {
        match self {
            ParamType::Any => Cow::Borrowed("any"),
            ParamType::Exact(tag) => Cow::Borrowed(tag.name()),
        }
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

/// A type a listener closure may take as a parameter.
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot be used as a listener parameter",
    label = "not an `ArgType` or `Arg`",
    note = "Parameters must implement `ArgType`, or be `Arg` to accept anything. Use `Listener::variadic` for a `Rest<T>` tail."
)]
pub trait Param: Sized + Send + 'static {
    /// The declared type of this parameter.
    fn param_type() -> ParamType;

    /// Take the parameter out of an argument, or `None` if the types differ.
    fn from_arg(arg: &Arg) -> Option<Self>;
}

impl<T: ArgType> Param for T {
    fn param_type() -> ParamType {
        ParamType::of::<T>()
    }

    fn from_arg(arg: &Arg) -> Option<Self> {
        arg.get::<T>()
    }
}

impl Param for Arg {
    fn param_type() -> ParamType {
        ParamType::Any
    }

    fn from_arg(arg: &Arg) -> Option<Self> {
        Some(arg.clone())
    }
}

/// The variadic tail of a listener: zero or more trailing arguments of `T`.
///
/// ```rust,ignore
/// let sum = Listener::variadic(|first: i32, rest: Rest<i32>| {
///     let _total = first + rest.iter().sum::<i32>();
/// });
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Rest<T>(pub Vec<T>);

impl<T> Rest<T> {
    /// Unwrap the collected values.
    pub fn into_inner(self) -> Vec<T> {
        self.0
    }
}

impl<T> Deref for Rest<T> {
    type Target = [T];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T> IntoIterator for Rest<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
