//! Dynamically typed arguments.
//!
//! Every value handed to an emission travels as an [`Arg`]: a shared,
//! type-erased box that remembers the [`TypeTag`] of what it holds.
//! Listeners declare the types they expect and the emitter compares tags
//! before invoking them.

use std::{
    any::{Any, TypeId},
    borrow::Cow,
    fmt,
    hash::{Hash, Hasher},
    sync::Arc,
};

/// A type that may be passed as an emission argument.
///
/// Implemented for the primitive types, `String`, `&'static str`, `Vec<T>`,
/// `Option<T>` and [`Listener`]. User types can derive it with
/// `#[derive(ArgType)]` (feature `macros` of the `hark` crate) or implement
/// it by hand, in which case the default [`type_name`] is
/// [`std::any::type_name`].
///
/// [`Listener`]: crate::Listener
/// [`type_name`]: ArgType::type_name
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot be passed as an emission argument",
    label = "missing `ArgType` implementation",
    note = "Derive `ArgType` or implement it by hand; the type must be `Clone + Send + Sync + 'static`."
)]
pub trait ArgType: Any + Clone + Send + Sync {
    /// Human readable name used in signature error messages.
    fn type_name() -> Cow<'static, str> {
        Cow::Borrowed(std::any::type_name::<Self>())
    }
}

macro_rules! impl_arg_type {
    ($($ty:ty => $name:literal),+ $(,)?) => {
        $(
            impl ArgType for $ty {
                fn type_name() -> Cow<'static, str> {
                    Cow::Borrowed($name)
                }
            }
        )+
    };
}

impl_arg_type!(
    () => "()",
    bool => "bool",
    char => "char",
    i8 => "i8",
    i16 => "i16",
    i32 => "i32",
    i64 => "i64",
    i128 => "i128",
    isize => "isize",
    u8 => "u8",
    u16 => "u16",
    u32 => "u32",
    u64 => "u64",
    u128 => "u128",
    usize => "usize",
    f32 => "f32",
    f64 => "f64",
    String => "String",
    &'static str => "&str",
);

impl<T: ArgType> ArgType for Vec<T> {
    fn type_name() -> Cow<'static, str> {
        Cow::Owned(format!("Vec<{}>", T::type_name()))
    }
}

impl<T: ArgType> ArgType for Option<T> {
    fn type_name() -> Cow<'static, str> {
        Cow::Owned(format!("Option<{}>", T::type_name()))
    }
}

/// Runtime identity of an argument or parameter type.
///
/// Two tags are equal when they describe the same Rust type; the name is
/// carried along for messages only.
#[derive(Clone, Debug)]
pub struct TypeTag {
    id: TypeId,
    name: Cow<'static, str>,
}

impl TypeTag {
    /// The tag of `T`.
    pub fn of<T: ArgType>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: T::type_name(),
        }
    }

    /// The underlying [`TypeId`].
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// The human readable type name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl PartialEq for TypeTag {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeTag {}

impl Hash for TypeTag {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// A single type-erased emission argument.
///
/// Cloning is O(1): the value sits behind an `Arc` and is shared by every
/// listener of an emission.
///
/// # Example
///
/// ```rust,ignore
/// let arg = Arg::new(42);
/// assert!(arg.is::<i32>());
/// assert_eq!(arg.get::<i32>(), Some(42));
/// assert_eq!(arg.type_name(), "i32");
/// ```
#[derive(Clone)]
pub struct Arg {
    value: Arc<dyn Any + Send + Sync>,
    tag: TypeTag,
}

impl Arg {
    /// Wrap a value.
    pub fn new<T: ArgType>(value: T) -> Self {
        Self {
            value: Arc::new(value),
            tag: TypeTag::of::<T>(),
        }
    }

    /// The tag of the wrapped value.
    pub fn type_tag(&self) -> &TypeTag {
        &self.tag
    }

    /// The type name of the wrapped value.
    pub fn type_name(&self) -> &str {
        self.tag.name()
    }

    /// Returns `true` if the wrapped value is a `T`.
    pub fn is<T: Any>(&self) -> bool {
        self.tag.id == TypeId::of::<T>()
    }

    /// Borrow the wrapped value as a `T`.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.value.downcast_ref::<T>()
    }

    /// Clone the wrapped value out as a `T`.
    pub fn get<T: ArgType>(&self) -> Option<T> {
        self.downcast_ref::<T>().cloned()
    }
}

impl<T: ArgType> From<T> for Arg {
    fn from(value: T) -> Self {
        Arg::new(value)
    }
}

impl fmt::Debug for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Arg")
            .field("type", &self.tag.name())
            .finish_non_exhaustive()
    }
}

/// Builds a `Vec<Arg>` from a list of values.
///
/// Each value goes through `Arg::from`, so anything implementing
/// [`ArgType`] works, as do values that already are [`Arg`]s.
///
/// ```rust,ignore
/// emitter.emit_sync("login", args![42_u64, "alice".to_string(), true])?;
/// ```
#[macro_export]
macro_rules! args {
    () => {
        ::std::vec::Vec::<$crate::Arg>::new()
    };
    ($($value:expr),+ $(,)?) => {
        ::std::vec![$($crate::Arg::from($value)),+]
    };
}
