//! Callback adapters.
//!
//! Turns plain closures into type-erased callbacks over `&[Arg]`, deriving
//! the [`Signature`] from the closure's parameter types.
//!
//! # Supported shapes
//!
//! - [`Callback`]: `Fn(P1, .., Pn) -> Out` for 0 to 12 parameters
//! - [`VariadicCallback`]: `Fn(P1, .., Pk, Rest<T>) -> Out` for 0 to 8 fixed parameters
//!
//! Every `Pi` and `T` must implement [`Param`]. The return value is
//! discarded.
//!
//! ```rust,ignore
//! // (i32, String)
//! Listener::new(|id: i32, name: String| println!("{id} {name}"));
//!
//! // (bool, ...any)
//! Listener::variadic(|flag: bool, rest: Rest<Arg>| println!("{flag} {}", rest.len()));
//! ```

use crate::{
    arg::Arg,
    error::ExtractError,
    param::{Param, Rest},
    signature::Signature,
};

/// A closure that can be invoked with a fixed-arity argument list.
///
/// `Args` is a marker (`fn(P1, .., Pn) -> Out`) that lets one closure type
/// select the matching implementation.
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot be used as a listener",
    label = "not a `Fn` closure over `Param` types",
    note = "Listener closures must be `Fn(..) + Send + Sync + 'static` and every parameter must implement `Param`."
)]
pub trait Callback<Args>: Send + Sync + 'static {
    /// The signature derived from the parameter types.
    fn signature() -> Signature;

    /// Invoke the closure, extracting each parameter from `args`.
    fn invoke(&self, args: &[Arg]) -> Result<(), ExtractError>;
}

/// A closure whose last parameter is a [`Rest`] tail.
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot be used as a variadic listener",
    label = "last parameter must be `Rest<T>`",
    note = "Variadic listener closures look like `Fn(P1, .., Pk, Rest<T>)` where every parameter implements `Param`."
)]
pub trait VariadicCallback<Args>: Send + Sync + 'static {
    /// The signature derived from the parameter types.
    fn signature() -> Signature;

    /// Invoke the closure, extracting the fixed prefix and collecting the tail.
    fn invoke(&self, args: &[Arg]) -> Result<(), ExtractError>;
}

fn extract<T: Param>(args: &[Arg], position: &mut usize) -> Result<T, ExtractError> {
    let index = *position;
    *position += 1;
    let arg = args.get(index);
    arg.and_then(T::from_arg)
        .ok_or_else(|| ExtractError::new(index + 1, &T::param_type(), arg.map(Arg::type_name)))
}

fn extract_rest<T: Param>(args: &[Arg], position: usize) -> Result<Rest<T>, ExtractError> {
    args.get(position..)
        .unwrap_or_default()
        .iter()
        .map(|arg| {
            T::from_arg(arg).ok_or_else(|| {
                ExtractError::new(position + 1, &T::param_type(), Some(arg.type_name()))
            })
        })
        .collect::<Result<Vec<T>, _>>()
        .map(Rest)
}

/// Macro to implement Callback for closures with N parameters.
macro_rules! impl_callback {
    ($($T:ident),*) => {
        impl<F, Out, $($T,)*> Callback<fn($($T,)*) -> Out> for F
        where
            F: Fn($($T,)*) -> Out + Send + Sync + 'static,
            $($T: Param,)*
        {
            fn signature() -> Signature {
                Signature::new([$($T::param_type()),*])
            }

            #[allow(non_snake_case, unused_mut, unused_variables)]
            fn invoke(&self, args: &[Arg]) -> Result<(), ExtractError> {
                let mut position = 0;
                $(
                    let $T = extract::<$T>(args, &mut position)?;
                )*
                let _ = (self)($($T,)*);
                Ok(())
            }
        }
    };
}

impl_callback!();
impl_callback!(T1);
impl_callback!(T1, T2);
impl_callback!(T1, T2, T3);
impl_callback!(T1, T2, T3, T4);
impl_callback!(T1, T2, T3, T4, T5);
impl_callback!(T1, T2, T3, T4, T5, T6);
impl_callback!(T1, T2, T3, T4, T5, T6, T7);
impl_callback!(T1, T2, T3, T4, T5, T6, T7, T8);
impl_callback!(T1, T2, T3, T4, T5, T6, T7, T8, T9);
impl_callback!(T1, T2, T3, T4, T5, T6, T7, T8, T9, T10);
impl_callback!(T1, T2, T3, T4, T5, T6, T7, T8, T9, T10, T11);
impl_callback!(T1, T2, T3, T4, T5, T6, T7, T8, T9, T10, T11, T12);

/// Macro to implement VariadicCallback for closures with N fixed parameters.
macro_rules! impl_variadic_callback {
    ($($T:ident),*) => {
        impl<F, Out, $($T,)* V> VariadicCallback<fn($($T,)* Rest<V>) -> Out> for F
        where
            F: Fn($($T,)* Rest<V>) -> Out + Send + Sync + 'static,
            $($T: Param,)*
            V: Param,
        {
            fn signature() -> Signature {
                Signature::variadic([$($T::param_type()),*], V::param_type())
            }

            #[allow(non_snake_case, unused_mut)]
            fn invoke(&self, args: &[Arg]) -> Result<(), ExtractError> {
                let mut position = 0;
                $(
                    let $T = extract::<$T>(args, &mut position)?;
                )*
                let rest = extract_rest::<V>(args, position)?;
                let _ = (self)($($T,)* rest);
                Ok(())
            }
        }
    };
}

impl_variadic_callback!();
impl_variadic_callback!(T1);
impl_variadic_callback!(T1, T2);
impl_variadic_callback!(T1, T2, T3);
impl_variadic_callback!(T1, T2, T3, T4);
impl_variadic_callback!(T1, T2, T3, T4, T5);
impl_variadic_callback!(T1, T2, T3, T4, T5, T6);
impl_variadic_callback!(T1, T2, T3, T4, T5, T6, T7);
impl_variadic_callback!(T1, T2, T3, T4, T5, T6, T7, T8);
