//! Procedural macros for hark.
//!
//! Use them through the `hark` crate (feature `macros`), which the
//! generated code refers to by absolute path.

use proc_macro::TokenStream;

mod arg_type;

/// Derive macro for implementing the `ArgType` trait.
///
/// The type must be `Clone + Send + Sync + 'static`. Its name in signature
/// errors is module-qualified unless overridden:
///
/// ```rust,ignore
/// #[derive(Clone, ArgType)]
/// #[arg_type(name = "Login")]
/// struct LoginEvent { user: u64 }
/// ```
#[proc_macro_derive(ArgType, attributes(arg_type))]
pub fn derive_arg_type(input: TokenStream) -> TokenStream {
    arg_type::derive_arg_type_impl(input)
}
