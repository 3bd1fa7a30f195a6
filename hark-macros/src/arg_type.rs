//! `#[derive(ArgType)]`.
//!
//! The generated `type_name` is the module-qualified type name, so signature
//! errors read `my_app::events::Login` rather than a bare `Login`. Generic
//! parameters are bound by `ArgType` and their names are spliced in.

use proc_macro::TokenStream;
use quote::quote;
use syn::{
    Attribute, DeriveInput, GenericParam, Ident, LitStr, Token,
    parse::{Parse, ParseStream},
    parse_macro_input, parse_quote,
};

/// Derive macro for implementing the `ArgType` trait.
pub fn derive_arg_type_impl(input: TokenStream) -> TokenStream {
    let mut input = parse_macro_input!(input as DeriveInput);

    let args = match ArgTypeArgs::from_attrs(&input.attrs) {
        Ok(args) => args,
        Err(err) => return err.to_compile_error().into(),
    };

    let mut type_params = Vec::new();
    for param in &input.generics.params {
        match param {
            GenericParam::Type(ty) => type_params.push(ty.ident.clone()),
            GenericParam::Lifetime(lt) => {
                return syn::Error::new_spanned(
                    lt,
                    "ArgType cannot be derived for types with lifetime parameters; arguments must be 'static",
                )
                .to_compile_error()
                .into();
            }
            GenericParam::Const(c) => {
                return syn::Error::new_spanned(
                    c,
                    "ArgType cannot be derived for types with const parameters",
                )
                .to_compile_error()
                .into();
            }
        }
    }

    let where_clause = input.generics.make_where_clause();
    for ident in &type_params {
        where_clause
            .predicates
            .push(parse_quote!(#ident: ::hark::ArgType));
    }

    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let base = match &args.name {
        Some(custom) => quote! { #custom },
        None => quote! { ::core::concat!(::core::module_path!(), "::", ::core::stringify!(#name)) },
    };

    let body = if type_params.is_empty() {
        quote! { ::std::borrow::Cow::Borrowed(#base) }
    } else {
        quote! {
            let params: ::std::vec::Vec<::std::borrow::Cow<'static, str>> =
                ::std::vec![#(<#type_params as ::hark::ArgType>::type_name()),*];
            ::std::borrow::Cow::Owned(::std::format!("{}<{}>", #base, params.join(", ")))
        }
    };

    let expanded = quote! {
        impl #impl_generics ::hark::ArgType for #name #ty_generics #where_clause {
            fn type_name() -> ::std::borrow::Cow<'static, str> {
                #body
            }
        }
    };

    TokenStream::from(expanded)
}

/// Arguments of the `#[arg_type(..)]` helper attribute.
#[derive(Default)]
struct ArgTypeArgs {
    name: Option<String>,
}

impl ArgTypeArgs {
    fn from_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut args = ArgTypeArgs::default();
        for attr in attrs.iter().filter(|a| a.path().is_ident("arg_type")) {
            let parsed: ArgTypeArgs = attr.parse_args()?;
            if parsed.name.is_some() {
                args.name = parsed.name;
            }
        }
        Ok(args)
    }
}

impl Parse for ArgTypeArgs {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let mut name = None;

        while !input.is_empty() {
            let ident: Ident = input.parse()?;
            input.parse::<Token![=]>()?;

            match ident.to_string().as_str() {
                "name" => {
                    let lit: LitStr = input.parse()?;
                    name = Some(lit.value());
                }
                other => {
                    return Err(syn::Error::new(
                        ident.span(),
                        format!("unknown attribute: {}", other),
                    ));
                }
            }

            if input.peek(Token![,]) {
                input.parse::<Token![,]>()?;
            }
        }

        Ok(ArgTypeArgs { name })
    }
}
