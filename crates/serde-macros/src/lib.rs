// Copyright (C) 2024-present The RouteWire Authors.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//    http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or
// implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Derive macros used by the wire-format crates: [`macro@LocatedError`] for
//! parsing-error enums and [`macro@WritingError`] for serialization-error
//! enums.

use proc_macro::TokenStream;
use quote::{format_ident, quote, TokenStreamExt};
use syn::{parse_macro_input, spanned::Spanned, Data, DeriveInput, LitStr, Path};

struct FromLocated {
    variant: syn::Ident,
    module: Path,
    located_ident: syn::Ident,
}

fn expand_located_error(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let Data::Enum(data) = &input.data else {
        return Err(syn::Error::new(
            input.span(),
            "LocatedError works only with enum error types",
        ));
    };
    let ident = input.ident.clone();
    let located_ident = format_ident!("Located{}", ident);

    let mut from_nom_variants = Vec::new();
    let mut from_external_variants = Vec::new();
    let mut from_external_types = Vec::new();
    let mut from_located = Vec::new();

    for variant in &data.variants {
        for field in &variant.fields {
            for attr in &field.attrs {
                if attr.path().is_ident("from_nom") {
                    from_nom_variants.push(variant.ident.clone());
                } else if attr.path().is_ident("from_external") {
                    from_external_variants.push(variant.ident.clone());
                    from_external_types.push(field.ty.clone());
                } else if attr.path().is_ident("from_located") {
                    let mut module: Option<Path> = None;
                    attr.parse_nested_meta(|meta| {
                        if meta.path.is_ident("module") {
                            let lit: LitStr = meta.value()?.parse()?;
                            module = Some(lit.parse_with(Path::parse_mod_style)?);
                            Ok(())
                        } else {
                            Err(meta.error("only accepts the 'module' attribute"))
                        }
                    })?;
                    let Some(module) = module else {
                        return Err(syn::Error::new(
                            attr.span(),
                            "'module' of the located error must be defined",
                        ));
                    };
                    let syn::Type::Path(ty_path) = &field.ty else {
                        return Err(syn::Error::new(
                            field.span(),
                            "from_located expects the bare name of the inner error enum",
                        ));
                    };
                    let Some(inner) = ty_path.path.get_ident() else {
                        return Err(syn::Error::new(
                            field.span(),
                            "from_located expects the bare name of the inner error enum; \
                             put the path in the 'module' attribute instead",
                        ));
                    };
                    from_located.push(FromLocated {
                        variant: variant.ident.clone(),
                        module,
                        located_ident: format_ident!("Located{}", inner),
                    });
                }
            }
        }
    }

    let mut output = quote! {
        #[derive(PartialEq, Clone, Debug)]
        #[automatically_derived]
        pub struct #located_ident<'a> {
            span: routewire_parse_utils::Span<'a>,
            error: #ident,
        }

        #[automatically_derived]
        impl<'a> #located_ident<'a> {
            pub const fn new(span: routewire_parse_utils::Span<'a>, error: #ident) -> Self {
                Self { span, error }
            }
        }

        #[automatically_derived]
        impl<'a> From<#located_ident<'a>> for (routewire_parse_utils::Span<'a>, #ident) {
            fn from(value: #located_ident<'a>) -> Self {
                (value.span, value.error)
            }
        }

        #[automatically_derived]
        impl<'a> routewire_parse_utils::LocatedParsingError for #located_ident<'a> {
            type Span = routewire_parse_utils::Span<'a>;
            type Error = #ident;

            fn span(&self) -> &Self::Span {
                &self.span
            }

            fn error(&self) -> &Self::Error {
                &self.error
            }
        }

        #[automatically_derived]
        impl<'a> nom::error::FromExternalError<routewire_parse_utils::Span<'a>, #ident> for #located_ident<'a> {
            fn from_external_error(
                input: routewire_parse_utils::Span<'a>,
                _kind: nom::error::ErrorKind,
                error: #ident,
            ) -> Self {
                #located_ident::new(input, error)
            }
        }

        #(
            #[automatically_derived]
            impl<'a> nom::error::FromExternalError<routewire_parse_utils::Span<'a>, #from_external_types> for #located_ident<'a> {
                fn from_external_error(
                    input: routewire_parse_utils::Span<'a>,
                    _kind: nom::error::ErrorKind,
                    error: #from_external_types,
                ) -> Self {
                    #located_ident::new(input, #ident::#from_external_variants(error))
                }
            }
        )*

        #(
            #[automatically_derived]
            impl<'a> nom::error::ParseError<routewire_parse_utils::Span<'a>> for #located_ident<'a> {
                fn from_error_kind(
                    input: routewire_parse_utils::Span<'a>,
                    kind: nom::error::ErrorKind,
                ) -> Self {
                    #located_ident::new(input, #ident::#from_nom_variants(kind))
                }

                fn append(
                    _input: routewire_parse_utils::Span<'a>,
                    _kind: nom::error::ErrorKind,
                    other: Self,
                ) -> Self {
                    other
                }
            }
        )*
    };

    for FromLocated {
        variant,
        module,
        located_ident: inner_located,
    } in &from_located
    {
        output.append_all(quote! {
            #[automatically_derived]
            impl<'a> From<#module::#inner_located<'a>> for #located_ident<'a> {
                fn from(value: #module::#inner_located<'a>) -> Self {
                    let (span, error) = value.into();
                    #located_ident::new(span, #ident::#variant(error))
                }
            }
        });
    }
    Ok(output)
}

/// For a given error enum `{Name}`, generates a struct `Located{Name}` that
/// carries the `Span` (the error location in the input stream) along with
/// the error itself, plus the [`From`] conversions the `nom` machinery
/// needs:
///
/// - `#[from_nom]` on an `ErrorKind` field implements
///   `nom::error::ParseError` so the enum can be used directly as a `nom`
///   error type.
/// - `#[from_external]` on a field implements
///   `nom::error::FromExternalError` from that field's type (handy with
///   `nom::combinator::map_res`).
/// - `#[from_located(module = "…")]` on a field naming another
///   `LocatedError` enum implements `From<Located{Inner}>` so nested parser
///   errors bubble up with their location preserved. `module` is the path
///   where the inner located enum lives (`"self"` for the same module).
///
/// Example:
/// ```no_compile
/// use routewire_serde_macros::LocatedError;
///
/// #[derive(LocatedError, PartialEq, Clone, Debug)]
/// pub enum MessageParsingError {
///     NomError(#[from_nom] nom::error::ErrorKind),
///     HeaderError(#[from_located(module = "self")] HeaderParsingError),
///     UndefinedKind(#[from_external] UndefinedKind),
/// }
///
/// #[derive(LocatedError, PartialEq, Clone, Debug)]
/// pub enum HeaderParsingError {
///     NomError(#[from_nom] nom::error::ErrorKind),
/// }
///
/// #[derive(Copy, Clone, PartialEq, Debug)]
/// pub struct UndefinedKind(pub u8);
/// ```
#[proc_macro_derive(LocatedError, attributes(from_nom, from_external, from_located))]
pub fn located_error(input: TokenStream) -> TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);
    expand_located_error(&ast)
        .map(TokenStream::from)
        .unwrap_or_else(|err| TokenStream::from(err.to_compile_error()))
}

fn expand_writing_error(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let Data::Enum(data) = &input.data else {
        return Err(syn::Error::new(
            input.span(),
            "WritingError works only with enum error types",
        ));
    };
    let ident = input.ident.clone();

    let mut output = proc_macro2::TokenStream::new();
    for variant in &data.variants {
        for field in &variant.fields {
            for attr in &field.attrs {
                let variant_ident = &variant.ident;
                if attr.path().is_ident("from_std_io_error") {
                    output.append_all(quote! {
                        #[automatically_derived]
                        impl From<std::io::Error> for #ident {
                            fn from(err: std::io::Error) -> Self {
                                #ident::#variant_ident(err.to_string())
                            }
                        }
                    });
                } else if attr.path().is_ident("from") {
                    let field_ty = &field.ty;
                    output.append_all(quote! {
                        #[automatically_derived]
                        impl From<#field_ty> for #ident {
                            fn from(err: #field_ty) -> Self {
                                #ident::#variant_ident(err)
                            }
                        }
                    });
                }
            }
        }
    }
    Ok(output)
}

/// Decorates an `enum` used as the error of a binary-protocol serializer:
///
/// - `#[from_std_io_error]` on a `String` field generates a
///   `From<std::io::Error>` implementation storing the error message.
/// - `#[from]` on a field generates a `From` implementation for the field's
///   type, so nested writers chain with `?`.
///
/// Example:
/// ```no_compile
/// use routewire_serde_macros::WritingError;
///
/// #[derive(WritingError, PartialEq, Clone, Debug)]
/// pub enum HeaderWritingError {
///     StdIOError(#[from_std_io_error] String),
/// }
///
/// #[derive(WritingError, PartialEq, Clone, Debug)]
/// pub enum MessageWritingError {
///     StdIOError(#[from_std_io_error] String),
///     HeaderError(#[from] HeaderWritingError),
/// }
/// ```
#[proc_macro_derive(WritingError, attributes(from_std_io_error, from))]
pub fn writing_error(input: TokenStream) -> TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);
    expand_writing_error(&ast)
        .map(TokenStream::from)
        .unwrap_or_else(|err| TokenStream::from(err.to_compile_error()))
}
