use fxhash::FxHashSet;
use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::punctuated::Punctuated;
use syn::{
    Attribute, Data, DeriveInput, Field, Fields, FieldsNamed, GenericArgument, Ident, PathArguments,
    PathSegment, Type, Variant,
};

/// Wiring facts for a single enum variant.
struct ErrorVariant<'a> {
    ident: &'a Ident,
    source: Option<&'a Field>,
    has_context: bool,
    cfg: Vec<&'a Attribute>,
}

impl<'a> ErrorVariant<'a> {
    fn parse(variant: &'a Variant) -> syn::Result<Self> {
        let Fields::Named(fields) = &variant.fields else {
            return Err(syn::Error::new_spanned(
                &variant.ident,
                "skyline_error variants must use named fields",
            ));
        };

        let has_context = context_field(fields)?.is_some();
        let source = fields.named.iter().find(|field| is_source(field));

        if source.is_some() && !has_context {
            return Err(syn::Error::new_spanned(
                &variant.ident,
                "skyline_error variants with a source need `context: Option<Cow<'static, str>>`",
            ));
        }

        Ok(Self {
            ident: &variant.ident,
            source,
            has_context,
            cfg: variant.attrs.iter().filter(|attr| attr.path().is_ident("cfg")).collect(),
        })
    }

    fn is_internal(&self) -> bool {
        self.ident == "Internal"
    }
}

pub fn expand(input: DeriveInput) -> TokenStream {
    try_expand(&input).unwrap_or_else(syn::Error::into_compile_error)
}

fn try_expand(input: &DeriveInput) -> syn::Result<TokenStream> {
    let Data::Enum(data) = &input.data else {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "skyline_error can only be applied to enums",
        ));
    };

    let variants =
        data.variants.iter().map(ErrorVariant::parse).collect::<syn::Result<Vec<_>>>()?;

    let name = &input.ident;
    let ext = format_ident!("{}Ext", name);

    let derives = missing_derives(input);
    let ext_trait = ext_trait(name, &ext, &variants);
    let source_impls = variants
        .iter()
        .filter(|v| !v.is_internal())
        .filter_map(|v| source_impls(name, &ext, v));
    let message_impls = variants.iter().find(|v| v.is_internal()).map(|v| message_impls(name, v));

    Ok(quote! {
        #[allow(non_shorthand_field_patterns)]
        #derives
        #input

        #ext_trait
        #(#source_impls)*
        #message_impls

        #[allow(dead_code)]
        fn format_context(context: &Option<std::borrow::Cow<'static, str>>) -> std::borrow::Cow<'static, str> {
            context.as_ref().map_or(std::borrow::Cow::Borrowed(""), |c| std::borrow::Cow::Owned(format!(" ({c})")))
        }
    })
}

fn missing_derives(input: &DeriveInput) -> TokenStream {
    let mut present = FxHashSet::default();
    for attr in input.attrs.iter().filter(|attr| attr.path().is_ident("derive")) {
        let _ = attr.parse_nested_meta(|meta| {
            if let Some(segment) = meta.path.segments.last() {
                present.insert(segment.ident.to_string());
            }
            Ok(())
        });
    }

    let mut derives = Vec::new();
    if !present.contains("Debug") {
        derives.push(quote! { Debug });
    }
    if !present.contains("Error") {
        derives.push(quote! { ::thiserror::Error });
    }

    if derives.is_empty() { TokenStream::new() } else { quote! { #[derive(#(#derives),*)] } }
}

fn ext_trait(name: &Ident, ext: &Ident, variants: &[ErrorVariant<'_>]) -> TokenStream {
    let arms = variants.iter().filter(|v| v.has_context).map(|v| {
        let cfg = &v.cfg;
        let ident = v.ident;
        quote! { #(#cfg)* #name::#ident { context: slot, .. } => *slot = Some(context.into()), }
    });

    quote! {
        pub trait #ext<T> {
            fn context(self, context: impl Into<std::borrow::Cow<'static, str>>) -> Result<T, #name>;
        }

        #[automatically_derived]
        impl<T> #ext<T> for Result<T, #name> {
            #[inline]
            fn context(self, context: impl Into<std::borrow::Cow<'static, str>>) -> Self {
                self.map_err(|mut err| {
                    #[allow(unreachable_patterns)]
                    match &mut err {
                        #(#arms)*
                        _ => {}
                    }
                    err
                })
            }
        }
    }
}

fn source_impls(name: &Ident, ext: &Ident, v: &ErrorVariant<'_>) -> Option<TokenStream> {
    let field = v.source?;
    let field_name = field.ident.as_ref()?;
    let source_ty = &field.ty;
    let ident = v.ident;
    let cfg = &v.cfg;

    Some(quote! {
        #(#cfg)*
        #[automatically_derived]
        impl From<#source_ty> for #name {
            #[inline]
            fn from(#field_name: #source_ty) -> Self {
                Self::#ident { #field_name, context: None }
            }
        }

        #(#cfg)*
        #[automatically_derived]
        impl<T> #ext<T> for ::std::result::Result<T, #source_ty> {
            #[inline]
            fn context(self, context: impl Into<std::borrow::Cow<'static, str>>) -> ::std::result::Result<T, #name> {
                self.map_err(|#field_name| #name::#ident { #field_name, context: Some(context.into()) })
            }
        }
    })
}

fn message_impls(name: &Ident, v: &ErrorVariant<'_>) -> TokenStream {
    let cfg = &v.cfg;

    quote! {
        #(#cfg)*
        impl From<&'static str> for #name {
            #[inline]
            fn from(s: &'static str) -> Self {
                Self::Internal { message: std::borrow::Cow::Borrowed(s), context: None }
            }
        }

        #(#cfg)*
        impl From<String> for #name {
            #[inline]
            fn from(s: String) -> Self {
                Self::Internal { message: std::borrow::Cow::Owned(s), context: None }
            }
        }
    }
}

fn is_source(field: &Field) -> bool {
    field.ident.as_ref().is_some_and(|ident| ident == "source")
        || field.attrs.iter().any(|attr| attr.path().is_ident("source") || attr.path().is_ident("from"))
}

fn context_field(fields: &FieldsNamed) -> syn::Result<Option<&Field>> {
    let Some(field) =
        fields.named.iter().find(|field| field.ident.as_ref().is_some_and(|i| i == "context"))
    else {
        return Ok(None);
    };

    if is_context_type(&field.ty) {
        Ok(Some(field))
    } else {
        Err(syn::Error::new_spanned(&field.ty, "context field must be Option<Cow<'static, str>>"))
    }
}

// Accepts `Option<Cow<'static, str>>` under any path prefix.
fn is_context_type(ty: &Type) -> bool {
    let Some(GenericArgument::Type(cow)) = generic_args(ty, "Option").and_then(Punctuated::first)
    else {
        return false;
    };
    let Some(cow_args) = generic_args(cow, "Cow") else {
        return false;
    };

    let mut args = cow_args.iter();
    let is_static = matches!(
        args.next(),
        Some(GenericArgument::Lifetime(lifetime)) if lifetime.ident == "static"
    );
    let is_str = matches!(
        args.next(),
        Some(GenericArgument::Type(target))
            if last_segment(target).is_some_and(|seg| seg.ident == "str" && seg.arguments.is_none())
    );

    is_static && is_str && args.next().is_none()
}

fn last_segment(ty: &Type) -> Option<&PathSegment> {
    let Type::Path(path) = ty else {
        return None;
    };
    path.path.segments.last()
}

fn generic_args<'a>(
    ty: &'a Type,
    ident: &str,
) -> Option<&'a Punctuated<GenericArgument, syn::Token![,]>> {
    let segment = last_segment(ty).filter(|seg| seg.ident == ident)?;
    match &segment.arguments {
        PathArguments::AngleBracketed(args) => Some(&args.args),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    fn expanded(input: DeriveInput) -> String {
        expand(input).to_string()
    }

    #[test]
    fn rejects_structs() {
        let out = expanded(parse_quote! {
            pub struct NotAnEnum { message: String }
        });
        assert!(out.contains("compile_error"));
        assert!(out.contains("can only be applied to enums"));
    }

    #[test]
    fn rejects_tuple_variants() {
        let out = expanded(parse_quote! {
            pub enum DemoError {
                #[error("IO error: {0}")]
                Io(std::io::Error),
            }
        });
        assert!(out.contains("must use named fields"));
    }

    #[test]
    fn rejects_source_without_context() {
        let out = expanded(parse_quote! {
            pub enum DemoError {
                #[error("IO error: {source}")]
                Io { source: std::io::Error },
            }
        });
        assert!(out.contains("need `context"));
    }

    #[test]
    fn rejects_wrong_context_type() {
        let out = expanded(parse_quote! {
            pub enum DemoError {
                #[error("Internal: {message}")]
                Internal { message: String, context: Option<String> },
            }
        });
        assert!(out.contains("context field must be"));
    }

    #[test]
    fn accepts_qualified_context_type() {
        let ty: Type = parse_quote!(Option<std::borrow::Cow<'static, str>>);
        assert!(is_context_type(&ty));

        let ty: Type = parse_quote!(Option<Cow<'static, str>>);
        assert!(is_context_type(&ty));

        let ty: Type = parse_quote!(::core::option::Option<alloc::borrow::Cow<'static, str>>);
        assert!(is_context_type(&ty));

        let ty: Type = parse_quote!(Option<Cow<'a, str>>);
        assert!(!is_context_type(&ty));

        let ty: Type = parse_quote!(Option<Cow<'static, [u8]>>);
        assert!(!is_context_type(&ty));

        let ty: Type = parse_quote!(Vec<Cow<'static, str>>);
        assert!(!is_context_type(&ty));
    }

    #[test]
    fn generates_ext_trait_and_conversions() {
        let out = expanded(parse_quote! {
            pub enum DemoError {
                #[error("IO error{}: {source}", format_context(.context))]
                Io { source: std::io::Error, context: Option<Cow<'static, str>> },

                #[error("Internal{}: {message}", format_context(.context))]
                Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
            }
        });

        assert!(out.contains("pub trait DemoErrorExt"));
        assert!(out.contains("impl From < std :: io :: Error > for DemoError"));
        assert!(out.contains("impl From < & 'static str > for DemoError"));
        assert!(out.contains(":: thiserror :: Error"));
    }

    #[test]
    fn keeps_existing_derives() {
        let out = expanded(parse_quote! {
            #[derive(Debug)]
            pub enum DemoError {
                #[error("Internal{}: {message}", format_context(.context))]
                Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
            }
        });

        assert_eq!(out.matches("Debug").count(), 1);
    }
}
