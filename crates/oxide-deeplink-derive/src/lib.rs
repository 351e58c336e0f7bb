//! Derive macro registering screens with a deep-link route table.
//!
//! This crate provides the `#[derive(Route)]` macro, which attaches a URI
//! pattern and a handler identifier to a type at compile time.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{Attribute, DeriveInput, Ident, LitStr, parse_macro_input};
use url::Url;

/// Derives the `Routable` trait for a screen type.
///
/// # Attributes
///
/// - `#[route("scheme://authority")]` - The deep-link pattern
/// - `#[route(pattern = "scheme://authority", handler = "Id")]` - Pattern with
///   an explicit handler identifier (optional, defaults to the type name)
///
/// The pattern must parse as an absolute URI with a non-empty host, the same
/// rule the runtime route table applies; anything else is rejected at compile
/// time.
///
/// # Generated Items
///
/// For a struct `SecondActivity` with `#[route("demo://second_activity")]`:
///
/// - `impl Routable for SecondActivity` with
///   `PATTERN = "demo://second_activity"` and `HANDLER_ID = "SecondActivity"`
#[proc_macro_derive(Route, attributes(route))]
pub fn derive_route(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    derive_route_impl(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}

fn derive_route_impl(input: DeriveInput) -> syn::Result<TokenStream2> {
    let name = &input.ident;
    let attrs = get_route_attrs(&input.attrs, name)?;

    let pattern = attrs.pattern.value();
    let handler = attrs.handler.unwrap_or_else(|| name.to_string());
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics ::oxide_deeplink::Routable for #name #ty_generics #where_clause {
            const PATTERN: &'static str = #pattern;
            const HANDLER_ID: &'static str = #handler;
        }
    })
}

struct RouteAttrs {
    pattern: LitStr,
    handler: Option<String>,
}

fn get_route_attrs(attrs: &[Attribute], name: &Ident) -> syn::Result<RouteAttrs> {
    let attr = attrs
        .iter()
        .find(|a| a.path().is_ident("route"))
        .ok_or_else(|| {
            syn::Error::new_spanned(
                name,
                "Route derive requires a #[route(\"scheme://authority\")] attribute",
            )
        })?;

    // Shorthand: #[route("demo://screen")]
    if let Ok(pattern) = attr.parse_args::<LitStr>() {
        validate_pattern(&pattern)?;
        return Ok(RouteAttrs {
            pattern,
            handler: None,
        });
    }

    let mut pattern = None;
    let mut handler = None;
    attr.parse_nested_meta(|meta| {
        if meta.path.is_ident("pattern") {
            pattern = Some(meta.value()?.parse::<LitStr>()?);
        } else if meta.path.is_ident("handler") {
            let value = meta.value()?.parse::<LitStr>()?;
            if value.value().is_empty() {
                return Err(syn::Error::new_spanned(value, "handler must not be empty"));
            }
            handler = Some(value.value());
        } else {
            return Err(meta.error("unsupported route attribute, expected `pattern` or `handler`"));
        }
        Ok(())
    })?;

    let pattern = pattern.ok_or_else(|| {
        syn::Error::new_spanned(attr, "missing `pattern = \"scheme://authority\"`")
    })?;
    validate_pattern(&pattern)?;

    Ok(RouteAttrs { pattern, handler })
}

/// Rejects patterns that `RouteEntry::new` would refuse at runtime: the
/// pattern must parse as an absolute URI with a non-empty host.
fn validate_pattern(lit: &LitStr) -> syn::Result<()> {
    let reason = match Url::parse(&lit.value()) {
        Ok(url) if url.host_str().is_some_and(|h| !h.is_empty()) => return Ok(()),
        Ok(_) => "missing authority".to_string(),
        Err(e) => e.to_string(),
    };

    Err(syn::Error::new_spanned(
        lit,
        format!("route pattern must have the form `scheme://authority`: {reason}"),
    ))
}

#[cfg(test)]
mod tests {
    use proc_macro2::Span;

    use super::*;

    fn check(pattern: &str) -> syn::Result<()> {
        validate_pattern(&LitStr::new(pattern, Span::call_site()))
    }

    #[test]
    fn test_accepts_runtime_valid_patterns() {
        for pattern in [
            "demo://second_activity",
            "demo://settings:8080/general",
            "demo://search?lang=en#top",
            "https://example.com",
        ] {
            assert!(check(pattern).is_ok(), "{pattern:?} should be accepted");
        }
    }

    #[test]
    fn test_rejects_empty_host_with_port() {
        let err = check("demo://:8080").unwrap_err();
        assert!(err.to_string().contains("scheme://authority"));
    }

    #[test]
    fn test_rejects_invalid_scheme() {
        assert!(check("1bad://host").is_err());
    }

    #[test]
    fn test_rejects_missing_authority() {
        for pattern in ["", "second_activity", "demo:second_activity", "demo://", "://host"] {
            assert!(check(pattern).is_err(), "{pattern:?} should be rejected");
        }
    }
}
