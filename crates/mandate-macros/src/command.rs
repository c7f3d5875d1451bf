//! `#[command]` expansion.
//!
//! The attribute leaves the function itself in place (minus the parameter
//! annotations) and adds a describing function next to it:
//!
//! ```rust,ignore
//! #[command(name = "more-power")]
//! fn more_power(x: i64, #[arg("-y", "--epsilon")] #[default(2)] y: i64) -> i64 {
//!     x.pow(y as u32)
//! }
//!
//! // Generates:
//! // - more_power (original function)
//! // - more_power__function() -> mandate::Function
//! ```
//!
//! # Command Attributes
//!
//! | Attribute | Type | Description |
//! |-----------|------|-------------|
//! | `name` | string | Register under this name instead of the function name |
//! | `doc_style` | string | `rest` (default), `google` or `numpy` |
//!
//! # Parameter Attributes
//!
//! | Annotation | Description |
//! |------------|-------------|
//! | `#[default(expr)]` | Make the parameter an option with this default |
//! | `#[rest]` | Collect the trailing positionals (`Vec<T>` only) |
//! | `#[ctx]` | Pass the `CommandContext` (`&CommandContext` only) |
//! | `#[arg(...)]` | Explicit aliases and argument options |
//!
//! ## `#[arg(...)]`
//!
//! String literals are aliases (`"-y"`, `"--epsilon"`), followed by any of:
//!
//! | Key | Type | Description |
//! |-----|------|-------------|
//! | `value_type` | string | `int`, `float`, `str` and their short forms |
//! | `help` | string | Help text |
//! | `metavar` | string | Value placeholder in help |
//! | `action` | string | `store`, `store_true`, `store_false`, `append` |
//! | `dest` | string | Key the value is stored under |

use proc_macro2::{Span, TokenStream};
use quote::{format_ident, quote};
use syn::{
    ext::IdentExt,
    parse::{Parse, ParseStream},
    punctuated::Punctuated,
    spanned::Spanned,
    Attribute, Error, Expr, ExprLit, FnArg, Ident, ItemFn, Lit, Meta, Pat, PatType, Result,
    ReturnType, Token, Type,
};

/// Parameter annotations consumed by the macro.
const PARAM_ATTRS: &[&str] = &["arg", "ctx", "default", "rest"];

// =============================================================================
// Command-level attributes
// =============================================================================

#[derive(Default)]
struct CommandAttrs {
    name: Option<String>,
    doc_style: Option<&'static str>,
}

impl Parse for CommandAttrs {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut attrs = CommandAttrs::default();

        if input.is_empty() {
            return Ok(attrs);
        }

        let content: Punctuated<Meta, Token![,]> = Punctuated::parse_terminated(input)?;

        for meta in content {
            let nv = match meta {
                Meta::NameValue(nv) => nv,
                other => return Err(Error::new(other.span(), "expected `key = \"value\"`")),
            };
            let ident = nv.path.get_ident().map(|i| i.to_string());
            match ident.as_deref() {
                Some("name") => {
                    let name = parse_string_value(&nv.value)?;
                    if name.is_empty() || name.starts_with('-') {
                        return Err(Error::new(
                            nv.value.span(),
                            "command name must be non-empty and not start with `-`",
                        ));
                    }
                    attrs.name = Some(name);
                }
                Some("doc_style") => {
                    let raw = parse_string_value(&nv.value)?;
                    attrs.doc_style = Some(style_variant(&raw).ok_or_else(|| {
                        Error::new(
                            nv.value.span(),
                            format!("unknown doc style `{}` (expected rest, google or numpy)", raw),
                        )
                    })?);
                }
                Some(other) => {
                    return Err(Error::new(
                        nv.path.span(),
                        format!("unknown command attribute `{}`", other),
                    ));
                }
                None => {
                    return Err(Error::new(nv.path.span(), "expected identifier"));
                }
            }
        }

        Ok(attrs)
    }
}

// =============================================================================
// Parameter-level attributes
// =============================================================================

/// Parsed `#[arg(...)]` contents.
#[derive(Default)]
struct ArgAttrs {
    aliases: Vec<String>,
    value_type: Option<&'static str>,
    help: Option<String>,
    metavar: Option<String>,
    action: Option<&'static str>,
    dest: Option<String>,
}

/// How a parameter reaches the function.
enum Shape {
    Positional,
    /// Option with the default expression.
    Optional(TokenStream),
    Variadic,
    Context,
}

struct ParamInfo {
    ident: Ident,
    name: String,
    ty: Type,
    shape: Shape,
    value_type: Option<&'static str>,
    arg: Option<ArgAttrs>,
}

fn parse_string_value(expr: &Expr) -> Result<String> {
    if let Expr::Lit(ExprLit {
        lit: Lit::Str(lit_str),
        ..
    }) = expr
    {
        return Ok(lit_str.value());
    }
    Err(Error::new(expr.span(), "expected string literal"))
}

fn style_variant(name: &str) -> Option<&'static str> {
    match name.trim().to_ascii_lowercase().as_str() {
        "rest" | "rst" => Some("Rest"),
        "google" => Some("Google"),
        "numpy" => Some("Numpy"),
        _ => None,
    }
}

fn value_type_variant(name: &str) -> Option<&'static str> {
    match name.trim() {
        "n" | "num" | "number" | "i" | "int" | "integer" => Some("Integer"),
        "s" | "str" | "string" => Some("Text"),
        "f" | "float" => Some("Float"),
        _ => None,
    }
}

fn action_variant(name: &str) -> Option<&'static str> {
    match name {
        "store" => Some("Store"),
        "store_true" => Some("StoreTrue"),
        "store_false" => Some("StoreFalse"),
        "append" => Some("Append"),
        _ => None,
    }
}

fn parse_arg_attrs(attr: &Attribute) -> Result<ArgAttrs> {
    let mut attrs = ArgAttrs::default();

    if attr.meta.require_path_only().is_ok() {
        return Ok(attrs);
    }

    let items = attr.parse_args_with(Punctuated::<Expr, Token![,]>::parse_terminated)?;
    for item in items {
        match item {
            Expr::Lit(ExprLit {
                lit: Lit::Str(alias),
                ..
            }) => {
                if attrs.value_type.is_some()
                    || attrs.help.is_some()
                    || attrs.metavar.is_some()
                    || attrs.action.is_some()
                    || attrs.dest.is_some()
                {
                    return Err(Error::new(alias.span(), "aliases must come before options"));
                }
                attrs.aliases.push(alias.value());
            }
            Expr::Assign(assign) => {
                let key = match assign.left.as_ref() {
                    Expr::Path(path) => path.path.get_ident().map(|i| i.to_string()),
                    _ => None,
                };
                let value = parse_string_value(&assign.right)?;
                match key.as_deref() {
                    Some("value_type") => {
                        attrs.value_type = Some(value_type_variant(&value).ok_or_else(|| {
                            Error::new(
                                assign.right.span(),
                                format!("unknown value type `{}` (expected int, float or str)", value),
                            )
                        })?);
                    }
                    Some("action") => {
                        attrs.action = Some(action_variant(&value).ok_or_else(|| {
                            Error::new(assign.right.span(), format!("unknown action `{}`", value))
                        })?);
                    }
                    Some("help") => attrs.help = Some(value),
                    Some("metavar") => attrs.metavar = Some(value),
                    Some("dest") => attrs.dest = Some(value),
                    Some(other) => {
                        return Err(Error::new(
                            assign.left.span(),
                            format!("unknown arg attribute `{}`", other),
                        ));
                    }
                    None => {
                        return Err(Error::new(assign.left.span(), "expected identifier"));
                    }
                }
            }
            other => {
                return Err(Error::new(
                    other.span(),
                    "expected an alias string or `key = \"value\"`",
                ));
            }
        }
    }

    Ok(attrs)
}

// =============================================================================
// Type helpers
// =============================================================================

fn last_segment(ty: &Type) -> Option<&syn::PathSegment> {
    match ty {
        Type::Path(type_path) => type_path.path.segments.last(),
        _ => None,
    }
}

fn is_named(ty: &Type, name: &str) -> bool {
    last_segment(ty).is_some_and(|segment| segment.ident == name)
}

fn is_option_type(ty: &Type) -> bool {
    is_named(ty, "Option")
}

fn is_vec_type(ty: &Type) -> bool {
    is_named(ty, "Vec")
}

fn extract_inner_type(ty: &Type) -> Option<&Type> {
    if let Some(segment) = last_segment(ty) {
        if let syn::PathArguments::AngleBracketed(args) = &segment.arguments {
            if let Some(syn::GenericArgument::Type(inner)) = args.args.first() {
                return Some(inner);
            }
        }
    }
    None
}

fn is_reference_type(ty: &Type) -> bool {
    matches!(ty, Type::Reference(_))
}

/// The value type a scalar Rust type coerces to.
fn scalar_value_type(ty: &Type) -> Option<&'static str> {
    let segment = last_segment(ty)?;
    match segment.ident.to_string().as_str() {
        "i8" | "i16" | "i32" | "i64" | "i128" | "isize" | "u8" | "u16" | "u32" | "u64"
        | "u128" | "usize" => Some("Integer"),
        "f32" | "f64" => Some("Float"),
        "String" => Some("Text"),
        _ => None,
    }
}

/// Value type of a parameter, looking through `Option` and `Vec`.
fn value_type_of(ty: &Type) -> Option<&'static str> {
    if is_option_type(ty) || is_vec_type(ty) {
        extract_inner_type(ty).and_then(scalar_value_type)
    } else {
        scalar_value_type(ty)
    }
}

fn returns_result(output: &ReturnType) -> bool {
    match output {
        ReturnType::Type(_, ty) => is_named(ty, "Result"),
        ReturnType::Default => false,
    }
}

// =============================================================================
// Analysis
// =============================================================================

fn set_shape(slot: &mut Option<Shape>, shape: Shape, attr: &Attribute) -> Result<()> {
    if slot.is_some() {
        return Err(Error::new(
            attr.span(),
            "#[default], #[rest] and #[ctx] are mutually exclusive",
        ));
    }
    *slot = Some(shape);
    Ok(())
}

fn parse_param(pat_type: &PatType) -> Result<ParamInfo> {
    let ident = match pat_type.pat.as_ref() {
        Pat::Ident(pat) => pat.ident.clone(),
        other => {
            return Err(Error::new(
                other.span(),
                "expected identifier pattern for parameter",
            ))
        }
    };
    let ty = pat_type.ty.as_ref().clone();

    let mut shape = None;
    let mut arg = None;
    for attr in &pat_type.attrs {
        if attr.path().is_ident("ctx") {
            if !is_reference_type(&ty) {
                return Err(Error::new(ty.span(), "#[ctx] expects `&CommandContext`"));
            }
            set_shape(&mut shape, Shape::Context, attr)?;
        } else if attr.path().is_ident("rest") {
            if !is_vec_type(&ty) {
                return Err(Error::new(ty.span(), "#[rest] expects `Vec<T>`"));
            }
            set_shape(&mut shape, Shape::Variadic, attr)?;
        } else if attr.path().is_ident("default") {
            let expr: Expr = attr.parse_args()?;
            set_shape(&mut shape, Shape::Optional(quote! { #expr }), attr)?;
        } else if attr.path().is_ident("arg") {
            arg = Some(parse_arg_attrs(attr)?);
        }
    }

    let shape = match shape {
        Some(shape) => shape,
        None if is_reference_type(&ty) => {
            return Err(Error::new(
                ty.span(),
                "reference parameters are only supported with #[ctx]",
            ));
        }
        None if is_named(&ty, "bool") => Shape::Optional(quote! { false }),
        None if is_option_type(&ty) => Shape::Optional(quote! { ::mandate::Value::None }),
        None if is_vec_type(&ty) => {
            Shape::Optional(quote! { ::mandate::Value::List(::std::vec::Vec::new()) })
        }
        None => Shape::Positional,
    };

    if matches!(shape, Shape::Context) && arg.is_some() {
        return Err(Error::new(ty.span(), "#[arg] cannot describe the context"));
    }

    let value_type = if matches!(shape, Shape::Context) {
        None
    } else {
        value_type_of(&ty)
    };

    Ok(ParamInfo {
        name: ident.unraw().to_string(),
        ident,
        ty,
        shape,
        value_type,
        arg,
    })
}

/// Positionals come first and `#[rest]` last, as the runtime requires.
fn check_order(params: &[ParamInfo]) -> Result<()> {
    let mut saw_optional = false;
    let mut saw_rest = false;
    for param in params {
        if saw_rest && !matches!(param.shape, Shape::Context) {
            return Err(Error::new(
                param.ident.span(),
                "#[rest] must be the last command parameter",
            ));
        }
        match param.shape {
            Shape::Positional if saw_optional => {
                return Err(Error::new(
                    param.ident.span(),
                    format!(
                        "positional parameter `{}` cannot follow an option",
                        param.name
                    ),
                ));
            }
            Shape::Optional(_) => saw_optional = true,
            Shape::Variadic => saw_rest = true,
            Shape::Positional | Shape::Context => {}
        }
    }
    Ok(())
}

/// Joins `///` lines, dropping the single space rustdoc leaves after `///`.
fn doc_text(attrs: &[Attribute]) -> String {
    attrs
        .iter()
        .filter(|attr| attr.path().is_ident("doc"))
        .filter_map(|attr| match &attr.meta {
            Meta::NameValue(nv) => match &nv.value {
                Expr::Lit(ExprLit {
                    lit: Lit::Str(s), ..
                }) => Some(s.value()),
                _ => None,
            },
            _ => None,
        })
        .map(|line| match line.strip_prefix(' ') {
            Some(stripped) => stripped.to_string(),
            None => line,
        })
        .collect::<Vec<_>>()
        .join("\n")
}

// =============================================================================
// Code generation
// =============================================================================

fn generate_extraction(param: &ParamInfo) -> TokenStream {
    let ident = &param.ident;
    let name = &param.name;
    let ty = &param.ty;
    match param.shape {
        Shape::Context => quote! {},
        Shape::Variadic => quote! {
            let #ident: #ty = ::mandate::value::rest_args(&mut __args, #name)?;
        },
        Shape::Positional | Shape::Optional(_) => quote! {
            let #ident: #ty = ::mandate::value::next_arg(&mut __args, #name)?;
        },
    }
}

fn generate_call_arg(param: &ParamInfo) -> TokenStream {
    match param.shape {
        Shape::Context => quote! { __ctx },
        _ => {
            let ident = &param.ident;
            quote! { #ident }
        }
    }
}

fn generate_parameter(param: &ParamInfo) -> Option<TokenStream> {
    let name = &param.name;
    let parameter = match &param.shape {
        Shape::Context => return None,
        Shape::Positional => quote! { ::mandate::Parameter::positional(#name) },
        Shape::Optional(default) => quote! { ::mandate::Parameter::optional(#name, #default) },
        Shape::Variadic => quote! { ::mandate::Parameter::variadic(#name) },
    };
    let annotation = param.value_type.map(|variant| {
        let variant = format_ident!("{}", variant);
        quote! { .annotated(::mandate::ValueType::#variant) }
    });
    Some(quote! { .param(#parameter #annotation) })
}

fn generate_override(param: &ParamInfo) -> Option<TokenStream> {
    let arg = param.arg.as_ref()?;
    let name = &param.name;
    let aliases = &arg.aliases;

    let mut options = quote! { ::mandate::ArgOptions::new() };
    if let Some(variant) = arg.value_type {
        let variant = format_ident!("{}", variant);
        options = quote! { #options.value_type(::mandate::ValueType::#variant) };
    }
    if let Some(help) = &arg.help {
        options = quote! { #options.help(#help) };
    }
    if let Some(metavar) = &arg.metavar {
        options = quote! { #options.metavar(#metavar) };
    }
    if let Some(variant) = arg.action {
        let variant = format_ident!("{}", variant);
        options = quote! { #options.action(::mandate::Action::#variant) };
    }
    if let Some(dest) = &arg.dest {
        options = quote! { #options.dest(#dest) };
    }

    Some(quote! {
        .arg(#name, ::std::vec::Vec::<&'static str>::from([#(#aliases),*]), #options)
    })
}

pub fn command_impl(attr: TokenStream, item: TokenStream) -> Result<TokenStream> {
    let cmd_attrs: CommandAttrs = syn::parse2(attr)?;
    let fn_item: ItemFn = syn::parse2(item)?;
    let fn_name = &fn_item.sig.ident;
    let fn_vis = &fn_item.vis;

    if fn_item.sig.asyncness.is_some() {
        return Err(Error::new(
            fn_item.sig.fn_token.span(),
            "#[command] functions cannot be async",
        ));
    }
    if let Some(param) = fn_item.sig.generics.type_params().next() {
        return Err(Error::new(
            param.span(),
            "#[command] functions cannot have type parameters",
        ));
    }

    let mut params: Vec<ParamInfo> = Vec::new();
    for fn_arg in &fn_item.sig.inputs {
        match fn_arg {
            FnArg::Typed(pat_type) => params.push(parse_param(pat_type)?),
            FnArg::Receiver(_) => {
                return Err(Error::new(
                    fn_arg.span(),
                    "#[command] functions cannot have self parameter",
                ));
            }
        }
    }
    check_order(&params)?;

    let function_fn_name = format_ident!("{}__function", fn_name);
    let identity = fn_name.unraw().to_string();
    let doc = doc_text(&fn_item.attrs);

    let extractions: Vec<TokenStream> = params.iter().map(generate_extraction).collect();
    let call_args: Vec<TokenStream> = params.iter().map(generate_call_arg).collect();
    let parameters: Vec<TokenStream> = params.iter().filter_map(generate_parameter).collect();
    let overrides: Vec<TokenStream> = params.iter().filter_map(generate_override).collect();

    let call = if returns_result(&fn_item.sig.output) {
        quote! { #fn_name(#(#call_args),*) }
    } else {
        quote! {
            ::core::result::Result::<_, ::core::convert::Infallible>::Ok(#fn_name(#(#call_args),*))
        }
    };

    let named = cmd_attrs.name.as_ref().map(|name| quote! { .named(#name) });
    let style = cmd_attrs.doc_style.map(|variant| {
        let variant = Ident::new(variant, Span::call_site());
        quote! { .doc_style(::mandate::DocStyle::#variant) }
    });

    let mut clean_fn = fn_item.clone();
    for fn_arg in &mut clean_fn.sig.inputs {
        if let FnArg::Typed(pat_type) = fn_arg {
            pat_type
                .attrs
                .retain(|attr| !PARAM_ATTRS.iter().any(|name| attr.path().is_ident(name)));
        }
    }

    Ok(quote! {
        #clean_fn

        #[allow(non_snake_case, unused_mut)]
        #fn_vis fn #function_fn_name() -> ::mandate::Function {
            ::mandate::Function::with_context(
                #identity,
                |__values: ::std::vec::Vec<::mandate::Value>,
                 __ctx: &::mandate::CommandContext|
                 -> ::mandate::CommandResult {
                    let mut __args = __values.into_iter();
                    #(#extractions)*
                    ::mandate::IntoCommandResult::into_command_result(#call)
                },
            )
            .doc(#doc)
            .signature(::mandate::Signature::new() #(#parameters)*)
            #named
            #style
            #(#overrides)*
        }
    })
}
