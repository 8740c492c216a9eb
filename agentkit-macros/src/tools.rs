use convert_case::{Case, Casing};
use proc_macro::TokenStream;
use proc_macro2::TokenStream as Pm2TokenStream;
use quote::{quote, ToTokens};
use syn::{
    parse::Parse, parse::ParseStream, punctuated::Punctuated, token::Comma, Error, FnArg,
    ImplItem, ImplItemFn, Item, MetaNameValue, Result as SynResult, ReturnType, Type,
};

/// Comma-separated `method = "description"` pairs.
struct ToolsAttribute {
    name_values: Punctuated<MetaNameValue, Comma>,
}

impl Parse for ToolsAttribute {
    fn parse(input: ParseStream) -> SynResult<Self> {
        let name_values = Punctuated::<MetaNameValue, Comma>::parse_terminated(input)?;
        Ok(Self { name_values })
    }
}

pub fn tools_impl(attr: TokenStream, item: TokenStream) -> TokenStream {
    let tool_map = match parse_tools_map(attr.into()) {
        Ok(map) => map,
        Err(err) => return err.to_compile_error().into(),
    };

    let parsed_item = syn::parse_macro_input!(item as Item);
    let item_impl = match parsed_item {
        Item::Impl(ii) => ii,
        other => {
            return Error::new_spanned(other, "#[tools(...)] can only be applied to an impl block.")
                .to_compile_error()
                .into();
        }
    };

    let tool_type = &*item_impl.self_ty;
    let mut expansions = Vec::new();

    for (method_name, description) in tool_map {
        let Some(method_fn) = find_method_by_name(&item_impl.items, &method_name) else {
            let msg = format!("Method `{}` not found in impl block.", method_name);
            expansions.push(Error::new_spanned(&item_impl, msg).to_compile_error());
            continue;
        };

        let (params_ty, success_ty, is_result) = match parse_param_and_return(method_fn) {
            Ok(parsed) => parsed,
            Err(err) => {
                expansions.push(err.to_compile_error());
                continue;
            }
        };

        let struct_name = syn::Ident::new(
            &format!("{}{}", type_to_ident_str(tool_type), to_pascal(&method_name)),
            method_fn.sig.ident.span(),
        );
        let method_ident = &method_fn.sig.ident;

        let call_stmt = if is_result {
            quote! { self.0.#method_ident(params).await }
        } else {
            quote! { Ok(self.0.#method_ident(params).await) }
        };

        expansions.push(quote! {
            #[derive(Clone)]
            pub struct #struct_name(pub #tool_type);

            #[::agentkit_core::async_trait]
            impl ::agentkit_core::ToolFunction for #struct_name {
                type Params = #params_ty;
                type Response = #success_ty;

                fn name() -> &'static str { #method_name }
                fn description() -> &'static str { #description }

                async fn execute(
                    &self,
                    params: Self::Params,
                ) -> ::std::result::Result<Self::Response, ::agentkit_core::ToolError> {
                    #call_stmt
                }
            }
        });
    }

    quote! {
        #item_impl
        #(#expansions)*
    }
    .into()
}

fn parse_tools_map(attr_ts: Pm2TokenStream) -> Result<Vec<(String, String)>, Error> {
    let parsed = syn::parse2::<ToolsAttribute>(attr_ts)?;

    let mut result = Vec::new();
    for nv in parsed.name_values {
        let ident = nv
            .path
            .get_ident()
            .ok_or_else(|| Error::new_spanned(&nv.path, "Expected an identifier on left side"))?
            .to_string();

        if let syn::Expr::Lit(expr_lit) = &nv.value {
            if let syn::Lit::Str(s) = &expr_lit.lit {
                result.push((ident, s.value()));
                continue;
            }
        }
        return Err(Error::new_spanned(
            &nv.value,
            "Expected a string literal on right side (e.g. `foo = \"desc\"`)",
        ));
    }
    Ok(result)
}

fn find_method_by_name<'a>(items: &'a [ImplItem], name: &str) -> Option<&'a ImplItemFn> {
    items.iter().find_map(|item| match item {
        ImplItem::Fn(m) if m.sig.ident == name => Some(m),
        _ => None,
    })
}

/// Returns `(params_type, success_type, is_result)` for a
/// `fn(&self, params: P) -> T` or `fn(&self, params: P) -> Result<T, E>`.
fn parse_param_and_return(m: &ImplItemFn) -> Result<(Type, Type, bool), Error> {
    let params_ty = m
        .sig
        .inputs
        .iter()
        .find_map(|arg| match arg {
            FnArg::Typed(pat_type) => Some(*pat_type.ty.clone()),
            FnArg::Receiver(_) => None,
        })
        .ok_or_else(|| {
            Error::new_spanned(
                m,
                "Method must have a typed parameter, e.g. `fn foo(&self, params: X) -> ...`",
            )
        })?;

    let return_ty = match &m.sig.output {
        ReturnType::Default => {
            return Err(Error::new_spanned(
                m,
                "Method must return a type (like T or Result<T, E>)",
            ));
        }
        ReturnType::Type(_, box_ty) => *box_ty.clone(),
    };

    let (success_ty, is_result) = parse_success_type(return_ty);
    Ok((params_ty, success_ty, is_result))
}

fn parse_success_type(ty: Type) -> (Type, bool) {
    if let Type::Path(type_path) = &ty {
        if let Some(last_seg) = type_path.path.segments.last() {
            if last_seg.ident == "Result" {
                if let syn::PathArguments::AngleBracketed(ref generic_args) = last_seg.arguments {
                    let mut args_iter = generic_args.args.iter();
                    if let (Some(syn::GenericArgument::Type(success)), Some(_)) =
                        (args_iter.next(), args_iter.next())
                    {
                        return (success.clone(), true);
                    }
                }
            }
        }
    }
    (ty, false)
}

fn type_to_ident_str(ty: &Type) -> String {
    ty.to_token_stream()
        .to_string()
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect()
}

/// `recipe_search` -> `RecipeSearch`
fn to_pascal(s: &str) -> String {
    s.to_case(Case::Pascal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    #[test]
    fn test_parse_param_and_return() {
        let method: ImplItemFn = parse_quote! {
            async fn recipe_search(&self, params: RecipeSearchParams) -> Result<String, ToolError> {
                unimplemented!()
            }
        };
        let (params, success, is_result) = parse_param_and_return(&method).unwrap();
        assert_eq!(params.to_token_stream().to_string(), "RecipeSearchParams");
        assert_eq!(success.to_token_stream().to_string(), "String");
        assert!(is_result);
    }

    #[test]
    fn test_plain_return_type() {
        let method: ImplItemFn = parse_quote! {
            async fn cooking_step(&self, params: CookingStepParams) -> String {
                unimplemented!()
            }
        };
        let (_, success, is_result) = parse_param_and_return(&method).unwrap();
        assert_eq!(success.to_token_stream().to_string(), "String");
        assert!(!is_result);
    }

    #[test]
    fn test_missing_params_is_rejected() {
        let method: ImplItemFn = parse_quote! {
            async fn nothing(&self) -> String {
                unimplemented!()
            }
        };
        assert!(parse_param_and_return(&method).is_err());
    }

    #[test]
    fn test_parse_tools_map() {
        let attr: Pm2TokenStream = quote! {
            recipe_search = "Search for recipes", ingredient_check = "Check ingredients"
        };
        let map = parse_tools_map(attr).unwrap();
        assert_eq!(
            map,
            vec![
                ("recipe_search".to_string(), "Search for recipes".to_string()),
                ("ingredient_check".to_string(), "Check ingredients".to_string()),
            ]
        );
    }

    #[test]
    fn test_struct_name_parts() {
        assert_eq!(to_pascal("calculate_restructure_options"), "CalculateRestructureOptions");
        assert_eq!(to_pascal("add"), "Add");
        let ty: Type = parse_quote!(CookingTools);
        assert_eq!(type_to_ident_str(&ty), "CookingTools");
    }
}
