use convert_case::{Case, Casing};
use proc_macro::TokenStream;
use quote::{format_ident, quote};
use syn::{parse_macro_input, Data, DeriveInput, Error, Fields};

/// Expands `#[derive(State)]`.
///
/// Every named field becomes a variant of `<Name>Update` carrying a value of
/// the field's type. `#[update(append)]` extends the field with the value,
/// `#[update(replace)]` (the default) overwrites it.
pub fn derive_state_impl(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match expand(input) {
        Ok(ts) => ts.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand(input: DeriveInput) -> Result<proc_macro2::TokenStream, Error> {
    let name = input.ident;
    let vis = input.vis;
    let update_name = format_ident!("{}Update", name);

    let fields = match input.data {
        Data::Struct(data) => match data.fields {
            Fields::Named(fields) => fields.named,
            other => {
                return Err(Error::new_spanned(
                    other,
                    "State can only be derived for structs with named fields",
                ))
            }
        },
        _ => {
            return Err(Error::new_spanned(
                name,
                "State can only be derived for structs",
            ))
        }
    };

    let mut update_variants = vec![];
    let mut update_match_arms = vec![];

    for field in fields {
        let Some(field_name) = field.ident else {
            continue;
        };
        let field_type = field.ty;

        let strategy = match field
            .attrs
            .iter()
            .find(|attr| attr.path().is_ident("update"))
        {
            Some(attr) => attr.parse_args::<syn::Ident>()?,
            None => syn::Ident::new("replace", proc_macro2::Span::call_site()),
        };

        let variant_name = format_ident!("{}", field_name.to_string().to_case(Case::Pascal));
        update_variants.push(quote! {
            #variant_name(#field_type)
        });

        let update_impl = match strategy.to_string().as_str() {
            "append" => quote! { self.#field_name.extend(value) },
            "replace" => quote! { self.#field_name = value },
            other => {
                return Err(Error::new_spanned(
                    &strategy,
                    format!("unknown update strategy `{other}`, expected `append` or `replace`"),
                ))
            }
        };

        update_match_arms.push(quote! {
            #update_name::#variant_name(value) => { #update_impl }
        });
    }

    Ok(quote! {
        #[derive(Debug)]
        #vis enum #update_name {
            #(#update_variants),*
        }

        impl ::agentkit_core::GraphState for #name {
            type Update = #update_name;

            fn apply(&mut self, update: Self::Update) {
                match update {
                    #(#update_match_arms),*
                }
            }
        }
    })
}
