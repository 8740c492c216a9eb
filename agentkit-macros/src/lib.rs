use proc_macro::TokenStream;

mod state;
mod tools;

/// Turns the listed methods of an impl block into tool types.
///
/// ```ignore
/// #[tools(recipe_search = "Search for recipes and cooking instructions")]
/// impl CookingTools {
///     async fn recipe_search(&self, params: RecipeSearchParams) -> Result<String, ToolError> { ... }
/// }
/// ```
///
/// generates `CookingToolsRecipeSearch(pub CookingTools)` implementing
/// `agentkit_core::ToolFunction`.
#[proc_macro_attribute]
pub fn tools(attr: TokenStream, item: TokenStream) -> TokenStream {
    tools::tools_impl(attr, item)
}

#[proc_macro_derive(State, attributes(update))]
pub fn derive_state(input: TokenStream) -> TokenStream {
    state::derive_state_impl(input)
}
