//! Cooking assistant pieces shared by the bread, cake and curry programs.

mod chat;
mod tools;

pub use chat::{
    clarification_prompt, is_quit, is_vague_input, Conversation, QUIT_WORDS, SYSTEM_PROMPT,
};
pub use tools::{
    cooking_toolbox, CookingStepParams, CookingTools, CookingToolsCookingStep,
    CookingToolsIngredientCheck, CookingToolsRecipeSearch, IngredientCheckParams,
    RecipeSearchParams,
};

/// The one-shot question asked by the bread program.
pub const BREAD_PROMPT: &str = "What is the best method for making bread?";

/// Greeting printed when the curry agent starts.
pub const CURRY_BANNER: &str = "🍳 Curry Cooking Agent initialized!\n\
I can help you with:\n\
- Finding curry recipes\n\
- Checking ingredients\n\
- Explaining cooking steps\n\
- Providing cooking tips\n\
Type 'quit' to exit.";
