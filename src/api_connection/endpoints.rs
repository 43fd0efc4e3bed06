use serde::{Deserialize, Serialize};

pub const SPOONACULAR_BASE_URL: &str = "https://api.spoonacular.com";
pub const FIND_BY_INGREDIENTS_PATH: &str = "/recipes/findByIngredients";

/// Attribution shown under every recipe card.
pub const SPOONACULAR_ATTRIBUTION: &str = "Data provided by Spoonacular";

/// One entry of the `findByIngredients` response array.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RecipeSearchResult {
    pub title: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub missed_ingredients: Vec<RecipeIngredient>,
    #[serde(default)]
    pub used_ingredients: Vec<RecipeIngredient>,
    #[serde(default)]
    pub used_ingredient_count: u32,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RecipeIngredient {
    pub name: String,
}
