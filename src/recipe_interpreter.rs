use serde::Serialize;

use crate::api_connection::endpoints::{RecipeSearchResult, SPOONACULAR_ATTRIBUTION};
use crate::display::DisplayEntry;
use crate::error::FridgeError;

pub const MISSED_INGREDIENTS_FIELD: &str = "Missed ingredients: ";
pub const USED_INGREDIENTS_FIELD: &str = "Used ingredients: ";

/// A recipe suggestion with ingredient names already title-cased for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recipe {
    pub name: String,
    pub image_url: Option<String>,
    pub missed_ingredients: Vec<String>,
    pub used_ingredients: Vec<String>,
    pub used_count: u32,
}

impl From<RecipeSearchResult> for Recipe {
    fn from(result: RecipeSearchResult) -> Self {
        Self {
            name: result.title,
            image_url: result.image,
            missed_ingredients: result
                .missed_ingredients
                .iter()
                .map(|i| title_case(&i.name))
                .collect(),
            used_ingredients: result
                .used_ingredients
                .iter()
                .map(|i| title_case(&i.name))
                .collect(),
            used_count: result.used_ingredient_count,
        }
    }
}

impl Recipe {
    /// The used-ingredients field only appears when the recipe uses something from the fridge.
    pub fn to_display_entry(&self) -> DisplayEntry {
        let mut entry = DisplayEntry::titled(&self.name)
            .with_image(self.image_url.clone())
            .with_field(MISSED_INGREDIENTS_FIELD, self.missed_ingredients.join("\n"));
        if self.used_count > 0 {
            entry = entry.with_field(USED_INGREDIENTS_FIELD, self.used_ingredients.join("\n"));
        }
        entry.with_footer(SPOONACULAR_ATTRIBUTION)
    }
}

/// Parses a raw `findByIngredients` body.
pub fn interpret(raw: &str) -> Result<Vec<Recipe>, FridgeError> {
    let results: Vec<RecipeSearchResult> = serde_json::from_str(raw)?;
    Ok(results.into_iter().map(Recipe::from).collect())
}

/// Upper-cases the first letter of every word; anything that is not a letter,
/// digit or underscore separates words.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut at_word_start = true;
    for c in text.chars() {
        if at_word_start {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
        at_word_start = !(c.is_alphanumeric() || c == '_');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RESPONSE: &str = r#"[
        {
            "id": 641803,
            "title": "Easy & Delish! ~ Apple Crumble",
            "image": "https://img.spoonacular.com/recipes/641803-312x231.jpg",
            "imageType": "jpg",
            "usedIngredientCount": 2,
            "missedIngredientCount": 2,
            "missedIngredients": [
                { "id": 1001, "name": "butter", "amount": 2.0 },
                { "id": 2010, "name": "ground cinnamon", "amount": 1.0 }
            ],
            "usedIngredients": [
                { "id": 9003, "name": "apples", "amount": 6.0 },
                { "id": 1077, "name": "milk", "amount": 1.0 }
            ],
            "unusedIngredients": [],
            "likes": 1
        },
        {
            "id": 73420,
            "title": "Sun-Dried Tomato Pasta",
            "image": "https://img.spoonacular.com/recipes/73420-312x231.jpg",
            "usedIngredientCount": 0,
            "missedIngredientCount": 1,
            "missedIngredients": [{ "name": "sun-dried tomatoes" }],
            "usedIngredients": []
        }
    ]"#;

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("ground cinnamon"), "Ground Cinnamon");
        assert_eq!(title_case("sun-dried tomatoes"), "Sun-Dried Tomatoes");
        assert_eq!(title_case("1% milk"), "1% Milk");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn test_interpret_partitions_ingredients() {
        let recipes = interpret(SAMPLE_RESPONSE).unwrap();
        assert_eq!(recipes.len(), 2);

        let crumble = &recipes[0];
        assert_eq!(crumble.name, "Easy & Delish! ~ Apple Crumble");
        assert_eq!(crumble.missed_ingredients, vec!["Butter", "Ground Cinnamon"]);
        assert_eq!(crumble.used_ingredients, vec!["Apples", "Milk"]);
        assert_eq!(crumble.used_count, 2);
    }

    #[test]
    fn test_used_field_present_only_when_used_count_positive() {
        let recipes = interpret(SAMPLE_RESPONSE).unwrap();

        let crumble = recipes[0].to_display_entry();
        assert_eq!(crumble.field(MISSED_INGREDIENTS_FIELD), Some("Butter\nGround Cinnamon"));
        assert_eq!(crumble.field(USED_INGREDIENTS_FIELD), Some("Apples\nMilk"));
        assert_eq!(
            crumble.image_url.as_deref(),
            Some("https://img.spoonacular.com/recipes/641803-312x231.jpg")
        );
        assert_eq!(crumble.footer.as_deref(), Some(SPOONACULAR_ATTRIBUTION));

        let pasta = recipes[1].to_display_entry();
        assert_eq!(pasta.field(MISSED_INGREDIENTS_FIELD), Some("Sun-Dried Tomatoes"));
        assert_eq!(pasta.field(USED_INGREDIENTS_FIELD), None);
        assert_eq!(pasta.fields.len(), 1);
    }

    #[test]
    fn test_missing_optional_fields_default() {
        let recipes = interpret(r#"[{ "title": "Toast" }]"#).unwrap();
        assert_eq!(recipes[0].image_url, None);
        assert!(recipes[0].missed_ingredients.is_empty());
        assert_eq!(recipes[0].used_count, 0);
    }

    #[test]
    fn test_empty_array_is_no_recipes() {
        assert!(interpret("[]").unwrap().is_empty());
    }

    #[test]
    fn test_unexpected_shape_is_decode_error() {
        assert!(matches!(
            interpret(r#"{ "status": "failure", "code": 402 }"#),
            Err(FridgeError::DecodeError(_))
        ));
        assert!(matches!(interpret("not json"), Err(FridgeError::DecodeError(_))));
    }
}
