//! Recipe data, as loaded from JSON files produced by the recipe views.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeIngredient {
    pub quantity: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub recipe_name: String,
    pub description: String,
    #[serde(default)]
    pub prep_time: String,
    #[serde(default)]
    pub cook_time: String,
    #[serde(default)]
    pub servings: String,
    pub ingredients: Vec<RecipeIngredient>,
    pub instructions: Vec<String>,
}

impl Recipe {
    /// Parse a recipe from its JSON form.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// `"1 cup flour, 2 eggs"`
    pub fn ingredient_summary(&self) -> String {
        self.ingredients
            .iter()
            .map(|i| format!("{} {}", i.quantity, i.name))
            .collect::<Vec<_>>()
            .join(", ")
    }
}
