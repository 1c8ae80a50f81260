//! Domain model for drinks and the recipe codec.
//!
//! A recipe is persisted as a JSON text blob; the encode/decode boundary
//! lives here so the storage representation can be swapped later.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use utoipa::ToSchema;

/// One entry of a drink recipe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Ingredient {
    /// Ingredient name, e.g. "Coffee"
    pub name: String,
    /// Display color code, e.g. "#8B4513"
    pub color: String,
    /// Proportion weight, at least 1
    pub parts: u32,
}

/// A persisted drink. The recipe field holds the raw serialized blob and is
/// decoded on projection.
#[derive(Debug, Clone, PartialEq)]
pub struct Drink {
    pub id: i32,
    pub title: String,
    pub recipe: String,
}

impl Drink {
    /// Decodes the stored recipe blob.
    pub fn ingredients(&self) -> Result<Vec<Ingredient>, serde_json::Error> {
        decode_recipe(&self.recipe)
    }

    /// Short representation: id, title, and per-ingredient color/parts only.
    pub fn short(&self) -> Result<Value, serde_json::Error> {
        let recipe: Vec<Value> = self
            .ingredients()?
            .into_iter()
            .map(|ingredient| {
                json!({
                    "color": ingredient.color,
                    "parts": ingredient.parts,
                })
            })
            .collect();
        Ok(json!({
            "id": self.id,
            "title": self.title,
            "recipe": recipe,
        }))
    }

    /// Long representation: id, title, and full ingredient detail.
    pub fn long(&self) -> Result<Value, serde_json::Error> {
        let recipe = self.ingredients()?;
        Ok(json!({
            "id": self.id,
            "title": self.title,
            "recipe": recipe,
        }))
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RecipeRepr {
    Many(Vec<Ingredient>),
    One(Ingredient),
}

/// Decodes a recipe blob, accepting either a sequence of ingredients or a
/// lone ingredient mapping. A lone mapping is normalized into a
/// single-element sequence.
pub fn decode_recipe(raw: &str) -> Result<Vec<Ingredient>, serde_json::Error> {
    Ok(match serde_json::from_str(raw)? {
        RecipeRepr::Many(ingredients) => ingredients,
        RecipeRepr::One(ingredient) => vec![ingredient],
    })
}

/// Serializes ingredients to the stored blob form, always as a sequence.
pub fn encode_recipe(ingredients: &[Ingredient]) -> Result<String, serde_json::Error> {
    serde_json::to_string(ingredients)
}

/// Validates a request-supplied recipe value with the same leniency as
/// [`decode_recipe`]. Rejects empty recipes and non-positive parts.
pub fn parse_recipe(value: &Value) -> Result<Vec<Ingredient>, String> {
    let ingredients = match serde_json::from_value::<RecipeRepr>(value.clone()) {
        Ok(RecipeRepr::Many(ingredients)) => ingredients,
        Ok(RecipeRepr::One(ingredient)) => vec![ingredient],
        Err(_) => {
            return Err(
                "recipe must be an ingredient or a list of ingredients, each with \
                 name, color and parts"
                    .to_string(),
            )
        }
    };

    if ingredients.is_empty() {
        return Err("recipe must contain at least one ingredient".to_string());
    }
    if ingredients.iter().any(|ingredient| ingredient.parts == 0) {
        return Err("ingredient parts must be a positive integer".to_string());
    }

    Ok(ingredients)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mocha() -> Drink {
        Drink {
            id: 7,
            title: "Mocha".to_string(),
            recipe: r##"[{"name":"Coffee","color":"#8B4513","parts":1},{"name":"Chocolate","color":"#3B1F0B","parts":2}]"##
                .to_string(),
        }
    }

    #[test]
    fn test_decode_sequence() {
        let ingredients = decode_recipe(r##"[{"name":"Coffee","color":"#8B4513","parts":1}]"##).unwrap();
        assert_eq!(ingredients.len(), 1);
        assert_eq!(ingredients[0].name, "Coffee");
        assert_eq!(ingredients[0].parts, 1);
    }

    #[test]
    fn test_decode_normalizes_lone_mapping() {
        let ingredients = decode_recipe(r##"{"name":"Milk","color":"#FFFFFF","parts":3}"##).unwrap();
        assert_eq!(ingredients.len(), 1);
        assert_eq!(ingredients[0].name, "Milk");
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(decode_recipe("not json").is_err());
        assert!(decode_recipe(r#""just a string""#).is_err());
        assert!(decode_recipe(r#"[{"name":"Milk"}]"#).is_err());
    }

    #[test]
    fn test_encode_round_trip() {
        let drink = mocha();
        let ingredients = drink.ingredients().unwrap();
        let encoded = encode_recipe(&ingredients).unwrap();
        assert_eq!(decode_recipe(&encoded).unwrap(), ingredients);
    }

    #[test]
    fn test_short_strips_names() {
        let short = mocha().short().unwrap();
        assert_eq!(short["id"], 7);
        assert_eq!(short["title"], "Mocha");
        let recipe = short["recipe"].as_array().unwrap();
        assert_eq!(recipe.len(), 2);
        assert_eq!(recipe[0]["color"], "#8B4513");
        assert_eq!(recipe[0]["parts"], 1);
        assert!(recipe[0].get("name").is_none());
    }

    #[test]
    fn test_long_keeps_ingredient_order() {
        let long = mocha().long().unwrap();
        let recipe = long["recipe"].as_array().unwrap();
        assert_eq!(recipe[0]["name"], "Coffee");
        assert_eq!(recipe[1]["name"], "Chocolate");
        assert_eq!(recipe[1]["parts"], 2);
    }

    #[test]
    fn test_projection_fails_on_corrupt_blob() {
        let drink = Drink {
            id: 1,
            title: "Broken".to_string(),
            recipe: "{{".to_string(),
        };
        assert!(drink.short().is_err());
        assert!(drink.long().is_err());
    }

    #[test]
    fn test_parse_recipe_accepts_lone_mapping() {
        let value = serde_json::json!({"name":"Coffee","color":"#8B4513","parts":1});
        let ingredients = parse_recipe(&value).unwrap();
        assert_eq!(ingredients.len(), 1);
    }

    #[test]
    fn test_parse_recipe_ignores_extra_fields() {
        let value = serde_json::json!([{"name":"Coffee","color":"#8B4513","parts":1,"origin":"Kenya"}]);
        assert!(parse_recipe(&value).is_ok());
    }

    #[test]
    fn test_parse_recipe_rejects_bad_input() {
        assert!(parse_recipe(&serde_json::json!([])).is_err());
        assert!(parse_recipe(&serde_json::json!("espresso")).is_err());
        assert!(parse_recipe(&serde_json::json!([{"name":"Coffee","color":"#8B4513","parts":0}])).is_err());
        assert!(parse_recipe(&serde_json::json!([{"name":"Coffee","color":"#8B4513","parts":-1}])).is_err());
        assert!(parse_recipe(&serde_json::json!([{"name":"Coffee","parts":1}])).is_err());
    }
}
