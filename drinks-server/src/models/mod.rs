use serde::de::{self, Deserializer, IgnoredAny, MapAccess, Visitor};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use utoipa::ToSchema;

/// Errors raised while validating a recipe
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RecipeError {
    #[error("recipe must contain at least one ingredient")]
    Empty,
    #[error("ingredient {0} has an empty name")]
    EmptyName(usize),
    #[error("ingredient {0} has an empty color")]
    EmptyColor(usize),
    #[error("ingredient {0} must have at least one part")]
    ZeroParts(usize),
    #[error("stored recipe could not be decoded: {0}")]
    Decode(String),
}

/// Errors raised while turning a request payload into a store operation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("title is required")]
    MissingTitle,
    #[error("title must not be empty")]
    EmptyTitle,
    #[error("recipe is required")]
    MissingRecipe,
    #[error("nothing to update, provide a title or a recipe")]
    EmptyPatch,
    #[error(transparent)]
    Recipe(#[from] RecipeError),
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq, Eq)]
pub struct Ingredient {
    /// Ingredient name, hidden from the public listing
    pub name: String,
    /// Display color
    pub color: String,
    /// Ratio component of this ingredient in the drink
    pub parts: u32,
}

/// Ingredient as exposed by the public listing (no name)
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq, Eq)]
pub struct ShortIngredient {
    pub color: String,
    pub parts: u32,
}

/// Recipe as accepted on the wire: one ingredient or a list of them
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq)]
#[serde(untagged)]
pub enum RecipeInput {
    One(Ingredient),
    Many(Vec<Ingredient>),
}

/// A validated, ordered, non-empty list of ingredients.
///
/// The only way to build one is through [`Recipe::try_from`] or
/// [`Recipe::from_stored`], both of which validate every ingredient, so any
/// `Recipe` handed to the store is known to round-trip.
#[derive(Debug, Serialize, ToSchema, Clone, PartialEq, Eq)]
#[serde(transparent)]
pub struct Recipe(Vec<Ingredient>);

impl Recipe {
    fn validate(ingredients: Vec<Ingredient>) -> Result<Self, RecipeError> {
        if ingredients.is_empty() {
            return Err(RecipeError::Empty);
        }
        for (index, ingredient) in ingredients.iter().enumerate() {
            if ingredient.name.trim().is_empty() {
                return Err(RecipeError::EmptyName(index));
            }
            if ingredient.color.trim().is_empty() {
                return Err(RecipeError::EmptyColor(index));
            }
            if ingredient.parts == 0 {
                return Err(RecipeError::ZeroParts(index));
            }
        }
        Ok(Self(ingredients))
    }

    /// Decode a recipe from its persisted JSON text
    pub fn from_stored(text: &str) -> Result<Self, RecipeError> {
        let ingredients: Vec<Ingredient> =
            serde_json::from_str(text).map_err(|e| RecipeError::Decode(e.to_string()))?;
        Self::validate(ingredients)
    }

    /// Encode the recipe into the text form persisted by the store
    pub fn to_stored(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.0)
    }

    pub fn ingredients(&self) -> &[Ingredient] {
        &self.0
    }

    /// The recipe without ingredient names
    pub fn short(&self) -> Vec<ShortIngredient> {
        self.ingredients()
            .iter()
            .map(|ingredient| ShortIngredient {
                color: ingredient.color.clone(),
                parts: ingredient.parts,
            })
            .collect()
    }
}

impl TryFrom<RecipeInput> for Recipe {
    type Error = RecipeError;

    fn try_from(input: RecipeInput) -> Result<Self, Self::Error> {
        match input {
            RecipeInput::One(ingredient) => Self::validate(vec![ingredient]),
            RecipeInput::Many(ingredients) => Self::validate(ingredients),
        }
    }
}

/// A stored drink, serialized as its long (detailed) projection
#[derive(Debug, Serialize, ToSchema, Clone, PartialEq, Eq)]
pub struct Drink {
    /// Identifier assigned by the store
    pub id: i64,
    /// Unique title
    pub title: String,
    /// Full recipe including ingredient names
    pub recipe: Recipe,
}

/// Public projection of a drink
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq, Eq)]
pub struct ShortDrink {
    pub id: i64,
    pub title: String,
    pub recipe: Vec<ShortIngredient>,
}

impl Drink {
    pub fn short(&self) -> ShortDrink {
        ShortDrink {
            id: self.id,
            title: self.title.clone(),
            recipe: self.recipe.short(),
        }
    }
}

/// Request body for creating or updating a drink.
///
/// Only a JSON object is accepted; the positional (array) form serde would
/// otherwise derive is rejected.
#[derive(Debug, Serialize, ToSchema, Clone, PartialEq, Default)]
pub struct DrinkPayload {
    /// Drink title, required on create
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Single ingredient or list of ingredients, required on create
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipe: Option<RecipeInput>,
}

impl<'de> Deserialize<'de> for DrinkPayload {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(DrinkPayloadVisitor)
    }
}

struct DrinkPayloadVisitor;

impl<'de> Visitor<'de> for DrinkPayloadVisitor {
    type Value = DrinkPayload;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a JSON object with `title` and/or `recipe`")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut title: Option<Option<String>> = None;
        let mut recipe: Option<Option<RecipeInput>> = None;

        while let Some(key) = map.next_key::<String>()? {
            match key.as_str() {
                "title" => {
                    if title.is_some() {
                        return Err(de::Error::duplicate_field("title"));
                    }
                    title = Some(map.next_value()?);
                }
                "recipe" => {
                    if recipe.is_some() {
                        return Err(de::Error::duplicate_field("recipe"));
                    }
                    recipe = Some(map.next_value()?);
                }
                _ => {
                    map.next_value::<IgnoredAny>()?;
                }
            }
        }

        Ok(DrinkPayload {
            title: title.flatten(),
            recipe: recipe.flatten(),
        })
    }
}

/// A validated drink ready to be inserted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDrink {
    pub title: String,
    pub recipe: Recipe,
}

/// A validated partial update; absent fields keep their stored value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrinkPatch {
    pub title: Option<String>,
    pub recipe: Option<Recipe>,
}

fn validate_title(title: String) -> Result<String, ValidationError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(ValidationError::EmptyTitle);
    }
    Ok(title.to_string())
}

impl NewDrink {
    pub fn new(title: impl Into<String>, recipe: Recipe) -> Result<Self, ValidationError> {
        Ok(Self {
            title: validate_title(title.into())?,
            recipe,
        })
    }
}

impl TryFrom<DrinkPayload> for NewDrink {
    type Error = ValidationError;

    fn try_from(payload: DrinkPayload) -> Result<Self, Self::Error> {
        let title = payload.title.ok_or(ValidationError::MissingTitle)?;
        let recipe = payload.recipe.ok_or(ValidationError::MissingRecipe)?;
        Self::new(title, Recipe::try_from(recipe)?)
    }
}

impl TryFrom<DrinkPayload> for DrinkPatch {
    type Error = ValidationError;

    fn try_from(payload: DrinkPayload) -> Result<Self, Self::Error> {
        if payload.title.is_none() && payload.recipe.is_none() {
            return Err(ValidationError::EmptyPatch);
        }
        Ok(Self {
            title: payload.title.map(validate_title).transpose()?,
            recipe: payload.recipe.map(Recipe::try_from).transpose()?,
        })
    }
}
