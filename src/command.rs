use std::collections::HashMap;
use std::str::FromStr;
use tracing::{error, info};

use crate::api_connection::RecipeLookup;
use crate::display::DisplayEntry;
use crate::error::FridgeError;
use crate::fridge::{FridgeStore, Ingredient};
use crate::recipe_interpreter::interpret;
use crate::recipe_query::{build_query, QueryConfig};
use crate::store::KeyValueStore;

pub const INGREDIENT_FLAG: &str = "ingredient";

pub const FRIDGE_TITLE: &str = "Your Fridge";
pub const INGREDIENTS_FIELD: &str = "Ingredients: ";
pub const EMPTY_FRIDGE_MESSAGE: &str = "There are no ingredients stored in your fridge";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subcommand {
    View,
    /// `get` or `check`
    Suggest,
    /// `add` or `set`
    Add,
    /// `delete` or `remove`
    Remove,
}

impl FromStr for Subcommand {
    type Err = FridgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "view" => Ok(Self::View),
            "get" | "check" => Ok(Self::Suggest),
            "add" | "set" => Ok(Self::Add),
            "delete" | "remove" => Ok(Self::Remove),
            _ => Err(FridgeError::UnknownSubcommand(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CommandRequest {
    pub subcommand: String,
    pub flags: HashMap<String, String>,
    pub user_id: String,
}

impl CommandRequest {
    pub fn new(subcommand: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            subcommand: subcommand.into(),
            flags: HashMap::new(),
            user_id: user_id.into(),
        }
    }

    pub fn with_flag(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.flags.insert(name.into(), value.into());
        self
    }
}

/// Routes fridge sub-commands to the fridge store and the recipe lookup.
pub struct FridgeCommandHandler<S, L> {
    fridges: FridgeStore<S>,
    lookup: L,
    query_config: QueryConfig,
}

impl<S: KeyValueStore, L: RecipeLookup> FridgeCommandHandler<S, L> {
    pub fn new(store: S, lookup: L, query_config: QueryConfig) -> Self {
        Self {
            fridges: FridgeStore::new(store),
            lookup,
            query_config,
        }
    }

    /// The fridge store the handler reads and writes, for integrations that
    /// need the raw fridge alongside the rendered entries.
    pub fn fridges(&self) -> &FridgeStore<S> {
        &self.fridges
    }

    /// On error no entries are produced; the caller shows the error message instead.
    pub async fn handle(&self, request: &CommandRequest) -> Result<Vec<DisplayEntry>, FridgeError> {
        let subcommand: Subcommand = request.subcommand.parse()?;
        let user_id = request.user_id.as_str();
        info!(user_id, ?subcommand, "Handling fridge command");

        match subcommand {
            Subcommand::View => self.view(user_id).await,
            Subcommand::Suggest => {
                // No filters are defined for suggestions yet.
                if let Some(flag) = request.flags.keys().min() {
                    return Err(FridgeError::UnsupportedFlag(flag.clone()));
                }
                self.suggest_recipes(user_id).await
            }
            Subcommand::Add => {
                let ingredient = ingredient_flag(&request.flags)?;
                self.fridges.add(user_id, &ingredient).await?;
                Ok(vec![DisplayEntry::titled(format!("Added ingredient {}", ingredient))])
            }
            Subcommand::Remove => {
                let ingredient = ingredient_flag(&request.flags)?;
                self.fridges.remove(user_id, &ingredient).await?;
                Ok(vec![DisplayEntry::titled(format!("Removed ingredient {}", ingredient))])
            }
        }
    }

    pub async fn handle_fridge_command(
        &self,
        subcommand: &str,
        flags: &HashMap<String, String>,
        user_id: &str,
    ) -> Result<Vec<DisplayEntry>, FridgeError> {
        let request = CommandRequest {
            subcommand: subcommand.to_string(),
            flags: flags.clone(),
            user_id: user_id.to_string(),
        };
        self.handle(&request).await
    }

    async fn view(&self, user_id: &str) -> Result<Vec<DisplayEntry>, FridgeError> {
        let fridge = self.fridges.get(user_id).await?;
        let listing = if fridge.is_empty() {
            EMPTY_FRIDGE_MESSAGE.to_string()
        } else {
            fridge
                .iter()
                .map(Ingredient::as_str)
                .collect::<Vec<_>>()
                .join("\n")
        };
        Ok(vec![DisplayEntry::titled(FRIDGE_TITLE).with_field(INGREDIENTS_FIELD, listing)])
    }

    async fn suggest_recipes(&self, user_id: &str) -> Result<Vec<DisplayEntry>, FridgeError> {
        let fridge = self.fridges.get(user_id).await?;
        let query = build_query(&fridge, &self.query_config)?;

        let raw = self
            .lookup
            .find_by_ingredients(&query)
            .await
            .inspect_err(|e| error!(user_id, "Recipe lookup failed: {}", e))?;
        let recipes = interpret(&raw).inspect_err(|e| error!(user_id, "Recipe decode failed: {}", e))?;

        info!(user_id, recipes = recipes.len(), "Found recipes");
        Ok(recipes.iter().map(|recipe| recipe.to_display_entry()).collect())
    }
}

/// A blank value counts as missing.
fn ingredient_flag(flags: &HashMap<String, String>) -> Result<Ingredient, FridgeError> {
    let value = flags
        .get(INGREDIENT_FLAG)
        .filter(|value| !value.trim().is_empty())
        .ok_or(FridgeError::MissingIngredientFlag)?;
    Ingredient::new(value).ok_or_else(|| FridgeError::InvalidIngredient(value.trim().to_string()))
}
