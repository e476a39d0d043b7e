//! Shopping lists built from the meal plan.
//!
//! Ingredients are grouped by name. Quantities are summed per unit and never
//! converted, so "200 g" and "1 kg" of chicken stay as two lines.

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::models::{
    format_amount, Component, ComponentUuid, MealPlan, Quantity, Recipe, RecipeUuid, Unit,
};

/// Summed amount of one ingredient in one unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UnitTotal {
    pub unit: Unit,
    pub value: f64,
}

impl UnitTotal {
    pub fn new(unit: Unit, value: f64) -> Self {
        Self { unit, value }
    }

    pub fn as_quantity(&self) -> Quantity {
        Quantity::new(self.unit, self.value)
    }
}

/// What the selected meals need of one ingredient.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ShoppingListEntry {
    /// Names of the recipes that use the ingredient, first-seen order.
    pub meals: IndexSet<String>,
    /// One total per unit, first-seen order.
    pub quantities: Vec<UnitTotal>,
}

impl ShoppingListEntry {
    fn add(&mut self, unit: Unit, value: f64) {
        match self.quantities.iter_mut().find(|q| q.unit == unit) {
            Some(total) => total.value += value,
            None => self.quantities.push(UnitTotal::new(unit, value)),
        }
    }

    /// Total for `unit`, if the ingredient was ever needed in that unit.
    pub fn total(&self, unit: Unit) -> Option<f64> {
        self.quantities
            .iter()
            .find(|q| q.unit == unit)
            .map(|q| q.value)
    }
}

/// Ingredient name to entry, in the order ingredients were first met.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShoppingList {
    pub items: IndexMap<String, ShoppingListEntry>,
}

impl ShoppingList {
    pub fn get(&self, ingredient: &str) -> Option<&ShoppingListEntry> {
        self.items.get(ingredient)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ShoppingListEntry)> {
        self.items.iter()
    }

    /// Plain text suitable for pasting into a notes or shopping app.
    ///
    /// One `- ...` line per ingredient and unit; ingredients without any
    /// measured amount get a single line with just their name.
    pub fn to_text(&self) -> String {
        let mut lines = Vec::new();
        for (name, entry) in &self.items {
            if entry.quantities.is_empty() {
                lines.push(format!("- {}", name));
                continue;
            }
            for total in &entry.quantities {
                let line = match total.unit {
                    Unit::Number => format!("- {} {}", format_amount(total.value), name),
                    _ => format!("- {}", total.as_quantity().to_string_with_ingredient(name)),
                };
                lines.push(line);
            }
        }
        lines.join("\n")
    }
}

impl fmt::Display for ShoppingList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

/// Build the shopping list for the plan entries whose date is selected.
///
/// Ingredient amounts are per serving and get multiplied by the planned
/// servings. Plan entries that point at a recipe or component that no longer
/// exists are skipped. Unitless ingredients still record the meal but add no
/// quantity.
pub fn create_shopping_list_data(
    recipes: &[Recipe],
    meal_plan: &MealPlan,
    selected_dates: &HashSet<String>,
) -> ShoppingList {
    let recipes_by_id: HashMap<&RecipeUuid, &Recipe> =
        recipes.iter().map(|r| (&r.id, r)).collect();
    let components_by_id: HashMap<(&RecipeUuid, &ComponentUuid), &Component> = recipes
        .iter()
        .flat_map(|r| r.components.iter().map(move |c| ((&r.id, &c.id), c)))
        .collect();

    let mut list = ShoppingList::default();

    for entry in &meal_plan.entries {
        if !selected_dates.contains(&entry.date) {
            continue;
        }

        for (recipe_id, planned) in &entry.plan {
            for plan_component in planned {
                let resolved = recipes_by_id.get(recipe_id).zip(
                    components_by_id.get(&(recipe_id, &plan_component.component_id)),
                );
                let Some((recipe, component)) = resolved else {
                    tracing::debug!(
                        date = %entry.date,
                        recipe = %recipe_id,
                        component = %plan_component.component_id,
                        "skipping planned component with no matching recipe"
                    );
                    continue;
                };

                let servings = f64::from(plan_component.servings);
                for ingredient in &component.ingredients {
                    let item = list.items.entry(ingredient.name.clone()).or_default();
                    item.meals.insert(recipe.name.clone());

                    let quantity = ingredient.quantity;
                    if !quantity.unit.is_measured() {
                        continue;
                    }
                    item.add(quantity.unit, quantity.value.unwrap_or(0.0) * servings);
                }
            }
        }
    }

    list
}
