//! Plateplan Core Library
//!
//! Recipe models, meal plan serving updates and shopping list aggregation.
//! Everything here is pure and in-memory; storage and presentation live in
//! the `plateplan` binary.

pub mod models;
pub mod planning;
pub mod shopping_list;

pub use models::{
    date_label, format_amount, Component, ComponentUuid, DateEntry, DayPlan, Ingredient, MealPlan,
    PlanComponent, Quantity, Recipe, RecipeUuid, Unit, UnitParseError,
};
pub use planning::{add_or_update_plan, apply_plan_update, ComponentDelta, PlanChange, PlanUpdate};
pub use shopping_list::{create_shopping_list_data, ShoppingList, ShoppingListEntry, UnitTotal};

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }
}
