//! Serving updates for the meal plan.
//!
//! Every change to a plan goes through [`add_or_update_plan`], which never
//! touches the plan it is given. Callers can keep the old value as a snapshot
//! and put it back if persisting the new one fails.

use serde::{Deserialize, Serialize};

use crate::models::{ComponentUuid, DayPlan, MealPlan, PlanComponent, RecipeUuid};

/// A signed change to the servings of one recipe component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentDelta {
    pub recipe_id: RecipeUuid,
    pub component_id: ComponentUuid,
    pub servings_increase: i32,
}

impl ComponentDelta {
    pub fn new(
        recipe_id: impl Into<RecipeUuid>,
        component_id: impl Into<ComponentUuid>,
        servings_increase: i32,
    ) -> Self {
        Self {
            recipe_id: recipe_id.into(),
            component_id: component_id.into(),
            servings_increase,
        }
    }

    /// The same change in the opposite direction.
    pub fn negated(&self) -> Self {
        Self {
            servings_increase: self.servings_increase.saturating_neg(),
            ..self.clone()
        }
    }
}

/// Deltas to apply to a single date, in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanUpdate {
    pub date: String,
    pub components: Vec<ComponentDelta>,
}

impl PlanUpdate {
    pub fn new(date: impl Into<String>, components: Vec<ComponentDelta>) -> Self {
        Self {
            date: date.into(),
            components,
        }
    }

    /// An update carrying a single delta.
    pub fn single(
        date: impl Into<String>,
        recipe_id: impl Into<RecipeUuid>,
        component_id: impl Into<ComponentUuid>,
        servings_increase: i32,
    ) -> Self {
        Self::new(
            date,
            vec![ComponentDelta::new(recipe_id, component_id, servings_increase)],
        )
    }
}

/// Result of applying an update, with whether its date was in the plan.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanChange {
    pub plan: MealPlan,
    pub date_found: bool,
}

/// Apply `update` to a copy of `current` and return the copy.
///
/// An update for a date that is not in the plan returns an unchanged copy.
pub fn add_or_update_plan(current: &MealPlan, update: &PlanUpdate) -> MealPlan {
    apply_plan_update(current, update).plan
}

/// Like [`add_or_update_plan`], but also reports whether the date existed.
pub fn apply_plan_update(current: &MealPlan, update: &PlanUpdate) -> PlanChange {
    let mut plan = current.clone();

    let Some(entry) = plan.entry_mut(&update.date) else {
        tracing::debug!(date = %update.date, "plan update for unknown date ignored");
        return PlanChange {
            plan,
            date_found: false,
        };
    };

    // Later deltas see the effect of earlier ones.
    for delta in &update.components {
        apply_delta(&mut entry.plan, delta);
    }

    PlanChange {
        plan,
        date_found: true,
    }
}

fn apply_delta(day: &mut DayPlan, delta: &ComponentDelta) {
    let Some(components) = day.get_mut(&delta.recipe_id) else {
        // First delta for a recipe is stored as given, even when negative.
        day.insert(
            delta.recipe_id.clone(),
            vec![PlanComponent::new(
                delta.component_id.clone(),
                delta.servings_increase,
            )],
        );
        return;
    };

    let Some(pos) = components
        .iter()
        .position(|c| c.component_id == delta.component_id)
    else {
        components.push(PlanComponent::new(
            delta.component_id.clone(),
            delta.servings_increase,
        ));
        return;
    };

    // Saturate so an overflowing add never wraps into the removal branch.
    let servings = components[pos]
        .servings
        .saturating_add(delta.servings_increase);
    if servings >= 0 {
        components[pos].servings = servings;
        return;
    }

    components.remove(pos);
    if components.is_empty() {
        // shift_remove keeps the remaining recipes in their original order
        day.shift_remove(&delta.recipe_id);
    }
}
