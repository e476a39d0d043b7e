mod ingredient;
mod meal_plan;
mod recipe;
mod unit;

pub use ingredient::{format_amount, Ingredient, Quantity};
pub use meal_plan::{
    date_label, DateEntry, DayPlan, MealPlan, PlanComponent, DATE_LABEL_FORMAT,
    DEFAULT_WINDOW_DAYS,
};
pub use recipe::{Component, ComponentUuid, Recipe, RecipeUuid};
pub use unit::{Unit, UnitParseError};
