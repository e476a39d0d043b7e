mod config_cmd;
mod plan;
mod recipe;
mod shopping;

pub use config_cmd::ConfigCommand;
pub use plan::PlanCommand;
pub use recipe::RecipeCommand;
pub use shopping::ShoppingCommand;

use chrono::{Local, NaiveDate};
use clap::ValueEnum;

use plateplan_core::{date_label, Recipe};

#[derive(Clone, Copy, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Turn a `--date` argument into a plan label.
///
/// Accepts `today`, `tomorrow`, an ISO date (`2026-02-17`), or an existing
/// label which is passed through untouched.
pub fn resolve_date(input: &str, today: NaiveDate) -> String {
    match input.trim().to_lowercase().as_str() {
        "today" => date_label(today),
        "tomorrow" => date_label(today + chrono::Duration::days(1)),
        _ => match NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d") {
            Ok(date) => date_label(date),
            Err(_) => input.to_string(),
        },
    }
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Find a recipe by ID or name (case-insensitive).
pub fn find_recipe_index(recipes: &[Recipe], identifier: &str) -> Option<usize> {
    let lower = identifier.to_lowercase();
    recipes
        .iter()
        .position(|r| r.id.as_str() == identifier)
        .or_else(|| recipes.iter().position(|r| r.name.to_lowercase() == lower))
}
