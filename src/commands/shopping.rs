//! Shopping list CLI commands.
//!
//! Builds the list for a selection of plan dates and prints it as text
//! ready to paste into a shopping app, or as JSON.

use chrono::NaiveDate;
use clap::{Args, Subcommand};
use std::collections::HashSet;

use super::{resolve_date, today, OutputFormat};
use crate::store::JsonStore;
use plateplan_core::{create_shopping_list_data, date_label, MealPlan, ShoppingList};

#[derive(Args)]
pub struct ShoppingCommand {
    #[command(subcommand)]
    pub command: ShoppingSubcommand,
}

#[derive(Subcommand)]
pub enum ShoppingSubcommand {
    /// Build the shopping list for selected dates
    List {
        /// Date to shop for: label, YYYY-MM-DD, "today" or "tomorrow" (can be repeated)
        #[arg(long = "date", short = 'd', value_name = "DATE")]
        dates: Vec<String>,

        /// Shop for the next N days starting today
        #[arg(
            long,
            value_name = "N",
            conflicts_with = "all",
            value_parser = clap::value_parser!(u32).range(1..=366)
        )]
        days: Option<u32>,

        /// Shop for every date in the plan
        #[arg(long)]
        all: bool,

        /// List the recipes that need each ingredient
        #[arg(long)]
        meals: bool,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}

impl ShoppingCommand {
    pub fn run(&self, store: &JsonStore) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            ShoppingSubcommand::List {
                dates,
                days,
                all,
                meals,
                format,
            } => {
                let plan = store
                    .load_plan()?
                    .ok_or("No meal plan yet. Run 'plateplan plan init' first.")?;
                let recipes = store.load_recipes()?;

                let selected = select_dates(&plan, dates, *days, *all, today());
                if selected.is_empty() {
                    return Err("No dates selected. Use --date, --days or --all.".into());
                }

                for label in &selected {
                    if !plan.contains_date(label) {
                        tracing::warn!(date = %label, "selected date is not in the plan window");
                    }
                }

                let list = create_shopping_list_data(&recipes, &plan, &selected);
                tracing::debug!(
                    dates = selected.len(),
                    ingredients = list.len(),
                    "built shopping list"
                );

                match format {
                    OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&list)?),
                    OutputFormat::Text => {
                        if list.is_empty() {
                            println!("Nothing to buy for the selected dates.");
                        } else if *meals {
                            println!("{}", with_meals(&list));
                        } else {
                            println!("{}", list);
                        }
                    }
                }
                Ok(())
            }
        }
    }
}

/// Work out the set of plan labels the user asked for.
fn select_dates(
    plan: &MealPlan,
    dates: &[String],
    days: Option<u32>,
    all: bool,
    today: NaiveDate,
) -> HashSet<String> {
    let mut selected: HashSet<String> = dates.iter().map(|d| resolve_date(d, today)).collect();

    if all {
        selected.extend(plan.labels().map(str::to_string));
    }
    if let Some(days) = days {
        selected.extend(
            (0..i64::from(days))
                .map_while(|offset| today.checked_add_signed(chrono::Duration::days(offset)))
                .map(date_label),
        );
    }

    selected
}

/// Text list with the contributing recipes after each ingredient.
fn with_meals(list: &ShoppingList) -> String {
    list.to_text()
        .lines()
        .zip(list.iter().flat_map(|(_, entry)| {
            let meals = entry
                .meals
                .iter()
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(", ");
            std::iter::repeat(meals).take(entry.quantities.len().max(1))
        }))
        .map(|(line, meals)| format!("{}  ({})", line, meals))
        .collect::<Vec<_>>()
        .join("\n")
}
