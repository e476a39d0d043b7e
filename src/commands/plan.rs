use clap::{Args, Subcommand};

use super::{find_recipe_index, resolve_date, today, OutputFormat};
use crate::config::Config;
use crate::store::JsonStore;
use plateplan_core::{apply_plan_update, ComponentDelta, MealPlan, PlanUpdate, Recipe};

#[derive(Args)]
pub struct PlanCommand {
    #[command(subcommand)]
    pub command: PlanSubcommand,
}

#[derive(Subcommand)]
pub enum PlanSubcommand {
    /// Create the plan window around today, or move an existing one
    Init {
        /// Discard everything planned and start from an empty window
        #[arg(long)]
        reset: bool,
    },

    /// Show what is planned
    Show {
        /// Include dates with nothing planned
        #[arg(long)]
        all: bool,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Add servings of a recipe to a date
    Add {
        /// Date: label, YYYY-MM-DD, "today" or "tomorrow"
        #[arg(long, short)]
        date: String,

        /// Recipe ID or name
        #[arg(long, short)]
        recipe: String,

        /// Component ID or name (defaults to every component of the recipe)
        #[arg(long = "component", short = 'c', value_name = "COMPONENT")]
        components: Vec<String>,

        /// Servings to add
        #[arg(long, short, default_value_t = 1)]
        servings: i32,
    },

    /// Take servings of a recipe off a date
    Remove {
        /// Date: label, YYYY-MM-DD, "today" or "tomorrow"
        #[arg(long, short)]
        date: String,

        /// Recipe ID or name
        #[arg(long, short)]
        recipe: String,

        /// Component ID or name (defaults to every component of the recipe)
        #[arg(long = "component", short = 'c', value_name = "COMPONENT")]
        components: Vec<String>,

        /// Servings to remove
        #[arg(long, short, default_value_t = 1)]
        servings: i32,
    },
}

impl PlanCommand {
    pub fn run(
        &self,
        store: &JsonStore,
        config: &Config,
    ) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            PlanSubcommand::Init { reset } => {
                let days = config.window_days.value;
                let plan = match store.load_plan()? {
                    Some(existing) if !reset => existing.rebased(today(), days),
                    _ => MealPlan::centered_window(today(), days),
                };
                store.save_plan(&plan)?;

                let first = plan.labels().next().unwrap_or_default();
                let last = plan.labels().last().unwrap_or_default();
                println!("Plan covers {} dates: {} to {}", plan.len(), first, last);
                Ok(())
            }

            PlanSubcommand::Show { all, format } => {
                let plan = load_plan(store)?;
                let recipes = store.load_recipes()?;

                match format {
                    OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&plan)?),
                    OutputFormat::Text => print!("{}", describe_plan(&plan, &recipes, *all)),
                }
                Ok(())
            }

            PlanSubcommand::Add {
                date,
                recipe,
                components,
                servings,
            } => {
                if *servings < 0 {
                    return Err("Servings must not be negative; use 'plan remove'".into());
                }
                change_servings(store, date, recipe, components, *servings)
            }

            PlanSubcommand::Remove {
                date,
                recipe,
                components,
                servings,
            } => {
                if *servings < 0 {
                    return Err("Servings must not be negative".into());
                }
                change_servings(store, date, recipe, components, -*servings)
            }
        }
    }
}

fn load_plan(store: &JsonStore) -> Result<MealPlan, Box<dyn std::error::Error>> {
    store
        .load_plan()?
        .ok_or_else(|| "No meal plan yet. Run 'plateplan plan init' first.".into())
}

/// Apply a servings delta and persist it.
///
/// The plan read from disk is kept untouched as the snapshot; if saving the
/// updated plan fails, the snapshot is what stays current.
fn change_servings(
    store: &JsonStore,
    date: &str,
    recipe: &str,
    components: &[String],
    delta: i32,
) -> Result<(), Box<dyn std::error::Error>> {
    let snapshot = load_plan(store)?;
    let recipes = store.load_recipes()?;
    let label = resolve_date(date, today());

    let update = build_update(&recipes, &label, recipe, components, delta)?;
    let change = apply_plan_update(&snapshot, &update);
    if !change.date_found {
        return Err(format!(
            "Date '{}' is not in the plan window. Run 'plateplan plan init' to move it.",
            label
        )
        .into());
    }

    if let Err(e) = store.save_plan(&change.plan) {
        tracing::warn!(date = %label, error = %e, "failed to save plan, keeping previous plan");
        return Err(e.into());
    }
    tracing::info!(date = %label, deltas = update.components.len(), "plan updated");

    let entry = change.plan.entry(&label);
    let recipe_name = find_recipe_index(&recipes, recipe)
        .map(|i| recipes[i].name.as_str())
        .unwrap_or(recipe);
    let planned: Vec<String> = update
        .components
        .iter()
        .map(|d| {
            let servings = entry.and_then(|e| e.servings(&d.recipe_id, &d.component_id));
            let name = recipes
                .iter()
                .find(|r| r.id == d.recipe_id)
                .and_then(|r| r.component(&d.component_id))
                .map(|c| c.name.as_str())
                .unwrap_or("?");
            match servings {
                Some(s) => format!("{} x{}", name, s),
                None => format!("{} removed", name),
            }
        })
        .collect();
    println!("{} on {}: {}", recipe_name, label, planned.join(", "));
    Ok(())
}

fn build_update(
    recipes: &[Recipe],
    label: &str,
    recipe: &str,
    components: &[String],
    delta: i32,
) -> Result<PlanUpdate, String> {
    let index =
        find_recipe_index(recipes, recipe).ok_or_else(|| format!("Recipe not found: {}", recipe))?;
    let recipe = &recipes[index];

    if recipe.components.is_empty() {
        return Err(format!("Recipe '{}' has no components to plan", recipe.name));
    }

    let deltas = if components.is_empty() {
        recipe
            .components
            .iter()
            .map(|c| ComponentDelta::new(recipe.id.clone(), c.id.clone(), delta))
            .collect()
    } else {
        components
            .iter()
            .map(|identifier| {
                recipe
                    .find_component(identifier)
                    .map(|c| ComponentDelta::new(recipe.id.clone(), c.id.clone(), delta))
                    .ok_or_else(|| {
                        format!("Component '{}' not found in {}", identifier, recipe.name)
                    })
            })
            .collect::<Result<Vec<_>, _>>()?
    };

    Ok(PlanUpdate::new(label, deltas))
}

/// Human-readable plan, resolving recipe and component names.
fn describe_plan(plan: &MealPlan, recipes: &[Recipe], all: bool) -> String {
    let mut out = String::new();
    for entry in &plan.entries {
        if entry.is_empty() && !all {
            continue;
        }
        out.push_str(&entry.date);
        out.push('\n');

        for (recipe_id, components) in &entry.plan {
            let recipe = recipes.iter().find(|r| &r.id == recipe_id);
            let recipe_name = recipe.map_or("(deleted recipe)", |r| r.name.as_str());
            for planned in components {
                let component_name = recipe
                    .and_then(|r| r.component(&planned.component_id))
                    .map_or("(deleted component)", |c| c.name.as_str());
                out.push_str(&format!(
                    "  - {} / {} x{}\n",
                    recipe_name, component_name, planned.servings
                ));
            }
        }
    }

    if out.is_empty() {
        out.push_str("Nothing planned.\n");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use plateplan_core::{add_or_update_plan, Component};

    fn recipes() -> Vec<Recipe> {
        vec![Recipe::new("Tacos").with_id("r1").with_components(vec![
            Component::new("Filling").with_id("c1"),
            Component::new("Salsa").with_id("c2"),
        ])]
    }

    #[test]
    fn test_build_update_defaults_to_all_components() {
        let update = build_update(&recipes(), "Mon", "tacos", &[], 2).unwrap();
        assert_eq!(
            update,
            PlanUpdate::new(
                "Mon",
                vec![
                    ComponentDelta::new("r1", "c1", 2),
                    ComponentDelta::new("r1", "c2", 2)
                ]
            )
        );
    }

    fn store_with_plan(dir: &tempfile::TempDir) -> JsonStore {
        let store = JsonStore::new(dir.path().to_path_buf());
        store.save_recipes(&recipes()).unwrap();
        store.save_plan(&MealPlan::from_labels(["Mon"])).unwrap();
        store
    }

    #[test]
    fn test_change_servings_saves_plan() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let store = store_with_plan(&temp_dir);

        change_servings(&store, "Mon", "tacos", &["salsa".to_string()], 2).unwrap();

        let plan = store.load_plan().unwrap().unwrap();
        let entry = plan.entry("Mon").unwrap();
        assert_eq!(entry.servings(&"r1".into(), &"c2".into()), Some(2));
        assert_eq!(entry.servings(&"r1".into(), &"c1".into()), None);
    }

    #[test]
    fn test_failed_save_keeps_previous_plan() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let store = store_with_plan(&temp_dir);
        let plan_path = temp_dir.path().join("mealplan.json");
        let before = std::fs::read_to_string(&plan_path).unwrap();

        // A directory where the temp file goes makes the write fail
        std::fs::create_dir(temp_dir.path().join("mealplan.json.tmp")).unwrap();

        let result = change_servings(&store, "Mon", "tacos", &[], 2);

        assert!(result.is_err());
        assert_eq!(std::fs::read_to_string(&plan_path).unwrap(), before);
        assert!(store.load_plan().unwrap().unwrap().entry("Mon").unwrap().is_empty());
    }

    #[test]
    fn test_change_servings_unknown_date() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let store = store_with_plan(&temp_dir);

        let err = change_servings(&store, "Tue", "tacos", &[], 1).unwrap_err();
        assert!(err.to_string().contains("not in the plan window"));
    }

    #[test]
    fn test_build_update_named_component() {
        let update = build_update(&recipes(), "Mon", "r1", &["salsa".to_string()], -1).unwrap();
        assert_eq!(update.components, vec![ComponentDelta::new("r1", "c2", -1)]);
    }

    #[test]
    fn test_build_update_unknown_component() {
        let err = build_update(&recipes(), "Mon", "r1", &["Guac".to_string()], 1).unwrap_err();
        assert!(err.contains("Component 'Guac' not found"));
    }

    #[test]
    fn test_build_update_unknown_recipe() {
        let err = build_update(&recipes(), "Mon", "Pizza", &[], 1).unwrap_err();
        assert!(err.contains("Recipe not found"));
    }

    #[test]
    fn test_describe_plan() {
        let plan = MealPlan::from_labels(["Mon", "Tue"]);
        let plan = add_or_update_plan(&plan, &PlanUpdate::single("Tue", "r1", "c2", 3));
        let plan = add_or_update_plan(&plan, &PlanUpdate::single("Tue", "gone", "x", 1));

        let text = describe_plan(&plan, &recipes(), false);
        assert_eq!(
            text,
            "Tue\n  - Tacos / Salsa x3\n  - (deleted recipe) / (deleted component) x1\n"
        );

        let text = describe_plan(&plan, &recipes(), true);
        assert!(text.starts_with("Mon\nTue\n"));
    }

    #[test]
    fn test_describe_empty_plan() {
        let plan = MealPlan::from_labels(["Mon"]);
        assert_eq!(describe_plan(&plan, &recipes(), false), "Nothing planned.\n");
    }
}
