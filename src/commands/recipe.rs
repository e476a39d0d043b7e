use clap::{Args, Subcommand};
use std::io::{self, Write};

use super::{find_recipe_index, OutputFormat};
use crate::store::JsonStore;
use plateplan_core::{Component, Ingredient, Quantity, Recipe, Unit};

#[derive(Args)]
pub struct RecipeCommand {
    #[command(subcommand)]
    pub command: RecipeSubcommand,
}

#[derive(Subcommand)]
pub enum RecipeSubcommand {
    /// Create a new recipe
    Create {
        /// Name of the recipe
        name: String,

        /// Short description
        #[arg(long)]
        description: Option<String>,

        /// Add a component by name (can be repeated)
        #[arg(long = "component", value_name = "NAME")]
        components: Vec<String>,
    },

    /// List all recipes
    List {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Show a recipe's details
    Show {
        /// Recipe ID or name
        identifier: String,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Delete a recipe
    Delete {
        /// Recipe ID or name
        identifier: String,

        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },

    /// Add a component to a recipe
    AddComponent {
        /// Recipe ID or name
        identifier: String,

        /// Component name
        #[arg(long)]
        name: String,

        /// Number of servings the component makes
        #[arg(long)]
        servings: Option<i32>,

        /// Leftovers keep well
        #[arg(long)]
        storeable: bool,
    },

    /// Add a per-serving ingredient to a recipe component
    AddIngredient {
        /// Recipe ID or name
        identifier: String,

        /// Component ID or name
        #[arg(long)]
        component: String,

        /// Ingredient name
        #[arg(long)]
        name: String,

        /// Amount for one serving
        #[arg(long)]
        quantity: Option<f64>,

        /// Unit (none, ml, l, g, kg, cup, tsp, tbsp, number)
        #[arg(long, default_value = "none")]
        unit: Unit,
    },

    /// Append an instruction step to a recipe component
    AddInstruction {
        /// Recipe ID or name
        identifier: String,

        /// Component ID or name
        #[arg(long)]
        component: String,

        /// Instruction text
        step: String,
    },
}

impl RecipeCommand {
    pub fn run(
        &self,
        store: &JsonStore,
        created_by: &str,
    ) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            RecipeSubcommand::Create {
                name,
                description,
                components,
            } => {
                if name.trim().is_empty() {
                    return Err("Recipe name cannot be empty".into());
                }

                let mut recipes = store.load_recipes()?;
                if find_recipe_index(&recipes, name.trim()).is_some() {
                    return Err(format!("A recipe named '{}' already exists", name.trim()).into());
                }

                let mut recipe = Recipe::new(name.trim()).with_created_by(created_by);
                if let Some(description) = description {
                    recipe = recipe.with_description(description);
                }
                recipe.components = components.iter().map(Component::new).collect();

                println!("Created recipe:");
                println!("{}", recipe);
                recipes.push(recipe);
                store.save_recipes(&recipes)?;
                Ok(())
            }

            RecipeSubcommand::List { format } => {
                let recipes = store.load_recipes()?;

                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&recipes)?);
                    }
                    OutputFormat::Text => {
                        if recipes.is_empty() {
                            println!("No recipes found.");
                        } else {
                            for recipe in &recipes {
                                println!(
                                    "{:<36}  {} ({} component(s))",
                                    recipe.id,
                                    recipe.name,
                                    recipe.components.len()
                                );
                            }
                        }
                    }
                }
                Ok(())
            }

            RecipeSubcommand::Show { identifier, format } => {
                let recipes = store.load_recipes()?;
                let recipe = find_recipe(&recipes, identifier)?;

                match format {
                    OutputFormat::Json => println!("{}", serde_json::to_string_pretty(recipe)?),
                    OutputFormat::Text => print!("{}", recipe),
                }
                Ok(())
            }

            RecipeSubcommand::Delete { identifier, force } => {
                let mut recipes = store.load_recipes()?;
                let index = find_recipe_index(&recipes, identifier)
                    .ok_or_else(|| format!("Recipe not found: {}", identifier))?;

                if !force {
                    print!("Delete recipe '{}'? [y/N] ", recipes[index].name);
                    io::stdout().flush()?;
                    let mut input = String::new();
                    io::stdin().read_line(&mut input)?;
                    if !input.trim().eq_ignore_ascii_case("y") {
                        println!("Cancelled.");
                        return Ok(());
                    }
                }

                // Plan entries pointing at the recipe are left in place and
                // skipped when shopping lists are built.
                let removed = recipes.remove(index);
                store.save_recipes(&recipes)?;
                println!("Deleted recipe: {}", removed.name);
                Ok(())
            }

            RecipeSubcommand::AddComponent {
                identifier,
                name,
                servings,
                storeable,
            } => {
                if name.trim().is_empty() {
                    return Err("Component name cannot be empty".into());
                }

                let mut recipes = store.load_recipes()?;
                let recipe = find_recipe_mut(&mut recipes, identifier)?;

                let mut component = Component::new(name.trim()).with_storeable(*storeable);
                if let Some(servings) = servings {
                    component = component.with_servings(*servings);
                }
                println!(
                    "Added component '{}' ({}) to {}",
                    component.name, component.id, recipe.name
                );
                recipe.components.push(component);

                store.save_recipes(&recipes)?;
                Ok(())
            }

            RecipeSubcommand::AddIngredient {
                identifier,
                component,
                name,
                quantity,
                unit,
            } => {
                if name.trim().is_empty() {
                    return Err("Ingredient name cannot be empty".into());
                }
                if unit.is_measured() && quantity.is_none() {
                    return Err(format!("A quantity is required for unit '{}'", unit).into());
                }

                let mut recipes = store.load_recipes()?;
                let recipe = find_recipe_mut(&mut recipes, identifier)?;
                let recipe_name = recipe.name.clone();
                let target = find_component_mut(recipe, component)?;

                let quantity = match (unit, quantity) {
                    (Unit::None, _) => Quantity::unitless(),
                    (unit, Some(value)) => Quantity::new(*unit, *value),
                    (unit, None) => Quantity {
                        unit: *unit,
                        value: None,
                    },
                };
                let ingredient = Ingredient::new(name.trim(), quantity);
                println!(
                    "Added '{}' to {} / {}",
                    ingredient, recipe_name, target.name
                );
                target.ingredients.push(ingredient);

                store.save_recipes(&recipes)?;
                Ok(())
            }

            RecipeSubcommand::AddInstruction {
                identifier,
                component,
                step,
            } => {
                if step.trim().is_empty() {
                    return Err("Instruction cannot be empty".into());
                }

                let mut recipes = store.load_recipes()?;
                let recipe = find_recipe_mut(&mut recipes, identifier)?;
                let target = find_component_mut(recipe, component)?;
                target.instructions.push(step.trim().to_string());
                println!(
                    "Added step {} to {}",
                    target.instructions.len(),
                    target.name
                );

                store.save_recipes(&recipes)?;
                Ok(())
            }
        }
    }
}

fn find_recipe<'a>(recipes: &'a [Recipe], identifier: &str) -> Result<&'a Recipe, String> {
    find_recipe_index(recipes, identifier)
        .map(|i| &recipes[i])
        .ok_or_else(|| format!("Recipe not found: {}", identifier))
}

fn find_recipe_mut<'a>(
    recipes: &'a mut [Recipe],
    identifier: &str,
) -> Result<&'a mut Recipe, String> {
    match find_recipe_index(recipes, identifier) {
        Some(i) => Ok(&mut recipes[i]),
        None => Err(format!("Recipe not found: {}", identifier)),
    }
}

fn find_component_mut<'a>(
    recipe: &'a mut Recipe,
    identifier: &str,
) -> Result<&'a mut Component, String> {
    let not_found = format!("Component '{}' not found in {}", identifier, recipe.name);
    recipe.find_component_mut(identifier).ok_or(not_found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn run(store: &JsonStore, command: RecipeSubcommand) {
        RecipeCommand { command }.run(store, "tester").unwrap();
    }

    #[test]
    fn test_create_and_build_recipe() {
        let temp_dir = TempDir::new().unwrap();
        let store = JsonStore::new(temp_dir.path().to_path_buf());

        run(
            &store,
            RecipeSubcommand::Create {
                name: "Chili".into(),
                description: Some("Weeknight chili".into()),
                components: vec!["Base".into()],
            },
        );
        run(
            &store,
            RecipeSubcommand::AddIngredient {
                identifier: "chili".into(),
                component: "base".into(),
                name: "Beans".into(),
                quantity: Some(120.0),
                unit: Unit::Gram,
            },
        );
        run(
            &store,
            RecipeSubcommand::AddInstruction {
                identifier: "Chili".into(),
                component: "Base".into(),
                step: "Simmer for an hour".into(),
            },
        );

        let recipes = store.load_recipes().unwrap();
        assert_eq!(recipes.len(), 1);
        assert_eq!(recipes[0].created_by.as_deref(), Some("tester"));
        let base = &recipes[0].components[0];
        assert_eq!(base.ingredients, vec![Ingredient::measured("Beans", 120.0, Unit::Gram)]);
        assert_eq!(base.instructions, vec!["Simmer for an hour".to_string()]);
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let store = JsonStore::new(temp_dir.path().to_path_buf());
        let create = || RecipeSubcommand::Create {
            name: "Chili".into(),
            description: None,
            components: vec![],
        };

        run(&store, create());
        let result = RecipeCommand { command: create() }.run(&store, "tester");
        assert!(result.unwrap_err().to_string().contains("already exists"));
    }

    #[test]
    fn test_measured_unit_requires_quantity() {
        let temp_dir = TempDir::new().unwrap();
        let store = JsonStore::new(temp_dir.path().to_path_buf());
        run(
            &store,
            RecipeSubcommand::Create {
                name: "Tea".into(),
                description: None,
                components: vec!["Cup".into()],
            },
        );

        let result = RecipeCommand {
            command: RecipeSubcommand::AddIngredient {
                identifier: "Tea".into(),
                component: "Cup".into(),
                name: "Milk".into(),
                quantity: None,
                unit: Unit::Milliliter,
            },
        }
        .run(&store, "tester");
        assert!(result.is_err());
    }

    #[test]
    fn test_delete_forced() {
        let temp_dir = TempDir::new().unwrap();
        let store = JsonStore::new(temp_dir.path().to_path_buf());
        run(
            &store,
            RecipeSubcommand::Create {
                name: "Toast".into(),
                description: None,
                components: vec![],
            },
        );
        run(
            &store,
            RecipeSubcommand::Delete {
                identifier: "toast".into(),
                force: true,
            },
        );
        assert!(store.load_recipes().unwrap().is_empty());
    }
}
