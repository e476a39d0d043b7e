use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::ingredient::Ingredient;

macro_rules! opaque_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Generate a fresh random id.
            pub fn new() -> Self {
                Self(Uuid::new_v4().to_string())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

opaque_id!(
    /// Identifies a recipe. Stored ids are opaque strings and compared exactly.
    RecipeUuid
);

opaque_id!(
    /// Identifies a component within its recipe.
    ComponentUuid
);

/// A named part of a recipe ("sauce", "filling") with its own ingredients.
///
/// Ingredient quantities are amounts for a single serving of the component.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Component {
    pub id: ComponentUuid,
    pub name: String,
    pub servings: Option<i32>,
    /// Whether leftovers of this component keep (fridge/freezer).
    #[serde(default)]
    pub storeable: bool,
    #[serde(default)]
    pub ingredients: Vec<Ingredient>,
    #[serde(default)]
    pub instructions: Vec<String>,
}

impl Component {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: ComponentUuid::new(),
            name: name.into(),
            servings: None,
            storeable: false,
            ingredients: Vec::new(),
            instructions: Vec::new(),
        }
    }

    pub fn with_id(mut self, id: impl Into<ComponentUuid>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_servings(mut self, servings: i32) -> Self {
        self.servings = Some(servings);
        self
    }

    pub fn with_storeable(mut self, storeable: bool) -> Self {
        self.storeable = storeable;
        self
    }

    pub fn with_ingredients(mut self, ingredients: Vec<Ingredient>) -> Self {
        self.ingredients = ingredients;
        self
    }

    pub fn with_instructions(mut self, instructions: Vec<String>) -> Self {
        self.instructions = instructions;
        self
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if let Some(servings) = self.servings {
            write!(f, " (serves {})", servings)?;
        }
        if self.storeable {
            write!(f, " [storeable]")?;
        }
        writeln!(f)?;

        for ingredient in &self.ingredients {
            writeln!(f, "  - {}", ingredient)?;
        }

        for (i, step) in self.instructions.iter().enumerate() {
            writeln!(f, "  {}. {}", i + 1, step)?;
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recipe {
    pub id: RecipeUuid,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub components: Vec<Component>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
}

impl Recipe {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: RecipeUuid::new(),
            name: name.into(),
            description: String::new(),
            components: Vec::new(),
            created_by: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<RecipeUuid>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_components(mut self, components: Vec<Component>) -> Self {
        self.components = components;
        self
    }

    pub fn with_created_by(mut self, created_by: impl Into<String>) -> Self {
        self.created_by = Some(created_by.into());
        self
    }

    pub fn component(&self, id: &ComponentUuid) -> Option<&Component> {
        self.components.iter().find(|c| &c.id == id)
    }

    /// Find a component by id, or by name (case-insensitive).
    pub fn find_component(&self, identifier: &str) -> Option<&Component> {
        self.component_position(identifier).map(|i| &self.components[i])
    }

    pub fn find_component_mut(&mut self, identifier: &str) -> Option<&mut Component> {
        self.component_position(identifier).map(move |i| &mut self.components[i])
    }

    fn component_position(&self, identifier: &str) -> Option<usize> {
        let lower = identifier.to_lowercase();
        self.components
            .iter()
            .position(|c| c.id.as_str() == identifier)
            .or_else(|| {
                self.components
                    .iter()
                    .position(|c| c.name.to_lowercase() == lower)
            })
    }
}

impl fmt::Display for Recipe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.name)?;
        writeln!(f, "{}", "=".repeat(self.name.len()))?;
        writeln!(f, "ID: {}", self.id)?;
        if let Some(created_by) = &self.created_by {
            writeln!(f, "Created by: {}", created_by)?;
        }

        if !self.description.is_empty() {
            writeln!(f, "\n{}", self.description)?;
        }

        for component in &self.components {
            writeln!(f)?;
            write!(f, "{}", component)?;
        }

        Ok(())
    }
}
