//! JSON document storage for recipes and the meal plan.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use plateplan_core::{MealPlan, Recipe};

/// Documents kept in the data directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocType {
    Recipes,
    MealPlan,
}

impl DocType {
    /// Returns the filename for this document type.
    pub fn filename(&self) -> &'static str {
        match self {
            DocType::Recipes => "recipes.json",
            DocType::MealPlan => "mealplan.json",
        }
    }
}

/// Loads and saves documents as pretty-printed JSON files.
#[derive(Debug, Clone)]
pub struct JsonStore {
    data_dir: PathBuf,
}

impl JsonStore {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Returns the full path for a document type.
    pub fn path(&self, doc_type: DocType) -> PathBuf {
        self.data_dir.join(doc_type.filename())
    }

    /// Loads a document from disk.
    ///
    /// Returns `Ok(None)` if the file doesn't exist.
    pub fn load<T: DeserializeOwned>(&self, doc_type: DocType) -> Result<Option<T>, StorageError> {
        let path = self.path(doc_type);

        match fs::read_to_string(&path) {
            Ok(contents) => {
                let doc = serde_json::from_str(&contents)
                    .map_err(|e| StorageError::ParseError(path, e))?;
                Ok(Some(doc))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::IoError(path, e)),
        }
    }

    /// Saves a document to disk, creating the data directory if needed.
    ///
    /// The file is written next to its destination first and then renamed,
    /// so a failed write leaves the previous document in place.
    pub fn save<T: Serialize>(&self, doc_type: DocType, doc: &T) -> Result<(), StorageError> {
        fs::create_dir_all(&self.data_dir)
            .map_err(|e| StorageError::IoError(self.data_dir.clone(), e))?;

        let path = self.path(doc_type);
        let json = serde_json::to_string_pretty(doc)
            .map_err(|e| StorageError::ParseError(path.clone(), e))?;

        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(|e| StorageError::IoError(tmp.clone(), e))?;
        fs::rename(&tmp, &path).map_err(|e| StorageError::IoError(path, e))?;

        tracing::debug!(file = doc_type.filename(), "saved document");
        Ok(())
    }

    pub fn load_recipes(&self) -> Result<Vec<Recipe>, StorageError> {
        Ok(self.load(DocType::Recipes)?.unwrap_or_default())
    }

    pub fn save_recipes(&self, recipes: &[Recipe]) -> Result<(), StorageError> {
        self.save(DocType::Recipes, &recipes)
    }

    pub fn load_plan(&self) -> Result<Option<MealPlan>, StorageError> {
        self.load(DocType::MealPlan)
    }

    pub fn save_plan(&self, plan: &MealPlan) -> Result<(), StorageError> {
        self.save(DocType::MealPlan, plan)
    }
}

/// Errors that can occur during document storage operations.
#[derive(Debug)]
pub enum StorageError {
    /// I/O error reading or writing a file.
    IoError(PathBuf, io::Error),
    /// Document could not be encoded or decoded as JSON.
    ParseError(PathBuf, serde_json::Error),
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageError::IoError(path, e) => {
                write!(f, "I/O error for {}: {}", path.display(), e)
            }
            StorageError::ParseError(path, e) => {
                write!(f, "Failed to load document {}: {}", path.display(), e)
            }
        }
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StorageError::IoError(_, e) => Some(e),
            StorageError::ParseError(_, e) => Some(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plateplan_core::{add_or_update_plan, Component, Ingredient, PlanUpdate, Unit};
    use tempfile::TempDir;

    fn test_store() -> (JsonStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = JsonStore::new(temp_dir.path().join("data"));
        (store, temp_dir)
    }

    #[test]
    fn test_doc_type_filename() {
        assert_eq!(DocType::Recipes.filename(), "recipes.json");
        assert_eq!(DocType::MealPlan.filename(), "mealplan.json");
    }

    #[test]
    fn test_missing_documents_load_empty() {
        let (store, _dir) = test_store();
        assert!(store.load_recipes().unwrap().is_empty());
        assert!(store.load_plan().unwrap().is_none());
    }

    #[test]
    fn test_recipes_roundtrip() {
        let (store, _dir) = test_store();
        let recipes = vec![Recipe::new("Porridge").with_components(vec![
            Component::new("Base").with_ingredients(vec![Ingredient::measured(
                "Oats",
                50.0,
                Unit::Gram,
            )]),
        ])];

        store.save_recipes(&recipes).unwrap();
        assert!(store.path(DocType::Recipes).exists());
        assert_eq!(store.load_recipes().unwrap(), recipes);
    }

    #[test]
    fn test_plan_roundtrip() {
        let (store, _dir) = test_store();
        let plan = MealPlan::from_labels(["Mon", "Tue"]);
        let plan = add_or_update_plan(&plan, &PlanUpdate::single("Tue", "r1", "c1", 2));

        store.save_plan(&plan).unwrap();
        assert_eq!(store.load_plan().unwrap(), Some(plan));
    }

    #[test]
    fn test_corrupt_document_is_an_error() {
        let (store, _dir) = test_store();
        fs::create_dir_all(store.data_dir()).unwrap();
        fs::write(store.path(DocType::MealPlan), "{ not json").unwrap();

        let err = store.load_plan().unwrap_err();
        assert!(matches!(err, StorageError::ParseError(_, _)));
        assert!(err.to_string().contains("mealplan.json"));
    }
}
