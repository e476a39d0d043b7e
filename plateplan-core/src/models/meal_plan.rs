use chrono::{Duration, NaiveDate};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::recipe::{ComponentUuid, RecipeUuid};

/// Format used for date labels, e.g. "Monday - 17/2/2026".
pub const DATE_LABEL_FORMAT: &str = "%A - %-d/%-m/%Y";

/// Number of days kept on each side of today in a fresh plan.
pub const DEFAULT_WINDOW_DAYS: i64 = 14;

/// Servings of one recipe component planned on a date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanComponent {
    pub component_id: ComponentUuid,
    pub servings: i32,
}

impl PlanComponent {
    pub fn new(component_id: impl Into<ComponentUuid>, servings: i32) -> Self {
        Self {
            component_id: component_id.into(),
            servings,
        }
    }
}

/// Recipes planned on one date, in the order they were first added.
pub type DayPlan = IndexMap<RecipeUuid, Vec<PlanComponent>>;

/// One row of the meal plan.
///
/// The date is an opaque label; lookups compare it by exact string equality.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateEntry {
    pub date: String,
    #[serde(default)]
    pub plan: DayPlan,
}

impl DateEntry {
    pub fn new(date: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            plan: DayPlan::new(),
        }
    }

    pub fn with_plan(mut self, plan: DayPlan) -> Self {
        self.plan = plan;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.plan.is_empty()
    }

    /// Servings planned for a component, if it is on this date at all.
    pub fn servings(&self, recipe_id: &RecipeUuid, component_id: &ComponentUuid) -> Option<i32> {
        self.plan
            .get(recipe_id)?
            .iter()
            .find(|c| &c.component_id == component_id)
            .map(|c| c.servings)
    }
}

/// Ordered sequence of dated entries.
///
/// The set of dates is fixed when the plan is created; updates only change
/// what is planned on existing dates.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MealPlan {
    pub entries: Vec<DateEntry>,
}

impl MealPlan {
    pub fn new(entries: Vec<DateEntry>) -> Self {
        Self { entries }
    }

    /// An empty plan with one entry per label, in the given order.
    pub fn from_labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            entries: labels.into_iter().map(DateEntry::new).collect(),
        }
    }

    /// An empty plan covering `days` days before and after `today`.
    pub fn centered_window(today: NaiveDate, days: i64) -> Self {
        Self::from_labels((-days..=days).map(|offset| date_label(today + Duration::days(offset))))
    }

    /// A fresh window around `today`, keeping whatever was planned on dates
    /// that appear in both the old and new windows.
    pub fn rebased(&self, today: NaiveDate, days: i64) -> Self {
        let mut plan = Self::centered_window(today, days);
        for entry in &mut plan.entries {
            if let Some(old) = self.entry(&entry.date) {
                entry.plan = old.plan.clone();
            }
        }
        plan
    }

    pub fn entry(&self, date: &str) -> Option<&DateEntry> {
        self.entries.iter().find(|e| e.date == date)
    }

    pub fn entry_mut(&mut self, date: &str) -> Option<&mut DateEntry> {
        self.entries.iter_mut().find(|e| e.date == date)
    }

    pub fn contains_date(&self, date: &str) -> bool {
        self.entry(date).is_some()
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.date.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries that have at least one recipe planned.
    pub fn planned(&self) -> impl Iterator<Item = &DateEntry> {
        self.entries.iter().filter(|e| !e.is_empty())
    }
}

impl fmt::Display for MealPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in self.planned() {
            writeln!(f, "{}", entry.date)?;
            for (recipe_id, components) in &entry.plan {
                for component in components {
                    writeln!(
                        f,
                        "  - {} / {} x{}",
                        recipe_id, component.component_id, component.servings
                    )?;
                }
            }
        }
        Ok(())
    }
}

/// Label used for a calendar date throughout the plan.
pub fn date_label(date: NaiveDate) -> String {
    date.format(DATE_LABEL_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_date_label() {
        assert_eq!(date_label(day(2026, 2, 17)), "Tuesday - 17/2/2026");
        assert_eq!(date_label(day(2022, 7, 16)), "Saturday - 16/7/2022");
    }

    #[test]
    fn test_centered_window() {
        let plan = MealPlan::centered_window(day(2026, 2, 17), 2);
        let labels: Vec<&str> = plan.labels().collect();
        assert_eq!(
            labels,
            vec![
                "Sunday - 15/2/2026",
                "Monday - 16/2/2026",
                "Tuesday - 17/2/2026",
                "Wednesday - 18/2/2026",
                "Thursday - 19/2/2026",
            ]
        );
        assert!(plan.entries.iter().all(DateEntry::is_empty));
    }

    #[test]
    fn test_default_window_size() {
        let plan = MealPlan::centered_window(day(2026, 1, 1), DEFAULT_WINDOW_DAYS);
        assert_eq!(plan.len(), 29);
        assert!(plan.contains_date("Thursday - 1/1/2026"));
        assert!(plan.contains_date("Thursday - 18/12/2025"));
    }

    #[test]
    fn test_entry_lookup_is_exact() {
        let plan = MealPlan::from_labels(["16/7/2022"]);
        assert!(plan.entry("16/7/2022").is_some());
        assert!(plan.entry("16/07/2022").is_none());
        assert!(plan.entry(" 16/7/2022").is_none());
    }

    #[test]
    fn test_rebased_keeps_overlap() {
        let mut plan = MealPlan::centered_window(day(2026, 2, 17), 1);
        let mut day_plan = DayPlan::new();
        day_plan.insert("r1".into(), vec![PlanComponent::new("c1", 2)]);
        plan.entry_mut("Wednesday - 18/2/2026").unwrap().plan = day_plan.clone();
        plan.entry_mut("Monday - 16/2/2026").unwrap().plan = day_plan.clone();

        let moved = plan.rebased(day(2026, 2, 18), 1);
        let labels: Vec<&str> = moved.labels().collect();
        assert_eq!(
            labels,
            vec!["Tuesday - 17/2/2026", "Wednesday - 18/2/2026", "Thursday - 19/2/2026"]
        );
        assert_eq!(moved.entry("Wednesday - 18/2/2026").unwrap().plan, day_plan);
        assert!(moved.entry("Tuesday - 17/2/2026").unwrap().is_empty());
    }

    #[test]
    fn test_servings_lookup() {
        let mut day_plan = DayPlan::new();
        day_plan.insert("r1".into(), vec![PlanComponent::new("c1", 0)]);
        let entry = DateEntry::new("d").with_plan(day_plan);

        assert_eq!(entry.servings(&"r1".into(), &"c1".into()), Some(0));
        assert_eq!(entry.servings(&"r1".into(), &"c2".into()), None);
        assert_eq!(entry.servings(&"r2".into(), &"c1".into()), None);
    }

    #[test]
    fn test_meal_plan_json_shape() {
        let mut day_plan = DayPlan::new();
        day_plan.insert("11".into(), vec![PlanComponent::new("1", 3)]);
        let plan = MealPlan::new(vec![DateEntry::new("16/7/2022").with_plan(day_plan)]);

        let json = serde_json::to_string(&plan).unwrap();
        assert_eq!(
            json,
            r#"[{"date":"16/7/2022","plan":{"11":[{"component_id":"1","servings":3}]}}]"#
        );

        let parsed: MealPlan = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, plan);
    }

    #[test]
    fn test_recipe_order_survives_json() {
        let mut day_plan = DayPlan::new();
        for id in ["z", "a", "m"] {
            day_plan.insert(id.into(), vec![PlanComponent::new("c", 1)]);
        }
        let plan = MealPlan::new(vec![DateEntry::new("d").with_plan(day_plan)]);

        let json = serde_json::to_string(&plan).unwrap();
        let parsed: MealPlan = serde_json::from_str(&json).unwrap();
        let order: Vec<&str> = parsed.entries[0].plan.keys().map(|k| k.as_str()).collect();
        assert_eq!(order, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_meal_plan_display_lists_planned_dates() {
        let mut plan = MealPlan::from_labels(["Mon", "Tue"]);
        plan.entry_mut("Tue")
            .unwrap()
            .plan
            .insert("r1".into(), vec![PlanComponent::new("c1", 2)]);

        let output = format!("{}", plan);
        assert!(!output.contains("Mon"));
        assert!(output.contains("Tue"));
        assert!(output.contains("r1 / c1 x2"));
    }
}
