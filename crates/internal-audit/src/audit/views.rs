use super::checklist::{ChecklistDefinition, SPECIAL_NOTES_HEADING};
use super::domain::{EvaluationDimension, Grade, ItemStatus};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct CategoryView {
    pub name: &'static str,
    pub items: Vec<&'static str>,
}

/// Everything a form client needs to render the checklist.
#[derive(Debug, Clone, Serialize)]
pub struct ChecklistView {
    pub categories: Vec<CategoryView>,
    pub item_count: usize,
    pub special_notes_heading: &'static str,
    pub status_options: Vec<&'static str>,
    pub default_status: &'static str,
    pub grade_options: Vec<&'static str>,
    pub evaluation_dimensions: Vec<&'static str>,
}

impl ChecklistView {
    pub fn from_definition(definition: &ChecklistDefinition) -> Self {
        Self {
            categories: definition
                .categories()
                .iter()
                .map(|category| CategoryView {
                    name: category.name,
                    items: category.items.clone(),
                })
                .collect(),
            item_count: definition.item_count(),
            special_notes_heading: SPECIAL_NOTES_HEADING,
            status_options: ItemStatus::ordered().map(ItemStatus::label).to_vec(),
            default_status: ItemStatus::default().label(),
            grade_options: Grade::ordered().map(Grade::label).to_vec(),
            evaluation_dimensions: EvaluationDimension::ordered()
                .map(EvaluationDimension::label)
                .to_vec(),
        }
    }
}
