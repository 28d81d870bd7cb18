//! Category filtering over the flat project list.

use crate::model::Project;

/// The distinguished category that selects every project.
pub const ALL_CATEGORIES: &str = "All";

/// `"All"` followed by each distinct non-empty category in first-seen order.
pub fn categories_of(projects: &[Project]) -> Vec<String> {
  let mut categories = vec![ALL_CATEGORIES.to_string()];
  for category in projects.iter().filter_map(|p| p.category.as_deref()).filter(|c| !c.is_empty()) {
    if !categories[1..].iter().any(|seen| seen == category) {
      categories.push(category.to_string());
    }
  }
  categories
}

/// Projects in `selected`, keeping input order. Matching is exact and
/// case-sensitive; `"All"` returns every project.
pub fn filter<'a>(projects: &'a [Project], selected: &str) -> Vec<&'a Project> {
  if selected == ALL_CATEGORIES {
    return projects.iter().collect();
  }
  projects.iter().filter(|p| p.category.as_deref() == Some(selected)).collect()
}

/// Message for an empty project view. Degraded content, an empty catalogue,
/// and an empty category each read differently.
pub fn empty_message(selected: &str, degraded: bool) -> String {
  if degraded {
    "Unable to load projects right now. Please try again later.".to_string()
  } else if selected == ALL_CATEGORIES {
    "No projects available yet.".to_string()
  } else {
    format!("No projects found in category \"{selected}\".")
  }
}
