//! Lookup registry mapping stable names to compact keys.

use std::collections::HashMap;

use st_core::{ElementId, LoadCaseId, ProjectId, ResultSetId, StoryId};

use crate::entities::{
    AnalysisKind, Element, ElementKind, LoadCase, LoadCaseKind, ResultSet, Story,
};
use crate::{ModelError, ModelResult};

/// Registry of stories, elements, load cases and result sets.
///
/// Entities are stored in vectors indexed by their IDs; name lookup goes
/// through scoped hash maps. Stories and load cases are scoped to their
/// result set, elements to their project.
#[derive(Debug, Default)]
pub struct ModelRegistry {
    stories: Vec<Story>,
    elements: Vec<Element>,
    load_cases: Vec<LoadCase>,
    result_sets: Vec<ResultSet>,

    story_by_name: HashMap<(ResultSetId, String), StoryId>,
    element_by_name: HashMap<(ProjectId, String), ElementId>,
    case_by_name: HashMap<(ResultSetId, String), LoadCaseId>,
    set_by_name: HashMap<String, ResultSetId>,
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_result_set(
        &mut self,
        project: ProjectId,
        name: impl Into<String>,
        kind: AnalysisKind,
    ) -> ModelResult<ResultSetId> {
        let name = name.into();
        if self.set_by_name.contains_key(&name) {
            return Err(ModelError::DuplicateResultSet { name });
        }
        let id = ResultSetId::from_index(self.result_sets.len() as u32);
        self.set_by_name.insert(name.clone(), id);
        self.result_sets.push(ResultSet {
            id,
            project,
            name,
            kind,
        });
        Ok(id)
    }

    pub fn add_story(
        &mut self,
        result_set: ResultSetId,
        name: impl Into<String>,
        sort_order: u32,
        elevation_m: Option<f64>,
    ) -> ModelResult<StoryId> {
        let name = name.into();
        let key = (result_set, name.clone());
        if self.story_by_name.contains_key(&key) {
            return Err(ModelError::DuplicateStory { name });
        }
        let id = StoryId::from_index(self.stories.len() as u32);
        self.story_by_name.insert(key, id);
        self.stories.push(Story {
            id,
            result_set,
            name,
            sort_order,
            elevation_m,
        });
        Ok(id)
    }

    pub fn add_element(
        &mut self,
        project: ProjectId,
        name: impl Into<String>,
        kind: ElementKind,
    ) -> ModelResult<ElementId> {
        let name = name.into();
        let key = (project, name.clone());
        if self.element_by_name.contains_key(&key) {
            return Err(ModelError::DuplicateElement { name });
        }
        let id = ElementId::from_index(self.elements.len() as u32);
        self.element_by_name.insert(key, id);
        self.elements.push(Element {
            id,
            project,
            name,
            kind,
        });
        Ok(id)
    }

    /// Look up a load case by name, creating it on first reference.
    /// Idempotent: re-interning the same name returns the existing id.
    pub fn intern_load_case(
        &mut self,
        result_set: ResultSetId,
        name: impl Into<String>,
        kind: LoadCaseKind,
    ) -> LoadCaseId {
        let name = name.into();
        let key = (result_set, name.clone());
        if let Some(&id) = self.case_by_name.get(&key) {
            return id;
        }
        let id = LoadCaseId::from_index(self.load_cases.len() as u32);
        self.case_by_name.insert(key, id);
        self.load_cases.push(LoadCase {
            id,
            result_set,
            name,
            kind,
        });
        id
    }

    pub fn story(&self, id: StoryId) -> Option<&Story> {
        self.stories.get(id.index() as usize)
    }

    pub fn story_by_name(&self, result_set: ResultSetId, name: &str) -> Option<&Story> {
        self.story_by_name
            .get(&(result_set, name.to_string()))
            .and_then(|&id| self.story(id))
    }

    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(id.index() as usize)
    }

    pub fn element_by_name(&self, project: ProjectId, name: &str) -> Option<&Element> {
        self.element_by_name
            .get(&(project, name.to_string()))
            .and_then(|&id| self.element(id))
    }

    pub fn load_case(&self, id: LoadCaseId) -> Option<&LoadCase> {
        self.load_cases.get(id.index() as usize)
    }

    pub fn load_case_by_name(&self, result_set: ResultSetId, name: &str) -> Option<&LoadCase> {
        self.case_by_name
            .get(&(result_set, name.to_string()))
            .and_then(|&id| self.load_case(id))
    }

    pub fn result_set(&self, id: ResultSetId) -> Option<&ResultSet> {
        self.result_sets.get(id.index() as usize)
    }

    pub fn result_set_by_name(&self, name: &str) -> Option<&ResultSet> {
        self.set_by_name.get(name).and_then(|&id| self.result_set(id))
    }

    /// Stories of one result set, ordered by declared `sort_order` ascending.
    pub fn stories_of(&self, result_set: ResultSetId) -> Vec<&Story> {
        let mut out: Vec<&Story> = self
            .stories
            .iter()
            .filter(|s| s.result_set == result_set)
            .collect();
        out.sort_by_key(|s| s.sort_order);
        out
    }

    /// Load cases of one result set, in creation (first-reference) order.
    pub fn load_cases_of(&self, result_set: ResultSetId) -> Vec<&LoadCase> {
        self.load_cases
            .iter()
            .filter(|c| c.result_set == result_set)
            .collect()
    }
}
