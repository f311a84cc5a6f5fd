use crate::{
    builtin, parse, ResourceLimits, RuleTable, Session, Validator, WaypointError, WaypointResult,
};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// The Waypoint engine.
///
/// Registry of validated decision trees. Each call to [`Engine::session`]
/// hands out a fresh session with its own fact store.
pub struct Engine {
    trees: HashMap<String, Arc<RuleTable>>,
    sources: HashMap<String, String>,
    /// Source id each tree was loaded from
    origins: HashMap<String, String>,
    validator: Validator,
    limits: ResourceLimits,
}

impl Default for Engine {
    fn default() -> Self {
        Self {
            trees: HashMap::new(),
            sources: HashMap::new(),
            origins: HashMap::new(),
            validator: Validator,
            limits: ResourceLimits::default(),
        }
    }
}

impl Engine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine with custom resource limits
    pub fn with_limits(limits: ResourceLimits) -> Self {
        Self {
            trees: HashMap::new(),
            sources: HashMap::new(),
            origins: HashMap::new(),
            validator: Validator,
            limits,
        }
    }

    /// Create an engine with the built-in `career_advisor` tree loaded
    pub fn with_builtin() -> WaypointResult<Self> {
        let mut engine = Self::new();
        engine.add_table(builtin::career_advisor()?, builtin::CAREER_ADVISOR_SOURCE_ID)?;
        engine.sources.insert(
            builtin::CAREER_ADVISOR_SOURCE_ID.to_string(),
            builtin::CAREER_ADVISOR_SOURCE.to_string(),
        );
        Ok(engine)
    }

    /// Get the current resource limits
    pub fn limits(&self) -> &ResourceLimits {
        &self.limits
    }

    /// Parse, validate and register every tree in `code`.
    ///
    /// Nothing is registered unless all trees in the source are valid.
    pub fn add_tree_code(&mut self, code: &str, source: &str) -> WaypointResult<()> {
        let docs = parse(code, Some(source.to_string()), &self.limits)?;
        let source_text: Arc<str> = Arc::from(code);

        let mut tables = Vec::new();
        let mut errors = Vec::new();
        for doc in docs {
            if self.trees.contains_key(&doc.name)
                || tables.iter().any(|t: &RuleTable| t.name() == doc.name)
            {
                errors.push(WaypointError::validation(
                    format!("Tree '{}' is already loaded", doc.name),
                    doc.span.clone().unwrap_or_default(),
                    source,
                    source_text.clone(),
                    doc.name.clone(),
                ));
                continue;
            }
            match self.validator.validate(doc, source_text.clone(), &self.limits) {
                Ok(table) => tables.push(table),
                Err(e) => errors.push(e),
            }
        }

        match errors.len() {
            0 => {}
            1 => return Err(errors.remove(0)),
            _ => return Err(WaypointError::MultipleErrors(errors)),
        }

        self.sources.insert(source.to_string(), code.to_string());
        for table in tables {
            self.add_table(table, source)?;
        }

        Ok(())
    }

    fn add_table(&mut self, table: RuleTable, source: &str) -> WaypointResult<()> {
        if self.trees.contains_key(table.name()) {
            return Err(WaypointError::Engine(format!(
                "Tree '{}' is already loaded",
                table.name()
            )));
        }
        debug!(
            tree = %table.name(),
            questions = table.question_count(),
            rules = table.rule_count(),
            "tree loaded"
        );
        self.origins
            .insert(table.name().to_string(), source.to_string());
        self.trees.insert(table.name().to_string(), Arc::new(table));
        Ok(())
    }

    /// Unregister a tree. Its source text goes too once no other tree from
    /// the same source remains.
    pub fn remove_tree(&mut self, tree_name: &str) {
        self.trees.remove(tree_name);
        if let Some(source) = self.origins.remove(tree_name) {
            if !self.origins.values().any(|s| *s == source) {
                self.sources.remove(&source);
            }
        }
    }

    /// Names of loaded trees, sorted
    pub fn list_trees(&self) -> Vec<String> {
        let mut names: Vec<String> = self.trees.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn get_tree(&self, tree_name: &str) -> Option<&Arc<RuleTable>> {
        self.trees.get(tree_name)
    }

    /// Source text registered under `source_id`
    pub fn get_source(&self, source_id: &str) -> Option<&str> {
        self.sources.get(source_id).map(|s| s.as_str())
    }

    /// Start a new session on `tree_name`
    pub fn session(&self, tree_name: &str) -> WaypointResult<Session> {
        let table = self
            .trees
            .get(tree_name)
            .ok_or_else(|| WaypointError::Engine(format!("Tree '{}' not found", tree_name)))?;
        Session::with_limits(Arc::clone(table), self.limits.clone())
    }
}
