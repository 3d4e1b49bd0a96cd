use indexmap::IndexMap;
use log::trace;

use crate::{scope::Scope, types::RequireSite};

/// All require sites of one module that load the same source.
#[derive(Debug)]
pub struct SourceGroup<S> {
    /// Raw specifier before resolution, resolved id afterwards.
    pub source: String,
    pub sites: Vec<RequireSite<S>>,
    pub binding_name: Option<String>,
}

impl<S: Scope> SourceGroup<S> {
    pub fn new(source: impl Into<String>) -> Self {
        Self { source: source.into(), sites: Vec::new(), binding_name: None }
    }

    pub fn uses_return_value(&self) -> bool {
        self.sites.iter().any(|s| s.uses_return_value)
    }

    /// Picks the first `require$$<n>` with `n >= *uid` that no site's scope
    /// already binds. The counter is shared by every group of a module.
    pub fn assign_binding_name(&mut self, uid: &mut usize) -> &str {
        let sites = &self.sites;
        let name = self.binding_name.get_or_insert_with(|| loop {
            let candidate = format!("require$${}", *uid);
            *uid += 1;
            if !sites.iter().any(|site| site.scope.contains(&candidate)) {
                break candidate;
            }
            trace!("Binding name {} is taken", candidate);
        });
        name.as_str()
    }
}

/// Accumulates require sites during the traversal of one module.
///
/// Recording never resolves, renames or edits anything; groups keep the
/// order in which their source was first seen.
#[derive(Debug)]
pub struct RequireRegistry<S> {
    groups: IndexMap<String, SourceGroup<S>>,
}

impl<S> Default for RequireRegistry<S> {
    fn default() -> Self {
        Self { groups: IndexMap::new() }
    }
}

impl<S: Scope> RequireRegistry<S> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, source: &str, site: RequireSite<S>) {
        trace!(
            "Recording require('{}') at {}..{} (uses value: {})",
            source,
            site.call_span.start,
            site.call_span.end,
            site.uses_return_value
        );
        self.groups
            .entry(source.to_string())
            .or_insert_with(|| SourceGroup::new(source))
            .sites
            .push(site);
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn site_count(&self) -> usize {
        self.groups.values().map(|g| g.sites.len()).sum()
    }

    /// Distinct sources in first-discovery order.
    pub fn sources(&self) -> Vec<String> {
        self.groups.keys().cloned().collect()
    }

    pub fn into_groups(self) -> impl Iterator<Item = SourceGroup<S>> {
        self.groups.into_values()
    }
}
