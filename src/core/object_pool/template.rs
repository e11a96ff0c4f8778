//=========================================================================
// Template Sources
//=========================================================================
//
// Resolution of prototype definitions per pooled category.
//
// The pool only needs "given a category, the ordered templates for it".
// How templates are found (asset folders, config files, hard-coded
// tables) is up to the source.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;

//=== Internal Dependencies ===============================================

use super::PoolKey;

//=== TemplateSource ======================================================

/// Supplies the template set of a pooled category.
pub trait TemplateSource<P: PoolKey, Tm> {
    /// Returns the templates for `category`, possibly none.
    fn templates(&self, category: P) -> Vec<Tm>;
}

impl<P, Tm, F> TemplateSource<P, Tm> for F
where
    P: PoolKey,
    F: Fn(P) -> Vec<Tm>,
{
    fn templates(&self, category: P) -> Vec<Tm> {
        self(category)
    }
}

//=== TemplateCatalog =====================================================

/// In-memory template table keyed by category.
#[derive(Debug, Clone)]
pub struct TemplateCatalog<P: PoolKey, Tm> {
    entries: HashMap<P, Vec<Tm>>,
}

impl<P: PoolKey, Tm: Clone> TemplateCatalog<P, Tm> {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Appends a template to a category.
    pub fn insert(&mut self, category: P, template: Tm) {
        self.entries.entry(category).or_default().push(template);
    }

    /// Builder-style [`TemplateCatalog::insert`].
    pub fn with(mut self, category: P, template: Tm) -> Self {
        self.insert(category, template);
        self
    }

    /// Number of templates stored for a category.
    pub fn len_of(&self, category: P) -> usize {
        self.entries.get(&category).map_or(0, Vec::len)
    }
}

impl<P: PoolKey, Tm: Clone> Default for TemplateCatalog<P, Tm> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: PoolKey, Tm: Clone> TemplateSource<P, Tm> for TemplateCatalog<P, Tm> {
    fn templates(&self, category: P) -> Vec<Tm> {
        self.entries.get(&category).cloned().unwrap_or_default()
    }
}

//=========================================================================
// Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Kind {
        Hexagon,
        Triangle,
    }

    impl PoolKey for Kind {
        fn all() -> &'static [Self] {
            &[Kind::Hexagon, Kind::Triangle]
        }
    }

    #[test]
    fn catalog_keeps_insertion_order() {
        let catalog = TemplateCatalog::new()
            .with(Kind::Hexagon, "small")
            .with(Kind::Hexagon, "large");

        assert_eq!(catalog.templates(Kind::Hexagon), vec!["small", "large"]);
        assert_eq!(catalog.len_of(Kind::Hexagon), 2);
    }

    #[test]
    fn missing_category_yields_no_templates() {
        let catalog: TemplateCatalog<Kind, &str> = TemplateCatalog::new();
        assert!(catalog.templates(Kind::Triangle).is_empty());
    }

    #[test]
    fn closures_are_template_sources() {
        let source = |kind: Kind| match kind {
            Kind::Hexagon => vec![6],
            Kind::Triangle => vec![3],
        };

        assert_eq!(source.templates(Kind::Triangle), vec![3]);
    }
}
