// SPDX-License-Identifier: MIT

//! Field indexing by identifier and display position

use crate::form::field::FormField;
use std::collections::HashMap;

/// Position lookup over a form's fields in display order
///
/// The first declaration of an identifier wins; later duplicates are
/// recorded and otherwise ignored.
pub struct FieldIndex<'a> {
    fields: &'a [FormField],
    positions: HashMap<&'a str, usize>,
    duplicates: Vec<usize>,
}

impl<'a> FieldIndex<'a> {
    pub fn build(fields: &'a [FormField]) -> Self {
        let mut positions = HashMap::with_capacity(fields.len());
        let mut duplicates = Vec::new();

        for (position, field) in fields.iter().enumerate() {
            if positions.contains_key(field.id.as_str()) {
                log::warn!("Duplicate field id '{}' at position {}", field.id, position);
                duplicates.push(position);
            } else {
                positions.insert(field.id.as_str(), position);
            }
        }

        Self {
            fields,
            positions,
            duplicates,
        }
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.positions.get(id).copied()
    }

    pub fn get(&self, id: &str) -> Option<&'a FormField> {
        self.position(id).map(|p| &self.fields[p])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.positions.contains_key(id)
    }

    /// Whether the field at `position` is the one the index resolves its id to
    pub fn is_canonical(&self, position: usize) -> bool {
        self.fields
            .get(position)
            .is_some_and(|f| self.position(&f.id) == Some(position))
    }

    /// True when `reference` is declared after `field`
    pub fn is_forward(&self, field: &str, reference: &str) -> bool {
        match (self.position(field), self.position(reference)) {
            (Some(a), Some(b)) => b > a,
            _ => false,
        }
    }

    /// Fields whose ids were already taken, in display order
    pub fn duplicates(&self) -> impl Iterator<Item = &'a FormField> + '_ {
        let fields = self.fields;
        self.duplicates.iter().map(move |p| &fields[*p])
    }

    pub fn fields(&self) -> &'a [FormField] {
        self.fields
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Stable sort by `order`; equal orders keep declared position
pub fn display_order(mut fields: Vec<FormField>) -> Vec<FormField> {
    fields.sort_by_key(|f| f.order);
    fields
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::field::FieldType;

    fn fields(ids: &[&str]) -> Vec<FormField> {
        ids.iter()
            .map(|id| FormField::new(*id, FieldType::Text))
            .collect()
    }

    #[test]
    fn test_positions() {
        let list = fields(&["a", "b", "c"]);
        let index = FieldIndex::build(&list);

        assert_eq!(index.position("b"), Some(1));
        assert_eq!(index.get("c").map(|f| f.id.as_str()), Some("c"));
        assert!(index.position("zzz").is_none());
        assert_eq!(index.len(), 3);
    }

    #[test]
    fn test_forward_reference() {
        let list = fields(&["a", "b"]);
        let index = FieldIndex::build(&list);

        assert!(index.is_forward("a", "b"));
        assert!(!index.is_forward("b", "a"));
        assert!(!index.is_forward("a", "a"));
        assert!(!index.is_forward("a", "missing"));
    }

    #[test]
    fn test_duplicates_first_wins() {
        let list = fields(&["a", "b", "a"]);
        let index = FieldIndex::build(&list);

        assert_eq!(index.position("a"), Some(0));
        assert!(index.is_canonical(0));
        assert!(!index.is_canonical(2));
        let dups: Vec<&str> = index.duplicates().map(|f| f.id.as_str()).collect();
        assert_eq!(dups, vec!["a"]);
    }

    #[test]
    fn test_display_order_is_stable() {
        let mut list = fields(&["x", "y", "z"]);
        list[0].order = 2;
        let ordered: Vec<String> = display_order(list).into_iter().map(|f| f.id).collect();
        assert_eq!(ordered, vec!["y", "z", "x"]);
    }
}
