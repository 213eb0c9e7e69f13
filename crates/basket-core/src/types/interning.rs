//! Item interning via `lasso`.
//!
//! Item names repeat once per basket they appear in, so the parser interns
//! them as it goes and only renumbers into canonical order at the end.

use std::borrow::Cow;

use lasso::{Key, Rodeo, Spur};

use super::identifiers::ItemId;

/// Normalize a raw item name: trim surrounding whitespace, lowercase.
/// Returns `None` for names that are empty after trimming.
pub fn normalize_item(raw: &str) -> Option<Cow<'_, str>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if trimmed.chars().any(char::is_uppercase) {
        Some(Cow::Owned(trimmed.to_lowercase()))
    } else {
        Some(Cow::Borrowed(trimmed))
    }
}

/// Interner for normalized item names.
#[derive(Debug, Default)]
pub struct ItemInterner {
    rodeo: Rodeo,
}

impl ItemInterner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalize and intern a raw name. `None` if the name is blank.
    pub fn intern(&mut self, raw: &str) -> Option<Spur> {
        let normalized = normalize_item(raw)?;
        Some(self.rodeo.get_or_intern(normalized.as_ref()))
    }

    pub fn len(&self) -> usize {
        self.rodeo.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rodeo.is_empty()
    }

    pub fn resolve(&self, key: &Spur) -> &str {
        self.rodeo.resolve(key)
    }

    /// Consume the interner, producing the names in lexicographic order and a
    /// remap table from interner key (by `Key::into_usize`) to canonical `ItemId`.
    pub fn into_canonical(self) -> (Vec<String>, Vec<ItemId>) {
        let mut entries: Vec<(Spur, &str)> = self.rodeo.iter().collect();
        entries.sort_unstable_by(|a, b| a.1.cmp(b.1));

        let mut remap = vec![ItemId(0); entries.len()];
        let mut names = Vec::with_capacity(entries.len());
        // A `Spur` is 32-bit, so the ranks always fit in an `ItemId`.
        for ((key, name), id) in entries.into_iter().zip((0..).map(ItemId)) {
            remap[key.into_usize()] = id;
            names.push(name.to_string());
        }
        (names, remap)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_trims_and_lowercases() {
        assert_eq!(normalize_item("  Whole Milk ").as_deref(), Some("whole milk"));
        assert_eq!(normalize_item("soda").as_deref(), Some("soda"));
        assert!(normalize_item("   ").is_none());
    }

    #[test]
    fn canonical_ids_follow_lexicographic_order() {
        let mut interner = ItemInterner::new();
        let milk = interner.intern("Milk").unwrap();
        let bread = interner.intern("bread").unwrap();
        let again = interner.intern(" MILK").unwrap();
        assert_eq!(milk, again);
        assert_eq!(interner.len(), 2);

        let (names, remap) = interner.into_canonical();
        assert_eq!(names, vec!["bread".to_string(), "milk".to_string()]);
        assert_eq!(remap[bread.into_usize()], ItemId(0));
        assert_eq!(remap[milk.into_usize()], ItemId(1));
    }
}
