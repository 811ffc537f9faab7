//! Catalog name suggestions and exact-name resolution

use crate::model::CatalogEntry;

/// Maximum number of suggestions offered while typing
pub const SUGGESTION_LIMIT: usize = 8;

/// What to offer when a non-empty query matches nothing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SuggestionFallback {
    /// Offer nothing
    #[default]
    Empty,
    /// Offer the whole catalog, as the old form did
    FullList,
}

/// Case-insensitive substring match over catalog names, in catalog order,
/// capped at `limit`.
pub fn suggest(
    entries: &[CatalogEntry],
    query: &str,
    fallback: SuggestionFallback,
    limit: usize,
) -> Vec<String> {
    let needle = query.trim().to_lowercase();
    let mut matches: Vec<&CatalogEntry> = entries
        .iter()
        .filter(|entry| entry.name.trim().to_lowercase().contains(&needle))
        .collect();

    if matches.is_empty() && !needle.is_empty() && fallback == SuggestionFallback::FullList {
        matches = entries.iter().collect();
    }

    matches
        .into_iter()
        .take(limit)
        .map(|entry| entry.name.clone())
        .collect()
}

/// Exact-name lookup; the first entry wins when names repeat
pub fn resolve<'a>(entries: &'a [CatalogEntry], name: &str) -> Option<&'a CatalogEntry> {
    let name = name.trim();
    entries.iter().find(|entry| entry.name.trim() == name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;
    use tandem_types::CatalogKind;

    fn entry(id: i64, name: &str, price: rust_decimal::Decimal) -> CatalogEntry {
        CatalogEntry {
            id,
            kind: CatalogKind::Works,
            name: name.to_string(),
            unit: "pcs".to_string(),
            default_price: price,
        }
    }

    fn catalog() -> Vec<CatalogEntry> {
        vec![
            entry(30000, "Vacuum the system", dec!(500)),
            entry(30001, "Leak search", dec!(250)),
            entry(30002, "Replace pressure sensor", dec!(1100)),
            entry(30003, "Replace fuse", dec!(300)),
            entry(30004, "Leak search", dec!(999)),
        ]
    }

    #[test]
    fn test_case_insensitive_substring() {
        let names = suggest(&catalog(), "REPLACE", SuggestionFallback::Empty, 8);
        assert_eq!(names, vec!["Replace pressure sensor", "Replace fuse"]);
    }

    #[test]
    fn test_non_ascii_names() {
        let mut entries = catalog();
        entries.push(entry(30005, "Замена предохранителя", dec!(300)));
        let names = suggest(&entries, "замена", SuggestionFallback::Empty, 8);
        assert_eq!(names, vec!["Замена предохранителя"]);
    }

    #[test]
    fn test_no_match_fallbacks() {
        let entries = catalog();
        assert!(suggest(&entries, "xyz", SuggestionFallback::Empty, 8).is_empty());
        assert_eq!(
            suggest(&entries, "xyz", SuggestionFallback::FullList, 8).len(),
            entries.len()
        );
    }

    #[test]
    fn test_result_is_capped() {
        let entries: Vec<CatalogEntry> = (0..20)
            .map(|i| entry(30000 + i, &format!("Work {i}"), dec!(1)))
            .collect();
        let names = suggest(&entries, "", SuggestionFallback::Empty, SUGGESTION_LIMIT);
        assert_eq!(names.len(), 8);
        assert_eq!(names[0], "Work 0");
        assert_eq!(
            suggest(&entries, "nothing", SuggestionFallback::FullList, SUGGESTION_LIMIT).len(),
            8
        );
    }

    #[test]
    fn test_resolve_first_match_wins() {
        let entries = catalog();
        let found = resolve(&entries, "Leak search").unwrap();
        assert_eq!(found.id, 30001);
        assert_eq!(found.default_price, dec!(250));
        assert!(resolve(&entries, "leak search").is_none());
        assert!(resolve(&entries, "Leak").is_none());
    }
}
