//! Built-in model pricing catalog backing `snapback models populate`.
//!
//! Costs are USD per million tokens, kept as decimal strings. Existing
//! store entries are left untouched so operator-edited pricing survives a
//! re-populate.

use crate::models::ModelEntry;
use crate::store::Store;

pub struct CatalogEntry {
    pub name: &'static str,
    pub input_cost: &'static str,
    pub cached_input_cost: Option<&'static str>,
    pub output_cost: Option<&'static str>,
}

pub const BUILTIN_MODELS: &[CatalogEntry] = &[
    CatalogEntry { name: "gpt-5.1", input_cost: "1.25", cached_input_cost: Some("0.125"), output_cost: Some("10.00") },
    CatalogEntry { name: "gpt-5", input_cost: "1.25", cached_input_cost: Some("0.125"), output_cost: Some("10.00") },
    CatalogEntry { name: "gpt-5-mini", input_cost: "0.25", cached_input_cost: Some("0.025"), output_cost: Some("2.00") },
    CatalogEntry { name: "gpt-5-nano", input_cost: "0.05", cached_input_cost: Some("0.005"), output_cost: Some("0.40") },
    CatalogEntry { name: "gpt-5.1-chat-latest", input_cost: "1.25", cached_input_cost: Some("0.125"), output_cost: Some("10.00") },
    CatalogEntry { name: "gpt-5-chat-latest", input_cost: "1.25", cached_input_cost: Some("0.125"), output_cost: Some("10.00") },
    CatalogEntry { name: "gpt-5.1-codex-max", input_cost: "1.25", cached_input_cost: Some("0.125"), output_cost: Some("10.00") },
    CatalogEntry { name: "gpt-5.1-codex", input_cost: "1.25", cached_input_cost: Some("0.125"), output_cost: Some("10.00") },
    CatalogEntry { name: "gpt-5-codex", input_cost: "1.25", cached_input_cost: Some("0.125"), output_cost: Some("10.00") },
    CatalogEntry { name: "gpt-5-pro", input_cost: "15.00", cached_input_cost: None, output_cost: Some("120.00") },
    CatalogEntry { name: "gpt-4.1", input_cost: "2.00", cached_input_cost: Some("0.50"), output_cost: Some("8.00") },
    CatalogEntry { name: "gpt-4.1-mini", input_cost: "0.40", cached_input_cost: Some("0.10"), output_cost: Some("1.60") },
    CatalogEntry { name: "gpt-4.1-nano", input_cost: "0.10", cached_input_cost: Some("0.025"), output_cost: Some("0.40") },
    CatalogEntry { name: "gpt-4o", input_cost: "2.50", cached_input_cost: Some("1.25"), output_cost: Some("10.00") },
    CatalogEntry { name: "gpt-4o-2024-05-13", input_cost: "5.00", cached_input_cost: None, output_cost: Some("15.00") },
    CatalogEntry { name: "gpt-4o-mini", input_cost: "0.15", cached_input_cost: Some("0.075"), output_cost: Some("0.60") },
    CatalogEntry { name: "gpt-realtime", input_cost: "4.00", cached_input_cost: Some("0.40"), output_cost: Some("16.00") },
    CatalogEntry { name: "gpt-realtime-mini", input_cost: "0.60", cached_input_cost: Some("0.06"), output_cost: Some("2.40") },
    CatalogEntry { name: "gpt-4o-realtime-preview", input_cost: "5.00", cached_input_cost: Some("2.50"), output_cost: Some("20.00") },
    CatalogEntry { name: "gpt-4o-mini-realtime-preview", input_cost: "0.60", cached_input_cost: Some("0.30"), output_cost: Some("2.40") },
    CatalogEntry { name: "gpt-audio", input_cost: "2.50", cached_input_cost: None, output_cost: Some("10.00") },
    CatalogEntry { name: "gpt-audio-mini", input_cost: "0.60", cached_input_cost: None, output_cost: Some("2.40") },
    CatalogEntry { name: "gpt-4o-audio-preview", input_cost: "2.50", cached_input_cost: None, output_cost: Some("10.00") },
    CatalogEntry { name: "gpt-4o-mini-audio-preview", input_cost: "0.15", cached_input_cost: None, output_cost: Some("0.60") },
    CatalogEntry { name: "o1", input_cost: "15.00", cached_input_cost: Some("7.50"), output_cost: Some("60.00") },
    CatalogEntry { name: "o1-pro", input_cost: "150.00", cached_input_cost: None, output_cost: Some("600.00") },
    CatalogEntry { name: "o3-pro", input_cost: "20.00", cached_input_cost: None, output_cost: Some("80.00") },
    CatalogEntry { name: "o3", input_cost: "2.00", cached_input_cost: Some("0.50"), output_cost: Some("8.00") },
    CatalogEntry { name: "o3-deep-research", input_cost: "10.00", cached_input_cost: Some("2.50"), output_cost: Some("40.00") },
    CatalogEntry { name: "o4-mini", input_cost: "1.10", cached_input_cost: Some("0.275"), output_cost: Some("4.40") },
    CatalogEntry { name: "o4-mini-deep-research", input_cost: "2.00", cached_input_cost: Some("0.50"), output_cost: Some("8.00") },
    CatalogEntry { name: "o3-mini", input_cost: "1.10", cached_input_cost: Some("0.55"), output_cost: Some("4.40") },
    CatalogEntry { name: "o1-mini", input_cost: "1.10", cached_input_cost: Some("0.55"), output_cost: Some("4.40") },
    CatalogEntry { name: "gpt-5.1-codex-mini", input_cost: "0.25", cached_input_cost: Some("0.025"), output_cost: Some("2.00") },
    CatalogEntry { name: "codex-mini-latest", input_cost: "1.50", cached_input_cost: Some("0.375"), output_cost: Some("6.00") },
    CatalogEntry { name: "gpt-5-search-api", input_cost: "1.25", cached_input_cost: Some("0.125"), output_cost: Some("10.00") },
    CatalogEntry { name: "gpt-4o-mini-search-preview", input_cost: "0.15", cached_input_cost: None, output_cost: Some("0.60") },
    CatalogEntry { name: "gpt-4o-search-preview", input_cost: "2.50", cached_input_cost: None, output_cost: Some("10.00") },
    CatalogEntry { name: "computer-use-preview", input_cost: "3.00", cached_input_cost: None, output_cost: Some("12.00") },
    CatalogEntry { name: "gpt-image-1", input_cost: "5.00", cached_input_cost: Some("1.25"), output_cost: None },
    CatalogEntry { name: "gpt-image-1-mini", input_cost: "2.00", cached_input_cost: Some("0.20"), output_cost: None },
];

/// Insert every catalog model missing from the store. Returns the number of
/// entries created.
pub fn populate_models(store: &mut Store) -> usize {
    let mut created = 0;
    for entry in BUILTIN_MODELS {
        if store.model_by_name(entry.name).is_some() {
            continue;
        }
        let id = store.next_model_id();
        store.models.push(ModelEntry {
            id,
            name: entry.name.to_string(),
            input_cost: entry.input_cost.to_string(),
            cached_input_cost: entry.cached_input_cost.map(str::to_string),
            output_cost: entry.output_cost.map(str::to_string),
            assigned_users: Vec::new(),
        });
        created += 1;
    }
    created
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn populate_fills_an_empty_store() {
        let mut store = Store::default();
        let created = populate_models(&mut store);
        assert_eq!(created, BUILTIN_MODELS.len());
        assert_eq!(store.models.len(), BUILTIN_MODELS.len());
    }

    #[test]
    fn populate_keeps_existing_entries() {
        let mut store = Store::default();
        populate_models(&mut store);
        store.models[0].input_cost = "999".into();
        let created = populate_models(&mut store);
        assert_eq!(created, 0);
        assert_eq!(store.models[0].input_cost, "999");
    }

    #[test]
    fn catalog_names_are_unique() {
        let mut names: Vec<_> = BUILTIN_MODELS.iter().map(|e| e.name).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), BUILTIN_MODELS.len());
    }
}
