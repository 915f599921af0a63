//! Facade construction options.

use std::rc::Rc;

/// Pluggable ordering for object property names.
///
/// Returns the keys in display order, or `None` to keep declaration order.
/// A result that is not a permutation of the input is treated as `None`;
/// the fallback is best-effort, not a total-order guarantee.
pub type PropertySorter = Rc<dyn Fn(&[String]) -> Option<Vec<String>>>;

#[derive(Clone)]
pub struct FormConfig {
    /// Place a simple element's label above its input instead of beside it.
    pub vertically_place_labels: bool,
    /// Render doubly-bounded numerics as sliders instead of bounded text.
    pub use_sliders: bool,
    /// How many array pool children to pre-build eagerly at construction,
    /// beyond what `minItems` already forces. Front-loads expensive recursive
    /// compiles at form-build time rather than at first use.
    pub preconstruct_array_items: usize,
    pub sorter: PropertySorter,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            vertically_place_labels: false,
            use_sliders: false,
            preconstruct_array_items: 2,
            sorter: Rc::new(|keys| {
                let mut sorted = keys.to_vec();
                sorted.sort();
                Some(sorted)
            }),
        }
    }
}

impl std::fmt::Debug for FormConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormConfig")
            .field("vertically_place_labels", &self.vertically_place_labels)
            .field("use_sliders", &self.use_sliders)
            .field("preconstruct_array_items", &self.preconstruct_array_items)
            .finish_non_exhaustive()
    }
}

/// Apply the sorter, falling back to declaration order when it declines or
/// returns something that is not a permutation of the input.
pub fn sorted_keys(config: &FormConfig, declared: &[String]) -> Vec<String> {
    match (config.sorter)(declared) {
        Some(sorted) if is_permutation(declared, &sorted) => sorted,
        _ => declared.to_vec(),
    }
}

fn is_permutation(a: &[String], b: &[String]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut xs = a.to_vec();
    let mut ys = b.to_vec();
    xs.sort();
    ys.sort();
    xs == ys
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_sorter_orders_lexicographically() {
        let config = FormConfig::default();
        let declared = vec!["b".to_string(), "a".to_string(), "c".to_string()];
        assert_eq!(sorted_keys(&config, &declared), vec!["a", "b", "c"]);
    }

    #[test]
    fn declining_sorter_keeps_declaration_order() {
        let config = FormConfig {
            sorter: Rc::new(|_| None),
            ..FormConfig::default()
        };
        let declared = vec!["b".to_string(), "a".to_string()];
        assert_eq!(sorted_keys(&config, &declared), vec!["b", "a"]);
    }

    #[test]
    fn non_permutation_result_is_ignored() {
        let config = FormConfig {
            sorter: Rc::new(|_| Some(vec!["bogus".to_string()])),
            ..FormConfig::default()
        };
        let declared = vec!["b".to_string(), "a".to_string()];
        assert_eq!(sorted_keys(&config, &declared), vec!["b", "a"]);
    }
}
