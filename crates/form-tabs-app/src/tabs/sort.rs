//! Stable ordering of tabs by declared position

use super::Tab;

/// Sort tabs ascending by `position`; ties keep their incoming order
pub fn sort_by_position<'a, I>(tabs: I) -> Vec<&'a Tab>
where
    I: IntoIterator<Item = &'a Tab>,
{
    let mut sorted: Vec<&Tab> = tabs.into_iter().collect();
    sorted.sort_by_key(|tab| tab.position);
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tabs::assemble;
    use form_tabs_core::FieldDescriptor;

    fn field(slug: &str, position: i64) -> FieldDescriptor {
        FieldDescriptor::new(format!("{}_field", slug), "text-field")
            .in_tab(slug, slug, position)
    }

    #[test]
    fn test_sorts_ascending() {
        let tabs = assemble(vec![field("c", 2), field("a", 0), field("b", 1)]).unwrap();
        let sorted: Vec<_> = sort_by_position(tabs.iter())
            .into_iter()
            .map(|t| t.slug.as_str())
            .collect();
        assert_eq!(sorted, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_ties_keep_insertion_order() {
        let tabs = assemble(vec![
            field("z", 1),
            field("y", 0),
            field("x", 1),
            field("w", 0),
        ])
        .unwrap();
        let sorted: Vec<_> = sort_by_position(tabs.iter())
            .into_iter()
            .map(|t| t.slug.as_str())
            .collect();
        assert_eq!(sorted, vec!["y", "w", "z", "x"]);
    }

    #[test]
    fn test_negative_positions() {
        let tabs = assemble(vec![field("a", 5), field("b", -1)]).unwrap();
        let sorted = sort_by_position(tabs.iter());
        assert_eq!(sorted[0].slug, "b");
    }
}
