//! Priority resolver: (urgency, category) → priority label.

use super::types::{Category, PriorityLabel, Urgency};

/// Map urgency and category to a priority label.
///
/// No category means no priority. The match is exhaustive over both enums,
/// so every declared combination has a label.
pub fn resolve_priority(urgency: Urgency, category: Option<Category>) -> Option<PriorityLabel> {
    use Category::*;
    use PriorityLabel::*;
    use Urgency::*;

    let category = category?;
    let label = match (urgency, category) {
        (Critical, Medicine) => High,
        (Critical, Clothes) => Medium,
        (Critical, Fancy) => Low,
        (Preferred, Medicine) => Medium,
        (Preferred, Clothes | Fancy) => Low,
        (Flexible, _) => Low,
    };
    Some(label)
}

#[cfg(test)]
mod tests {
    use super::*;

    const URGENCIES: [Urgency; 3] = [Urgency::Critical, Urgency::Preferred, Urgency::Flexible];

    #[test]
    fn no_category_no_priority() {
        for urgency in URGENCIES {
            assert_eq!(resolve_priority(urgency, None), None);
        }
    }

    #[test]
    fn full_matrix() {
        let cases = [
            (Urgency::Critical, Category::Medicine, PriorityLabel::High),
            (Urgency::Critical, Category::Clothes, PriorityLabel::Medium),
            (Urgency::Critical, Category::Fancy, PriorityLabel::Low),
            (Urgency::Preferred, Category::Medicine, PriorityLabel::Medium),
            (Urgency::Preferred, Category::Clothes, PriorityLabel::Low),
            (Urgency::Preferred, Category::Fancy, PriorityLabel::Low),
            (Urgency::Flexible, Category::Medicine, PriorityLabel::Low),
            (Urgency::Flexible, Category::Clothes, PriorityLabel::Low),
            (Urgency::Flexible, Category::Fancy, PriorityLabel::Low),
        ];
        for (urgency, category, expected) in cases {
            assert_eq!(
                resolve_priority(urgency, Some(category)),
                Some(expected),
                "{urgency} + {category}"
            );
        }
    }
}
