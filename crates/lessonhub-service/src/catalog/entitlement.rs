//! Plan entitlement resolution.

use lessonhub_core::config::plan::PlanPolicy;
use lessonhub_entity::content::SectionFilter;
use lessonhub_entity::profile::PlanTier;

/// Computes the bound on visible content for a plan tier.
///
/// Paid students see the full eligible set; free students see at most the
/// per-section cap for a single-section query, or the all-sections cap
/// (three sections x the per-section cap) for an "all" query. The cap is
/// applied by truncating the eligible set, which the store returns in
/// stable creation-time order so the result is predictable.
#[derive(Debug, Clone)]
pub struct EntitlementResolver {
    /// The policy constants.
    policy: PlanPolicy,
}

impl EntitlementResolver {
    /// Creates a resolver with the given policy.
    pub fn new(policy: PlanPolicy) -> Self {
        Self { policy }
    }

    /// The cap for a plan/filter combination; `None` means unbounded.
    pub fn cap(&self, plan: PlanTier, filter: SectionFilter) -> Option<usize> {
        match plan {
            PlanTier::Paid => None,
            PlanTier::Free => Some(match filter {
                SectionFilter::One(_) => self.policy.free_section_cap,
                SectionFilter::All => self.policy.free_all_cap,
            }),
        }
    }

    /// Truncate an eligible set to the plan's cap.
    ///
    /// Returns the bounded items and whether anything was cut off.
    pub fn apply<T>(&self, plan: PlanTier, filter: SectionFilter, mut items: Vec<T>) -> (Vec<T>, bool) {
        match self.cap(plan, filter) {
            Some(cap) if items.len() > cap => {
                items.truncate(cap);
                (items, true)
            }
            _ => (items, false),
        }
    }
}

impl Default for EntitlementResolver {
    fn default() -> Self {
        Self::new(PlanPolicy::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lessonhub_entity::content::Section;

    #[test]
    fn test_free_single_section_cap() {
        let resolver = EntitlementResolver::default();
        let items: Vec<u32> = (0..15).collect();
        let (bounded, capped) = resolver.apply(
            PlanTier::Free,
            SectionFilter::One(Section::Lessons),
            items,
        );
        assert_eq!(bounded.len(), 10);
        assert!(capped);
        // Truncation keeps the head of the ordered set.
        assert_eq!(bounded[0], 0);
        assert_eq!(bounded[9], 9);
    }

    #[test]
    fn test_free_all_sections_cap() {
        let resolver = EntitlementResolver::default();
        let items: Vec<u32> = (0..45).collect();
        let (bounded, capped) = resolver.apply(PlanTier::Free, SectionFilter::All, items);
        assert_eq!(bounded.len(), 30);
        assert!(capped);
    }

    #[test]
    fn test_paid_is_unbounded() {
        let resolver = EntitlementResolver::default();
        let items: Vec<u32> = (0..500).collect();
        let (bounded, capped) = resolver.apply(PlanTier::Paid, SectionFilter::All, items);
        assert_eq!(bounded.len(), 500);
        assert!(!capped);
    }

    #[test]
    fn test_under_cap_untouched() {
        let resolver = EntitlementResolver::default();
        let items: Vec<u32> = (0..7).collect();
        let (bounded, capped) = resolver.apply(
            PlanTier::Free,
            SectionFilter::One(Section::Exercises),
            items,
        );
        assert_eq!(bounded.len(), 7);
        assert!(!capped);
    }
}
