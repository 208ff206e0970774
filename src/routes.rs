//! Route identifier canonicalization.
//!
//! Express and skip-stop runs are published under their own route ids
//! (`5X`, `6X`, ...). Riders look them up under the base route, so every
//! variant listed in [`ROUTE_REMAP`] collapses into its parent.

/// Variant route id to canonical route id.
///
/// No canonical id may appear as a variant key.
pub const ROUTE_REMAP: &[(&str, &str)] = &[
    ("5X", "5"),
    ("6X", "6"),
    ("7X", "7"),
    ("FX", "F"),
    ("SS", "SI"),
];

/// Returns the canonical id for `route_id`, or `route_id` itself when it is
/// not a known variant.
pub fn canonical_route_id(route_id: &str) -> &str {
    ROUTE_REMAP
        .iter()
        .find(|(variant, _)| *variant == route_id)
        .map(|(_, canonical)| *canonical)
        .unwrap_or(route_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_variants_are_remapped() {
        assert_eq!(canonical_route_id("5X"), "5");
        assert_eq!(canonical_route_id("6X"), "6");
        assert_eq!(canonical_route_id("7X"), "7");
        assert_eq!(canonical_route_id("FX"), "F");
        assert_eq!(canonical_route_id("SS"), "SI");
    }

    #[test]
    fn test_unknown_routes_pass_through() {
        assert_eq!(canonical_route_id("A"), "A");
        assert_eq!(canonical_route_id("5"), "5");
        assert_eq!(canonical_route_id(""), "");
        // lookup is exact, not case-folded
        assert_eq!(canonical_route_id("5x"), "5x");
    }

    #[test]
    fn test_canonicalization_is_idempotent() {
        let samples = ROUTE_REMAP
            .iter()
            .flat_map(|(variant, canonical)| [*variant, *canonical])
            .chain(["A", "GS", "L", "H", "FS", "Q", "nonsense"]);

        for route in samples {
            let once = canonical_route_id(route);
            assert_eq!(canonical_route_id(once), once, "route {route}");
        }
    }

    #[test]
    fn test_remap_table_has_no_chains() {
        for (_, canonical) in ROUTE_REMAP {
            assert!(
                ROUTE_REMAP.iter().all(|(variant, _)| variant != canonical),
                "{canonical} is both a target and a variant"
            );
        }
    }
}
