//! Standard validity checks.
//!
//! Checks are soft constraints: a failing check adds a fitness penalty
//! to steer the search, it never rejects a chromosome outright.

use crate::fitness::{induces_superposition, ValidityCheck};

/// Exactly one oracle gate must be present.
pub fn has_exactly_one_oracle() -> ValidityCheck {
    ValidityCheck::new("has_exactly_one_oracle", |chromosome| {
        chromosome
            .genes()
            .iter()
            .filter(|g| g.contains_oracle())
            .count()
            == 1
    })
}

/// Exactly one input-encoding gate must be present.
pub fn has_exactly_one_input() -> ValidityCheck {
    ValidityCheck::new("has_exactly_one_input", |chromosome| {
        chromosome
            .genes()
            .iter()
            .filter(|g| g.contains_input())
            .count()
            == 1
    })
}

/// The first gene must be an input encoding.
pub fn has_input_at_first_position() -> ValidityCheck {
    ValidityCheck::new("has_input_at_first_position", |chromosome| {
        chromosome
            .genes()
            .first()
            .is_some_and(|g| g.contains_input())
    })
}

/// At least one superposition-inducing gate must be present.
pub fn uses_superposition_gate() -> ValidityCheck {
    ValidityCheck::new("uses_superposition_gate", |chromosome| {
        chromosome.genes().iter().any(induces_superposition)
    })
}
