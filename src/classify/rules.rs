//! Ordered token rule tables, one per shape tier.
//!
//! Each table is evaluated top to bottom and the first token found as a
//! substring of the normalized interpretation string decides the category.
//! Ordering matters twice over: wider spellings (`float32`, `float64`) must
//! precede the bare C++ names (`float`, `int`) they contain, and the
//! unsigned tokens (`uint64`, `uint32`) must precede the signed tokens that
//! are substrings of them, or an unsigned branch would resolve as signed.

use super::TypeCategory;

/// One classification rule: a lowercase token and the category it selects.
#[derive(Debug, Clone, Copy)]
pub struct TokenRule {
    pub token: &'static str,
    pub category: TypeCategory,
}

const fn rule(token: &'static str, category: TypeCategory) -> TokenRule {
    TokenRule { token, category }
}

/// Rules for variable-length (jagged) branches.
///
/// `uint64` has no category of its own; an explicit rule keeps it from
/// falling through to the `int64` substring match.
pub const VECTOR_RULES: &[TokenRule] = &[
    rule("float32", TypeCategory::VectorFloat),
    rule("float64", TypeCategory::VectorDouble),
    rule("double", TypeCategory::VectorDouble),
    rule("uint64", TypeCategory::VectorOther),
    rule("uint32", TypeCategory::VectorUInt32),
    rule("int32", TypeCategory::VectorInt32),
    rule("int64", TypeCategory::VectorInt64),
    rule("uint8", TypeCategory::VectorBool),
    rule("bool", TypeCategory::VectorBool),
    // C++ type-name spellings. `unsigned int` must precede the bare `int`
    // token it contains; `float` comes after float32/float64.
    rule("float", TypeCategory::VectorFloat),
    rule("unsigned int", TypeCategory::VectorUInt32),
    rule("int", TypeCategory::VectorInt32),
];

/// Rules for fixed-size bracketed arrays. Restricted to the float widths;
/// everything else is `array<other>`.
pub const ARRAY_RULES: &[TokenRule] = &[
    rule("float32", TypeCategory::ArrayFloat),
    rule("float64", TypeCategory::ArrayDouble),
];

/// Rules for scalar branches.
pub const SCALAR_RULES: &[TokenRule] = &[
    rule("float32", TypeCategory::Float),
    rule("float64", TypeCategory::Double),
    rule("double", TypeCategory::Double),
    rule("uint64", TypeCategory::Other),
    rule("uint32", TypeCategory::UInt32),
    rule("int32", TypeCategory::Int32),
    rule("int64", TypeCategory::Int64),
    rule("uint8", TypeCategory::Bool),
    rule("bool", TypeCategory::Bool),
    rule("float", TypeCategory::Float),
    rule("unsigned int", TypeCategory::UInt32),
    rule("int", TypeCategory::Int32),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokens_are_lowercase() {
        // Matching lowercases the haystack once, so tokens must already be
        // lowercase or they can never match.
        for table in [VECTOR_RULES, ARRAY_RULES, SCALAR_RULES] {
            for r in table {
                assert_eq!(r.token, r.token.to_ascii_lowercase());
            }
        }
    }

    #[test]
    fn test_later_rules_are_not_shadowed() {
        // If a later token contains an earlier token as a substring, every
        // string matching the later rule would already have matched the
        // earlier one, so the later rule would be dead.
        for table in [VECTOR_RULES, ARRAY_RULES, SCALAR_RULES] {
            for (i, a) in table.iter().enumerate() {
                for b in &table[..i] {
                    assert!(
                        !a.token.contains(b.token),
                        "rule '{}' is shadowed by earlier rule '{}'",
                        a.token,
                        b.token
                    );
                }
            }
        }
    }

    #[test]
    fn test_tier_categories_match_tier() {
        for r in VECTOR_RULES {
            assert!(r.category.is_vector(), "{} -> {}", r.token, r.category);
        }
        for r in ARRAY_RULES {
            assert!(r.category.is_array(), "{} -> {}", r.token, r.category);
        }
        for r in SCALAR_RULES {
            assert!(r.category.is_scalar(), "{} -> {}", r.token, r.category);
        }
    }
}
