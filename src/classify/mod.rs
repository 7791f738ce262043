//! Branch type classification.
//!
//! Maps a branch's raw interpretation string (endianness + width codes plus
//! shape markers, as reported by the file reader) onto a closed set of
//! human-readable type categories. Classification is an ordered rule table
//! evaluated top to bottom with first-match-wins semantics, so the
//! resolution order of ambiguous strings is auditable per rule.

mod rules;

pub use rules::{ARRAY_RULES, SCALAR_RULES, TokenRule, VECTOR_RULES};

/// Closed set of branch type categories.
///
/// Derived deterministically from the raw interpretation string and never
/// mutated afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TypeCategory {
    VectorFloat,
    VectorDouble,
    VectorInt32,
    VectorInt64,
    VectorUInt32,
    VectorBool,
    VectorOther,
    ArrayFloat,
    ArrayDouble,
    ArrayOther,
    Float,
    Double,
    Int32,
    Int64,
    UInt32,
    Bool,
    Other,
}

impl TypeCategory {
    /// All categories, in display order.
    pub const ALL: [TypeCategory; 17] = [
        TypeCategory::VectorFloat,
        TypeCategory::VectorDouble,
        TypeCategory::VectorInt32,
        TypeCategory::VectorInt64,
        TypeCategory::VectorUInt32,
        TypeCategory::VectorBool,
        TypeCategory::VectorOther,
        TypeCategory::ArrayFloat,
        TypeCategory::ArrayDouble,
        TypeCategory::ArrayOther,
        TypeCategory::Float,
        TypeCategory::Double,
        TypeCategory::Int32,
        TypeCategory::Int64,
        TypeCategory::UInt32,
        TypeCategory::Bool,
        TypeCategory::Other,
    ];

    /// Human-readable label used in reports, exports and the query table.
    pub fn label(&self) -> &'static str {
        match self {
            TypeCategory::VectorFloat => "vector<float>",
            TypeCategory::VectorDouble => "vector<double>",
            TypeCategory::VectorInt32 => "vector<int32>",
            TypeCategory::VectorInt64 => "vector<int64>",
            TypeCategory::VectorUInt32 => "vector<uint32>",
            TypeCategory::VectorBool => "vector<uint8/bool>",
            TypeCategory::VectorOther => "vector<other>",
            TypeCategory::ArrayFloat => "array<float>",
            TypeCategory::ArrayDouble => "array<double>",
            TypeCategory::ArrayOther => "array<other>",
            TypeCategory::Float => "float",
            TypeCategory::Double => "double",
            TypeCategory::Int32 => "int32",
            TypeCategory::Int64 => "int64",
            TypeCategory::UInt32 => "uint32",
            TypeCategory::Bool => "uint8/bool",
            TypeCategory::Other => "other",
        }
    }

    /// Inverse of [`label`](Self::label). Returns `None` for unknown labels.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.label() == label)
    }

    /// Variable-length (jagged) categories.
    pub fn is_vector(&self) -> bool {
        matches!(
            self,
            TypeCategory::VectorFloat
                | TypeCategory::VectorDouble
                | TypeCategory::VectorInt32
                | TypeCategory::VectorInt64
                | TypeCategory::VectorUInt32
                | TypeCategory::VectorBool
                | TypeCategory::VectorOther
        )
    }

    /// Fixed-size array categories.
    pub fn is_array(&self) -> bool {
        matches!(
            self,
            TypeCategory::ArrayFloat | TypeCategory::ArrayDouble | TypeCategory::ArrayOther
        )
    }

    /// Scalar categories (everything that is neither vector nor array).
    pub fn is_scalar(&self) -> bool {
        !self.is_vector() && !self.is_array()
    }
}

impl std::fmt::Display for TypeCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Endianness-prefixed width codes rewritten to canonical type tokens.
///
/// Endianness is irrelevant to classification, so both big-endian (`>`) and
/// little-endian (`<`) spellings collapse onto the same token.
const WIDTH_CODES: &[(&str, &str)] = &[
    (">f4", "float32"),
    ("<f4", "float32"),
    (">f8", "float64"),
    ("<f8", "float64"),
    (">i4", "int32"),
    ("<i4", "int32"),
    (">i8", "int64"),
    ("<i8", "int64"),
    (">u4", "uint32"),
    ("<u4", "uint32"),
    (">u8", "uint64"),
    ("<u8", "uint64"),
];

/// Rewrite endianness-prefixed width codes to canonical numeric tokens.
pub fn normalize(raw: &str) -> String {
    let mut s = raw.to_string();
    for (code, token) in WIDTH_CODES {
        if s.contains(code) {
            s = s.replace(code, token);
        }
    }
    s
}

/// Markers indicating a variable-length (jagged) branch.
///
/// `var *` and `Jagged` are the uproot-style interpretation spellings; a
/// `vector<` substring covers readers that report C++ type names instead.
const VARIABLE_LENGTH_MARKERS: &[&str] = &["var *", "Jagged", "vector<"];

/// Classify a raw interpretation string into exactly one category.
///
/// Never fails: strings with no recognized numeric token resolve to the
/// `other` variant of their shape tier.
pub fn classify(raw: &str) -> TypeCategory {
    let normalized = normalize(raw);

    if VARIABLE_LENGTH_MARKERS.iter().any(|m| normalized.contains(m)) {
        apply_rules(&normalized, VECTOR_RULES, TypeCategory::VectorOther)
    } else if normalized.contains('[') && normalized.contains(']') {
        apply_rules(&normalized, ARRAY_RULES, TypeCategory::ArrayOther)
    } else {
        apply_rules(&normalized, SCALAR_RULES, TypeCategory::Other)
    }
}

/// Evaluate an ordered rule table; the first matching rule wins.
///
/// Token matching is case-insensitive (interpretation strings mix `Bool_t`,
/// `bool` and similar spellings depending on the reader).
fn apply_rules(normalized: &str, rules: &[TokenRule], fallback: TypeCategory) -> TypeCategory {
    let haystack = normalized.to_ascii_lowercase();
    rules
        .iter()
        .find(|rule| haystack.contains(rule.token))
        .map(|rule| rule.category)
        .unwrap_or(fallback)
}
