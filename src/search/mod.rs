//! Tool search: weighted exact matching with an approximate fallback
//!
//! Pipeline: directive parsing, exact pass, optional approximate pass, then
//! ranking and panel reconstruction. Every function here is pure.

pub mod directive;
pub mod engine;
pub mod exact;
pub mod fuzzy;
pub mod ranking;
pub mod sanitize;
pub mod sections;
pub mod weights;


pub use directive::{directive_value, Directive, ParsedQuery, QueryParser};
pub use engine::{search_tools, SearchEngine, SearchResults};
pub use exact::{exact_matches, QueryTerms};
pub use fuzzy::{closest_substring, damerau_levenshtein, fuzzy_matches, FuzzyOutcome};
pub use ranking::{rank_and_reconstruct, RankedResults, SearchMatch};
pub use sanitize::{normalize, sanitize};
pub use weights::SearchFieldWeights;
