//! Subject classification
//!
//! Assigns controlled-vocabulary subject codes to a record by merging
//! candidates from a lexical search service and a generative suggester,
//! validating them against the vocabulary authority, and selecting a
//! division-diverse top-k.
//!
//! Layering:
//! - `keywords` — search-term extraction from record text
//! - `source` — the `CandidateSource` seam plus raw candidate parsing
//! - `search_client` / `llm_suggester` — the two candidate sources
//! - `pool` — notation-keyed merge of raw candidates
//! - `authority` — notation validation against the vocabulary service
//! - `engine` — aggregation, diversity selection and output formatting

pub mod authority;
pub mod engine;
pub mod keywords;
pub mod llm_suggester;
pub mod pool;
pub mod search_client;
pub mod source;

pub use authority::{AuthorityValidator, NotationAuthority, ValidatedLabels};
pub use engine::SubjectClassifier;
pub use keywords::extract_keywords;
pub use llm_suggester::GenerativeSuggester;
pub use pool::{CandidatePool, PooledCandidate};
pub use search_client::LexicalSearchClient;
pub use source::{CandidateSource, QueryContext, RawCandidate};
