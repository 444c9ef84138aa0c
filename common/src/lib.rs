//! SAYU Venue Linkage Common Library
//!
//! 展示レコードの自由記述会場名を正規会場へ対応付ける。I/Oを持たない純粋なライブラリ。

pub mod types;
pub mod error;
pub mod normalize;
pub mod matcher;
pub mod resolver;
pub mod reporter;
pub mod dedup;
pub mod alias;
pub mod suggest;
pub mod repair;
pub mod linkage;

pub use types::{CanonicalVenue, MatchDecision, MatchFlag, MatchType, RawExhibitionRecord};
pub use error::{Error, Result};
pub use normalize::{normalize_name, normalize_opt, is_numeric_only};
pub use matcher::{Candidate, Candidates, IndexedVenue, MalformedVenue, VenueIndex, MIN_PARTIAL_LEN};
pub use resolver::resolve;
pub use reporter::{summarize, LinkageSummary, UnmatchedName};
pub use dedup::{find_duplicates, DuplicateGroup, DuplicateKind};
pub use alias::{AliasConfig, build_aliases};
pub use suggest::{suggest, Suggestion};
pub use repair::{repair_records, RepairCorrection, RepairField};
pub use linkage::{LinkageOptions, Linker};
