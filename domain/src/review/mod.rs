//! Review subdomain
//!
//! The critic's side of the collaboration: the [`verdict::ReviewVerdict`]
//! value object with its score invariants, and tolerant parsing of raw
//! critic output.

pub mod parsing;
pub mod verdict;

pub use parsing::{ParsedVerdict, VerdictSource, parse_verdict, strip_code_fence};
pub use verdict::ReviewVerdict;
