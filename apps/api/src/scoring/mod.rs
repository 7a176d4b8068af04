// ATS scoring: fixed rules and the four-part scorer.

pub mod ats;
pub mod rules;
