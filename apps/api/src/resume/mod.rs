// Resume scoring: ATS-friendliness and job-description match.
// Pure functions over plain text; handlers only validate input size.
pub mod ats;
pub mod handlers;
pub mod jd_match;
