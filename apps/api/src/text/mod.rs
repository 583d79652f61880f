// Text analysis primitives shared by the resume and answer scorers.
// Pure functions of their input; no I/O, no cached state.

pub mod keywords;
pub mod metrics;
pub mod tables;
