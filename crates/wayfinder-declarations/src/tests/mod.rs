//! Test suites for declaration lookup.

pub(crate) mod support;
