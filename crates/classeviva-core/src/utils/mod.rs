//! Utility functions for date handling.

pub mod dates;

pub use dates::{
    from_remote_date, school_year_end, school_year_start, school_year_start_year, to_remote_date,
    validate_date,
};
