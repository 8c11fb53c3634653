//! Week and date resolution for training calendars.
//!
//! Training data is bucketed by (year, week) with Monday-start weeks. Week 1
//! is the week containing January 1st; a week straddling the year boundary
//! belongs to the later year when its Sunday falls there.

pub mod weeks;

pub use weeks::{
    week_date_range, week_number, week_number_starting, week_start, weeks_in_year, year_week,
};
