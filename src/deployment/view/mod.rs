//! Display projection of reconciled deployments.
//!
//! Everything here is a total function over its inputs: no I/O, no clock,
//! no shared state.

mod locale;
mod projection;

pub use locale::{DisplayLocale, MISSING_TIMESTAMP, ParseDisplayLocaleError, ViewOptions};
pub use projection::{
    BadgeVariant, DetailView, PENDING_ENDPOINT, ViewRow, failure_banner, method_names, project,
    project_detail, project_report, project_with_methods,
};
