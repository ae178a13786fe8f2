//! # swiftstyle-rules
//!
//! Built-in style rules for swiftstyle.
//!
//! Each rule reads one file's frozen token stream and structural model
//! and reports violations; some attach a mechanical fix.
//!
//! ## Available Rules
//!
//! | Code | Name | Fix | Description |
//! |------|------|-----|-------------|
//! | SW001 | `type-casing` | yes | UpperCamelCase types, lowerCamelCase members |
//! | SW002 | `acronym-casing` | yes | Consistent acronym rendering in identifiers |
//! | SW003 | `import-ordering` | no | Import group order and sorting |
//! | SW004 | `one-primary-type` | no | One top-level type per file |
//! | SW005 | `column-limit` | no | Maximum line length |
//! | SW006 | `statement-per-line` | yes | No semicolon-joined statements |
//! | SW007 | `no-force-unwrap` | partial | No postfix `!` on optionals |
//! | SW008 | `explicit-access-level` | yes | Explicit access keyword on declarations |
//! | SW009 | `group-overloads` | no | Contiguous function overloads |
//! | SW010 | `doc-public-api` | no | Docs on public declarations |
//!
//! ## Usage
//!
//! ```ignore
//! use swiftstyle_core::Analyzer;
//! use swiftstyle_rules::{NoForceUnwrap, TypeCasing};
//!
//! let analyzer = Analyzer::builder()
//!     .root("./Sources")
//!     .rule(TypeCasing::new())
//!     .rule(NoForceUnwrap::new())
//!     .build()?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod acronym_casing;
mod casing;
mod column_limit;
mod doc_public_api;
mod explicit_access_level;
mod group_overloads;
mod import_ordering;
mod no_force_unwrap;
mod one_primary_type;
mod presets;
mod statement_per_line;
mod type_casing;

pub use acronym_casing::AcronymCasing;
pub use column_limit::ColumnLimit;
pub use doc_public_api::DocPublicApi;
pub use explicit_access_level::ExplicitAccessLevel;
pub use group_overloads::GroupOverloads;
pub use import_ordering::ImportOrdering;
pub use no_force_unwrap::NoForceUnwrap;
pub use one_primary_type::OnePrimaryType;
pub use presets::{
    all_rules, configured_rules, minimal_rules, recommended_rules, strict_rules, Preset,
};
pub use statement_per_line::StatementPerLine;
pub use type_casing::TypeCasing;

/// Re-export core types for convenience.
pub use swiftstyle_core::{Rule, Severity, Violation};
