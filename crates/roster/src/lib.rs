//! Filtered, paginated browsing of a student roster.
//!
//! `roster` turns a [`FilterCriteria`] value into matching students, a total
//! count, deterministic pages and the facet values that populate filter
//! choices. Storage sits behind two small traits, [`RecordSource`] and
//! [`FacetSource`], with an in-memory and a SQLite implementation.
//!
//! # Quick Start
//!
//! ```
//! use roster::{dataset, FilterCriteria, MemoryStore, PageSize, QueryEngine};
//!
//! let engine = QueryEngine::new(MemoryStore::new(dataset::generate(60, 1))?);
//!
//! let mut criteria = FilterCriteria::default();
//! engine.reset(&mut criteria)?;
//! criteria.grade_level = "Grade 11".into();
//! criteria.include_male = false;
//!
//! let page = engine.page(&criteria, 1, PageSize::rows(10))?;
//! assert!(page.records.iter().all(|s| s.grade_level == "Grade 11"));
//! assert_eq!(page.total, engine.count(&criteria)?);
//! # Ok::<(), roster::RosterError>(())
//! ```
//!
//! # Architecture
//!
//! ```text
//! Session ── owns FilterCriteria, page, PageSize, Facets
//!    │
//! QueryEngine ── PredicateBuilder ──▶ roster_seeker::Query
//!    │                                   │
//!    ├── RecordSource::fetch / count_matching
//!    └── FacetSource::distinct_non_empty / min_max
//!            │
//!   MemoryStore (Query::filter)   SqliteStore (Query::to_sql)
//! ```
//!
//! Both stores evaluate the very same `Query`, so they agree on which
//! students match and in which order.

mod config;
mod criteria;
pub mod dataset;
mod engine;
mod error;
mod facets;
mod memory;
mod pagination;
mod predicate;
mod record;
mod session;
mod source;
mod sqlite;
mod summary;

pub use config::{RosterConfig, SourceConfig};
pub use criteria::{Dimension, FilterCriteria, ALL};
pub use engine::QueryEngine;
pub use error::{Result, RosterError};
pub use facets::{AgeBounds, FacetCatalog, FacetColumn, Facets, NumericColumn};
pub use memory::MemoryStore;
pub use pagination::{
    clamp_page, offset, total_pages, PageResult, PageSize, Window, PAGE_SIZE_CHOICES,
};
pub use predicate::PredicateBuilder;
pub use record::{Sex, Student};
pub use session::{editor_age_range, EditOutcome, Session};
pub use source::{FacetSource, RecordSource, Store};
pub use sqlite::SqliteStore;
pub use summary::ActiveFilterSummary;
