//! Interactive search client: debouncing, per-query result cache, tiered
//! matching, genre grouping and selection reconciliation.
//!
//! Everything except [`debounce`], [`api`] and [`interactive`] is synchronous
//! and pure; [`session::SearchSession`] is the single owner of mutable state.

pub mod api;
pub mod debounce;
pub mod genres;
pub mod interactive;
pub mod matcher;
pub mod results;
pub mod selection;
pub mod session;

pub use api::{FetchError, ProxyClient};
pub use debounce::Debouncer;
pub use genres::{GenreIndex, GenreKey, build_index};
pub use matcher::{Resolution, ResolutionKind, resolve};
pub use results::ResultCache;
pub use selection::{Selection, reconcile};
pub use session::{SearchSession, SearchView};
