//! Tick sources

pub mod provider;
pub mod supabase;
pub mod synthetic;

pub use provider::{SourceError, TickSource};
pub use supabase::SupabaseSource;
pub use synthetic::SyntheticSource;
