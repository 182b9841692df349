//! Centralized default constants for the casebook system.
//!
//! **This module is the single source of truth** for all shared default
//! values. Crates reference these constants instead of defining their own
//! magic numbers.

// =============================================================================
// FILE STORAGE
// =============================================================================

/// Upload fallback threshold: files smaller than this may be stored inline
/// in the row when the object store rejects the write, regardless of
/// declared content type.
pub const INLINE_FALLBACK_MAX_BYTES: usize = 100_000;

// =============================================================================
// PAGINATION
// =============================================================================

/// Default page size for list endpoints (notes, reports, audit trail).
pub const PAGE_LIMIT: i64 = 50;

/// Default page offset.
pub const PAGE_OFFSET: i64 = 0;

/// Characters kept when deriving a listing snippet from note content.
pub const SNIPPET_LEN: usize = 200;

// =============================================================================
// GENERATION
// =============================================================================

/// Request timeout for the external generation endpoint.
pub const GENERATION_TIMEOUT_SECS: u64 = 60;

/// Fixed delay applied by the simulated generation backend, approximating
/// a round-trip to a real endpoint.
pub const SIMULATED_GENERATION_DELAY_MS: u64 = 800;
