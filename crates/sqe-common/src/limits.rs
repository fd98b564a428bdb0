//! Centralized iteration limits for the semantic query engine.
//!
//! Every walk over a parent chain (scopes, syntax ancestors, base types,
//! hiding relations) is bounded by one of these constants. The data is
//! acyclic by construction, so hitting a limit means the input is corrupt;
//! walkers stop early and log instead of looping forever.

/// Maximum number of scopes visited while walking a scope chain outward.
///
/// Used by the scope resolver, the lookup engine, and extension-member
/// discovery.
pub const MAX_SCOPE_WALK_ITERATIONS: usize = 10_000;

/// Maximum number of ancestors visited while walking syntax parents.
pub const MAX_TREE_WALK_ITERATIONS: usize = 10_000;

/// Maximum depth followed through base-type and interface chains.
pub const MAX_BASE_TYPE_DEPTH: usize = 256;

/// Maximum rounds of the overridden/hidden member fixed point.
///
/// Each round can only grow the hidden set, so the fixed point is reached in
/// at most `group.len()` rounds; this bounds pathological inputs.
pub const MAX_HIDING_ITERATIONS: usize = 1_024;

/// Maximum alias-to-alias hops followed when unwrapping an alias target.
pub const MAX_ALIAS_CHAIN: usize = 64;
