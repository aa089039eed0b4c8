//! Flutter-facing FFI surface for the notewall core.

pub mod api;
