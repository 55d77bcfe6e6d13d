//! Tests for the format-independent event stream tooling.

mod tree_list;
mod wellformed;
