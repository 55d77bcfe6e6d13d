//! Contains logic shared between formats for shaping event streams.

pub mod normalize;
pub mod tree_list;
