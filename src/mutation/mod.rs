//! Mutation Engine: add / add-before / clone / move / clear / delete over array items.
//!
//! Items of one array always carry identities `<array>.<item>_1 ..= <array>.<item>_K`. Growth
//! shifts renumber from the highest index down, shrink shifts from the lowest index up, so no
//! two live items ever share an identity.

pub mod engine;
pub(crate) mod renumber;
pub mod request;
