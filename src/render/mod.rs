//! Element rendering: typed view-models per node kind and their HTML projection.

/// Element Renderer: template node + path + content -> [`view::Element`].
pub mod element;
/// Pure HTML projection of rendered elements.
pub mod markup;
/// View-models for each node kind.
pub mod view;
