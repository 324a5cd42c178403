use crate::domain::BoundingBox;

pub mod memory;

#[cfg(feature = "web")]
pub mod web;

/// Access to the rendered board the drag controller works on.
///
/// Implementations wrap whatever owns the element tree (a browser DOM, or an
/// in-memory board). Handles are cheap to clone and compare by identity.
/// Lookups by id or dropzone only consider elements inside the mounted board.
pub trait BoardDom {
    type Element: Clone + PartialEq;

    /// Closest ancestor-or-self carrying the given attribute
    fn closest_with_attr(&self, el: &Self::Element, attr: &str) -> Option<Self::Element>;

    /// Reads an attribute value
    fn attribute(&self, el: &Self::Element, name: &str) -> Option<String>;

    /// Reads the element's DOM id, if it has a non-empty one
    fn element_id(&self, el: &Self::Element) -> Option<String>;

    /// Parent element, `None` for a detached element or the document root
    fn parent(&self, el: &Self::Element) -> Option<Self::Element>;

    /// Direct children in document order
    fn children(&self, el: &Self::Element) -> Vec<Self::Element>;

    /// All descendants in document order
    fn descendants(&self, el: &Self::Element) -> Vec<Self::Element>;

    /// Live layout box of the element
    fn bounding_box(&self, el: &Self::Element) -> BoundingBox;

    /// Finds an element by DOM id
    fn element_by_id(&self, id: &str) -> Option<Self::Element>;

    /// Every element carrying the dropzone attribute, in document order
    fn dropzones(&self, dropzone_attr: &str) -> Vec<Self::Element>;

    fn add_class(&mut self, el: &Self::Element, class: &str);

    fn remove_class(&mut self, el: &Self::Element, class: &str);

    fn has_class(&self, el: &Self::Element, class: &str) -> bool;

    /// Moves `child` under `parent`, before `reference` or last when `None`.
    ///
    /// A `reference` that is not a child of `parent` leaves the tree as is.
    fn insert_before(
        &mut self,
        parent: &Self::Element,
        child: &Self::Element,
        reference: Option<&Self::Element>,
    );
}
