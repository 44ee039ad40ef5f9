//! Classic D*'s per-vertex lifecycle marker (spec.md §3, GLOSSARY).

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tag {
    /// Never touched by the search.
    #[default]
    New,
    /// Currently on the open list.
    Open,
    /// Previously processed and removed from the open list.
    Closed,
}
