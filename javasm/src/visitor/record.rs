use crate::visitor::annotation::AnnotatableVisitor;

/// A visitor for the contents of a record component, which are only annotations.
pub trait RecordComponentVisitor: AnnotatableVisitor {}
