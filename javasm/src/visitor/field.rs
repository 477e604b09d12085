use crate::visitor::annotation::AnnotatableVisitor;

/// A visitor for the contents of a field, which are only annotations.
pub trait FieldVisitor: AnnotatableVisitor {}
