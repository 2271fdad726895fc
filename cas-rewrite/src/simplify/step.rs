use crate::expr::Expr;

/// A single rewrite applied by the simplifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    /// The name of the rule that fired.
    pub rule: &'static str,

    /// The node produced by the rule, before it is simplified further.
    pub result: Expr,
}

/// A type that collects the rewrites applied by the simplifier.
///
/// [`StepCollector`] is also implemented for the unit type `()`, which discards every step. This
/// is what [`Simplifier::simplify`](super::Simplifier::simplify) uses.
pub trait StepCollector<S> {
    /// Adds a step to the collector.
    fn push(&mut self, step: S);
}

impl<S> StepCollector<S> for () {
    #[inline]
    fn push(&mut self, _: S) {}
}

impl<S> StepCollector<S> for Vec<S> {
    #[inline]
    fn push(&mut self, step: S) {
        Vec::push(self, step);
    }
}
