//! The depth-first rewrite-search driver.
//!
//! Mechanism, not policy: the driver matches rule left-hand sides against
//! the current graph, asks the caller-supplied [`Visitor`] what to do with
//! every graph it reaches, and recurses or backtracks accordingly. Rule
//! semantics live entirely in the caller's [`RuleApplier`].

use crate::{
    error::Result,
    graph::GraphView,
    matcher::{
        derive_order_checks, BacktrackMatcher, Match, MatchReporter, Matcher, OrderCheck,
        SymmetryFilter,
    },
    pattern::{MatchConstraint, Pattern},
    types::Flow,
};
use log::debug;
use std::rc::Rc;

/// The visitor's verdict on a graph reached by the search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Expand this graph by applying every rule.
    Continue,
    /// Dead end; abort the entire search.
    FailureStop,
    /// Dead end; return one level and try the remaining alternatives.
    FailureTraceback,
    /// Accept this graph and abort the entire search.
    SolutionStop,
    /// Accept this graph and keep backtracking for further solutions.
    SolutionTraceback,
}

/// The sole arbiter of search semantics: depth limits, duplicate-state
/// detection and goal tests all live here.
pub trait Visitor<G: GraphView> {
    fn status(&mut self, graph: &G) -> Decision;
}

/// The result sink for accepted graphs.
pub trait GraphStorage<G: GraphView> {
    fn add(&mut self, graph: &G);
}

/// The rewrite collaborator: computes the successor graphs implied by
/// applying `rule`'s right-hand side at `m`.
///
/// Successors are handed back by value; the driver feeds each one into the
/// recursion itself, so a collaborator can never swallow the search's
/// abort signal.
pub trait RuleApplier<G: GraphView> {
    fn apply(&mut self, rule: &Rule<G>, target: &G, m: &Match) -> Vec<G>;
}

/// A rewrite rule as seen by the driver: a name, the left-hand-side graph
/// and its matching refinements. Right-hand-side semantics belong to the
/// [`RuleApplier`].
pub struct Rule<G> {
    name: String,
    lhs: G,
    constraints: Vec<Box<dyn MatchConstraint>>,
    wildcard: Option<String>,
}

impl<G: GraphView> Rule<G> {
    pub fn new(name: &str, lhs: G) -> Self {
        Self {
            name: name.to_string(),
            lhs,
            constraints: Vec::new(),
            wildcard: None,
        }
    }

    pub fn with_wildcard(mut self, label: &str) -> Self {
        self.wildcard = Some(label.to_string());
        self
    }

    pub fn add_constraint(&mut self, constraint: Box<dyn MatchConstraint>) {
        self.constraints.push(constraint);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn lhs(&self) -> &G {
        &self.lhs
    }
}

struct CompiledRule<'r, G> {
    rule: &'r Rule<G>,
    pattern: Pattern<'r>,
    checks: Option<Vec<OrderCheck>>,
}

/// Runs a depth-first rewrite search from `start`.
///
/// One pattern per rule is compiled for the duration of this call (rule
/// order is match-priority order); with `symmetry_breaking`, rules whose
/// pattern carries no constraints additionally get an order-check filter
/// so symmetric matches rewrite only once. When `matcher` is `None` a
/// [`BacktrackMatcher`] owned by this call is used. All per-call state is
/// dropped on every exit path.
///
/// When `trace_out` is supplied and a solution is accepted, it receives
/// deep copies of every graph on the path from `start` to the solution,
/// replacing the trace of any earlier solution.
///
/// Returns whether the visitor ever issued a solution decision.
#[allow(clippy::too_many_arguments)]
pub fn find_solution<G>(
    rules: &[Rule<G>],
    start: &G,
    storage: &mut dyn GraphStorage<G>,
    visitor: &mut dyn Visitor<G>,
    applier: &mut dyn RuleApplier<G>,
    trace_out: Option<&mut Vec<G>>,
    symmetry_breaking: bool,
    matcher: Option<&dyn Matcher>,
) -> Result<bool>
where
    G: GraphView + Clone,
{
    let default_matcher;
    let matcher = match matcher {
        Some(matcher) => matcher,
        None => {
            default_matcher = BacktrackMatcher::new();
            &default_matcher
        }
    };
    let mut compiled = Vec::with_capacity(rules.len());
    for rule in rules {
        let mut pattern = Pattern::new(&rule.lhs)?;
        if let Some(wildcard) = &rule.wildcard {
            pattern = pattern.with_wildcard(wildcard);
        }
        for constraint in &rule.constraints {
            pattern.add_constraint(constraint.clone_box());
        }
        let checks = if symmetry_breaking && rule.constraints.is_empty() {
            Some(derive_order_checks(&pattern, matcher)?)
        } else {
            None
        };
        compiled.push(CompiledRule {
            rule,
            pattern,
            checks,
        });
    }
    let mut search = Search {
        rules: &compiled,
        matcher,
        visitor,
        storage,
        applier,
        trace: Vec::new(),
        capture: trace_out.is_some(),
        captured: Vec::new(),
        found: false,
    };
    search.add(Rc::new(start.clone()));
    let found = search.found;
    let captured = search.captured;
    if let Some(out) = trace_out {
        if found {
            *out = captured;
        }
    }
    Ok(found)
}

struct Search<'a, G: GraphView + Clone> {
    rules: &'a [CompiledRule<'a, G>],
    matcher: &'a dyn Matcher,
    visitor: &'a mut dyn Visitor<G>,
    storage: &'a mut dyn GraphStorage<G>,
    applier: &'a mut dyn RuleApplier<G>,
    /// Graphs on the path from the start to the graph currently expanded.
    trace: Vec<Rc<G>>,
    capture: bool,
    captured: Vec<G>,
    found: bool,
}

impl<'a, G: GraphView + Clone> Search<'a, G> {
    fn add(&mut self, graph: Rc<G>) -> Flow {
        match self.visitor.status(&graph) {
            Decision::FailureStop => Flow::Abort,
            Decision::FailureTraceback => Flow::Continue,
            Decision::SolutionStop => {
                self.accept(&graph);
                Flow::Abort
            }
            Decision::SolutionTraceback => {
                self.accept(&graph);
                Flow::Continue
            }
            Decision::Continue => {
                self.trace.push(Rc::clone(&graph));
                let matcher = self.matcher;
                let rules = self.rules;
                let mut flow = Flow::Continue;
                for compiled in rules {
                    let mut reporter = ApplyReporter {
                        search: &mut *self,
                        compiled,
                        target: &graph,
                    };
                    let (_, rule_flow) = match &compiled.checks {
                        Some(checks) => {
                            let mut filter = SymmetryFilter::new(checks, &mut reporter);
                            matcher.find_matches(
                                &compiled.pattern,
                                graph.as_ref(),
                                &mut filter,
                                usize::MAX,
                            )
                        }
                        None => matcher.find_matches(
                            &compiled.pattern,
                            graph.as_ref(),
                            &mut reporter,
                            usize::MAX,
                        ),
                    };
                    if rule_flow.is_abort() {
                        flow = Flow::Abort;
                        break;
                    }
                }
                self.trace.pop();
                flow
            }
        }
    }

    fn accept(&mut self, graph: &Rc<G>) {
        debug!("solution accepted at depth {}", self.trace.len());
        self.storage.add(graph);
        self.found = true;
        if self.capture {
            let mut path: Vec<G> = self.trace.iter().map(|g| g.as_ref().clone()).collect();
            path.push(graph.as_ref().clone());
            self.captured = path;
        }
    }
}

struct ApplyReporter<'s, 'a, G: GraphView + Clone> {
    search: &'s mut Search<'a, G>,
    compiled: &'s CompiledRule<'a, G>,
    target: &'s Rc<G>,
}

impl<G: GraphView + Clone> MatchReporter for ApplyReporter<'_, '_, G> {
    fn report_hit(&mut self, _pattern: &Pattern<'_>, _target: &dyn GraphView, m: &Match) -> Flow {
        let successors =
            self.search
                .applier
                .apply(self.compiled.rule, self.target.as_ref(), m);
        for successor in successors {
            if self.search.add(Rc::new(successor)).is_abort() {
                return Flow::Abort;
            }
        }
        Flow::Continue
    }
}
