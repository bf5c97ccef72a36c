use crate::{
    graph::GraphView,
    matcher::{Match, MatchReporter, Matcher},
    pattern::Pattern,
    types::{Flow, LabelCode, NodeIndex},
};
use itertools::Itertools;
use log::debug;
use std::collections::HashMap;

/// Code of a target label that never occurs in the pattern; compatible
/// only with the wildcard.
const FOREIGN: LabelCode = -1;

const UNMAPPED: NodeIndex = usize::MAX;

#[derive(Default)]
struct Interner {
    codes: HashMap<String, LabelCode>,
}

impl Interner {
    fn intern(&mut self, label: &str) -> LabelCode {
        if let Some(&code) = self.codes.get(label) {
            code
        } else {
            let code = self.codes.len() as LabelCode;
            self.codes.insert(label.to_string(), code);
            code
        }
    }

    fn lookup(&self, label: &str) -> LabelCode {
        self.codes.get(label).copied().unwrap_or(FOREIGN)
    }
}

struct CompiledNode {
    label: LabelCode,
    degree: usize,
    /// Collapsed adjacency: per distinct neighbor, the sorted multiset of
    /// edge-label codes (parallel edges collapse here).
    adj: Vec<(NodeIndex, Vec<LabelCode>)>,
}

fn compile(graph: &dyn GraphView, interner: &mut Interner, intern: bool) -> Vec<CompiledNode> {
    (0..graph.node_count())
        .map(|i| {
            let mut per_neighbor: HashMap<NodeIndex, Vec<LabelCode>> = HashMap::new();
            let mut degree = 0;
            for e in graph.adjacency(i) {
                let code = if intern {
                    interner.intern(e.label)
                } else {
                    interner.lookup(e.label)
                };
                per_neighbor.entry(e.to).or_default().push(code);
                degree += 1;
            }
            let mut adj: Vec<_> = per_neighbor.into_iter().collect();
            for (_, codes) in adj.iter_mut() {
                codes.sort_unstable();
            }
            adj.sort_unstable_by_key(|&(to, _)| to);
            let label = if intern {
                interner.intern(graph.node_label(i))
            } else {
                interner.lookup(graph.node_label(i))
            };
            CompiledNode { label, degree, adj }
        })
        .collect()
}

fn compatible(a: LabelCode, b: LabelCode, wildcard: Option<LabelCode>) -> bool {
    a == b || Some(a) == wildcard || Some(b) == wildcard
}

/// Must every pattern edge label find a distinct target edge label?
///
/// Exact codes consume equal target codes first; remaining pattern
/// wildcards absorb whatever is left.
fn edge_labels_compatible(
    pattern: &[LabelCode],
    target: &[LabelCode],
    wildcard: Option<LabelCode>,
) -> bool {
    if pattern.len() > target.len() {
        return false;
    }
    let mut remaining = target.to_vec();
    for &code in pattern {
        if Some(code) == wildcard {
            continue;
        }
        if let Some(i) = remaining.iter().position(|&c| c == code) {
            remaining.remove(i);
        } else if let Some(i) = remaining.iter().position(|&c| Some(c) == wildcard) {
            remaining.remove(i);
        } else {
            return false;
        }
    }
    true
}

/// Greedy feasibility pre-check on degree multisets: every pattern degree,
/// largest first, consumes the smallest still-available target degree that
/// suffices. A miss proves there is no match at all.
fn degrees_feasible(pattern: &[CompiledNode], target: &[CompiledNode]) -> bool {
    let mut pool: Vec<usize> = target.iter().map(|n| n.degree).sorted().collect_vec();
    for need in pattern.iter().map(|n| n.degree).sorted().rev() {
        match pool.iter().position(|&d| d >= need) {
            Some(i) => {
                pool.remove(i);
            }
            None => return false,
        }
    }
    true
}

/// Deterministic pattern visit order: most already-placed neighbors first,
/// lowest index on ties; restarts at an isolated node for disconnected
/// patterns.
fn visit_order(pattern: &[CompiledNode]) -> Vec<NodeIndex> {
    let n = pattern.len();
    let mut order = Vec::with_capacity(n);
    let mut placed = vec![false; n];
    for _ in 0..n {
        let next = (0..n)
            .filter(|&p| !placed[p])
            .max_by_key(|&p| {
                let connected = pattern[p].adj.iter().filter(|&&(q, _)| placed[q]).count();
                (connected, std::cmp::Reverse(p))
            })
            .unwrap();
        placed[next] = true;
        order.push(next);
    }
    order
}

struct SearchState<'a> {
    pattern: &'a Pattern<'a>,
    target: &'a dyn GraphView,
    pnodes: &'a [CompiledNode],
    tnodes: &'a [CompiledNode],
    order: &'a [NodeIndex],
    wildcard: Option<LabelCode>,
    mapping: Vec<NodeIndex>,
    used: Vec<bool>,
    reporter: &'a mut dyn MatchReporter,
    max_hits: usize,
    hits: usize,
    aborted: bool,
}

impl SearchState<'_> {
    fn extend(&mut self, depth: usize) -> Flow {
        if depth == self.order.len() {
            return self.deliver();
        }
        let p = self.order[depth];
        for t in 0..self.tnodes.len() {
            if self.used[t] || !self.candidate_ok(p, t) {
                continue;
            }
            self.mapping[p] = t;
            self.used[t] = true;
            let flow = self.extend(depth + 1);
            self.used[t] = false;
            self.mapping[p] = UNMAPPED;
            if flow.is_abort() {
                return Flow::Abort;
            }
        }
        Flow::Continue
    }

    fn candidate_ok(&self, p: NodeIndex, t: NodeIndex) -> bool {
        let pn = &self.pnodes[p];
        let tn = &self.tnodes[t];
        if !compatible(pn.label, tn.label, self.wildcard) || tn.degree < pn.degree {
            return false;
        }
        for &(q, ref plabels) in &pn.adj {
            let mt = if q == p {
                t
            } else {
                match self.mapping[q] {
                    UNMAPPED => continue,
                    m => m,
                }
            };
            let tlabels = match tn.adj.iter().find(|&&(to, _)| to == mt) {
                Some(&(_, ref labels)) => labels,
                None => return false,
            };
            if !edge_labels_compatible(plabels, tlabels, self.wildcard) {
                return false;
            }
        }
        true
    }

    fn deliver(&mut self) -> Flow {
        let m = Match::new(self.mapping.clone());
        if !self.pattern.is_valid_match(self.target, &m) {
            return Flow::Continue;
        }
        self.hits += 1;
        if self
            .reporter
            .report_hit(self.pattern, self.target, &m)
            .is_abort()
        {
            self.aborted = true;
            return Flow::Abort;
        }
        if self.hits >= self.max_hits {
            return Flow::Abort;
        }
        Flow::Continue
    }
}

/// The default matching engine: per-invocation label interning,
/// parallel-edge collapsing, greedy degree pruning and deterministic
/// backtracking with post-hoc constraint validation.
#[derive(Debug, Default)]
pub struct BacktrackMatcher;

impl BacktrackMatcher {
    pub fn new() -> Self {
        Self
    }
}

impl Matcher for BacktrackMatcher {
    fn find_matches(
        &self,
        pattern: &Pattern<'_>,
        target: &dyn GraphView,
        reporter: &mut dyn MatchReporter,
        max_hits: usize,
    ) -> (usize, Flow) {
        let pn = pattern.node_count();
        if max_hits == 0 || pn == 0 || pn > target.node_count() {
            return (0, Flow::Continue);
        }
        let mut interner = Interner::default();
        let wildcard = pattern.wildcard().map(|w| interner.intern(w));
        let pnodes = compile(pattern.graph(), &mut interner, true);
        let tnodes = compile(target, &mut interner, false);
        if !degrees_feasible(&pnodes, &tnodes) {
            debug!("degree pre-check failed, skipping the search");
            return (0, Flow::Continue);
        }
        let order = visit_order(&pnodes);
        let mut state = SearchState {
            pattern,
            target,
            pnodes: &pnodes,
            tnodes: &tnodes,
            order: &order,
            wildcard,
            mapping: vec![UNMAPPED; pn],
            used: vec![false; target.node_count()],
            reporter,
            max_hits,
            hits: 0,
            aborted: false,
        };
        state.extend(0);
        let flow = if state.aborted {
            Flow::Abort
        } else {
            Flow::Continue
        };
        (state.hits, flow)
    }
}
