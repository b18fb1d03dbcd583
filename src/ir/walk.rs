//! Dependency-first traversal of the rule graph.
//!
//! The walk uses an explicit stack of frames over rule handles rather than
//! recursion, so deep dependency chains cannot exhaust the call stack.

use crate::ast::Makefile;

use super::PlanError;

/// Tracks the visitation state of a rule during traversal.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum VisitState {
    Visiting,
    Visited,
}

/// A rule on the traversal stack and the index of its next dependency.
#[derive(Debug)]
struct Frame {
    handle: usize,
    next_dep: usize,
}

struct Walker<'a> {
    makefile: &'a Makefile,
    states: Vec<Option<VisitState>>,
    stack: Vec<Frame>,
    order: Vec<usize>,
}

impl<'a> Walker<'a> {
    fn new(makefile: &'a Makefile) -> Self {
        Self {
            makefile,
            states: vec![None; makefile.rules.len()],
            stack: Vec::new(),
            order: Vec::new(),
        }
    }

    fn state(&self, handle: usize) -> Option<VisitState> {
        self.states.get(handle).copied().flatten()
    }

    fn mark(&mut self, handle: usize, state: VisitState) {
        if let Some(slot) = self.states.get_mut(handle) {
            *slot = Some(state);
        }
    }

    fn enter(&mut self, handle: usize) {
        self.mark(handle, VisitState::Visiting);
        self.stack.push(Frame {
            handle,
            next_dep: 0,
        });
    }

    fn run(mut self, root: usize) -> Result<Vec<usize>, PlanError> {
        let makefile = self.makefile;
        self.enter(root);

        while let Some(frame) = self.stack.last_mut() {
            let handle = frame.handle;
            let next = makefile
                .rule_at(handle)
                .and_then(|rule| rule.dependencies.get(frame.next_dep));
            frame.next_dep += 1;

            let Some(dep) = next else {
                self.stack.pop();
                self.mark(handle, VisitState::Visited);
                self.order.push(handle);
                continue;
            };
            // Names without a rule are sources or parameters: leaves.
            let Some(child) = makefile.handle(dep) else {
                continue;
            };
            match self.state(child) {
                Some(VisitState::Visited) => {}
                Some(VisitState::Visiting) => {
                    let cycle = self
                        .cycle_through(child)
                        .unwrap_or_else(|| vec![dep.clone(), dep.clone()]);
                    return Err(PlanError::CycleDetected { cycle });
                }
                None => self.enter(child),
            }
        }
        Ok(self.order)
    }

    /// Targets from `handle`'s frame to the top of the stack, closed by
    /// `handle` again, or `None` when `handle` is not on the stack.
    fn cycle_through(&self, handle: usize) -> Option<Vec<String>> {
        let start = self
            .stack
            .iter()
            .position(|frame| frame.handle == handle)?;
        let cycle = self
            .stack
            .iter()
            .skip(start)
            .map(|frame| frame.handle)
            .chain(std::iter::once(handle))
            .filter_map(|h| self.makefile.rule_at(h))
            .map(|rule| rule.target.clone())
            .collect();
        Some(canonicalize_cycle(cycle))
    }
}

/// Handles of `root` and every rule it transitively depends on, each once,
/// dependencies before dependents.
///
/// Dependencies are visited in declaration order, so the result is
/// deterministic for a given rule graph.
///
/// # Errors
///
/// Returns [`PlanError::CycleDetected`] when a rule depends on itself.
pub(crate) fn post_order(makefile: &Makefile, root: usize) -> Result<Vec<usize>, PlanError> {
    Walker::new(makefile).run(root)
}

/// Rotate a closed cycle so it starts at its smallest target.
fn canonicalize_cycle(mut cycle: Vec<String>) -> Vec<String> {
    if cycle.len() < 2 {
        return cycle;
    }
    let len = cycle.len() - 1;
    let start = cycle
        .iter()
        .take(len)
        .enumerate()
        .min_by(|(_, a), (_, b)| a.cmp(b))
        .map_or(0, |(idx, _)| idx);
    let (prefix, suffix) = cycle.split_at_mut(len);
    prefix.rotate_left(start);
    if let (Some(first), Some(slot)) = (prefix.first().cloned(), suffix.first_mut()) {
        slot.clone_from(&first);
    }
    cycle
}
