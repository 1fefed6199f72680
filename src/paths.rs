//! Enumeration of satisfying assignments.
//!
//! [`Bdd::paths`] walks every path from a root to the `1` terminal. A path
//! only mentions the variables tested along it, so a single path can stand
//! for many assignments. [`Bdd::models`] expands those don't-care variables
//! over a caller-given care set and yields complete assignments, which is
//! what the neighbour resolver and the sabotage edge enumeration need.
//!
//! # Example
//!
//! ```
//! use kripke_rs::bdd::Bdd;
//! use kripke_rs::types::Var;
//!
//! let bdd = Bdd::default();
//! let f = bdd.mk_cube([1]);
//!
//! // A single path `x1`...
//! assert_eq!(bdd.paths(f).count(), 1);
//! // ...but two models over {x1, x2}.
//! assert_eq!(bdd.models(f, &[Var::new(1), Var::new(2)]).count(), 2);
//! ```

use crate::bdd::Bdd;
use crate::reference::Ref;
use crate::types::{Lit, Var};

impl Bdd {
    /// Returns an iterator over all satisfying paths (paths to TRUE) in the BDD.
    ///
    /// Literals in each path follow the variable order.
    pub fn paths(&self, f: Ref) -> BddPaths<'_> {
        BddPaths::new(self, f)
    }

    /// Returns an iterator over all satisfying assignments of `f` restricted
    /// to the `care` variables.
    ///
    /// Every care variable appears exactly once in each yielded assignment,
    /// and the literals are sorted by variable. Variables of `f` outside the
    /// care set are kept as they appear on the path.
    pub fn models(&self, f: Ref, care: &[Var]) -> BddModels<'_> {
        let mut care = care.to_vec();
        care.sort();
        care.dedup();
        BddModels {
            paths: self.paths(f),
            care,
            pending: None,
        }
    }
}

/// Iterator state for exploring a single node.
#[derive(Debug, Clone, Copy)]
enum Branch {
    High,
    Low,
}

#[derive(Debug)]
struct StackFrame {
    node: Ref,
    /// Which branch to explore next (None if both explored)
    next_branch: Option<Branch>,
}

/// An iterator over satisfying paths in a BDD.
///
/// Depth-first traversal with backtracking; the current path lives in a single
/// vector that grows and shrinks with the stack.
pub struct BddPaths<'a> {
    bdd: &'a Bdd,
    stack: Vec<StackFrame>,
    current_path: Vec<Lit>,
}

impl<'a> BddPaths<'a> {
    pub fn new(bdd: &'a Bdd, f: Ref) -> Self {
        BddPaths {
            bdd,
            stack: vec![StackFrame {
                node: f,
                next_branch: Some(Branch::High),
            }],
            current_path: Vec::new(),
        }
    }

    fn backtrack(&mut self) {
        self.stack.pop();
        // Pop the literal that led us here (unless we're at root)
        if !self.stack.is_empty() {
            self.current_path.pop();
        }
    }
}

impl Iterator for BddPaths<'_> {
    type Item = Vec<Lit>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let frame = self.stack.last_mut()?;
            let node = frame.node;
            let next_branch = frame.next_branch;

            if self.bdd.is_one(node) {
                let result = self.current_path.clone();
                self.backtrack();
                return Some(result);
            }

            if self.bdd.is_zero(node) {
                self.backtrack();
                continue;
            }

            let var = Var::new(self.bdd.variable(node.index()));

            match next_branch {
                Some(Branch::High) => {
                    frame.next_branch = Some(Branch::Low);
                    let high = self.bdd.high_node(node);
                    self.current_path.push(Lit::pos(var));
                    self.stack.push(StackFrame {
                        node: high,
                        next_branch: Some(Branch::High),
                    });
                }
                Some(Branch::Low) => {
                    frame.next_branch = None;
                    let low = self.bdd.low_node(node);
                    self.current_path.push(Lit::neg(var));
                    self.stack.push(StackFrame {
                        node: low,
                        next_branch: Some(Branch::High),
                    });
                }
                None => self.backtrack(),
            }
        }
    }
}

/// Expansion of one path over its free care variables.
struct Expansion {
    fixed: Vec<Lit>,
    free: Vec<Var>,
    /// Bitmask of the next assignment to the free variables.
    counter: u64,
}

impl Expansion {
    fn total(&self) -> u64 {
        1u64 << self.free.len()
    }
}

/// An iterator over complete assignments of a BDD on a care set.
///
/// Created by [`Bdd::models()`].
pub struct BddModels<'a> {
    paths: BddPaths<'a>,
    care: Vec<Var>,
    pending: Option<Expansion>,
}

impl Iterator for BddModels<'_> {
    type Item = Vec<Lit>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(exp) = &mut self.pending {
                if exp.counter < exp.total() {
                    let mut model = exp.fixed.clone();
                    for (bit, &var) in exp.free.iter().enumerate() {
                        model.push(Lit::new(var, exp.counter & (1 << bit) != 0));
                    }
                    exp.counter += 1;
                    model.sort();
                    return Some(model);
                }
                self.pending = None;
            }

            let path = self.paths.next()?;
            let free: Vec<Var> = self
                .care
                .iter()
                .copied()
                .filter(|v| !path.iter().any(|lit| lit.var() == *v))
                .collect();
            assert!(free.len() < 64, "Too many don't-care variables to expand");
            self.pending = Some(Expansion {
                fixed: path,
                free,
                counter: 0,
            });
        }
    }
}
