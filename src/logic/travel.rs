//! Travel (hybrid) logic over a current world and a list of agent positions.
//!
//! A state is a pair `(s, t)`: `s` is the world of the observer and `t` the
//! positions of the traveling agents. The atom `I` holds when some agent
//! stands on `s`. Propositions declared as agent-local are read at `s`, all
//! others hold when they are true at any agent position.
//!
//! `<left>`/`<H>` move the observer along an edge; `<Si>` moves agent `i`
//! (1-based). The bracketed forms are the universal duals.

use std::collections::BTreeSet;

use log::debug;

use crate::error::{Error, Result};
use crate::formula::{Connective, Formula, HERE};
use crate::kripke::{Kripke, WorldId};

pub struct TravelChecker<'a> {
    kripke: &'a Kripke,
    agent_props: &'a BTreeSet<String>,
}

impl<'a> TravelChecker<'a> {
    pub fn new(kripke: &'a Kripke, agent_props: &'a BTreeSet<String>) -> Self {
        Self { kripke, agent_props }
    }

    pub fn accepts(connective: Connective) -> bool {
        matches!(
            connective,
            Connective::And
                | Connective::Or
                | Connective::Not
                | Connective::MovePossibly
                | Connective::MoveNecessarily
                | Connective::ShiftPossibly(_)
                | Connective::ShiftNecessarily(_)
        )
    }

    /// Validate connectives and agent indices, then evaluate.
    pub fn check(&self, current: WorldId, positions: &[WorldId], formula: &Formula) -> Result<bool> {
        super::validate(formula, &Self::accepts)?;
        check_indices(formula, positions.len())?;
        self.sat(current, positions, formula)
    }

    /// Whether `M, current, positions ⊨ formula`.
    pub fn sat(&self, current: WorldId, positions: &[WorldId], formula: &Formula) -> Result<bool> {
        debug!(
            "travel sat(current = {}, positions = {:?}, formula = {})",
            self.kripke.name(current),
            positions.iter().map(|&w| self.kripke.name(w)).collect::<Vec<_>>(),
            formula
        );

        match formula {
            Formula::Atom(p) => Ok(self.atom(current, positions, p)),
            Formula::Unary { op, operand } => match Connective::unary(op) {
                Some(Connective::Not) => Ok(!self.sat(current, positions, operand)?),
                Some(Connective::MovePossibly) => {
                    for next in self.kripke.successors(current) {
                        if self.sat(next, positions, operand)? {
                            return Ok(true);
                        }
                    }
                    Ok(false)
                }
                Some(Connective::MoveNecessarily) => {
                    for next in self.kripke.successors(current) {
                        if !self.sat(next, positions, operand)? {
                            return Ok(false);
                        }
                    }
                    Ok(true)
                }
                Some(Connective::ShiftPossibly(index)) => {
                    let agent = agent_slot(index, positions.len())?;
                    let mut moved = positions.to_vec();
                    for next in self.kripke.successors(positions[agent]) {
                        moved[agent] = next;
                        if self.sat(current, &moved, operand)? {
                            return Ok(true);
                        }
                    }
                    Ok(false)
                }
                Some(Connective::ShiftNecessarily(index)) => {
                    let agent = agent_slot(index, positions.len())?;
                    let mut moved = positions.to_vec();
                    for next in self.kripke.successors(positions[agent]) {
                        moved[agent] = next;
                        if !self.sat(current, &moved, operand)? {
                            return Ok(false);
                        }
                    }
                    Ok(true)
                }
                _ => Err(Error::UnknownOperator(op.clone())),
            },
            Formula::Binary { left, op, right } => match Connective::binary(op) {
                Some(Connective::And) => {
                    Ok(self.sat(current, positions, left)? && self.sat(current, positions, right)?)
                }
                Some(Connective::Or) => {
                    Ok(self.sat(current, positions, left)? || self.sat(current, positions, right)?)
                }
                _ => Err(Error::UnknownOperator(op.clone())),
            },
        }
    }

    fn atom(&self, current: WorldId, positions: &[WorldId], p: &str) -> bool {
        if p == HERE {
            positions.contains(&current)
        } else if self.agent_props.contains(p) {
            self.kripke.holds(current, p)
        } else {
            positions.iter().any(|&w| self.kripke.holds(w, p))
        }
    }
}

/// 0-based slot of the 1-based agent `index`.
fn agent_slot(index: usize, len: usize) -> Result<usize> {
    if index == 0 || index > len {
        return Err(Error::IndexOutOfRange { index, len });
    }
    Ok(index - 1)
}

fn check_indices(formula: &Formula, len: usize) -> Result<()> {
    if let Some(Ok(Connective::ShiftPossibly(index) | Connective::ShiftNecessarily(index))) = Connective::of(formula) {
        agent_slot(index, len)?;
    }
    match formula {
        Formula::Atom(_) => Ok(()),
        Formula::Unary { operand, .. } => check_indices(operand, len),
        Formula::Binary { left, right, .. } => {
            check_indices(left, len)?;
            check_indices(right, len)
        }
    }
}
