//! Basic modal logic: `~`, `/\`, `\/`, `<>` and `[]`.

use log::debug;

use crate::error::{Error, Result};
use crate::formula::{Connective, Formula};
use crate::kripke::{Kripke, WorldId};

pub struct ModalChecker<'a> {
    kripke: &'a Kripke,
}

impl<'a> ModalChecker<'a> {
    pub fn new(kripke: &'a Kripke) -> Self {
        Self { kripke }
    }

    pub fn accepts(connective: Connective) -> bool {
        matches!(
            connective,
            Connective::And | Connective::Or | Connective::Not | Connective::Possibly | Connective::Necessarily
        )
    }

    /// Validate `formula` against the modal grammar, then evaluate it at `world`.
    pub fn check(&self, world: WorldId, formula: &Formula) -> Result<bool> {
        super::validate(formula, &Self::accepts)?;
        self.sat(world, formula)
    }

    /// Whether `M, world ⊨ formula`.
    pub fn sat(&self, world: WorldId, formula: &Formula) -> Result<bool> {
        debug!("modal sat(world = {}, formula = {})", self.kripke.name(world), formula);

        match formula {
            Formula::Atom(p) => Ok(self.kripke.holds(world, p)),
            Formula::Unary { op, operand } => match Connective::unary(op) {
                Some(Connective::Not) => Ok(!self.sat(world, operand)?),
                Some(Connective::Possibly) => {
                    for next in self.kripke.successors(world) {
                        if self.sat(next, operand)? {
                            return Ok(true);
                        }
                    }
                    Ok(false)
                }
                Some(Connective::Necessarily) => {
                    for next in self.kripke.successors(world) {
                        if !self.sat(next, operand)? {
                            return Ok(false);
                        }
                    }
                    Ok(true)
                }
                _ => Err(Error::UnknownOperator(op.clone())),
            },
            Formula::Binary { left, op, right } => match Connective::binary(op) {
                Some(Connective::And) => Ok(self.sat(world, left)? && self.sat(world, right)?),
                Some(Connective::Or) => Ok(self.sat(world, left)? || self.sat(world, right)?),
                _ => Err(Error::UnknownOperator(op.clone())),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use test_log::test;

    fn model() -> Kripke {
        Kripke::builder()
            .props(["p", "q"])
            .world("w1", ["p"])
            .world("w2", ["q"])
            .world("w3", ["p", "q"])
            .edge("w1", "w2")
            .edge("w2", "w3")
            .edge("w3", "w3")
            .build()
            .unwrap()
    }

    fn check(kripke: &Kripke, world: &str, formula: &str) -> Result<bool> {
        let w = kripke.world(world)?;
        ModalChecker::new(kripke).check(w, &Formula::parse(formula)?)
    }

    #[test]
    fn test_atoms() {
        let kripke = model();
        assert!(check(&kripke, "w1", "p").unwrap());
        assert!(!check(&kripke, "w1", "q").unwrap());
        assert!(!check(&kripke, "w1", "unknown").unwrap());
    }

    #[test]
    fn test_boolean_connectives() {
        let kripke = model();
        assert!(check(&kripke, "w1", "(p)\\/(q)").unwrap());
        assert!(!check(&kripke, "w1", "(p)/\\(q)").unwrap());
        assert!(check(&kripke, "w1", "~(q)").unwrap());
        assert!(check(&kripke, "w3", "(p)/\\(q)").unwrap());
    }

    #[test]
    fn test_modalities() {
        let kripke = model();
        assert!(check(&kripke, "w1", "<>(q)").unwrap());
        assert!(!check(&kripke, "w1", "<>(p)").unwrap());
        assert!(check(&kripke, "w1", "[](q)").unwrap());
        assert!(check(&kripke, "w1", "<>(<>((p)/\\(q)))").unwrap());
        assert!(check(&kripke, "w3", "[]([]((p)/\\(q)))").unwrap());
    }

    #[test]
    fn test_dead_end() {
        let kripke = Kripke::builder()
            .props(["p"])
            .world("w1", ["p"])
            .edges("w1", Vec::<String>::new())
            .build()
            .unwrap();
        assert!(!check(&kripke, "w1", "<>(p)").unwrap());
        assert!(check(&kripke, "w1", "[](p)").unwrap());
        assert!(check(&kripke, "w1", "[](~(p))").unwrap());
    }

    #[test]
    fn test_unknown_operator() {
        let kripke = model();
        assert!(matches!(check(&kripke, "w1", "<.>(p)"), Err(Error::UnknownOperator(op)) if op == "<.>"));
        assert!(matches!(check(&kripke, "w1", "(p)->(q)"), Err(Error::UnknownOperator(op)) if op == "->"));
        assert!(matches!(check(&kripke, "w1", "(p)/\\(<H>(q))"), Err(Error::UnknownOperator(_))));

        let w1 = kripke.world("w1").unwrap();
        let f: Formula = "#(p)".parse().unwrap();
        assert!(matches!(ModalChecker::new(&kripke).sat(w1, &f), Err(Error::UnknownOperator(_))));
    }
}
