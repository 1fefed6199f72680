//! Sabotage modal logic.
//!
//! On top of the modal connectives, `<.>(X)` holds when removing some edge
//! of the model makes `X` true at the same world, and `[.](X)` when removing
//! any single edge does. Removal never touches the [`Kripke`] model: the
//! current relation is threaded through the recursion as a BDD, and every
//! removal conjoins it with the negated cube of one base edge.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::formula::{Connective, Formula};
use crate::kripke::{Kripke, WorldId};
use crate::reference::Ref;

/// Relation seen by `<>` and `[]` inside sabotage formulas.
///
/// Both modalities read the same relation under either scope, so `[](X)`
/// and `~(<>(~(X)))` always agree.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SabotageScope {
    /// The relation with all edges removed so far.
    #[default]
    Current,
    /// Always the unmodified relation of the model.
    Base,
}

impl FromStr for SabotageScope {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "current" => Ok(SabotageScope::Current),
            "base" => Ok(SabotageScope::Base),
            _ => Err(Error::InvalidModel(format!("unknown sabotage scope `{}`", s))),
        }
    }
}

impl Display for SabotageScope {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            SabotageScope::Current => write!(f, "current"),
            SabotageScope::Base => write!(f, "base"),
        }
    }
}

pub struct SabotageChecker<'a> {
    kripke: &'a Kripke,
    scope: SabotageScope,
}

impl<'a> SabotageChecker<'a> {
    pub fn new(kripke: &'a Kripke, scope: SabotageScope) -> Self {
        Self { kripke, scope }
    }

    pub fn accepts(connective: Connective) -> bool {
        matches!(
            connective,
            Connective::And
                | Connective::Or
                | Connective::Not
                | Connective::Possibly
                | Connective::Necessarily
                | Connective::SomeSabotage
                | Connective::EverySabotage
        )
    }

    pub fn check(&self, world: WorldId, formula: &Formula) -> Result<bool> {
        super::validate(formula, &Self::accepts)?;
        self.sat(world, formula)
    }

    /// Evaluate under the base relation of the model.
    pub fn sat(&self, world: WorldId, formula: &Formula) -> Result<bool> {
        self.sat_under(world, formula, self.kripke.relation())
    }

    /// Evaluate under an explicit `relation`, usually the base relation with
    /// some edges removed.
    pub fn sat_under(&self, world: WorldId, formula: &Formula, relation: Ref) -> Result<bool> {
        debug!(
            "sabotage sat(world = {}, formula = {}, relation = {})",
            self.kripke.name(world),
            formula,
            relation
        );

        match formula {
            Formula::Atom(p) => Ok(self.kripke.holds(world, p)),
            Formula::Unary { op, operand } => match Connective::unary(op) {
                Some(Connective::Not) => Ok(!self.sat_under(world, operand, relation)?),
                Some(Connective::Possibly) => {
                    for next in self.kripke.neighbours(world, self.step_relation(relation)) {
                        if self.sat_under(next, operand, relation)? {
                            return Ok(true);
                        }
                    }
                    Ok(false)
                }
                Some(Connective::Necessarily) => {
                    for next in self.kripke.neighbours(world, self.step_relation(relation)) {
                        if !self.sat_under(next, operand, relation)? {
                            return Ok(false);
                        }
                    }
                    Ok(true)
                }
                Some(Connective::SomeSabotage) => {
                    for reduced in self.removals(relation) {
                        if self.sat_under(world, operand, reduced)? {
                            return Ok(true);
                        }
                    }
                    Ok(false)
                }
                Some(Connective::EverySabotage) => {
                    for reduced in self.removals(relation) {
                        if !self.sat_under(world, operand, reduced)? {
                            return Ok(false);
                        }
                    }
                    Ok(true)
                }
                _ => Err(Error::UnknownOperator(op.clone())),
            },
            Formula::Binary { left, op, right } => match Connective::binary(op) {
                Some(Connective::And) => {
                    Ok(self.sat_under(world, left, relation)? && self.sat_under(world, right, relation)?)
                }
                Some(Connective::Or) => {
                    Ok(self.sat_under(world, left, relation)? || self.sat_under(world, right, relation)?)
                }
                _ => Err(Error::UnknownOperator(op.clone())),
            },
        }
    }

    fn step_relation(&self, relation: Ref) -> Ref {
        match self.scope {
            SabotageScope::Current => relation,
            SabotageScope::Base => self.kripke.relation(),
        }
    }

    /// `relation` with one base edge removed, for each base edge in turn.
    ///
    /// Edges already missing from `relation` are still enumerated; removing
    /// them again leaves `relation` unchanged.
    fn removals(&self, relation: Ref) -> impl Iterator<Item = Ref> + '_ {
        let bdd = self.kripke.bdd();
        self.kripke.edges().iter().map(move |edge| {
            debug!(
                "sabotage: removing {} -> {}",
                self.kripke.name(edge.from),
                self.kripke.name(edge.to)
            );
            bdd.apply_and(relation, -edge.cube)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use test_log::test;

    /// w1 -> w2, w1 -> w3, with r true only at w3.
    fn model() -> Kripke {
        Kripke::builder()
            .props(["p", "r"])
            .world("w1", ["p"])
            .world("w2", Vec::<String>::new())
            .world("w3", ["r"])
            .edges("w1", ["w2", "w3"])
            .build()
            .unwrap()
    }

    fn check(kripke: &Kripke, scope: SabotageScope, world: &str, formula: &str) -> bool {
        let w = kripke.world(world).unwrap();
        let f = Formula::parse(formula).unwrap();
        SabotageChecker::new(kripke, scope).check(w, &f).unwrap()
    }

    #[test]
    fn test_scope_from_str() {
        assert_eq!("current".parse::<SabotageScope>().unwrap(), SabotageScope::Current);
        assert_eq!("Base".parse::<SabotageScope>().unwrap(), SabotageScope::Base);
        assert!("nope".parse::<SabotageScope>().is_err());
        assert_eq!(SabotageScope::default(), SabotageScope::Current);
    }

    #[test]
    fn test_modal_part() {
        let kripke = model();
        assert!(check(&kripke, SabotageScope::Current, "w1", "<>(r)"));
        assert!(!check(&kripke, SabotageScope::Current, "w1", "[](r)"));
    }

    #[test]
    fn test_remove_edge_then_box() {
        let kripke = model();
        assert!(check(&kripke, SabotageScope::Current, "w1", "<.>([](r))"));
        assert!(!check(&kripke, SabotageScope::Current, "w1", "[.]([](r))"));
        assert!(check(&kripke, SabotageScope::Current, "w1", "[.](<>(~(p)))"));
    }

    #[test]
    fn test_base_scope_ignores_removals() {
        let kripke = model();
        assert!(!check(&kripke, SabotageScope::Base, "w1", "<.>([](r))"));
        assert!(check(&kripke, SabotageScope::Base, "w1", "[.](<>(r))"));
    }

    #[test]
    fn test_box_and_diamond_share_relation() {
        let kripke = model();
        for scope in [SabotageScope::Current, SabotageScope::Base] {
            for (boxed, diamond) in [
                ("<.>([](r))", "<.>(~(<>(~(r))))"),
                ("[.]([](~(p)))", "[.](~(<>(p)))"),
                ("<.>(<.>([](r)))", "<.>(<.>(~(<>(~(r)))))"),
            ] {
                assert_eq!(
                    check(&kripke, scope, "w1", boxed),
                    check(&kripke, scope, "w1", diamond),
                    "{} vs {} under {}",
                    boxed,
                    diamond,
                    scope
                );
            }
        }
    }

    #[test]
    fn test_two_removals() {
        let kripke = model();
        assert!(check(&kripke, SabotageScope::Current, "w1", "<.>(<.>([](~(p))))"));
        assert!(check(&kripke, SabotageScope::Current, "w1", "<.>(<.>(~(<>(r))))"));
        assert!(check(&kripke, SabotageScope::Current, "w1", "<.>(~(<>(r)))"));
        assert!(!check(&kripke, SabotageScope::Current, "w1", "<.>(~(<>(~(p))))"));
    }

    #[test]
    fn test_no_edges() {
        let kripke = Kripke::builder().props(["p"]).world("w1", ["p"]).build().unwrap();
        assert!(!check(&kripke, SabotageScope::Current, "w1", "<.>(p)"));
        assert!(check(&kripke, SabotageScope::Current, "w1", "[.](~(p))"));
    }

    #[test]
    fn test_model_untouched() {
        let kripke = model();
        let relation = kripke.relation();
        check(&kripke, SabotageScope::Current, "w1", "[.]([.]([](r)))");
        assert_eq!(kripke.relation(), relation);
        assert_eq!(kripke.edges().len(), 2);
    }

    #[test]
    fn test_unknown_operator() {
        let kripke = model();
        let w1 = kripke.world("w1").unwrap();
        let f = Formula::parse("<S1>(r)").unwrap();
        let checker = SabotageChecker::new(&kripke, SabotageScope::Current);
        assert!(matches!(checker.check(w1, &f), Err(Error::UnknownOperator(op)) if op == "<S1>"));
    }
}
