//! Satisfaction checkers for the supported logics.
//!
//! All checkers share the same shape: a recursive `sat` over the formula tree
//! that descends once per node, so the call depth is the nesting depth of the
//! formula. Modalities iterate over neighbours and short-circuit on the first
//! witness (or counterexample). `check` first verifies that every connective
//! belongs to the logic and then calls `sat`.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::formula::{Connective, Formula};

pub mod modal;
pub mod sabotage;
pub mod travel;

pub use modal::ModalChecker;
pub use sabotage::{SabotageChecker, SabotageScope};
pub use travel::TravelChecker;

/// The logic a model is checked in.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Logic {
    Modal,
    /// Travel (hybrid) logic with agent positions, also called `lhs`.
    Travel,
    Sabotage,
}

impl Logic {
    pub fn accepts(self, connective: Connective) -> bool {
        match self {
            Logic::Modal => ModalChecker::accepts(connective),
            Logic::Travel => TravelChecker::accepts(connective),
            Logic::Sabotage => SabotageChecker::accepts(connective),
        }
    }

    /// Fail with `UnknownOperator` on the first connective outside this logic.
    pub fn validate(self, formula: &Formula) -> Result<()> {
        validate(formula, &|c| self.accepts(c))
    }
}

impl FromStr for Logic {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "modal" => Ok(Logic::Modal),
            "lhs" | "travel" => Ok(Logic::Travel),
            "sabotage" => Ok(Logic::Sabotage),
            _ => Err(Error::InvalidModel(format!("unknown logic `{}`", s))),
        }
    }
}

impl TryFrom<String> for Logic {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Logic> for String {
    fn from(logic: Logic) -> Self {
        logic.to_string()
    }
}

impl Display for Logic {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Logic::Modal => write!(f, "modal"),
            Logic::Travel => write!(f, "lhs"),
            Logic::Sabotage => write!(f, "sabotage"),
        }
    }
}

pub(crate) fn validate(formula: &Formula, accepts: &dyn Fn(Connective) -> bool) -> Result<()> {
    if let Some(connective) = Connective::of(formula) {
        if !accepts(connective?) {
            return Err(Error::UnknownOperator(formula.op().to_string()));
        }
    }
    match formula {
        Formula::Atom(_) => Ok(()),
        Formula::Unary { operand, .. } => validate(operand, accepts),
        Formula::Binary { left, right, .. } => {
            validate(left, accepts)?;
            validate(right, accepts)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logic_from_str() {
        assert_eq!("modal".parse::<Logic>().unwrap(), Logic::Modal);
        assert_eq!("LHS".parse::<Logic>().unwrap(), Logic::Travel);
        assert_eq!("Travel".parse::<Logic>().unwrap(), Logic::Travel);
        assert_eq!("SABOTAGE".parse::<Logic>().unwrap(), Logic::Sabotage);
        assert!(matches!("ctl".parse::<Logic>(), Err(Error::InvalidModel(_))));
    }

    #[test]
    fn test_validate() {
        let f: Formula = "(p)/\\(<.>([](q)))".parse().unwrap();
        assert!(Logic::Sabotage.validate(&f).is_ok());
        assert!(matches!(Logic::Modal.validate(&f), Err(Error::UnknownOperator(op)) if op == "<.>"));

        let g: Formula = "<S1>([left](I))".parse().unwrap();
        assert!(Logic::Travel.validate(&g).is_ok());
        assert!(matches!(Logic::Sabotage.validate(&g), Err(Error::UnknownOperator(op)) if op == "<S1>"));

        // Unknown connectives deep in a short-circuited branch are still reported.
        let h: Formula = "(p)\\/(#(q))".parse().unwrap();
        assert!(matches!(Logic::Modal.validate(&h), Err(Error::UnknownOperator(op)) if op == "#"));
    }
}
