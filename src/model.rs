//! The user-facing model: a logic plus an encoded Kripke structure.

use std::collections::BTreeSet;
use std::path::Path;

use log::{debug, info};

use crate::config::CheckOptions;
use crate::dot::Drawing;
use crate::error::{Error, Result};
use crate::formula::Formula;
use crate::kripke::{Kripke, WorldId};
use crate::loader::ModelDescription;
use crate::logic::{Logic, ModalChecker, SabotageChecker, TravelChecker};

#[derive(Debug)]
pub struct Model {
    logic: Logic,
    kripke: Kripke,
    agent_props: BTreeSet<String>,
    travelers: usize,
    options: CheckOptions,
}

impl Model {
    pub fn new(description: ModelDescription, options: CheckOptions) -> Result<Model> {
        let travelers = description.travelers()?;
        let kripke = description.builder().storage_bits(options.storage_bits).build()?;
        let agent_props = description.agent_props.iter().cloned().collect();

        info!("Built {} model with {} worlds", description.logic, kripke.num_worlds());

        Ok(Model {
            logic: description.logic,
            kripke,
            agent_props,
            travelers,
            options,
        })
    }

    pub fn from_path(path: impl AsRef<Path>, options: CheckOptions) -> Result<Model> {
        Model::new(ModelDescription::from_path(path)?, options)
    }

    pub fn logic(&self) -> Logic {
        self.logic
    }

    pub fn kripke(&self) -> &Kripke {
        &self.kripke
    }

    pub fn options(&self) -> &CheckOptions {
        &self.options
    }

    /// Number of agents whose positions a travel formula is evaluated over.
    pub fn travelers(&self) -> usize {
        self.travelers
    }

    /// Parse `formula` and evaluate it.
    ///
    /// `worlds[0]` is the evaluation world. For travel models the remaining
    /// worlds are the agent positions, padded with the evaluation world up to
    /// the number of travelers; other logics ignore them.
    pub fn check<S: AsRef<str>>(&self, formula: &str, worlds: &[S]) -> Result<bool> {
        self.check_formula(&Formula::parse(formula)?, worlds)
    }

    pub fn check_formula<S: AsRef<str>>(&self, formula: &Formula, worlds: &[S]) -> Result<bool> {
        let (current, positions) = self.points(worlds)?;
        debug!("Checking {} at {}", formula, self.kripke.name(current));

        match self.logic {
            Logic::Modal => ModalChecker::new(&self.kripke).check(current, formula),
            Logic::Sabotage => SabotageChecker::new(&self.kripke, self.options.sabotage_scope).check(current, formula),
            Logic::Travel => TravelChecker::new(&self.kripke, &self.agent_props).check(current, &positions, formula),
        }
    }

    /// Check `formula` and describe the result as a drawing of the model.
    pub fn draw<S: AsRef<str>>(&self, formula: &str, worlds: &[S]) -> Result<Drawing> {
        let formula = Formula::parse(formula)?;
        let verdict = self.check_formula(&formula, worlds)?;
        let (current, positions) = self.points(worlds)?;
        let name = self.kripke.name(current);
        let turnstile = if verdict { "\u{22A8}" } else { "\u{22AD}" };

        let drawing = self.draw_structure().with_current(name);
        let drawing = match self.logic {
            Logic::Travel => {
                let positions: Vec<&str> = positions.iter().map(|&w| self.kripke.name(w)).collect();
                drawing
                    .with_caption(format!(
                        "M, {}, [{}] {} {}",
                        name,
                        positions.join(", "),
                        turnstile,
                        formula.pretty()
                    ))
                    .with_positions(positions)
            }
            Logic::Modal | Logic::Sabotage => drawing.with_caption(format!("M, {} {} {}", name, turnstile, formula)),
        };
        Ok(drawing)
    }

    /// Drawing of the model alone, without evaluation points.
    pub fn draw_structure(&self) -> Drawing {
        let title = match self.logic {
            Logic::Modal => "Modal Logic Model",
            Logic::Travel => "LHS Logic Model",
            Logic::Sabotage => "Sabotage Logic Model",
        };
        Drawing::new(&self.kripke, title)
    }

    /// Names of the worlds reachable from `world` in one step.
    pub fn successors(&self, world: &str) -> Result<Vec<&str>> {
        let w = self.kripke.world(world)?;
        Ok(self
            .kripke
            .successors(w)
            .into_iter()
            .map(|next| self.kripke.name(next))
            .collect())
    }

    /// Resolve the evaluation world and the padded agent positions.
    fn points<S: AsRef<str>>(&self, worlds: &[S]) -> Result<(WorldId, Vec<WorldId>)> {
        let (first, rest) = worlds.split_first().ok_or(Error::MissingWorlds)?;
        let current = self.kripke.world(first.as_ref())?;
        let mut positions = rest
            .iter()
            .map(|w| self.kripke.world(w.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        if positions.len() < self.travelers {
            positions.resize(self.travelers, current);
        }
        Ok((current, positions))
    }
}
