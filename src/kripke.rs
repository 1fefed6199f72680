//! Symbolic encoding of Kripke models.
//!
//! Each proposition gets a pair of BDD variables: a present copy describing
//! the source of an edge and a next copy describing its target. With the
//! propositions sorted by name, proposition `i` (0-based) uses variable
//! `2i + 1` for the present copy and `2i + 2` for the next copy.
//!
//! A world is identified by its valuation, so valuations must be pairwise
//! distinct. [`KripkeBuilder::build`] enforces that by adding fresh
//! single-letter propositions to colliding worlds.
//!
//! ```
//! use kripke_rs::kripke::Kripke;
//!
//! let kripke = Kripke::builder()
//!     .props(["p", "q"])
//!     .world("w1", ["p"])
//!     .world("w2", ["q"])
//!     .edge("w1", "w2")
//!     .build()
//!     .unwrap();
//!
//! let w1 = kripke.world("w1").unwrap();
//! let names: Vec<&str> = kripke.successors(w1).into_iter().map(|w| kripke.name(w)).collect();
//! assert_eq!(names, ["w2"]);
//! ```

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt::{self, Display, Formatter};

use log::{debug, info, warn};
use num_bigint::BigUint;

use crate::bdd::Bdd;
use crate::error::{Error, Result};
use crate::reference::Ref;
use crate::types::{Lit, Var};

/// Pool of fresh propositions used to separate worlds with equal valuations.
const FRESH_PROPS: &str = "abcdefghijklmnopqrstuvwxyz";

/// Handle to a world of a [`Kripke`] model.
///
/// Worlds are numbered in the lexicographic order of their names.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct WorldId(usize);

impl WorldId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl Display for WorldId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone)]
struct World {
    name: String,
    valuation: BTreeSet<String>,
    /// Truth value of every proposition, in proposition order.
    bits: Vec<bool>,
}

/// One edge of the base relation together with its BDD cube.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Edge {
    pub from: WorldId,
    pub to: WorldId,
    /// Conjunction of the source's present literals and the target's next literals.
    pub cube: Ref,
}

fn present_var(i: usize) -> Var {
    Var::new(2 * i as u32 + 1)
}

fn next_var(i: usize) -> Var {
    Var::new(2 * i as u32 + 2)
}

/// Collects the parts of a model and encodes them.
#[derive(Debug, Clone)]
pub struct KripkeBuilder {
    props: BTreeSet<String>,
    valuation: BTreeMap<String, BTreeSet<String>>,
    relation: BTreeMap<String, BTreeSet<String>>,
    storage_bits: usize,
}

impl Default for KripkeBuilder {
    fn default() -> Self {
        Self {
            props: BTreeSet::new(),
            valuation: BTreeMap::new(),
            relation: BTreeMap::new(),
            storage_bits: 16,
        }
    }
}

impl KripkeBuilder {
    /// Declare propositions.
    pub fn props<S: Into<String>>(mut self, props: impl IntoIterator<Item = S>) -> Self {
        self.props.extend(props.into_iter().map(Into::into));
        self
    }

    /// Declare a world with the propositions true in it.
    pub fn world<S: Into<String>>(mut self, name: impl Into<String>, props: impl IntoIterator<Item = S>) -> Self {
        self.valuation
            .entry(name.into())
            .or_default()
            .extend(props.into_iter().map(Into::into));
        self
    }

    pub fn edge(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.relation.entry(from.into()).or_default().insert(to.into());
        self
    }

    /// Declare all successors of `from` at once. An empty list is allowed.
    pub fn edges<S: Into<String>>(mut self, from: impl Into<String>, to: impl IntoIterator<Item = S>) -> Self {
        self.relation
            .entry(from.into())
            .or_default()
            .extend(to.into_iter().map(Into::into));
        self
    }

    /// Size of the node table, as a power of two.
    pub fn storage_bits(mut self, bits: usize) -> Self {
        self.storage_bits = bits;
        self
    }

    pub fn build(self) -> Result<Kripke> {
        let KripkeBuilder {
            mut props,
            mut valuation,
            relation,
            storage_bits,
        } = self;

        if storage_bits > 31 {
            return Err(Error::InvalidModel(format!(
                "storage bits must be at most 31, got {}",
                storage_bits
            )));
        }

        for (world, world_props) in &valuation {
            if let Some(p) = world_props.iter().find(|p| !props.contains(*p)) {
                return Err(Error::UnknownProposition {
                    world: world.clone(),
                    proposition: p.clone(),
                });
            }
        }

        for (from, targets) in &relation {
            for world in std::iter::once(from).chain(targets) {
                if !valuation.contains_key(world) {
                    return Err(Error::WorldNotFound(world.clone()));
                }
            }
        }

        disambiguate(&mut props, &mut valuation)?;

        Kripke::encode(Bdd::new(storage_bits), props, valuation, &relation)
    }
}

/// Make world valuations pairwise distinct.
///
/// While two worlds share a valuation, the lexicographically first world that
/// shares its valuation with another receives the first unused letter of the
/// fresh pool. Returns the `(world, proposition)` pairs that were added.
pub fn disambiguate(
    props: &mut BTreeSet<String>,
    valuation: &mut BTreeMap<String, BTreeSet<String>>,
) -> Result<Vec<(String, String)>> {
    let mut added = Vec::new();

    while let Some(world) = first_collision(valuation) {
        let fresh = FRESH_PROPS
            .chars()
            .map(String::from)
            .find(|p| !props.contains(p))
            .ok_or(Error::ValuationCollisionExhausted)?;
        warn!("World '{}' shares its valuation, adding fresh proposition '{}'", world, fresh);
        props.insert(fresh.clone());
        if let Some(world_props) = valuation.get_mut(&world) {
            world_props.insert(fresh.clone());
        }
        added.push((world, fresh));
    }

    Ok(added)
}

fn first_collision(valuation: &BTreeMap<String, BTreeSet<String>>) -> Option<String> {
    let mut counts: HashMap<&BTreeSet<String>, usize> = HashMap::new();
    for props in valuation.values() {
        *counts.entry(props).or_default() += 1;
    }
    valuation
        .iter()
        .find(|(_, props)| counts.get(props).is_some_and(|&n| n > 1))
        .map(|(world, _)| world.clone())
}

/// A Kripke model encoded into BDDs.
///
/// Owns its [`Bdd`] manager, so independent models never share state.
pub struct Kripke {
    bdd: Bdd,
    props: Vec<String>,
    worlds: Vec<World>,
    by_name: HashMap<String, WorldId>,
    by_bits: HashMap<Vec<bool>, WorldId>,
    world_expr: Ref,
    relation: Ref,
    edges: Vec<Edge>,
}

impl Kripke {
    pub fn builder() -> KripkeBuilder {
        KripkeBuilder::default()
    }

    /// Encode a model whose valuations are already validated and distinct.
    fn encode(
        bdd: Bdd,
        props: BTreeSet<String>,
        valuation: BTreeMap<String, BTreeSet<String>>,
        relation: &BTreeMap<String, BTreeSet<String>>,
    ) -> Result<Kripke> {
        let props: Vec<String> = props.into_iter().collect();

        let worlds: Vec<World> = valuation
            .into_iter()
            .map(|(name, valuation)| {
                let bits = props.iter().map(|p| valuation.contains(p)).collect();
                World { name, valuation, bits }
            })
            .collect();

        let mut by_name = HashMap::with_capacity(worlds.len());
        let mut by_bits = HashMap::with_capacity(worlds.len());
        for (i, world) in worlds.iter().enumerate() {
            by_name.insert(world.name.clone(), WorldId(i));
            by_bits.insert(world.bits.clone(), WorldId(i));
        }

        let cubes: Vec<Ref> = worlds.iter().map(|w| bdd.mk_cube(present_lits(&w.bits))).collect();
        let world_expr = bdd.apply_or_many(cubes);

        let mut edge_cubes = Vec::new();
        for (from, targets) in relation {
            let source = &worlds[by_name[from].0];
            for to in targets {
                let target = &worlds[by_name[to].0];
                let lits = present_lits(&source.bits).chain(next_lits(&target.bits));
                edge_cubes.push(bdd.mk_cube(lits));
            }
        }
        let relation = bdd.apply_or_many(edge_cubes);

        let mut kripke = Kripke {
            bdd,
            props,
            worlds,
            by_name,
            by_bits,
            world_expr,
            relation,
            edges: Vec::new(),
        };
        kripke.edges = kripke.enumerate_edges()?;

        info!(
            "Encoded {} worlds over {} propositions: {} edges, {} BDD nodes",
            kripke.worlds.len(),
            kripke.props.len(),
            kripke.edges.len(),
            kripke.bdd.num_nodes()
        );

        Ok(kripke)
    }

    /// Split the relation into one cube per edge.
    fn enumerate_edges(&self) -> Result<Vec<Edge>> {
        let vars: Vec<Var> = (0..self.props.len()).flat_map(|i| [present_var(i), next_var(i)]).collect();
        let models: Vec<Vec<Lit>> = self.bdd.models(self.relation, &vars).collect();

        let mut edges = Vec::with_capacity(models.len());
        for model in models {
            let from = self.lookup(&model, false)?;
            let to = self.lookup(&model, true)?;
            let cube = self.bdd.mk_cube(model);
            edges.push(Edge { from, to, cube });
        }
        edges.sort_by_key(|e| (e.from, e.to));
        Ok(edges)
    }

    fn lookup(&self, model: &[Lit], next: bool) -> Result<WorldId> {
        let bits = self.decode(model, next);
        self.by_bits
            .get(&bits)
            .copied()
            .ok_or_else(|| Error::InvalidModel(format!("assignment {:?} matches no world", bits)))
    }

    /// Read the present (or next) copy of a valuation out of an assignment.
    fn decode(&self, model: &[Lit], next: bool) -> Vec<bool> {
        let mut bits = vec![false; self.props.len()];
        for lit in model {
            let id = lit.var().id();
            if (id % 2 == 0) == next {
                bits[((id - 1) / 2) as usize] = lit.is_positive();
            }
        }
        bits
    }

    pub fn bdd(&self) -> &Bdd {
        &self.bdd
    }

    /// Propositions in variable order, fresh ones included.
    pub fn props(&self) -> &[String] {
        &self.props
    }

    pub fn num_worlds(&self) -> usize {
        self.worlds.len()
    }

    pub fn worlds(&self) -> impl Iterator<Item = WorldId> {
        (0..self.worlds.len()).map(WorldId)
    }

    pub fn world(&self, name: &str) -> Result<WorldId> {
        self.by_name
            .get(name)
            .copied()
            .ok_or_else(|| Error::WorldNotFound(name.to_string()))
    }

    pub fn name(&self, world: WorldId) -> &str {
        &self.worlds[world.0].name
    }

    pub fn valuation(&self, world: WorldId) -> &BTreeSet<String> {
        &self.worlds[world.0].valuation
    }

    pub fn holds(&self, world: WorldId, prop: &str) -> bool {
        self.worlds[world.0].valuation.contains(prop)
    }

    /// Disjunction of the present-copy cubes of all worlds.
    pub fn world_expr(&self) -> Ref {
        self.world_expr
    }

    /// The base accessibility relation over present and next variables.
    pub fn relation(&self) -> Ref {
        self.relation
    }

    /// Present-copy cube of a single world.
    pub fn world_cube(&self, world: WorldId) -> Ref {
        self.bdd.mk_cube(present_lits(&self.worlds[world.0].bits))
    }

    /// Edges of the base relation, sorted by source and then target.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Number of edges, counted on the relation BDD.
    pub fn edge_count(&self) -> BigUint {
        self.bdd.sat_count(self.relation, 2 * self.props.len())
    }

    /// Worlds reachable from `world` in one step under `relation`.
    ///
    /// `relation` is any relation over this model's variables, such as the
    /// base relation with some edges removed. The result is sorted.
    pub fn neighbours(&self, world: WorldId, relation: Ref) -> Vec<WorldId> {
        let values: HashMap<u32, bool> = self.worlds[world.0]
            .bits
            .iter()
            .enumerate()
            .map(|(i, &b)| (present_var(i).id(), b))
            .collect();
        let image = self.bdd.restrict_multi(relation, &values);

        let care: Vec<Var> = (0..self.props.len()).map(next_var).collect();
        let models: Vec<Vec<Lit>> = self.bdd.models(image, &care).collect();

        let mut result = Vec::with_capacity(models.len());
        for model in models {
            let bits = self.decode(&model, true);
            match self.by_bits.get(&bits) {
                Some(&w) => result.push(w),
                None => debug!("neighbours: assignment {:?} matches no world", bits),
            }
        }
        result.sort();
        result
    }

    /// Neighbours under the base relation.
    pub fn successors(&self, world: WorldId) -> Vec<WorldId> {
        self.neighbours(world, self.relation)
    }
}

fn present_lits(bits: &[bool]) -> impl Iterator<Item = Lit> + '_ {
    bits.iter().enumerate().map(|(i, &b)| Lit::new(present_var(i), b))
}

fn next_lits(bits: &[bool]) -> impl Iterator<Item = Lit> + '_ {
    bits.iter().enumerate().map(|(i, &b)| Lit::new(next_var(i), b))
}

impl Display for Kripke {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "props: {{{}}}", self.props.join(", "))?;
        for w in self.worlds() {
            let valuation: Vec<&str> = self.valuation(w).iter().map(String::as_str).collect();
            let successors: Vec<&str> = self.successors(w).into_iter().map(|s| self.name(s)).collect();
            writeln!(
                f,
                "{}: {{{}}} -> [{}]",
                self.name(w),
                valuation.join(", "),
                successors.join(", ")
            )?;
        }
        Ok(())
    }
}

impl fmt::Debug for Kripke {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Kripke")
            .field("props", &self.props)
            .field("worlds", &self.worlds.len())
            .field("edges", &self.edges.len())
            .field("nodes", &self.bdd.num_nodes())
            .finish()
    }
}
