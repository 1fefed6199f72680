//! Rendering of Kripke models to DOT (Graphviz).
//!
//! A [`Drawing`] is a plain snapshot of a model: world names, edges, the
//! highlighted evaluation points and an optional caption. It is produced by
//! [`Model::draw`](crate::model::Model::draw) and serialised with
//! [`Drawing::to_dot`]. Rendering the DOT text into an image is left to
//! Graphviz tools, e.g. `neato -Tpng model.dot -o model.png`.
//!
//! # Examples
//!
//! ```
//! use kripke_rs::dot::{DrawConfig, Drawing};
//! use kripke_rs::kripke::Kripke;
//!
//! let kripke = Kripke::builder()
//!     .props(["p"])
//!     .world("w1", ["p"])
//!     .world("w2", Vec::<String>::new())
//!     .edge("w1", "w2")
//!     .build()
//!     .unwrap();
//!
//! let drawing = Drawing::new(&kripke, "Modal Logic Model");
//! let dot = drawing.to_dot(&DrawConfig::default()).unwrap();
//! assert!(dot.contains("\"w1\" -> \"w2\";"));
//! ```

use std::fmt::Write as _;

use crate::kripke::Kripke;

/// Configuration options for DOT output generation.
///
/// ```
/// use kripke_rs::dot::DrawConfig;
///
/// let config = DrawConfig {
///     layout: "dot",
///     ..DrawConfig::default()
/// };
/// assert_eq!(config.current_shape, "square");
/// ```
#[derive(Debug, Clone)]
pub struct DrawConfig {
    /// Graphviz layout engine (default: "neato")
    pub layout: &'static str,
    /// Shape for ordinary worlds (default: "ellipse")
    pub world_shape: &'static str,
    /// Shape for the current world (default: "square")
    pub current_shape: &'static str,
    /// Colour for the current world (default: "green")
    pub current_color: &'static str,
    /// Colour for worlds occupied by agents (default: "red")
    pub position_color: &'static str,
    /// Font of the caption (default: "Sans")
    pub fontname: &'static str,
}

impl Default for DrawConfig {
    fn default() -> Self {
        Self {
            layout: "neato",
            world_shape: "ellipse",
            current_shape: "square",
            current_color: "green",
            position_color: "red",
            fontname: "Sans",
        }
    }
}

/// A model snapshot ready to be rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Drawing {
    pub title: String,
    pub worlds: Vec<String>,
    pub edges: Vec<(String, String)>,
    pub current: Option<String>,
    pub positions: Vec<String>,
    pub caption: Option<String>,
}

impl Drawing {
    /// Snapshot of all worlds and the edges of the base relation.
    pub fn new(kripke: &Kripke, title: impl Into<String>) -> Self {
        let worlds = kripke.worlds().map(|w| kripke.name(w).to_string()).collect();
        let edges = kripke
            .worlds()
            .flat_map(|w| {
                kripke
                    .successors(w)
                    .into_iter()
                    .map(move |next| (kripke.name(w).to_string(), kripke.name(next).to_string()))
            })
            .collect();
        Self {
            title: title.into(),
            worlds,
            edges,
            current: None,
            positions: Vec::new(),
            caption: None,
        }
    }

    pub fn with_current(mut self, world: impl Into<String>) -> Self {
        self.current = Some(world.into());
        self
    }

    pub fn with_positions<S: Into<String>>(mut self, positions: impl IntoIterator<Item = S>) -> Self {
        self.positions = positions.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }

    pub fn to_dot(&self, config: &DrawConfig) -> Result<String, std::fmt::Error> {
        let mut dot = String::new();
        writeln!(dot, "digraph {{")?;
        writeln!(dot, "// {}", self.title)?;
        writeln!(dot, "layout={};", config.layout)?;
        writeln!(dot, "node [shape={}];", config.world_shape)?;
        if let Some(caption) = &self.caption {
            writeln!(dot, "fontname=\"{}\";", escape(config.fontname))?;
            writeln!(dot, "label=\"\\n{}\";", escape(caption))?;
        }

        for world in &self.worlds {
            let mut attrs = Vec::new();
            let is_current = self.current.as_ref() == Some(world);
            if is_current {
                attrs.push(format!("shape={}", config.current_shape));
            }
            if self.positions.contains(world) {
                attrs.push(format!("color={}", config.position_color));
            } else if is_current {
                attrs.push(format!("color={}", config.current_color));
            }

            if attrs.is_empty() {
                writeln!(dot, "\"{}\";", escape(world))?;
            } else {
                writeln!(dot, "\"{}\" [{}];", escape(world), attrs.join(", "))?;
            }
        }

        for (from, to) in &self.edges {
            writeln!(dot, "\"{}\" -> \"{}\";", escape(from), escape(to))?;
        }

        writeln!(dot, "}}")?;
        Ok(dot)
    }
}

/// Escape a string for use inside a double-quoted DOT identifier.
fn escape(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kripke() -> Kripke {
        Kripke::builder()
            .props(["p", "q"])
            .world("w1", ["p"])
            .world("w2", ["q"])
            .world("w3", ["p", "q"])
            .edges("w1", ["w2", "w3"])
            .edge("w3", "w1")
            .build()
            .unwrap()
    }

    #[test]
    fn test_snapshot() {
        let drawing = Drawing::new(&kripke(), "Modal Logic Model");
        assert_eq!(drawing.worlds, ["w1", "w2", "w3"]);
        assert_eq!(
            drawing.edges,
            [
                ("w1".to_string(), "w2".to_string()),
                ("w1".to_string(), "w3".to_string()),
                ("w3".to_string(), "w1".to_string()),
            ]
        );
        assert_eq!(drawing.current, None);
        assert_eq!(drawing.caption, None);
    }

    #[test]
    fn test_to_dot() {
        let drawing = Drawing::new(&kripke(), "Modal Logic Model")
            .with_current("w1")
            .with_caption("M, w1 \u{22A8} <>(q)");
        let dot = drawing.to_dot(&DrawConfig::default()).unwrap();

        assert!(dot.starts_with("digraph {\n"));
        assert!(dot.ends_with("}\n"));
        assert!(dot.contains("layout=neato;"));
        assert!(dot.contains("\"w1\" [shape=square, color=green];"));
        assert!(dot.contains("\"w2\";"));
        assert!(dot.contains("\"w3\" -> \"w1\";"));
        assert!(dot.contains("label=\"\\nM, w1 \u{22A8} <>(q)\";"));
    }

    #[test]
    fn test_positions_and_escaping() {
        let drawing = Drawing::new(&kripke(), "LHS Logic Model")
            .with_current("w1")
            .with_positions(["w1", "w2"])
            .with_caption("M, w1, [w1, w2] \u{22AD} (p)\\/(q)");
        let config = DrawConfig {
            layout: "dot",
            ..DrawConfig::default()
        };
        let dot = drawing.to_dot(&config).unwrap();

        assert!(dot.contains("layout=dot;"));
        assert!(dot.contains("\"w1\" [shape=square, color=red];"));
        assert!(dot.contains("\"w2\" [color=red];"));
        assert!(dot.contains("(p)\\\\/(q)"));
    }
}
