// Abstract syntax tree for the cognitive algebra
// Trees are built once by the parser and never mutated afterwards

use std::fmt;

use partiture_error::{Error, IntegrityError, Result, Span, Validate};
use partiture_types::{CognitiveFunction, ObjectiveFamily, RelationOperator, SymbolTable};
use serde::{Deserialize, Serialize};

/// Pre-order position of a node in its tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Leaf: a symbol tagged with its objective family
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Leaf {
    pub symbol: CognitiveFunction,
    pub family: ObjectiveFamily,
    /// Mass coefficient, becomes the term weight
    pub mass: f64,
}

/// Internal node: an operator over two operands
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Relation {
    pub operator: RelationOperator,
    pub left: Box<AlgebraNode>,
    pub right: Box<AlgebraNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum NodeKind {
    Leaf(Leaf),
    Relation(Relation),
}

/// A node of the algebra tree
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlgebraNode {
    pub id: NodeId,
    pub span: Span,
    /// Acceleration coefficient of the group this node was written as
    pub acceleration: f64,
    pub kind: NodeKind,
}

impl AlgebraNode {
    /// Create a leaf for a symbol, resolving its family from the symbol table
    pub fn leaf(symbol: CognitiveFunction, mass: f64, span: Span) -> Self {
        let entry = SymbolTable::global().entry(symbol);
        Self {
            id: NodeId(0),
            span,
            acceleration: 1.0,
            kind: NodeKind::Leaf(Leaf {
                symbol,
                family: entry.family,
                mass,
            }),
        }
    }

    /// Create a relation node spanning both operands
    pub fn relation(operator: RelationOperator, left: AlgebraNode, right: AlgebraNode) -> Self {
        Self {
            id: NodeId(0),
            span: left.span.join(right.span),
            acceleration: 1.0,
            kind: NodeKind::Relation(Relation {
                operator,
                left: Box::new(left),
                right: Box::new(right),
            }),
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf(_))
    }

    pub fn as_leaf(&self) -> Option<&Leaf> {
        match &self.kind {
            NodeKind::Leaf(leaf) => Some(leaf),
            NodeKind::Relation(_) => None,
        }
    }

    pub fn as_relation(&self) -> Option<&Relation> {
        match &self.kind {
            NodeKind::Relation(relation) => Some(relation),
            NodeKind::Leaf(_) => None,
        }
    }

    /// Number of nodes in this subtree
    pub fn size(&self) -> usize {
        match &self.kind {
            NodeKind::Leaf(_) => 1,
            NodeKind::Relation(relation) => 1 + relation.left.size() + relation.right.size(),
        }
    }

    /// Number of leaves in this subtree
    pub fn leaf_count(&self) -> usize {
        match &self.kind {
            NodeKind::Leaf(_) => 1,
            NodeKind::Relation(relation) => relation.left.leaf_count() + relation.right.leaf_count(),
        }
    }

    /// Height of this subtree; a leaf has height 0
    pub fn height(&self) -> usize {
        match &self.kind {
            NodeKind::Leaf(_) => 0,
            NodeKind::Relation(relation) => 1 + relation.left.height().max(relation.right.height()),
        }
    }

    /// Visit every node in pre-order together with its depth
    pub fn walk_preorder<'a>(&'a self, depth: usize, visit: &mut impl FnMut(&'a AlgebraNode, usize)) {
        visit(self, depth);
        if let NodeKind::Relation(relation) = &self.kind {
            relation.left.walk_preorder(depth + 1, visit);
            relation.right.walk_preorder(depth + 1, visit);
        }
    }

    fn renumber(&mut self, next: &mut usize) {
        self.id = NodeId(*next);
        *next += 1;
        if let NodeKind::Relation(relation) = &mut self.kind {
            relation.left.renumber(next);
            relation.right.renumber(next);
        }
    }

    fn fmt_operand(&self, f: &mut fmt::Formatter<'_>, nested: bool) -> fmt::Result {
        let accelerated = self.acceleration != 1.0;
        if accelerated {
            write!(f, "{}(", self.acceleration)?;
        }
        match &self.kind {
            NodeKind::Leaf(leaf) => {
                if leaf.mass != 1.0 {
                    write!(f, "{}", leaf.mass)?;
                }
                write!(f, "{}", leaf.symbol)?;
            }
            NodeKind::Relation(relation) => {
                let parens = nested && !accelerated;
                if parens {
                    write!(f, "(")?;
                }
                relation.left.fmt_operand(f, true)?;
                write!(f, " {} ", relation.operator)?;
                relation.right.fmt_operand(f, true)?;
                if parens {
                    write!(f, ")")?;
                }
            }
        }
        if accelerated {
            write!(f, ")")?;
        }
        Ok(())
    }
}

/// A complete, validated algebra expression
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlgebraTree {
    source: String,
    root: AlgebraNode,
}

impl AlgebraTree {
    /// Wrap a root node, assigning pre-order node ids
    pub fn new(source: impl Into<String>, mut root: AlgebraNode) -> Self {
        let mut next = 0;
        root.renumber(&mut next);
        Self {
            source: source.into(),
            root,
        }
    }

    /// The algebra text the tree was parsed from
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn root(&self) -> &AlgebraNode {
        &self.root
    }

    pub fn node_count(&self) -> usize {
        self.root.size()
    }

    /// Leaves in pre-order
    pub fn leaves(&self) -> Vec<&Leaf> {
        let mut leaves = Vec::new();
        self.root.walk_preorder(0, &mut |node, _| {
            if let Some(leaf) = node.as_leaf() {
                leaves.push(leaf);
            }
        });
        leaves
    }

    /// Relation nodes in pre-order
    pub fn relations(&self) -> Vec<&AlgebraNode> {
        let mut relations = Vec::new();
        self.root.walk_preorder(0, &mut |node, _| {
            if !node.is_leaf() {
                relations.push(node);
            }
        });
        relations
    }

    /// Look up a node by id
    pub fn node(&self, id: NodeId) -> Option<&AlgebraNode> {
        let mut found = None;
        self.root.walk_preorder(0, &mut |node, _| {
            if node.id == id {
                found = Some(node);
            }
        });
        found
    }
}

impl fmt::Display for AlgebraTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.root.fmt_operand(f, false)
    }
}

fn valid_coefficient(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

impl Validate for AlgebraTree {
    fn validate(&self) -> Result<()> {
        let mut outcome = Ok(());
        let mut expected = 0;

        self.root.walk_preorder(0, &mut |node, _| {
            if outcome.is_err() {
                return;
            }
            let index = node.id.0;
            if index != expected {
                outcome = Err(Error::CompileIntegrity(IntegrityError::UnassignedNode {
                    node: expected,
                }));
                return;
            }
            expected += 1;

            if !valid_coefficient(node.acceleration) {
                outcome = Err(Error::CompileIntegrity(IntegrityError::InvalidCoefficient {
                    node: index,
                    value: node.acceleration,
                }));
                return;
            }

            if let NodeKind::Leaf(leaf) = &node.kind {
                let known = SymbolTable::global().lookup(leaf.symbol.as_str());
                if known.map(|entry| entry.family) != Some(leaf.family) {
                    outcome = Err(Error::UnresolvedSymbol {
                        symbol: leaf.symbol.to_string(),
                        node: index,
                    });
                } else if !valid_coefficient(leaf.mass) {
                    outcome = Err(Error::CompileIntegrity(IntegrityError::InvalidCoefficient {
                        node: index,
                        value: leaf.mass,
                    }));
                }
            }
        });

        outcome
    }
}
