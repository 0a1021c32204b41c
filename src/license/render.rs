//! Rendering of license trees into display expressions.
//!
//! The absorb/poison rules for `Mapping Pending` live in [`reduce`], which is
//! generic over a [`Reducer`] so that risk classification and policy
//! evaluation fold the tree with exactly the same pruning as the display
//! string.
//!
//! - A leaf named `Mapping Pending` is unresolved; an empty name contributes nothing.
//! - Inside an `AND` group an unresolved leaf poisons the group and every
//!   ancestor: the whole tree renders as `UNKNOWN`.
//! - Inside an `OR` group unresolved and empty operands are dropped.
//! - A group with a single survivor degenerates to that survivor; a group
//!   with none contributes nothing to its parent.

use tracing::{debug, trace};

use super::definition::{LicenseInfo, LicenseKind, LicenseNode, MAPPING_PENDING};

/// Display value used when no definite expression can be shown.
pub const UNKNOWN: &str = "UNKNOWN";

/// Raised when an `AND` group contains an unresolved license; aborts the whole reduction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Unrenderable;

/// Result of reducing one subtree.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand<T> {
    /// A `Mapping Pending` leaf.
    Pending,
    /// A leaf with an empty name, or a group whose operands were all dropped.
    Empty,
    Resolved(T),
}

/// Folds the resolved parts of a license tree into a value.
pub trait Reducer {
    type Output;

    /// Value for a leaf that is neither pending nor empty.
    fn leaf(&self, info: &LicenseInfo) -> Self::Output;

    /// Combine two or more surviving operands, in tree order.
    fn combine(&self, kind: LicenseKind, operands: Vec<Self::Output>) -> Self::Output;
}

/// Reduce `node` bottom-up with `reducer`.
///
/// Children are visited in order and the first [`Unrenderable`] stops the
/// walk; later siblings are not visited.
pub fn reduce<R: Reducer>(node: &LicenseNode, reducer: &R) -> Result<Operand<R::Output>, Unrenderable> {
    let group = match node {
        LicenseNode::Leaf(info) if info.is_mapping_pending() => return Ok(Operand::Pending),
        LicenseNode::Leaf(info) if info.name.is_empty() => return Ok(Operand::Empty),
        LicenseNode::Leaf(info) => return Ok(Operand::Resolved(reducer.leaf(info))),
        LicenseNode::Group(group) => group,
    };

    let mut operands = Vec::with_capacity(group.children().len());
    for child in group.children() {
        operands.push(reduce(child, reducer)?);
    }

    if group.kind() == LicenseKind::Conjunctive
        && operands.iter().any(|op| matches!(op, Operand::Pending))
    {
        debug!(group = %group.info().name, "unresolved license inside AND group");
        return Err(Unrenderable);
    }

    let mut survivors: Vec<R::Output> = operands
        .into_iter()
        .filter_map(|op| match op {
            Operand::Resolved(value) => Some(value),
            Operand::Pending | Operand::Empty => None,
        })
        .collect();

    trace!(
        group = %group.info().name,
        kind = ?group.kind(),
        survivors = survivors.len(),
        "reduced license group"
    );

    match survivors.len() {
        0 => Ok(Operand::Empty),
        1 => Ok(Operand::Resolved(survivors.remove(0))),
        _ => Ok(Operand::Resolved(reducer.combine(group.kind(), survivors))),
    }
}

/// Builds the display string: leaf names joined by the group operator, parenthesized.
struct DisplayReducer;

impl Reducer for DisplayReducer {
    type Output = String;

    fn leaf(&self, info: &LicenseInfo) -> String {
        info.name.clone()
    }

    fn combine(&self, kind: LicenseKind, operands: Vec<String>) -> String {
        format!("({})", operands.join(kind.separator()))
    }
}

/// Render a subtree without applying the top-level `UNKNOWN` substitution.
///
/// A pending leaf renders as `Mapping Pending` and a fully dropped group as `""`.
pub fn render_inner(node: &LicenseNode) -> Result<String, Unrenderable> {
    Ok(match reduce(node, &DisplayReducer)? {
        Operand::Pending => MAPPING_PENDING.to_string(),
        Operand::Empty => String::new(),
        Operand::Resolved(display) => display,
    })
}

/// Render a license tree into a display expression such as `(MIT OR Apache-2.0)`.
///
/// Never fails: trees that cannot be shown render as [`UNKNOWN`].
pub fn render(node: &LicenseNode) -> String {
    match render_inner(node) {
        Ok(display) if display.is_empty() || display == MAPPING_PENDING => UNKNOWN.to_string(),
        Ok(display) => display,
        Err(Unrenderable) => UNKNOWN.to_string(),
    }
}
