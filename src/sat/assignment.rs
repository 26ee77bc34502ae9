#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Variable states and the dense assignment vector.
//!
//! Every variable carries a tri-valued state: unassigned, or assigned a
//! truth value. The assignment vector is written exclusively through the
//! trail (push on assign, pop on backtrack), so replaying the trail from an
//! empty vector always reproduces the current state. Reads are `O(1)`.

use crate::sat::literal::{Literal, Variable};

/// The assignment state of a propositional variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum VarState {
    /// The variable has not been assigned a truth value.
    #[default]
    Unassigned,
    /// The variable has been assigned the contained truth value.
    Assigned(bool),
}

impl VarState {
    #[must_use]
    pub const fn is_assigned(self) -> bool {
        matches!(self, Self::Assigned(_))
    }

    #[must_use]
    pub const fn is_unassigned(self) -> bool {
        !self.is_assigned()
    }
}

impl From<VarState> for Option<bool> {
    fn from(s: VarState) -> Self {
        match s {
            VarState::Assigned(b) => Some(b),
            VarState::Unassigned => None,
        }
    }
}

/// Dense assignment vector indexed by variable, `1..=num_vars`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VecAssignment {
    states: Vec<VarState>,
}

impl VecAssignment {
    /// Creates an all-unassigned vector for variables `1..=num_vars`.
    #[must_use]
    pub fn new(num_vars: usize) -> Self {
        Self {
            states: vec![VarState::Unassigned; num_vars + 1],
        }
    }

    #[must_use]
    pub fn num_vars(&self) -> usize {
        self.states.len().saturating_sub(1)
    }

    /// Makes `lit` true by assigning its variable the literal's polarity.
    pub fn assign(&mut self, lit: impl Literal) {
        self.states[lit.variable() as usize] = VarState::Assigned(lit.polarity());
    }

    pub fn unassign(&mut self, var: Variable) {
        self.states[var as usize] = VarState::Unassigned;
    }

    #[must_use]
    pub fn state_of(&self, var: Variable) -> VarState {
        self.states[var as usize]
    }

    #[must_use]
    pub fn var_value(&self, var: Variable) -> Option<bool> {
        self.state_of(var).into()
    }

    /// Truth value of a literal under the current partial assignment:
    /// `Some(true)` satisfied, `Some(false)` falsified, `None` free.
    #[must_use]
    pub fn literal_value(&self, lit: impl Literal) -> Option<bool> {
        self.var_value(lit.variable()).map(|b| b == lit.polarity())
    }

    #[must_use]
    pub fn is_assigned(&self, var: Variable) -> bool {
        self.state_of(var).is_assigned()
    }

    /// Extracts a total witness. Unassigned variables did not matter to any
    /// clause on the accepting path and default to TRUE.
    #[must_use]
    pub fn model(&self) -> Model {
        Model(
            (1..=self.num_vars())
                .map(|v| {
                    #[allow(clippy::cast_possible_wrap, clippy::cast_possible_truncation)]
                    let var = v as i32;
                    match self.states[v] {
                        VarState::Assigned(false) => -var,
                        _ => var,
                    }
                })
                .collect(),
        )
    }
}

/// A total assignment over variables `1..=N`, stored as signed DIMACS
/// literals: entry `i` is `+(i+1)` when variable `i+1` is TRUE, negative
/// otherwise. This is the witness published on SAT and the payload of the
/// `v` line in a result file.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Model(Vec<i32>);

impl Model {
    /// Builds a model from signed literals, one per variable in order.
    #[must_use]
    pub fn new(literals: Vec<i32>) -> Self {
        Self(literals)
    }

    /// Builds a model from truth values for variables `1..=values.len()`.
    #[must_use]
    pub fn from_values(values: &[bool]) -> Self {
        Self(
            values
                .iter()
                .enumerate()
                .map(|(i, &b)| {
                    #[allow(clippy::cast_possible_wrap, clippy::cast_possible_truncation)]
                    let var = (i + 1) as i32;
                    if b {
                        var
                    } else {
                        -var
                    }
                })
                .collect(),
        )
    }

    #[must_use]
    pub fn num_vars(&self) -> usize {
        self.0.len()
    }

    /// Truth value of `var`. Variables beyond the model default to TRUE.
    #[must_use]
    pub fn value(&self, var: Variable) -> bool {
        self.0
            .get(var as usize - 1)
            .map_or(true, |&lit| lit.is_positive())
    }

    /// `true` if the given literal evaluates to true under this model.
    #[must_use]
    pub fn satisfies(&self, lit: impl Literal) -> bool {
        self.value(lit.variable()) == lit.polarity()
    }

    /// The signed literals, one per variable in ascending order.
    #[must_use]
    pub fn literals(&self) -> &[i32] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sat::literal::PackedLiteral;

    fn lit(v: i32) -> PackedLiteral {
        PackedLiteral::from_i32(v)
    }

    #[test]
    fn test_assign_query_unassign() {
        let mut a = VecAssignment::new(3);
        assert!(a.state_of(1).is_unassigned());

        a.assign(lit(1));
        a.assign(lit(-2));

        assert_eq!(a.var_value(1), Some(true));
        assert_eq!(a.var_value(2), Some(false));
        assert_eq!(a.var_value(3), None);

        assert_eq!(a.literal_value(lit(1)), Some(true));
        assert_eq!(a.literal_value(lit(-1)), Some(false));
        assert_eq!(a.literal_value(lit(2)), Some(false));
        assert_eq!(a.literal_value(lit(-2)), Some(true));
        assert_eq!(a.literal_value(lit(3)), None);

        a.unassign(1);
        assert_eq!(a.var_value(1), None);
        assert!(a.state_of(1).is_unassigned());
    }

    #[test]
    fn test_model_defaults_unassigned_to_true() {
        let mut a = VecAssignment::new(3);
        a.assign(lit(-2));
        let m = a.model();
        assert_eq!(m.literals(), &[1, -2, 3]);
        assert!(m.value(1));
        assert!(!m.value(2));
        assert!(m.value(3));
    }

    #[test]
    fn test_model_satisfies() {
        let m = Model::new(vec![1, -2, 3]);
        assert!(m.satisfies(lit(1)));
        assert!(m.satisfies(lit(-2)));
        assert!(!m.satisfies(lit(2)));
        assert!(!m.satisfies(lit(-3)));
    }

    #[test]
    fn test_from_values() {
        let m = Model::from_values(&[true, false]);
        assert_eq!(m.literals(), &[1, -2]);
    }
}
