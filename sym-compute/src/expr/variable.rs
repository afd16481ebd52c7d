use std::{
    cmp::Ordering,
    fmt,
    hash::{Hash, Hasher},
};
use super::{ConstructionError, Expr};

/// A named variable, optionally indexed by a list of expressions, such as `x` or `u[i, j + 1]`.
///
/// Two variables are the same variable if they render the same way: the identity key returned by
/// [`Variable::id`] is the name followed by the rendered indexes. Equality, hashing and ordering
/// all go through this key.
#[derive(Debug, Clone)]
pub struct Variable {
    name: String,
    indexes: Vec<Expr>,
    id: String,
}

impl Variable {
    /// Creates a scalar variable. Fails if `name` is empty.
    pub fn new(name: impl Into<String>) -> Result<Self, ConstructionError> {
        Self::indexed(name, Vec::new())
    }

    /// Creates an indexed variable. Fails if `name` is empty.
    pub fn indexed(name: impl Into<String>, indexes: Vec<Expr>) -> Result<Self, ConstructionError> {
        let name = name.into();
        if name.is_empty() {
            return Err(ConstructionError::EmptyName);
        }

        let id = if indexes.is_empty() {
            name.clone()
        } else {
            let rendered = indexes.iter().map(ToString::to_string).collect::<Vec<_>>();
            format!("{}[{}]", name, rendered.join(", "))
        };
        Ok(Self { name, indexes, id })
    }

    /// Creates a scalar variable from a name known to be non-empty.
    pub(crate) fn named(name: &str) -> Self {
        Self { name: name.to_string(), indexes: Vec::new(), id: name.to_string() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn indexes(&self) -> &[Expr] {
        &self.indexes
    }

    /// The identity key of the variable: `name` or `name[index0, index1, ...]`.
    pub fn id(&self) -> &str {
        &self.id
    }
}

impl PartialEq for Variable {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Variable {}

impl Hash for Variable {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl PartialOrd for Variable {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Variable {
    fn cmp(&self, other: &Self) -> Ordering {
        self.id.cmp(&other.id)
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn identity_key() {
        let i = Expr::from(Variable::new("i").unwrap());
        let u = Variable::indexed("u", vec![i.clone(), i + Expr::from(1)]).unwrap();
        assert_eq!(u.id(), "u[i, i + 1]");
        assert_eq!(u.name(), "u");
        assert_eq!(u.indexes().len(), 2);
    }

    #[test]
    fn equality_goes_through_id() {
        assert_eq!(Variable::new("x").unwrap(), Variable::new("x").unwrap());
        assert_ne!(Variable::new("x").unwrap(), Variable::new("X").unwrap());
        assert_eq!(Variable::new(""), Err(ConstructionError::EmptyName));
    }
}
