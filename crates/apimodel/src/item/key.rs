use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Semantic signature of an item, independent of the instance and codebase it came from.
///
/// Members are keyed without their containing class so that a member
/// projected into a subclass still matches its declaration. Same-named
/// members of unrelated classes therefore have equal keys: pair members
/// only within classes already matched by their own keys.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ItemKey {
    Package(String),
    Class(String),
    TypeAlias(String),
    /// Erased parameter types.
    Constructor(Vec<String>),
    Method {
        name: String,
        /// Erased parameter types.
        parameters: Vec<String>,
    },
    Field(String),
    Property(String),
    Parameter {
        owner: Box<ItemKey>,
        index: usize,
    },
}

impl ItemKey {
    /// Deterministic hash; equal keys hash equally whichever codebase produced them.
    pub fn stable_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.hash(&mut hasher);
        hasher.finish()
    }
}

impl fmt::Display for ItemKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemKey::Package(name) | ItemKey::Class(name) | ItemKey::TypeAlias(name) => {
                f.write_str(name)
            }
            ItemKey::Constructor(parameters) => write!(f, "<init>({})", parameters.join(", ")),
            ItemKey::Method { name, parameters } => {
                write!(f, "{name}({})", parameters.join(", "))
            }
            ItemKey::Field(name) | ItemKey::Property(name) => f.write_str(name),
            ItemKey::Parameter { owner, index } => write!(f, "{owner}#{index}"),
        }
    }
}
