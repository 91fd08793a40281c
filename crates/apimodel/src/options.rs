use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use tracing::warn;

use crate::error::ModelError;

type OptionValue = Arc<dyn Any + Send + Sync>;

/// Named, typed option with a documented default.
#[derive(Clone, Debug)]
pub struct OptionKey<T> {
    name: &'static str,
    default: T,
    description: &'static str,
}

impl<T> OptionKey<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub const fn new(name: &'static str, default: T, description: &'static str) -> Self {
        Self {
            name,
            default,
            description,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn default_value(&self) -> &T {
        &self.default
    }

    pub fn description(&self) -> &'static str {
        self.description
    }
}

/// Immutable set of option values handed to a codebase by its front-end.
///
/// Values are looked up by key name; an unset key yields its default.
#[derive(Clone, Default)]
pub struct ModelOptions {
    description: String,
    values: Arc<BTreeMap<&'static str, OptionValue>>,
}

impl ModelOptions {
    pub fn empty() -> Self {
        Self {
            description: "empty".to_string(),
            values: Arc::default(),
        }
    }

    /// Builds an option set, failing if any key name is set more than once.
    pub fn build(
        description: impl Into<String>,
        configure: impl FnOnce(&mut ModelOptionsBuilder),
    ) -> Result<Self, ModelError> {
        let description = description.into();
        let mut builder = ModelOptionsBuilder::default();
        configure(&mut builder);

        if !builder.duplicates.is_empty() {
            return Err(ModelError::DuplicateOptionKey(format!(
                "{} in options '{description}'",
                builder.duplicates.join(", ")
            )));
        }

        Ok(Self {
            description,
            values: Arc::new(builder.values),
        })
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn contains<T>(&self, key: &OptionKey<T>) -> bool
    where
        T: Clone + Send + Sync + 'static,
    {
        self.values.contains_key(key.name)
    }

    pub fn get<T>(&self, key: &OptionKey<T>) -> T
    where
        T: Clone + Send + Sync + 'static,
    {
        let Some(value) = self.values.get(key.name) else {
            return key.default.clone();
        };
        match value.downcast_ref::<T>() {
            Some(value) => value.clone(),
            None => {
                warn!(
                    option = key.name,
                    options = %self.description,
                    "option value has a different type than the key; using default"
                );
                key.default.clone()
            }
        }
    }
}

impl fmt::Debug for ModelOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelOptions")
            .field("description", &self.description)
            .field("keys", &self.values.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[derive(Default)]
pub struct ModelOptionsBuilder {
    values: BTreeMap<&'static str, OptionValue>,
    duplicates: Vec<&'static str>,
}

impl ModelOptionsBuilder {
    pub fn set<T>(&mut self, key: &OptionKey<T>, value: T) -> &mut Self
    where
        T: Clone + Send + Sync + 'static,
    {
        if self.values.insert(key.name, Arc::new(value)).is_some() {
            self.duplicates.push(key.name);
        }
        self
    }
}
