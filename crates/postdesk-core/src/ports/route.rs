//! Route port - read access to the current navigation parameters.

use std::collections::HashMap;

use futures::stream::BoxStream;

/// Route parameter carrying the identifier of the post being edited.
pub const POST_ID_PARAM: &str = "postId";

/// Snapshot of the current route parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParamMap {
    params: HashMap<String, String>,
}

impl ParamMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    pub fn has(&self, name: &str) -> bool {
        self.params.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }
}

impl<K, V> FromIterator<(K, V)> for ParamMap
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            params: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Source of route parameters, delivered as a stream of snapshots.
///
/// The first item is the route the editor was opened on; later items are
/// emitted when the route changes while the editor is alive.
pub trait Route: Send + Sync {
    fn param_map(&self) -> BoxStream<'static, ParamMap>;
}
