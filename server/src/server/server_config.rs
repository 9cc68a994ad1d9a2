use std::default::Default;

/// Contains Config properties which will be used by the Server
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Prefab used for principals requested with [`PrefabSelector::Default`]
    /// or with a selector that names no prefab.
    ///
    /// [`PrefabSelector::Default`]: crate::PrefabSelector::Default
    pub default_prefab_index: Option<u32>,
    /// Key-based counterpart of `default_prefab_index`, used by key selectors
    pub default_prefab_key: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            default_prefab_index: None,
            default_prefab_key: None,
        }
    }
}
