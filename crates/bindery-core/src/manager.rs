//! Module: manager
//! Responsibility: the entry point that owns the processor cache, the
//! metadata extractor and builder defaults.
//! Does not own: execution; processors take the data-access collaborator
//! per call.

use crate::{
    cache::{ProcessorCache, ProcessorKey},
    command::{CommandExpression, CommandKind, CommandSpec},
    config::Config,
    error::Error,
    fingerprint::Fingerprint,
    metadata::{DeclaredPropertyExtractor, PropertyMetadataExtractor},
    traits::PropertyAccessor,
};
use std::{any::Any, fmt, sync::Arc};

///
/// CommandManager
///
/// Cheap to clone; clones share one cache. Build one per process (or per
/// isolated test) and hand it to whatever constructs commands.
///

#[derive(Clone)]
pub struct CommandManager {
    cache: Arc<ProcessorCache>,
    extractor: Arc<dyn PropertyMetadataExtractor>,
    config: Config,
}

impl CommandManager {
    #[must_use]
    pub fn new() -> Self {
        Self {
            cache: Arc::new(ProcessorCache::new()),
            extractor: Arc::new(DeclaredPropertyExtractor),
            config: Config::default(),
        }
    }

    #[must_use]
    pub const fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn with_extractor(mut self, extractor: Arc<dyn PropertyMetadataExtractor>) -> Self {
        self.extractor = extractor;
        self
    }

    /// Share an existing cache between managers.
    #[must_use]
    pub fn with_cache(mut self, cache: Arc<ProcessorCache>) -> Self {
        self.cache = cache;
        self
    }

    #[must_use]
    pub const fn cache(&self) -> &Arc<ProcessorCache> {
        &self.cache
    }

    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    #[must_use]
    pub fn extractor(&self) -> &dyn PropertyMetadataExtractor {
        self.extractor.as_ref()
    }

    /// Start describing a command whose filter type is `F`.
    pub fn command<F: PropertyAccessor>(
        &self,
        text: impl Into<String>,
        kind: CommandKind,
    ) -> Result<CommandExpression<F>, Error> {
        let mut spec = CommandSpec::new(text, kind)?;
        spec.null_mode = self.config.null_values;
        spec.inclusion_mode = self.config.inclusion;

        Ok(CommandExpression::new(spec, self.clone()))
    }

    // Named lookups use only the name namespace; unnamed ones key on the
    // configuration fingerprint combined with the processor type.
    pub(crate) fn realize<P, B>(
        &self,
        name: Option<&str>,
        fingerprint: &Fingerprint,
        build: B,
    ) -> Result<Arc<P>, Error>
    where
        P: Any + Send + Sync,
        B: FnOnce() -> Result<P, Error>,
    {
        if !self.config.cache.enabled {
            tracing::debug!(fingerprint = %fingerprint, "processor cache disabled; building");
            return build().map(Arc::new);
        }

        let key = match name {
            Some(name) => ProcessorKey::Name(name.to_string()),
            None => ProcessorKey::Fingerprint(fingerprint.for_processor::<P>()),
        };

        self.cache.get_or_build(key, build)
    }
}

impl Default for CommandManager {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for CommandManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandManager")
            .field("cache", &self.cache)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
