use super::{CommandSpec, InclusionMode, NullValueMode, Parameter, ParameterModifier, modifier};
use crate::{
    error::Error,
    fingerprint::Fingerprint,
    manager::CommandManager,
    processor::NoResultSetCommandProcessor,
    results::{CommandResultExpression, ResultSetList},
    traits::{PropertyAccessor, ResultRecord},
};
use std::{marker::PhantomData, sync::Arc};

///
/// CommandExpression
///
/// Fluent, single-owner accumulation of command rules for filter type `F`.
/// Re-adding an inclusion, exclusion or constant replaces the earlier entry
/// in place.
///

pub struct CommandExpression<F> {
    spec: CommandSpec,
    manager: CommandManager,
    _filter: PhantomData<fn(&F)>,
}

impl<F: PropertyAccessor> CommandExpression<F> {
    pub(crate) const fn new(spec: CommandSpec, manager: CommandManager) -> Self {
        Self {
            spec,
            manager,
            _filter: PhantomData,
        }
    }

    #[must_use]
    pub fn include_property(self, name: impl Into<String>) -> Self {
        self.include_property_modifier(name, None)
    }

    #[must_use]
    pub fn include_property_with<M>(self, name: impl Into<String>, modify: M) -> Self
    where
        M: Fn(&mut Parameter) + Send + Sync + 'static,
    {
        self.include_property_modifier(name, Some(modifier(modify)))
    }

    #[must_use]
    pub fn include_property_modifier(
        mut self,
        name: impl Into<String>,
        modify: Option<ParameterModifier>,
    ) -> Self {
        self.spec.inclusions.insert(name.into(), modify);
        self
    }

    /// Drop a property from implicit inclusion. No effect in explicit mode.
    #[must_use]
    pub fn exclude_property(mut self, name: impl Into<String>) -> Self {
        self.spec.exclusions.insert(name.into());
        self
    }

    #[must_use]
    pub fn add_constant_parameter<M>(mut self, name: impl Into<String>, modify: M) -> Self
    where
        M: Fn(&mut Parameter) + Send + Sync + 'static,
    {
        self.spec.constants.insert(name.into(), modifier(modify));
        self
    }

    #[must_use]
    pub const fn send_null_values(mut self, mode: NullValueMode) -> Self {
        self.spec.null_mode = mode;
        self
    }

    #[must_use]
    pub const fn use_explicit_property_inclusion_mode(mut self) -> Self {
        self.spec.inclusion_mode = InclusionMode::Explicit;
        self
    }

    #[must_use]
    pub const fn spec(&self) -> &CommandSpec {
        &self.spec
    }

    #[must_use]
    pub const fn manager(&self) -> &CommandManager {
        &self.manager
    }

    #[must_use]
    pub fn fingerprint(&self) -> Fingerprint {
        Fingerprint::of_command(&self.spec)
    }

    /// Compile (or fetch) the processor for the current rules.
    ///
    /// With a name, the processor is cached under that name only; an
    /// existing entry of the same name is returned as-is.
    pub fn realize(
        &self,
        name: Option<&str>,
    ) -> Result<Arc<NoResultSetCommandProcessor<F>>, Error> {
        let fingerprint = self.fingerprint();

        self.manager.realize(name, &fingerprint, || {
            Ok(NoResultSetCommandProcessor::new(self.spec.clone(), fingerprint.clone()))
        })
    }

    /// Declare the result sets this command returns, one type per set.
    #[must_use]
    pub fn define_results<L: ResultSetList>(self) -> CommandResultExpression<F, L> {
        CommandResultExpression::new(self)
    }

    #[must_use]
    pub fn define_result<R: ResultRecord>(self) -> CommandResultExpression<F, (R,)> {
        self.define_results::<(R,)>()
    }
}

impl<F> std::fmt::Debug for CommandExpression<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandExpression")
            .field("spec", &self.spec)
            .field("filter", &std::any::type_name::<F>())
            .finish_non_exhaustive()
    }
}
