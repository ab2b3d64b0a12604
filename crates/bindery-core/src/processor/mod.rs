//! Module: processor
//! Responsibility: immutable compiled commands that materialize parameters,
//! call the data-access collaborator and project results.
//! Does not own: caching (see `cache`) or connection handling.


use crate::{
    access::{AsyncDatabaseManager, DatabaseManager},
    command::{CommandSpec, Parameter, materialize},
    error::Error,
    fingerprint::Fingerprint,
    mapping::{MappingError, MappingTable},
    results::ResultSetList,
    traits::{FieldValue, PropertyAccessor},
    value::Value,
};
use std::{fmt, marker::PhantomData};

///
/// CommandProcessor
///
/// Behavior shared by every compiled command. Executions never mutate the
/// processor.
///

pub trait CommandProcessor<F: PropertyAccessor>: Send + Sync {
    fn command(&self) -> &CommandSpec;

    fn fingerprint(&self) -> &Fingerprint;

    /// Run the command and convert its single value into `T`.
    /// A database null converts like a language-level null.
    fn execute_scalar<T, D>(
        &self,
        db: &D,
        filter: Option<&F>,
        explicit: Vec<Parameter>,
    ) -> Result<T, Error>
    where
        T: FieldValue,
        D: DatabaseManager + ?Sized,
        Self: Sized,
    {
        let spec = self.command();
        let parameters = materialize(spec, db, filter, explicit)?;
        trace_execute(spec, "scalar", &parameters);

        let value = db.execute_scalar(spec.text(), spec.kind(), &parameters)?;

        convert_scalar(value)
    }

    /// Run the command and return the affected row count.
    fn execute_non_query<D>(
        &self,
        db: &D,
        filter: Option<&F>,
        explicit: Vec<Parameter>,
    ) -> Result<u64, Error>
    where
        D: DatabaseManager + ?Sized,
        Self: Sized,
    {
        let spec = self.command();
        let parameters = materialize(spec, db, filter, explicit)?;
        trace_execute(spec, "non_query", &parameters);

        Ok(db.execute_non_query(spec.text(), spec.kind(), &parameters)?)
    }
}

fn trace_execute(spec: &CommandSpec, mode: &'static str, parameters: &[Parameter]) {
    tracing::trace!(
        command = spec.text(),
        mode,
        parameters = parameters.len(),
        "executing command"
    );
}

fn convert_scalar<T: FieldValue>(value: Value) -> Result<T, Error> {
    T::from_value(value.normalize_db_null())
        .map_err(|err| MappingError::Scalar(err).into())
}

async fn scalar_async<F, T, D>(
    spec: &CommandSpec,
    db: &D,
    filter: Option<&F>,
    explicit: Vec<Parameter>,
) -> Result<T, Error>
where
    F: PropertyAccessor,
    T: FieldValue,
    D: AsyncDatabaseManager + ?Sized,
{
    let parameters = materialize(spec, db, filter, explicit)?;
    trace_execute(spec, "scalar", &parameters);

    let value = db
        .execute_scalar(spec.text(), spec.kind(), &parameters)
        .await?;

    convert_scalar(value)
}

async fn non_query_async<F, D>(
    spec: &CommandSpec,
    db: &D,
    filter: Option<&F>,
    explicit: Vec<Parameter>,
) -> Result<u64, Error>
where
    F: PropertyAccessor,
    D: AsyncDatabaseManager + ?Sized,
{
    let parameters = materialize(spec, db, filter, explicit)?;
    trace_execute(spec, "non_query", &parameters);

    Ok(db
        .execute_non_query(spec.text(), spec.kind(), &parameters)
        .await?)
}

///
/// NoResultSetCommandProcessor
///
/// Compiled command that returns a scalar or a row count.
///

pub struct NoResultSetCommandProcessor<F> {
    spec: CommandSpec,
    fingerprint: Fingerprint,
    _filter: PhantomData<fn(&F)>,
}

impl<F: PropertyAccessor> NoResultSetCommandProcessor<F> {
    pub(crate) const fn new(spec: CommandSpec, fingerprint: Fingerprint) -> Self {
        Self {
            spec,
            fingerprint,
            _filter: PhantomData,
        }
    }

    pub async fn execute_scalar_async<T, D>(
        &self,
        db: &D,
        filter: Option<&F>,
        explicit: Vec<Parameter>,
    ) -> Result<T, Error>
    where
        T: FieldValue,
        D: AsyncDatabaseManager + ?Sized,
    {
        scalar_async(&self.spec, db, filter, explicit).await
    }

    pub async fn execute_non_query_async<D>(
        &self,
        db: &D,
        filter: Option<&F>,
        explicit: Vec<Parameter>,
    ) -> Result<u64, Error>
    where
        D: AsyncDatabaseManager + ?Sized,
    {
        non_query_async(&self.spec, db, filter, explicit).await
    }
}

impl<F: PropertyAccessor> CommandProcessor<F> for NoResultSetCommandProcessor<F> {
    fn command(&self) -> &CommandSpec {
        &self.spec
    }

    fn fingerprint(&self) -> &Fingerprint {
        &self.fingerprint
    }
}

impl<F> fmt::Debug for NoResultSetCommandProcessor<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NoResultSetCommandProcessor")
            .field("command", &self.spec.text())
            .field("fingerprint", &self.fingerprint)
            .finish_non_exhaustive()
    }
}

///
/// ResultSetCommandProcessor
///
/// Compiled command whose result sets project into the record types of `L`
/// through mapping tables frozen at build time.
///

pub struct ResultSetCommandProcessor<F, L> {
    spec: CommandSpec,
    fingerprint: Fingerprint,
    tables: Vec<MappingTable>,
    _marker: PhantomData<fn(&F) -> L>,
}

impl<F: PropertyAccessor, L: ResultSetList> ResultSetCommandProcessor<F, L> {
    pub(crate) const fn new(
        spec: CommandSpec,
        fingerprint: Fingerprint,
        tables: Vec<MappingTable>,
    ) -> Self {
        Self {
            spec,
            fingerprint,
            tables,
            _marker: PhantomData,
        }
    }

    #[must_use]
    pub fn tables(&self) -> &[MappingTable] {
        &self.tables
    }

    /// Run the command and project every declared result set.
    pub fn execute<D>(
        &self,
        db: &D,
        filter: Option<&F>,
        explicit: Vec<Parameter>,
    ) -> Result<L::Output, Error>
    where
        D: DatabaseManager + ?Sized,
    {
        let parameters = materialize(&self.spec, db, filter, explicit)?;
        trace_execute(&self.spec, "reader", &parameters);

        let sets = db.execute_reader(self.spec.text(), self.spec.kind(), &parameters)?;

        Ok(L::project(sets, &self.tables)?)
    }

    pub async fn execute_async<D>(
        &self,
        db: &D,
        filter: Option<&F>,
        explicit: Vec<Parameter>,
    ) -> Result<L::Output, Error>
    where
        D: AsyncDatabaseManager + ?Sized,
    {
        let parameters = materialize(&self.spec, db, filter, explicit)?;
        trace_execute(&self.spec, "reader", &parameters);

        let sets = db
            .execute_reader(self.spec.text(), self.spec.kind(), &parameters)
            .await?;

        Ok(L::project(sets, &self.tables)?)
    }

    pub async fn execute_scalar_async<T, D>(
        &self,
        db: &D,
        filter: Option<&F>,
        explicit: Vec<Parameter>,
    ) -> Result<T, Error>
    where
        T: FieldValue,
        D: AsyncDatabaseManager + ?Sized,
    {
        scalar_async(&self.spec, db, filter, explicit).await
    }

    pub async fn execute_non_query_async<D>(
        &self,
        db: &D,
        filter: Option<&F>,
        explicit: Vec<Parameter>,
    ) -> Result<u64, Error>
    where
        D: AsyncDatabaseManager + ?Sized,
    {
        non_query_async(&self.spec, db, filter, explicit).await
    }
}

impl<F: PropertyAccessor, L: ResultSetList> CommandProcessor<F>
    for ResultSetCommandProcessor<F, L>
{
    fn command(&self) -> &CommandSpec {
        &self.spec
    }

    fn fingerprint(&self) -> &Fingerprint {
        &self.fingerprint
    }
}

impl<F, L> fmt::Debug for ResultSetCommandProcessor<F, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResultSetCommandProcessor")
            .field("command", &self.spec.text())
            .field("fingerprint", &self.fingerprint)
            .field("tables", &self.tables)
            .finish()
    }
}
