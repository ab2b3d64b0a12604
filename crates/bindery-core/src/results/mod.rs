//! Module: results
//! Responsibility: declared result shapes (one record type per result set)
//! and the builder stage that configures their mappings.
//! Does not own: row projection itself (see `mapping`).


use crate::{
    access::RowSet,
    command::{CommandError, CommandExpression},
    error::Error,
    fingerprint::Fingerprint,
    mapping::{MappingError, MappingTable, ResultMapping},
    metadata::TypeDescriptor,
    processor::ResultSetCommandProcessor,
    traits::{PropertyAccessor, ResultRecord},
};
use std::{fmt, marker::PhantomData, sync::Arc};

///
/// ResultSetList
///
/// A tuple of result record types, one per result set in server order.
/// `(A,)` projects to `Vec<A>`; wider tuples project to a tuple of vectors.
/// A result set the server did not return projects to an empty vector;
/// extra result sets are ignored.
///

pub trait ResultSetList: 'static {
    type Output: Send;

    fn descriptors() -> Vec<TypeDescriptor>;

    fn project(sets: Vec<RowSet>, tables: &[MappingTable]) -> Result<Self::Output, MappingError>;
}

fn project_next<R: ResultRecord>(
    sets: &mut impl Iterator<Item = RowSet>,
    tables: &[MappingTable],
    index: usize,
) -> Result<Vec<R>, MappingError> {
    let table = tables
        .get(index)
        .ok_or(MappingError::MissingTable { index })?;

    sets.next()
        .map_or_else(|| Ok(Vec::new()), |set| table.project(&set))
}

impl<A: ResultRecord> ResultSetList for (A,) {
    type Output = Vec<A>;

    fn descriptors() -> Vec<TypeDescriptor> {
        vec![TypeDescriptor::of::<A>()]
    }

    fn project(sets: Vec<RowSet>, tables: &[MappingTable]) -> Result<Self::Output, MappingError> {
        project_next::<A>(&mut sets.into_iter(), tables, 0)
    }
}

// impl_result_set_list
macro_rules! impl_result_set_list {
    ( $( ( $( $ty:ident : $idx:tt ),+ ) ),* $(,)? ) => {
        $(
            impl<$( $ty: ResultRecord ),+> ResultSetList for ( $( $ty, )+ ) {
                type Output = ( $( Vec<$ty>, )+ );

                fn descriptors() -> Vec<TypeDescriptor> {
                    vec![ $( TypeDescriptor::of::<$ty>() ),+ ]
                }

                fn project(
                    sets: Vec<RowSet>,
                    tables: &[MappingTable],
                ) -> Result<Self::Output, MappingError> {
                    let mut sets = sets.into_iter();

                    Ok(( $( project_next::<$ty>(&mut sets, tables, $idx)?, )+ ))
                }
            }
        )*
    };
}

impl_result_set_list!(
    (A: 0, B: 1),
    (A: 0, B: 1, C: 2),
    (A: 0, B: 1, C: 2, D: 3),
    (A: 0, B: 1, C: 2, D: 3, E: 4),
    (A: 0, B: 1, C: 2, D: 3, E: 4, G: 5),
    (A: 0, B: 1, C: 2, D: 3, E: 4, G: 5, H: 6),
);

///
/// CommandResultExpression
///
/// Command builder stage with declared result sets. Each result set gets a
/// mapping seeded from its record type's readable properties.
///

pub struct CommandResultExpression<F, L> {
    command: CommandExpression<F>,
    mappings: Vec<ResultMapping>,
    _results: PhantomData<fn() -> L>,
}

impl<F: PropertyAccessor, L: ResultSetList> CommandResultExpression<F, L> {
    pub(crate) fn new(command: CommandExpression<F>) -> Self {
        let extractor = command.manager().extractor();
        let mappings = L::descriptors()
            .into_iter()
            .map(|descriptor| ResultMapping::new(descriptor, extractor))
            .collect();

        Self {
            command,
            mappings,
            _results: PhantomData,
        }
    }

    /// Configure the mapping of every declared result set of type `R`.
    pub fn for_results<R: ResultRecord>(
        mut self,
        mut configure: impl FnMut(&mut ResultMapping),
    ) -> Result<Self, Error> {
        let target = TypeDescriptor::of::<R>();
        let mut found = false;

        for mapping in &mut self.mappings {
            if *mapping.descriptor() == target {
                configure(mapping);
                found = true;
            }
        }

        if !found {
            return Err(CommandError::ResultTypeNotDeclared {
                type_name: target.type_name(),
            }
            .into());
        }

        Ok(self)
    }

    /// Configure the mapping of the result set at `index`.
    pub fn for_result_set(
        mut self,
        index: usize,
        configure: impl FnOnce(&mut ResultMapping),
    ) -> Result<Self, Error> {
        let arity = self.mappings.len();
        let mapping = self
            .mappings
            .get_mut(index)
            .ok_or(CommandError::ResultSetOutOfRange { index, arity })?;
        configure(mapping);

        Ok(self)
    }

    #[must_use]
    pub const fn command(&self) -> &CommandExpression<F> {
        &self.command
    }

    #[must_use]
    pub fn mappings(&self) -> &[ResultMapping] {
        &self.mappings
    }

    /// Command fingerprint, then the declared arity, then each result type
    /// with its overrides in declared order.
    #[must_use]
    pub fn fingerprint(&self) -> Fingerprint {
        let header = self
            .command
            .fingerprint()
            .combine(&Fingerprint::of_result_arity(self.mappings.len()));

        self.mappings
            .iter()
            .fold(header, |acc, mapping| acc.combine(&mapping.fingerprint()))
    }

    /// Compile (or fetch) the result-bearing processor. Mapping tables are
    /// snapshotted at build time.
    pub fn realize(
        &self,
        name: Option<&str>,
    ) -> Result<Arc<ResultSetCommandProcessor<F, L>>, Error> {
        let fingerprint = self.fingerprint();

        self.command.manager().realize(name, &fingerprint, || {
            let tables = self.mappings.iter().map(ResultMapping::export).collect();

            Ok(ResultSetCommandProcessor::new(
                self.command.spec().clone(),
                fingerprint.clone(),
                tables,
            ))
        })
    }
}

impl<F, L> fmt::Debug for CommandResultExpression<F, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandResultExpression")
            .field("command", &self.command)
            .field("mappings", &self.mappings)
            .finish()
    }
}
