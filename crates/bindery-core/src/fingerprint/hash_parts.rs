//! Shared deterministic hash encoding for command and result-shape fingerprints.
#![expect(clippy::cast_possible_truncation)]

use crate::{command::CommandSpec, metadata::TypeDescriptor};
use sha2::{Digest, Sha256};
use std::{
    any::TypeId,
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
};

///
/// Hash one command description into the fingerprint stream.
///
/// Field order is fixed: text, kind, inclusion mode, null mode, inclusion
/// keys, exclusions, constant keys. Collections hash in iteration order.
///

pub(super) fn hash_command(hasher: &mut Sha256, spec: &CommandSpec) {
    write_tag(hasher, 0x01);
    write_str(hasher, spec.text());

    write_tag(hasher, spec.kind().tag());
    write_tag(hasher, spec.inclusion_mode().tag());
    write_tag(hasher, spec.null_mode().tag());

    write_tag(hasher, 0x02);
    write_strs(hasher, spec.inclusion_keys());

    write_tag(hasher, 0x03);
    write_strs(hasher, spec.exclusions());

    write_tag(hasher, 0x04);
    write_strs(hasher, spec.constant_keys());
}

///
/// Hash one result type plus its mapping overrides into the fingerprint stream.
///

pub(super) fn hash_result_type<'a>(
    hasher: &mut Sha256,
    descriptor: &TypeDescriptor,
    cleared: bool,
    overrides: impl ExactSizeIterator<Item = &'a str>,
) {
    write_tag(hasher, 0x40);
    write_type_id(hasher, descriptor.type_id());
    write_str(hasher, descriptor.type_name());

    write_tag(hasher, if cleared { 0x41 } else { 0x42 });
    write_strs(hasher, overrides);
}

///
/// Hash a type identity into the fingerprint stream.
///

pub(super) fn hash_type<T: ?Sized + 'static>(hasher: &mut Sha256) {
    write_tag(hasher, 0x50);
    write_type_id(hasher, TypeId::of::<T>());
    write_str(hasher, std::any::type_name::<T>());
}

// TypeId has no stable byte form; its std hash is stable within one process
fn write_type_id(hasher: &mut Sha256, type_id: TypeId) {
    let mut state = DefaultHasher::new();
    type_id.hash(&mut state);
    write_u64(hasher, state.finish());
}

fn write_strs<'a>(hasher: &mut Sha256, values: impl ExactSizeIterator<Item = &'a str>) {
    write_u32(hasher, values.len() as u32);
    for value in values {
        write_str(hasher, value);
    }
}

///
/// Encode one string with length prefix into the fingerprint stream.
///

pub(super) fn write_str(hasher: &mut Sha256, value: &str) {
    write_u32(hasher, value.len() as u32);
    hasher.update(value.as_bytes());
}

///
/// Encode one u32 in network byte order into the fingerprint stream.
///

pub(super) fn write_u32(hasher: &mut Sha256, value: u32) {
    hasher.update(value.to_be_bytes());
}

fn write_u64(hasher: &mut Sha256, value: u64) {
    hasher.update(value.to_be_bytes());
}

///
/// Encode one tag byte into the fingerprint stream.
///

pub(super) fn write_tag(hasher: &mut Sha256, tag: u8) {
    hasher.update([tag]);
}
