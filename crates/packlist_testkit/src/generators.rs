//! Property-based test generators using proptest.
//!
//! Provides strategies for generating list values, configuration
//! parameters, and whole operation workloads for differential testing
//! against the reference model.

use crate::model::Op;
use proptest::prelude::*;

/// Strategy for element values: short binary blobs, words, canonical and
/// non-canonical digit strings (exercising the integer fast path both
/// ways), and the occasional bulky payload.
pub fn value_strategy() -> impl Strategy<Value = Vec<u8>> {
    prop_oneof![
        4 => prop::collection::vec(any::<u8>(), 0..24),
        4 => "[a-z]{1,12}".prop_map(String::into_bytes),
        3 => any::<i64>().prop_map(|i| i.to_string().into_bytes()),
        1 => "0[0-9]{1,8}".prop_map(String::into_bytes),
        1 => (24usize..700).prop_map(|n| vec![b'v'; n]),
    ]
}

/// Strategy for fill policies: entry-count fills and every size class.
pub fn fill_strategy() -> impl Strategy<Value = i16> {
    prop_oneof![3 => 1i16..=48, 2 => -5i16..=-1]
}

/// Strategy for compression depths, biased towards small windows.
pub fn depth_strategy() -> impl Strategy<Value = u16> {
    prop_oneof![2 => Just(0u16), 3 => 1u16..=3]
}

/// Strategy for indexes, covering both signs and out-of-bounds values.
pub fn index_strategy() -> impl Strategy<Value = i64> {
    -40i64..40
}

/// Strategy for one workload operation.
pub fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        5 => value_strategy().prop_map(Op::PushTail),
        4 => value_strategy().prop_map(Op::PushHead),
        3 => Just(Op::PopHead),
        3 => Just(Op::PopTail),
        1 => Just(Op::Rotate),
        2 => (index_strategy(), index_strategy()).prop_map(|(a, b)| Op::DelRange(a, b)),
        2 => (index_strategy(), value_strategy()).prop_map(|(i, v)| Op::Replace(i, v)),
        2 => (index_strategy(), value_strategy()).prop_map(|(i, v)| Op::InsertBefore(i, v)),
        2 => (index_strategy(), value_strategy()).prop_map(|(i, v)| Op::InsertAfter(i, v)),
        2 => index_strategy().prop_map(Op::Get),
    ]
}

/// Strategy for a whole workload.
pub fn workload_strategy(max_ops: usize) -> impl Strategy<Value = Vec<Op>> {
    prop::collection::vec(op_strategy(), 1..max_ops)
}
