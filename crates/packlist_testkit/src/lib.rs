//! # PackList Testkit
//!
//! Test utilities for PackList: proptest strategies for values,
//! configuration and operation workloads, plus a deliberately dumb
//! reference list used for differential testing.
//!
//! ## Usage
//!
//! ```
//! use packlist_core::PackList;
//! use packlist_testkit::{check_equivalent, step, ModelList, Op};
//!
//! let mut list = PackList::with_options(2, 0);
//! let mut model = ModelList::new();
//! step(&mut list, &mut model, &Op::PushTail(b"x".to_vec()));
//! check_equivalent(&mut list, &model);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod generators;
mod model;

pub use generators::{
    depth_strategy, fill_strategy, index_strategy, op_strategy, value_strategy, workload_strategy,
};
pub use model::{check_equivalent, step, ModelList, Op};
