#![deny(rust_2018_idioms)]
#![forbid(unsafe_code)]

pub use netpol_reachability_core as core;
pub use netpol_reachability_k8s_api as k8s;
pub use netpol_reachability_k8s_index as index;

mod args;
pub mod fixtures;
mod load;
pub mod matrix;
pub mod report;

pub use self::{
    args::Args,
    fixtures::{Catalog, ExpectedFlow},
    load::load_policies,
    matrix::{FlowResult, Matrix, Summary},
};
