#![deny(rust_2018_idioms)]
#![forbid(unsafe_code)]

pub mod documents;
pub mod labels;
pub mod policy;

pub use self::{
    documents::{network_policies, DocumentError},
    labels::{Labels, Selector},
    policy::NetworkPolicy,
};
pub use k8s_openapi::apimachinery::pkg::{apis::meta::v1::ObjectMeta, util::intstr::IntOrString};
