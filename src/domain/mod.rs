//! Typed Deployment records and the Kubernetes rules they are checked against.

pub mod deployment;
pub mod image;
pub mod labels;
pub mod naming;

pub use deployment::{
    Container, Deployment, DeploymentSpec, EnvVar, Identity, LabelSelector, Labels, ObjectMeta,
    PodSpec, PodTemplateSpec, PullPolicy, TemplateMeta,
};
pub use image::{ImageError, ImageReference};
