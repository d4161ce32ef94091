pub mod cli;
pub mod k8s;
pub mod logging;
