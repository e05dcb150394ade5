//! Custom Resource Definitions read by the dashboard
//!
//! Only the subset of the CloudNativePG schema the status views need is modelled.

mod cnpg;


pub use cnpg::*;
