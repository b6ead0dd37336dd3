//! HTTP handlers, split by resource.

mod instances;
mod miners;

pub(crate) use instances::{
    create_instance, delete_instance, health, instance_status, instance_views, list_instances,
    start_instance, stop_instance, version,
};
pub(crate) use miners::list_miners;
