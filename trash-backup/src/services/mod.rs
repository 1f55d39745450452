pub mod ingress;
pub mod seen_set;
pub mod trash_watcher;
