#[allow(dead_code)]
pub mod mirror_server;
