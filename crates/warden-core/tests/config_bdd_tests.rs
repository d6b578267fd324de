//! BDD Tests for Warden configuration loading

use cucumber::{given, then, when, World};
use std::time::Duration;
use warden_core::*;

#[derive(Debug, World)]
#[world(init = Self::new)]
struct ConfigWorld {
    yaml: String,
    loaded: Option<WardenConfig>,
    last_error: Option<WardenError>,
}

impl ConfigWorld {
    fn new() -> Self {
        Self {
            yaml: String::new(),
            loaded: None,
            last_error: None,
        }
    }
}

fn base_yaml(interval: u64) -> String {
    format!(
        "server_ip: \"127.0.0.1\"\n\
         server_port: 25565\n\
         server_start_cmd: \"./start.sh\"\n\
         server_stop_cmd: \"./stop.sh\"\n\
         server_dir: \"/srv/minecraft\"\n\
         status_check_interval: {interval}\n"
    )
}

#[given(expr = "a config with interval {int} and timeout {int}")]
async fn given_config(world: &mut ConfigWorld, interval: u64, timeout: u64) {
    world.yaml = format!("{}status_timeout: {timeout}\n", base_yaml(interval));
}

#[given(expr = "a config with interval {int} and no timeout")]
async fn given_config_without_timeout(world: &mut ConfigWorld, interval: u64) {
    world.yaml = base_yaml(interval);
}

#[when("I load the configuration")]
async fn when_load(world: &mut ConfigWorld) {
    match WardenConfig::from_yaml_str(&world.yaml) {
        Ok(cfg) => world.loaded = Some(cfg),
        Err(err) => world.last_error = Some(err),
    }
}

#[then("loading succeeds")]
async fn then_loading_succeeds(world: &mut ConfigWorld) {
    assert!(world.last_error.is_none(), "{:?}", world.last_error);
    assert!(world.loaded.is_some());
}

#[then(expr = "the poll interval is {int} seconds")]
async fn then_interval(world: &mut ConfigWorld, secs: u64) {
    let poll = world.loaded.as_ref().unwrap().poll_config();
    assert_eq!(poll.interval, Duration::from_secs(secs));
}

#[then(expr = "the poll timeout is {int} seconds")]
async fn then_timeout(world: &mut ConfigWorld, secs: u64) {
    let poll = world.loaded.as_ref().unwrap().poll_config();
    assert_eq!(poll.timeout, Duration::from_secs(secs));
}

#[then(expr = "I should get a {string} error")]
async fn then_should_get_error(world: &mut ConfigWorld, message: String) {
    let error = world.last_error.as_ref().expect("expected an error");
    assert!(
        error.to_string().contains(&message),
        "unexpected error: {error}"
    );
}

#[tokio::main]
async fn main() {
    ConfigWorld::cucumber().run_and_exit("tests/features").await;
}
