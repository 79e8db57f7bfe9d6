//! Integration tests for the public library API.

use larder::config::{parse_config, Config};
use larder::packages::{CheckStrategy, PackageName};
use larder::runtime::FakeRuntime;
use larder::session::Session;
use std::path::Path;
use tempfile::TempDir;

#[test]
fn default_config_carries_the_standard_package_list() {
    let config = Config::default();
    let names: Vec<&str> = config.packages.iter().map(|p| p.as_str()).collect();
    assert_eq!(names, vec!["jsonlite", "data.table", "forecast", "tseries", "zoo"]);
    assert_eq!(config.check.strategy, CheckStrategy::Sequential);
}

#[test]
fn a_session_provisions_against_a_scripted_runtime() {
    let temp = TempDir::new().unwrap();
    let user_lib = temp.path().join("Library").join("R");

    let mut config = Config::default();
    config.packages = vec![PackageName::parse("zoo").unwrap()];
    config.check.bootstrap = None;

    let runtime = FakeRuntime::new()
        .with_loadable(&["zoo"])
        .with_library_paths(&["/usr/lib/R/library", &user_lib.to_string_lossy()]);

    let mut session = Session::new(config, runtime);
    assert!(session.initialize());
    assert!(session.setup_complete());
    assert!(user_lib.is_dir());
    assert_eq!(session.runtime().install_count(), 0);
}

#[test]
fn sessions_do_not_share_state() {
    let mut config = Config::default();
    config.packages = vec![PackageName::parse("zoo").unwrap()];
    config.check.bootstrap = None;

    let mut first = Session::new(config.clone(), FakeRuntime::new().with_loadable(&["zoo"]));
    let mut second = Session::new(config, FakeRuntime::new().with_unreachable());

    assert!(first.ensure_packages());
    assert!(!second.ensure_packages());
    assert!(!second.setup_complete());
}

#[test]
fn yaml_round_trips_through_the_schema() {
    let yaml = "\
packages: [zoo, xts, zoo]
repository:
  url: https://mirror.example/
check:
  strategy: batch
  bootstrap: null
";
    let mut config = parse_config(yaml, Path::new("test.yml")).unwrap();
    config.dedup_packages();

    let names: Vec<&str> = config.packages.iter().map(|p| p.as_str()).collect();
    assert_eq!(names, vec!["zoo", "xts"]);
    assert_eq!(config.repository.url, "https://mirror.example/");
    assert_eq!(config.check.strategy, CheckStrategy::Batch);
    assert!(config.check.bootstrap.is_none());
}

#[test]
fn invalid_package_names_never_enter_the_system() {
    assert!(PackageName::parse("zoo; system('rm -rf /')").is_err());
    assert!(PackageName::parse("2fast").is_err());
    assert!(PackageName::parse("dot.").is_err());
    assert!(PackageName::parse("data.table").is_ok());
}
