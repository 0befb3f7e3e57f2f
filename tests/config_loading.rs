use std::io::Write;

use program_starter::config::load_and_validate;
use program_starter::errors::StarterError;
use tempfile::NamedTempFile;

fn config_file(suffix: &str, contents: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    write!(file, "{contents}").unwrap();
    file
}

#[test]
fn loads_yaml_with_scalar_and_list_dependencies() {
    let file = config_file(
        ".yml",
        r#"
envs:
  LOG_DIR: /tmp/logs
programs:
  db:
    start: "echo db"
    stop: "echo db stop"
  cache:
    start: "echo cache"
  api:
    depends_on: db
    start: "echo api ${PORT}"
    envs:
      PORT: 8080
  web:
    depends_on: [api, cache]
    start: "echo web"
"#,
    );

    let cfg = load_and_validate(file.path()).unwrap();
    assert_eq!(cfg.programs.len(), 4);
    assert_eq!(cfg.envs["LOG_DIR"], "/tmp/logs");
    assert_eq!(cfg.programs["api"].depends_on, vec!["db"]);
    assert_eq!(cfg.programs["api"].envs["PORT"], "8080");
    assert_eq!(cfg.programs["web"].depends_on, vec!["api", "cache"]);
    assert_eq!(cfg.programs["db"].stop.as_deref(), Some("echo db stop"));
}

#[test]
fn loads_json_for_other_extensions() {
    let file = config_file(
        ".json",
        r#"{
  "programs": {
    "db": { "start": "echo db" },
    "api": { "depends": "db", "start": "echo api" }
  }
}"#,
    );

    let cfg = load_and_validate(file.path()).unwrap();
    assert_eq!(cfg.programs["api"].depends_on, vec!["db"]);
    assert!(cfg.envs.is_empty());
}

#[test]
fn cycle_returns_structured_error() {
    let file = config_file(
        ".yaml",
        r#"
programs:
  a:
    depends_on: b
  b:
    depends_on: [a]
"#,
    );

    match load_and_validate(file.path()) {
        Err(StarterError::DagCycle(msg)) => {
            assert!(msg.contains("cycle detected"));
            assert!(msg.contains('a') || msg.contains('b'));
        }
        Err(e) => panic!("Expected DagCycle error, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn unknown_dependency_returns_reference_error() {
    let file = config_file(
        ".yml",
        r#"
programs:
  api:
    depends_on: NonExistent
"#,
    );

    match load_and_validate(file.path()) {
        Err(StarterError::UnknownProgramReference { program, dependency }) => {
            assert_eq!(program, "api");
            assert_eq!(dependency, "NonExistent");
        }
        Err(e) => panic!("Expected UnknownProgramReference, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn malformed_files_are_parse_errors() {
    let yaml = config_file(".yml", "programs: [unterminated");
    assert!(matches!(load_and_validate(yaml.path()), Err(StarterError::YamlError(_))));

    let json = config_file(".json", "{ \"programs\": ");
    assert!(matches!(load_and_validate(json.path()), Err(StarterError::JsonError(_))));
}

#[test]
fn missing_programs_key_is_rejected() {
    let file = config_file(".yml", "envs:\n  A: b\n");
    assert!(load_and_validate(file.path()).is_err());
}

#[test]
fn demo_config_loads() {
    let manifest = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let cfg = load_and_validate(manifest.join("demos/program-starter.yml")).unwrap();

    assert_eq!(cfg.programs.len(), 4);
    assert_eq!(cfg.programs["web"].depends_on, vec!["api", "cache"]);
    assert_eq!(cfg.programs["api"].envs["API_PORT"], "8080");
    assert_eq!(cfg.envs["RUN_DIR"], "/tmp/program-starter-demo");
}
