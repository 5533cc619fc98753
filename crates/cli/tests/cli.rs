use assert_cmd::Command;

fn catalog() -> Command {
    let mut cmd = Command::cargo_bin("catalog").unwrap();
    cmd.env("CATALOG_CONFIG_DIR", std::env::temp_dir().join("catalog-cli-no-config"))
        .env_remove("CATALOG_ENV");
    cmd
}

#[test]
fn config_prints_resolved_settings() {
    let output = catalog().arg("config").assert().success().get_output().stdout.clone();
    let settings: serde_json::Value = serde_json::from_slice(&output).unwrap();

    assert_eq!(settings["environment"], "local");
    assert_eq!(settings["server"]["port"], 3000);
    assert_eq!(settings["database"]["endpoint"], "memory://");
}

#[test]
fn env_overrides_nested_settings() {
    let output = catalog()
        .env("CATALOG_SERVER__PORT", "4100")
        .arg("config")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let settings: serde_json::Value = serde_json::from_slice(&output).unwrap();

    assert_eq!(settings["server"]["port"], 4100);
}

#[test]
fn openapi_lists_book_routes() {
    let output = catalog().arg("openapi").assert().success().get_output().stdout.clone();
    let document: serde_json::Value = serde_json::from_slice(&output).unwrap();

    assert!(document["paths"]["/books"]["post"].is_object());
    assert!(document["paths"]["/books/id/{id}"]["delete"].is_object());
    assert!(document["components"]["schemas"]["Book"].is_object());
}

#[test]
fn unknown_environment_fails() {
    catalog().env("CATALOG_ENV", "qa").arg("config").assert().failure();
}
