use organisa::config::OrganisaConfig;
use organisa::error::ApiError;
use organisa::tooling::cli::{CliContext, Commands};
use std::fs;
use tempfile::TempDir;

fn context(dir: &TempDir) -> CliContext {
    CliContext::from_config(OrganisaConfig::default(), Some(dir.path().join("store"))).unwrap()
}

fn register(cli: &CliContext, username: &str) {
    cli.execute(&Commands::Register {
        username: username.to_string(),
        password: Some("pw".to_string()),
    })
    .unwrap();
}

fn json(output: &str) -> serde_json::Value {
    serde_json::from_str(output).unwrap()
}

fn id_of(cli: &CliContext, name: &str) -> String {
    let session = cli.auth().require_session().unwrap();
    cli.repository()
        .list(session.username())
        .unwrap()
        .into_iter()
        .find(|i| i.name == name)
        .unwrap()
        .id
}

#[test]
fn ls_json_contract_has_required_fields() {
    let temp_dir = TempDir::new().unwrap();
    let cli = context(&temp_dir);
    register(&cli, "alice");
    cli.execute(&Commands::Link {
        name: "Rust".to_string(),
        url: "https://www.rust-lang.org".to_string(),
        parent: None,
    })
    .unwrap();

    let output = cli
        .execute(&Commands::Ls {
            folder: None,
            format: "json".to_string(),
        })
        .unwrap();
    let parsed = json(&output);
    let entry = &parsed.as_array().unwrap()[0];
    assert!(entry.get("id").and_then(|v| v.as_str()).is_some());
    assert_eq!(entry.get("kind").and_then(|v| v.as_str()), Some("link"));
    assert_eq!(entry.get("name").and_then(|v| v.as_str()), Some("Rust"));
    assert!(entry.get("created_at").and_then(|v| v.as_i64()).is_some());
    assert_eq!(
        entry.get("content").and_then(|v| v.as_str()),
        Some("https://www.rust-lang.org")
    );
}

#[test]
fn tree_json_reports_depth() {
    let temp_dir = TempDir::new().unwrap();
    let cli = context(&temp_dir);
    register(&cli, "alice");
    cli.execute(&Commands::Mkdir {
        name: "A".to_string(),
        parent: None,
    })
    .unwrap();
    let a = id_of(&cli, "A");
    cli.execute(&Commands::Note {
        name: "C".to_string(),
        text: Some("inside".to_string()),
        generate: false,
        parent: Some(a),
    })
    .unwrap();

    let parsed = json(
        &cli.execute(&Commands::Tree {
            format: "json".to_string(),
        })
        .unwrap(),
    );
    let entries = parsed.as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["depth"], 0);
    assert_eq!(entries[1]["depth"], 1);
    assert_eq!(entries[1]["name"], "C");
}

#[test]
fn upload_and_download_round_trip_bytes() {
    let temp_dir = TempDir::new().unwrap();
    let cli = context(&temp_dir);
    register(&cli, "alice");

    let source = temp_dir.path().join("notes.txt");
    fs::write(&source, b"hello organisa").unwrap();
    cli.execute(&Commands::Upload {
        file: source,
        name: None,
        parent: None,
    })
    .unwrap();

    let id = id_of(&cli, "notes.txt");
    let shown = json(
        &cli.execute(&Commands::Show {
            id: id.clone(),
            format: "json".to_string(),
        })
        .unwrap(),
    );
    assert_eq!(shown["kind"], "file");
    assert_eq!(shown["size_bytes"], 14);

    let out_dir = temp_dir.path().join("out");
    fs::create_dir_all(&out_dir).unwrap();
    cli.execute(&Commands::Download {
        id,
        dest: out_dir.clone(),
    })
    .unwrap();
    assert_eq!(fs::read(out_dir.join("notes.txt")).unwrap(), b"hello organisa");
}

#[test]
fn upload_over_limit_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let mut config = OrganisaConfig::default();
    config.limits.max_file_bytes = 4;
    let cli = CliContext::from_config(config, Some(temp_dir.path().join("store"))).unwrap();
    register(&cli, "alice");

    let source = temp_dir.path().join("big.bin");
    fs::write(&source, [0u8; 16]).unwrap();
    let err = cli
        .execute(&Commands::Upload {
            file: source,
            name: None,
            parent: None,
        })
        .unwrap_err();
    assert!(matches!(err, ApiError::ValidationError(_)));
    assert!(cli.repository().list("alice").unwrap().is_empty());
}

#[test]
fn search_and_path_follow_the_hierarchy() {
    let temp_dir = TempDir::new().unwrap();
    let cli = context(&temp_dir);
    register(&cli, "alice");
    cli.execute(&Commands::Mkdir {
        name: "Work".to_string(),
        parent: None,
    })
    .unwrap();
    let work = id_of(&cli, "Work");
    cli.execute(&Commands::Note {
        name: "Weekly Report".to_string(),
        text: None,
        generate: false,
        parent: Some(work),
    })
    .unwrap();

    let found = json(
        &cli.execute(&Commands::Search {
            query: "REPORT".to_string(),
            format: "json".to_string(),
        })
        .unwrap(),
    );
    assert_eq!(found.as_array().unwrap().len(), 1);

    let report = id_of(&cli, "Weekly Report");
    let path = cli
        .execute(&Commands::Path {
            id: report,
            format: "text".to_string(),
        })
        .unwrap();
    assert_eq!(path, "/ Work / Weekly Report");
}

#[test]
fn session_carries_over_to_a_new_context() {
    let temp_dir = TempDir::new().unwrap();
    {
        let cli = context(&temp_dir);
        register(&cli, "alice");
        cli.execute(&Commands::Mkdir {
            name: "Docs".to_string(),
            parent: None,
        })
        .unwrap();
    }

    let cli = context(&temp_dir);
    assert_eq!(cli.execute(&Commands::Whoami).unwrap(), "alice");
    let listed = json(
        &cli.execute(&Commands::Ls {
            folder: None,
            format: "json".to_string(),
        })
        .unwrap(),
    );
    assert_eq!(listed[0]["name"], "Docs");
}

#[test]
fn users_only_see_their_own_items() {
    let temp_dir = TempDir::new().unwrap();
    let cli = context(&temp_dir);
    register(&cli, "alice");
    cli.execute(&Commands::Mkdir {
        name: "Private".to_string(),
        parent: None,
    })
    .unwrap();
    cli.execute(&Commands::Logout).unwrap();
    register(&cli, "bob");

    let listed = json(
        &cli.execute(&Commands::Ls {
            folder: None,
            format: "json".to_string(),
        })
        .unwrap(),
    );
    assert!(listed.as_array().unwrap().is_empty());
}

#[test]
fn download_into_directory_stays_inside_it() {
    let temp_dir = TempDir::new().unwrap();
    let cli = context(&temp_dir);
    register(&cli, "alice");

    let source = temp_dir.path().join("payload.txt");
    fs::write(&source, b"contained").unwrap();
    cli.execute(&Commands::Upload {
        file: source,
        name: Some("../escape.txt".to_string()),
        parent: None,
    })
    .unwrap();

    let out_dir = temp_dir.path().join("out");
    fs::create_dir_all(&out_dir).unwrap();
    cli.execute(&Commands::Download {
        id: id_of(&cli, "../escape.txt"),
        dest: out_dir.clone(),
    })
    .unwrap();

    assert_eq!(fs::read(out_dir.join("escape.txt")).unwrap(), b"contained");
    assert!(!temp_dir.path().join("escape.txt").exists());
}
