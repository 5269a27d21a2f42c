// ABOUTME: Integration tests for the CLI application
// ABOUTME: Tests command-line interface functionality and end-to-end template rendering

use std::process::{Command, Output};

mod common;
use common::{visible_text, TestDocumentBuilder, TestEnvironment};

use docmerge::package::{TemplateArchive, MAIN_DOCUMENT_PART};

fn docmerge(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_docmerge"))
        .args(args)
        .env_remove("DOCMERGE_OUTPUT_DIR")
        .env_remove("DOCMERGE_TEMPLATE_BASE_URL")
        .output()
        .expect("Failed to execute command")
}

fn rendered_text(path: &std::path::Path) -> String {
    let archive = TemplateArchive::from_bytes(std::fs::read(path).unwrap()).unwrap();
    visible_text(&archive.read_text_part(MAIN_DOCUMENT_PART).unwrap())
}

#[test]
fn test_cli_help_command() {
    let output = docmerge(&["--help"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(stdout.contains("docmerge"));
    assert!(stdout.contains("render"));
    assert!(stdout.contains("--help"));
}

#[test]
fn test_cli_version_command() {
    let output = docmerge(&["--version"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_cli_variants_command() {
    let output = docmerge(&["variants", "firstName"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("firstName:"));
    assert!(stdout.contains("first_name"));
    assert!(stdout.contains("FIRST_NAME"));
}

#[tokio::test]
async fn test_cli_render_with_query_and_vars() {
    let env = TestEnvironment::new();
    let builder = TestDocumentBuilder::new().with_paragraph("{{first_name}}, {{Email}}");
    let template = env.create_template_file("letter", &builder).await;
    let output_file = env.output_file("letter");

    let output = docmerge(&[
        "render",
        template.to_str().unwrap(),
        "--query",
        "firstName=Ada&email=old@example.com",
        "--var",
        "email=ada@example.com",
        "--output",
        output_file.to_str().unwrap(),
    ]);

    if !output.status.success() {
        println!("RENDER STDERR: {}", String::from_utf8_lossy(&output.stderr));
    }
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("Generated"));
    assert_eq!(rendered_text(&output_file), "Ada, ada@example.com");
}

#[tokio::test]
async fn test_cli_render_with_data_file() {
    let env = TestEnvironment::new();
    let builder = TestDocumentBuilder::new()
        .with_paragraph("{{#items}}")
        .with_paragraph("{{item_name}}")
        .with_paragraph("{{/items}}");
    let template = env.create_template_file("list", &builder).await;
    let data_file = env.path().join("data.json");
    tokio::fs::write(
        &data_file,
        r#"{"items": [{"itemName": "One"}, {"itemName": "Two"}]}"#,
    )
    .await
    .unwrap();
    let output_file = env.output_file("list");

    let output = docmerge(&[
        "render",
        template.to_str().unwrap(),
        "--data",
        data_file.to_str().unwrap(),
        "-o",
        output_file.to_str().unwrap(),
    ]);

    assert!(output.status.success());
    assert_eq!(rendered_text(&output_file), "OneTwo");
}

#[tokio::test]
async fn test_cli_render_reports_template_errors() {
    let env = TestEnvironment::new();
    let builder = TestDocumentBuilder::new().with_paragraph("Hello {{name");
    let template = env.create_template_file("broken", &builder).await;
    let output_file = env.output_file("broken");

    let output = docmerge(&[
        "render",
        template.to_str().unwrap(),
        "-o",
        output_file.to_str().unwrap(),
    ]);

    assert!(!output.status.success());
    assert!(!output_file.exists());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Template Error:"));
    assert!(stderr.contains("{{name"));
}

#[tokio::test]
async fn test_cli_render_missing_template() {
    let env = TestEnvironment::new();
    let missing = env.template_file("missing");

    let output = docmerge(&["render", missing.to_str().unwrap()]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("missing"));
}

#[tokio::test]
async fn test_cli_inspect_json() {
    let env = TestEnvironment::new();
    let builder = TestDocumentBuilder::new()
        .with_paragraph("{{firstName}} {{lastName}}")
        .with_header(1, "{{company}}");
    let template = env.create_template_file("inspect", &builder).await;

    let output = docmerge(&[
        "inspect",
        template.to_str().unwrap(),
        "--format",
        "json",
    ]);

    assert!(output.status.success());
    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(parsed["valid"], true);
    assert_eq!(
        parsed["fields"],
        serde_json::json!(["firstName", "lastName", "company"])
    );
}
