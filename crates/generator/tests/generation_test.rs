//! End-to-end generation from the todo-backend description

use restbridge_common::{
    EndpointMetadata, GeneratorConfig, GeneratorError, PackageSpec, PropertyBag, PropertySpec,
    ResourceSpec,
};
use restbridge_generator::{generate_provider, ProviderGenerator, PROVIDER_DIR, SDK_DIR};
use restbridge_parser::build_schema;
use restbridge_provider::{
    PropertyMap, ReqwestTransport, ResourceProvider, RestProvider, TransportConfig,
};
use std::fs;
use std::path::{Path, PathBuf};

fn todo_config() -> GeneratorConfig {
    GeneratorConfig {
        spec: concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/../parser/tests/fixtures/todo-backend.json"
        )
        .to_string(),
        ..GeneratorConfig::default()
    }
}

fn generate(output: &Path) -> Vec<PathBuf> {
    let config = todo_config();
    let assembled = build_schema(&config, "1.2.3").unwrap();
    generate_provider(
        assembled.schema,
        assembled.metadata,
        &config.languages,
        output,
    )
    .unwrap()
}

fn read(root: &Path, relative: &str) -> String {
    fs::read_to_string(root.join(relative))
        .unwrap_or_else(|e| panic!("failed to read {}: {}", relative, e))
}

#[test]
fn test_generates_full_layout() {
    let dir = tempfile::tempdir().unwrap();
    let written = generate(dir.path());

    let mut relative: Vec<String> = written
        .iter()
        .map(|p| {
            p.strip_prefix(dir.path())
                .unwrap()
                .to_string_lossy()
                .replace('\\', "/")
        })
        .collect();
    relative.sort();

    assert_eq!(
        relative,
        vec![
            "provider/metadata.json",
            "provider/metadata.rs",
            "provider/schema.json",
            "provider/schema.rs",
            "sdk/nodejs/index.ts",
            "sdk/nodejs/package.json",
            "sdk/nodejs/todo.ts",
            "sdk/python/pyproject.toml",
            "sdk/python/xyz/__init__.py",
            "sdk/python/xyz/todo.py",
        ]
    );
    for path in &written {
        assert!(path.is_file(), "{} was not written", path.display());
    }
}

#[test]
fn test_artifacts_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    generate(dir.path());
    let provider_dir = dir.path().join(PROVIDER_DIR);

    let schema = PackageSpec::load(&provider_dir.join("schema.json")).unwrap();
    assert_eq!(schema.version, "1.2.3");
    let todo = schema.resource("xyz:index:Todo").unwrap();
    assert_eq!(todo.required_inputs, vec!["title"]);
    assert!(!todo.properties.contains_key("id"));

    let metadata = EndpointMetadata::load(&provider_dir.join("metadata.json")).unwrap();
    assert_eq!(metadata.creation_path("xyz:index:Todo"), Some("/todos"));

    assert!(read(&provider_dir, "schema.rs")
        .contains("pub const SCHEMA: &str = include_str!(\"schema.json\");"));
    assert!(read(&provider_dir, "metadata.rs")
        .contains("pub const METADATA: &str = include_str!(\"metadata.json\");"));
}

#[test]
fn test_generated_artifacts_load_into_provider() {
    let dir = tempfile::tempdir().unwrap();
    generate(dir.path());

    let transport = ReqwestTransport::new(&TransportConfig::default()).unwrap();
    let provider = RestProvider::from_artifact_dir(&dir.path().join(PROVIDER_DIR), transport)
        .unwrap();
    assert_eq!(provider.plugin_info().version, "1.2.3");

    let mut news = PropertyMap::new();
    news.insert("title".to_string(), "buy milk".into());
    let checked = provider
        .check("urn:pulumi:dev::todo::xyz:index:Todo::milk", PropertyMap::new(), news.clone())
        .unwrap();
    assert_eq!(checked.inputs, news);
}

#[test]
fn test_nodejs_sdk() {
    let dir = tempfile::tempdir().unwrap();
    generate(dir.path());
    let sdk = dir.path().join(SDK_DIR).join("nodejs");

    let package: serde_json::Value = serde_json::from_str(&read(&sdk, "package.json")).unwrap();
    assert_eq!(package["name"], "xyz");
    assert_eq!(package["version"], "1.2.3");
    assert_eq!(package["dependencies"]["@pulumi/pulumi"], "^3.0.0");

    let todo = read(&sdk, "todo.ts");
    assert!(todo.contains("export class Todo extends pulumi.CustomResource"));
    assert!(todo.contains("__pulumiType = 'xyz:index:Todo'"));
    assert!(todo.contains("Missing required property 'title'"));
    assert!(todo.contains("readonly order?: pulumi.Input<number>;"));
    assert!(todo.contains("readonly completed?: pulumi.Input<boolean>;"));
    assert!(todo.contains("version: \"1.2.3\""));
    assert!(read(&sdk, "index.ts").contains("export * from \"./todo\";"));
}

#[test]
fn test_python_sdk() {
    let dir = tempfile::tempdir().unwrap();
    generate(dir.path());
    let sdk = dir.path().join(SDK_DIR).join("python");

    let todo = read(&sdk, "xyz/todo.py");
    assert!(todo.contains("class TodoArgs:"));
    assert!(todo.contains("title: pulumi.Input[str]"));
    assert!(todo.contains("order: Optional[pulumi.Input[int]] = None"));
    assert!(todo.contains("raise TypeError(\"Missing required property 'title'\")"));
    assert!(todo.contains("'xyz:index:Todo'"));
    assert!(read(&sdk, "pyproject.toml").contains("name = \"xyz\""));
}

#[test]
fn test_language_selection() {
    let dir = tempfile::tempdir().unwrap();
    let assembled = build_schema(&todo_config(), "").unwrap();

    ProviderGenerator::new(assembled.schema, assembled.metadata)
        .unwrap()
        .with_languages(["python"])
        .generate_to_directory(dir.path())
        .unwrap();

    assert!(dir.path().join(SDK_DIR).join("python").is_dir());
    assert!(!dir.path().join(SDK_DIR).join("nodejs").exists());
}

#[test]
fn test_unsupported_language_fails() {
    let dir = tempfile::tempdir().unwrap();
    let assembled = build_schema(&todo_config(), "1.0.0").unwrap();

    let result = generate_provider(
        assembled.schema,
        assembled.metadata,
        &["dotnet".to_string()],
        dir.path(),
    );
    assert!(matches!(result, Err(GeneratorError::Generation(msg)) if msg.contains("dotnet")));
}

#[test]
fn test_generation_is_deterministic() {
    let first = tempfile::tempdir().unwrap();
    let second = tempfile::tempdir().unwrap();
    let written = generate(first.path());
    generate(second.path());

    for path in written {
        let relative = path.strip_prefix(first.path()).unwrap();
        assert_eq!(
            fs::read(&path).unwrap(),
            fs::read(second.path().join(relative)).unwrap(),
            "{} differs between runs",
            relative.display()
        );
    }
}

#[test]
fn test_resource_without_inputs() {
    let dir = tempfile::tempdir().unwrap();
    let mut output = PropertyBag::new();
    output.insert(
        "title",
        PropertySpec {
            type_name: Some("string".to_string()),
            description: None,
        },
        true,
    );
    let mut schema = PackageSpec::new("xyz").with_version("1.0.0");
    schema.resources.insert(
        "xyz:index:Status".to_string(),
        ResourceSpec::from_bags(output, PropertyBag::new()),
    );
    let mut metadata = EndpointMetadata::new("https://example.com");
    metadata
        .resource_urls
        .insert("xyz:index:Status".to_string(), "/status".to_string());

    generate_provider(
        schema,
        metadata,
        &["python".to_string(), "nodejs".to_string()],
        dir.path(),
    )
    .unwrap();

    let python = read(&dir.path().join(SDK_DIR).join("python"), "xyz/status.py");
    assert!(python.contains("def __init__(__self__):"));
    assert!(!python.contains("*)"));
    assert!(python.contains("__props__[\"title\"] = None"));

    let nodejs = read(&dir.path().join(SDK_DIR).join("nodejs"), "status.ts");
    assert!(nodejs.contains("export interface StatusArgs {"));
    assert!(!nodejs.contains("Missing required property"));
    assert!(nodejs.contains("public readonly title!: pulumi.Output<string>;"));
}
